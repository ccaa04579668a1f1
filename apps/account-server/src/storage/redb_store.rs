// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded account database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `accounts`: id → serialized Account (JSON bytes)
//! - `account_numbers`: account number → id (uniqueness index)
//! - `sequences`: name → next value (id allocation)

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{ensure_same_number, AccountStore, StoreError, StoreResult};
use crate::models::{Account, NewAccount};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: id → serialized Account (JSON bytes).
const ACCOUNTS: TableDefinition<i64, &[u8]> = TableDefinition::new("accounts");

/// Unique index: account number → id.
const ACCOUNT_NUMBERS: TableDefinition<i64, i64> = TableDefinition::new("account_numbers");

/// Sequences: name → next value.
const SEQUENCES: TableDefinition<&str, i64> = TableDefinition::new("sequences");

const ACCOUNT_ID_SEQ: &str = "account_id";

// =============================================================================
// RedbAccountStore
// =============================================================================

/// Account store persisted in a single redb file.
pub struct RedbAccountStore {
    db: Database,
}

impl RedbAccountStore {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACCOUNTS)?;
            let _ = write_txn.open_table(ACCOUNT_NUMBERS)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }
}

impl AccountStore for RedbAccountStore {
    fn create_account(&self, account: NewAccount) -> StoreResult<Account> {
        let write_txn = self.db.begin_write()?;
        let created = {
            let mut numbers = write_txn.open_table(ACCOUNT_NUMBERS)?;
            if numbers.get(account.number)?.is_some() {
                return Err(StoreError::Conflict(format!(
                    "account number {} already exists",
                    account.number
                )));
            }

            let mut sequences = write_txn.open_table(SEQUENCES)?;
            let id = sequences
                .get(ACCOUNT_ID_SEQ)?
                .map(|v| v.value())
                .unwrap_or(1);
            sequences.insert(ACCOUNT_ID_SEQ, id + 1)?;

            let created = account.into_account(id);
            let json = serde_json::to_vec(&created)?;

            let mut accounts = write_txn.open_table(ACCOUNTS)?;
            accounts.insert(id, json.as_slice())?;
            numbers.insert(created.number, id)?;

            created
        };
        write_txn.commit()?;

        Ok(created)
    }

    fn get_account_by_id(&self, id: i64) -> StoreResult<Account> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACCOUNTS)?;
        match table.get(id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Err(StoreError::NotFound(id)),
        }
    }

    fn get_accounts(&self) -> StoreResult<Vec<Account>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACCOUNTS)?;

        let mut accounts = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            accounts.push(serde_json::from_slice(value.value())?);
        }
        Ok(accounts)
    }

    fn delete_account(&self, id: i64) -> StoreResult<bool> {
        let write_txn = self.db.begin_write()?;
        let existed = {
            let mut accounts = write_txn.open_table(ACCOUNTS)?;
            let removed: Option<Account> = match accounts.remove(id)? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };

            match removed {
                Some(account) => {
                    let mut numbers = write_txn.open_table(ACCOUNT_NUMBERS)?;
                    numbers.remove(account.number)?;
                    true
                }
                None => false,
            }
        };
        write_txn.commit()?;

        Ok(existed)
    }

    fn update_account(&self, account: &Account) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ACCOUNTS)?;

            // Read existing value before mutating
            let existing_bytes = {
                let existing = table
                    .get(account.id)?
                    .ok_or(StoreError::NotFound(account.id))?;
                existing.value().to_vec()
            };
            let stored: Account = serde_json::from_slice(&existing_bytes)?;
            ensure_same_number(&stored, account)?;

            let merged = Account {
                first_name: account.first_name.clone(),
                last_name: account.last_name.clone(),
                balance: account.balance,
                ..stored
            };
            let json = serde_json::to_vec(&merged)?;
            table.insert(account.id, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tests::exercise_store;

    fn temp_db() -> (RedbAccountStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = RedbAccountStore::open(&dir.path().join("test.redb")).unwrap();
        (db, dir)
    }

    #[test]
    fn satisfies_store_contract() {
        let (db, _dir) = temp_db();
        exercise_store(&db);
    }

    #[test]
    fn accounts_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("accounts.redb");

        let created = {
            let db = RedbAccountStore::open(&path).unwrap();
            db.create_account(NewAccount::new("Ada", "Lovelace")).unwrap()
        };

        let db = RedbAccountStore::open(&path).unwrap();
        assert_eq!(db.get_account_by_id(created.id).unwrap(), created);

        // The id sequence continues after reopen
        let next = db.create_account(NewAccount::new("Alan", "Turing")).unwrap();
        assert_eq!(next.id, created.id + 1);
    }

    #[test]
    fn failed_create_leaves_no_trace() {
        let (db, _dir) = temp_db();
        let first = db.create_account(NewAccount::new("Ada", "Lovelace")).unwrap();

        let mut dup = NewAccount::new("Grace", "Hopper");
        dup.number = first.number;
        assert!(db.create_account(dup).is_err());

        assert_eq!(db.get_accounts().unwrap().len(), 1);
        let next = db.create_account(NewAccount::new("Alan", "Turing")).unwrap();
        assert_eq!(next.id, first.id + 1);
    }
}

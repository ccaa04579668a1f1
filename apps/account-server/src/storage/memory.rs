// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory account store.
//!
//! Mirrors the redb backend's semantics without touching disk. Handler tests
//! run against it, and `DB_STRING=:memory:` selects it at startup.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{ensure_same_number, AccountStore, StoreError, StoreResult};
use crate::models::{Account, NewAccount};

#[derive(Debug)]
struct Tables {
    accounts: BTreeMap<i64, Account>,
    numbers: HashMap<i64, i64>,
    next_id: i64,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            accounts: BTreeMap::new(),
            numbers: HashMap::new(),
            next_id: 1,
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    tables: RwLock<Tables>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    // No writer panics between related map updates; poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl AccountStore for InMemoryAccountStore {
    fn create_account(&self, account: NewAccount) -> StoreResult<Account> {
        let mut tables = self.write();
        if tables.numbers.contains_key(&account.number) {
            return Err(StoreError::Conflict(format!(
                "account number {} already exists",
                account.number
            )));
        }

        let id = tables.next_id;
        tables.next_id += 1;

        let created = account.into_account(id);
        tables.numbers.insert(created.number, id);
        tables.accounts.insert(id, created.clone());
        Ok(created)
    }

    fn get_account_by_id(&self, id: i64) -> StoreResult<Account> {
        self.read()
            .accounts
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn get_accounts(&self) -> StoreResult<Vec<Account>> {
        Ok(self.read().accounts.values().cloned().collect())
    }

    fn delete_account(&self, id: i64) -> StoreResult<bool> {
        let mut tables = self.write();
        match tables.accounts.remove(&id) {
            Some(account) => {
                tables.numbers.remove(&account.number);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn update_account(&self, account: &Account) -> StoreResult<()> {
        let mut tables = self.write();
        let stored = tables
            .accounts
            .get_mut(&account.id)
            .ok_or(StoreError::NotFound(account.id))?;
        ensure_same_number(stored, account)?;

        stored.first_name = account.first_name.clone();
        stored.last_name = account.last_name.clone();
        stored.balance = account.balance;
        Ok(())
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Account Storage
//!
//! Handlers talk to storage only through the [`AccountStore`] trait, so the
//! backend can be swapped without touching the HTTP layer.
//!
//! ## Backends
//!
//! - [`RedbAccountStore`] - embedded ACID database (redb), one file on disk
//! - [`InMemoryAccountStore`] - process-local map, used by tests and by
//!   `DB_STRING=:memory:`
//!
//! ## Semantics
//!
//! - Ids are assigned by the store, starting at 1, never reused
//! - Account numbers are unique across all rows
//! - Deleting a missing id succeeds and reports `false`

use std::path::Path;
use std::sync::Arc;

use crate::config::{Config, IN_MEMORY_DB};
use crate::models::{Account, NewAccount};

pub mod memory;
pub mod redb_store;

pub use memory::InMemoryAccountStore;
pub use redb_store::RedbAccountStore;

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("account {0} not found")]
    NotFound(i64),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Store Trait
// =============================================================================

/// Persistence capability for accounts.
pub trait AccountStore: Send + Sync {
    /// Insert a new account and return it with its assigned id.
    ///
    /// Fails with [`StoreError::Conflict`] if the account number is taken.
    fn create_account(&self, account: NewAccount) -> StoreResult<Account>;

    /// Fetch a single account.
    fn get_account_by_id(&self, id: i64) -> StoreResult<Account>;

    /// Fetch every account, ordered by id.
    fn get_accounts(&self) -> StoreResult<Vec<Account>>;

    /// Remove an account. Returns whether a row existed.
    fn delete_account(&self, id: i64) -> StoreResult<bool>;

    /// Replace the mutable fields (names, balance) of an existing account.
    ///
    /// The account number is immutable; changing it yields
    /// [`StoreError::Conflict`].
    fn update_account(&self, account: &Account) -> StoreResult<()>;
}

/// Open the store selected by `DB_STRING`.
pub fn open_store(config: &Config) -> StoreResult<Arc<dyn AccountStore>> {
    if config.db_string == IN_MEMORY_DB {
        tracing::warn!("Using in-memory account store; data is lost on shutdown");
        return Ok(Arc::new(InMemoryAccountStore::new()));
    }

    let path = Path::new(&config.db_string);
    let store = RedbAccountStore::open(path)?;
    tracing::info!(path = %path.display(), "Opened account database");
    Ok(Arc::new(store))
}

/// Reject updates that would change the account number.
fn ensure_same_number(stored: &Account, update: &Account) -> StoreResult<()> {
    if stored.number != update.number {
        return Err(StoreError::Conflict(format!(
            "account number of account {} is immutable",
            stored.id
        )));
    }
    Ok(())
}

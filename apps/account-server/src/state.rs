// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::Config;
use crate::storage::AccountStore;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(store: Arc<dyn AccountStore>, tokens: TokenService) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
        }
    }

    pub fn from_config(config: &Config, store: Arc<dyn AccountStore>) -> Self {
        Self::new(store, TokenService::from_config(config))
    }
}

#[cfg(test)]
impl AppState {
    /// State backed by an empty in-memory store.
    pub(crate) fn in_memory(secret: &str) -> Self {
        Self::new(
            Arc::new(crate::storage::InMemoryAccountStore::new()),
            TokenService::new(secret, chrono::Duration::minutes(15)),
        )
    }
}

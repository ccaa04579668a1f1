// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures used by the REST API. All types derive
//! `Serialize`, `Deserialize`, and `ToSchema` for JSON handling and OpenAPI
//! documentation. Field names are camelCase on the wire, except the account
//! holder names, which keep the lowercase `firstname`/`lastname` existing
//! clients send and read. The camelCase spellings are accepted on input.
//!
//! ## Account Numbers
//!
//! Every account carries two identifiers: the store-assigned `id` used in
//! routes, and a randomly generated `number` that tokens are bound to.
//! The number never changes after creation.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Exclusive upper bound of generated account numbers.
pub const ACCOUNT_NUMBER_LIMIT: i64 = 10_000_000_000;

// =============================================================================
// Account Models
// =============================================================================

/// A persisted bank account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Store-assigned identifier used in `/account/{id}` routes.
    pub id: i64,
    /// Externally visible account number, bound into access tokens.
    pub number: i64,
    #[serde(rename = "firstname", alias = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastname", alias = "lastName")]
    pub last_name: String,
    /// Balance in minor currency units.
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

/// An account that has not been persisted yet.
///
/// The store assigns the `id` when it inserts the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub number: i64,
    pub first_name: String,
    pub last_name: String,
    pub balance: i64,
    pub created_at: DateTime<Utc>,
}

impl NewAccount {
    /// Build a fresh account with a generated number and zero balance.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            number: generate_account_number(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            balance: 0,
            created_at: Utc::now(),
        }
    }

    /// Attach the store-assigned id.
    pub fn into_account(self, id: i64) -> Account {
        Account {
            id,
            number: self.number,
            first_name: self.first_name,
            last_name: self.last_name,
            balance: self.balance,
            created_at: self.created_at,
        }
    }
}

impl From<CreateAccountParams> for NewAccount {
    fn from(params: CreateAccountParams) -> Self {
        NewAccount::new(params.first_name, params.last_name)
    }
}

/// Random account number in `1..ACCOUNT_NUMBER_LIMIT`.
pub fn generate_account_number() -> i64 {
    rand::thread_rng().gen_range(1..ACCOUNT_NUMBER_LIMIT)
}

/// Request body for `POST /account`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountParams {
    #[serde(rename = "firstname", alias = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastname", alias = "lastName")]
    pub last_name: String,
}

/// Response body for `DELETE /account/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DeleteAccountResponse {
    /// Human-readable outcome.
    pub result: String,
    /// The id that was requested.
    pub id: i64,
    /// Whether an account with this id existed.
    pub deleted: bool,
}

// =============================================================================
// Transfer Models
// =============================================================================

/// Request body for `POST /transfer`.
///
/// Transfers are recorded and echoed back; balances are not touched.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TransferParams {
    /// Destination account identifier.
    pub to_account: i64,
    /// Amount in minor currency units.
    pub amount: i64,
}

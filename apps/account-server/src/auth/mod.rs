// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authorization Module
//!
//! Per-account access control for the account API.
//!
//! ## Auth Flow
//!
//! 1. `POST /account` creates an account and returns a signed token in the
//!    `x-jwt-token` response header
//! 2. The client sends that token back in the `x-jwt-token` request header
//! 3. The server:
//!    - Verifies the HMAC signature and expiry
//!    - Loads the account addressed by the route
//!    - Checks that its number matches the token's `accountNumber` claim
//!
//! ## Security
//!
//! - Only HMAC algorithms are accepted
//! - Tokens expire after `TOKEN_TTL_SECS`
//! - Clock skew tolerance is 60 seconds
//! - Denials never reveal which check failed

pub mod error;
pub mod middleware;
pub mod token;

pub use error::AuthError;
pub use middleware::{require_account_owner, TOKEN_HEADER};
pub use token::{AccountClaims, TokenError, TokenService};

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::token::TokenError;
use crate::error::ApiError;
use crate::storage::StoreError;

/// Message returned to the client for every denied request.
pub const PERMISSION_DENIED: &str = "permission denied";

/// Reason an account-scoped request was denied.
///
/// Every variant renders the same 403 response; the variant only shows up
/// in logs so that callers cannot tell which check failed.
#[derive(Debug)]
pub enum AuthError {
    /// No `x-jwt-token` header present
    MissingToken,
    /// Header value is not visible ASCII
    InvalidHeader,
    /// Token failed verification
    InvalidToken(TokenError),
    /// Route id is not an integer
    InvalidAccountId(String),
    /// Target account could not be loaded
    AccountLookup(StoreError),
    /// Token is bound to a different account number
    AccountMismatch,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing_token",
            AuthError::InvalidHeader => "invalid_header",
            AuthError::InvalidToken(_) => "invalid_token",
            AuthError::InvalidAccountId(_) => "invalid_account_id",
            AuthError::AccountLookup(_) => "account_lookup_failed",
            AuthError::AccountMismatch => "account_mismatch",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "x-jwt-token header is required"),
            AuthError::InvalidHeader => write!(f, "x-jwt-token header is not valid ASCII"),
            AuthError::InvalidToken(e) => write!(f, "invalid token: {e}"),
            AuthError::InvalidAccountId(raw) => write!(f, "invalid account id {raw:?}"),
            AuthError::AccountLookup(e) => write!(f, "account lookup failed: {e}"),
            AuthError::AccountMismatch => write!(f, "token is bound to another account"),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::InvalidToken(e) => Some(e),
            AuthError::AccountLookup(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(e: TokenError) -> Self {
        AuthError::InvalidToken(e)
    }
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        AuthError::AccountLookup(e)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::warn!(
            error_code = self.error_code(),
            reason = %self,
            "Denied account access"
        );
        ApiError::new(StatusCode::FORBIDDEN, PERMISSION_DENIED).into_response()
    }
}

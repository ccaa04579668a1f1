// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account ownership middleware for Axum.
//!
//! Wraps the `/account/{id}` routes. A request reaches the handler only
//! when every step below succeeds; the first failure denies it.
//!
//! 1. Read the token from the `x-jwt-token` header
//! 2. Verify the token
//! 3. Parse the `{id}` route segment
//! 4. Load the account
//! 5. Compare the account number with the token's claims
//!
//! ## Usage
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/account/{id}", get(get_account_by_id))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         state.clone(),
//!         require_account_owner,
//!     ));
//! ```

use axum::{
    extract::{rejection::PathRejection, Path, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AccountClaims, AuthError};
use crate::state::AppState;

/// Header carrying the account token.
pub const TOKEN_HEADER: &str = "x-jwt-token";

/// Ownership middleware function.
///
/// On success the verified [`AccountClaims`] are added to the request
/// extensions. An `{id}` segment that cannot be decoded is denied like any
/// other unparsable id.
pub async fn require_account_owner(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    mut request: Request,
    next: Next,
) -> Response {
    let outcome = match path {
        Ok(Path(raw_id)) => authorize(&state, request.headers(), &raw_id),
        Err(rejection) => Err(AuthError::InvalidAccountId(rejection.body_text())),
    };

    match outcome {
        Ok(claims) => {
            tracing::debug!(
                account_number = claims.account_number,
                "Account access granted"
            );
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Run the ownership checks for the account addressed by `raw_id`.
pub fn authorize(
    state: &AppState,
    headers: &HeaderMap,
    raw_id: &str,
) -> Result<AccountClaims, AuthError> {
    let token = headers
        .get(TOKEN_HEADER)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader)?;

    let claims = state.tokens.validate(token.trim())?;

    let id: i64 = raw_id
        .parse()
        .map_err(|_| AuthError::InvalidAccountId(raw_id.to_string()))?;

    let account = state.store.get_account_by_id(id)?;

    if account.number != claims.account_number {
        return Err(AuthError::AccountMismatch);
    }

    Ok(claims)
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account management API endpoints.
//!
//! `GET`/`DELETE /account/{id}` sit behind the ownership middleware; creation
//! and listing are open.

use axum::{
    body::Bytes,
    extract::{rejection::PathRejection, Path, State},
    Extension, Json,
};

use super::decode_body;
use crate::{
    auth::{AccountClaims, TOKEN_HEADER},
    error::ApiError,
    models::{Account, CreateAccountParams, DeleteAccountResponse, NewAccount},
    state::AppState,
};

/// Parse the `{id}` route segment.
pub(crate) fn parse_id(path: Result<Path<String>, PathRejection>) -> Result<i64, ApiError> {
    let Path(raw) = path.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("invalid id provided {raw}")))
}

/// Create a new account.
///
/// The account gets a random account number and a zero balance. A token
/// bound to that number is returned in the `x-jwt-token` response header.
#[utoipa::path(
    post,
    path = "/account",
    tag = "Accounts",
    request_body = CreateAccountParams,
    responses(
        (status = 200, description = "Account created", body = Account,
            headers(("x-jwt-token" = String, description = "Token bound to the new account"))),
        (status = 400, description = "Malformed request body"),
        (status = 500, description = "Account could not be stored")
    )
)]
pub async fn create_account(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<([(&'static str, String); 1], Json<Account>), ApiError> {
    let params: CreateAccountParams = decode_body(&body)?;

    let account = state
        .store
        .create_account(NewAccount::from(params))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to store account");
            ApiError::internal(e.to_string())
        })?;

    let token = state.tokens.issue(&account).map_err(|e| {
        tracing::error!(error = %e, account_id = account.id, "Failed to issue token");
        ApiError::internal(e.to_string())
    })?;

    tracing::info!(
        account_id = account.id,
        account_number = account.number,
        "Account created and token issued"
    );

    Ok(([(TOKEN_HEADER, token)], Json(account)))
}

/// List all accounts.
#[utoipa::path(
    get,
    path = "/accounts",
    tag = "Accounts",
    responses((status = 200, description = "All accounts", body = [Account]))
)]
pub async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<Account>>, ApiError> {
    Ok(Json(state.store.get_accounts()?))
}

/// Get a specific account by ID.
///
/// Requires a token bound to this account's number.
#[utoipa::path(
    get,
    path = "/account/{id}",
    tag = "Accounts",
    security(("jwt_token" = [])),
    params(
        ("id" = i64, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account details", body = Account),
        (status = 400, description = "Account not found"),
        (status = 403, description = "Permission denied")
    )
)]
pub async fn get_account_by_id(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Account>, ApiError> {
    let id = parse_id(path)?;
    Ok(Json(state.store.get_account_by_id(id)?))
}

/// Delete an account.
///
/// Deleting an id that does not exist still succeeds, with `deleted: false`.
#[utoipa::path(
    delete,
    path = "/account/{id}",
    tag = "Accounts",
    security(("jwt_token" = [])),
    params(
        ("id" = i64, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Deletion outcome", body = DeleteAccountResponse),
        (status = 403, description = "Permission denied")
    )
)]
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(claims): Extension<AccountClaims>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<DeleteAccountResponse>, ApiError> {
    let id = parse_id(path)?;
    let deleted = state.store.delete_account(id)?;

    let result = if deleted {
        tracing::info!(
            account_id = id,
            account_number = claims.account_number,
            "Account deleted"
        );
        "Deleted successfully".to_string()
    } else {
        format!("No account with id {id}")
    };

    Ok(Json(DeleteAccountResponse {
        result,
        id,
        deleted,
    }))
}

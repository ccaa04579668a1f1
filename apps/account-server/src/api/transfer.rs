// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{body::Bytes, Json};

use super::decode_body;
use crate::{error::ApiError, models::TransferParams};

/// Record a transfer request.
///
/// The parsed request is echoed back. No balance is changed.
#[utoipa::path(
    post,
    path = "/transfer",
    tag = "Transfers",
    request_body = TransferParams,
    responses(
        (status = 200, description = "Transfer request accepted", body = TransferParams),
        (status = 400, description = "Malformed request body")
    )
)]
pub async fn transfer(body: Bytes) -> Result<Json<TransferParams>, ApiError> {
    let transfer: TransferParams = decode_body(&body)?;
    tracing::info!(
        to_account = transfer.to_account,
        amount = transfer.amount,
        "Transfer request received"
    );
    Ok(Json(transfer))
}

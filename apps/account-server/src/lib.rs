// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account Server - Bank Account Management Service
//!
//! This crate provides a small JSON HTTP service that creates, lists, fetches
//! and deletes bank accounts, echoes transfer requests, and gates access to
//! individual accounts with an HMAC-signed token bound to the account number.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Token issuance and account ownership checks (JWT)
//! - `storage` - Account store trait with redb and in-memory backends
//! - `config` - Environment configuration, read once at startup

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod storage;

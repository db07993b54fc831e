// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Onramp Gateway - Crypto purchase form backend
//!
//! Server side of a crypto purchase ("onramp") form: validates destination
//! addresses per network, resolves email destinations to custodial wallets,
//! mints session tokens and quotes with server-held credentials, and builds
//! the payment processor redirect.
//!
//! ## Modules
//!
//! - `address` - Per-network address classification
//! - `api` - HTTP API handlers (Axum)
//! - `form` - Purchase form state machine and redirect building
//! - `providers` - MetaKeep and CDP clients

pub mod address;
pub mod api;
pub mod config;
pub mod error;
pub mod form;
pub mod models;
pub mod providers;
pub mod state;
pub mod telemetry;

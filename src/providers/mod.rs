// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Clients for the external services behind the onramp form.
//!
//! Every client performs exactly one outbound request per call. There is no
//! retry, no backoff and no timeout beyond the transport default.

use reqwest::Client;
use serde_json::Value;
use url::Url;

pub mod cdp_auth;
pub mod metakeep;
pub mod quote;
pub mod session;

/// Shared outbound HTTP client.
pub fn http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

fn endpoint(base: &Url, path: &str) -> String {
    format!("{}{}", base.as_str().trim_end_matches('/'), path)
}

/// Upstream error bodies are kept as JSON when possible, raw text otherwise.
fn body_as_value(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

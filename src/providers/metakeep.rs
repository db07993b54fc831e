// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! MetaKeep integration: resolves (or creates) the custodial wallet bound to
//! an email address.

use std::sync::LazyLock;

use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};
use url::Url;

use super::endpoint;
use crate::{config::AppConfig, models::Wallet};

const GET_WALLET_PATH: &str = "/v3/getWallet";
const SUCCESS_STATUS: &str = "SUCCESS";

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email pattern compiles")
});

#[derive(Debug, thiserror::Error)]
pub enum MetaKeepError {
    #[error("Email is required")]
    MissingEmail,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("MetaKeep configuration missing: {0}")]
    MissingConfig(&'static str),

    #[error("MetaKeep API error: {status}")]
    Upstream { status: u16 },

    #[error("MetaKeep API returned status: {0}")]
    UnexpectedStatus(String),

    #[error("MetaKeep request failed: {0}")]
    Request(String),

    #[error("MetaKeep response was invalid: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Deserialize)]
struct GetWalletResponse {
    status: Option<String>,
    wallet: Option<Wallet>,
}

#[derive(Debug, Clone)]
pub struct MetaKeepClient {
    api_base_url: Url,
    api_key: Option<String>,
    http: Client,
}

impl MetaKeepClient {
    pub fn new(config: &AppConfig, http: Client) -> Self {
        Self {
            api_base_url: config.metakeep_api_base_url.clone(),
            api_key: config.metakeep_api_key.clone(),
            http,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Returns the wallet for `email`, creating it upstream if absent.
    ///
    /// The email is checked before anything is sent; the wallet is returned
    /// exactly as MetaKeep reports it.
    pub async fn get_wallet(&self, email: Option<&str>) -> Result<Wallet, MetaKeepError> {
        let email = normalize_email(email)?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(MetaKeepError::MissingConfig("METAKEEP_API_KEY"))?;

        info!(
            email_domain = %email_domain(email),
            "MetaKeep getWallet: resolving wallet"
        );

        let response = self
            .http
            .post(endpoint(&self.api_base_url, GET_WALLET_PATH))
            .header("accept", "application/json")
            .header("x-api-key", api_key)
            .json(&json!({ "user": { "email": email } }))
            .send()
            .await
            .map_err(|e| MetaKeepError::Request(format!("POST {GET_WALLET_PATH} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "MetaKeep getWallet: upstream error");
            return Err(MetaKeepError::Upstream {
                status: status.as_u16(),
            });
        }

        let payload: GetWalletResponse = response.json().await.map_err(|e| {
            MetaKeepError::InvalidResponse(format!("POST {GET_WALLET_PATH} invalid JSON: {e}"))
        })?;

        let upstream_status = payload.status.unwrap_or_else(|| "undefined".to_string());
        if upstream_status != SUCCESS_STATUS {
            return Err(MetaKeepError::UnexpectedStatus(upstream_status));
        }

        payload.wallet.ok_or_else(|| {
            MetaKeepError::InvalidResponse("missing wallet in response".to_string())
        })
    }
}

/// Trims and checks an email address.
pub fn normalize_email(email: Option<&str>) -> Result<&str, MetaKeepError> {
    let email = email
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(MetaKeepError::MissingEmail)?;

    if EMAIL.is_match(email) {
        Ok(email)
    } else {
        Err(MetaKeepError::InvalidEmail)
    }
}

fn email_domain(email: &str) -> &str {
    email.rsplit_once('@').map(|(_, domain)| domain).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_email_rejects_missing_values() {
        assert!(matches!(normalize_email(None), Err(MetaKeepError::MissingEmail)));
        assert!(matches!(normalize_email(Some("   ")), Err(MetaKeepError::MissingEmail)));
    }

    #[test]
    fn normalize_email_rejects_malformed_addresses() {
        for email in ["not-an-email", "a@b", "a b@c.com", "@example.com", "a@@b.com"] {
            assert!(
                matches!(normalize_email(Some(email)), Err(MetaKeepError::InvalidEmail)),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn normalize_email_trims_whitespace() {
        assert_eq!(normalize_email(Some("  a@b.com \n")).unwrap(), "a@b.com");
    }

    #[test]
    fn error_messages_match_api_contract() {
        assert_eq!(MetaKeepError::MissingEmail.to_string(), "Email is required");
        assert_eq!(MetaKeepError::InvalidEmail.to_string(), "Invalid email format");
        assert_eq!(
            MetaKeepError::Upstream { status: 503 }.to_string(),
            "MetaKeep API error: 503"
        );
        assert_eq!(
            MetaKeepError::UnexpectedStatus("USER_NOT_FOUND".into()).to_string(),
            "MetaKeep API returned status: USER_NOT_FOUND"
        );
    }

    #[test]
    fn email_domain_is_logged_instead_of_full_address() {
        assert_eq!(email_domain("someone@example.com"), "example.com");
    }

    #[tokio::test]
    async fn invalid_email_fails_before_configuration_check() {
        let client = MetaKeepClient::new(&AppConfig::default(), Client::new());
        assert!(!client.is_configured());
        let err = client.get_wallet(Some("not-an-email")).await.unwrap_err();
        assert!(matches!(err, MetaKeepError::InvalidEmail));
    }

    #[tokio::test]
    async fn missing_api_key_is_a_configuration_error() {
        let client = MetaKeepClient::new(&AppConfig::default(), Client::new());
        let err = client.get_wallet(Some("a@b.com")).await.unwrap_err();
        assert!(matches!(err, MetaKeepError::MissingConfig("METAKEEP_API_KEY")));
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! CDP onramp session tokens.
//!
//! A session token scopes a hosted checkout to a fixed list of destination
//! addresses and chains. Requests are validated completely before an
//! assertion is signed, so a rejected request never reaches CDP.

use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use url::Url;

use super::{
    body_as_value,
    cdp_auth::{AssertionError, AssertionSigner},
    endpoint,
};
use crate::{
    config::{AppConfig, CdpCredentials},
    models::{SessionAddress, SessionTokenRequest},
};

pub const TOKEN_REQUEST_METHOD: &str = "POST";
pub const TOKEN_REQUEST_HOST: &str = "api.developer.coinbase.com";
pub const TOKEN_REQUEST_PATH: &str = "/onramp/v1/token";

#[derive(Debug, thiserror::Error)]
pub enum SessionTokenError {
    #[error(
        "Missing CDP API credentials. Please set KEY_NAME and KEY_SECRET environment variables."
    )]
    MissingCredentials,

    #[error(
        "Legacy walletAddress parameter is no longer supported. Please use addresses array with blockchain specification."
    )]
    LegacyWalletAddress,

    #[error(
        r#"Addresses parameter is required. Format: {{"addresses": [{{"address": "...", "blockchains": ["network"]}}]}}"#
    )]
    MissingAddresses,

    #[error("Each address entry must have an address and at least one blockchain")]
    InvalidAddressEntry { entry: Value },

    #[error("Failed to generate JWT token: {0}")]
    Assertion(#[from] AssertionError),

    #[error("Authentication failed")]
    AuthenticationFailed { body: Value },

    #[error("CDP API error: {status_line}")]
    Upstream {
        status: u16,
        status_line: String,
        body: Value,
    },

    #[error("Invalid response from CDP API")]
    InvalidResponse { body: String },

    #[error("CDP request failed: {0}")]
    Request(String),
}

#[derive(Serialize)]
struct TokenRequestBody<'a> {
    addresses: &'a [SessionAddress],
    #[serde(skip_serializing_if = "Option::is_none")]
    assets: Option<&'a [String]>,
}

#[derive(Debug, Clone)]
pub struct SessionTokenClient {
    api_base_url: Url,
    credentials: Option<CdpCredentials>,
    http: Client,
}

impl SessionTokenClient {
    pub fn new(config: &AppConfig, http: Client) -> Self {
        Self {
            api_base_url: config.cdp_api_base_url.clone(),
            credentials: config.cdp_credentials.clone(),
            http,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    /// Mints a session token and returns the CDP payload unchanged.
    pub async fn create_session_token(
        &self,
        request: &SessionTokenRequest,
    ) -> Result<Value, SessionTokenError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(SessionTokenError::MissingCredentials)?;
        let addresses = validate_request(request)?;

        let signer = AssertionSigner::from_credentials(credentials)?;
        let assertion = signer.sign(
            TOKEN_REQUEST_METHOD,
            TOKEN_REQUEST_HOST,
            TOKEN_REQUEST_PATH,
            chrono::Utc::now().timestamp(),
        )?;

        info!(
            addresses = addresses.len(),
            algorithm = signer.algorithm(),
            "CDP session token: requesting token"
        );

        let response = self
            .http
            .post(endpoint(&self.api_base_url, TOKEN_REQUEST_PATH))
            .header("accept", "application/json")
            .bearer_auth(assertion)
            .json(&TokenRequestBody {
                addresses,
                assets: request.assets.as_deref(),
            })
            .send()
            .await
            .map_err(|e| {
                SessionTokenError::Request(format!("POST {TOKEN_REQUEST_PATH} failed: {e}"))
            })?;

        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED {
            warn!("CDP session token: authentication failed");
            return Err(SessionTokenError::AuthenticationFailed {
                body: body_as_value(&text),
            });
        }

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %text, "CDP session token: upstream error");
            return Err(SessionTokenError::Upstream {
                status: status.as_u16(),
                status_line: status_line(status),
                body: body_as_value(&text),
            });
        }

        serde_json::from_str(&text).map_err(|_| SessionTokenError::InvalidResponse { body: text })
    }
}

/// Checks the request shape and returns the address entries to forward.
pub fn validate_request(
    request: &SessionTokenRequest,
) -> Result<&[SessionAddress], SessionTokenError> {
    let addresses = match request.addresses.as_deref() {
        Some(addresses) if !addresses.is_empty() => addresses,
        None if request
            .wallet_address
            .as_deref()
            .is_some_and(|wallet| !wallet.is_empty()) =>
        {
            return Err(SessionTokenError::LegacyWalletAddress)
        }
        _ => return Err(SessionTokenError::MissingAddresses),
    };

    if let Some(entry) = addresses.iter().find(|entry| !entry.is_complete()) {
        return Err(SessionTokenError::InvalidAddressEntry {
            entry: entry.0.clone(),
        });
    }

    Ok(addresses)
}

fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(addresses: Option<Vec<SessionAddress>>) -> SessionTokenRequest {
        SessionTokenRequest {
            addresses,
            ..Default::default()
        }
    }

    #[test]
    fn missing_or_empty_addresses_are_rejected() {
        assert!(matches!(
            validate_request(&request(None)),
            Err(SessionTokenError::MissingAddresses)
        ));
        assert!(matches!(
            validate_request(&request(Some(vec![]))),
            Err(SessionTokenError::MissingAddresses)
        ));
    }

    #[test]
    fn legacy_wallet_address_gets_migration_error() {
        let legacy = SessionTokenRequest {
            wallet_address: Some("0xabc".into()),
            ..Default::default()
        };
        assert!(matches!(
            validate_request(&legacy),
            Err(SessionTokenError::LegacyWalletAddress)
        ));
    }

    #[test]
    fn first_incomplete_entry_is_reported() {
        let addresses = vec![
            SessionAddress::new("0xabc", &["ethereum"]),
            SessionAddress(json!({ "address": "So1ana", "blockchains": [] })),
            SessionAddress(json!({ "blockchains": ["base"] })),
        ];
        match validate_request(&request(Some(addresses))) {
            Err(SessionTokenError::InvalidAddressEntry { entry }) => {
                assert_eq!(entry, json!({ "address": "So1ana", "blockchains": [] }));
            }
            other => panic!("expected InvalidAddressEntry, got {other:?}"),
        }
    }

    #[test]
    fn empty_address_string_is_incomplete() {
        let addresses = vec![SessionAddress::new("", &["ethereum"])];
        assert!(matches!(
            validate_request(&request(Some(addresses))),
            Err(SessionTokenError::InvalidAddressEntry { .. })
        ));
    }

    #[test]
    fn non_string_address_is_an_invalid_entry() {
        let addresses = vec![SessionAddress(json!({ "address": 42, "blockchains": ["base"] }))];
        match validate_request(&request(Some(addresses))) {
            Err(SessionTokenError::InvalidAddressEntry { entry }) => {
                assert_eq!(entry, json!({ "address": 42, "blockchains": ["base"] }));
            }
            other => panic!("expected InvalidAddressEntry, got {other:?}"),
        }
    }

    #[test]
    fn complete_entries_pass_through() {
        let addresses = vec![SessionAddress::new("0xabc", &["ethereum", "base"])];
        let req = request(Some(addresses.clone()));
        assert_eq!(validate_request(&req).unwrap(), addresses.as_slice());
    }

    #[test]
    fn request_body_omits_absent_assets() {
        let addresses = vec![SessionAddress::new("0xabc", &["base"])];
        let body = serde_json::to_value(TokenRequestBody {
            addresses: &addresses,
            assets: None,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({ "addresses": [{ "address": "0xabc", "blockchains": ["base"] }] })
        );
    }

    #[test]
    fn status_line_includes_reason_phrase() {
        assert_eq!(status_line(StatusCode::BAD_REQUEST), "400 Bad Request");
        assert_eq!(
            SessionTokenError::Upstream {
                status: 429,
                status_line: status_line(StatusCode::TOO_MANY_REQUESTS),
                body: Value::Null,
            }
            .to_string(),
            "CDP API error: 429 Too Many Requests"
        );
    }

    #[tokio::test]
    async fn missing_credentials_precede_request_validation() {
        let client = SessionTokenClient::new(&AppConfig::default(), Client::new());
        assert!(!client.is_configured());
        let err = client
            .create_session_token(&SessionTokenRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionTokenError::MissingCredentials));
    }

    #[tokio::test]
    async fn invalid_entry_is_reported_before_key_is_parsed() {
        let config = AppConfig::from_lookup(|name| match name {
            "KEY_NAME" => Some("key".into()),
            "KEY_SECRET" => Some("definitely not a key".into()),
            _ => None,
        })
        .unwrap();
        let client = SessionTokenClient::new(&config, Client::new());
        let req = request(Some(vec![SessionAddress(json!({ "address": "0xabc" }))]));
        let err = client.create_session_token(&req).await.unwrap_err();
        assert!(matches!(err, SessionTokenError::InvalidAddressEntry { .. }));
    }

    #[tokio::test]
    async fn unusable_key_is_an_assertion_error() {
        let config = AppConfig::from_lookup(|name| match name {
            "KEY_NAME" => Some("key".into()),
            "KEY_SECRET" => Some("definitely not a key".into()),
            _ => None,
        })
        .unwrap();
        let client = SessionTokenClient::new(&config, Client::new());
        let req = request(Some(vec![SessionAddress::new("0xabc", &["base"])]));
        let err = client.create_session_token(&req).await.unwrap_err();
        assert!(matches!(err, SessionTokenError::Assertion(_)));
        assert!(err.to_string().starts_with("Failed to generate JWT token"));
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Buy quotes from the CDP onramp quote API.

use reqwest::Client;
use serde_json::Value;
use tracing::{info, warn};
use url::Url;

use super::{body_as_value, endpoint};
use crate::{config::AppConfig, models::QuoteRequest};

const BUY_QUOTE_PATH: &str = "/onramp/v1/buy/quote";

#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("Quote API key is not configured")]
    MissingApiKey,

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Quote request failed: {0}")]
    Request(String),

    #[error("Quote response was invalid: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone)]
pub struct QuoteClient {
    api_base_url: Url,
    api_key: Option<String>,
    http: Client,
}

impl QuoteClient {
    pub fn new(config: &AppConfig, http: Client) -> Self {
        Self {
            api_base_url: config.cdp_api_base_url.clone(),
            api_key: config.quote_api_key.clone(),
            http,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetches a quote; the upstream payload is returned unmodified.
    pub async fn fetch_quote(&self, request: &QuoteRequest) -> Result<Value, QuoteError> {
        check_required_fields(request)?;
        let api_key = self.api_key.as_deref().ok_or(QuoteError::MissingApiKey)?;

        info!(
            purchase_currency = %request.purchase_currency,
            payment_currency = %request.payment_currency,
            country = %request.country,
            "Buy quote: requesting quote"
        );

        let response = self
            .http
            .post(endpoint(&self.api_base_url, BUY_QUOTE_PATH))
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| QuoteError::Request(format!("POST {BUY_QUOTE_PATH} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %text, "Buy quote: upstream error");
            return Err(QuoteError::Upstream {
                status: status.as_u16(),
                message: upstream_message(&text, status.as_u16()),
            });
        }

        response.json().await.map_err(|e| {
            QuoteError::InvalidResponse(format!("POST {BUY_QUOTE_PATH} invalid JSON: {e}"))
        })
    }
}

fn check_required_fields(request: &QuoteRequest) -> Result<(), QuoteError> {
    let fields = [
        ("purchase_currency", &request.purchase_currency),
        ("payment_amount", &request.payment_amount),
        ("payment_currency", &request.payment_currency),
        ("payment_method", &request.payment_method),
        ("country", &request.country),
    ];
    match fields.into_iter().find(|(_, value)| value.trim().is_empty()) {
        Some((field, _)) => Err(QuoteError::MissingField { field }),
        None => Ok(()),
    }
}

fn upstream_message(body: &str, status: u16) -> String {
    match body_as_value(body).get("error").and_then(Value::as_str) {
        Some(message) => message.to_string(),
        None => format!("Failed to fetch quote: {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote_request() -> QuoteRequest {
        QuoteRequest {
            purchase_currency: "USDC".into(),
            payment_amount: "100.00".into(),
            payment_currency: "USD".into(),
            payment_method: "CARD".into(),
            country: "US".into(),
            subdivision: None,
        }
    }

    #[test]
    fn complete_request_passes_field_check() {
        assert!(check_required_fields(&quote_request()).is_ok());
    }

    #[test]
    fn blank_field_is_named_in_error() {
        let mut request = quote_request();
        request.payment_amount = "  ".into();
        let err = check_required_fields(&request).unwrap_err();
        assert!(matches!(err, QuoteError::MissingField { field: "payment_amount" }));
        assert_eq!(err.to_string(), "payment_amount is required");
    }

    #[test]
    fn upstream_message_prefers_error_field() {
        assert_eq!(
            upstream_message(r#"{"error":"unsupported country"}"#, 400),
            "unsupported country"
        );
        assert_eq!(upstream_message("gateway down", 502), "Failed to fetch quote: 502");
        assert_eq!(upstream_message(r#"{"code":7}"#, 500), "Failed to fetch quote: 500");
    }

    #[test]
    fn subdivision_is_omitted_when_absent() {
        let body = serde_json::to_value(quote_request()).unwrap();
        assert!(body.get("subdivision").is_none());
        assert_eq!(body["purchase_currency"], "USDC");
    }

    #[tokio::test]
    async fn missing_api_key_fails_after_field_check() {
        let client = QuoteClient::new(&AppConfig::default(), Client::new());
        assert!(!client.is_configured());

        let mut incomplete = quote_request();
        incomplete.country.clear();
        assert!(matches!(
            client.fetch_quote(&incomplete).await,
            Err(QuoteError::MissingField { field: "country" })
        ));
        assert!(matches!(
            client.fetch_quote(&quote_request()).await,
            Err(QuoteError::MissingApiKey)
        ));
    }
}

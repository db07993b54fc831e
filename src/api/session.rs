// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Onramp session token issuance.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;
use tracing::error;

use crate::{
    error::ApiError,
    models::SessionTokenRequest,
    providers::session::SessionTokenError,
    state::AppState,
};

const AUTH_FAILED_DETAILS: &str = "Please verify your CDP API key and secret are correct.";
const LEGACY_SHAPE_DETAILS: &str = r#"Update your frontend to send: {"addresses": [{"address": "...", "blockchains": ["solana"]}]} instead of {"walletAddress": "..."}"#;

fn map_provider_error(error: SessionTokenError) -> ApiError {
    match error {
        SessionTokenError::MissingCredentials => {
            error!("CDP session tokens requested without credentials");
            ApiError::configuration(error.to_string())
        }
        SessionTokenError::LegacyWalletAddress => {
            ApiError::bad_request(error.to_string()).with_details(LEGACY_SHAPE_DETAILS)
        }
        SessionTokenError::MissingAddresses => ApiError::bad_request(error.to_string()),
        SessionTokenError::InvalidAddressEntry { ref entry } => {
            let details = format!("Invalid entry: {entry}");
            ApiError::bad_request(error.to_string()).with_details(details)
        }
        SessionTokenError::Assertion(source) => {
            error!(error = %source, "failed to sign CDP assertion");
            ApiError::configuration("Failed to generate JWT token").with_details(source.to_string())
        }
        SessionTokenError::AuthenticationFailed { body } => {
            ApiError::unauthorized("Authentication failed")
                .with_details(AUTH_FAILED_DETAILS)
                .with_api_error(body)
        }
        SessionTokenError::Upstream {
            status, ref body, ..
        } => ApiError::upstream(status, error.to_string()).with_details(body.clone()),
        SessionTokenError::InvalidResponse { body } => {
            ApiError::configuration("Invalid response from CDP API").with_details(body)
        }
        SessionTokenError::Request(message) => {
            error!(error = %message, "CDP session token request failed");
            ApiError::internal()
        }
    }
}

/// Mint a session token scoped to the given addresses.
#[utoipa::path(
    post,
    path = "/api/session",
    tag = "Session",
    request_body = SessionTokenRequest,
    responses(
        (status = 200, description = "Session token payload from CDP"),
        (status = 400, description = "Missing or malformed addresses"),
        (status = 401, description = "CDP rejected the API key"),
        (status = 500, description = "Credentials missing or unusable")
    )
)]
pub async fn create_session_token(
    State(state): State<AppState>,
    payload: Result<Json<SessionTokenRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    if !state.sessions.is_configured() {
        return Err(map_provider_error(SessionTokenError::MissingCredentials));
    }
    let Json(request) = payload?;
    state
        .sessions
        .create_session_token(&request)
        .await
        .map(Json)
        .map_err(map_provider_error)
}

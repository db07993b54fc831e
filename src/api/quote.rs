// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Buy quotes.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::Value;
use tracing::error;

use crate::{
    error::ApiError, models::QuoteRequest, providers::quote::QuoteError, state::AppState,
};

fn map_provider_error(error: QuoteError) -> ApiError {
    match error {
        QuoteError::MissingField { .. } => ApiError::bad_request(error.to_string()),
        QuoteError::MissingApiKey => {
            error!("buy quote requested without an API key");
            ApiError::configuration(error.to_string())
        }
        QuoteError::Upstream { status, message } => ApiError::upstream(status, message),
        QuoteError::Request(_) | QuoteError::InvalidResponse(_) => {
            error!(error = %error, "buy quote failed");
            ApiError::internal()
        }
    }
}

/// Fetch a buy quote for the given purchase parameters.
#[utoipa::path(
    post,
    path = "/api/quote",
    tag = "Quote",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Quote payload from the quote service"),
        (status = 400, description = "Required field missing"),
        (status = 500, description = "Quote API key not configured")
    )
)]
pub async fn fetch_quote(
    State(state): State<AppState>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    state
        .quotes
        .fetch_quote(&request)
        .await
        .map(Json)
        .map_err(map_provider_error)
}

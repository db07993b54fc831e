// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Purchase catalog and form checkout.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::json;
use tracing::info;

use crate::{
    error::ApiError,
    form::{FormEvent, FormState, SubmissionError},
    models::{
        find_country, find_network, find_token, CatalogResponse, CheckoutRequest,
        CheckoutResponse,
    },
    state::AppState,
};

fn map_submission_error(failure: SubmissionError) -> ApiError {
    match failure {
        SubmissionError::InvalidAddress { error, suggestion } => {
            let details = json!({ "error": &error, "suggestion": suggestion });
            ApiError::bad_request(error).with_details(details)
        }
        other => ApiError::bad_request(other.to_string()),
    }
}

/// Builds the form state a checkout request describes.
///
/// Unlike interactive edits, values the form would not offer are rejected
/// instead of ignored.
fn form_from_request(request: CheckoutRequest) -> Result<FormState, ApiError> {
    let mut state = FormState::from_query(request.amount.as_deref(), request.wallet.as_deref());

    if let Some(symbol) = request.token {
        if find_token(&symbol).is_none() {
            return Err(ApiError::bad_request(format!("Unsupported token: {symbol}")));
        }
        state = state.apply(FormEvent::TokenSelected(symbol.clone()));
        if state.token.symbol != symbol {
            return Err(ApiError::bad_request(format!(
                "{symbol} is not available for this destination"
            )));
        }
    }

    if let Some(id) = request.network {
        if find_network(&id).is_none() {
            return Err(ApiError::bad_request(format!("Unsupported network: {id}")));
        }
        state = state.apply(FormEvent::NetworkSelected(id));
    }

    if let Some(code) = request.country {
        if !find_country(&code).is_some_and(|country| country.enabled) {
            return Err(ApiError::bad_request(format!("Unsupported country: {code}")));
        }
        state = state.apply(FormEvent::CountrySelected(code));
    }

    Ok(state)
}

/// Tokens, networks, countries and payment methods offered by the form.
#[utoipa::path(
    get,
    path = "/api/catalog",
    tag = "Onramp",
    responses(
        (status = 200, description = "Purchase catalog", body = CatalogResponse)
    )
)]
pub async fn get_catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse::current())
}

/// Validate a form submission and build the payment processor redirect.
#[utoipa::path(
    post,
    path = "/api/onramp/checkout",
    tag = "Onramp",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Redirect URL for the payment processor", body = CheckoutResponse),
        (status = 400, description = "Incomplete or inconsistent purchase")
    )
)]
pub async fn checkout(
    State(state): State<AppState>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let Json(request) = payload?;
    let form = form_from_request(request)?;
    form.validate_submission().map_err(map_submission_error)?;

    let redirect_url = form.redirect_url(&state.config.payment_redirect_url);
    info!(
        token = form.token.symbol,
        network = form.network.id,
        destination_type = form.destination_type.as_str(),
        "checkout redirect built"
    );

    Ok(Json(CheckoutResponse {
        redirect_url: redirect_url.to_string(),
        destination_type: form.destination_type.as_str().to_string(),
        display_amount: form.display_amount(),
    }))
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Email to wallet resolution through MetaKeep.

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use tracing::error;

use crate::{
    error::ApiError,
    models::{ResolveWalletRequest, ResolveWalletResponse},
    providers::metakeep::MetaKeepError,
    state::AppState,
};

fn map_provider_error(error: MetaKeepError) -> ApiError {
    match error {
        MetaKeepError::MissingEmail | MetaKeepError::InvalidEmail => {
            ApiError::bad_request(error.to_string())
        }
        MetaKeepError::MissingConfig(_) => {
            error!(error = %error, "MetaKeep is not configured");
            ApiError::configuration(error.to_string())
        }
        MetaKeepError::Upstream { status } => ApiError::upstream(status, error.to_string()),
        MetaKeepError::UnexpectedStatus(_) => {
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, error.to_string())
        }
        MetaKeepError::Request(_) | MetaKeepError::InvalidResponse(_) => {
            error!(error = %error, "MetaKeep getWallet failed");
            ApiError::internal()
        }
    }
}

/// Resolve (or create) the wallet bound to an email address.
#[utoipa::path(
    post,
    path = "/api/metakeep",
    tag = "Wallet",
    request_body = ResolveWalletRequest,
    responses(
        (status = 200, description = "Wallet addresses for the email", body = ResolveWalletResponse),
        (status = 400, description = "Missing or malformed email"),
        (status = 500, description = "Service misconfigured or upstream status not SUCCESS")
    )
)]
pub async fn resolve_wallet(
    State(state): State<AppState>,
    payload: Result<Json<ResolveWalletRequest>, JsonRejection>,
) -> Result<Json<ResolveWalletResponse>, ApiError> {
    let Json(request) = payload?;
    let wallet = state
        .metakeep
        .get_wallet(request.email.as_deref())
        .await
        .map_err(map_provider_error)?;

    let address = request
        .network
        .as_deref()
        .and_then(|network| wallet.address_for_network(network))
        .map(str::to_string);

    Ok(Json(ResolveWalletResponse {
        status: "success".to_string(),
        wallet,
        address,
    }))
}

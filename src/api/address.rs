// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Destination address validation.

use axum::{extract::rejection::JsonRejection, Json};

use crate::{
    address::{self, AddressValidation},
    error::ApiError,
    models::{NetworkFormat, ValidateAddressRequest},
};

/// Validate an address for a network.
///
/// Invalid addresses are a normal outcome and return 200 with
/// `valid: false`.
#[utoipa::path(
    post,
    path = "/api/address/validate",
    tag = "Address",
    request_body = ValidateAddressRequest,
    responses(
        (status = 200, description = "Validation outcome", body = AddressValidation)
    )
)]
pub async fn validate_address(
    payload: Result<Json<ValidateAddressRequest>, JsonRejection>,
) -> Result<Json<AddressValidation>, ApiError> {
    let Json(request) = payload?;
    Ok(Json(address::validate(&request.address, &request.network)))
}

/// List every network with a known address format.
#[utoipa::path(
    get,
    path = "/api/address/networks",
    tag = "Address",
    responses(
        (status = 200, description = "Known address formats", body = [NetworkFormat])
    )
)]
pub async fn list_network_formats() -> Json<Vec<NetworkFormat>> {
    Json(
        address::known_networks()
            .map(|rule| NetworkFormat {
                ids: rule.ids.to_vec(),
                description: rule.description,
                example: rule.example,
            })
            .collect(),
    )
}

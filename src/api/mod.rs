// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    address::AddressValidation,
    models::{
        CatalogDefaults, CatalogResponse, CheckoutRequest, CheckoutResponse, Country, Network,
        NetworkFormat, PaymentMethod, QuoteRequest, ResolveWalletRequest, ResolveWalletResponse,
        SessionTokenRequest, Token, ValidateAddressRequest,
    },
    state::AppState,
};

pub mod address;
pub mod health;
pub mod onramp;
pub mod quote;
pub mod session;
pub mod wallet;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/metakeep", post(wallet::resolve_wallet))
        .route("/session", post(session::create_session_token))
        .route("/quote", post(quote::fetch_quote))
        .route("/address/validate", post(address::validate_address))
        .route("/address/networks", get(address::list_network_formats))
        .route("/catalog", get(onramp::get_catalog))
        .route("/onramp/checkout", post(onramp::checkout));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        wallet::resolve_wallet,
        session::create_session_token,
        quote::fetch_quote,
        address::validate_address,
        address::list_network_formats,
        onramp::get_catalog,
        onramp::checkout
    ),
    components(
        schemas(
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse,
            ResolveWalletRequest,
            ResolveWalletResponse,
            SessionTokenRequest,
            QuoteRequest,
            ValidateAddressRequest,
            AddressValidation,
            NetworkFormat,
            CatalogResponse,
            CatalogDefaults,
            Token,
            Network,
            Country,
            PaymentMethod,
            CheckoutRequest,
            CheckoutResponse
        )
    ),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Wallet", description = "Email to wallet resolution"),
        (name = "Session", description = "Onramp session tokens"),
        (name = "Quote", description = "Buy quotes"),
        (name = "Address", description = "Destination address validation"),
        (name = "Onramp", description = "Purchase catalog and checkout")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        app_with(AppConfig::default())
    }

    fn app_with(config: AppConfig) -> Router {
        router(AppState::new(config).unwrap())
    }

    fn cdp_config() -> AppConfig {
        AppConfig::from_lookup(|name| match name {
            "KEY_NAME" => Some("key".into()),
            "KEY_SECRET" => Some("not-a-key".into()),
            _ => None,
        })
        .unwrap()
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        send_to(app(), request).await
    }

    async fn send_to(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn liveness_route_responds() {
        let (status, body) = send(Request::get("/health/live").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn validate_route_returns_diagnostics() {
        let (status, body) = send(post_json(
            "/api/address/validate",
            json!({ "address": "not-an-address", "network": "solana" }),
        ))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], json!(false));
        assert_eq!(body["error"], json!("Invalid address format for solana network"));
    }

    #[tokio::test]
    async fn metakeep_route_rejects_bad_email() {
        let (status, body) = send(post_json("/api/metakeep", json!({ "email": "nope" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid email format" }));
    }

    fn malformed_session_request() -> Request<Body> {
        Request::post("/api/session")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap()
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, body) = send_to(app_with(cdp_config()), malformed_session_request()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn missing_cdp_credentials_win_over_malformed_body() {
        let (status, body) = send(malformed_session_request()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Missing CDP API credentials"));
    }

    #[tokio::test]
    async fn catalog_route_lists_tokens() {
        let (status, body) = send(Request::get("/api/catalog").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["defaults"]["token"], json!("USDC"));
        assert_eq!(body["tokens"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn openapi_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/metakeep",
            "/api/session",
            "/api/quote",
            "/api/address/validate",
            "/api/address/networks",
            "/api/catalog",
            "/api/onramp/checkout",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing from docs");
        }
    }
}

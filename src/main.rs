// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{error::Error, net::SocketAddr, time::Duration};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use onramp_gateway::{api::router, config::AppConfig, state::AppState, telemetry};

const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env file is not an error.
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    telemetry::init_tracing(config.log_format)?;

    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "failed to install rustls crypto provider")?;

    if config.cdp_credentials.is_none() {
        warn!("KEY_NAME/KEY_SECRET not set; /api/session will fail");
    }
    if config.metakeep_api_key.is_none() {
        warn!("METAKEEP_API_KEY not set; /api/metakeep will fail");
    }
    if config.quote_api_key.is_none() {
        warn!("CDP_CLIENT_API_KEY not set; /api/quote will fail");
    }

    let addr: SocketAddr = config.bind_address().parse()?;
    let tls = config.tls.clone();
    let app = router(AppState::new(config)?);

    match tls {
        Some(paths) => {
            let tls_config = RustlsConfig::from_pem_file(&paths.cert_path, &paths.key_path).await?;
            let handle = Handle::new();
            let shutdown_handle = handle.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE_PERIOD));
            });

            info!(address = %addr, "Onramp gateway listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            let listener = TcpListener::bind(addr).await?;
            info!(address = %addr, "Onramp gateway listening on http (docs at /docs)");
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{
    config::AppConfig,
    providers::{
        http_client, metakeep::MetaKeepClient, quote::QuoteClient, session::SessionTokenClient,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub metakeep: MetaKeepClient,
    pub sessions: SessionTokenClient,
    pub quotes: QuoteClient,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, reqwest::Error> {
        let http = http_client()?;
        Ok(Self {
            metakeep: MetaKeepClient::new(&config, http.clone()),
            sessions: SessionTokenClient::new(&config, http.clone()),
            quotes: QuoteClient::new(&config, http),
            config: Arc::new(config),
        })
    }
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! All settings are read from the environment once, at startup, into an
//! [`AppConfig`] that is shared through application state. Blank values are
//! treated as unset. Credentials are optional at startup: a route whose
//! credentials are missing fails per request with a configuration error
//! instead of preventing the process from starting.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `KEY_NAME` / `CDP_API_KEY` | CDP API key name (session tokens) | Required for `/api/session` |
//! | `KEY_SECRET` / `CDP_API_SECRET` | CDP API key secret (PEM or base64 Ed25519) | Required for `/api/session` |
//! | `METAKEEP_API_KEY` | MetaKeep API key (wallet resolution) | Required for `/api/metakeep` |
//! | `CDP_CLIENT_API_KEY` / `ONRAMP_QUOTE_API_KEY` | Bearer key for buy quotes | Required for `/api/quote` |
//! | `CDP_API_BASE_URL` | CDP API origin | `https://api.developer.coinbase.com` |
//! | `METAKEEP_API_BASE_URL` | MetaKeep API origin | `https://api.metakeep.xyz` |
//! | `PAYMENT_REDIRECT_URL` | Payment processor checkout URL | `https://pay.coinbase.com/buy/select-asset` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | PEM files; HTTPS is served when both are set | Unset (plain HTTP) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! Where two names are listed, the first wins and the second is the legacy
//! alias.

use std::fmt;

use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const KEY_NAME_ENV: &str = "KEY_NAME";
pub const KEY_NAME_LEGACY_ENV: &str = "CDP_API_KEY";
pub const KEY_SECRET_ENV: &str = "KEY_SECRET";
pub const KEY_SECRET_LEGACY_ENV: &str = "CDP_API_SECRET";
pub const METAKEEP_API_KEY_ENV: &str = "METAKEEP_API_KEY";
pub const QUOTE_API_KEY_ENV: &str = "CDP_CLIENT_API_KEY";
pub const QUOTE_API_KEY_LEGACY_ENV: &str = "ONRAMP_QUOTE_API_KEY";
pub const CDP_API_BASE_URL_ENV: &str = "CDP_API_BASE_URL";
pub const METAKEEP_API_BASE_URL_ENV: &str = "METAKEEP_API_BASE_URL";
pub const PAYMENT_REDIRECT_URL_ENV: &str = "PAYMENT_REDIRECT_URL";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_CDP_API_BASE_URL: &str = "https://api.developer.coinbase.com";
pub const DEFAULT_METAKEEP_API_BASE_URL: &str = "https://api.metakeep.xyz";
pub const DEFAULT_PAYMENT_REDIRECT_URL: &str = "https://pay.coinbase.com/buy/select-asset";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },

    #[error("{present} is set but {missing} is not; both are required to serve TLS")]
    IncompleteTls {
        present: &'static str,
        missing: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// CDP API key pair used to sign session token assertions.
#[derive(Clone, PartialEq, Eq)]
pub struct CdpCredentials {
    pub key_name: String,
    pub key_secret: String,
}

impl fmt::Debug for CdpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CdpCredentials")
            .field("key_name", &self.key_name)
            .field("key_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert_path: String,
    pub key_path: String,
}

#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub cdp_credentials: Option<CdpCredentials>,
    pub metakeep_api_key: Option<String>,
    pub quote_api_key: Option<String>,
    pub cdp_api_base_url: Url,
    pub metakeep_api_base_url: Url,
    pub payment_redirect_url: Url,
    pub tls: Option<TlsPaths>,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("log_format", &self.log_format)
            .field("cdp_credentials", &self.cdp_credentials)
            .field("metakeep_api_key", &self.metakeep_api_key.as_ref().map(|_| "<redacted>"))
            .field("quote_api_key", &self.quote_api_key.as_ref().map(|_| "<redacted>"))
            .field("cdp_api_base_url", &self.cdp_api_base_url.as_str())
            .field("metakeep_api_base_url", &self.metakeep_api_base_url.as_str())
            .field("payment_redirect_url", &self.payment_redirect_url.as_str())
            .field("tls", &self.tls)
            .finish()
    }
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let get_with_alias = |name: &str, alias: &str| get(name).or_else(|| get(alias));

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = get(PORT_ENV)
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let log_format = match get(LOG_FORMAT_ENV).as_deref() {
            Some(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let cdp_credentials = match (
            get_with_alias(KEY_NAME_ENV, KEY_NAME_LEGACY_ENV),
            get_with_alias(KEY_SECRET_ENV, KEY_SECRET_LEGACY_ENV),
        ) {
            (Some(key_name), Some(key_secret)) => Some(CdpCredentials {
                key_name,
                key_secret,
            }),
            _ => None,
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert_path), Some(key_path)) => Some(TlsPaths {
                cert_path,
                key_path,
            }),
            (Some(_), None) => {
                return Err(ConfigError::IncompleteTls {
                    present: TLS_CERT_PATH_ENV,
                    missing: TLS_KEY_PATH_ENV,
                })
            }
            (None, Some(_)) => {
                return Err(ConfigError::IncompleteTls {
                    present: TLS_KEY_PATH_ENV,
                    missing: TLS_CERT_PATH_ENV,
                })
            }
            (None, None) => None,
        };

        Ok(Self {
            host,
            port,
            log_format,
            cdp_credentials,
            metakeep_api_key: get(METAKEEP_API_KEY_ENV),
            quote_api_key: get_with_alias(QUOTE_API_KEY_ENV, QUOTE_API_KEY_LEGACY_ENV),
            cdp_api_base_url: parse_url(
                CDP_API_BASE_URL_ENV,
                get(CDP_API_BASE_URL_ENV).as_deref(),
                DEFAULT_CDP_API_BASE_URL,
            )?,
            metakeep_api_base_url: parse_url(
                METAKEEP_API_BASE_URL_ENV,
                get(METAKEEP_API_BASE_URL_ENV).as_deref(),
                DEFAULT_METAKEEP_API_BASE_URL,
            )?,
            payment_redirect_url: parse_url(
                PAYMENT_REDIRECT_URL_ENV,
                get(PAYMENT_REDIRECT_URL_ENV).as_deref(),
                DEFAULT_PAYMENT_REDIRECT_URL,
            )?,
            tls,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for AppConfig {
    /// Defaults with no credentials configured.
    fn default() -> Self {
        Self::from_lookup(|_| None).expect("built-in defaults are valid")
    }
}

fn parse_url(name: &'static str, value: Option<&str>, default: &str) -> Result<Url, ConfigError> {
    Url::parse(value.unwrap_or(default)).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Static purchase catalog (tokens, networks, countries, payment methods) and
//! the request/response structures of the REST API. Catalog entries are
//! `'static` and immutable; API types derive `ToSchema` for the OpenAPI
//! document.
//!
//! ## Model Categories
//!
//! - **Catalog**: networks, tokens, countries and payment methods offered by the form
//! - **Wallet**: per-ecosystem addresses resolved from an email
//! - **Session**: onramp session token requests
//! - **Quote**: buy quote requests
//! - **Checkout**: form submission and redirect response

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Catalog
// =============================================================================

/// A blockchain network the form can settle on.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
pub struct Network {
    /// Stable identifier (e.g. "solana"), also the classifier key.
    pub id: &'static str,
    pub name: &'static str,
    pub display_name: &'static str,
}

/// A purchasable token and the networks it settles on.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
pub struct Token {
    pub symbol: &'static str,
    pub name: &'static str,
    #[schema(value_type = Vec<String>)]
    pub networks: &'static [&'static str],
}

impl Token {
    pub fn settles_on(&self, network_id: &str) -> bool {
        self.networks.contains(&network_id)
    }
}

/// A country the payment processor may be used from.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
pub struct Country {
    /// ISO-like code sent to the payment processor.
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
    /// Fiat currency used in this country.
    pub currency: &'static str,
    /// `false` for countries shown as "coming soon".
    pub enabled: bool,
}

/// A way of paying for the purchase.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
pub struct PaymentMethod {
    pub id: &'static str,
    pub label: &'static str,
    pub enabled: bool,
}

pub const SUPPORTED_NETWORKS: &[Network] = &[
    Network {
        id: "ethereum",
        name: "Ethereum",
        display_name: "Ethereum",
    },
    Network {
        id: "solana",
        name: "Solana",
        display_name: "Solana",
    },
    Network {
        id: "polygon",
        name: "Polygon",
        display_name: "Polygon",
    },
    Network {
        id: "base",
        name: "Base",
        display_name: "Base",
    },
    Network {
        id: "arbitrum",
        name: "Arbitrum",
        display_name: "Arbitrum",
    },
];

pub const SUPPORTED_TOKENS: &[Token] = &[
    Token {
        symbol: "USDC",
        name: "USD Coin",
        networks: &["ethereum", "solana", "polygon", "base", "arbitrum"],
    },
    Token {
        symbol: "ETH",
        name: "Ethereum",
        networks: &["ethereum", "arbitrum", "base"],
    },
    Token {
        symbol: "SOL",
        name: "Solana",
        networks: &["solana"],
    },
    Token {
        symbol: "MATIC",
        name: "Polygon",
        networks: &["polygon"],
    },
    Token {
        symbol: "USDT",
        name: "Tether",
        networks: &["ethereum", "solana"],
    },
];

pub const SUPPORTED_COUNTRIES: &[Country] = &[
    Country {
        code: "US",
        name: "United States",
        flag: "🇺🇸",
        currency: "USD",
        enabled: true,
    },
    Country {
        code: "CA",
        name: "Canada",
        flag: "🇨🇦",
        currency: "CAD",
        enabled: false,
    },
    Country {
        code: "GB",
        name: "United Kingdom",
        flag: "🇬🇧",
        currency: "GBP",
        enabled: false,
    },
    Country {
        code: "EU",
        name: "European Union",
        flag: "🇪🇺",
        currency: "EUR",
        enabled: false,
    },
    Country {
        code: "AU",
        name: "Australia",
        flag: "🇦🇺",
        currency: "AUD",
        enabled: false,
    },
    Country {
        code: "JP",
        name: "Japan",
        flag: "🇯🇵",
        currency: "JPY",
        enabled: false,
    },
    Country {
        code: "KR",
        name: "South Korea",
        flag: "🇰🇷",
        currency: "KRW",
        enabled: false,
    },
    Country {
        code: "SG",
        name: "Singapore",
        flag: "🇸🇬",
        currency: "SGD",
        enabled: false,
    },
    Country {
        code: "IN",
        name: "India",
        flag: "🇮🇳",
        currency: "INR",
        enabled: false,
    },
    Country {
        code: "MX",
        name: "Mexico",
        flag: "🇲🇽",
        currency: "MXN",
        enabled: false,
    },
];

pub const PAYMENT_METHODS: &[PaymentMethod] = &[
    PaymentMethod {
        id: "debitCard",
        label: "Debit card",
        enabled: true,
    },
    PaymentMethod {
        id: "creditCard",
        label: "Credit card",
        enabled: false,
    },
    PaymentMethod {
        id: "bankTransfer",
        label: "Bank transfer",
        enabled: false,
    },
];

pub const DEFAULT_TOKEN: &Token = &SUPPORTED_TOKENS[0];
pub const DEFAULT_NETWORK: &Network = &SUPPORTED_NETWORKS[1];
pub const DEFAULT_COUNTRY: &Country = &SUPPORTED_COUNTRIES[0];
pub const DEFAULT_PAYMENT_METHOD: &PaymentMethod = &PAYMENT_METHODS[0];
pub const DEFAULT_AMOUNT: &str = "100";

/// Quick-pick amounts offered next to the amount input.
pub const AMOUNT_PRESETS: [u32; 4] = [50, 100, 500, 1000];

pub fn find_token(symbol: &str) -> Option<&'static Token> {
    SUPPORTED_TOKENS.iter().find(|token| token.symbol == symbol)
}

pub fn find_network(id: &str) -> Option<&'static Network> {
    SUPPORTED_NETWORKS.iter().find(|network| network.id == id)
}

pub fn find_country(code: &str) -> Option<&'static Country> {
    SUPPORTED_COUNTRIES.iter().find(|country| country.code == code)
}

/// Catalog snapshot returned by `GET /api/catalog`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogResponse {
    pub tokens: Vec<Token>,
    pub networks: Vec<Network>,
    pub countries: Vec<Country>,
    pub payment_methods: Vec<PaymentMethod>,
    pub amount_presets: Vec<u32>,
    pub defaults: CatalogDefaults,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CatalogDefaults {
    pub token: &'static str,
    pub network: &'static str,
    pub country: &'static str,
    pub payment_method: &'static str,
    pub amount: &'static str,
}

impl CatalogResponse {
    pub fn current() -> Self {
        Self {
            tokens: SUPPORTED_TOKENS.to_vec(),
            networks: SUPPORTED_NETWORKS.to_vec(),
            countries: SUPPORTED_COUNTRIES.to_vec(),
            payment_methods: PAYMENT_METHODS.to_vec(),
            amount_presets: AMOUNT_PRESETS.to_vec(),
            defaults: CatalogDefaults {
                token: DEFAULT_TOKEN.symbol,
                network: DEFAULT_NETWORK.id,
                country: DEFAULT_COUNTRY.code,
                payment_method: DEFAULT_PAYMENT_METHOD.id,
                amount: DEFAULT_AMOUNT,
            },
        }
    }
}

// =============================================================================
// Wallet Models
// =============================================================================

/// Addresses held by the custody service for one email.
///
/// Passed through unchanged; unknown fields returned by the custody service
/// are kept in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// EVM-style address shared by every EVM network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eth_address: Option<String>,
    /// Solana address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sol_address: Option<String>,
    /// EOS address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eos_address: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Wallet {
    /// Picks the wallet address to fund on `network`.
    ///
    /// Solana uses `solAddress`; every other network, known EVM or not,
    /// falls back to `ethAddress`.
    pub fn address_for_network(&self, network: &str) -> Option<&str> {
        if network.eq_ignore_ascii_case("solana") {
            self.sol_address.as_deref()
        } else {
            self.eth_address.as_deref()
        }
    }
}

/// Request body for `POST /api/metakeep`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResolveWalletRequest {
    #[serde(default)]
    pub email: Option<String>,
    /// Network the form is funding; selects `address` in the response.
    #[serde(default)]
    pub network: Option<String>,
}

/// Response body for `POST /api/metakeep`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ResolveWalletResponse {
    /// Always `"success"`.
    pub status: String,
    #[schema(value_type = Object)]
    pub wallet: Wallet,
    /// Destination address for the requested network, when one was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

// =============================================================================
// Session Token Models
// =============================================================================

/// One destination the session token is scoped to.
///
/// Kept as received so that fields beyond `address` and `blockchains` reach
/// CDP unchanged and malformed entries can be echoed back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SessionAddress(pub serde_json::Value);

impl SessionAddress {
    pub fn new(address: &str, blockchains: &[&str]) -> Self {
        Self(serde_json::json!({ "address": address, "blockchains": blockchains }))
    }

    pub fn address(&self) -> Option<&str> {
        self.0.get("address").and_then(serde_json::Value::as_str)
    }

    pub fn blockchains(&self) -> Option<&[serde_json::Value]> {
        self.0
            .get("blockchains")
            .and_then(serde_json::Value::as_array)
            .map(Vec::as_slice)
    }

    /// A non-empty address string and at least one blockchain.
    pub fn is_complete(&self) -> bool {
        self.address().is_some_and(|address| !address.is_empty())
            && self.blockchains().is_some_and(|chains| !chains.is_empty())
    }
}

/// Request body for `POST /api/session`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokenRequest {
    #[serde(default)]
    #[schema(value_type = Option<Vec<Object>>)]
    pub addresses: Option<Vec<SessionAddress>>,
    /// Optional asset symbols to restrict the session to.
    #[serde(default)]
    pub assets: Option<Vec<String>>,
    /// Pre-`addresses` request shape; rejected with a migration hint.
    #[serde(default)]
    pub wallet_address: Option<String>,
}

// =============================================================================
// Quote Models
// =============================================================================

/// Request body for `POST /api/quote`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct QuoteRequest {
    /// Token to buy (e.g. "USDC").
    pub purchase_currency: String,
    /// Fiat amount as a decimal string.
    pub payment_amount: String,
    /// Fiat currency (e.g. "USD").
    pub payment_currency: String,
    /// Payment method identifier (e.g. "CARD").
    pub payment_method: String,
    /// Country code (e.g. "US").
    pub country: String,
    /// Optional state/province code; blank values are not forwarded.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub subdivision: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().unwrap_or_default().is_empty()
}

// =============================================================================
// Address Models
// =============================================================================

/// Request body for `POST /api/address/validate`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ValidateAddressRequest {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub network: String,
}

/// One entry of `GET /api/address/networks`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct NetworkFormat {
    /// Every identifier sharing this address grammar.
    #[schema(value_type = Vec<String>)]
    pub ids: Vec<&'static str>,
    pub description: &'static str,
    pub example: &'static str,
}

// =============================================================================
// Checkout Models
// =============================================================================

/// Request body for `POST /api/onramp/checkout`.
///
/// Missing fields fall back to the form defaults.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub amount: Option<String>,
    pub token: Option<String>,
    pub network: Option<String>,
    /// Email or wallet address.
    pub wallet: Option<String>,
    pub country: Option<String>,
}

/// Response body for `POST /api/onramp/checkout`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CheckoutResponse {
    /// Fully encoded payment processor URL to navigate to.
    pub redirect_url: String,
    /// "email" or "address".
    pub destination_type: String,
    /// Amount formatted for the purchase button.
    pub display_amount: String,
}

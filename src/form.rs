// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Purchase Form
//!
//! State of one purchase form editing session, driven by [`FormEvent`]s
//! through the pure transition [`FormState::apply`].
//!
//! The destination decides which tokens are offered: an email leaves the
//! catalog unrestricted, an EVM address keeps tokens that settle on at least
//! one EVM network and a Solana address keeps tokens that settle on Solana.
//! Submission turns the state into the payment processor redirect URL.

use url::Url;

use crate::{
    address::{self, AddressFamily},
    models::{
        find_country, find_network, Country, Network, PaymentMethod, Token, DEFAULT_AMOUNT,
        DEFAULT_COUNTRY, DEFAULT_NETWORK, DEFAULT_PAYMENT_METHOD, DEFAULT_TOKEN,
        SUPPORTED_TOKENS,
    },
};

const SOLANA_NETWORK: &str = "solana";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationType {
    Email,
    Address,
}

impl DestinationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Address => "address",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    TokenSelected(String),
    NetworkSelected(String),
    AmountChanged(String),
    DestinationChanged(String),
    CountrySelected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("Amount is required")]
    MissingAmount,

    #[error("Amount must be a decimal number")]
    InvalidAmount,

    #[error("Wallet address or email is required")]
    MissingDestination,

    #[error("{token} is not available on {network}")]
    UnsupportedPair {
        token: &'static str,
        network: &'static str,
    },

    #[error("{error}")]
    InvalidAddress {
        error: String,
        suggestion: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub token: &'static Token,
    pub network: &'static Network,
    pub amount: String,
    pub destination_type: DestinationType,
    pub destination: String,
    pub payment_method: &'static PaymentMethod,
    pub country: &'static Country,
    /// Tokens compatible with the current destination.
    pub available_tokens: Vec<&'static Token>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            token: DEFAULT_TOKEN,
            network: DEFAULT_NETWORK,
            amount: DEFAULT_AMOUNT.to_string(),
            destination_type: DestinationType::Email,
            destination: String::new(),
            payment_method: DEFAULT_PAYMENT_METHOD,
            country: DEFAULT_COUNTRY,
            available_tokens: SUPPORTED_TOKENS.iter().collect(),
        }
    }
}

impl FormState {
    /// Initial state for a form opened with `?amount=..&wallet=..`.
    pub fn from_query(amount: Option<&str>, wallet: Option<&str>) -> Self {
        let mut state = Self::default();
        if let Some(amount) = amount {
            state.amount = amount.to_string();
        }
        match wallet {
            Some(wallet) => state.apply(FormEvent::DestinationChanged(wallet.to_string())),
            None => state,
        }
    }

    /// Applies one event. Values the form would not offer leave the state
    /// unchanged.
    pub fn apply(mut self, event: FormEvent) -> Self {
        match event {
            FormEvent::TokenSelected(symbol) => {
                if let Some(token) = self.available_tokens.iter().find(|t| t.symbol == symbol) {
                    self.token = *token;
                }
            }
            FormEvent::NetworkSelected(id) => {
                if let Some(network) = find_network(&id) {
                    self.network = network;
                }
            }
            FormEvent::AmountChanged(text) => {
                if accepts_amount_input(&text) {
                    self.amount = text;
                }
            }
            FormEvent::DestinationChanged(text) => {
                let (destination_type, available_tokens) = classify_destination(&text);
                self.destination_type = destination_type;
                self.destination = text;
                if !available_tokens.contains(&self.token) {
                    if let Some(first) = available_tokens.first() {
                        self.token = *first;
                    }
                }
                self.available_tokens = available_tokens;
            }
            FormEvent::CountrySelected(code) => {
                if let Some(country) = find_country(&code).filter(|country| country.enabled) {
                    self.country = country;
                }
            }
        }
        self
    }

    pub fn can_submit(&self) -> bool {
        !self.destination.trim().is_empty() && !self.amount.is_empty()
    }

    /// Checks the state before it is handed to the payment processor.
    pub fn validate_submission(&self) -> Result<(), SubmissionError> {
        if !self.can_submit() {
            return Err(if self.amount.is_empty() {
                SubmissionError::MissingAmount
            } else {
                SubmissionError::MissingDestination
            });
        }
        if !is_decimal_amount(&self.amount) {
            return Err(SubmissionError::InvalidAmount);
        }
        let destination = self.destination.trim();
        if !self.token.settles_on(self.network.id) {
            return Err(SubmissionError::UnsupportedPair {
                token: self.token.symbol,
                network: self.network.id,
            });
        }

        if !destination.contains('@') {
            let validation = address::validate(destination, self.network.id);
            if !validation.valid {
                return Err(SubmissionError::InvalidAddress {
                    error: validation.error.unwrap_or_default(),
                    suggestion: validation.suggestion,
                });
            }
        }
        Ok(())
    }

    /// Payment processor URL carrying the purchase parameters.
    pub fn redirect_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut()
            .append_pair("amount", &self.amount)
            .append_pair("token", self.token.symbol)
            .append_pair("network", self.network.id)
            .append_pair("wallet", self.destination.trim())
            .append_pair("country", self.country.code);
        url
    }

    /// Amount as shown on the purchase button.
    pub fn display_amount(&self) -> String {
        format_amount_for_display(&self.amount)
    }
}

/// Destination type and the tokens it allows.
///
/// Unrecognised text keeps the email type and the full catalog.
pub fn classify_destination(text: &str) -> (DestinationType, Vec<&'static Token>) {
    let text = text.trim();
    if text.contains('@') {
        return (DestinationType::Email, SUPPORTED_TOKENS.iter().collect());
    }

    match address::detect_address_family(text) {
        Some(AddressFamily::Evm) => (
            DestinationType::Address,
            SUPPORTED_TOKENS
                .iter()
                .filter(|token| token.networks.iter().any(|n| *n != SOLANA_NETWORK))
                .collect(),
        ),
        Some(AddressFamily::Solana) => (
            DestinationType::Address,
            SUPPORTED_TOKENS
                .iter()
                .filter(|token| token.settles_on(SOLANA_NETWORK))
                .collect(),
        ),
        None => (DestinationType::Email, SUPPORTED_TOKENS.iter().collect()),
    }
}

/// Accepts digits with at most one decimal point (the empty string included).
pub fn accepts_amount_input(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_digit() || c == '.') && text.matches('.').count() <= 1
}

fn is_decimal_amount(text: &str) -> bool {
    accepts_amount_input(text) && text.parse::<f64>().is_ok()
}

/// Amount text for display. Text that is not a decimal number is returned
/// as is.
pub fn format_amount_for_display(amount: &str) -> String {
    if amount.is_empty() {
        return "0.00".to_string();
    }
    if !is_decimal_amount(amount) {
        return amount.to_string();
    }
    let value: f64 = match amount.parse() {
        Ok(value) => value,
        Err(_) => return amount.to_string(),
    };
    if value >= 1_000_000.0 {
        return format!("{:.2}M", value / 1_000_000.0);
    }

    let fixed = format!("{:.2}", value.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}

// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Address Classification
//!
//! Decides whether a destination address is syntactically plausible for a
//! given network and supplies the diagnostic text shown to users.
//!
//! Network identifiers are matched case-insensitively against the table in
//! [`rules`]. Unknown networks are **accepted** (fail-open) and logged at
//! `warn` level. Classification never errors: malformed input simply yields
//! `false` or an invalid [`AddressValidation`].

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

mod rules;

pub use rules::NetworkRule;

const UNKNOWN_NETWORK_DESCRIPTION: &str = "Valid address for the selected network";

static EVM_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(rules::EVM_PATTERN).expect("static EVM pattern compiles"));
static SOLANA_ADDRESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(rules::SOLANA_PATTERN).expect("static Solana pattern compiles"));

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AddressValidation {
    /// Whether the address satisfies the network's grammar.
    pub valid: bool,
    /// Short reason when invalid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Expected format and example address when invalid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl AddressValidation {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
            suggestion: None,
        }
    }

    fn invalid(error: impl Into<String>, suggestion: Option<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
            suggestion,
        }
    }
}

/// Address family recognised from the text alone, without a network hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    Evm,
    Solana,
}

/// Returns whether `address` is plausible for `network`.
///
/// Empty inputs are rejected. Unknown networks are accepted.
pub fn is_valid_for_network(address: &str, network: &str) -> bool {
    if address.is_empty() || network.is_empty() {
        return false;
    }

    match rules::rule_for(network) {
        Some(rule) => rule.matches(address.trim()),
        None => {
            warn!(network = %network, "Unknown network for validation; accepting address");
            true
        }
    }
}

pub fn format_description(network: &str) -> &'static str {
    rules::rule_for(network)
        .map(|rule| rule.description)
        .unwrap_or(UNKNOWN_NETWORK_DESCRIPTION)
}

pub fn example_address(network: &str) -> &'static str {
    rules::rule_for(network)
        .map(|rule| rule.example)
        .unwrap_or("")
}

/// Validates an address and explains the expected format on failure.
pub fn validate(address: &str, network: &str) -> AddressValidation {
    if address.is_empty() {
        return AddressValidation::invalid("Address is required", None);
    }
    if network.is_empty() {
        return AddressValidation::invalid("Network is required", None);
    }

    if is_valid_for_network(address, network) {
        return AddressValidation::ok();
    }

    let mut suggestion = format!("Expected: {}", format_description(network));
    let example = example_address(network);
    if !example.is_empty() {
        suggestion.push_str("\nExample: ");
        suggestion.push_str(example);
    }

    AddressValidation::invalid(
        format!("Invalid address format for {network} network"),
        Some(suggestion),
    )
}

/// Classifies an address as EVM- or Solana-style by pattern alone.
///
/// The EVM pattern is tried first; anything starting with `0x` is never
/// reported as Solana.
pub fn detect_address_family(address: &str) -> Option<AddressFamily> {
    if EVM_ADDRESS.is_match(address) {
        return Some(AddressFamily::Evm);
    }
    if SOLANA_ADDRESS.is_match(address) && !address.starts_with("0x") {
        return Some(AddressFamily::Solana);
    }
    None
}

/// Every entry of the network table, in declaration order.
pub fn known_networks() -> impl Iterator<Item = &'static NetworkRule> {
    rules::RULES.iter()
}

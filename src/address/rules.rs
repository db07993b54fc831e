// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-network address grammar table.
//!
//! Each entry covers one address family and lists every network identifier
//! that shares it. An address is valid for an entry when any of its patterns
//! matches the trimmed input and it does not start with a rejected prefix.

use std::sync::LazyLock;

use regex::Regex;

pub(crate) const EVM_PATTERN: &str = r"^0x[a-fA-F0-9]{40}$";
pub(crate) const SOLANA_PATTERN: &str = r"^[1-9A-HJ-NP-Za-km-z]{32,44}$";
const BASE58_LEGACY_PATTERN: &str = r"^[13][a-km-zA-HJ-NP-Z1-9]{25,34}$";

const EVM_NETWORKS: &[&str] = &[
    "ethereum",
    "base",
    "optimism",
    "arbitrum",
    "polygon",
    "avalanche-c-chain",
    "binance-smart-chain",
    "bnb-chain",
    "binance-chain",
    "fantom",
    "cronos",
    "gnosis",
    "celo",
    "moonbeam",
    "harmony",
    "unichain",
];

/// Grammar, description and example for one address family.
#[derive(Debug)]
pub struct NetworkRule {
    /// Lowercase network identifiers sharing this grammar.
    pub ids: &'static [&'static str],
    /// Human-readable format description.
    pub description: &'static str,
    /// Address that satisfies the grammar.
    pub example: &'static str,
    patterns: Vec<Regex>,
    rejected_prefix: Option<&'static str>,
}

impl NetworkRule {
    fn new(
        ids: &'static [&'static str],
        patterns: &[&str],
        description: &'static str,
        example: &'static str,
    ) -> Self {
        Self {
            ids,
            description,
            example,
            patterns: patterns
                .iter()
                .map(|pattern| Regex::new(pattern).expect("static address pattern compiles"))
                .collect(),
            rejected_prefix: None,
        }
    }

    fn rejecting_prefix(mut self, prefix: &'static str) -> Self {
        self.rejected_prefix = Some(prefix);
        self
    }

    /// Checks an already-trimmed address against this grammar.
    pub fn matches(&self, address: &str) -> bool {
        if let Some(prefix) = self.rejected_prefix {
            if address.starts_with(prefix) {
                return false;
            }
        }
        self.patterns.iter().any(|pattern| pattern.is_match(address))
    }

    /// Primary identifier, used for listings.
    pub fn id(&self) -> &'static str {
        self.ids[0]
    }
}

pub(crate) static RULES: LazyLock<Vec<NetworkRule>> = LazyLock::new(|| {
    vec![
        NetworkRule::new(
            EVM_NETWORKS,
            &[EVM_PATTERN],
            "Ethereum-style address (0x followed by 40 hexadecimal characters)",
            "0x742d35Cc6634C0532925a3b8D96cF1B8FdB1f3b4",
        ),
        NetworkRule::new(
            &["solana"],
            &[SOLANA_PATTERN],
            "Solana address (32-44 base58 characters, no 0x prefix)",
            "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM",
        )
        .rejecting_prefix("0x"),
        NetworkRule::new(
            &["bitcoin", "bitcoin-lightning"],
            &[BASE58_LEGACY_PATTERN, r"^bc1[a-z0-9]{39,59}$"],
            "Bitcoin address (starts with 1, 3, or bc1)",
            "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa",
        ),
        NetworkRule::new(
            &["cardano"],
            &[r"^addr1[a-z0-9]{98}$"],
            "Cardano address (starts with addr1)",
            "addr1qx2fxv2umyhttkxyxp8x0dlpdt3k6cwng5pxj3jhsydzer3n0d3vllmyqwsx5wktcd8cc3sq835lu7drv2xwl2wywfgse35a3x",
        ),
        NetworkRule::new(
            &["polkadot"],
            &[r"^1[a-zA-Z0-9]{47}$"],
            "Polkadot address (SS58 format, typically starts with 1)",
            "13UVJyLnbVp9RBZYFwFGyDvVd1y27Tt8tkntv6Q7JVPhFsTB",
        ),
        NetworkRule::new(
            &["cosmos"],
            &[r"^cosmos1[a-z0-9]{38}$"],
            "Cosmos address (starts with cosmos1)",
            "cosmos1depk54cuajgkzea6zpgkq36tnjwdzv4afc3d27",
        ),
        NetworkRule::new(
            &["near"],
            &[r"^[a-z0-9._-]+\.near$", r"^[a-f0-9]{64}$"],
            "NEAR address (account.near or 64-character hex)",
            "alice.near",
        ),
        NetworkRule::new(
            &["flow"],
            &[r"^0x[a-fA-F0-9]{16}$"],
            "Flow address (0x followed by 16 hex characters)",
            "0x1d007d755706c469",
        ),
        NetworkRule::new(
            &["hedera"],
            // ASCII digits only; `\d` in the regex crate is Unicode-aware.
            &[r"^0\.0\.[0-9]+$"],
            "Hedera address (format: 0.0.xxxxx)",
            "0.0.123456",
        ),
        NetworkRule::new(
            &["algorand"],
            &[r"^[A-Z2-7]{58}$"],
            "Algorand address (58-character base32)",
            "DPLD3RY7DDPQJ7C4XVXIYD5K5MZTVQNHQK5LZCCQXHCQWXEQZYPZXQHGZM",
        ),
        NetworkRule::new(
            &["tezos"],
            &[r"^(tz1|tz2|tz3|KT1)[a-zA-Z0-9]{33}$"],
            "Tezos address (starts with tz1, tz2, tz3, or KT1)",
            "tz1VSUr8wwNhLAzempoch5d6hLRiTh8Cjcjb",
        ),
        NetworkRule::new(
            &["stellar"],
            &[r"^G[A-Z2-7]{55}$"],
            "Stellar address (starts with G, 56 characters)",
            "GCLWGQPMKXQSPF776IU33AH4PZNOOWNAWGGKVTBQMIC5IMKUNP3E6NVU",
        ),
        NetworkRule::new(
            &["tron"],
            &[r"^T[A-Za-z0-9]{33}$"],
            "TRON address (starts with T, 34 characters)",
            "TLPpacjdykQDpyEx7f9uVAsaJSQweBcLkT",
        ),
        NetworkRule::new(
            &["filecoin"],
            &[r"^f[1-4][a-zA-Z0-9]+$"],
            "Filecoin address (starts with f1, f2, f3, or f4)",
            "f1abjxfbp274xpdqcpuaykwkfb43omjotacm2p3za",
        ),
        NetworkRule::new(
            &["ripple", "xrp"],
            &[r"^r[a-zA-Z0-9]{25,34}$"],
            "XRP address (starts with r)",
            "rLHzPsX6oXkzU2qL12kHCH8G8cnZv1rBJh",
        ),
        NetworkRule::new(
            &["dogecoin"],
            &[r"^D[5-9A-HJ-NP-U][1-9A-HJ-NP-Za-km-z]{32}$"],
            "Dogecoin address (starts with D)",
            "DH5yaieqoZN36fDVciNyRueRGvGLR3mr7L",
        ),
        NetworkRule::new(
            &["litecoin"],
            &[r"^[LM][a-km-zA-HJ-NP-Z1-9]{33}$", r"^ltc1[a-z0-9]{39,59}$"],
            "Litecoin address (starts with L, M, or ltc1)",
            "LdP8Qox1VAhCzLJNqrr74YovaWYyNSTpQH",
        ),
        NetworkRule::new(
            &["bitcoin-cash"],
            &[BASE58_LEGACY_PATTERN, r"^bitcoincash:[a-z0-9]{42}$"],
            "Bitcoin Cash address (legacy or CashAddr format)",
            "bitcoincash:qzm47qz5ue99y9yl4aca7jnz7dwgdenl85jkwmhvhm",
        ),
        NetworkRule::new(
            &["aptos"],
            &[r"^0x[a-fA-F0-9]{64}$"],
            "Aptos address (0x followed by 64 hex characters)",
            "0x1ac46c4b1c56de0e06fad8b2c9e6b8985d1cc5c7b2e4cdcdbc8b0e4e65a7b6b9",
        ),
    ]
});

/// Finds the rule for a network identifier, ignoring ASCII case.
pub(crate) fn rule_for(network: &str) -> Option<&'static NetworkRule> {
    let network = network.to_ascii_lowercase();
    RULES
        .iter()
        .find(|rule| rule.ids.contains(&network.as_str()))
}

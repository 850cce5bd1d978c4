// SPDX-FileCopyrightText: 2026 Njaaia Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Keyword classification of blockchain-related messages.
//!
//! Lower-cases the message and looks for any keyword as a plain substring.
//! Words that merely contain a keyword ("defiant", "Gaspard") match too;
//! callers rely on that exact behavior, so do not switch to word boundaries.

/// Keywords that mark a message as needing blockchain-aware handling.
pub const BLOCKCHAIN_KEYWORDS: &[&str] = &[
    "block",
    "transaction",
    "ethereum",
    "bitcoin",
    "crypto",
    "token",
    "nft",
    "defi",
    "uniswap",
    "aave",
    "compound",
    "wallet",
    "address",
    "balance",
    "transfer",
    "gas",
    "mining",
    "hash",
    "blockchain",
    "on-chain",
    "off-chain",
    "liquidity",
    "pool",
    "swap",
    "yield",
    "farming",
    "staking",
    "protocol",
];

/// Zero-cost keyword classifier. No network, no state, no failure mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicClassifier;

impl TopicClassifier {
    pub fn new() -> Self {
        Self
    }

    /// True when the message contains at least one keyword, ignoring case.
    pub fn is_specialized(&self, text: &str) -> bool {
        self.matched_keyword(text).is_some()
    }

    /// The first keyword (in list order) found in the message.
    pub fn matched_keyword(&self, text: &str) -> Option<&'static str> {
        let lower = text.to_lowercase();
        BLOCKCHAIN_KEYWORDS
            .iter()
            .copied()
            .find(|keyword| lower.contains(keyword))
    }
}

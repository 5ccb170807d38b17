//! Core domain types for the integrity pipeline
//!
//! WalletProfile and IntegrityScores are owned by the request that built
//! them and dropped once the Verdict is produced. Nothing here is persisted
//! locally; the only durable artifact is the on-chain notary record.

use serde::{Deserialize, Serialize};

/// A single observed transaction touching the subject wallet.
/// Immutable once fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// Absolute lamport balance delta for the subject wallet
    pub amount: u64,
    /// Block timestamp (unix seconds)
    pub timestamp: i64,
    /// Signed balance change (post - pre) for the subject wallet
    pub account_delta: i64,
}

/// Recent behavioral profile of a wallet, built fresh per evaluation.
///
/// Unparseable upstream entries are omitted, never null-padded, so all
/// three sequences stay aligned and `transactions.len()` is bounded by the
/// configured fetch window.
#[derive(Debug, Clone, Default)]
pub struct WalletProfile {
    pub transactions: Vec<TransactionRecord>,
    /// Position magnitudes derived from the transactions
    pub positions: Vec<f64>,
    /// Block timestamps of the observed transactions
    pub timestamps: Vec<i64>,
}

impl WalletProfile {
    /// Number of successfully observed transactions
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }

    /// Transaction amounts as magnitudes for the scoring engine
    pub fn amounts(&self) -> Vec<f64> {
        self.transactions.iter().map(|tx| tx.amount as f64).collect()
    }
}

/// The three behavioral metrics, each in [0, 1].
/// A pure function of the profile; the empty profile scores all-zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegrityScores {
    /// Inequality of transaction magnitudes (0 = equal, 1 = concentrated)
    pub gini: f64,
    /// Herfindahl-Hirschman concentration of positions
    pub hhi: f64,
    /// Temporal clustering of transaction timestamps
    pub sync_index: f64,
}

impl IntegrityScores {
    pub const ZERO: IntegrityScores = IntegrityScores {
        gini: 0.0,
        hhi: 0.0,
        sync_index: 0.0,
    };

    /// Degenerate profile check: a never-active identity scores all-zero
    pub fn is_zero(&self) -> bool {
        self.gini == 0.0 && self.hhi == 0.0 && self.sync_index == 0.0
    }

    /// Round to 4 decimals for presentation and notarization parity
    pub fn rounded(&self) -> IntegrityScores {
        let round4 = |v: f64| (v * 10_000.0).round() / 10_000.0;
        IntegrityScores {
            gini: round4(self.gini),
            hhi: round4(self.hhi),
            sync_index: round4(self.sync_index),
        }
    }
}

/// Terminal classification of a wallet evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrityStatus {
    /// Behavior aligns with organic patterns
    Verified,
    /// New or under-collateralized identity, limited privileges
    Probationary,
    /// Bot-like, synchronized, or extractive behavior detected
    Sybil,
    /// No verdict available: upstream unreachable or engine fault.
    /// Deliberately distinct from Probationary so a dead upstream can
    /// never fail open into a permissive classification.
    Offline,
}

impl IntegrityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "VERIFIED",
            Self::Probationary => "PROBATIONARY",
            Self::Sybil => "SYBIL",
            Self::Offline => "OFFLINE",
        }
    }

    /// On-chain status code. Offline verdicts are never notarized and have
    /// no code.
    pub fn status_code(&self) -> Option<u8> {
        match self {
            Self::Verified => Some(0),
            Self::Probationary => Some(1),
            Self::Sybil => Some(2),
            Self::Offline => None,
        }
    }
}

/// Result of one wallet evaluation. Produced once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub status: IntegrityStatus,
    pub scores: IntegrityScores,
    /// Human-readable justification for the classification
    pub reason: String,
    /// Wall-clock evaluation time in milliseconds
    pub latency_ms: u64,
}

impl Verdict {
    /// Terminal OFFLINE verdict with zeroed scores
    pub fn offline(reason: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            status: IntegrityStatus::Offline,
            scores: IntegrityScores::ZERO,
            reason: reason.into(),
            latency_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_match_onchain_layout() {
        assert_eq!(IntegrityStatus::Verified.status_code(), Some(0));
        assert_eq!(IntegrityStatus::Probationary.status_code(), Some(1));
        assert_eq!(IntegrityStatus::Sybil.status_code(), Some(2));
        assert_eq!(IntegrityStatus::Offline.status_code(), None);
    }

    #[test]
    fn test_zero_scores() {
        assert!(IntegrityScores::ZERO.is_zero());
        let scores = IntegrityScores {
            gini: 0.1,
            hhi: 0.0,
            sync_index: 0.0,
        };
        assert!(!scores.is_zero());
    }

    #[test]
    fn test_score_rounding() {
        let scores = IntegrityScores {
            gini: 0.666_666_7,
            hhi: 0.333_333_3,
            sync_index: 0.123_456_7,
        };
        let rounded = scores.rounded();
        assert_eq!(rounded.gini, 0.6667);
        assert_eq!(rounded.hhi, 0.3333);
        assert_eq!(rounded.sync_index, 0.1235);
    }
}

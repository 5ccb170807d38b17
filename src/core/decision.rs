//! Risk Decision Engine
//!
//! Memoryless classifier: each evaluation is a pure function of the scores,
//! the observation count, the stake balance, and the injected policy. Rules
//! apply in strict priority order and the first match wins. The engine
//! never performs I/O and never returns OFFLINE; that terminal state is
//! owned by the orchestrator.

use crate::models::config::IntegrityPolicy;
use crate::models::types::{IntegrityScores, IntegrityStatus};

/// Outcome of one classification, before latency is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub status: IntegrityStatus,
    pub reason: &'static str,
}

/// Classify a wallet from its scores and context.
///
/// Priority order:
/// 1. stake below floor            -> PROBATIONARY
/// 2. too little history           -> PROBATIONARY
/// 3. degenerate all-zero profile  -> PROBATIONARY
/// 4. sync or gini over threshold  -> SYBIL
/// 5. otherwise                    -> VERIFIED
pub fn classify(
    scores: &IntegrityScores,
    tx_count: usize,
    stake_lamports: u64,
    policy: &IntegrityPolicy,
) -> Classification {
    if stake_lamports < policy.min_stake_lamports {
        return Classification {
            status: IntegrityStatus::Probationary,
            reason: "Insufficient economic stake.",
        };
    }

    if tx_count < policy.min_transactions {
        return Classification {
            status: IntegrityStatus::Probationary,
            reason: "Insufficient transaction history for full analysis.",
        };
    }

    if scores.is_zero() {
        return Classification {
            status: IntegrityStatus::Probationary,
            reason: "New identity, no behavioral history.",
        };
    }

    if scores.sync_index > policy.sync_threshold || scores.gini > policy.gini_threshold {
        return Classification {
            status: IntegrityStatus::Sybil,
            reason: "High temporal synchronization or extreme inequality detected.",
        };
    }

    Classification {
        status: IntegrityStatus::Verified,
        reason: "Behavior aligns with organic patterns.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> IntegrityPolicy {
        IntegrityPolicy::default()
    }

    fn organic_scores() -> IntegrityScores {
        IntegrityScores {
            gini: 0.2,
            hhi: 0.3,
            sync_index: 0.1,
        }
    }

    #[test]
    fn test_stake_floor_first() {
        // Even a sybil-looking profile reports the stake problem first
        let scores = IntegrityScores {
            gini: 0.99,
            hhi: 0.9,
            sync_index: 0.9,
        };
        let c = classify(&scores, 10, 0, &policy());
        assert_eq!(c.status, IntegrityStatus::Probationary);
        assert!(c.reason.contains("stake"));
    }

    #[test]
    fn test_zero_transactions_probationary_regardless_of_scores() {
        let scores = IntegrityScores {
            gini: 0.95,
            hhi: 1.0,
            sync_index: 0.9,
        };
        let c = classify(&scores, 0, 100_000_000, &policy());
        assert_eq!(c.status, IntegrityStatus::Probationary);
        assert!(c.reason.contains("history"));
    }

    #[test]
    fn test_degenerate_zero_profile() {
        let c = classify(&IntegrityScores::ZERO, 5, 100_000_000, &policy());
        assert_eq!(c.status, IntegrityStatus::Probationary);
        assert!(c.reason.contains("New identity"));
    }

    #[test]
    fn test_high_sync_is_sybil() {
        let scores = IntegrityScores {
            gini: 0.1,
            hhi: 0.2,
            sync_index: 0.5,
        };
        let c = classify(&scores, 5, 100_000_000, &policy());
        assert_eq!(c.status, IntegrityStatus::Sybil);
    }

    #[test]
    fn test_high_gini_is_sybil() {
        let scores = IntegrityScores {
            gini: 0.8,
            hhi: 0.2,
            sync_index: 0.05,
        };
        let c = classify(&scores, 5, 100_000_000, &policy());
        assert_eq!(c.status, IntegrityStatus::Sybil);
    }

    #[test]
    fn test_at_threshold_is_not_sybil() {
        // Thresholds are strict inequalities
        let scores = IntegrityScores {
            gini: 0.7,
            hhi: 0.2,
            sync_index: 0.35,
        };
        let c = classify(&scores, 5, 100_000_000, &policy());
        assert_eq!(c.status, IntegrityStatus::Verified);
    }

    #[test]
    fn test_organic_wallet_verified() {
        let c = classify(&organic_scores(), 5, 100_000_000, &policy());
        assert_eq!(c.status, IntegrityStatus::Verified);
        assert!(c.reason.contains("organic"));
    }

    #[test]
    fn test_custom_policy_is_honored() {
        let strict = IntegrityPolicy {
            sync_threshold: 0.05,
            gini_threshold: 0.1,
            min_transactions: 3,
            min_stake_lamports: 0,
        };
        let c = classify(&organic_scores(), 5, 0, &strict);
        assert_eq!(c.status, IntegrityStatus::Sybil);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let a = classify(&organic_scores(), 5, 100_000_000, &policy());
        let b = classify(&organic_scores(), 5, 100_000_000, &policy());
        assert_eq!(a, b);
    }
}

//! Behavioral Scoring Engine
//!
//! Three pure, deterministic metrics over a wallet's recent history:
//! - Gini coefficient: inequality of transaction magnitudes
//! - HHI: concentration of position values
//! - Sync index: temporal clustering of transaction timestamps
//!
//! No I/O, no state. Every function returns a value in [0, 1] for any
//! input, including the empty profile (all-zero).

use crate::models::types::{IntegrityScores, WalletProfile};

/// Adjacent timestamps at or below this gap (seconds) count as one
/// synchronized cluster pair
const SYNC_CLUSTER_GAP_SECS: i64 = 2;

/// Gini coefficient of a non-negative magnitude sequence.
///
/// Sum of absolute differences over all ordered pairs, divided by
/// `2 * n * sum`. Fewer than 2 values (or a zero sum) carries no spread to
/// measure and returns 0. With this normalization `gini([0, 0, x]) == 2/3`;
/// the historical variant that rescaled that case to 1.0 is intentionally
/// not used.
pub fn gini(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len() as f64;
    let sum: f64 = sorted.iter().sum();
    if sum == 0.0 {
        return 0.0;
    }

    let mut sum_abs_diff = 0.0;
    for a in &sorted {
        for b in &sorted {
            sum_abs_diff += (a - b).abs();
        }
    }

    (sum_abs_diff / (2.0 * n * sum)).clamp(0.0, 1.0)
}

/// Herfindahl-Hirschman concentration index, normalized to [0, 1].
///
/// Sum of squared percentage shares divided by 10000. A single nonzero
/// value yields 1; n equal values yield 1/n; empty or zero-total input
/// yields 0.
pub fn hhi(values: &[f64]) -> f64 {
    let total: f64 = values.iter().sum();
    if values.is_empty() || total == 0.0 {
        return 0.0;
    }

    let sum_squared_shares: f64 = values
        .iter()
        .map(|v| {
            let share = (v / total) * 100.0;
            share * share
        })
        .sum();

    (sum_squared_shares / 10_000.0).clamp(0.0, 1.0)
}

/// Temporal synchronization index over event timestamps (unix seconds).
///
/// Sorts ascending and counts adjacent pairs whose gap is at or below the
/// clustering threshold; the ratio of clustered pairs to total timestamps
/// is the index. Fewer than 2 timestamps yields 0. High values indicate
/// scripted, non-human timing.
pub fn sync_index(timestamps: &[i64]) -> f64 {
    if timestamps.len() < 2 {
        return 0.0;
    }

    let mut sorted: Vec<i64> = timestamps.to_vec();
    sorted.sort_unstable();

    let clustered = sorted
        .windows(2)
        .filter(|pair| pair[1] - pair[0] <= SYNC_CLUSTER_GAP_SECS)
        .count();

    (clustered as f64 / timestamps.len() as f64).clamp(0.0, 1.0)
}

/// Compute all three metrics for a profile.
pub fn score_profile(profile: &WalletProfile) -> IntegrityScores {
    IntegrityScores {
        gini: gini(&profile.amounts()),
        hhi: hhi(&profile.positions),
        sync_index: sync_index(&profile.timestamps),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::TransactionRecord;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_gini_empty_and_single() {
        assert_eq!(gini(&[]), 0.0);
        assert_eq!(gini(&[10.0]), 0.0);
    }

    #[test]
    fn test_gini_perfect_equality() {
        assert!(gini(&[10.0, 10.0, 10.0, 10.0]).abs() < EPS);
        assert!(gini(&[3.0, 3.0]).abs() < EPS);
        assert!(gini(&[7.5; 9]).abs() < EPS);
    }

    #[test]
    fn test_gini_total_inequality_is_two_thirds() {
        // sorted: 0, 0, 10. sum of ordered-pair diffs = 40; 2*3*10 = 60.
        let g = gini(&[0.0, 0.0, 10.0]);
        assert!((g - 2.0 / 3.0).abs() < 1e-6, "got {}", g);
    }

    #[test]
    fn test_gini_permutation_invariant() {
        let a = gini(&[1.0, 5.0, 9.0, 2.0]);
        let b = gini(&[9.0, 2.0, 1.0, 5.0]);
        let c = gini(&[2.0, 1.0, 5.0, 9.0]);
        assert!((a - b).abs() < EPS);
        assert!((b - c).abs() < EPS);
    }

    #[test]
    fn test_gini_zero_sum() {
        assert_eq!(gini(&[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_gini_in_unit_range() {
        for values in [
            vec![0.0, 1e9],
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![0.001, 1000.0, 0.001],
        ] {
            let g = gini(&values);
            assert!((0.0..=1.0).contains(&g), "gini out of range: {}", g);
        }
    }

    #[test]
    fn test_hhi_single_value_full_concentration() {
        assert!((hhi(&[42.0]) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_hhi_equal_values() {
        assert!((hhi(&[5.0, 5.0]) - 0.5).abs() < EPS);
        assert!((hhi(&[3.0, 3.0, 3.0, 3.0]) - 0.25).abs() < EPS);
        let n = 10;
        let values = vec![1.0; n];
        assert!((hhi(&values) - 1.0 / n as f64).abs() < EPS);
    }

    #[test]
    fn test_hhi_empty_and_zero_total() {
        assert_eq!(hhi(&[]), 0.0);
        assert_eq!(hhi(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_sync_index_degenerate() {
        assert_eq!(sync_index(&[]), 0.0);
        assert_eq!(sync_index(&[1_700_000_000]), 0.0);
    }

    #[test]
    fn test_sync_index_tight_cluster() {
        // 4 timestamps, 3 adjacent gaps all <= 2s -> 3/4
        let stamps = [100, 101, 102, 103];
        assert!((sync_index(&stamps) - 0.75).abs() < EPS);
    }

    #[test]
    fn test_sync_index_spread_out() {
        let stamps = [100, 1_000, 10_000, 100_000];
        assert_eq!(sync_index(&stamps), 0.0);
    }

    #[test]
    fn test_sync_index_unsorted_input() {
        let sorted = [100, 101, 500, 501];
        let shuffled = [501, 100, 500, 101];
        assert!((sync_index(&sorted) - sync_index(&shuffled)).abs() < EPS);
    }

    #[test]
    fn test_score_profile_empty_is_zero() {
        let scores = score_profile(&WalletProfile::default());
        assert!(scores.is_zero());
    }

    #[test]
    fn test_score_profile_organic() {
        let mut profile = WalletProfile::default();
        for i in 0..3u64 {
            profile.transactions.push(TransactionRecord {
                amount: 1_000_000,
                timestamp: 1_700_000_000 + i as i64 * 86_400,
                account_delta: -(1_000_000i64),
            });
            profile.positions.push(1_000_000.0);
            profile.timestamps.push(1_700_000_000 + i as i64 * 86_400);
        }

        let scores = score_profile(&profile);
        assert!(scores.gini.abs() < EPS);
        assert_eq!(scores.sync_index, 0.0);
        assert!((scores.hhi - 1.0 / 3.0).abs() < EPS);
    }
}

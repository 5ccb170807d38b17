//! Configuration for the Sentinel
//!
//! All thresholds live in named, injected value objects. Historical
//! deployments scattered incompatible literals across call sites (sync
//! thresholds of 0.35 and 0.8 both shipped at different times); the values
//! below are the canonical policy and the only place they are defined.

use std::time::Duration;
use tracing::info;

/// Classification thresholds, injected into the decision engine.
///
/// Canonical values:
/// - `sync_threshold`: 0.35 (above this, timing looks scripted)
/// - `gini_threshold`: 0.7 (above this, one extractor dominates)
/// - `min_transactions`: 3 observations before a full verdict
/// - `min_stake_lamports`: 0.05 SOL economic floor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrityPolicy {
    /// Sync index above this is treated as bot/scripted timing
    pub sync_threshold: f64,
    /// Gini above this is treated as extractive concentration
    pub gini_threshold: f64,
    /// Minimum observed transactions for a full classification
    pub min_transactions: usize,
    /// Minimum stake balance (lamports) for a non-probationary verdict
    pub min_stake_lamports: u64,
}

impl Default for IntegrityPolicy {
    fn default() -> Self {
        Self {
            sync_threshold: 0.35,
            gini_threshold: 0.7,
            min_transactions: 3,
            min_stake_lamports: 50_000_000,
        }
    }
}

/// Tuning for the bounded, rate-limit-aware history fetch.
#[derive(Debug, Clone, Copy)]
pub struct AcquisitionConfig {
    /// Most recent signatures to scan; the only windowing boundary
    pub fetch_limit: usize,
    /// Fixed pause between sequential detail fetches
    pub pacing_delay: Duration,
    /// Maximum attempts per upstream call (first try included)
    pub max_attempts: u32,
    /// Base delay for exponential backoff on rate limits
    pub base_retry_delay: Duration,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            fetch_limit: 15,
            pacing_delay: Duration::from_millis(200),
            max_attempts: 3,
            base_retry_delay: Duration::from_millis(500),
        }
    }
}

/// Notarization settings.
#[derive(Debug, Clone)]
pub struct NotaryConfig {
    /// Namespace seed mixed into every derived record address
    pub namespace_seed: String,
    /// Master switch; when false verdicts are only logged
    pub enabled: bool,
}

impl Default for NotaryConfig {
    fn default() -> Self {
        Self {
            namespace_seed: "notary".to_string(),
            enabled: true,
        }
    }
}

/// Top-level service configuration, resolved from the environment.
#[derive(Debug, Clone)]
pub struct SentinelConfig {
    /// Solana JSON-RPC endpoint for ledger reads
    pub rpc_url: String,
    /// HTTP timeout for a single RPC call
    pub rpc_timeout: Duration,
    /// Global ceiling on concurrent upstream evaluations
    pub max_concurrent_audits: usize,
    pub policy: IntegrityPolicy,
    pub acquisition: AcquisitionConfig,
    pub notary: NotaryConfig,
}

impl SentinelConfig {
    /// Resolve configuration from environment variables with sane defaults.
    ///
    /// Environment:
    ///   SOLANA_RPC_URL        - ledger read endpoint (default: devnet)
    ///   NOTARY_NAMESPACE_SEED - derived-address namespace (default: "notary")
    ///   NOTARY_ENABLED        - set "false" to log verdicts only
    pub fn from_env() -> Self {
        let rpc_url = std::env::var("SOLANA_RPC_URL")
            .unwrap_or_else(|_| "https://api.devnet.solana.com".to_string());

        let namespace_seed =
            std::env::var("NOTARY_NAMESPACE_SEED").unwrap_or_else(|_| "notary".to_string());

        let enabled = std::env::var("NOTARY_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);

        info!("🔧 Sentinel configured (rpc: {}, notary: {})", rpc_url, enabled);

        Self {
            rpc_url,
            rpc_timeout: Duration::from_secs(10),
            max_concurrent_audits: 50,
            policy: IntegrityPolicy::default(),
            acquisition: AcquisitionConfig::default(),
            notary: NotaryConfig {
                namespace_seed,
                enabled,
            },
        }
    }
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_policy_values() {
        let policy = IntegrityPolicy::default();
        assert_eq!(policy.sync_threshold, 0.35);
        assert_eq!(policy.gini_threshold, 0.7);
        assert_eq!(policy.min_transactions, 3);
        assert_eq!(policy.min_stake_lamports, 50_000_000);
    }

    #[test]
    fn test_acquisition_defaults() {
        let cfg = AcquisitionConfig::default();
        assert_eq!(cfg.fetch_limit, 15);
        assert_eq!(cfg.pacing_delay, Duration::from_millis(200));
        assert_eq!(cfg.max_attempts, 3);
    }
}

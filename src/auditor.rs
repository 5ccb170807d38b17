//! Integrity Auditor - the pipeline orchestrator
//!
//! Composes the pure pieces: acquire profile, score it, classify it,
//! return the verdict immediately, and hand the verdict to the notary on a
//! detached task. Classification never awaits the ledger write.
//!
//! Failure semantics at this boundary:
//! - hard acquisition failure (signature list unreachable) -> OFFLINE
//! - unexpected engine fault during scoring/classification -> OFFLINE
//! Both are "no verdict available" states, deliberately distinct from
//! PROBATIONARY, so a dead upstream can never fail open.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::core::acquisition::ProfileFetcher;
use crate::core::decision::classify;
use crate::core::scoring::score_profile;
use crate::models::config::{IntegrityPolicy, SentinelConfig};
use crate::models::errors::{AppError, AppResult};
use crate::models::types::Verdict;
use crate::notary::NotaryPipeline;
use crate::providers::ledger::{LedgerReader, LedgerWriter};

/// Run the pure evaluation under a panic guard.
///
/// A panic in the engine is a bug, but it must surface as an error the
/// orchestrator maps to OFFLINE, never as a raw panic to the caller.
/// Relies on unwinding, so no build profile may set `panic = "abort"`.
fn run_engine<T>(f: impl FnOnce() -> T) -> AppResult<T> {
    catch_unwind(AssertUnwindSafe(f))
        .map_err(|_| AppError::engine_fault("panic during scoring/classification"))
}

pub struct IntegrityAuditor {
    fetcher: ProfileFetcher,
    notary: Option<Arc<NotaryPipeline>>,
    policy: IntegrityPolicy,
}

impl IntegrityAuditor {
    pub fn new(
        fetcher: ProfileFetcher,
        notary: Option<Arc<NotaryPipeline>>,
        policy: IntegrityPolicy,
    ) -> Self {
        Self {
            fetcher,
            notary,
            policy,
        }
    }

    /// Wire up an auditor from configuration and collaborator handles.
    pub fn from_config(
        config: &SentinelConfig,
        reader: Arc<dyn LedgerReader>,
        writer: Option<Arc<dyn LedgerWriter>>,
    ) -> Self {
        let fetcher = ProfileFetcher::new(reader, config.acquisition);
        let notary = writer
            .map(|w| Arc::new(NotaryPipeline::new(w, config.notary.clone())));
        Self::new(fetcher, notary, config.policy)
    }

    /// Whether computed verdicts are handed to a live notary.
    pub fn notarization_enabled(&self) -> bool {
        self.notary.as_ref().is_some_and(|n| n.is_enabled())
    }

    /// Evaluate a wallet, fetching the stake balance as a side query.
    ///
    /// Precondition: `wallet` is already validated as well-formed by the
    /// surrounding layer.
    pub async fn audit(&self, wallet: &str) -> Verdict {
        self.audit_with_stake(wallet, None).await
    }

    /// Evaluate a wallet with an optional caller-supplied stake balance.
    pub async fn audit_with_stake(&self, wallet: &str, stake: Option<u64>) -> Verdict {
        let start = Instant::now();
        info!("🔍 Auditing wallet {}", wallet);

        let stake_lamports = match stake {
            Some(v) => v,
            None => match self.fetcher.fetch_stake(wallet).await {
                Ok(v) => v,
                Err(e) => {
                    // Treat an unknown stake as zero: the floor rule then
                    // yields PROBATIONARY rather than a permissive default.
                    warn!("⚠️ Stake lookup failed for {}: {} - assuming 0", wallet, e);
                    0
                }
            },
        };

        let profile = match self.fetcher.fetch_profile(wallet).await {
            Ok(profile) => profile,
            Err(e) => {
                error!("❌ Acquisition failed for {}: {}", wallet, e);
                return Verdict::offline(
                    "Upstream ledger unreachable; no verdict available.",
                    start.elapsed().as_millis() as u64,
                );
            }
        };

        let tx_count = profile.tx_count();
        let policy = self.policy;

        let outcome = run_engine(|| {
            let scores = score_profile(&profile);
            let classification = classify(&scores, tx_count, stake_lamports, &policy);
            (scores, classification)
        });

        let verdict = match outcome {
            Ok((scores, classification)) => Verdict {
                status: classification.status,
                scores: scores.rounded(),
                reason: classification.reason.to_string(),
                latency_ms: start.elapsed().as_millis() as u64,
            },
            Err(e) => {
                error!("❌ {} while scoring {}", e.code_str(), wallet);
                return Verdict::offline(
                    "Internal engine fault; no verdict available.",
                    start.elapsed().as_millis() as u64,
                );
            }
        };

        info!(
            "🏁 {} -> {} in {}ms (gini {:.4}, hhi {:.4}, sync {:.4})",
            wallet,
            verdict.status.as_str(),
            verdict.latency_ms,
            verdict.scores.gini,
            verdict.scores.hhi,
            verdict.scores.sync_index
        );

        // Out-of-band persistence; the response does not wait for this.
        if let Some(notary) = &self.notary {
            notary.spawn_notarize(wallet.to_string(), verdict.clone());
        }

        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;

    #[test]
    fn test_engine_panic_is_caught_as_fault() {
        let outcome: AppResult<()> = run_engine(|| panic!("index out of bounds"));
        assert_eq!(outcome.unwrap_err().code, ErrorCode::EngineFault);
    }

    #[test]
    fn test_engine_success_passes_through() {
        assert_eq!(run_engine(|| 7u32).unwrap(), 7);
    }
}

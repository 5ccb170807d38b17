//! Notarization Pipeline
//!
//! Persists a computed verdict to the external ledger, decoupled from the
//! request path. The record address is derived deterministically from the
//! namespace seed and the subject wallet, so repeated notarizations for the
//! same wallet overwrite one record (last write wins, no history).
//!
//! Policy: every classifiable status is written, SYBIL included — the
//! on-chain flag is what downstream gates read, so suppressing it would
//! defeat the point. OFFLINE carries no information about the wallet and is
//! never written. Failures are logged and absorbed; they never alter or
//! delay the verdict already returned to the caller.

use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::models::config::NotaryConfig;
use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::Verdict;
use crate::providers::ledger::{LedgerWriter, NotaryReceipt};

/// Fixed-point scale for on-chain score storage (u16)
const SCORE_SCALE: f64 = 10_000.0;

/// Derive the ledger record address for a wallet:
/// base58(SHA-256(namespace_seed || wallet)).
pub fn derive_record_address(namespace_seed: &str, wallet: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(namespace_seed.as_bytes());
    hasher.update(wallet.as_bytes());
    bs58::encode(hasher.finalize()).into_string()
}

/// Encode a [0, 1] score as a clamped u16 fixed-point value (x10000).
/// Nearest-integer rounding: scores arrive already rounded to 4 decimals,
/// and values like 0.6667 sit a ulp below the exact decimal, so flooring
/// would drop a unit.
pub fn encode_score(score: f64) -> u16 {
    let scaled = (score * SCORE_SCALE).round();
    scaled.clamp(0.0, u16::MAX as f64) as u16
}

/// Writes integrity records through an injected ledger writer.
pub struct NotaryPipeline {
    writer: Arc<dyn LedgerWriter>,
    config: NotaryConfig,
}

impl NotaryPipeline {
    pub fn new(writer: Arc<dyn LedgerWriter>, config: NotaryConfig) -> Self {
        Self { writer, config }
    }

    /// Whether this pipeline will actually write records.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Write one verdict to the ledger.
    ///
    /// Idempotent per wallet: the derived address is stable, so a repeated
    /// notarization simply overwrites the prior record.
    pub async fn notarize(&self, wallet: &str, verdict: &Verdict) -> AppResult<NotaryReceipt> {
        let Some(status_code) = verdict.status.status_code() else {
            return Err(AppError::new(
                ErrorCode::NotaryNotApplicable,
                format!("{} verdicts are not notarized", verdict.status.as_str()),
            ));
        };

        if !self.config.enabled {
            return Err(AppError::new(
                ErrorCode::NotaryNotApplicable,
                "Notarization disabled by configuration",
            ));
        }

        let record_address = derive_record_address(&self.config.namespace_seed, wallet);
        let gini_fixed = encode_score(verdict.scores.gini);
        let hhi_fixed = encode_score(verdict.scores.hhi);

        info!(
            "🏛️ Notarizing {} -> {} (status {}, gini {}, hhi {})",
            wallet, record_address, status_code, gini_fixed, hhi_fixed
        );

        let receipt = self
            .writer
            .write_integrity_record(&record_address, gini_fixed, hhi_fixed, status_code)
            .await
            .map_err(|e| AppError::notary_write_failed(e.to_string()))?;

        info!("✅ Notarized {} (sig {})", wallet, receipt.signature);
        Ok(receipt)
    }

    /// Fire-and-forget notarization on a detached task.
    ///
    /// The task is spawned, not awaited: cancellation of the inbound
    /// request after the verdict is computed does not cancel the write.
    /// Every failure path is absorbed here.
    pub fn spawn_notarize(self: &Arc<Self>, wallet: String, verdict: Verdict) {
        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            match pipeline.notarize(&wallet, &verdict).await {
                Ok(receipt) => {
                    info!("📝 Record {} updated for {}", receipt.record_address, wallet);
                }
                Err(e) if e.code == ErrorCode::NotaryNotApplicable => {
                    warn!("📭 Notarization skipped for {}: {}", wallet, e.message);
                }
                Err(e) => {
                    error!("❌ Notarization failed for {}: {}", wallet, e);
                }
            }
        });
    }
}

//! Profile Acquisition
//!
//! Builds a [`WalletProfile`] from the upstream ledger: one bounded
//! signature-list fetch, then sequential detail fetches with a fixed pacing
//! delay so the effective request rate stays under upstream throughput
//! limits. Every call goes through the shared backoff helper.
//!
//! Failure model: a failed detail fetch or unparseable transaction is
//! skipped and accumulation continues. Failure of the signature-list fetch
//! itself is the single hard error, surfaced to the orchestrator.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::models::config::AcquisitionConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{TransactionRecord, WalletProfile};
use crate::providers::ledger::LedgerReader;
use crate::providers::retry::retry_with_backoff;

/// Fetches bounded transaction histories through an injected ledger reader.
pub struct ProfileFetcher {
    reader: Arc<dyn LedgerReader>,
    config: AcquisitionConfig,
}

impl ProfileFetcher {
    pub fn new(reader: Arc<dyn LedgerReader>, config: AcquisitionConfig) -> Self {
        Self { reader, config }
    }

    /// Fetch the recent profile for a wallet.
    ///
    /// Never errors on partial upstream failure; errors only when the
    /// signature list itself cannot be obtained after exhausting retries.
    pub async fn fetch_profile(&self, wallet: &str) -> AppResult<WalletProfile> {
        let signatures = retry_with_backoff(
            || self.reader.recent_signatures(wallet, self.config.fetch_limit),
            |e| e.code.is_retryable(),
            self.config.max_attempts,
            self.config.base_retry_delay,
        )
        .await
        .map_err(|e| {
            AppError::upstream_unreachable(format!("signature list for {}: {}", wallet, e))
        })?;

        info!("📜 Fetched {} signatures for {}", signatures.len(), wallet);

        let mut profile = WalletProfile::default();

        for sig_info in &signatures {
            // Fixed pacing between detail calls; the window is small enough
            // that sequential fetching stays well under request deadlines.
            tokio::time::sleep(self.config.pacing_delay).await;

            let detail = match retry_with_backoff(
                || self.reader.transaction_detail(&sig_info.signature),
                |e| e.code.is_retryable(),
                self.config.max_attempts,
                self.config.base_retry_delay,
            )
            .await
            {
                Ok(Some(detail)) => detail,
                Ok(None) => {
                    debug!("📭 No detail for {}, skipping", sig_info.signature);
                    continue;
                }
                Err(e) => {
                    warn!("⚠️ Skipping {}: {}", sig_info.signature, e);
                    continue;
                }
            };

            let Some(delta) = detail.delta_for(wallet) else {
                debug!("📭 Wallet not referenced in {}, skipping", sig_info.signature);
                continue;
            };

            let amount = delta.unsigned_abs();
            let timestamp = detail.block_time.or(sig_info.block_time).unwrap_or(0);

            profile.transactions.push(TransactionRecord {
                amount,
                timestamp,
                account_delta: delta,
            });
            profile.positions.push(amount as f64);
            profile.timestamps.push(timestamp);
        }

        info!(
            "✅ Profile built for {}: {}/{} transactions usable",
            wallet,
            profile.tx_count(),
            signatures.len()
        );

        Ok(profile)
    }

    /// Current stake balance of the wallet, with the same retry policy.
    pub async fn fetch_stake(&self, wallet: &str) -> AppResult<u64> {
        retry_with_backoff(
            || self.reader.balance(wallet),
            |e| e.code.is_retryable(),
            self.config.max_attempts,
            self.config.base_retry_delay,
        )
        .await
    }
}

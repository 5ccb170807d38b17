//! Ledger collaborator interfaces and the Solana JSON-RPC implementation
//!
//! The pipeline never talks to the chain directly: reads go through
//! [`LedgerReader`] and notarization writes through [`LedgerWriter`].
//! Tests inject in-memory doubles through the same seams, so production
//! decision logic never branches on literal addresses.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::models::errors::{AppError, AppResult};

/// Reference to a recent transaction touching a wallet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub signature: String,
    /// Block timestamp (unix seconds); absent for very fresh entries
    pub block_time: Option<i64>,
}

/// Parsed transaction detail, reduced to what scoring needs.
#[derive(Debug, Clone)]
pub struct TransactionDetail {
    /// Account addresses referenced by the transaction, in index order
    pub account_keys: Vec<String>,
    /// Lamport balances before execution, aligned with `account_keys`
    pub pre_balances: Vec<u64>,
    /// Lamport balances after execution, aligned with `account_keys`
    pub post_balances: Vec<u64>,
    /// Block timestamp (unix seconds)
    pub block_time: Option<i64>,
}

impl TransactionDetail {
    /// Signed lamport delta (post - pre) for `wallet`, or None when the
    /// wallet is not referenced by this transaction.
    pub fn delta_for(&self, wallet: &str) -> Option<i64> {
        let idx = self.account_keys.iter().position(|k| k == wallet)?;
        let pre = *self.pre_balances.get(idx)? as i64;
        let post = *self.post_balances.get(idx)? as i64;
        Some(post - pre)
    }
}

/// Receipt for a completed notarization write.
#[derive(Debug, Clone)]
pub struct NotaryReceipt {
    /// Transaction signature of the ledger write
    pub signature: String,
    /// The derived record address that was written
    pub record_address: String,
}

/// Upstream ledger-read collaborator.
///
/// Implementations must signal rate limiting with
/// `ErrorCode::RpcRateLimited` so the retry helper can react to it
/// specifically; all other errors fail the individual call.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Most recent transaction references for a wallet, newest first.
    async fn recent_signatures(
        &self,
        wallet: &str,
        limit: usize,
    ) -> AppResult<Vec<SignatureInfo>>;

    /// Full detail for one transaction, or None when the upstream has no
    /// record of it.
    async fn transaction_detail(&self, signature: &str) -> AppResult<Option<TransactionDetail>>;

    /// Current lamport balance of a wallet (the stake signal).
    async fn balance(&self, wallet: &str) -> AppResult<u64>;
}

/// Downstream ledger-write collaborator for notarization.
#[async_trait]
pub trait LedgerWriter: Send + Sync {
    /// Overwrite the integrity record at `record_address` (last write wins).
    async fn write_integrity_record(
        &self,
        record_address: &str,
        gini_fixed: u16,
        hhi_fixed: u16,
        status_code: u8,
    ) -> AppResult<NotaryReceipt>;
}

// ============================================
// SOLANA JSON-RPC CLIENT
// ============================================

/// User-Agent for upstream dashboard monitoring
const USER_AGENT_STRING: &str = "TrustChainSentinel/0.1.0";

/// Solana JSON-RPC client implementing [`LedgerReader`].
pub struct RpcLedgerClient {
    rpc_url: String,
    client: reqwest::Client,
}

impl RpcLedgerClient {
    /// Create a client for the given RPC endpoint.
    pub fn new(rpc_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT_STRING)
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e| AppError::rpc_connection_failed(format!("HTTP client: {}", e)))?;

        Ok(Self {
            rpc_url: rpc_url.into(),
            client,
        })
    }

    /// Execute a single JSON-RPC call.
    /// HTTP 429 and JSON-RPC code -32429 both map to the rate-limit error.
    async fn call(&self, method: &str, params: serde_json::Value) -> AppResult<serde_json::Value> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        });

        let response = self.client.post(&self.rpc_url).json(&payload).send().await?;

        if response.status().as_u16() == 429 {
            return Err(AppError::rpc_rate_limited());
        }
        if !response.status().is_success() {
            return Err(AppError::rpc_error(format!("HTTP {}", response.status())));
        }

        let body: serde_json::Value = response.json().await?;

        if let Some(error) = body.get("error") {
            let code = error.get("code").and_then(|c| c.as_i64()).unwrap_or(0);
            let message = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown");
            if code == -32429 || message.contains("429") || message.contains("rate limit") {
                return Err(AppError::rpc_rate_limited());
            }
            return Err(AppError::rpc_error(format!("{} (code: {})", message, code)));
        }

        body.get("result")
            .cloned()
            .ok_or_else(|| AppError::rpc_error("No result in response"))
    }
}

#[async_trait]
impl LedgerReader for RpcLedgerClient {
    async fn recent_signatures(
        &self,
        wallet: &str,
        limit: usize,
    ) -> AppResult<Vec<SignatureInfo>> {
        debug!("📜 getSignaturesForAddress {} (limit {})", wallet, limit);
        let params = json!([wallet, { "limit": limit }]);
        let result = self.call("getSignaturesForAddress", params).await?;
        serde_json::from_value(result)
            .map_err(|e| AppError::tx_parse_failed(format!("signature list: {}", e)))
    }

    async fn transaction_detail(&self, signature: &str) -> AppResult<Option<TransactionDetail>> {
        let params = json!([
            signature,
            { "encoding": "jsonParsed", "maxSupportedTransactionVersion": 0 }
        ]);
        let result = self.call("getTransaction", params).await?;

        if result.is_null() {
            return Ok(None);
        }

        let meta = result
            .get("meta")
            .filter(|m| !m.is_null())
            .ok_or_else(|| AppError::tx_parse_failed("transaction has no meta"))?;

        let pre_balances: Vec<u64> = meta
            .get("preBalances")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .ok_or_else(|| AppError::tx_parse_failed("missing preBalances"))?;

        let post_balances: Vec<u64> = meta
            .get("postBalances")
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .ok_or_else(|| AppError::tx_parse_failed("missing postBalances"))?;

        // jsonParsed encoding wraps each key in an object; raw encoding is a
        // plain string array. Accept both.
        let account_keys = result
            .get("transaction")
            .and_then(|t| t.get("message"))
            .and_then(|m| m.get("accountKeys"))
            .and_then(|keys| keys.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|k| {
                        k.as_str()
                            .or_else(|| k.get("pubkey").and_then(|p| p.as_str()))
                            .map(String::from)
                    })
                    .collect::<Vec<_>>()
            })
            .ok_or_else(|| AppError::tx_parse_failed("missing accountKeys"))?;

        let block_time = result.get("blockTime").and_then(|t| t.as_i64());

        Ok(Some(TransactionDetail {
            account_keys,
            pre_balances,
            post_balances,
            block_time,
        }))
    }

    async fn balance(&self, wallet: &str) -> AppResult<u64> {
        let result = self.call("getBalance", json!([wallet])).await?;
        result
            .get("value")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| AppError::rpc_error("No balance value in response"))
    }
}

// ============================================
// NOTARY RELAY WRITER
// ============================================

/// [`LedgerWriter`] that forwards integrity records to a notary relay
/// service over HTTP. The relay holds the signing keypair and submits the
/// actual ledger transaction; this process never touches key material.
pub struct RelayLedgerWriter {
    relay_url: String,
    client: reqwest::Client,
}

impl RelayLedgerWriter {
    pub fn new(relay_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT_STRING)
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::rpc_connection_failed(format!("HTTP client: {}", e)))?;

        Ok(Self {
            relay_url: relay_url.into(),
            client,
        })
    }
}

#[async_trait]
impl LedgerWriter for RelayLedgerWriter {
    async fn write_integrity_record(
        &self,
        record_address: &str,
        gini_fixed: u16,
        hhi_fixed: u16,
        status_code: u8,
    ) -> AppResult<NotaryReceipt> {
        let payload = json!({
            "record_address": record_address,
            "gini": gini_fixed,
            "hhi": hhi_fixed,
            "status": status_code,
        });

        let response = self
            .client
            .post(&self.relay_url)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::notary_write_failed(format!(
                "relay returned HTTP {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response.json().await?;
        let signature = body
            .get("signature")
            .and_then(|s| s.as_str())
            .ok_or_else(|| AppError::notary_write_failed("relay response missing signature"))?
            .to_string();

        Ok(NotaryReceipt {
            signature,
            record_address: record_address.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_for_subject_wallet() {
        let detail = TransactionDetail {
            account_keys: vec!["alice".into(), "bob".into()],
            pre_balances: vec![1_000, 500],
            post_balances: vec![700, 800],
            block_time: Some(1_700_000_000),
        };
        assert_eq!(detail.delta_for("alice"), Some(-300));
        assert_eq!(detail.delta_for("bob"), Some(300));
        assert_eq!(detail.delta_for("carol"), None);
    }

    #[test]
    fn test_delta_for_misaligned_balances() {
        let detail = TransactionDetail {
            account_keys: vec!["alice".into(), "bob".into()],
            pre_balances: vec![1_000],
            post_balances: vec![700],
            block_time: None,
        };
        // bob has a key but no balance entry
        assert_eq!(detail.delta_for("bob"), None);
    }
}

//! TrustChain Sentinel - one-shot wallet audit CLI
//!
//! Evaluates a single wallet from the command line and prints the verdict.
//!
//! Usage:
//!   cargo run -- <WALLET_ADDRESS>
//!
//! Environment:
//!   SOLANA_RPC_URL        - ledger read endpoint (default: devnet)
//!   NOTARY_ENABLED        - set "false" to log verdicts only
//!   RUST_LOG              - log level (default: info)

use std::sync::Arc;

use eyre::{eyre, Result};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use trustchain_sentinel::{IntegrityAuditor, RpcLedgerClient, SentinelConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    let wallet = std::env::args()
        .nth(1)
        .ok_or_else(|| eyre!("usage: sentinel <WALLET_ADDRESS>"))?;
    let wallet = wallet.trim().to_string();

    if wallet.is_empty() || bs58::decode(&wallet).into_vec().is_err() {
        return Err(eyre!("invalid wallet address: {}", wallet));
    }

    let config = SentinelConfig::from_env();
    let reader = Arc::new(RpcLedgerClient::new(config.rpc_url.clone(), config.rpc_timeout)?);

    // CLI runs read-only; verdicts are printed, not notarized
    let auditor = IntegrityAuditor::from_config(&config, reader, None);

    let verdict = auditor.audit(&wallet).await;

    println!();
    println!("Wallet:  {}", wallet);
    println!("Status:  {}", verdict.status.as_str());
    println!("Reason:  {}", verdict.reason);
    println!("Gini:    {:.4}", verdict.scores.gini);
    println!("HHI:     {:.4}", verdict.scores.hhi);
    println!("Sync:    {:.4}", verdict.scores.sync_index);
    println!("Latency: {}ms", verdict.latency_ms);

    Ok(())
}

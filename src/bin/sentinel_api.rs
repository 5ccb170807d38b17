//! TrustChain Sentinel API Server
//!
//! REST API for wallet behavioral-integrity classification
//!
//! Usage:
//!   cargo run --bin sentinel_api
//!
//! Environment:
//!   SENTINEL_PORT         - Server port (default: 8080)
//!   SENTINEL_HOST         - Server host (default: 0.0.0.0)
//!   SOLANA_RPC_URL        - Ledger read endpoint (default: devnet)
//!   NOTARY_RELAY_URL      - Notary relay endpoint (unset: verdicts not notarized)
//!   NOTARY_NAMESPACE_SEED - Derived-address namespace (default: "notary")
//!   NOTARY_ENABLED        - Set "false" to log verdicts only
//!   RUST_LOG              - Log level (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use trustchain_sentinel::api::{create_router, start_cleanup_task, AppState};
use trustchain_sentinel::providers::ledger::LedgerWriter;
use trustchain_sentinel::{IntegrityAuditor, RelayLedgerWriter, RpcLedgerClient, SentinelConfig};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .compact()
        .init();

    print_banner();

    let config = SentinelConfig::from_env();

    let reader = Arc::new(RpcLedgerClient::new(
        config.rpc_url.clone(),
        config.rpc_timeout,
    )?);

    // Notarization requires a relay that holds the signing keypair
    let writer: Option<Arc<dyn LedgerWriter>> = match std::env::var("NOTARY_RELAY_URL") {
        Ok(url) => {
            info!("🏛️ Notary relay: {}", url);
            Some(Arc::new(RelayLedgerWriter::new(url, config.rpc_timeout)?))
        }
        Err(_) => {
            info!("📭 NOTARY_RELAY_URL not set, verdicts will not be notarized");
            None
        }
    };

    let auditor = Arc::new(IntegrityAuditor::from_config(&config, reader, writer));
    let state = Arc::new(AppState::new(auditor, config.max_concurrent_audits));
    let state_for_shutdown = state.clone();

    // Start background cleanup task for rate limiter
    start_cleanup_task();
    info!("🧹 Background cleanup task started");

    let app = create_router(state);

    // Get server config from env
    // Railway uses PORT env var, fallback to SENTINEL_PORT for local dev
    let host = std::env::var("SENTINEL_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("SENTINEL_PORT"))
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("🚀 TrustChain Sentinel API starting on http://{}", addr);
    info!("");
    info!("Endpoints:");
    info!("  POST /v1/integrity/check  - Wallet behavioral-integrity audit");
    info!("  GET  /v1/stats            - Audit statistics");
    info!("  GET  /v1/health           - Health check");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");
    info!("");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    // Graceful shutdown sequence
    info!("");
    info!("🛑 Shutdown signal received, cleaning up...");

    let stats = state_for_shutdown.telemetry.get_stats();
    info!("   Total audits:  {}", stats.total_audits);
    info!("   Verified:      {}", stats.verified);
    info!("   Probationary:  {}", stats.probationary);
    info!("   Sybil:         {}", stats.sybil);
    info!("   Offline:       {}", stats.offline);
    info!("   Avg latency:   {:.2}ms", stats.avg_latency_ms);

    info!("👋 TrustChain Sentinel API shutdown complete");

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    ╔══════════════════════════════════════════════════╗
    ║                                                  ║
    ║        T R U S T C H A I N                       ║
    ║        S E N T I N E L   A P I   v0.1.0          ║
    ║                                                  ║
    ║     Wallet Behavioral-Integrity Classifier       ║
    ║                                                  ║
    ╚══════════════════════════════════════════════════╝
    "#
    );
}

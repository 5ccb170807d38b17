//! TrustChain Sentinel Library
//!
//! Behavioral-integrity classifier for Solana wallets. Builds a fresh
//! on-chain activity profile per request, scores it with three pure
//! metrics (Gini, HHI, synchronization index), classifies the wallet as
//! VERIFIED / PROBATIONARY / SYBIL, and notarizes terminal verdicts to a
//! derived on-chain record out of band.

pub mod api;
pub mod auditor;
pub mod core;
pub mod models;
pub mod notary;
pub mod providers;
pub mod telemetry;

pub use auditor::IntegrityAuditor;
pub use crate::core::acquisition::ProfileFetcher;
pub use crate::core::decision::{classify, Classification};
pub use crate::core::scoring::{gini, hhi, score_profile, sync_index};
pub use models::config::{AcquisitionConfig, IntegrityPolicy, NotaryConfig, SentinelConfig};
pub use models::errors::{AppError, AppResult, ErrorCode};
pub use models::types::{IntegrityScores, IntegrityStatus, Verdict, WalletProfile};
pub use notary::{derive_record_address, encode_score, NotaryPipeline};
pub use providers::ledger::{LedgerReader, LedgerWriter, RelayLedgerWriter, RpcLedgerClient};
pub use telemetry::{AuditStats, TelemetryCollector};

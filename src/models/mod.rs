//! Domain models, configuration, and error types

pub mod config;
pub mod errors;
pub mod types;

pub use config::{AcquisitionConfig, IntegrityPolicy, NotaryConfig, SentinelConfig};
pub use errors::{AppError, AppResult, ErrorCode};
pub use types::{IntegrityScores, IntegrityStatus, TransactionRecord, Verdict, WalletProfile};

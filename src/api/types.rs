//! API Request/Response Types

use serde::{Deserialize, Serialize};

use crate::models::types::{IntegrityScores, IntegrityStatus};
use crate::telemetry::AuditStats;

/// API Response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
    pub latency_ms: f64,
    pub timestamp: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T, latency_ms: f64) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(error: ApiError, latency_ms: f64) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            latency_ms,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

/// API Error
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "BAD_REQUEST".to_string(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}

// ============================================
// Integrity Check
// ============================================

#[derive(Debug, Deserialize)]
pub struct IntegrityCheckRequest {
    pub wallet_address: String,
    /// Caller-supplied stake balance (lamports); fetched upstream if absent
    #[serde(default)]
    pub stake_lamports: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct IntegrityCheckData {
    pub wallet_address: String,
    pub status: IntegrityStatus,
    pub scores: IntegrityScores,
    pub reason: String,
    pub evaluation_latency_ms: u64,
    /// "queued" when the verdict was handed to the notary, "skipped" otherwise
    pub notarization: &'static str,
}

// ============================================
// Health & Stats
// ============================================

#[derive(Debug, Serialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct StatsData {
    #[serde(flatten)]
    pub audits: AuditStats,
    pub uptime_seconds: u64,
    pub api_version: String,
}

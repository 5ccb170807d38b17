//! API Request Handlers

use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

use super::types::*;
use crate::auditor::IntegrityAuditor;
use crate::telemetry::TelemetryCollector;

/// Shared application state
pub struct AppState {
    pub auditor: Arc<IntegrityAuditor>,
    pub telemetry: Arc<TelemetryCollector>,
    pub start_time: Instant,
    /// Global ceiling on concurrent upstream evaluations
    pub audit_semaphore: Arc<Semaphore>,
}

impl AppState {
    pub fn new(auditor: Arc<IntegrityAuditor>, max_concurrent_audits: usize) -> Self {
        Self {
            auditor,
            telemetry: Arc::new(TelemetryCollector::new()),
            start_time: Instant::now(),
            audit_semaphore: Arc::new(Semaphore::new(max_concurrent_audits)),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    let start = Instant::now();

    let data = HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    };

    Json(ApiResponse::success(
        data,
        start.elapsed().as_secs_f64() * 1000.0,
    ))
}

// ============================================
// Integrity Check
// ============================================

pub async fn check_integrity(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IntegrityCheckRequest>,
) -> Result<Json<ApiResponse<IntegrityCheckData>>, (StatusCode, Json<ApiResponse<()>>)> {
    let start = Instant::now();

    // Well-formedness is the surrounding layer's concern; only reject the
    // obviously unusable here.
    let wallet = req.wallet_address.trim();
    if wallet.is_empty() || bs58::decode(wallet).into_vec().is_err() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(
                ApiError::bad_request("Invalid wallet address format"),
                start.elapsed().as_secs_f64() * 1000.0,
            )),
        ));
    }

    let _permit = state.audit_semaphore.acquire().await.map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(
                ApiError::internal("Audit pool closed"),
                start.elapsed().as_secs_f64() * 1000.0,
            )),
        )
    })?;

    let verdict = state
        .auditor
        .audit_with_stake(wallet, req.stake_lamports)
        .await;

    state
        .telemetry
        .record_audit(verdict.status, verdict.latency_ms);

    let notarization =
        if verdict.status.status_code().is_some() && state.auditor.notarization_enabled() {
            "queued"
        } else {
            "skipped"
        };

    let data = IntegrityCheckData {
        wallet_address: wallet.to_string(),
        status: verdict.status,
        scores: verdict.scores,
        reason: verdict.reason,
        evaluation_latency_ms: verdict.latency_ms,
        notarization,
    };

    Ok(Json(ApiResponse::success(
        data,
        start.elapsed().as_secs_f64() * 1000.0,
    )))
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<ApiResponse<StatsData>> {
    let start = Instant::now();

    let data = StatsData {
        audits: state.telemetry.get_stats(),
        uptime_seconds: state.uptime_seconds(),
        api_version: env!("CARGO_PKG_VERSION").to_string(),
    };

    Json(ApiResponse::success(
        data,
        start.elapsed().as_secs_f64() * 1000.0,
    ))
}

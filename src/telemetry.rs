//! Telemetry Module
//!
//! In-memory counters for the /v1/stats endpoint: audits by terminal
//! status plus average evaluation latency. No wallet addresses or
//! signatures are stored.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::types::IntegrityStatus;

/// Aggregated audit statistics.
#[derive(Debug, Clone, Serialize, Default)]
pub struct AuditStats {
    pub total_audits: u64,
    pub verified: u64,
    pub probationary: u64,
    pub sybil: u64,
    pub offline: u64,
    pub avg_latency_ms: f64,
}

/// Lock-free telemetry collector shared across requests.
#[derive(Default)]
pub struct TelemetryCollector {
    total: AtomicU64,
    verified: AtomicU64,
    probationary: AtomicU64,
    sybil: AtomicU64,
    offline: AtomicU64,
    latency_total_ms: AtomicU64,
}

impl TelemetryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed audit.
    pub fn record_audit(&self, status: IntegrityStatus, latency_ms: u64) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.latency_total_ms.fetch_add(latency_ms, Ordering::Relaxed);
        let counter = match status {
            IntegrityStatus::Verified => &self.verified,
            IntegrityStatus::Probationary => &self.probationary,
            IntegrityStatus::Sybil => &self.sybil,
            IntegrityStatus::Offline => &self.offline,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of current statistics.
    pub fn get_stats(&self) -> AuditStats {
        let total = self.total.load(Ordering::Relaxed);
        let latency_total = self.latency_total_ms.load(Ordering::Relaxed);
        AuditStats {
            total_audits: total,
            verified: self.verified.load(Ordering::Relaxed),
            probationary: self.probationary.load(Ordering::Relaxed),
            sybil: self.sybil.load(Ordering::Relaxed),
            offline: self.offline.load(Ordering::Relaxed),
            avg_latency_ms: if total > 0 {
                latency_total as f64 / total as f64
            } else {
                0.0
            },
        }
    }
}

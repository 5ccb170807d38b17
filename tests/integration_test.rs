//! End-to-end pipeline tests against in-memory ledger doubles
//!
//! Covers the full audit path: acquisition with retry and skip behavior,
//! scoring, classification, the OFFLINE fallback, and out-of-band
//! notarization.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use trustchain_sentinel::models::config::{AcquisitionConfig, IntegrityPolicy, NotaryConfig};
use trustchain_sentinel::models::errors::{AppError, AppResult};
use trustchain_sentinel::models::types::IntegrityStatus;
use trustchain_sentinel::notary::{derive_record_address, NotaryPipeline};
use trustchain_sentinel::providers::ledger::{
    LedgerReader, LedgerWriter, NotaryReceipt, SignatureInfo, TransactionDetail,
};
use trustchain_sentinel::{IntegrityAuditor, ProfileFetcher};

// ============================================
// Ledger doubles
// ============================================

#[derive(Default)]
struct MockLedger {
    signatures: Vec<SignatureInfo>,
    details: HashMap<String, TransactionDetail>,
    failing_details: HashSet<String>,
    balance: u64,
    fail_signature_list: bool,
    rate_limits_before_success: AtomicU32,
    signature_calls: AtomicU32,
}

#[async_trait]
impl LedgerReader for MockLedger {
    async fn recent_signatures(
        &self,
        _wallet: &str,
        _limit: usize,
    ) -> AppResult<Vec<SignatureInfo>> {
        self.signature_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_signature_list {
            return Err(AppError::rpc_error("upstream down"));
        }
        if self
            .rate_limits_before_success
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(AppError::rpc_rate_limited());
        }
        Ok(self.signatures.clone())
    }

    async fn transaction_detail(&self, signature: &str) -> AppResult<Option<TransactionDetail>> {
        if self.failing_details.contains(signature) {
            return Err(AppError::tx_parse_failed(format!("bad tx {}", signature)));
        }
        Ok(self.details.get(signature).cloned())
    }

    async fn balance(&self, _wallet: &str) -> AppResult<u64> {
        Ok(self.balance)
    }
}

#[derive(Default)]
struct RecordingWriter {
    writes: Mutex<Vec<(String, u16, u16, u8)>>,
    fail: bool,
}

#[async_trait]
impl LedgerWriter for RecordingWriter {
    async fn write_integrity_record(
        &self,
        record_address: &str,
        gini_fixed: u16,
        hhi_fixed: u16,
        status_code: u8,
    ) -> AppResult<NotaryReceipt> {
        if self.fail {
            return Err(AppError::notary_write_failed("relay rejected write"));
        }
        self.writes.lock().unwrap().push((
            record_address.to_string(),
            gini_fixed,
            hhi_fixed,
            status_code,
        ));
        Ok(NotaryReceipt {
            signature: "mock-sig".to_string(),
            record_address: record_address.to_string(),
        })
    }
}

// ============================================
// Fixtures
// ============================================

const WALLET: &str = "SubjectWallet1111111111111111111111111111111";
const STAKE_OK: u64 = 100_000_000; // 0.1 SOL, above the floor

fn fast_acquisition() -> AcquisitionConfig {
    AcquisitionConfig {
        fetch_limit: 15,
        pacing_delay: Duration::from_millis(1),
        max_attempts: 3,
        base_retry_delay: Duration::from_millis(20),
    }
}

fn sig(id: &str, block_time: i64) -> SignatureInfo {
    SignatureInfo {
        signature: id.to_string(),
        block_time: Some(block_time),
    }
}

/// A transaction moving `delta` lamports into the subject wallet.
fn detail(delta: i64, block_time: i64) -> TransactionDetail {
    let pre: u64 = 10_000_000;
    TransactionDetail {
        account_keys: vec![WALLET.to_string(), "CounterpartyWallet".to_string()],
        pre_balances: vec![pre, pre],
        post_balances: vec![(pre as i64 + delta) as u64, (pre as i64 - delta) as u64],
        block_time: Some(block_time),
    }
}

fn auditor_with(
    ledger: MockLedger,
    writer: Option<Arc<RecordingWriter>>,
) -> IntegrityAuditor {
    let fetcher = ProfileFetcher::new(Arc::new(ledger), fast_acquisition());
    let notary = writer.map(|w| {
        Arc::new(NotaryPipeline::new(
            w as Arc<dyn LedgerWriter>,
            NotaryConfig::default(),
        ))
    });
    IntegrityAuditor::new(fetcher, notary, IntegrityPolicy::default())
}

// ============================================
// Scenario A: organic wallet
// ============================================

#[tokio::test]
async fn organic_wallet_is_verified() {
    let mut ledger = MockLedger {
        balance: STAKE_OK,
        ..Default::default()
    };
    // Three equal transfers, 100 seconds apart
    for (i, t) in [1_000, 1_100, 1_200].iter().enumerate() {
        let id = format!("sig-{}", i);
        ledger.signatures.push(sig(&id, *t));
        ledger.details.insert(id, detail(5_000, *t));
    }

    let verdict = auditor_with(ledger, None).audit(WALLET).await;

    assert_eq!(verdict.status, IntegrityStatus::Verified);
    assert_eq!(verdict.scores.gini, 0.0);
    assert_eq!(verdict.scores.sync_index, 0.0);
    assert_eq!(verdict.reason, "Behavior aligns with organic patterns.");
}

// ============================================
// Scenario B: synchronized bot cluster
// ============================================

#[tokio::test]
async fn synchronized_wallet_is_sybil_and_notarized() {
    let mut ledger = MockLedger {
        balance: STAKE_OK,
        ..Default::default()
    };
    // Four equal transfers within a 3-second burst: sync 3/4, hhi 1/4
    for (i, t) in [1_000, 1_001, 1_002, 1_003].iter().enumerate() {
        let id = format!("sig-{}", i);
        ledger.signatures.push(sig(&id, *t));
        ledger.details.insert(id, detail(1_000, *t));
    }

    let writer = Arc::new(RecordingWriter::default());
    let auditor = auditor_with(ledger, Some(writer.clone()));

    let verdict = auditor.audit(WALLET).await;

    assert_eq!(verdict.status, IntegrityStatus::Sybil);
    assert_eq!(verdict.scores.sync_index, 0.75);
    assert_eq!(
        verdict.reason,
        "High temporal synchronization or extreme inequality detected."
    );

    // Notarization runs on a detached task
    tokio::time::sleep(Duration::from_millis(100)).await;
    let writes = writer.writes.lock().unwrap();
    assert_eq!(writes.len(), 1);
    let (address, gini_fixed, hhi_fixed, status_code) = &writes[0];
    assert_eq!(*address, derive_record_address("notary", WALLET));
    assert_eq!(*gini_fixed, 0); // equal amounts
    assert_eq!(*hhi_fixed, 2_500); // four equal positions
    assert_eq!(*status_code, 2);
}

// ============================================
// Scenario C: rate-limited upstream recovers
// ============================================

#[tokio::test]
async fn rate_limited_fetch_backs_off_and_recovers() {
    let mut ledger = MockLedger {
        balance: STAKE_OK,
        rate_limits_before_success: AtomicU32::new(2),
        ..Default::default()
    };
    for (i, t) in [1_000, 1_100, 1_200].iter().enumerate() {
        let id = format!("sig-{}", i);
        ledger.signatures.push(sig(&id, *t));
        ledger.details.insert(id, detail(5_000, *t));
    }

    let auditor = auditor_with(ledger, None);

    let start = Instant::now();
    let verdict = auditor.audit(WALLET).await;
    let elapsed = start.elapsed();

    assert_eq!(verdict.status, IntegrityStatus::Verified);
    // Two backoff waits: base + 2*base, jitter excluded
    assert!(
        elapsed >= Duration::from_millis(60),
        "expected backoff waits, took {:?}",
        elapsed
    );
}

// ============================================
// OFFLINE fallback
// ============================================

#[tokio::test]
async fn dead_upstream_yields_offline_not_probationary() {
    let ledger = MockLedger {
        balance: STAKE_OK,
        fail_signature_list: true,
        ..Default::default()
    };

    let writer = Arc::new(RecordingWriter::default());
    let auditor = auditor_with(ledger, Some(writer.clone()));

    let verdict = auditor.audit(WALLET).await;

    assert_eq!(verdict.status, IntegrityStatus::Offline);
    assert!(verdict.scores.is_zero());
    assert_eq!(
        verdict.reason,
        "Upstream ledger unreachable; no verdict available."
    );

    // OFFLINE is never written to the ledger
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(writer.writes.lock().unwrap().is_empty());
}

// ============================================
// Partial-failure tolerance
// ============================================

#[tokio::test]
async fn unusable_transactions_are_skipped() {
    let mut ledger = MockLedger {
        balance: STAKE_OK,
        ..Default::default()
    };
    // Three usable transactions
    for (i, t) in [1_000, 1_100, 1_200].iter().enumerate() {
        let id = format!("sig-{}", i);
        ledger.signatures.push(sig(&id, *t));
        ledger.details.insert(id, detail(5_000, *t));
    }
    // One with no upstream record, one that fails to parse
    ledger.signatures.push(sig("sig-missing", 1_300));
    ledger.signatures.push(sig("sig-broken", 1_400));
    ledger.failing_details.insert("sig-broken".to_string());

    let verdict = auditor_with(ledger, None).audit(WALLET).await;

    // Still enough observations for a full verdict
    assert_eq!(verdict.status, IntegrityStatus::Verified);
}

#[tokio::test]
async fn thin_history_is_probationary() {
    let mut ledger = MockLedger {
        balance: STAKE_OK,
        ..Default::default()
    };
    for (i, t) in [1_000, 1_100].iter().enumerate() {
        let id = format!("sig-{}", i);
        ledger.signatures.push(sig(&id, *t));
        ledger.details.insert(id, detail(5_000, *t));
    }

    let verdict = auditor_with(ledger, None).audit(WALLET).await;

    assert_eq!(verdict.status, IntegrityStatus::Probationary);
    assert_eq!(
        verdict.reason,
        "Insufficient transaction history for full analysis."
    );
}

#[tokio::test]
async fn low_stake_is_probationary_before_anything_else() {
    let mut ledger = MockLedger {
        balance: 1_000, // far below the 0.05 SOL floor
        ..Default::default()
    };
    for (i, t) in [1_000, 1_001, 1_002, 1_003].iter().enumerate() {
        let id = format!("sig-{}", i);
        ledger.signatures.push(sig(&id, *t));
        ledger.details.insert(id, detail(1_000, *t));
    }

    // Bot-like timing, but the stake floor is checked first
    let verdict = auditor_with(ledger, None).audit(WALLET).await;

    assert_eq!(verdict.status, IntegrityStatus::Probationary);
    assert_eq!(verdict.reason, "Insufficient economic stake.");
}

// ============================================
// Notarization isolation
// ============================================

#[tokio::test]
async fn failed_notarization_never_alters_the_verdict() {
    let mut ledger = MockLedger {
        balance: STAKE_OK,
        ..Default::default()
    };
    for (i, t) in [1_000, 1_100, 1_200].iter().enumerate() {
        let id = format!("sig-{}", i);
        ledger.signatures.push(sig(&id, *t));
        ledger.details.insert(id, detail(5_000, *t));
    }

    let writer = Arc::new(RecordingWriter {
        fail: true,
        ..Default::default()
    });
    let auditor = auditor_with(ledger, Some(writer.clone()));

    let verdict = auditor.audit(WALLET).await;
    assert_eq!(verdict.status, IntegrityStatus::Verified);

    // The failing write is absorbed on the detached task
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(writer.writes.lock().unwrap().is_empty());
}

#[test]
fn notarization_disposition_reflects_wiring() {
    // No writer wired: verdicts are never queued
    let without = auditor_with(MockLedger::default(), None);
    assert!(!without.notarization_enabled());

    let with = auditor_with(
        MockLedger::default(),
        Some(Arc::new(RecordingWriter::default())),
    );
    assert!(with.notarization_enabled());
}

#[test]
fn disabled_notary_reports_not_enabled() {
    let writer: Arc<dyn LedgerWriter> = Arc::new(RecordingWriter::default());
    let pipeline = Arc::new(NotaryPipeline::new(
        writer,
        NotaryConfig {
            namespace_seed: "notary".to_string(),
            enabled: false,
        },
    ));
    let fetcher = ProfileFetcher::new(Arc::new(MockLedger::default()), fast_acquisition());
    let auditor = IntegrityAuditor::new(fetcher, Some(pipeline), IntegrityPolicy::default());

    assert!(!auditor.notarization_enabled());
}

#[tokio::test]
async fn caller_supplied_stake_skips_balance_lookup() {
    let mut ledger = MockLedger::default(); // balance 0 on the ledger
    for (i, t) in [1_000, 1_100, 1_200].iter().enumerate() {
        let id = format!("sig-{}", i);
        ledger.signatures.push(sig(&id, *t));
        ledger.details.insert(id, detail(5_000, *t));
    }

    let auditor = auditor_with(ledger, None);
    let verdict = auditor.audit_with_stake(WALLET, Some(STAKE_OK)).await;

    assert_eq!(verdict.status, IntegrityStatus::Verified);
}

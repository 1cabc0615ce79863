//! Service counters
//!
//! - Counters only, monotonic, reset on process start
//! - Per-kind counters are fixed arrays indexed by `RecordKind`
//! - HTTP request counts are keyed by method, matched route and status

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use crate::db::StoreError;
use crate::models::RecordKind;

/// Labels of one HTTP request series.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestKey {
    pub method: String,
    pub route: String,
    pub status: u16,
}

const STORE_ERROR_KINDS: [&str; 3] = ["constraint_violation", "connectivity", "query"];

/// Registry of all service counters.
#[derive(Debug)]
pub struct MetricsRegistry {
    started_at: Instant,
    records_created: [AtomicU64; 2],
    records_deleted: [AtomicU64; 2],
    compaction_updates: [AtomicU64; 2],
    compaction_moves: [AtomicU64; 2],
    store_errors: [AtomicU64; 3],
    http_requests: Mutex<BTreeMap<RequestKey, u64>>,
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self {
            started_at: Instant::now(),
            records_created: Default::default(),
            records_deleted: Default::default(),
            compaction_updates: Default::default(),
            compaction_moves: Default::default(),
            store_errors: Default::default(),
            http_requests: Mutex::new(BTreeMap::new()),
        }
    }
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uptime_seconds(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }

    pub fn record_created(&self, kind: RecordKind) {
        self.records_created[kind.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_deleted(&self, kind: RecordKind, rows: u64) {
        self.records_deleted[kind.index()].fetch_add(rows, Ordering::Relaxed);
    }

    pub fn record_compaction(&self, kind: RecordKind, updates: u64, moves: u64) {
        self.compaction_updates[kind.index()].fetch_add(updates, Ordering::Relaxed);
        self.compaction_moves[kind.index()].fetch_add(moves, Ordering::Relaxed);
    }

    pub fn record_store_error(&self, error: &StoreError) {
        let slot = match error {
            StoreError::ConstraintViolation(_) => 0,
            StoreError::Connectivity(_) => 1,
            StoreError::Query(_) => 2,
        };
        self.store_errors[slot].fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_request(&self, method: &str, route: &str, status: u16) {
        let key = RequestKey {
            method: method.to_owned(),
            route: route.to_owned(),
            status,
        };
        let mut requests = self
            .http_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *requests.entry(key).or_insert(0) += 1;
    }

    pub fn records_created(&self, kind: RecordKind) -> u64 {
        self.records_created[kind.index()].load(Ordering::Relaxed)
    }

    pub fn records_deleted(&self, kind: RecordKind) -> u64 {
        self.records_deleted[kind.index()].load(Ordering::Relaxed)
    }

    pub fn compaction_updates(&self, kind: RecordKind) -> u64 {
        self.compaction_updates[kind.index()].load(Ordering::Relaxed)
    }

    pub fn compaction_moves(&self, kind: RecordKind) -> u64 {
        self.compaction_moves[kind.index()].load(Ordering::Relaxed)
    }

    /// Store error counts, labelled by error kind.
    pub fn store_errors(&self) -> Vec<(&'static str, u64)> {
        STORE_ERROR_KINDS
            .iter()
            .zip(&self.store_errors)
            .map(|(label, count)| (*label, count.load(Ordering::Relaxed)))
            .collect()
    }

    /// Snapshot of request counts in label order.
    pub fn requests(&self) -> Vec<(RequestKey, u64)> {
        self.http_requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }
}

//! Operation counters for one registry, with a serializable snapshot.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Cheap atomic counters incremented on the registry's hot paths.
#[derive(Debug, Default)]
pub struct Telemetry {
    lookups: AtomicU64,
    cache_hits: AtomicU64,
    graph_searches: AtomicU64,
    fabrications: AtomicU64,
    establishments: AtomicU64,
    duplicates_rejected: AtomicU64,
    type_mismatches_rejected: AtomicU64,
    inactive_blocked: AtomicU64,
    thread_violations: AtomicU64,
    shutdown_denials: AtomicU64,
}

impl Telemetry {
    pub(crate) fn record_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_graph_search(&self) {
        self.graph_searches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fabrication(&self) {
        self.fabrications.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_establishment(&self) {
        self.establishments.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_duplicate(&self) {
        self.duplicates_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_type_mismatch(&self) {
        self.type_mismatches_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_inactive_block(&self) {
        self.inactive_blocked.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_thread_violation(&self) {
        self.thread_violations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_shutdown_denial(&self) {
        self.shutdown_denials.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            lookups: self.lookups.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            graph_searches: self.graph_searches.load(Ordering::Relaxed),
            fabrications: self.fabrications.load(Ordering::Relaxed),
            establishments: self.establishments.load(Ordering::Relaxed),
            duplicates_rejected: self.duplicates_rejected.load(Ordering::Relaxed),
            type_mismatches_rejected: self.type_mismatches_rejected.load(Ordering::Relaxed),
            inactive_blocked: self.inactive_blocked.load(Ordering::Relaxed),
            thread_violations: self.thread_violations.load(Ordering::Relaxed),
            shutdown_denials: self.shutdown_denials.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time counter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TelemetrySnapshot {
    pub lookups: u64,
    pub cache_hits: u64,
    pub graph_searches: u64,
    pub fabrications: u64,
    pub establishments: u64,
    pub duplicates_rejected: u64,
    pub type_mismatches_rejected: u64,
    pub inactive_blocked: u64,
    pub thread_violations: u64,
    pub shutdown_denials: u64,
}

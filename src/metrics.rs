// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the cluster configuration operator.
//!
//! All metrics carry the namespace prefix `clustercfg_` and live in
//! [`METRICS_REGISTRY`], which the HTTP server in [`crate::server`] exposes on
//! `/metrics`.
//!
//! # Metrics Categories
//!
//! - **Reconciliation Metrics** - Passes per controller and outcome, and their duration
//! - **Feature Gate Metrics** - Status writes and the size of the current snapshot
//! - **Leader Election Metrics** - Leadership state of this replica
//!
//! # Example
//!
//! ```rust,no_run
//! use clustercfg::metrics::{record_reconciliation, ReconcileOutcome};
//!
//! record_reconciliation(
//!     "FeatureGateController",
//!     ReconcileOutcome::Unchanged,
//!     std::time::Duration::from_millis(12),
//! );
//! ```

use prometheus::{
    CounterVec, Encoder, GaugeVec, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all operator metrics
const METRICS_NAMESPACE: &str = "clustercfg";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Reconciliation Metrics
// ============================================================================

/// Outcome of a single reconciliation pass, used as the `outcome` label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The pass wrote new state
    Updated,
    /// Desired state already matched, nothing written
    Unchanged,
    /// A required input was not available yet
    Skipped,
    /// The pass failed
    Error,
}

impl ReconcileOutcome {
    /// Label value for this outcome
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
            Self::Skipped => "skipped",
            Self::Error => "error",
        }
    }
}

/// Total number of reconciliation passes by controller and outcome
///
/// Labels:
/// - `controller`: Controller name (e.g., `FeatureGateController`)
/// - `outcome`: `updated`, `unchanged`, `skipped` or `error`
pub static RECONCILIATION_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_reconciliations_total"),
        "Total number of reconciliation passes by controller and outcome",
    );
    let counter = CounterVec::new(opts, &["controller", "outcome"])
        .expect("reconciliations_total metric definition is valid");
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .expect("reconciliations_total is registered once");
    counter
});

/// Duration of reconciliation passes in seconds
///
/// Labels:
/// - `controller`: Controller name
pub static RECONCILIATION_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_reconciliation_duration_seconds"),
        "Duration of reconciliation passes in seconds by controller",
    )
    .buckets(vec![0.001, 0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]);
    let histogram = HistogramVec::new(opts, &["controller"])
        .expect("reconciliation_duration_seconds metric definition is valid");
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .expect("reconciliation_duration_seconds is registered once");
    histogram
});

// ============================================================================
// Feature Gate Metrics
// ============================================================================

/// Total number of status writes by resource kind
///
/// Labels:
/// - `resource_type`: `FeatureGate` or `ClusterOperator`
pub static STATUS_WRITES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_status_writes_total"),
        "Total number of status writes by resource type",
    );
    let counter = CounterVec::new(opts, &["resource_type"])
        .expect("status_writes_total metric definition is valid");
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .expect("status_writes_total is registered once");
    counter
});

/// Number of gates in the current release's snapshot
///
/// Labels:
/// - `state`: `enabled` or `disabled`
pub static FEATURE_GATES: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_feature_gates"),
        "Number of feature gates in the current release snapshot by state",
    );
    let gauge = GaugeVec::new(opts, &["state"]).expect("feature_gates metric definition is valid");
    METRICS_REGISTRY
        .register(Box::new(gauge.clone()))
        .expect("feature_gates is registered once");
    gauge
});

// ============================================================================
// Leader Election Metrics
// ============================================================================

/// Current leader election status (1 = leader, 0 = follower)
///
/// Labels:
/// - `pod_name`: Identity of this replica
pub static LEADER_STATUS: LazyLock<GaugeVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_leader_status"),
        "Current leader election status (1 = leader, 0 = follower)",
    );
    let gauge =
        GaugeVec::new(opts, &["pod_name"]).expect("leader_status metric definition is valid");
    METRICS_REGISTRY
        .register(Box::new(gauge.clone()))
        .expect("leader_status is registered once");
    gauge
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record one reconciliation pass.
pub fn record_reconciliation(controller: &str, outcome: ReconcileOutcome, duration: Duration) {
    RECONCILIATION_TOTAL
        .with_label_values(&[controller, outcome.as_str()])
        .inc();
    RECONCILIATION_DURATION_SECONDS
        .with_label_values(&[controller])
        .observe(duration.as_secs_f64());
}

/// Record a successful status write.
pub fn record_status_write(resource_type: &str) {
    STATUS_WRITES_TOTAL.with_label_values(&[resource_type]).inc();
}

/// Record the size of the current release's snapshot.
#[allow(clippy::cast_precision_loss)]
pub fn record_feature_gate_counts(enabled: usize, disabled: usize) {
    FEATURE_GATES
        .with_label_values(&["enabled"])
        .set(enabled as f64);
    FEATURE_GATES
        .with_label_values(&["disabled"])
        .set(disabled as f64);
}

/// Record that this replica holds the lease.
pub fn record_leader_elected(pod_name: &str) {
    LEADER_STATUS.with_label_values(&[pod_name]).set(1.0);
}

/// Record that this replica no longer holds the lease.
pub fn record_leader_lost(pod_name: &str) {
    LEADER_STATUS.with_label_values(&[pod_name]).set(0.0);
}

/// Gather all metrics in Prometheus text format
///
/// # Errors
///
/// Returns an error if metrics cannot be encoded.
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}

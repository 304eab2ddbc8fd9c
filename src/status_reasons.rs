// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Condition types and reasons reported on the operator's `ClusterOperator`.
//!
//! Reasons are programmatic identifiers in `CamelCase` that explain why a condition
//! has a particular status.
//!
//! # Condition Hierarchy
//!
//! Each controller owns one `<Controller>Degraded` condition. The top-level
//! `Degraded` condition aggregates them: it is `True` as soon as any controller
//! reports degraded, and carries the failing controllers' messages.
//!
//! # Example Status
//!
//! ```yaml
//! status:
//!   conditions:
//!     - type: Available
//!       status: "True"
//!       reason: AsExpected
//!     - type: Degraded
//!       status: "True"
//!       reason: FeatureGateController_SyncError
//!       message: 'FeatureGateControllerDegraded: trying to enable and disable "X"'
//!     - type: FeatureGateControllerDegraded
//!       status: "True"
//!       reason: SyncError
//!       message: 'trying to enable and disable "X"'
//!   versions:
//!     - name: feature-gates
//!       version: 4.16.0
//!     - name: operator
//!       version: 4.16.0
//! ```

// ============================================================================
// Condition Types
// ============================================================================

/// The operator is functional and available.
pub const CONDITION_TYPE_AVAILABLE: &str = "Available";

/// The operator is rolling out a change.
pub const CONDITION_TYPE_PROGRESSING: &str = "Progressing";

/// At least one controller is failing to reconcile.
pub const CONDITION_TYPE_DEGRADED: &str = "Degraded";

/// The cluster may be upgraded.
pub const CONDITION_TYPE_UPGRADEABLE: &str = "Upgradeable";

/// Suffix appended to a controller name to form its own degraded condition type.
pub const CONDITION_TYPE_DEGRADED_SUFFIX: &str = "Degraded";

// ============================================================================
// Condition Statuses
// ============================================================================

/// Condition status `True`
pub const STATUS_TRUE: &str = "True";

/// Condition status `False`
pub const STATUS_FALSE: &str = "False";

// ============================================================================
// Reasons
// ============================================================================

/// Everything is operating normally.
pub const REASON_AS_EXPECTED: &str = "AsExpected";

/// A controller's last reconciliation pass failed.
pub const REASON_SYNC_ERROR: &str = "SyncError";

/// Condition type of the degraded condition owned by `controller`.
///
/// # Example
///
/// ```rust
/// use clustercfg::status_reasons::degraded_condition_type;
///
/// assert_eq!(
///     degraded_condition_type("FeatureGateController"),
///     "FeatureGateControllerDegraded"
/// );
/// ```
#[must_use]
pub fn degraded_condition_type(controller: &str) -> String {
    format!("{controller}{CONDITION_TYPE_DEGRADED_SUFFIX}")
}

/// Controller name owning a per-controller degraded condition type, if it is one.
///
/// The aggregated `Degraded` condition itself is not a per-controller condition.
#[must_use]
pub fn degraded_controller(condition_type: &str) -> Option<&str> {
    condition_type
        .strip_suffix(CONDITION_TYPE_DEGRADED_SUFFIX)
        .filter(|controller| !controller.is_empty())
}

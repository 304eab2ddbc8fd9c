// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `FeatureGate` status reconciliation.
//!
//! One pass reads the cluster `FeatureGate`, the `ClusterVersion` upgrade history and
//! the `Node` config, resolves the selected feature set for the running release,
//! merges the result with the snapshots recorded for earlier releases, and writes the
//! status back only when it changed.
//!
//! Once the status for the running release is in place (written now, or already
//! present), the `feature-gates` version is reported as achieved.

use crate::constants::{FEATURE_VERSION_NAME, KIND_FEATURE_GATE};
use crate::context::Context;
use crate::crd::{FeatureGate, FeatureGateDetails, FeatureGateStatus};
use crate::events::{actions, reasons};
use crate::featuregates::{
    current_minimum_versions, known_versions, merge_history, resolve_snapshot,
};
use crate::metrics::{self, ReconcileOutcome};
use anyhow::{Context as _, Result};
use kube::runtime::events::EventType;
use kube::Resource;
use tracing::{debug, info};

/// What a feature gate reconciliation pass did.
#[derive(Clone, Debug, PartialEq)]
pub enum FeatureGateSync {
    /// The `FeatureGate` does not exist yet
    FeatureGateMissing,
    /// The `ClusterVersion` does not exist yet
    ClusterVersionMissing,
    /// The persisted status already matched
    Unchanged {
        /// Snapshot for the running release
        current: FeatureGateDetails,
    },
    /// The status was rewritten
    Updated {
        /// Snapshot for the running release
        current: FeatureGateDetails,
    },
}

impl FeatureGateSync {
    /// Metrics outcome for this pass.
    #[must_use]
    pub fn outcome(&self) -> ReconcileOutcome {
        match self {
            Self::FeatureGateMissing | Self::ClusterVersionMissing => ReconcileOutcome::Skipped,
            Self::Unchanged { .. } => ReconcileOutcome::Unchanged,
            Self::Updated { .. } => ReconcileOutcome::Updated,
        }
    }

    /// The running release's snapshot, when the pass got far enough to compute it.
    #[must_use]
    pub fn current(&self) -> Option<&FeatureGateDetails> {
        match self {
            Self::Unchanged { current } | Self::Updated { current } => Some(current),
            Self::FeatureGateMissing | Self::ClusterVersionMissing => None,
        }
    }
}

/// Run one feature gate reconciliation pass.
///
/// # Errors
///
/// Returns an error if a cluster object cannot be read, the feature set cannot be
/// resolved, or the status write fails. Nothing is written in any of these cases.
pub async fn reconcile_feature_gates(ctx: &Context) -> Result<FeatureGateSync> {
    let Some(feature_gate) = ctx.source.feature_gate().await? else {
        debug!("FeatureGate not found, nothing to do yet");
        return Ok(FeatureGateSync::FeatureGateMissing);
    };

    let Some(cluster_version) = ctx.source.cluster_version().await? else {
        debug!("ClusterVersion not found, nothing to do yet");
        return Ok(FeatureGateSync::ClusterVersionMissing);
    };

    let history = cluster_version
        .status
        .as_ref()
        .map(|status| status.history.as_slice())
        .unwrap_or_default();
    let known = known_versions(&ctx.process_version, history);

    let node_config = ctx.source.node_config().await?;
    let minimum_versions = current_minimum_versions(node_config.as_ref());

    let current = resolve_snapshot(
        &ctx.catalog,
        &feature_gate.spec,
        &ctx.process_version,
        &minimum_versions,
    )
    .context("unable to determine FeatureGateDetails from FeatureSets")?;

    let previous = feature_gate
        .status
        .as_ref()
        .map(|status| status.feature_gates.as_slice())
        .unwrap_or_default();
    let desired = merge_history(current.clone(), previous, &known);

    if desired == previous {
        ctx.operator_status
            .set_version(FEATURE_VERSION_NAME, &ctx.process_version);
        debug!(version = %ctx.process_version, "FeatureGate status already up to date");
        return Ok(FeatureGateSync::Unchanged { current });
    }

    let status = FeatureGateStatus {
        feature_gates: desired,
        conditions: feature_gate
            .status
            .as_ref()
            .map(|status| status.conditions.clone())
            .unwrap_or_default(),
    };
    ctx.source
        .update_feature_gate_status(&feature_gate, &status)
        .await?;
    metrics::record_status_write(KIND_FEATURE_GATE);

    info!(
        feature_set = %feature_gate.spec.feature_set,
        version = %ctx.process_version,
        enabled_count = current.enabled.len(),
        disabled_count = current.disabled.len(),
        snapshots = status.feature_gates.len(),
        "Updated FeatureGate status"
    );
    publish_update_event(ctx, &feature_gate, &current).await;

    ctx.operator_status
        .set_version(FEATURE_VERSION_NAME, &ctx.process_version);

    Ok(FeatureGateSync::Updated { current })
}

/// Event note summarising a resolution, e.g.
/// `FeatureSet="Default", Version="4.16.0", Enabled="A,B", Disabled="C"`.
#[must_use]
pub fn update_event_note(feature_set: &str, current: &FeatureGateDetails) -> String {
    let join = |gates: &[crate::crd::FeatureGateAttributes]| {
        gates
            .iter()
            .map(|gate| gate.name.as_str())
            .collect::<Vec<_>>()
            .join(",")
    };

    format!(
        "FeatureSet={:?}, Version={:?}, Enabled={:?}, Disabled={:?}",
        feature_set,
        current.version,
        join(&current.enabled),
        join(&current.disabled)
    )
}

async fn publish_update_event(
    ctx: &Context,
    feature_gate: &FeatureGate,
    current: &FeatureGateDetails,
) {
    ctx.events
        .publish(
            &feature_gate.object_ref(&()),
            EventType::Normal,
            reasons::FEATURE_GATE_UPDATE,
            actions::RECONCILE,
            Some(update_event_note(&feature_gate.spec.feature_set, current)),
        )
        .await;
}

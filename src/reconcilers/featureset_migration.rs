// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Retirement of the `LatencySensitive` feature set.
//!
//! `LatencySensitive` no longer exists in the catalog. A cluster still selecting it
//! would fail resolution forever, so this pass moves it back to `Default` with a
//! forced server-side apply of `spec.featureSet`.

use crate::constants::{
    FEATURE_SET_DEFAULT, FEATURE_SET_LATENCY_SENSITIVE, LATENCY_SENSITIVE_REMOVAL_CONTROLLER,
};
use crate::context::Context;
use crate::events::{actions, reasons};
use crate::metrics::ReconcileOutcome;
use anyhow::Result;
use kube::runtime::events::EventType;
use kube::Resource;
use tracing::{debug, info};

/// What a feature set migration pass did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureSetMigration {
    /// The `FeatureGate` does not exist yet
    FeatureGateMissing,
    /// The selected feature set needs no migration
    NotNeeded,
    /// `LatencySensitive` was replaced with `Default`
    Migrated,
}

impl FeatureSetMigration {
    /// Metrics outcome for this pass.
    #[must_use]
    pub fn outcome(self) -> ReconcileOutcome {
        match self {
            Self::FeatureGateMissing => ReconcileOutcome::Skipped,
            Self::NotNeeded => ReconcileOutcome::Unchanged,
            Self::Migrated => ReconcileOutcome::Updated,
        }
    }
}

/// Run one feature set migration pass.
///
/// # Errors
///
/// Returns an error if the `FeatureGate` cannot be read or the apply fails.
pub async fn reconcile_feature_set_migration(ctx: &Context) -> Result<FeatureSetMigration> {
    let Some(feature_gate) = ctx.source.feature_gate().await? else {
        return Ok(FeatureSetMigration::FeatureGateMissing);
    };

    if feature_gate.spec.feature_set != FEATURE_SET_LATENCY_SENSITIVE {
        debug!(feature_set = %feature_gate.spec.feature_set, "No feature set migration needed");
        return Ok(FeatureSetMigration::NotNeeded);
    }

    ctx.source
        .apply_feature_set(FEATURE_SET_DEFAULT, LATENCY_SENSITIVE_REMOVAL_CONTROLLER)
        .await?;

    info!(
        from = FEATURE_SET_LATENCY_SENSITIVE,
        to = FEATURE_SET_DEFAULT,
        "Migrated retired feature set"
    );
    ctx.events
        .publish(
            &feature_gate.object_ref(&()),
            EventType::Normal,
            reasons::FEATURE_SET_MIGRATED,
            actions::RECONCILE,
            Some(format!(
                "FeatureSet {FEATURE_SET_LATENCY_SENSITIVE:?} replaced with {FEATURE_SET_DEFAULT:?}"
            )),
        )
        .await;

    Ok(FeatureSetMigration::Migrated)
}

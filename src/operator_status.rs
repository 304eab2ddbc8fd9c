// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory operator status: achieved versions and per-controller degraded state.
//!
//! Controllers record what they achieved through [`OperatorStatus::set_version`] and
//! report failures through [`OperatorStatus::set_degraded`]. Neither call touches the
//! API server. [`publish_operator_status`] periodically folds the accumulated state
//! into the `ClusterOperator` status, so controllers never block on status writes.

use crate::cluster_config::ClusterConfigSource;
use crate::constants::{FEATURE_VERSION_NAME, KIND_CLUSTER_OPERATOR, OPERATOR_VERSION_NAME};
use crate::crd::{ClusterOperatorStatus, Condition, OperandVersion};
use crate::metrics;
use crate::reconcilers::status::{conditions_equal, update_condition_in_memory};
use crate::status_reasons::{
    degraded_condition_type, degraded_controller, CONDITION_TYPE_AVAILABLE,
    CONDITION_TYPE_DEGRADED, CONDITION_TYPE_PROGRESSING, CONDITION_TYPE_UPGRADEABLE,
    REASON_AS_EXPECTED, REASON_SYNC_ERROR, STATUS_FALSE, STATUS_TRUE,
};
use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Inner {
    versions: BTreeMap<String, String>,
    degraded: BTreeMap<String, Option<String>>,
    conditions: Vec<Condition>,
}

/// Shared, cloneable handle to the operator's in-memory status.
#[derive(Clone, Debug, Default)]
pub struct OperatorStatus {
    inner: Arc<RwLock<Inner>>,
}

impl OperatorStatus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the persisted `ClusterOperator` status at startup.
    ///
    /// Existing versions and conditions are carried over. `feature-gates` is seeded
    /// with the empty string when absent, so a release that introduces the key does
    /// not claim the new level before the feature gate controller has written it.
    /// `operator` is always set to `operator_version`.
    pub fn seed_from(&self, persisted: Option<&ClusterOperatorStatus>, operator_version: &str) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(persisted) = persisted {
            for version in &persisted.versions {
                inner
                    .versions
                    .insert(version.name.clone(), version.version.clone());
            }
            inner.conditions.clone_from(&persisted.conditions);
        }

        inner
            .versions
            .entry(FEATURE_VERSION_NAME.to_string())
            .or_default();
        inner
            .versions
            .insert(OPERATOR_VERSION_NAME.to_string(), operator_version.to_string());

        debug!(versions = ?inner.versions, "Seeded operator status");
    }

    /// Record that `name` has reached `version`. Idempotent.
    pub fn set_version(&self, name: &str, version: &str) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let previous = inner.versions.insert(name.to_string(), version.to_string());
        if previous.as_deref() != Some(version) {
            info!(name, version, "Version achieved");
        }
    }

    /// The recorded version for `name`, if any.
    #[must_use]
    pub fn version(&self, name: &str) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .versions
            .get(name)
            .cloned()
    }

    /// All recorded versions, sorted by name.
    #[must_use]
    pub fn versions(&self) -> Vec<OperandVersion> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .versions
            .iter()
            .map(|(name, version)| OperandVersion {
                name: name.clone(),
                version: version.clone(),
            })
            .collect()
    }

    /// Record the outcome of a controller's last pass: `Some(message)` on failure,
    /// `None` on success.
    pub fn set_degraded(&self, controller: &str, error: Option<&str>) {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        inner
            .degraded
            .insert(controller.to_string(), error.map(str::to_string));
    }

    /// Whether `controller` is currently reported degraded.
    #[must_use]
    pub fn is_degraded(&self, controller: &str) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .degraded
            .get(controller)
            .is_some_and(Option::is_some)
    }

    /// Build the desired `ClusterOperator` status from the recorded state.
    ///
    /// Conditions are updated in place on top of the last built (or seeded) list so
    /// transition times survive between builds.
    #[must_use]
    pub fn build_cluster_operator_status(&self) -> ClusterOperatorStatus {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let mut conditions = std::mem::take(&mut inner.conditions);

        for (controller, error) in &inner.degraded {
            let condition_type = degraded_condition_type(controller);
            match error {
                Some(message) => update_condition_in_memory(
                    &mut conditions,
                    &condition_type,
                    STATUS_TRUE,
                    REASON_SYNC_ERROR,
                    message,
                ),
                None => update_condition_in_memory(
                    &mut conditions,
                    &condition_type,
                    STATUS_FALSE,
                    REASON_AS_EXPECTED,
                    "",
                ),
            }
        }
        conditions.sort_by(|a, b| a.r#type.cmp(&b.r#type));

        let failing: Vec<(String, String)> = conditions
            .iter()
            .filter(|c| c.status == STATUS_TRUE)
            .filter_map(|c| {
                degraded_controller(&c.r#type).map(|controller| {
                    (
                        controller.to_string(),
                        format!("{}: {}", c.r#type, c.message.clone().unwrap_or_default()),
                    )
                })
            })
            .collect();

        if failing.is_empty() {
            update_condition_in_memory(
                &mut conditions,
                CONDITION_TYPE_DEGRADED,
                STATUS_FALSE,
                REASON_AS_EXPECTED,
                "",
            );
        } else {
            let reason = failing
                .iter()
                .map(|(controller, _)| format!("{controller}_{REASON_SYNC_ERROR}"))
                .collect::<Vec<_>>()
                .join("::");
            let message = failing
                .iter()
                .map(|(_, message)| message.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            update_condition_in_memory(
                &mut conditions,
                CONDITION_TYPE_DEGRADED,
                STATUS_TRUE,
                &reason,
                &message,
            );
        }

        update_condition_in_memory(
            &mut conditions,
            CONDITION_TYPE_AVAILABLE,
            STATUS_TRUE,
            REASON_AS_EXPECTED,
            "",
        );
        update_condition_in_memory(
            &mut conditions,
            CONDITION_TYPE_PROGRESSING,
            STATUS_FALSE,
            REASON_AS_EXPECTED,
            "",
        );
        update_condition_in_memory(
            &mut conditions,
            CONDITION_TYPE_UPGRADEABLE,
            STATUS_TRUE,
            REASON_AS_EXPECTED,
            "",
        );

        conditions.sort_by(|a, b| a.r#type.cmp(&b.r#type));
        inner.conditions.clone_from(&conditions);

        let versions = inner
            .versions
            .iter()
            .map(|(name, version)| OperandVersion {
                name: name.clone(),
                version: version.clone(),
            })
            .collect();

        ClusterOperatorStatus {
            conditions,
            versions,
        }
    }
}

/// Write the recorded operator status to the `ClusterOperator` when it changed.
///
/// Returns `true` when a write was made. A missing `ClusterOperator` is left alone;
/// it is created by the cluster version operator, not by this process.
///
/// # Errors
///
/// Returns an error if the `ClusterOperator` cannot be read or written.
pub async fn publish_operator_status(
    source: &dyn ClusterConfigSource,
    status: &OperatorStatus,
) -> Result<bool> {
    let Some(cluster_operator) = source.cluster_operator().await? else {
        debug!("ClusterOperator not found, skipping status publication");
        return Ok(false);
    };

    let desired = status.build_cluster_operator_status();
    let current = cluster_operator.status.unwrap_or_default();

    if current.versions == desired.versions
        && conditions_equal(&current.conditions, &desired.conditions)
    {
        return Ok(false);
    }

    source.update_cluster_operator_status(&desired).await?;
    metrics::record_status_write(KIND_CLUSTER_OPERATOR);
    debug!(
        versions = desired.versions.len(),
        conditions = desired.conditions.len(),
        "Published ClusterOperator status"
    );
    Ok(true)
}

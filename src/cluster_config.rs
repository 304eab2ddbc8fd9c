// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Access to the cluster-scoped configuration objects.
//!
//! Reconcilers read and write cluster state only through [`ClusterConfigSource`].
//! [`KubeClusterConfig`] implements it against the API server; tests substitute an
//! in-memory implementation that records every write.
//!
//! Reads return `Ok(None)` when the object does not exist, so callers can treat a
//! missing object as "not available yet" rather than as an error.

use crate::constants::{
    CLUSTER_OBJECT_NAME, CLUSTER_OPERATOR_NAME, CLUSTER_VERSION_OBJECT_NAME, API_GROUP_VERSION,
    KIND_FEATURE_GATE,
};
use crate::crd::{
    ClusterOperator, ClusterOperatorStatus, ClusterVersion, FeatureGate, FeatureGateStatus,
    Infrastructure, NodeConfig,
};
use anyhow::{Context as _, Result};
use async_trait::async_trait;
use kube::api::{Patch, PatchParams};
use kube::{Api, Client, ResourceExt};
use serde_json::json;
use tracing::debug;

/// Reads and writes the cluster configuration objects this operator works with.
#[async_trait]
pub trait ClusterConfigSource: Send + Sync {
    /// The `FeatureGate` named `cluster`.
    async fn feature_gate(&self) -> Result<Option<FeatureGate>>;

    /// The `ClusterVersion` named `version`.
    async fn cluster_version(&self) -> Result<Option<ClusterVersion>>;

    /// The `Node` config named `cluster`.
    async fn node_config(&self) -> Result<Option<NodeConfig>>;

    /// The `Infrastructure` named `cluster`.
    async fn infrastructure(&self) -> Result<Option<Infrastructure>>;

    /// The `ClusterOperator` this operator reports through.
    async fn cluster_operator(&self) -> Result<Option<ClusterOperator>>;

    /// Replace the status of `feature_gate` in a single write.
    ///
    /// The write is conditional on `feature_gate`'s resource version, so a status
    /// computed from a stale read is rejected instead of overwriting newer state.
    async fn update_feature_gate_status(
        &self,
        feature_gate: &FeatureGate,
        status: &FeatureGateStatus,
    ) -> Result<()>;

    /// Set `spec.featureSet` of the `cluster` `FeatureGate` with server-side apply.
    async fn apply_feature_set(&self, feature_set: &str, field_manager: &str) -> Result<()>;

    /// Replace the status of this operator's `ClusterOperator`.
    async fn update_cluster_operator_status(&self, status: &ClusterOperatorStatus) -> Result<()>;
}

/// [`ClusterConfigSource`] backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeClusterConfig {
    client: Client,
}

impl KubeClusterConfig {
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClusterConfigSource for KubeClusterConfig {
    async fn feature_gate(&self) -> Result<Option<FeatureGate>> {
        Api::<FeatureGate>::all(self.client.clone())
            .get_opt(CLUSTER_OBJECT_NAME)
            .await
            .context("unable to get FeatureGate")
    }

    async fn cluster_version(&self) -> Result<Option<ClusterVersion>> {
        Api::<ClusterVersion>::all(self.client.clone())
            .get_opt(CLUSTER_VERSION_OBJECT_NAME)
            .await
            .context("unable to get ClusterVersion")
    }

    async fn node_config(&self) -> Result<Option<NodeConfig>> {
        Api::<NodeConfig>::all(self.client.clone())
            .get_opt(CLUSTER_OBJECT_NAME)
            .await
            .context("unable to get NodesConfig")
    }

    async fn infrastructure(&self) -> Result<Option<Infrastructure>> {
        Api::<Infrastructure>::all(self.client.clone())
            .get_opt(CLUSTER_OBJECT_NAME)
            .await
            .context("unable to get Infrastructure")
    }

    async fn cluster_operator(&self) -> Result<Option<ClusterOperator>> {
        Api::<ClusterOperator>::all(self.client.clone())
            .get_opt(CLUSTER_OPERATOR_NAME)
            .await
            .context("unable to get ClusterOperator")
    }

    async fn update_feature_gate_status(
        &self,
        feature_gate: &FeatureGate,
        status: &FeatureGateStatus,
    ) -> Result<()> {
        let api = Api::<FeatureGate>::all(self.client.clone());
        let name = feature_gate.name_any();

        let patch = json!({
            "metadata": {
                "resourceVersion": feature_gate.resource_version(),
            },
            "status": status,
        });

        api.patch_status(&name, &PatchParams::default(), &Patch::Merge(&patch))
            .await
            .context("unable to update FeatureGate status")?;

        debug!(name = %name, snapshots = status.feature_gates.len(), "Updated FeatureGate status");
        Ok(())
    }

    async fn apply_feature_set(&self, feature_set: &str, field_manager: &str) -> Result<()> {
        let api = Api::<FeatureGate>::all(self.client.clone());

        let patch = json!({
            "apiVersion": API_GROUP_VERSION,
            "kind": KIND_FEATURE_GATE,
            "metadata": {
                "name": CLUSTER_OBJECT_NAME,
            },
            "spec": {
                "featureSet": feature_set,
            },
        });

        api.patch(
            CLUSTER_OBJECT_NAME,
            &PatchParams::apply(field_manager).force(),
            &Patch::Apply(&patch),
        )
        .await
        .context("unable to apply FeatureGate featureSet")?;

        debug!(feature_set, field_manager, "Applied FeatureGate featureSet");
        Ok(())
    }

    async fn update_cluster_operator_status(&self, status: &ClusterOperatorStatus) -> Result<()> {
        let api = Api::<ClusterOperator>::all(self.client.clone());

        let patch = json!({ "status": status });

        api.patch_status(
            CLUSTER_OPERATOR_NAME,
            &PatchParams::default(),
            &Patch::Merge(&patch),
        )
        .await
        .context("unable to update ClusterOperator status")?;

        Ok(())
    }
}

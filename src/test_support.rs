// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! In-memory doubles for reconciler unit tests.
//!
//! [`FakeClusterConfig`] serves cluster objects from memory and records every write
//! as an [`Action`], so tests can assert exactly which API calls a pass made.

use crate::cluster_config::ClusterConfigSource;
use crate::context::Context;
use crate::crd::{
    ClusterOperator, ClusterOperatorSpec, ClusterOperatorStatus, ClusterVersion,
    ClusterVersionSpec, ClusterVersionStatus, CustomFeatureGates, FeatureGate, FeatureGateSpec,
    FeatureGateStatus, Infrastructure, NodeConfig, NodeConfigSpec, UpdateHistory,
};
use crate::events::EventPublisher;
use crate::featuregates::FeatureSetCatalog;
use crate::operator_status::OperatorStatus;
use anyhow::{bail, Result};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::ObjectReference;
use kube::runtime::events::EventType;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// A write made through [`FakeClusterConfig`].
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    UpdateFeatureGateStatus(FeatureGateStatus),
    ApplyFeatureSet {
        feature_set: String,
        field_manager: String,
    },
    UpdateClusterOperatorStatus(ClusterOperatorStatus),
}

/// In-memory [`ClusterConfigSource`].
#[derive(Default)]
pub struct FakeClusterConfig {
    pub feature_gate: Mutex<Option<FeatureGate>>,
    pub cluster_version: Mutex<Option<ClusterVersion>>,
    pub node_config: Mutex<Option<NodeConfig>>,
    pub infrastructure: Mutex<Option<Infrastructure>>,
    pub cluster_operator: Mutex<Option<ClusterOperator>>,
    /// When set, every write fails with this message
    pub fail_writes: Mutex<Option<String>>,
    /// Reads of these kinds (e.g. `Node`) fail with the mapped message
    pub fail_reads: Mutex<BTreeMap<&'static str, String>>,
    actions: Mutex<Vec<Action>>,
}

impl FakeClusterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feature_gate(self, feature_gate: FeatureGate) -> Self {
        *self.feature_gate.lock().unwrap() = Some(feature_gate);
        self
    }

    pub fn with_cluster_version(self, cluster_version: ClusterVersion) -> Self {
        *self.cluster_version.lock().unwrap() = Some(cluster_version);
        self
    }

    pub fn with_node_config(self, node_config: NodeConfig) -> Self {
        *self.node_config.lock().unwrap() = Some(node_config);
        self
    }

    pub fn with_cluster_operator(self, cluster_operator: ClusterOperator) -> Self {
        *self.cluster_operator.lock().unwrap() = Some(cluster_operator);
        self
    }

    pub fn actions(&self) -> Vec<Action> {
        self.actions.lock().unwrap().clone()
    }

    pub fn fail_reads_of(self, kind: &'static str, message: &str) -> Self {
        self.fail_reads
            .lock()
            .unwrap()
            .insert(kind, message.to_string());
        self
    }

    fn check_read(&self, kind: &str) -> Result<()> {
        if let Some(message) = self.fail_reads.lock().unwrap().get(kind) {
            bail!("{message}");
        }
        Ok(())
    }

    fn check_write(&self) -> Result<()> {
        if let Some(message) = self.fail_writes.lock().unwrap().clone() {
            bail!("{message}");
        }
        Ok(())
    }
}

#[async_trait]
impl ClusterConfigSource for FakeClusterConfig {
    async fn feature_gate(&self) -> Result<Option<FeatureGate>> {
        self.check_read("FeatureGate")?;
        Ok(self.feature_gate.lock().unwrap().clone())
    }

    async fn cluster_version(&self) -> Result<Option<ClusterVersion>> {
        self.check_read("ClusterVersion")?;
        Ok(self.cluster_version.lock().unwrap().clone())
    }

    async fn node_config(&self) -> Result<Option<NodeConfig>> {
        self.check_read("Node")?;
        Ok(self.node_config.lock().unwrap().clone())
    }

    async fn infrastructure(&self) -> Result<Option<Infrastructure>> {
        self.check_read("Infrastructure")?;
        Ok(self.infrastructure.lock().unwrap().clone())
    }

    async fn cluster_operator(&self) -> Result<Option<ClusterOperator>> {
        self.check_read("ClusterOperator")?;
        Ok(self.cluster_operator.lock().unwrap().clone())
    }

    async fn update_feature_gate_status(
        &self,
        _feature_gate: &FeatureGate,
        status: &FeatureGateStatus,
    ) -> Result<()> {
        self.check_write()?;
        self.actions
            .lock()
            .unwrap()
            .push(Action::UpdateFeatureGateStatus(status.clone()));
        if let Some(stored) = self.feature_gate.lock().unwrap().as_mut() {
            stored.status = Some(status.clone());
        }
        Ok(())
    }

    async fn apply_feature_set(&self, feature_set: &str, field_manager: &str) -> Result<()> {
        self.check_write()?;
        self.actions.lock().unwrap().push(Action::ApplyFeatureSet {
            feature_set: feature_set.to_string(),
            field_manager: field_manager.to_string(),
        });
        if let Some(stored) = self.feature_gate.lock().unwrap().as_mut() {
            stored.spec.feature_set = feature_set.to_string();
        }
        Ok(())
    }

    async fn update_cluster_operator_status(&self, status: &ClusterOperatorStatus) -> Result<()> {
        self.check_write()?;
        self.actions
            .lock()
            .unwrap()
            .push(Action::UpdateClusterOperatorStatus(status.clone()));
        if let Some(stored) = self.cluster_operator.lock().unwrap().as_mut() {
            stored.status = Some(status.clone());
        }
        Ok(())
    }
}

/// A published event: `(reason, note)`.
pub type RecordedEvent = (String, Option<String>);

/// [`EventPublisher`] that keeps every event in memory.
#[derive(Default)]
pub struct RecordingEventPublisher {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingEventPublisher {
    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn publish(
        &self,
        _resource_ref: &ObjectReference,
        _type_: EventType,
        reason: &str,
        _action: &str,
        note: Option<String>,
    ) {
        self.events
            .lock()
            .unwrap()
            .push((reason.to_string(), note));
    }
}

/// A `FeatureGate` named `cluster` selecting `feature_set`.
pub fn feature_gate(feature_set: &str, custom: Option<CustomFeatureGates>) -> FeatureGate {
    let mut feature_gate = FeatureGate::new(
        "cluster",
        FeatureGateSpec {
            feature_set: feature_set.to_string(),
            custom_no_upgrade: custom,
        },
    );
    feature_gate.metadata.resource_version = Some("1".to_string());
    feature_gate
}

/// A `ClusterVersion` named `version` with the given upgrade history, newest first.
pub fn cluster_version(history: &[&str]) -> ClusterVersion {
    let mut cluster_version = ClusterVersion::new("version", ClusterVersionSpec::default());
    cluster_version.status = Some(ClusterVersionStatus {
        history: history
            .iter()
            .map(|version| UpdateHistory {
                version: (*version).to_string(),
                state: Some("Completed".to_string()),
                image: None,
            })
            .collect(),
    });
    cluster_version
}

/// A `Node` config named `cluster` with the given minimum kubelet version.
pub fn node_config(minimum_kubelet_version: &str) -> NodeConfig {
    NodeConfig::new(
        "cluster",
        NodeConfigSpec {
            minimum_kubelet_version: minimum_kubelet_version.to_string(),
        },
    )
}

/// A `ClusterOperator` named `config-operator` with an optional status.
pub fn cluster_operator(status: Option<ClusterOperatorStatus>) -> ClusterOperator {
    let mut cluster_operator = ClusterOperator::new("config-operator", ClusterOperatorSpec {});
    cluster_operator.status = status;
    cluster_operator
}

/// Context over `source` and `catalog` with a recording event publisher.
pub fn context(
    source: Arc<FakeClusterConfig>,
    catalog: FeatureSetCatalog,
    process_version: &str,
) -> (Context, Arc<RecordingEventPublisher>) {
    let events = Arc::new(RecordingEventPublisher::default());
    let ctx = Context::new(
        source,
        Arc::new(catalog),
        process_version,
        OperatorStatus::new(),
        events.clone(),
    );
    (ctx, events)
}

// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Custom Resource Definitions (CRDs) for cluster configuration.
//!
//! This module defines the typed views of the cluster-wide configuration objects the
//! operator reads and writes. All of them live in the `config.openshift.io/v1` API group
//! and are cluster-scoped singletons.
//!
//! # Resource Types
//!
//! ## Written by the operator
//!
//! - [`FeatureGate`] - Feature set selection (spec) and resolved per-release gates (status)
//! - [`ClusterOperator`] - Versions and conditions reported for this operator
//!
//! ## Read by the operator
//!
//! - [`ClusterVersion`] - Upgrade history, used to prune stale feature gate snapshots
//! - [`NodeConfig`] - Cluster node configuration, source of the minimum kubelet version
//! - [`Infrastructure`] - Control plane topology, used to pick the cluster profile
//!
//! # Example: Selecting a Feature Set
//!
//! ```rust,no_run
//! use clustercfg::crd::{CustomFeatureGates, FeatureGate, FeatureGateSpec};
//!
//! let spec = FeatureGateSpec {
//!     feature_set: "CustomNoUpgrade".to_string(),
//!     custom_no_upgrade: Some(CustomFeatureGates {
//!         enabled: vec!["NodeSwap".to_string()],
//!         disabled: vec!["EventedPLEG".to_string()],
//!     }),
//! };
//! let feature_gate = FeatureGate::new("cluster", spec);
//! ```

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Condition represents an observation of a resource's current state.
///
/// Conditions are used in status subresources to communicate the state of
/// a resource to users and controllers.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Type of condition. Common types include: Available, Progressing, Degraded, Upgradeable.
    pub r#type: String,

    /// Status of the condition: True, False, or Unknown.
    pub status: String,

    /// Brief CamelCase reason for the condition's last transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Human-readable message indicating details about the transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Last time the condition transitioned from one status to another (RFC3339 format).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
}

// ============================================================================
// FeatureGate
// ============================================================================

/// Lowest version of a named component required before a feature gate may be enabled.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MinimumComponentVersion {
    /// Component identifier (e.g., "Kubelet").
    pub component: String,

    /// Semantic version the component must be at or above (e.g., "1.30.0").
    pub version: String,
}

/// A single resolved feature gate with the component versions it depends on.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGateAttributes {
    /// Case-sensitive feature gate name.
    pub name: String,

    /// Minimum component versions that must all be satisfied for the gate to be enabled.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_minimum_component_versions: Vec<MinimumComponentVersion>,
}

impl FeatureGateAttributes {
    /// Create attributes for a gate with no minimum version requirements.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required_minimum_component_versions: Vec::new(),
        }
    }

    /// Add a minimum component version requirement.
    #[must_use]
    pub fn with_minimum_version(
        mut self,
        component: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.required_minimum_component_versions
            .push(MinimumComponentVersion {
                component: component.into(),
                version: version.into(),
            });
        self
    }
}

/// The resolved enabled/disabled partition of every known gate for one release version.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGateDetails {
    /// Release version this snapshot was resolved for.
    pub version: String,

    /// Enabled gates, sorted by name.
    #[serde(default)]
    pub enabled: Vec<FeatureGateAttributes>,

    /// Disabled gates, sorted by name.
    #[serde(default)]
    pub disabled: Vec<FeatureGateAttributes>,
}

/// User-specified gate selection layered on top of the `Default` feature set.
///
/// Only honoured when `featureSet` is `CustomNoUpgrade`. A gate must not appear in
/// both lists.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CustomFeatureGates {
    /// Gates forced on.
    #[serde(default)]
    pub enabled: Vec<String>,

    /// Gates forced off.
    #[serde(default)]
    pub disabled: Vec<String>,
}

/// `FeatureGate` status
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGateStatus {
    /// One resolved snapshot per retained release version, current release first.
    #[serde(default)]
    pub feature_gates: Vec<FeatureGateDetails>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

/// `FeatureGate` selects which optional capabilities are switched on cluster-wide.
///
/// `spec.featureSet` names a feature set; the status holds the complete, resolved list of
/// enabled and disabled gates for the current release and for every earlier release
/// the cluster still remembers.
///
/// # Example
///
/// ```yaml
/// apiVersion: config.openshift.io/v1
/// kind: FeatureGate
/// metadata:
///   name: cluster
/// spec:
///   featureSet: TechPreviewNoUpgrade
/// status:
///   featureGates:
///     - version: 4.16.0
///       enabled:
///         - name: NodeSwap
///       disabled:
///         - name: EventedPLEG
/// ```
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[kube(
    group = "config.openshift.io",
    version = "v1",
    kind = "FeatureGate",
    doc = "FeatureGate selects the cluster feature set and records the resolved feature gates for each release version."
)]
#[kube(status = "FeatureGateStatus")]
#[serde(rename_all = "camelCase")]
pub struct FeatureGateSpec {
    /// Feature set name. Empty means `Default`.
    #[serde(default)]
    pub feature_set: String,

    /// Custom gate selection, only used with the `CustomNoUpgrade` feature set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_no_upgrade: Option<CustomFeatureGates>,
}

// ============================================================================
// ClusterVersion
// ============================================================================

/// A release the cluster has been at, as recorded by the upgrade history.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHistory {
    /// Release version.
    pub version: String,

    /// Whether the update to this version completed or is partial.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Release image pull spec.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// `ClusterVersion` status
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterVersionStatus {
    /// Upgrade history, most recent first.
    #[serde(default)]
    pub history: Vec<UpdateHistory>,
}

/// `ClusterVersion` describes the release the cluster runs and its upgrade history.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[kube(
    group = "config.openshift.io",
    version = "v1",
    kind = "ClusterVersion",
    doc = "ClusterVersion records the cluster's release and upgrade history."
)]
#[kube(status = "ClusterVersionStatus")]
#[serde(rename_all = "camelCase")]
pub struct ClusterVersionSpec {
    /// Unique cluster identifier.
    #[serde(default, rename = "clusterID", skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
}

// ============================================================================
// Node configuration
// ============================================================================

/// Cluster-wide node configuration.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[kube(
    group = "config.openshift.io",
    version = "v1",
    kind = "Node",
    root = "NodeConfig",
    doc = "Node holds cluster-wide node configuration, including the minimum kubelet version."
)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfigSpec {
    /// Lowest kubelet version allowed to join the cluster. Empty when unset.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub minimum_kubelet_version: String,
}

// ============================================================================
// Infrastructure
// ============================================================================

/// `Infrastructure` status
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureStatus {
    /// Where the control plane runs: `HighlyAvailable`, `SingleReplica` or `External`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_plane_topology: Option<String>,
}

/// `Infrastructure` describes the cluster's underlying platform.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[kube(
    group = "config.openshift.io",
    version = "v1",
    kind = "Infrastructure",
    doc = "Infrastructure describes the platform and control plane topology of the cluster."
)]
#[kube(status = "InfrastructureStatus")]
pub struct InfrastructureSpec {}

// ============================================================================
// ClusterOperator
// ============================================================================

/// A named version reported by an operator.
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq, Eq)]
pub struct OperandVersion {
    /// Operand name (e.g., "operator", "feature-gates").
    pub name: String,

    /// Version the operand has achieved.
    pub version: String,
}

/// `ClusterOperator` status
#[derive(Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
pub struct ClusterOperatorStatus {
    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Versions this operator has achieved, sorted by name.
    #[serde(default)]
    pub versions: Vec<OperandVersion>,
}

/// `ClusterOperator` is how an operator reports its health and level to the cluster.
#[derive(CustomResource, Clone, Debug, Serialize, Deserialize, Default, JsonSchema, PartialEq)]
#[kube(
    group = "config.openshift.io",
    version = "v1",
    kind = "ClusterOperator",
    doc = "ClusterOperator reports the versions and health conditions of an operator."
)]
#[kube(status = "ClusterOperatorStatus")]
pub struct ClusterOperatorSpec {}

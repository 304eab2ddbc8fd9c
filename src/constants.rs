// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the cluster configuration operator.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// API Constants
// ============================================================================

/// Fully qualified API version (group/version)
pub const API_GROUP_VERSION: &str = "config.openshift.io/v1";

/// Kind name for `FeatureGate` resource
pub const KIND_FEATURE_GATE: &str = "FeatureGate";

/// Kind name for `ClusterOperator` resource
pub const KIND_CLUSTER_OPERATOR: &str = "ClusterOperator";

// ============================================================================
// Well-Known Object Names
// ============================================================================

/// Name of the singleton `FeatureGate`, `Node` and `Infrastructure` objects
pub const CLUSTER_OBJECT_NAME: &str = "cluster";

/// Name of the singleton `ClusterVersion` object
pub const CLUSTER_VERSION_OBJECT_NAME: &str = "version";

/// Name of the `ClusterOperator` this operator reports through
pub const CLUSTER_OPERATOR_NAME: &str = "config-operator";

// ============================================================================
// Feature Set Names
// ============================================================================

/// The default feature set. An empty `spec.featureSet` means the same thing.
pub const FEATURE_SET_DEFAULT: &str = "Default";

/// Feature set driven by the user's `customNoUpgrade` selection
pub const FEATURE_SET_CUSTOM: &str = "CustomNoUpgrade";

/// Retired feature set, migrated back to `Default`
pub const FEATURE_SET_LATENCY_SENSITIVE: &str = "LatencySensitive";

// ============================================================================
// Minimum Component Names
// ============================================================================

/// Component identifier for the kubelet minimum version observation
pub const MINIMUM_COMPONENT_KUBELET: &str = "Kubelet";

// ============================================================================
// Version Reporting Constants
// ============================================================================

/// Version-sink key recording the release whose feature gates have been written
pub const FEATURE_VERSION_NAME: &str = "feature-gates";

/// Version-sink key recording the running operator version
pub const OPERATOR_VERSION_NAME: &str = "operator";

// ============================================================================
// Controller Names
// ============================================================================

/// Name of the feature gate resolution controller
pub const FEATURE_GATE_CONTROLLER: &str = "FeatureGateController";

/// Name of the controller that retires the `LatencySensitive` feature set
pub const LATENCY_SENSITIVE_REMOVAL_CONTROLLER: &str = "LatencySensitiveRemovalController";

/// Reporting component used on published Kubernetes events
pub const EVENT_REPORTER: &str = "config-operator";

// ============================================================================
// Cluster Profile Constants
// ============================================================================

/// Annotation prefix marking a manifest as cluster-profile aware
pub const CLUSTER_PROFILE_ANNOTATION_PREFIX: &str = "include.release.openshift.io/";

/// Cluster profile for self-managed, highly available control planes
pub const CLUSTER_PROFILE_SELF_MANAGED: &str = "self-managed-high-availability";

/// Cluster profile for externally hosted control planes
pub const CLUSTER_PROFILE_EXTERNAL: &str = "ibm-cloud-managed";

/// Annotation value that includes a manifest for this operator only
pub const CLUSTER_PROFILE_CONFIG_OPERATOR_ONLY: &str = "false-except-for-the-config-operator";

/// Control plane topology value selecting the external cluster profile
pub const TOPOLOGY_EXTERNAL: &str = "External";

// ============================================================================
// Kubernetes Controller Constants
// ============================================================================

/// Periodic resync interval for the feature gate controller (1 minute)
pub const FEATURE_GATE_RESYNC_SECS: u64 = 60;

/// Periodic resync interval for the feature set migration controller (1 minute)
pub const FEATURE_SET_MIGRATION_RESYNC_SECS: u64 = 60;

/// Interval between `ClusterOperator` status publications (10 seconds)
pub const OPERATOR_STATUS_PUBLISH_INTERVAL_SECS: u64 = 10;

/// Requeue duration for controller errors (30 seconds)
pub const ERROR_REQUEUE_DURATION_SECS: u64 = 30;

/// Default timeout applied to every API request (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Leader Election Constants
// ============================================================================

/// Default leader election lease duration (15 seconds)
pub const DEFAULT_LEASE_DURATION_SECS: u64 = 15;

/// Default leader election grace period (5 seconds)
pub const DEFAULT_LEASE_GRACE_SECS: u64 = 5;

/// Default lease name
pub const DEFAULT_LEASE_NAME: &str = "config-operator-lock";

/// Default lease namespace
pub const DEFAULT_LEASE_NAMESPACE: &str = "openshift-config-operator";

// ============================================================================
// Runtime Constants
// ============================================================================

/// Number of worker threads for Tokio runtime
pub const TOKIO_WORKER_THREADS: usize = 4;

/// Default bind address for the metrics and health server
pub const DEFAULT_METRICS_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Payload version used by the render command when none is given
pub const DEFAULT_RENDER_PAYLOAD_VERSION: &str = "0.0.1-snapshot";

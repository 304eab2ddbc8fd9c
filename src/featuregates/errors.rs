// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for feature gate catalog construction and resolution.
//!
//! Two families of errors exist:
//!
//! - [`CatalogError`] - authoring defects in the feature set catalog. These can never
//!   heal at runtime; they are detected once at startup and stop the process.
//! - [`ResolveError`] - configuration conflicts in the cluster's `FeatureGate` or the
//!   observed component versions. These fail a single reconciliation pass, are reported
//!   through the degraded condition, and are retried on the next trigger.

use thiserror::Error;

/// Errors raised while building a [`FeatureSetCatalog`](super::FeatureSetCatalog).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The same feature set name was registered twice.
    #[error("feature set {feature_set:?} is defined more than once")]
    DuplicateFeatureSet {
        /// The repeated feature set name
        feature_set: String,
    },

    /// A gate appears twice within the same list of one feature set.
    #[error("feature gate {feature:?} is {list} twice in feature set {feature_set:?}")]
    DuplicateFeature {
        /// Feature set containing the duplicate
        feature_set: String,
        /// The repeated gate name
        feature: String,
        /// Which list holds the duplicate ("enabled" or "disabled")
        list: &'static str,
    },

    /// A gate is both enabled and disabled by the same feature set.
    #[error("feature gate {feature:?} is both enabled and disabled in feature set {feature_set:?}")]
    ConflictingFeature {
        /// Feature set containing the conflict
        feature_set: String,
        /// The conflicting gate name
        feature: String,
    },

    /// A minimum component version requirement has no component identifier.
    #[error("feature gate {feature:?} in feature set {feature_set:?} declares a minimum version without a component")]
    MissingComponent {
        /// Feature set containing the requirement
        feature_set: String,
        /// Gate declaring the requirement
        feature: String,
    },

    /// A required minimum component version is not a semantic version.
    #[error("feature gate {feature:?} in feature set {feature_set:?} requires {component} version {version:?}, which does not parse: {reason}")]
    InvalidRequiredVersion {
        /// Feature set containing the requirement
        feature_set: String,
        /// Gate declaring the requirement
        feature: String,
        /// Component the requirement applies to
        component: String,
        /// The unparsable version string
        version: String,
        /// Parser error message
        reason: String,
    },

    /// No usable feature gate manifests were found.
    #[error("feature gates not located in {dir}")]
    NoManifests {
        /// Directory that was searched
        dir: String,
    },

    /// A file in the manifest directory is not a `FeatureGate`.
    #[error("{path} is not a FeatureGate manifest: {reason}")]
    InvalidManifest {
        /// Offending file
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// The manifest directory could not be read.
    #[error("unable to read {path}: {reason}")]
    Io {
        /// File or directory that failed
        path: String,
        /// Underlying I/O error message
        reason: String,
    },
}

/// Errors raised while resolving a feature set into enabled and disabled gates.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// `spec.featureSet` names a feature set the catalog does not know.
    #[error(".spec.featureSet {feature_set:?} not found")]
    FeatureSetNotFound {
        /// The unknown feature set name
        feature_set: String,
    },

    /// The custom selection both enables and disables a gate.
    #[error("trying to enable and disable {feature:?}")]
    ConflictingOverride {
        /// The gate listed in both custom lists
        feature: String,
    },

    /// The observed minimum version of a component is not a semantic version.
    #[error("observed minimum {component} version {version:?} for feature gate {feature:?} does not parse: {reason}")]
    InvalidObservedVersion {
        /// Gate being gated
        feature: String,
        /// Component whose observation is malformed
        component: String,
        /// The unparsable observed version
        version: String,
        /// Parser error message
        reason: String,
    },
}

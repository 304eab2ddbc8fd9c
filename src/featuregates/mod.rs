// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Feature gate resolution engine.
//!
//! Everything in this module is synchronous and performs no cluster I/O (the loader
//! only reads local manifest files at startup). The reconcilers in
//! [`crate::reconcilers`] feed it cluster state and persist what it returns.
//!
//! - [`catalog`] - the validated, immutable table of feature sets
//! - [`resolver`] - selected feature set to complete enabled/disabled partition
//! - [`history`] - current snapshot merged with retained historical snapshots
//! - [`loader`] - catalog construction from rendered `FeatureGate` manifests

pub mod catalog;
pub mod errors;
pub mod history;
pub mod loader;
pub mod resolver;

pub use catalog::{
    FeatureGateDescription, FeatureSetCatalog, FeatureSetCatalogBuilder, FeatureSetPolicy,
};
pub use errors::{CatalogError, ResolveError};
pub use history::{known_versions, merge_history};
pub use loader::{cluster_profile_for_topology, load_catalog_from_dir, parse_feature_gate};
pub use resolver::{
    current_minimum_versions, effective_feature_set, resolve, resolve_snapshot,
    MinimumComponentVersions, ResolvedFeatureGates,
};

#[cfg(test)]
mod loader_tests;

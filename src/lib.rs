// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # clustercfg - Cluster Configuration Operator
//!
//! clustercfg resolves the cluster's `FeatureGate` selection into the complete list of
//! enabled and disabled feature gates for every release the cluster knows about, and
//! keeps that list persisted on the `FeatureGate` status.
//!
//! ## Overview
//!
//! - A static catalog of named feature sets is loaded at startup from the release's
//!   authoritative manifests.
//! - The resolver partitions every known feature name into enabled or disabled for the
//!   selected feature set, gating features on observed minimum component versions.
//! - The history merger keeps snapshots for prior releases that are still in the
//!   cluster's upgrade history and drops the rest.
//! - The reconcile loop writes the result only when it differs from what is stored.
//!
//! ## Modules
//!
//! - [`featuregates`] - Catalog, resolver, history merger and manifest loader
//! - [`reconcilers`] - Reconciliation passes for the `FeatureGate` singleton
//! - [`controllers`] - `kube::runtime::Controller` wiring for the reconcilers
//! - [`cluster_config`] - Read/write access to cluster configuration objects
//! - [`operator_status`] - Version and degraded-condition reporting
//! - [`render`] - Offline rendering of `FeatureGate` manifests
//! - [`crd`] - Resource types for the `config.openshift.io/v1` objects
//!
//! ## Example
//!
//! ```rust
//! use clustercfg::crd::FeatureGateAttributes;
//! use clustercfg::featuregates::{resolve, FeatureSetCatalog, FeatureSetPolicy};
//! use std::collections::BTreeMap;
//!
//! let catalog = FeatureSetCatalog::builder()
//!     .feature_set(
//!         "Default",
//!         FeatureSetPolicy::new(
//!             vec![FeatureGateAttributes::named("Five")],
//!             vec![FeatureGateAttributes::named("Eggplant")],
//!         ),
//!     )
//!     .build()?;
//!
//! let resolved = resolve(&catalog, "", None, &BTreeMap::new())?;
//! assert_eq!(resolved.enabled_names(), vec!["Five"]);
//! assert_eq!(resolved.disabled_names(), vec!["Eggplant"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod cluster_config;
pub mod constants;
pub mod context;
pub mod controllers;
pub mod crd;
pub mod events;
pub mod featuregates;
pub mod metrics;
pub mod operator_status;
pub mod reconcilers;
pub mod render;
pub mod server;
pub mod status_reasons;

#[cfg(test)]
mod crd_tests;
#[cfg(test)]
mod status_reasons_tests;
#[cfg(test)]
mod test_support;

// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Building the feature set catalog from authoritative `FeatureGate` manifests.
//!
//! The release payload ships one rendered `FeatureGate` manifest per feature set (and
//! per cluster profile). Each manifest's `status.featureGates` entry for the operator's
//! own version lists the gates that feature set enables and disables. At startup the
//! operator walks the manifest directory, keeps the manifests that apply to the active
//! cluster profile, and freezes the result into a [`FeatureSetCatalog`].

use super::catalog::{FeatureSetCatalog, FeatureSetPolicy};
use super::errors::CatalogError;
use super::resolver::effective_feature_set;
use crate::constants::{
    CLUSTER_PROFILE_ANNOTATION_PREFIX, CLUSTER_PROFILE_CONFIG_OPERATOR_ONLY,
    CLUSTER_PROFILE_EXTERNAL, CLUSTER_PROFILE_SELF_MANAGED, KIND_FEATURE_GATE,
    TOPOLOGY_EXTERNAL,
};
use crate::crd::FeatureGate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Pick the cluster profile from the `Infrastructure` control plane topology.
#[must_use]
pub fn cluster_profile_for_topology(control_plane_topology: Option<&str>) -> &'static str {
    match control_plane_topology {
        Some(TOPOLOGY_EXTERNAL) => CLUSTER_PROFILE_EXTERNAL,
        _ => CLUSTER_PROFILE_SELF_MANAGED,
    }
}

/// Parse a YAML document as a `FeatureGate`.
///
/// Returns `Ok(None)` when the document is well-formed YAML of a different kind.
///
/// # Errors
///
/// Returns the parser error message when the document is not valid YAML or does not
/// match the `FeatureGate` shape.
pub fn parse_feature_gate(content: &str) -> Result<Option<FeatureGate>, String> {
    let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;

    let kind = value.get("kind").and_then(serde_yaml::Value::as_str);
    if kind != Some(KIND_FEATURE_GATE) {
        return Ok(None);
    }

    serde_yaml::from_value(value)
        .map(Some)
        .map_err(|e| e.to_string())
}

/// Load and validate the catalog from `dir` for `operator_version` and `cluster_profile`.
///
/// # Errors
///
/// - [`CatalogError::Io`] if the directory or a file cannot be read
/// - [`CatalogError::InvalidManifest`] if a file is not a `FeatureGate` manifest
/// - [`CatalogError::NoManifests`] if no manifest applies to the cluster profile
/// - any validation error from
///   [`FeatureSetCatalogBuilder::build`](super::FeatureSetCatalogBuilder::build)
pub fn load_catalog_from_dir(
    dir: &Path,
    operator_version: &str,
    cluster_profile: &str,
) -> Result<FeatureSetCatalog, CatalogError> {
    let profile_annotation = format!("{CLUSTER_PROFILE_ANNOTATION_PREFIX}{cluster_profile}");
    let mut builder = FeatureSetCatalog::builder();
    let mut loaded = 0usize;

    for path in manifest_files(dir)? {
        let content = fs::read_to_string(&path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let feature_gate = match parse_feature_gate(&content) {
            Ok(Some(feature_gate)) => feature_gate,
            Ok(None) => {
                return Err(CatalogError::InvalidManifest {
                    path: path.display().to_string(),
                    reason: format!("kind is not {KIND_FEATURE_GATE}"),
                })
            }
            Err(reason) => {
                return Err(CatalogError::InvalidManifest {
                    path: path.display().to_string(),
                    reason,
                })
            }
        };

        if !applies_to_profile(&feature_gate, &profile_annotation) {
            debug!(
                path = %path.display(),
                cluster_profile,
                "Skipping manifest for another cluster profile"
            );
            continue;
        }

        let feature_set = effective_feature_set(&feature_gate.spec.feature_set).to_string();
        let policy = policy_for_version(&feature_gate, operator_version);
        debug!(
            path = %path.display(),
            feature_set = %feature_set,
            enabled = policy.enabled.len(),
            disabled = policy.disabled.len(),
            "Loaded feature set manifest"
        );

        builder = builder.feature_set(feature_set, policy);
        loaded += 1;
    }

    if loaded == 0 {
        return Err(CatalogError::NoManifests {
            dir: dir.display().to_string(),
        });
    }

    let catalog = builder.build()?;
    info!(
        feature_sets = catalog.len(),
        known_features = catalog.known_feature_names().len(),
        operator_version,
        cluster_profile,
        "Loaded feature set catalog"
    );
    Ok(catalog)
}

/// Older payloads carry no cluster profile annotations and apply everywhere.
fn applies_to_profile(feature_gate: &FeatureGate, profile_annotation: &str) -> bool {
    let Some(annotations) = feature_gate.metadata.annotations.as_ref() else {
        return true;
    };

    let has_preference = annotations
        .keys()
        .any(|key| key.starts_with(CLUSTER_PROFILE_ANNOTATION_PREFIX));
    if !has_preference {
        return true;
    }

    annotations.get(profile_annotation).map(String::as_str)
        == Some(CLUSTER_PROFILE_CONFIG_OPERATOR_ONLY)
}

fn policy_for_version(feature_gate: &FeatureGate, operator_version: &str) -> FeatureSetPolicy {
    feature_gate
        .status
        .as_ref()
        .and_then(|status| {
            status
                .feature_gates
                .iter()
                .find(|details| details.version == operator_version)
        })
        .map(|details| FeatureSetPolicy::new(details.enabled.clone(), details.disabled.clone()))
        .unwrap_or_default()
}

/// Every regular file under `dir`, recursively, in path order.
fn manifest_files(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = fs::read_dir(&current).map_err(|e| CatalogError::Io {
            path: current.display().to_string(),
            reason: e.to_string(),
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| CatalogError::Io {
                path: current.display().to_string(),
                reason: e.to_string(),
            })?;
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

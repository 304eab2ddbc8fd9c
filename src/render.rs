// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Offline rendering of `FeatureGate` manifests for installation payloads.
//!
//! The installer renders the cluster's `FeatureGate` before any controller runs.
//! This module resolves each rendered manifest against the catalog for the payload
//! version and writes it back with a single-entry `status.featureGates`, so the
//! first components to start already see the resolved gates.

use crate::cli::RenderArgs;
use crate::crd::{FeatureGate, FeatureGateStatus};
use crate::featuregates::{
    load_catalog_from_dir, parse_feature_gate, resolve_snapshot, FeatureSetCatalog,
    MinimumComponentVersions, ResolveError,
};
use anyhow::{bail, Context as _, Result};
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// Replace `status.featureGates` on `feature_gate` with the snapshot for `version`.
///
/// No minimum component versions are observed at render time, so every gate that
/// declares a requirement resolves disabled. Existing status conditions are kept.
///
/// # Errors
///
/// Returns the resolution error when the selected feature set is unknown or the
/// custom selection conflicts.
pub fn render_feature_gate(
    catalog: &FeatureSetCatalog,
    feature_gate: &mut FeatureGate,
    version: &str,
) -> Result<(), ResolveError> {
    let snapshot = resolve_snapshot(
        catalog,
        &feature_gate.spec,
        version,
        &MinimumComponentVersions::new(),
    )?;

    let status = feature_gate.status.get_or_insert_with(FeatureGateStatus::default);
    status.feature_gates = vec![snapshot];
    Ok(())
}

/// Run the `render` subcommand.
///
/// Returns the number of `FeatureGate` manifests rewritten.
///
/// # Errors
///
/// Returns an error if no input files are given, none of them holds a
/// `FeatureGate`, the catalog cannot be loaded, or a manifest cannot be resolved,
/// read or written.
pub fn run_render(args: &RenderArgs) -> Result<usize> {
    let manifests = feature_gate_manifests(&args.rendered_manifest_files)?;

    let catalog = load_catalog_from_dir(
        &args.authoritative_feature_gate_dir,
        &args.payload_version,
        &args.cluster_profile,
    )
    .context("unable to load the feature set catalog")?;

    let rendered_count = manifests.len();
    for (path, mut feature_gate) in manifests {
        render_feature_gate(&catalog, &mut feature_gate, &args.payload_version)
            .with_context(|| format!("error determining FeatureGates for {}", path.display()))?;

        let rendered = serde_yaml::to_string(&feature_gate)
            .context("error encoding FeatureGate manifest")?;
        fs::write(&path, rendered)
            .with_context(|| format!("error writing FeatureGate manifest {}", path.display()))?;

        info!(
            path = %path.display(),
            feature_set = %feature_gate.spec.feature_set,
            version = %args.payload_version,
            "Rendered FeatureGate manifest"
        );
    }

    Ok(rendered_count)
}

/// Read every input file and keep the ones holding a `FeatureGate`.
fn feature_gate_manifests(files: &[PathBuf]) -> Result<Vec<(PathBuf, FeatureGate)>> {
    if files.is_empty() {
        bail!("cannot return FeatureGate without rendered manifests");
    }

    let mut manifests = Vec::new();
    for path in files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("error reading input manifest {}", path.display()))?;

        match parse_feature_gate(&content) {
            Ok(Some(feature_gate)) => manifests.push((path.clone(), feature_gate)),
            Ok(None) => {}
            Err(reason) => bail!("error decoding {}: {reason}", path.display()),
        }
    }

    if manifests.is_empty() {
        let names: Vec<String> = files.iter().map(|p| p.display().to_string()).collect();
        bail!("no FeatureGates found in rendered manifests: {}", names.join(", "));
    }

    Ok(manifests)
}

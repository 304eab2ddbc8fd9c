// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Command-line configuration.
//!
//! Running without a subcommand starts the operator, so the operator flags are
//! accepted at the top level as well as under `operator`.

use crate::constants::{
    CLUSTER_PROFILE_SELF_MANAGED, DEFAULT_LEASE_NAME, DEFAULT_LEASE_NAMESPACE,
    DEFAULT_METRICS_BIND_ADDRESS, DEFAULT_RENDER_PAYLOAD_VERSION, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clustercfg", version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub operator: OperatorArgs,
}

impl Cli {
    /// The selected subcommand, defaulting to `operator` with the top-level flags.
    #[must_use]
    pub fn into_command(self) -> Command {
        self.command.unwrap_or(Command::Operator(self.operator))
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the feature gate controllers (default mode)
    Operator(OperatorArgs),

    /// Resolve rendered `FeatureGate` manifests in place for an installation payload
    Render(RenderArgs),
}

/// Operator mode arguments
#[derive(Args, Debug, Clone)]
pub struct OperatorArgs {
    /// Release version this operator reconciles feature gates for
    #[arg(long, env = "OPERATOR_IMAGE_VERSION")]
    pub operator_version: Option<String>,

    /// Directory containing each possible rendered `FeatureGate` manifest
    #[arg(long, env = "AUTHORITATIVE_FEATURE_GATE_DIR")]
    pub authoritative_feature_gate_dir: Option<PathBuf>,

    /// Address serving `/metrics`, `/healthz` and `/readyz`
    #[arg(long, env = "METRICS_BIND_ADDRESS", default_value = DEFAULT_METRICS_BIND_ADDRESS)]
    pub metrics_bind_address: SocketAddr,

    /// Timeout applied to every API request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,

    /// Only run the controllers while holding the leader lease
    #[arg(long, env = "ENABLE_LEADER_ELECTION")]
    pub leader_election: bool,

    /// Namespace of the leader election lease
    #[arg(long, env = "LEASE_NAMESPACE", default_value = DEFAULT_LEASE_NAMESPACE)]
    pub lease_namespace: String,

    /// Name of the leader election lease
    #[arg(long, env = "LEASE_NAME", default_value = DEFAULT_LEASE_NAME)]
    pub lease_name: String,

    /// Leader identity, usually the pod name
    #[arg(long, env = "POD_NAME")]
    pub pod_name: Option<String>,
}

impl OperatorArgs {
    /// Return the settings that have no usable default.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing flag.
    pub fn required(&self) -> Result<(&str, &PathBuf)> {
        let Some(version) = self.operator_version.as_deref().filter(|v| !v.is_empty()) else {
            bail!("--operator-version (or OPERATOR_IMAGE_VERSION) is required");
        };
        let Some(dir) = self.authoritative_feature_gate_dir.as_ref() else {
            bail!("--authoritative-feature-gate-dir is required");
        };
        Ok((version, dir))
    }

    /// Leader identity, falling back to a per-process name.
    #[must_use]
    pub fn leader_identity(&self) -> String {
        self.pod_name
            .clone()
            .unwrap_or_else(|| format!("clustercfg-{}", std::process::id()))
    }
}

/// Render mode arguments
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Rendered manifest file to scan for a `FeatureGate` (repeatable)
    #[arg(long = "rendered-manifest-files", required = true, num_args = 1..)]
    pub rendered_manifest_files: Vec<PathBuf>,

    /// Release version to resolve the feature gates for
    #[arg(long, default_value = DEFAULT_RENDER_PAYLOAD_VERSION)]
    pub payload_version: String,

    /// Directory containing each possible rendered `FeatureGate` manifest
    #[arg(long)]
    pub authoritative_feature_gate_dir: PathBuf,

    /// Cluster profile selecting which authoritative manifests apply
    #[arg(long, default_value = CLUSTER_PROFILE_SELF_MANAGED)]
    pub cluster_profile: String,
}

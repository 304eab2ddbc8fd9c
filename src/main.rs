// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use anyhow::{Context as _, Result};
use clap::Parser;
use clustercfg::{
    cli::{Cli, Command, OperatorArgs},
    cluster_config::{ClusterConfigSource, KubeClusterConfig},
    constants::{
        DEFAULT_LEASE_DURATION_SECS, DEFAULT_LEASE_GRACE_SECS, EVENT_REPORTER,
        TOKIO_WORKER_THREADS,
    },
    context::Context,
    controllers::{
        run_feature_gate_controller, run_feature_set_migration_controller,
        run_operator_status_publisher,
    },
    events::KubeEventPublisher,
    featuregates::{cluster_profile_for_topology, load_catalog_from_dir},
    metrics,
    operator_status::OperatorStatus,
    render::run_render,
    server::{self, Readiness},
};
use kube::Client;
use kube_lease_manager::LeaseManagerBuilder;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    match cli.into_command() {
        Command::Render(args) => {
            let rendered = run_render(&args)?;
            info!(rendered, "Rendered FeatureGate manifests");
            Ok(())
        }
        Command::Operator(args) => {
            // Build Tokio runtime with custom thread names
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(TOKIO_WORKER_THREADS)
                .thread_name("clustercfg-controller")
                .enable_all()
                .build()?;

            runtime.block_on(async_main(args))
        }
    }
}

/// Respects `RUST_LOG` (default `info`) and `RUST_LOG_FORMAT` (`json` or `text`).
fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn async_main(args: OperatorArgs) -> Result<()> {
    info!("Starting cluster configuration operator");

    if let Err(e) = rustls::crypto::ring::default_provider().install_default() {
        anyhow::bail!("failed to install the rustls crypto provider: {e:?}");
    }

    let (operator_version, manifest_dir) = args.required()?;

    debug!("Initializing Kubernetes client");
    let request_timeout = Duration::from_secs(args.request_timeout_secs);
    let mut config = kube::Config::infer()
        .await
        .context("unable to infer Kubernetes client configuration")?;
    config.read_timeout = Some(request_timeout);
    config.write_timeout = Some(request_timeout);
    let client = Client::try_from(config).context("unable to create Kubernetes client")?;
    debug!("Kubernetes client initialized successfully");

    let source = Arc::new(KubeClusterConfig::new(client.clone()));

    let control_plane_topology = source
        .infrastructure()
        .await
        .context("unable to get Infrastructure")?
        .and_then(|infrastructure| infrastructure.status)
        .and_then(|status| status.control_plane_topology);
    let cluster_profile = cluster_profile_for_topology(control_plane_topology.as_deref());

    let catalog = load_catalog_from_dir(manifest_dir, operator_version, cluster_profile)
        .with_context(|| {
            format!(
                "unable to load feature sets from {}",
                manifest_dir.display()
            )
        })?;

    let operator_status = OperatorStatus::new();
    let persisted = source
        .cluster_operator()
        .await
        .context("unable to get ClusterOperator")?
        .and_then(|cluster_operator| cluster_operator.status);
    operator_status.seed_from(persisted.as_ref(), operator_version);

    let ctx = Arc::new(Context::new(
        source,
        Arc::new(catalog),
        operator_version,
        operator_status,
        Arc::new(KubeEventPublisher::new(client.clone(), EVENT_REPORTER)),
    ));

    let readiness = Readiness::new();
    let mut metrics_server = tokio::spawn(server::serve(
        args.metrics_bind_address,
        readiness.clone(),
    ));

    let leadership = if args.leader_election {
        Some(acquire_leadership(client.clone(), &args).await?)
    } else {
        info!("Leader election disabled, running controllers immediately");
        None
    };

    readiness.set_ready(true);
    info!(operator_version, cluster_profile, "Starting all controllers");

    // Controllers should never exit - if one fails, we log it and exit the main process
    tokio::select! {
        result = run_feature_gate_controller(client.clone(), ctx.clone()) => {
            error!("CRITICAL: FeatureGate controller exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("FeatureGate controller exited unexpectedly without error")
        }
        result = run_feature_set_migration_controller(client.clone(), ctx.clone()) => {
            error!("CRITICAL: FeatureSet migration controller exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("FeatureSet migration controller exited unexpectedly without error")
        }
        result = run_operator_status_publisher(ctx.clone()) => {
            error!("CRITICAL: ClusterOperator status publisher exited unexpectedly: {:?}", result);
            result?;
            anyhow::bail!("ClusterOperator status publisher exited unexpectedly without error")
        }
        result = &mut metrics_server => {
            error!("CRITICAL: Metrics server exited unexpectedly: {:?}", result);
            result??;
            anyhow::bail!("Metrics server exited unexpectedly without error")
        }
        () = leadership_lost(leadership, args.leader_identity()) => {
            readiness.set_ready(false);
            anyhow::bail!("Lost leader election lease, exiting")
        }
    }
}

/// Block until this process holds the lease, then keep renewing it in the background.
async fn acquire_leadership(client: Client, args: &OperatorArgs) -> Result<watch::Receiver<bool>> {
    let identity = args.leader_identity();
    info!(
        lease = %args.lease_name,
        namespace = %args.lease_namespace,
        identity = %identity,
        "Waiting for leader election lease"
    );

    let manager = LeaseManagerBuilder::new(client, &args.lease_name)
        .with_namespace(&args.lease_namespace)
        .with_identity(&identity)
        .with_duration(DEFAULT_LEASE_DURATION_SECS)
        .with_grace(DEFAULT_LEASE_GRACE_SECS)
        .build()
        .await
        .context("unable to create leader election lease manager")?;

    let (mut is_leader, _lease_task) = manager.watch().await;
    while !*is_leader.borrow_and_update() {
        is_leader
            .changed()
            .await
            .context("leader election lease manager stopped")?;
    }

    metrics::record_leader_elected(&identity);
    info!(identity = %identity, "Acquired leader election lease");
    Ok(is_leader)
}

/// Resolve once leadership is lost; never resolves without leader election.
async fn leadership_lost(leadership: Option<watch::Receiver<bool>>, identity: String) {
    let Some(mut is_leader) = leadership else {
        return std::future::pending().await;
    };

    loop {
        if is_leader.changed().await.is_err() {
            warn!("Leader election lease manager stopped");
            break;
        }
        if !*is_leader.borrow_and_update() {
            break;
        }
    }

    metrics::record_leader_lost(&identity);
    error!(identity = %identity, "Lost leader election lease");
}

// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `kube::runtime::Controller` plumbing for the reconcilers.
//!
//! Both controllers key on the single `FeatureGate` named `cluster`. The feature gate
//! controller also watches `ClusterVersion` and the `Node` config and maps every
//! change to that same object, so any input change triggers one pass. The runtime
//! never runs two passes for the same object at once and collapses triggers that
//! arrive mid-pass into one follow-up pass.
//!
//! The wrappers here translate each pass into metrics, logs, and the controller's
//! degraded condition in [`OperatorStatus`](crate::operator_status::OperatorStatus).

use crate::constants::{
    CLUSTER_OBJECT_NAME, ERROR_REQUEUE_DURATION_SECS, FEATURE_GATE_CONTROLLER,
    FEATURE_GATE_RESYNC_SECS, FEATURE_SET_MIGRATION_RESYNC_SECS,
    LATENCY_SENSITIVE_REMOVAL_CONTROLLER, OPERATOR_STATUS_PUBLISH_INTERVAL_SECS,
};
use crate::context::Context;
use crate::crd::{ClusterVersion, FeatureGate, NodeConfig};
use crate::metrics::{self, ReconcileOutcome};
use crate::operator_status::publish_operator_status;
use crate::reconcilers::{reconcile_feature_gates, reconcile_feature_set_migration};
use anyhow::Result;
use futures::StreamExt;
use kube::runtime::controller::Action;
use kube::runtime::reflector::ObjectRef;
use kube::runtime::watcher::Config;
use kube::runtime::Controller;
use kube::{Api, Client, ResourceExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ReconcileError(#[from] anyhow::Error);

fn cluster_feature_gate() -> ObjectRef<FeatureGate> {
    ObjectRef::new(CLUSTER_OBJECT_NAME)
}

/// Run the feature gate controller until shutdown.
///
/// # Errors
///
/// Currently never returns an error; the signature matches the other long-running
/// tasks joined in `main`.
pub async fn run_feature_gate_controller(client: Client, ctx: Arc<Context>) -> Result<()> {
    info!("Starting {FEATURE_GATE_CONTROLLER}");

    let feature_gates = Api::<FeatureGate>::all(client.clone());
    let cluster_versions = Api::<ClusterVersion>::all(client.clone());
    let node_configs = Api::<NodeConfig>::all(client);

    Controller::new(feature_gates, Config::default())
        .watches(cluster_versions, Config::default(), |_| {
            Some(cluster_feature_gate())
        })
        .watches(node_configs, Config::default(), |_| {
            Some(cluster_feature_gate())
        })
        .shutdown_on_signal()
        .run(reconcile_feature_gate_wrapper, error_policy, ctx)
        .for_each(|_| futures::future::ready(()))
        .await;

    info!("{FEATURE_GATE_CONTROLLER} stopped");
    Ok(())
}

/// Run the `LatencySensitive` removal controller until shutdown.
///
/// # Errors
///
/// Currently never returns an error.
pub async fn run_feature_set_migration_controller(client: Client, ctx: Arc<Context>) -> Result<()> {
    info!("Starting {LATENCY_SENSITIVE_REMOVAL_CONTROLLER}");

    let feature_gates = Api::<FeatureGate>::all(client);

    Controller::new(feature_gates, Config::default())
        .shutdown_on_signal()
        .run(reconcile_feature_set_migration_wrapper, error_policy, ctx)
        .for_each(|_| futures::future::ready(()))
        .await;

    info!("{LATENCY_SENSITIVE_REMOVAL_CONTROLLER} stopped");
    Ok(())
}

/// Publish the in-memory operator status to the `ClusterOperator` on a fixed interval.
///
/// Failures are logged and retried on the next tick.
///
/// # Errors
///
/// Never returns; the signature matches the other long-running tasks.
pub async fn run_operator_status_publisher(ctx: Arc<Context>) -> Result<()> {
    let mut interval =
        tokio::time::interval(Duration::from_secs(OPERATOR_STATUS_PUBLISH_INTERVAL_SECS));

    loop {
        interval.tick().await;
        if let Err(e) = publish_operator_status(ctx.source.as_ref(), &ctx.operator_status).await {
            warn!(error = %format!("{e:#}"), "Failed to publish ClusterOperator status");
        }
    }
}

async fn reconcile_feature_gate_wrapper(
    feature_gate: Arc<FeatureGate>,
    ctx: Arc<Context>,
) -> Result<Action, ReconcileError> {
    if feature_gate.name_any() != CLUSTER_OBJECT_NAME {
        debug!(
            name = %feature_gate.name_any(),
            "Ignoring FeatureGate that is not the cluster singleton"
        );
        return Ok(Action::await_change());
    }

    let start = Instant::now();
    match reconcile_feature_gates(&ctx).await {
        Ok(sync) => {
            metrics::record_reconciliation(
                FEATURE_GATE_CONTROLLER,
                sync.outcome(),
                start.elapsed(),
            );
            if let Some(current) = sync.current() {
                metrics::record_feature_gate_counts(current.enabled.len(), current.disabled.len());
            }
            ctx.operator_status.set_degraded(FEATURE_GATE_CONTROLLER, None);
            debug!(outcome = sync.outcome().as_str(), "Reconciled FeatureGate");
            Ok(Action::requeue(Duration::from_secs(FEATURE_GATE_RESYNC_SECS)))
        }
        Err(e) => {
            let message = format!("{e:#}");
            error!(error = %message, "Failed to reconcile FeatureGate");
            metrics::record_reconciliation(
                FEATURE_GATE_CONTROLLER,
                ReconcileOutcome::Error,
                start.elapsed(),
            );
            ctx.operator_status
                .set_degraded(FEATURE_GATE_CONTROLLER, Some(&message));
            Err(e.into())
        }
    }
}

async fn reconcile_feature_set_migration_wrapper(
    feature_gate: Arc<FeatureGate>,
    ctx: Arc<Context>,
) -> Result<Action, ReconcileError> {
    if feature_gate.name_any() != CLUSTER_OBJECT_NAME {
        return Ok(Action::await_change());
    }

    let start = Instant::now();
    match reconcile_feature_set_migration(&ctx).await {
        Ok(migration) => {
            metrics::record_reconciliation(
                LATENCY_SENSITIVE_REMOVAL_CONTROLLER,
                migration.outcome(),
                start.elapsed(),
            );
            ctx.operator_status
                .set_degraded(LATENCY_SENSITIVE_REMOVAL_CONTROLLER, None);
            Ok(Action::requeue(Duration::from_secs(
                FEATURE_SET_MIGRATION_RESYNC_SECS,
            )))
        }
        Err(e) => {
            let message = format!("{e:#}");
            error!(error = %message, "Failed to migrate FeatureGate featureSet");
            metrics::record_reconciliation(
                LATENCY_SENSITIVE_REMOVAL_CONTROLLER,
                ReconcileOutcome::Error,
                start.elapsed(),
            );
            ctx.operator_status
                .set_degraded(LATENCY_SENSITIVE_REMOVAL_CONTROLLER, Some(&message));
            Err(e.into())
        }
    }
}

/// Error policy shared by both controllers
fn error_policy(_resource: Arc<FeatureGate>, _err: &ReconcileError, _ctx: Arc<Context>) -> Action {
    Action::requeue(Duration::from_secs(ERROR_REQUEUE_DURATION_SECS))
}

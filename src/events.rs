// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Kubernetes Event recording for the operator's controllers.
//!
//! Controllers talk to an [`EventPublisher`] rather than to
//! `kube::runtime::events::Recorder` directly, so reconcilers can be exercised with a
//! recording or no-op publisher in tests.
//!
//! Events are fire-and-forget: a failed publish is logged as a warning and never
//! fails the reconciliation pass that emitted it.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::ObjectReference;
use kube::runtime::events::{Event, EventType, Recorder, Reporter};
use kube::Client;
use tracing::warn;

/// Publishes Kubernetes Events about cluster objects.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an Event on `resource_ref`.
    ///
    /// * `reason` - Machine-readable reason (e.g. `FeatureGateUpdate`)
    /// * `action` - What the controller did (e.g. `Reconcile`)
    /// * `note` - Optional human-readable message
    async fn publish(
        &self,
        resource_ref: &ObjectReference,
        type_: EventType,
        reason: &str,
        action: &str,
        note: Option<String>,
    );
}

/// Publisher backed by `kube::runtime::events::Recorder`.
pub struct KubeEventPublisher {
    recorder: Recorder,
}

impl KubeEventPublisher {
    /// Create a publisher that reports as `controller_name`.
    #[must_use]
    pub fn new(client: Client, controller_name: &str) -> Self {
        let reporter = Reporter {
            controller: controller_name.to_string(),
            instance: None,
        };
        Self {
            recorder: Recorder::new(client, reporter),
        }
    }
}

#[async_trait]
impl EventPublisher for KubeEventPublisher {
    async fn publish(
        &self,
        resource_ref: &ObjectReference,
        type_: EventType,
        reason: &str,
        action: &str,
        note: Option<String>,
    ) {
        let event = Event {
            type_,
            reason: reason.to_string(),
            note,
            action: action.to_string(),
            secondary: None,
        };
        if let Err(e) = self.recorder.publish(&event, resource_ref).await {
            warn!(reason, action, error = %e, "Failed to publish Kubernetes event");
        }
    }
}

/// Publisher that drops every event, for running passes without an event sink.
pub struct NoopEventPublisher;

#[async_trait]
impl EventPublisher for NoopEventPublisher {
    async fn publish(
        &self,
        _resource_ref: &ObjectReference,
        _type_: EventType,
        _reason: &str,
        _action: &str,
        _note: Option<String>,
    ) {
    }
}

/// Event reason strings, shown under REASON in `kubectl get events`.
pub mod reasons {
    /// The `FeatureGate` status was rewritten with a new resolution
    pub const FEATURE_GATE_UPDATE: &str = "FeatureGateUpdate";
    /// A retired feature set was replaced with `Default`
    pub const FEATURE_SET_MIGRATED: &str = "FeatureSetMigrated";
}

/// Event action strings, shown under ACTION in `kubectl get events`.
pub mod actions {
    /// Standard reconciliation pass
    pub const RECONCILE: &str = "Reconcile";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_publisher_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NoopEventPublisher>();
        assert_send_sync::<KubeEventPublisher>();
    }

    #[test]
    fn test_reason_constants() {
        assert_eq!(reasons::FEATURE_GATE_UPDATE, "FeatureGateUpdate");
        assert_eq!(reasons::FEATURE_SET_MIGRATED, "FeatureSetMigrated");
        assert_eq!(actions::RECONCILE, "Reconcile");
    }

    #[tokio::test]
    async fn test_noop_publisher_does_not_panic() {
        NoopEventPublisher
            .publish(
                &ObjectReference::default(),
                EventType::Normal,
                reasons::FEATURE_GATE_UPDATE,
                actions::RECONCILE,
                Some("test".to_string()),
            )
            .await;
    }
}

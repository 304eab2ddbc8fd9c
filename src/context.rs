// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Shared context for all controllers.
//!
//! Every controller receives an `Arc<Context>` that contains:
//! - The cluster configuration source (API access, or a fake in tests)
//! - The feature set catalog, loaded once at startup
//! - The release version this process reconciles towards
//! - The in-memory operator status (version and degraded sinks)
//! - The Kubernetes event publisher

use crate::cluster_config::ClusterConfigSource;
use crate::events::EventPublisher;
use crate::featuregates::FeatureSetCatalog;
use crate::operator_status::OperatorStatus;
use std::sync::Arc;

/// Shared context passed to all controllers.
#[derive(Clone)]
pub struct Context {
    /// Reads and writes cluster configuration objects
    pub source: Arc<dyn ClusterConfigSource>,

    /// Immutable feature set catalog
    pub catalog: Arc<FeatureSetCatalog>,

    /// Release version of the running payload; the current snapshot is keyed by it
    pub process_version: String,

    /// Version-achieved and degraded-condition sinks
    pub operator_status: OperatorStatus,

    /// Kubernetes event publisher
    pub events: Arc<dyn EventPublisher>,
}

impl Context {
    #[must_use]
    pub fn new(
        source: Arc<dyn ClusterConfigSource>,
        catalog: Arc<FeatureSetCatalog>,
        process_version: impl Into<String>,
        operator_status: OperatorStatus,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            source,
            catalog,
            process_version: process_version.into(),
            operator_status,
            events,
        }
    }
}

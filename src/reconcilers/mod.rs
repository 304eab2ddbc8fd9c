// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Reconciliation passes for the cluster configuration controllers.
//!
//! Each pass is a plain async function over the shared [`Context`](crate::context::Context).
//! The `kube::runtime::Controller` plumbing that schedules them lives in
//! [`crate::controllers`].
//!
//! # Reconciliation Architecture
//!
//! 1. **Read** - Fetch the cluster objects the pass depends on; a missing object
//!    means "not yet", not an error
//! 2. **Compute** - Derive the desired state with the pure functions in
//!    [`crate::featuregates`]
//! 3. **Compare** - Skip the write when nothing changed
//! 4. **Write** - Persist with a single API call, then report the achieved version
//!
//! # Available Reconcilers
//!
//! - [`reconcile_feature_gates`] - Resolves and persists the `FeatureGate` status
//! - [`reconcile_feature_set_migration`] - Moves the retired `LatencySensitive`
//!   feature set back to `Default`
//!
//! # Example: Running a Pass
//!
//! ```rust,no_run
//! use clustercfg::context::Context;
//! use clustercfg::reconcilers::reconcile_feature_gates;
//!
//! async fn pass(ctx: &Context) -> anyhow::Result<()> {
//!     let sync = reconcile_feature_gates(ctx).await?;
//!     println!("{:?}", sync.outcome());
//!     Ok(())
//! }
//! ```

pub mod featuregate;
pub mod featureset_migration;
pub mod status;

#[cfg(test)]
mod status_tests;

pub use featuregate::{reconcile_feature_gates, update_event_note, FeatureGateSync};
pub use featureset_migration::{reconcile_feature_set_migration, FeatureSetMigration};

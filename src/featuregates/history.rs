// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Merging the current release's snapshot with previously recorded snapshots.
//!
//! The status of the `FeatureGate` keeps one snapshot per release the cluster has
//! been at. Each pass rebuilds the list: the current snapshot first, then every
//! earlier snapshot the cluster still remembers, in the order they were recorded.
//! Snapshots for releases that dropped out of the upgrade history are pruned, which
//! keeps the list bounded across upgrades.

use crate::crd::{FeatureGateDetails, UpdateHistory};
use std::collections::BTreeSet;

/// Release versions the cluster still recognizes: the running version plus every
/// version in the upgrade history.
#[must_use]
pub fn known_versions(process_version: &str, history: &[UpdateHistory]) -> BTreeSet<String> {
    std::iter::once(process_version)
        .chain(history.iter().map(|entry| entry.version.as_str()))
        .map(str::to_string)
        .collect()
}

/// Build the desired status list from the current snapshot and the persisted one.
///
/// Previous entries for the current version, or for versions outside `known`, are
/// dropped. Retained entries are copied unchanged and keep their relative order.
#[must_use]
pub fn merge_history(
    current: FeatureGateDetails,
    previous: &[FeatureGateDetails],
    known: &BTreeSet<String>,
) -> Vec<FeatureGateDetails> {
    let retained: Vec<FeatureGateDetails> = previous
        .iter()
        .filter(|entry| entry.version != current.version && known.contains(&entry.version))
        .cloned()
        .collect();

    std::iter::once(current).chain(retained).collect()
}

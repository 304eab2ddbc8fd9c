// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Resolution of a selected feature set into a complete enabled/disabled partition.
//!
//! [`resolve`] is a pure function over the catalog, the selected feature set, the
//! optional custom selection and the observed minimum component versions. Its output
//! always covers every gate the catalog knows about (plus any custom names), never
//! lists a gate twice, and is sorted by name so repeated calls compare equal.
//!
//! # Resolution rules
//!
//! - `CustomNoUpgrade` layers the custom selection over the `Default` feature set.
//!   Force-enabled names are enabled, force-disabled names are disabled, and every other
//!   gate keeps its `Default` classification. Gates `Default` does not mention are
//!   disabled. Empty names in the custom lists are ignored, and minimum component
//!   versions are taken from `Default`'s declarations only.
//! - Any other feature set enables exactly the gates in its enabled list and disables
//!   every other known gate.
//! - An enabled gate that requires a minimum component version is moved to disabled
//!   when the component has no observed version, or the observed version is lower.

use super::catalog::{FeatureGateDescription, FeatureSetCatalog};
use super::errors::ResolveError;
use crate::constants::{FEATURE_SET_CUSTOM, FEATURE_SET_DEFAULT, MINIMUM_COMPONENT_KUBELET};
use crate::crd::{
    CustomFeatureGates, FeatureGateDetails, FeatureGateSpec, MinimumComponentVersion, NodeConfig,
};
use semver::Version;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Observed minimum version per component identifier (e.g. `Kubelet` -> `1.30.0`).
pub type MinimumComponentVersions = BTreeMap<String, String>;

/// The resolved partition of all known gates, both lists sorted by name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedFeatureGates {
    /// Gates switched on, with every minimum component version they require
    pub enabled: Vec<FeatureGateDescription>,
    /// Every other known gate, including enabled gates whose requirements are unmet
    pub disabled: Vec<FeatureGateDescription>,
}

impl ResolvedFeatureGates {
    /// Names of the enabled gates, in order.
    #[must_use]
    pub fn enabled_names(&self) -> Vec<&str> {
        self.enabled.iter().map(|gate| gate.name.as_str()).collect()
    }

    /// Names of the disabled gates, in order.
    #[must_use]
    pub fn disabled_names(&self) -> Vec<&str> {
        self.disabled.iter().map(|gate| gate.name.as_str()).collect()
    }

    /// Attach a release version, producing the persisted snapshot shape.
    #[must_use]
    pub fn into_details(self, version: impl Into<String>) -> FeatureGateDetails {
        FeatureGateDetails {
            version: version.into(),
            enabled: self.enabled,
            disabled: self.disabled,
        }
    }
}

/// Normalise a `spec.featureSet` value; the empty string selects `Default`.
#[must_use]
pub fn effective_feature_set(feature_set: &str) -> &str {
    if feature_set.is_empty() {
        FEATURE_SET_DEFAULT
    } else {
        feature_set
    }
}

/// Resolve `feature_set` into the complete, sorted enabled/disabled partition.
///
/// `custom` is only consulted for `CustomNoUpgrade`; `None` there behaves like empty
/// override lists.
///
/// # Errors
///
/// - [`ResolveError::ConflictingOverride`] when the custom selection enables and
///   disables the same gate
/// - [`ResolveError::FeatureSetNotFound`] when the feature set is not in the catalog
/// - [`ResolveError::InvalidObservedVersion`] when an observed component version is
///   not a semantic version
pub fn resolve(
    catalog: &FeatureSetCatalog,
    feature_set: &str,
    custom: Option<&CustomFeatureGates>,
    current_minimum_versions: &MinimumComponentVersions,
) -> Result<ResolvedFeatureGates, ResolveError> {
    let feature_set = effective_feature_set(feature_set);

    let (enabled, disabled) = if feature_set == FEATURE_SET_CUSTOM {
        classify_custom(catalog, custom)?
    } else {
        classify(catalog, feature_set)?
    };

    let mut resolved = ResolvedFeatureGates::default();
    for gate in enabled.into_values() {
        if let Some(reason) = unmet_requirement(&gate, current_minimum_versions)? {
            debug!(feature = %gate.name, %reason, "Disabling feature gate");
            resolved.disabled.push(gate);
        } else {
            resolved.enabled.push(gate);
        }
    }
    resolved.disabled.extend(disabled.into_values());
    resolved.disabled.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(resolved)
}

/// Resolve the cluster's `FeatureGate` spec into the snapshot for `version`.
///
/// # Errors
///
/// See [`resolve`].
pub fn resolve_snapshot(
    catalog: &FeatureSetCatalog,
    spec: &FeatureGateSpec,
    version: &str,
    current_minimum_versions: &MinimumComponentVersions,
) -> Result<FeatureGateDetails, ResolveError> {
    resolve(
        catalog,
        &spec.feature_set,
        spec.custom_no_upgrade.as_ref(),
        current_minimum_versions,
    )
    .map(|resolved| resolved.into_details(version))
}

/// Extract the observed minimum component versions from the cluster `Node` config.
///
/// A missing object or an empty `minimumKubeletVersion` yields an empty map.
#[must_use]
pub fn current_minimum_versions(node_config: Option<&NodeConfig>) -> MinimumComponentVersions {
    let mut versions = MinimumComponentVersions::new();
    if let Some(kubelet) = node_config
        .map(|node| node.spec.minimum_kubelet_version.as_str())
        .filter(|version| !version.is_empty())
    {
        versions.insert(MINIMUM_COMPONENT_KUBELET.to_string(), kubelet.to_string());
    }
    versions
}

type Classified = BTreeMap<String, FeatureGateDescription>;

fn classify(
    catalog: &FeatureSetCatalog,
    feature_set: &str,
) -> Result<(Classified, Classified), ResolveError> {
    let policy = catalog
        .feature_set(feature_set)
        .ok_or_else(|| ResolveError::FeatureSetNotFound {
            feature_set: feature_set.to_string(),
        })?;

    let requirements = catalog.minimum_versions(feature_set);
    let specifically_enabled: BTreeSet<&str> =
        policy.enabled.iter().map(|gate| gate.name.as_str()).collect();

    let mut enabled = Classified::new();
    let mut disabled = Classified::new();
    for name in catalog.known_feature_names() {
        let gate = described(name, requirements.get(name).copied());
        if specifically_enabled.contains(name) {
            enabled.insert(name.to_string(), gate);
        } else {
            disabled.insert(name.to_string(), gate);
        }
    }

    Ok((enabled, disabled))
}

fn classify_custom(
    catalog: &FeatureSetCatalog,
    custom: Option<&CustomFeatureGates>,
) -> Result<(Classified, Classified), ResolveError> {
    let empty = CustomFeatureGates::default();
    let custom = custom.unwrap_or(&empty);

    let force_enabled = override_names(&custom.enabled);
    let force_disabled = override_names(&custom.disabled);

    if let Some(feature) = force_enabled.intersection(&force_disabled).next() {
        return Err(ResolveError::ConflictingOverride {
            feature: (*feature).to_string(),
        });
    }

    let default_policy = catalog.feature_set(FEATURE_SET_DEFAULT);
    let default_enabled: BTreeSet<&str> = default_policy
        .map(|policy| policy.enabled.iter().map(|gate| gate.name.as_str()).collect())
        .unwrap_or_default();
    // Requirements declared by other feature sets do not apply to a custom selection.
    let requirements: BTreeMap<&str, &[MinimumComponentVersion]> = default_policy
        .into_iter()
        .flat_map(|policy| policy.descriptions())
        .map(|gate| {
            (
                gate.name.as_str(),
                gate.required_minimum_component_versions.as_slice(),
            )
        })
        .collect();

    // Forced names may be unknown to the catalog; they are still reported.
    let names: BTreeSet<&str> = catalog
        .known_feature_names()
        .into_iter()
        .chain(force_enabled.iter().copied())
        .chain(force_disabled.iter().copied())
        .collect();

    let mut enabled = Classified::new();
    let mut disabled = Classified::new();
    for name in names {
        let gate = described(name, requirements.get(name).copied());
        let on = force_enabled.contains(name)
            || (default_enabled.contains(name) && !force_disabled.contains(name));
        if on {
            enabled.insert(name.to_string(), gate);
        } else {
            disabled.insert(name.to_string(), gate);
        }
    }

    Ok((enabled, disabled))
}

fn override_names(names: &[String]) -> BTreeSet<&str> {
    names
        .iter()
        .map(String::as_str)
        .filter(|name| !name.is_empty())
        .collect()
}

fn described(
    name: &str,
    requirements: Option<&[MinimumComponentVersion]>,
) -> FeatureGateDescription {
    FeatureGateDescription {
        name: name.to_string(),
        required_minimum_component_versions: requirements.map(<[_]>::to_vec).unwrap_or_default(),
    }
}

/// Return why `gate` cannot be enabled, or `None` when every requirement is met.
pub(super) fn unmet_requirement(
    gate: &FeatureGateDescription,
    current_minimum_versions: &MinimumComponentVersions,
) -> Result<Option<String>, ResolveError> {
    for requirement in &gate.required_minimum_component_versions {
        let observed = match current_minimum_versions.get(&requirement.component) {
            Some(observed) if !observed.is_empty() => observed,
            _ => {
                return Ok(Some(format!(
                    "no observed minimum {} version",
                    requirement.component
                )))
            }
        };

        // The catalog builder validates required versions; anything else stays off.
        let Ok(required) = Version::parse(&requirement.version) else {
            return Ok(Some(format!(
                "required minimum {} version {:?} does not parse",
                requirement.component, requirement.version
            )));
        };
        let current = Version::parse(observed).map_err(|e| ResolveError::InvalidObservedVersion {
            feature: gate.name.clone(),
            component: requirement.component.clone(),
            version: observed.clone(),
            reason: e.to_string(),
        })?;

        if compare_precedence(&current, &required) == Ordering::Less {
            return Ok(Some(format!(
                "observed minimum {} version {observed} is below required {}",
                requirement.component, requirement.version
            )));
        }
    }

    Ok(None)
}

/// Semantic version precedence; build metadata does not participate.
fn compare_precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch, &a.pre).cmp(&(b.major, b.minor, b.patch, &b.pre))
}

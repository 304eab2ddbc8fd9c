// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The immutable table of feature sets known to this operator.
//!
//! A [`FeatureSetCatalog`] maps a feature set name (e.g. `Default`,
//! `TechPreviewNoUpgrade`) to the gates it force-enables and force-disables. It is
//! built once at startup through [`FeatureSetCatalogBuilder`], which validates every
//! entry, and is shared read-only afterwards.
//!
//! # Example
//!
//! ```rust
//! use clustercfg::crd::FeatureGateAttributes;
//! use clustercfg::featuregates::{FeatureSetCatalog, FeatureSetPolicy};
//!
//! let catalog = FeatureSetCatalog::builder()
//!     .feature_set(
//!         "Default",
//!         FeatureSetPolicy::new(
//!             vec![FeatureGateAttributes::named("OpenShiftPodSecurityAdmission")],
//!             vec![FeatureGateAttributes::named("NodeSwap")
//!                 .with_minimum_version("Kubelet", "1.30.0")],
//!         ),
//!     )
//!     .build()
//!     .expect("valid catalog");
//!
//! assert_eq!(catalog.known_feature_names().len(), 2);
//! ```

use super::errors::CatalogError;
use crate::crd::{FeatureGateAttributes, MinimumComponentVersion};
use std::collections::{BTreeMap, BTreeSet};

/// A feature gate as declared by a feature set: its name plus any minimum component
/// versions it requires.
pub type FeatureGateDescription = FeatureGateAttributes;

/// The gates one feature set switches on and off.
///
/// A gate never appears in both lists; [`FeatureSetCatalogBuilder::build`] enforces it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeatureSetPolicy {
    /// Gates this feature set enables
    pub enabled: Vec<FeatureGateDescription>,
    /// Gates this feature set disables
    pub disabled: Vec<FeatureGateDescription>,
}

impl FeatureSetPolicy {
    /// Create a policy from its enabled and disabled lists.
    #[must_use]
    pub fn new(
        enabled: Vec<FeatureGateDescription>,
        disabled: Vec<FeatureGateDescription>,
    ) -> Self {
        Self { enabled, disabled }
    }

    /// Iterate every gate declared by this policy, enabled first.
    pub fn descriptions(&self) -> impl Iterator<Item = &FeatureGateDescription> {
        self.enabled.iter().chain(self.disabled.iter())
    }

    fn validate(&self, feature_set: &str) -> Result<(), CatalogError> {
        let enabled = unique_names(feature_set, &self.enabled, "enabled")?;
        let disabled = unique_names(feature_set, &self.disabled, "disabled")?;

        if let Some(feature) = enabled.intersection(&disabled).next() {
            return Err(CatalogError::ConflictingFeature {
                feature_set: feature_set.to_string(),
                feature: (*feature).to_string(),
            });
        }

        for description in self.descriptions() {
            for requirement in &description.required_minimum_component_versions {
                validate_requirement(feature_set, &description.name, requirement)?;
            }
        }

        Ok(())
    }
}

fn unique_names<'a>(
    feature_set: &str,
    descriptions: &'a [FeatureGateDescription],
    list: &'static str,
) -> Result<BTreeSet<&'a str>, CatalogError> {
    let mut names = BTreeSet::new();
    for description in descriptions {
        if !names.insert(description.name.as_str()) {
            return Err(CatalogError::DuplicateFeature {
                feature_set: feature_set.to_string(),
                feature: description.name.clone(),
                list,
            });
        }
    }
    Ok(names)
}

fn validate_requirement(
    feature_set: &str,
    feature: &str,
    requirement: &MinimumComponentVersion,
) -> Result<(), CatalogError> {
    if requirement.component.is_empty() {
        return Err(CatalogError::MissingComponent {
            feature_set: feature_set.to_string(),
            feature: feature.to_string(),
        });
    }

    semver::Version::parse(&requirement.version).map_err(|e| {
        CatalogError::InvalidRequiredVersion {
            feature_set: feature_set.to_string(),
            feature: feature.to_string(),
            component: requirement.component.clone(),
            version: requirement.version.clone(),
            reason: e.to_string(),
        }
    })?;

    Ok(())
}

/// Validated, immutable mapping from feature set name to [`FeatureSetPolicy`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeatureSetCatalog {
    feature_sets: BTreeMap<String, FeatureSetPolicy>,
}

impl FeatureSetCatalog {
    /// Start building a catalog.
    #[must_use]
    pub fn builder() -> FeatureSetCatalogBuilder {
        FeatureSetCatalogBuilder::default()
    }

    /// Look up a feature set by name.
    #[must_use]
    pub fn feature_set(&self, name: &str) -> Option<&FeatureSetPolicy> {
        self.feature_sets.get(name)
    }

    /// Iterate all feature sets in name order.
    pub fn feature_sets(&self) -> impl Iterator<Item = (&str, &FeatureSetPolicy)> {
        self.feature_sets
            .iter()
            .map(|(name, policy)| (name.as_str(), policy))
    }

    /// Number of feature sets in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.feature_sets.len()
    }

    /// Whether the catalog holds no feature sets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.feature_sets.is_empty()
    }

    /// Every gate name mentioned by any feature set, in either list.
    #[must_use]
    pub fn known_feature_names(&self) -> BTreeSet<&str> {
        self.feature_sets
            .values()
            .flat_map(FeatureSetPolicy::descriptions)
            .map(|description| description.name.as_str())
            .collect()
    }

    /// Minimum component version requirements for every gate that declares any.
    ///
    /// Declarations from `preferred` win; other gates take the declaration of the
    /// first feature set (in name order) that carries one.
    #[must_use]
    pub fn minimum_versions(&self, preferred: &str) -> BTreeMap<&str, &[MinimumComponentVersion]> {
        let mut requirements = BTreeMap::new();
        let preferred_first = self
            .feature_sets
            .get(preferred)
            .into_iter()
            .chain(self.feature_sets.values());

        for policy in preferred_first {
            for description in policy.descriptions() {
                if description.required_minimum_component_versions.is_empty() {
                    continue;
                }
                requirements
                    .entry(description.name.as_str())
                    .or_insert(description.required_minimum_component_versions.as_slice());
            }
        }

        requirements
    }
}

/// Collects feature sets and validates them into a [`FeatureSetCatalog`].
#[derive(Debug, Default)]
pub struct FeatureSetCatalogBuilder {
    feature_sets: Vec<(String, FeatureSetPolicy)>,
}

impl FeatureSetCatalogBuilder {
    /// Register a feature set.
    #[must_use]
    pub fn feature_set(mut self, name: impl Into<String>, policy: FeatureSetPolicy) -> Self {
        self.feature_sets.push((name.into(), policy));
        self
    }

    /// Validate every registered feature set and freeze the catalog.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] for duplicate feature sets, duplicate or conflicting
    /// gates within a feature set, or malformed minimum version requirements.
    pub fn build(self) -> Result<FeatureSetCatalog, CatalogError> {
        let mut feature_sets = BTreeMap::new();

        for (name, policy) in self.feature_sets {
            policy.validate(&name)?;
            if feature_sets.contains_key(&name) {
                return Err(CatalogError::DuplicateFeatureSet { feature_set: name });
            }
            feature_sets.insert(name, policy);
        }

        Ok(FeatureSetCatalog { feature_sets })
    }
}

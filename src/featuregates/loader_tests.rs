// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `loader.rs`

#[cfg(test)]
mod tests {
    use super::super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const DEFAULT_MANIFEST: &str = r"
apiVersion: config.openshift.io/v1
kind: FeatureGate
metadata:
  name: cluster
spec: {}
status:
  featureGates:
    - version: 4.15.0
      enabled:
        - name: Stale
      disabled: []
    - version: 4.16.0
      enabled:
        - name: OpenShiftPodSecurityAdmission
      disabled:
        - name: NodeSwap
          requiredMinimumComponentVersions:
            - component: Kubelet
              version: 1.30.0
";

    const TECH_PREVIEW_MANIFEST: &str = r"
apiVersion: config.openshift.io/v1
kind: FeatureGate
metadata:
  name: cluster
  annotations:
    include.release.openshift.io/self-managed-high-availability: false-except-for-the-config-operator
spec:
  featureSet: TechPreviewNoUpgrade
status:
  featureGates:
    - version: 4.16.0
      enabled:
        - name: NodeSwap
          requiredMinimumComponentVersions:
            - component: Kubelet
              version: 1.30.0
        - name: OpenShiftPodSecurityAdmission
      disabled: []
";

    const HYPERSHIFT_MANIFEST: &str = r"
apiVersion: config.openshift.io/v1
kind: FeatureGate
metadata:
  name: cluster
  annotations:
    include.release.openshift.io/ibm-cloud-managed: false-except-for-the-config-operator
spec:
  featureSet: TechPreviewNoUpgrade
status:
  featureGates:
    - version: 4.16.0
      enabled:
        - name: HostedOnly
      disabled: []
";

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn manifest_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "default.yaml", DEFAULT_MANIFEST);
        write(dir.path(), "nested/techpreview-self-managed.yaml", TECH_PREVIEW_MANIFEST);
        write(dir.path(), "nested/techpreview-hypershift.yaml", HYPERSHIFT_MANIFEST);
        dir
    }

    #[test]
    fn test_cluster_profile_for_topology() {
        assert_eq!(
            cluster_profile_for_topology(Some("External")),
            "ibm-cloud-managed"
        );
        assert_eq!(
            cluster_profile_for_topology(Some("HighlyAvailable")),
            "self-managed-high-availability"
        );
        assert_eq!(
            cluster_profile_for_topology(None),
            "self-managed-high-availability"
        );
    }

    #[test]
    fn test_load_self_managed_catalog() {
        let dir = manifest_dir();

        let catalog =
            load_catalog_from_dir(dir.path(), "4.16.0", "self-managed-high-availability").unwrap();

        assert_eq!(catalog.len(), 2);
        let default = catalog.feature_set("Default").unwrap();
        assert_eq!(default.enabled[0].name, "OpenShiftPodSecurityAdmission");
        assert_eq!(
            default.disabled[0].required_minimum_component_versions[0].version,
            "1.30.0"
        );

        let tech_preview = catalog.feature_set("TechPreviewNoUpgrade").unwrap();
        let names: Vec<&str> = tech_preview.enabled.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["NodeSwap", "OpenShiftPodSecurityAdmission"]);
    }

    #[test]
    fn test_load_external_profile_catalog() {
        let dir = manifest_dir();

        let catalog = load_catalog_from_dir(dir.path(), "4.16.0", "ibm-cloud-managed").unwrap();

        let tech_preview = catalog.feature_set("TechPreviewNoUpgrade").unwrap();
        assert_eq!(tech_preview.enabled[0].name, "HostedOnly");
    }

    #[test]
    fn test_unknown_operator_version_yields_empty_policies() {
        let dir = manifest_dir();

        let catalog =
            load_catalog_from_dir(dir.path(), "9.9.9", "self-managed-high-availability").unwrap();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.known_feature_names().is_empty());
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = TempDir::new().unwrap();

        let result = load_catalog_from_dir(dir.path(), "4.16.0", "self-managed-high-availability");

        assert!(matches!(result, Err(CatalogError::NoManifests { .. })));
    }

    #[test]
    fn test_non_feature_gate_file_is_an_error() {
        let dir = manifest_dir();
        write(
            dir.path(),
            "configmap.yaml",
            "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: other\n",
        );

        let result = load_catalog_from_dir(dir.path(), "4.16.0", "self-managed-high-availability");

        match result {
            Err(CatalogError::InvalidManifest { path, .. }) => {
                assert!(path.ends_with("configmap.yaml"));
            }
            other => panic!("expected InvalidManifest, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("absent");

        let result = load_catalog_from_dir(&missing, "4.16.0", "self-managed-high-availability");

        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }

    #[test]
    fn test_parse_feature_gate_ignores_other_kinds() {
        let parsed = parse_feature_gate("apiVersion: v1\nkind: Secret\n").unwrap();
        assert!(parsed.is_none());

        let parsed = parse_feature_gate(TECH_PREVIEW_MANIFEST).unwrap().unwrap();
        assert_eq!(parsed.spec.feature_set, "TechPreviewNoUpgrade");

        assert!(parse_feature_gate("kind: [unterminated").is_err());
    }
}

// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

#[cfg(test)]
mod tests {
    use crate::crd::*;
    use kube::{CustomResourceExt, Resource};

    #[test]
    fn test_feature_gate_deserializes_cluster_manifest() {
        let yaml = r"
apiVersion: config.openshift.io/v1
kind: FeatureGate
metadata:
  name: cluster
spec:
  featureSet: CustomNoUpgrade
  customNoUpgrade:
    enabled: [NodeSwap]
    disabled: [EventedPLEG]
status:
  featureGates:
    - version: 4.16.0
      enabled:
        - name: NodeSwap
          requiredMinimumComponentVersions:
            - component: Kubelet
              version: 1.30.0
      disabled:
        - name: EventedPLEG
";
        let fg: FeatureGate = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(fg.spec.feature_set, "CustomNoUpgrade");
        let custom = fg.spec.custom_no_upgrade.unwrap();
        assert_eq!(custom.enabled, vec!["NodeSwap"]);
        assert_eq!(custom.disabled, vec!["EventedPLEG"]);

        let details = &fg.status.unwrap().feature_gates[0];
        assert_eq!(details.version, "4.16.0");
        assert_eq!(
            details.enabled[0].required_minimum_component_versions,
            vec![MinimumComponentVersion {
                component: "Kubelet".into(),
                version: "1.30.0".into(),
            }]
        );
        assert!(details.disabled[0]
            .required_minimum_component_versions
            .is_empty());
    }

    #[test]
    fn test_feature_gate_empty_spec_means_default() {
        let fg: FeatureGate = serde_yaml::from_str(
            "apiVersion: config.openshift.io/v1\nkind: FeatureGate\nmetadata:\n  name: cluster\nspec: {}\n",
        )
        .unwrap();

        assert_eq!(fg.spec.feature_set, "");
        assert!(fg.spec.custom_no_upgrade.is_none());
        assert!(fg.status.is_none());
    }

    #[test]
    fn test_attributes_without_requirements_omit_field() {
        let json = serde_json::to_value(FeatureGateAttributes::named("Five")).unwrap();

        assert_eq!(json, serde_json::json!({ "name": "Five" }));
    }

    #[test]
    fn test_attributes_with_minimum_version() {
        let attrs = FeatureGateAttributes::named("NodeSwap")
            .with_minimum_version("Kubelet", "1.30.0")
            .with_minimum_version("Kubelet", "1.31.0");

        assert_eq!(attrs.required_minimum_component_versions.len(), 2);
        assert_eq!(attrs.required_minimum_component_versions[1].version, "1.31.0");
    }

    #[test]
    fn test_cluster_version_history_and_cluster_id() {
        let json = serde_json::json!({
            "apiVersion": "config.openshift.io/v1",
            "kind": "ClusterVersion",
            "metadata": { "name": "version" },
            "spec": { "clusterID": "c0ffee" },
            "status": {
                "history": [
                    { "version": "4.16.0", "state": "Partial" },
                    { "version": "4.15.3", "state": "Completed", "image": "quay.io/x@sha256:1" }
                ]
            }
        });

        let cv: ClusterVersion = serde_json::from_value(json).unwrap();

        assert_eq!(cv.spec.cluster_id.as_deref(), Some("c0ffee"));
        let versions: Vec<&str> = cv
            .status
            .as_ref()
            .unwrap()
            .history
            .iter()
            .map(|h| h.version.as_str())
            .collect();
        assert_eq!(versions, vec!["4.16.0", "4.15.3"]);
    }

    #[test]
    fn test_node_config_minimum_kubelet_version() {
        let node: NodeConfig = serde_json::from_value(serde_json::json!({
            "apiVersion": "config.openshift.io/v1",
            "kind": "Node",
            "metadata": { "name": "cluster" },
            "spec": { "minimumKubeletVersion": "1.30.0" }
        }))
        .unwrap();

        assert_eq!(node.spec.minimum_kubelet_version, "1.30.0");
    }

    #[test]
    fn test_infrastructure_topology() {
        let infra: Infrastructure = serde_json::from_value(serde_json::json!({
            "apiVersion": "config.openshift.io/v1",
            "kind": "Infrastructure",
            "metadata": { "name": "cluster" },
            "spec": {},
            "status": { "controlPlaneTopology": "External" }
        }))
        .unwrap();

        assert_eq!(
            infra.status.unwrap().control_plane_topology.as_deref(),
            Some("External")
        );
    }

    #[test]
    fn test_condition_uses_camel_case() {
        let condition = Condition {
            r#type: "Degraded".into(),
            status: "False".into(),
            reason: Some("AsExpected".into()),
            message: None,
            last_transition_time: Some("2025-01-01T00:00:00Z".into()),
        };

        let json = serde_json::to_value(&condition).unwrap();

        assert_eq!(json["type"], "Degraded");
        assert_eq!(json["lastTransitionTime"], "2025-01-01T00:00:00Z");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_resources_are_cluster_scoped_in_config_group() {
        assert_eq!(FeatureGate::group(&()), "config.openshift.io");
        assert_eq!(FeatureGate::kind(&()), "FeatureGate");
        assert_eq!(NodeConfig::kind(&()), "Node");
        assert_eq!(FeatureGate::crd().spec.scope, "Cluster");
        assert_eq!(ClusterOperator::crd().spec.scope, "Cluster");
    }
}

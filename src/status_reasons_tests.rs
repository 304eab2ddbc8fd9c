// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `status_reasons.rs`

#[cfg(test)]
mod tests {
    use crate::status_reasons::*;

    #[test]
    fn test_degraded_condition_type() {
        assert_eq!(
            degraded_condition_type("FeatureGateController"),
            "FeatureGateControllerDegraded"
        );
        assert_eq!(
            degraded_condition_type("LatencySensitiveRemovalController"),
            "LatencySensitiveRemovalControllerDegraded"
        );
    }

    #[test]
    fn test_degraded_controller_round_trips() {
        let condition_type = degraded_condition_type("FeatureGateController");
        assert_eq!(
            degraded_controller(&condition_type),
            Some("FeatureGateController")
        );
    }

    #[test]
    fn test_degraded_controller_rejects_aggregate_and_others() {
        assert_eq!(degraded_controller(CONDITION_TYPE_DEGRADED), None);
        assert_eq!(degraded_controller(CONDITION_TYPE_AVAILABLE), None);
        assert_eq!(degraded_controller("Upgradeable"), None);
    }

    #[test]
    fn test_reason_values_are_pascal_case() {
        for reason in [REASON_AS_EXPECTED, REASON_SYNC_ERROR] {
            assert!(reason.chars().next().is_some_and(char::is_uppercase));
            assert!(!reason.contains(' '));
        }
    }
}

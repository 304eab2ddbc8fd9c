// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Unit tests for `status.rs`

#[cfg(test)]
mod tests {
    use crate::crd::Condition;
    use crate::reconcilers::status::{
        conditions_equal, create_condition, find_condition, update_condition_in_memory,
    };

    const CONDITION_TYPE_DEGRADED: &str = "FeatureGateControllerDegraded";
    const STATUS_TRUE: &str = "True";
    const STATUS_FALSE: &str = "False";

    #[test]
    fn test_create_condition_basic() {
        let condition = create_condition(CONDITION_TYPE_DEGRADED, STATUS_FALSE, "AsExpected", "");

        assert_eq!(condition.r#type, CONDITION_TYPE_DEGRADED);
        assert_eq!(condition.status, STATUS_FALSE);
        assert_eq!(condition.reason, Some("AsExpected".to_string()));
        assert_eq!(condition.message, Some(String::new()));
        assert!(condition.last_transition_time.is_some());
    }

    #[test]
    fn test_find_condition() {
        let conditions = vec![
            create_condition("Available", STATUS_TRUE, "AsExpected", ""),
            create_condition(CONDITION_TYPE_DEGRADED, STATUS_TRUE, "SyncError", "boom"),
        ];

        let found = find_condition(&conditions, CONDITION_TYPE_DEGRADED).unwrap();
        assert_eq!(found.message.as_deref(), Some("boom"));
        assert!(find_condition(&conditions, "Progressing").is_none());
    }

    #[test]
    fn test_update_condition_adds_missing() {
        let mut conditions = Vec::new();

        update_condition_in_memory(&mut conditions, "Available", STATUS_TRUE, "AsExpected", "");

        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].r#type, "Available");
    }

    #[test]
    fn test_update_condition_preserves_time_when_status_unchanged() {
        let mut conditions = vec![Condition {
            r#type: CONDITION_TYPE_DEGRADED.to_string(),
            status: STATUS_TRUE.to_string(),
            reason: Some("SyncError".to_string()),
            message: Some("first".to_string()),
            last_transition_time: Some("2025-01-01T00:00:00+00:00".to_string()),
        }];

        update_condition_in_memory(
            &mut conditions,
            CONDITION_TYPE_DEGRADED,
            STATUS_TRUE,
            "SyncError",
            "second",
        );

        assert_eq!(conditions[0].message.as_deref(), Some("second"));
        assert_eq!(
            conditions[0].last_transition_time.as_deref(),
            Some("2025-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn test_update_condition_resets_time_on_status_change() {
        let mut conditions = vec![Condition {
            r#type: CONDITION_TYPE_DEGRADED.to_string(),
            status: STATUS_TRUE.to_string(),
            reason: Some("SyncError".to_string()),
            message: Some("boom".to_string()),
            last_transition_time: Some("2025-01-01T00:00:00+00:00".to_string()),
        }];

        update_condition_in_memory(
            &mut conditions,
            CONDITION_TYPE_DEGRADED,
            STATUS_FALSE,
            "AsExpected",
            "",
        );

        assert_eq!(conditions[0].status, STATUS_FALSE);
        assert_ne!(
            conditions[0].last_transition_time.as_deref(),
            Some("2025-01-01T00:00:00+00:00")
        );
    }

    #[test]
    fn test_conditions_equal_ignores_transition_time() {
        let mut a = create_condition("Available", STATUS_TRUE, "AsExpected", "");
        let mut b = a.clone();
        a.last_transition_time = Some("2025-01-01T00:00:00+00:00".to_string());
        b.last_transition_time = Some("2026-01-01T00:00:00+00:00".to_string());

        assert!(conditions_equal(&[a.clone()], &[b]));
        assert!(!conditions_equal(&[a.clone()], &[]));

        let changed = create_condition("Available", STATUS_FALSE, "AsExpected", "");
        assert!(!conditions_equal(&[a], &[changed]));
    }
}

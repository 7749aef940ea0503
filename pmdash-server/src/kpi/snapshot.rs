//! KPI snapshot builder
//!
//! Turns a stored [`ProjectKpi`] into the fixed eleven-field record the
//! classifier consumes. Pure and total: every missing or unusable value
//! collapses to its documented default.

use pmdash_common::db::{PriorityLevel, ProjectKpi};
use serde::{Deserialize, Serialize};

/// Ordinal sent for a priority that is missing or not recognised
pub const DEFAULT_PRIORITY_ORDINAL: u8 = 2;

/// Normalized metrics handed to the classifier
///
/// Field names match the classifier's request body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiSnapshot {
    pub completion_percentage: f64,
    pub milestone_completion: f64,
    pub budget_utilization: f64,
    pub schedule_variance: f64,
    pub overdue_tasks: u64,
    pub alert_count: u64,
    pub avg_task_completion_time: f64,
    pub employee_workload_index: f64,
    /// High = 1, Medium = 2, Low = 3
    pub customer_priority_level: u8,
    pub reopened_tasks: u64,
    pub risk_flag: bool,
}

impl KpiSnapshot {
    /// Build the snapshot from a loaded KPI record
    pub fn from_record(record: &ProjectKpi) -> Self {
        Self {
            completion_percentage: finite_or_zero(record.completion_percentage),
            milestone_completion: finite_or_zero(record.milestone_completion),
            budget_utilization: finite_or_zero(record.budget_utilization),
            schedule_variance: finite_or_zero(record.schedule_variance),
            overdue_tasks: count_or_zero(record.overdue_tasks),
            alert_count: count_or_zero(record.alert_count),
            avg_task_completion_time: finite_or_zero(record.avg_task_completion_time),
            employee_workload_index: finite_or_zero(record.employee_workload_index),
            customer_priority_level: priority_ordinal(record.customer_priority_level.as_deref()),
            reopened_tasks: count_or_zero(record.reopened_tasks),
            risk_flag: record.risk_flag.unwrap_or(false),
        }
    }
}

impl From<&ProjectKpi> for KpiSnapshot {
    fn from(record: &ProjectKpi) -> Self {
        Self::from_record(record)
    }
}

/// Map a stored priority literal to the classifier's ordinal.
///
/// Never fails: anything other than the exact literals `High`, `Medium`
/// or `Low` is treated as Medium.
pub fn priority_ordinal(level: Option<&str>) -> u8 {
    match level.and_then(PriorityLevel::from_db) {
        Some(PriorityLevel::High) => 1,
        Some(PriorityLevel::Medium) => 2,
        Some(PriorityLevel::Low) => 3,
        None => DEFAULT_PRIORITY_ORDINAL,
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

fn count_or_zero(value: Option<i64>) -> u64 {
    value.map(|v| v.max(0) as u64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pmdash_common::db::KpiClass;

    fn empty_record() -> ProjectKpi {
        ProjectKpi {
            kpi_id: 1,
            project_id: 10,
            completion_percentage: None,
            milestone_completion: None,
            budget_utilization: None,
            schedule_variance: None,
            overdue_tasks: None,
            alert_count: None,
            avg_task_completion_time: None,
            employee_workload_index: None,
            customer_priority_level: None,
            reopened_tasks: None,
            risk_flag: None,
            kpi_class: KpiClass::Medium,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_priority_mapping_is_total() {
        assert_eq!(priority_ordinal(Some("High")), 1);
        assert_eq!(priority_ordinal(Some("Medium")), 2);
        assert_eq!(priority_ordinal(Some("Low")), 3);

        for unknown in ["", "high", "Urgent", "LOW ", "3"] {
            assert_eq!(priority_ordinal(Some(unknown)), 2, "input {:?}", unknown);
        }
        assert_eq!(priority_ordinal(None), 2);
    }

    #[test]
    fn test_absent_fields_coerce_to_defaults() {
        let snapshot = KpiSnapshot::from_record(&empty_record());

        assert_eq!(snapshot.completion_percentage, 0.0);
        assert_eq!(snapshot.milestone_completion, 0.0);
        assert_eq!(snapshot.budget_utilization, 0.0);
        assert_eq!(snapshot.schedule_variance, 0.0);
        assert_eq!(snapshot.overdue_tasks, 0);
        assert_eq!(snapshot.alert_count, 0);
        assert_eq!(snapshot.avg_task_completion_time, 0.0);
        assert_eq!(snapshot.employee_workload_index, 0.0);
        assert_eq!(snapshot.customer_priority_level, 2);
        assert_eq!(snapshot.reopened_tasks, 0);
        assert!(!snapshot.risk_flag);
    }

    #[test]
    fn test_present_fields_carried_over() {
        let mut record = empty_record();
        record.completion_percentage = Some(80.0);
        record.schedule_variance = Some(-4.5);
        record.overdue_tasks = Some(2);
        record.alert_count = Some(7);
        record.customer_priority_level = Some("High".to_string());
        record.risk_flag = Some(true);

        let snapshot = KpiSnapshot::from(&record);

        assert_eq!(snapshot.completion_percentage, 80.0);
        assert_eq!(snapshot.schedule_variance, -4.5);
        assert_eq!(snapshot.overdue_tasks, 2);
        assert_eq!(snapshot.alert_count, 7);
        assert_eq!(snapshot.customer_priority_level, 1);
        assert!(snapshot.risk_flag);
    }

    #[test]
    fn test_non_finite_and_negative_values_clamped() {
        let mut record = empty_record();
        record.budget_utilization = Some(f64::NAN);
        record.employee_workload_index = Some(f64::INFINITY);
        record.reopened_tasks = Some(-3);

        let snapshot = KpiSnapshot::from_record(&record);

        assert_eq!(snapshot.budget_utilization, 0.0);
        assert_eq!(snapshot.employee_workload_index, 0.0);
        assert_eq!(snapshot.reopened_tasks, 0);
    }

    #[test]
    fn test_snapshot_wire_shape() {
        let snapshot = KpiSnapshot::from_record(&empty_record());
        let json = serde_json::to_value(snapshot).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 11);
        assert_eq!(json["customer_priority_level"], 2);
        assert_eq!(json["risk_flag"], false);
    }
}

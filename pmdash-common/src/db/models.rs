//! Database models
//!
//! Each entity has a stored record type plus `Create*`/`Update*` inputs.
//! Update inputs are partial: `None` leaves the stored value untouched.

use crate::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Closed set of literal values stored in a TEXT column
macro_rules! db_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Database / wire representation
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            /// Parse the exact stored literal
            pub fn from_db(s: &str) -> Option<Self> {
                match s {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

db_enum!(
    /// Project lifecycle status
    ProjectStatus {
        NotStarted => "Not Started",
        InProgress => "In Progress",
        Completed => "Completed",
        OnHold => "On Hold",
        Canceled => "Canceled",
    }
);

db_enum!(
    BudgetStatus {
        UnderBudget => "Under Budget",
        OnBudget => "On Budget",
        OverBudget => "Over Budget",
    }
);

db_enum!(
    TaskStatus {
        Pending => "Pending",
        InProgress => "In Progress",
        Completed => "Completed",
        Overdue => "Overdue",
    }
);

db_enum!(
    AlertType {
        Urgent => "Urgent",
        Warning => "Warning",
        Info => "Info",
    }
);

db_enum!(
    AlertStatus {
        Read => "Read",
        Unread => "Unread",
    }
);

db_enum!(
    /// Customer priority attached to a project KPI record
    PriorityLevel {
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
);

db_enum!(
    /// Risk/performance class assigned by the KPI classifier
    KpiClass {
        Low => "Low",
        Medium => "Medium",
        High => "High",
    }
);

impl Default for ProjectStatus {
    fn default() -> Self {
        ProjectStatus::NotStarted
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Pending
    }
}

impl Default for AlertStatus {
    fn default() -> Self {
        AlertStatus::Unread
    }
}

impl Default for PriorityLevel {
    fn default() -> Self {
        PriorityLevel::Medium
    }
}

impl Default for KpiClass {
    fn default() -> Self {
        KpiClass::Medium
    }
}

impl KpiClass {
    /// Parse a label produced outside our control (e.g. a model reply).
    ///
    /// Surrounding whitespace and letter case are ignored; anything that is
    /// not one of the three classes yields `None`.
    pub fn parse_label(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|class| class.as_str().eq_ignore_ascii_case(trimmed))
    }
}

// ============================================================================
// Customers
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub customer_id: i64,
    pub name: String,
    pub company: Option<String>,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomer {
    pub name: String,
    #[serde(default)]
    pub company: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CreateCustomer {
    pub fn validate(&self) -> Result<()> {
        validate_name("name", &self.name)?;
        validate_email(&self.email)
    }
}

impl UpdateCustomer {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

// ============================================================================
// Employees
// ============================================================================

/// Employee record. The password hash is stored but never sent back out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    pub employee_id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmployee {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl CreateEmployee {
    pub fn validate(&self) -> Result<()> {
        validate_name("name", &self.name)?;
        validate_email(&self.email)
    }
}

impl UpdateEmployee {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name("name", name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }
}

// ============================================================================
// Projects
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub project_id: i64,
    pub project_name: String,
    pub customer_id: i64,
    pub status: ProjectStatus,
    pub completion_percentage: Option<f64>,
    pub budget_total: Option<f64>,
    pub budget_used: Option<f64>,
    pub budget_status: Option<BudgetStatus>,
    pub start_date: Option<NaiveDate>,
    pub launch_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    pub project_name: String,
    pub customer_id: i64,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub completion_percentage: Option<f64>,
    #[serde(default)]
    pub budget_total: Option<f64>,
    #[serde(default)]
    pub budget_used: Option<f64>,
    #[serde(default)]
    pub budget_status: Option<BudgetStatus>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub launch_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    pub project_name: Option<String>,
    pub customer_id: Option<i64>,
    pub status: Option<ProjectStatus>,
    pub completion_percentage: Option<f64>,
    pub budget_total: Option<f64>,
    pub budget_used: Option<f64>,
    pub budget_status: Option<BudgetStatus>,
    pub start_date: Option<NaiveDate>,
    pub launch_date: Option<NaiveDate>,
}

impl CreateProject {
    pub fn validate(&self) -> Result<()> {
        validate_name("project_name", &self.project_name)?;
        validate_percentage("completion_percentage", self.completion_percentage)
    }
}

impl UpdateProject {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.project_name {
            validate_name("project_name", name)?;
        }
        validate_percentage("completion_percentage", self.completion_percentage)
    }
}

// ============================================================================
// Tasks
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub task_id: i64,
    pub project_id: i64,
    pub task_name: String,
    pub employee_id: Option<i64>,
    pub deadline: Option<NaiveDate>,
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub project_id: i64,
    pub task_name: String,
    #[serde(default)]
    pub employee_id: Option<i64>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    pub project_id: Option<i64>,
    pub task_name: Option<String>,
    pub employee_id: Option<i64>,
    pub deadline: Option<NaiveDate>,
    pub status: Option<TaskStatus>,
}

impl CreateTask {
    pub fn validate(&self) -> Result<()> {
        validate_name("task_name", &self.task_name)
    }
}

impl UpdateTask {
    pub fn validate(&self) -> Result<()> {
        match &self.task_name {
            Some(name) => validate_name("task_name", name),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Alerts
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub alert_id: i64,
    pub alert_type: AlertType,
    pub alert_source: String,
    pub project_id: Option<i64>,
    pub task_id: Option<i64>,
    pub message: Option<String>,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlert {
    pub alert_type: AlertType,
    pub alert_source: String,
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub task_id: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: AlertStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAlert {
    pub alert_type: Option<AlertType>,
    pub alert_source: Option<String>,
    pub project_id: Option<i64>,
    pub task_id: Option<i64>,
    pub message: Option<String>,
    pub status: Option<AlertStatus>,
}

impl CreateAlert {
    pub fn validate(&self) -> Result<()> {
        validate_name("alert_source", &self.alert_source)
    }
}

impl UpdateAlert {
    pub fn validate(&self) -> Result<()> {
        match &self.alert_source {
            Some(source) => validate_name("alert_source", source),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Budget history
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetHistory {
    pub history_id: i64,
    pub project_id: i64,
    /// Month in `YYYY-MM` form
    pub month: String,
    pub amount_used: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBudgetHistory {
    pub project_id: i64,
    pub month: String,
    pub amount_used: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBudgetHistory {
    pub project_id: Option<i64>,
    pub month: Option<String>,
    pub amount_used: Option<f64>,
}

impl CreateBudgetHistory {
    pub fn validate(&self) -> Result<()> {
        validate_month(&self.month)
    }
}

impl UpdateBudgetHistory {
    pub fn validate(&self) -> Result<()> {
        match &self.month {
            Some(month) => validate_month(month),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Project KPIs
// ============================================================================

/// Stored KPI record for a project
///
/// Metric fields mirror the nullable columns: rows written outside this
/// service may hold NULL. Readers that need concrete numbers (the KPI
/// snapshot) apply the documented defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectKpi {
    pub kpi_id: i64,
    pub project_id: i64,
    pub completion_percentage: Option<f64>,
    pub milestone_completion: Option<f64>,
    pub budget_utilization: Option<f64>,
    pub schedule_variance: Option<f64>,
    pub overdue_tasks: Option<i64>,
    pub alert_count: Option<i64>,
    pub avg_task_completion_time: Option<f64>,
    pub employee_workload_index: Option<f64>,
    /// Raw stored literal; see [`PriorityLevel`] for the accepted values
    pub customer_priority_level: Option<String>,
    pub reopened_tasks: Option<i64>,
    pub risk_flag: Option<bool>,
    pub kpi_class: KpiClass,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectKpi {
    pub project_id: i64,
    #[serde(default)]
    pub completion_percentage: f64,
    #[serde(default)]
    pub milestone_completion: f64,
    #[serde(default)]
    pub budget_utilization: f64,
    #[serde(default)]
    pub schedule_variance: f64,
    #[serde(default)]
    pub overdue_tasks: i64,
    #[serde(default)]
    pub alert_count: i64,
    #[serde(default)]
    pub avg_task_completion_time: f64,
    #[serde(default)]
    pub employee_workload_index: f64,
    #[serde(default)]
    pub customer_priority_level: PriorityLevel,
    #[serde(default)]
    pub reopened_tasks: i64,
    #[serde(default)]
    pub risk_flag: bool,
    #[serde(default)]
    pub kpi_class: KpiClass,
}

impl CreateProjectKpi {
    /// KPI input for `project_id` with every metric at its default
    pub fn for_project(project_id: i64) -> Self {
        Self {
            project_id,
            completion_percentage: 0.0,
            milestone_completion: 0.0,
            budget_utilization: 0.0,
            schedule_variance: 0.0,
            overdue_tasks: 0,
            alert_count: 0,
            avg_task_completion_time: 0.0,
            employee_workload_index: 0.0,
            customer_priority_level: PriorityLevel::default(),
            reopened_tasks: 0,
            risk_flag: false,
            kpi_class: KpiClass::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_count("overdue_tasks", Some(self.overdue_tasks))?;
        validate_count("alert_count", Some(self.alert_count))?;
        validate_count("reopened_tasks", Some(self.reopened_tasks))
    }
}

/// Partial KPI update. `project_id` and `kpi_id` are immutable and absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProjectKpi {
    pub completion_percentage: Option<f64>,
    pub milestone_completion: Option<f64>,
    pub budget_utilization: Option<f64>,
    pub schedule_variance: Option<f64>,
    pub overdue_tasks: Option<i64>,
    pub alert_count: Option<i64>,
    pub avg_task_completion_time: Option<f64>,
    pub employee_workload_index: Option<f64>,
    pub customer_priority_level: Option<PriorityLevel>,
    pub reopened_tasks: Option<i64>,
    pub risk_flag: Option<bool>,
    pub kpi_class: Option<KpiClass>,
}

impl UpdateProjectKpi {
    pub fn validate(&self) -> Result<()> {
        validate_count("overdue_tasks", self.overdue_tasks)?;
        validate_count("alert_count", self.alert_count)?;
        validate_count("reopened_tasks", self.reopened_tasks)
    }
}

// ============================================================================
// Validation helpers
// ============================================================================

fn validate_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Minimal address check: one `@` with something on both sides
pub fn validate_email(email: &str) -> Result<()> {
    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(Error::InvalidInput(format!("Invalid email address: {}", email))),
    }
}

/// Budget months are stored as `YYYY-MM`
pub fn validate_month(month: &str) -> Result<()> {
    let valid = month.len() == 7
        && NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").is_ok();
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "month must use YYYY-MM format, got {}",
            month
        )))
    }
}

fn validate_count(field: &str, value: Option<i64>) -> Result<()> {
    match value {
        Some(v) if v < 0 => Err(Error::InvalidInput(format!(
            "{} must not be negative",
            field
        ))),
        _ => Ok(()),
    }
}

fn validate_percentage(field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !(0.0..=100.0).contains(&v) => Err(Error::InvalidInput(format!(
            "{} must be between 0 and 100",
            field
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_literals_round_trip_through_db_form() {
        for status in ProjectStatus::ALL {
            assert_eq!(ProjectStatus::from_db(status.as_str()), Some(*status));
        }
        assert_eq!(ProjectStatus::from_db("not started"), None);
    }

    #[test]
    fn test_enum_serde_uses_literal_values() {
        let json = serde_json::to_string(&ProjectStatus::OnHold).unwrap();
        assert_eq!(json, "\"On Hold\"");

        let parsed: TaskStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(parsed, TaskStatus::InProgress);

        assert!(serde_json::from_str::<KpiClass>("\"Critical\"").is_err());
    }

    #[test]
    fn test_kpi_class_parse_label() {
        assert_eq!(KpiClass::parse_label("High"), Some(KpiClass::High));
        assert_eq!(KpiClass::parse_label("  low\n"), Some(KpiClass::Low));
        assert_eq!(KpiClass::parse_label("MEDIUM"), Some(KpiClass::Medium));
        assert_eq!(KpiClass::parse_label(""), None);
        assert_eq!(KpiClass::parse_label("Very High"), None);
        assert_eq!(KpiClass::parse_label("High."), None);
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("pm@example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
        assert!(validate_email("a@b@c").is_err());
    }

    #[test]
    fn test_validate_month() {
        assert!(validate_month("2024-03").is_ok());
        assert!(validate_month("2024-13").is_err());
        assert!(validate_month("2024-3").is_err());
        assert!(validate_month("March").is_err());
    }

    #[test]
    fn test_kpi_create_defaults_from_json() {
        let input: CreateProjectKpi = serde_json::from_str(r#"{"project_id": 7}"#).unwrap();
        assert_eq!(input.project_id, 7);
        assert_eq!(input.overdue_tasks, 0);
        assert_eq!(input.completion_percentage, 0.0);
        assert!(!input.risk_flag);
        assert_eq!(input.customer_priority_level, PriorityLevel::Medium);
        assert_eq!(input.kpi_class, KpiClass::Medium);
    }

    #[test]
    fn test_kpi_negative_counts_rejected() {
        let mut input = CreateProjectKpi::for_project(1);
        input.overdue_tasks = -1;
        assert!(matches!(input.validate(), Err(Error::InvalidInput(_))));

        let update = UpdateProjectKpi {
            reopened_tasks: Some(-3),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_employee_password_not_serialized() {
        let employee = Employee {
            employee_id: 1,
            name: "Dana".to_string(),
            email: "dana@example.com".to_string(),
            password_hash: "secret".to_string(),
        };
        let json = serde_json::to_value(&employee).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "dana@example.com");
    }
}

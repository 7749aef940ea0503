//! Record store integration tests against a throwaway SQLite file

use pmdash_common::db::{
    alerts, budget_history, customers, employees, init_database, project_kpis, projects, tasks,
    AlertType, CreateAlert, CreateBudgetHistory, CreateCustomer, CreateEmployee, CreateProject,
    CreateProjectKpi, CreateTask, KpiClass, PriorityLevel, ProjectStatus, TaskStatus,
    UpdateBudgetHistory, UpdateProject, UpdateProjectKpi, UpdateTask,
};
use pmdash_common::Error;
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn setup() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("pmdash.db")).await.unwrap();
    (dir, pool)
}

async fn seed_project(pool: &SqlitePool) -> i64 {
    let customer = customers::create_customer(
        pool,
        &CreateCustomer {
            name: "Acme".to_string(),
            company: Some("Acme Corp".to_string()),
            email: "ops@acme.test".to_string(),
            phone: None,
        },
    )
    .await
    .unwrap();

    projects::create_project(
        pool,
        &CreateProject {
            project_name: "Portal relaunch".to_string(),
            customer_id: customer.customer_id,
            status: ProjectStatus::InProgress,
            completion_percentage: Some(40.0),
            budget_total: Some(120_000.0),
            budget_used: Some(35_000.0),
            budget_status: None,
            start_date: None,
            launch_date: None,
        },
    )
    .await
    .unwrap()
    .project_id
}

#[tokio::test]
async fn test_project_partial_update_keeps_other_fields() {
    let (_dir, pool) = setup().await;
    let project_id = seed_project(&pool).await;

    let updated = projects::update_project(
        &pool,
        project_id,
        &UpdateProject {
            status: Some(ProjectStatus::OnHold),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.status, ProjectStatus::OnHold);
    assert_eq!(updated.project_name, "Portal relaunch");
    assert_eq!(updated.budget_total, Some(120_000.0));
}

#[tokio::test]
async fn test_update_missing_row_returns_none() {
    let (_dir, pool) = setup().await;

    let result = tasks::update_task(
        &pool,
        999,
        &UpdateTask {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert!(result.is_none());
    assert!(!tasks::delete_task(&pool, 999).await.unwrap());
}

#[tokio::test]
async fn test_task_with_unknown_project_rejected() {
    let (_dir, pool) = setup().await;

    let result = tasks::create_task(
        &pool,
        &CreateTask {
            project_id: 42,
            task_name: "Orphan".to_string(),
            employee_id: None,
            deadline: None,
            status: TaskStatus::Pending,
        },
    )
    .await;

    assert!(matches!(result, Err(Error::InvalidInput(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_delete_referenced_project_conflicts() {
    let (_dir, pool) = setup().await;
    let project_id = seed_project(&pool).await;

    tasks::create_task(
        &pool,
        &CreateTask {
            project_id,
            task_name: "Wireframes".to_string(),
            employee_id: None,
            deadline: None,
            status: TaskStatus::Pending,
        },
    )
    .await
    .unwrap();

    let result = projects::delete_project(&pool, project_id).await;
    assert!(matches!(result, Err(Error::Conflict(_))), "got {:?}", result);
    assert!(projects::get_project(&pool, project_id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_duplicate_employee_email_conflicts() {
    let (_dir, pool) = setup().await;
    let input = CreateEmployee {
        name: "Dana".to_string(),
        email: "dana@example.com".to_string(),
        password_hash: "hash".to_string(),
    };

    employees::create_employee(&pool, &input).await.unwrap();
    let second = employees::create_employee(&pool, &input).await;

    assert!(matches!(second, Err(Error::Conflict(_))), "got {:?}", second);
    assert!(employees::get_employee_by_email(&pool, "dana@example.com")
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_budget_history_by_project_ordered_by_month() {
    let (_dir, pool) = setup().await;
    let project_id = seed_project(&pool).await;

    for (month, amount) in [("2024-03", 300.0), ("2024-01", 100.0), ("2024-02", 200.0)] {
        budget_history::create_budget_history(
            &pool,
            &CreateBudgetHistory {
                project_id,
                month: month.to_string(),
                amount_used: amount,
            },
        )
        .await
        .unwrap();
    }

    let rows = budget_history::list_budget_history_by_project(&pool, project_id, 0, 100)
        .await
        .unwrap();
    let months: Vec<&str> = rows.iter().map(|r| r.month.as_str()).collect();
    assert_eq!(months, vec!["2024-01", "2024-02", "2024-03"]);

    let bad = budget_history::update_budget_history(
        &pool,
        rows[0].history_id,
        &UpdateBudgetHistory {
            month: Some("January".to_string()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(bad, Err(Error::InvalidInput(_))));
}

#[tokio::test]
async fn test_alert_defaults_to_unread() {
    let (_dir, pool) = setup().await;
    let project_id = seed_project(&pool).await;

    let alert = alerts::create_alert(
        &pool,
        &serde_json::from_value::<CreateAlert>(serde_json::json!({
            "alert_type": "Warning",
            "alert_source": "budget-monitor",
            "project_id": project_id,
            "message": "Budget at 90%"
        }))
        .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(alert.alert_type, AlertType::Warning);
    assert_eq!(alert.status.as_str(), "Unread");

    let by_project = alerts::list_alerts_by_project(&pool, project_id, 0, 10)
        .await
        .unwrap();
    assert_eq!(by_project.len(), 1);
}

#[tokio::test]
async fn test_kpi_lookup_by_project_returns_oldest() {
    let (_dir, pool) = setup().await;
    let project_id = seed_project(&pool).await;

    let first = project_kpis::create_project_kpi(&pool, &CreateProjectKpi::for_project(project_id))
        .await
        .unwrap();
    let mut second_input = CreateProjectKpi::for_project(project_id);
    second_input.kpi_class = KpiClass::High;
    project_kpis::create_project_kpi(&pool, &second_input)
        .await
        .unwrap();

    let found = project_kpis::get_kpi_by_project(&pool, project_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.kpi_id, first.kpi_id);

    let all = project_kpis::list_kpis_by_project(&pool, project_id, 0, 10)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    assert!(project_kpis::get_kpi_by_project(&pool, project_id + 100)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_update_kpi_class_touches_only_class() {
    let (_dir, pool) = setup().await;
    let project_id = seed_project(&pool).await;

    let mut input = CreateProjectKpi::for_project(project_id);
    input.completion_percentage = 80.0;
    input.overdue_tasks = 2;
    input.risk_flag = true;
    input.customer_priority_level = PriorityLevel::High;
    let before = project_kpis::create_project_kpi(&pool, &input).await.unwrap();

    let after = project_kpis::update_kpi_class(&pool, before.kpi_id, KpiClass::High)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(after.kpi_class, KpiClass::High);
    let mut expected = before.clone();
    expected.kpi_class = KpiClass::High;
    assert_eq!(after, expected);

    assert!(project_kpis::update_kpi_class(&pool, 9999, KpiClass::Low)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_kpi_general_update_and_null_columns() {
    let (_dir, pool) = setup().await;
    let project_id = seed_project(&pool).await;

    // Row written by another tool with NULL metrics
    sqlx::query(
        "INSERT INTO project_kpis (project_id, completion_percentage, overdue_tasks, risk_flag, customer_priority_level)
         VALUES (?, NULL, NULL, NULL, NULL)",
    )
    .bind(project_id)
    .execute(&pool)
    .await
    .unwrap();

    let legacy = project_kpis::get_kpi_by_project(&pool, project_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(legacy.completion_percentage, None);
    assert_eq!(legacy.overdue_tasks, None);
    assert_eq!(legacy.risk_flag, None);
    assert_eq!(legacy.customer_priority_level, None);
    assert_eq!(legacy.kpi_class, KpiClass::Medium);

    let updated = project_kpis::update_project_kpi(
        &pool,
        legacy.kpi_id,
        &UpdateProjectKpi {
            overdue_tasks: Some(4),
            customer_priority_level: Some(PriorityLevel::Low),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.overdue_tasks, Some(4));
    assert_eq!(updated.customer_priority_level.as_deref(), Some("Low"));
    assert_eq!(updated.completion_percentage, None);
}

//! Project KPI database operations
//!
//! A project is expected to have one KPI row, but nothing enforces it.
//! Lookups by project return the oldest row (lowest `kpi_id`).

use crate::db::models::{CreateProjectKpi, KpiClass, ProjectKpi, UpdateProjectKpi};
use crate::{Error, Result};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_KPI: &str = r#"
    SELECT kpi_id, project_id, completion_percentage, milestone_completion,
           budget_utilization, schedule_variance, overdue_tasks, alert_count,
           avg_task_completion_time, employee_workload_index, customer_priority_level,
           reopened_tasks, risk_flag, kpi_class, created_at
    FROM project_kpis
"#;

fn kpi_from_row(row: &SqliteRow) -> Result<ProjectKpi> {
    let kpi_class: String = row.try_get("kpi_class")?;

    Ok(ProjectKpi {
        kpi_id: row.try_get("kpi_id")?,
        project_id: row.try_get("project_id")?,
        completion_percentage: row.try_get("completion_percentage")?,
        milestone_completion: row.try_get("milestone_completion")?,
        budget_utilization: row.try_get("budget_utilization")?,
        schedule_variance: row.try_get("schedule_variance")?,
        overdue_tasks: row.try_get("overdue_tasks")?,
        alert_count: row.try_get("alert_count")?,
        avg_task_completion_time: row.try_get("avg_task_completion_time")?,
        employee_workload_index: row.try_get("employee_workload_index")?,
        customer_priority_level: row.try_get("customer_priority_level")?,
        reopened_tasks: row.try_get("reopened_tasks")?,
        risk_flag: row.try_get("risk_flag")?,
        kpi_class: KpiClass::from_db(&kpi_class)
            .ok_or_else(|| Error::Internal(format!("Unknown kpi_class in database: {}", kpi_class)))?,
        created_at: row.try_get("created_at")?,
    })
}

/// Insert a KPI record. Does not check for an existing row for the project.
pub async fn create_project_kpi(pool: &SqlitePool, input: &CreateProjectKpi) -> Result<ProjectKpi> {
    input.validate()?;

    let result = sqlx::query(
        r#"
        INSERT INTO project_kpis (
            project_id, completion_percentage, milestone_completion, budget_utilization,
            schedule_variance, overdue_tasks, alert_count, avg_task_completion_time,
            employee_workload_index, customer_priority_level, reopened_tasks, risk_flag,
            kpi_class, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(input.project_id)
    .bind(input.completion_percentage)
    .bind(input.milestone_completion)
    .bind(input.budget_utilization)
    .bind(input.schedule_variance)
    .bind(input.overdue_tasks)
    .bind(input.alert_count)
    .bind(input.avg_task_completion_time)
    .bind(input.employee_workload_index)
    .bind(input.customer_priority_level.as_str())
    .bind(input.reopened_tasks)
    .bind(input.risk_flag)
    .bind(input.kpi_class.as_str())
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(|e| Error::from_write(e, "project KPI"))?;

    let id = result.last_insert_rowid();
    get_project_kpi(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Project KPI {} vanished after insert", id)))
}

pub async fn get_project_kpi(pool: &SqlitePool, kpi_id: i64) -> Result<Option<ProjectKpi>> {
    let row = sqlx::query(&format!("{} WHERE kpi_id = ?", SELECT_KPI))
        .bind(kpi_id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(kpi_from_row).transpose()
}

/// KPI record for a project (oldest row when several exist)
pub async fn get_kpi_by_project(pool: &SqlitePool, project_id: i64) -> Result<Option<ProjectKpi>> {
    let row = sqlx::query(&format!(
        "{} WHERE project_id = ? ORDER BY kpi_id LIMIT 1",
        SELECT_KPI
    ))
    .bind(project_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(kpi_from_row).transpose()
}

pub async fn list_project_kpis(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<ProjectKpi>> {
    let rows = sqlx::query(&format!("{} ORDER BY kpi_id LIMIT ? OFFSET ?", SELECT_KPI))
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;

    rows.iter().map(kpi_from_row).collect()
}

pub async fn list_kpis_by_project(
    pool: &SqlitePool,
    project_id: i64,
    skip: i64,
    limit: i64,
) -> Result<Vec<ProjectKpi>> {
    let rows = sqlx::query(&format!(
        "{} WHERE project_id = ? ORDER BY kpi_id LIMIT ? OFFSET ?",
        SELECT_KPI
    ))
    .bind(project_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    rows.iter().map(kpi_from_row).collect()
}

/// General partial update of a KPI record
pub async fn update_project_kpi(
    pool: &SqlitePool,
    kpi_id: i64,
    update: &UpdateProjectKpi,
) -> Result<Option<ProjectKpi>> {
    update.validate()?;

    let result = sqlx::query(
        r#"
        UPDATE project_kpis SET
            completion_percentage = COALESCE(?, completion_percentage),
            milestone_completion = COALESCE(?, milestone_completion),
            budget_utilization = COALESCE(?, budget_utilization),
            schedule_variance = COALESCE(?, schedule_variance),
            overdue_tasks = COALESCE(?, overdue_tasks),
            alert_count = COALESCE(?, alert_count),
            avg_task_completion_time = COALESCE(?, avg_task_completion_time),
            employee_workload_index = COALESCE(?, employee_workload_index),
            customer_priority_level = COALESCE(?, customer_priority_level),
            reopened_tasks = COALESCE(?, reopened_tasks),
            risk_flag = COALESCE(?, risk_flag),
            kpi_class = COALESCE(?, kpi_class)
        WHERE kpi_id = ?
        "#,
    )
    .bind(update.completion_percentage)
    .bind(update.milestone_completion)
    .bind(update.budget_utilization)
    .bind(update.schedule_variance)
    .bind(update.overdue_tasks)
    .bind(update.alert_count)
    .bind(update.avg_task_completion_time)
    .bind(update.employee_workload_index)
    .bind(update.customer_priority_level.map(|p| p.as_str()))
    .bind(update.reopened_tasks)
    .bind(update.risk_flag)
    .bind(update.kpi_class.map(|c| c.as_str()))
    .bind(kpi_id)
    .execute(pool)
    .await
    .map_err(|e| Error::from_write(e, "project KPI"))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_project_kpi(pool, kpi_id).await
}

/// Set `kpi_class` and nothing else.
///
/// A single-column UPDATE, so concurrent edits to the metric columns are
/// never overwritten. Returns the re-read row, or `None` if the row is gone.
pub async fn update_kpi_class(
    pool: &SqlitePool,
    kpi_id: i64,
    kpi_class: KpiClass,
) -> Result<Option<ProjectKpi>> {
    let result = sqlx::query("UPDATE project_kpis SET kpi_class = ? WHERE kpi_id = ?")
        .bind(kpi_class.as_str())
        .bind(kpi_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_project_kpi(pool, kpi_id).await
}

pub async fn delete_project_kpi(pool: &SqlitePool, kpi_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM project_kpis WHERE kpi_id = ?")
        .bind(kpi_id)
        .execute(pool)
        .await
        .map_err(|e| Error::from_delete(e, "project KPI"))?;

    Ok(result.rows_affected() > 0)
}

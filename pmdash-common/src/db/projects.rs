//! Project database operations

use crate::db::models::{BudgetStatus, CreateProject, Project, ProjectStatus, UpdateProject};
use crate::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_PROJECT: &str = r#"
    SELECT project_id, project_name, customer_id, status, completion_percentage,
           budget_total, budget_used, budget_status, start_date, launch_date
    FROM projects
"#;

fn project_from_row(row: &SqliteRow) -> Result<Project> {
    let status: String = row.try_get("status")?;
    let budget_status: Option<String> = row.try_get("budget_status")?;

    Ok(Project {
        project_id: row.try_get("project_id")?,
        project_name: row.try_get("project_name")?,
        customer_id: row.try_get("customer_id")?,
        status: ProjectStatus::from_db(&status)
            .ok_or_else(|| Error::Internal(format!("Unknown project status in database: {}", status)))?,
        completion_percentage: row.try_get("completion_percentage")?,
        budget_total: row.try_get("budget_total")?,
        budget_used: row.try_get("budget_used")?,
        budget_status: budget_status
            .map(|s| {
                BudgetStatus::from_db(&s)
                    .ok_or_else(|| Error::Internal(format!("Unknown budget status in database: {}", s)))
            })
            .transpose()?,
        start_date: row.try_get("start_date")?,
        launch_date: row.try_get("launch_date")?,
    })
}

pub async fn create_project(pool: &SqlitePool, input: &CreateProject) -> Result<Project> {
    input.validate()?;

    let result = sqlx::query(
        r#"
        INSERT INTO projects (
            project_name, customer_id, status, completion_percentage,
            budget_total, budget_used, budget_status, start_date, launch_date
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.project_name)
    .bind(input.customer_id)
    .bind(input.status.as_str())
    .bind(input.completion_percentage)
    .bind(input.budget_total)
    .bind(input.budget_used)
    .bind(input.budget_status.map(|s| s.as_str()))
    .bind(input.start_date)
    .bind(input.launch_date)
    .execute(pool)
    .await
    .map_err(|e| Error::from_write(e, "project"))?;

    let id = result.last_insert_rowid();
    get_project(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Project {} vanished after insert", id)))
}

pub async fn get_project(pool: &SqlitePool, project_id: i64) -> Result<Option<Project>> {
    let row = sqlx::query(&format!("{} WHERE project_id = ?", SELECT_PROJECT))
        .bind(project_id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(project_from_row).transpose()
}

pub async fn list_projects(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<Project>> {
    let rows = sqlx::query(&format!(
        "{} ORDER BY project_id LIMIT ? OFFSET ?",
        SELECT_PROJECT
    ))
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    rows.iter().map(project_from_row).collect()
}

pub async fn update_project(
    pool: &SqlitePool,
    project_id: i64,
    update: &UpdateProject,
) -> Result<Option<Project>> {
    update.validate()?;

    let result = sqlx::query(
        r#"
        UPDATE projects SET
            project_name = COALESCE(?, project_name),
            customer_id = COALESCE(?, customer_id),
            status = COALESCE(?, status),
            completion_percentage = COALESCE(?, completion_percentage),
            budget_total = COALESCE(?, budget_total),
            budget_used = COALESCE(?, budget_used),
            budget_status = COALESCE(?, budget_status),
            start_date = COALESCE(?, start_date),
            launch_date = COALESCE(?, launch_date)
        WHERE project_id = ?
        "#,
    )
    .bind(&update.project_name)
    .bind(update.customer_id)
    .bind(update.status.map(|s| s.as_str()))
    .bind(update.completion_percentage)
    .bind(update.budget_total)
    .bind(update.budget_used)
    .bind(update.budget_status.map(|s| s.as_str()))
    .bind(update.start_date)
    .bind(update.launch_date)
    .bind(project_id)
    .execute(pool)
    .await
    .map_err(|e| Error::from_write(e, "project"))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_project(pool, project_id).await
}

/// Delete a project.
///
/// Dependent tasks, alerts, budget rows and KPI records are not removed;
/// while any exist the delete fails with `Error::Conflict`.
pub async fn delete_project(pool: &SqlitePool, project_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM projects WHERE project_id = ?")
        .bind(project_id)
        .execute(pool)
        .await
        .map_err(|e| Error::from_delete(e, "project"))?;

    Ok(result.rows_affected() > 0)
}

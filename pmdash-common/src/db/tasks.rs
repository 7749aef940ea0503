//! Task database operations

use crate::db::models::{CreateTask, Task, TaskStatus, UpdateTask};
use crate::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_TASK: &str =
    "SELECT task_id, project_id, task_name, employee_id, deadline, status FROM tasks";

fn task_from_row(row: &SqliteRow) -> Result<Task> {
    let status: String = row.try_get("status")?;

    Ok(Task {
        task_id: row.try_get("task_id")?,
        project_id: row.try_get("project_id")?,
        task_name: row.try_get("task_name")?,
        employee_id: row.try_get("employee_id")?,
        deadline: row.try_get("deadline")?,
        status: TaskStatus::from_db(&status)
            .ok_or_else(|| Error::Internal(format!("Unknown task status in database: {}", status)))?,
    })
}

pub async fn create_task(pool: &SqlitePool, input: &CreateTask) -> Result<Task> {
    input.validate()?;

    let result = sqlx::query(
        r#"
        INSERT INTO tasks (project_id, task_name, employee_id, deadline, status)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(input.project_id)
    .bind(&input.task_name)
    .bind(input.employee_id)
    .bind(input.deadline)
    .bind(input.status.as_str())
    .execute(pool)
    .await
    .map_err(|e| Error::from_write(e, "task"))?;

    let id = result.last_insert_rowid();
    get_task(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Task {} vanished after insert", id)))
}

pub async fn get_task(pool: &SqlitePool, task_id: i64) -> Result<Option<Task>> {
    let row = sqlx::query(&format!("{} WHERE task_id = ?", SELECT_TASK))
        .bind(task_id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(task_from_row).transpose()
}

pub async fn list_tasks(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<Task>> {
    let rows = sqlx::query(&format!("{} ORDER BY task_id LIMIT ? OFFSET ?", SELECT_TASK))
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;

    rows.iter().map(task_from_row).collect()
}

/// Tasks belonging to one project
pub async fn list_tasks_by_project(
    pool: &SqlitePool,
    project_id: i64,
    skip: i64,
    limit: i64,
) -> Result<Vec<Task>> {
    let rows = sqlx::query(&format!(
        "{} WHERE project_id = ? ORDER BY task_id LIMIT ? OFFSET ?",
        SELECT_TASK
    ))
    .bind(project_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    rows.iter().map(task_from_row).collect()
}

pub async fn update_task(
    pool: &SqlitePool,
    task_id: i64,
    update: &UpdateTask,
) -> Result<Option<Task>> {
    update.validate()?;

    let result = sqlx::query(
        r#"
        UPDATE tasks SET
            project_id = COALESCE(?, project_id),
            task_name = COALESCE(?, task_name),
            employee_id = COALESCE(?, employee_id),
            deadline = COALESCE(?, deadline),
            status = COALESCE(?, status)
        WHERE task_id = ?
        "#,
    )
    .bind(update.project_id)
    .bind(&update.task_name)
    .bind(update.employee_id)
    .bind(update.deadline)
    .bind(update.status.map(|s| s.as_str()))
    .bind(task_id)
    .execute(pool)
    .await
    .map_err(|e| Error::from_write(e, "task"))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_task(pool, task_id).await
}

pub async fn delete_task(pool: &SqlitePool, task_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM tasks WHERE task_id = ?")
        .bind(task_id)
        .execute(pool)
        .await
        .map_err(|e| Error::from_delete(e, "task"))?;

    Ok(result.rows_affected() > 0)
}

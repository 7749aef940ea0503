//! Alert database operations

use crate::db::models::{Alert, AlertStatus, AlertType, CreateAlert, UpdateAlert};
use crate::{Error, Result};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_ALERT: &str = r#"
    SELECT alert_id, alert_type, alert_source, project_id, task_id, message, status, created_at
    FROM alerts
"#;

fn alert_from_row(row: &SqliteRow) -> Result<Alert> {
    let alert_type: String = row.try_get("alert_type")?;
    let status: String = row.try_get("status")?;

    Ok(Alert {
        alert_id: row.try_get("alert_id")?,
        alert_type: AlertType::from_db(&alert_type)
            .ok_or_else(|| Error::Internal(format!("Unknown alert type in database: {}", alert_type)))?,
        alert_source: row.try_get("alert_source")?,
        project_id: row.try_get("project_id")?,
        task_id: row.try_get("task_id")?,
        message: row.try_get("message")?,
        status: AlertStatus::from_db(&status)
            .ok_or_else(|| Error::Internal(format!("Unknown alert status in database: {}", status)))?,
        created_at: row.try_get("created_at")?,
    })
}

pub async fn create_alert(pool: &SqlitePool, input: &CreateAlert) -> Result<Alert> {
    input.validate()?;

    let result = sqlx::query(
        r#"
        INSERT INTO alerts (alert_type, alert_source, project_id, task_id, message, status, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(input.alert_type.as_str())
    .bind(&input.alert_source)
    .bind(input.project_id)
    .bind(input.task_id)
    .bind(&input.message)
    .bind(input.status.as_str())
    .bind(Utc::now())
    .execute(pool)
    .await
    .map_err(|e| Error::from_write(e, "alert"))?;

    let id = result.last_insert_rowid();
    get_alert(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Alert {} vanished after insert", id)))
}

pub async fn get_alert(pool: &SqlitePool, alert_id: i64) -> Result<Option<Alert>> {
    let row = sqlx::query(&format!("{} WHERE alert_id = ?", SELECT_ALERT))
        .bind(alert_id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(alert_from_row).transpose()
}

pub async fn list_alerts(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<Alert>> {
    let rows = sqlx::query(&format!("{} ORDER BY alert_id LIMIT ? OFFSET ?", SELECT_ALERT))
        .bind(limit)
        .bind(skip)
        .fetch_all(pool)
        .await?;

    rows.iter().map(alert_from_row).collect()
}

/// Alerts raised against one project
pub async fn list_alerts_by_project(
    pool: &SqlitePool,
    project_id: i64,
    skip: i64,
    limit: i64,
) -> Result<Vec<Alert>> {
    let rows = sqlx::query(&format!(
        "{} WHERE project_id = ? ORDER BY alert_id LIMIT ? OFFSET ?",
        SELECT_ALERT
    ))
    .bind(project_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    rows.iter().map(alert_from_row).collect()
}

pub async fn update_alert(
    pool: &SqlitePool,
    alert_id: i64,
    update: &UpdateAlert,
) -> Result<Option<Alert>> {
    update.validate()?;

    let result = sqlx::query(
        r#"
        UPDATE alerts SET
            alert_type = COALESCE(?, alert_type),
            alert_source = COALESCE(?, alert_source),
            project_id = COALESCE(?, project_id),
            task_id = COALESCE(?, task_id),
            message = COALESCE(?, message),
            status = COALESCE(?, status)
        WHERE alert_id = ?
        "#,
    )
    .bind(update.alert_type.map(|t| t.as_str()))
    .bind(&update.alert_source)
    .bind(update.project_id)
    .bind(update.task_id)
    .bind(&update.message)
    .bind(update.status.map(|s| s.as_str()))
    .bind(alert_id)
    .execute(pool)
    .await
    .map_err(|e| Error::from_write(e, "alert"))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_alert(pool, alert_id).await
}

pub async fn delete_alert(pool: &SqlitePool, alert_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM alerts WHERE alert_id = ?")
        .bind(alert_id)
        .execute(pool)
        .await
        .map_err(|e| Error::from_delete(e, "alert"))?;

    Ok(result.rows_affected() > 0)
}

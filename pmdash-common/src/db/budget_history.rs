//! Budget history database operations
//!
//! One row per project and month (`YYYY-MM`) recording the amount spent.

use crate::db::models::{BudgetHistory, CreateBudgetHistory, UpdateBudgetHistory};
use crate::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_HISTORY: &str =
    "SELECT history_id, project_id, month, amount_used FROM budget_history";

fn history_from_row(row: &SqliteRow) -> Result<BudgetHistory> {
    Ok(BudgetHistory {
        history_id: row.try_get("history_id")?,
        project_id: row.try_get("project_id")?,
        month: row.try_get("month")?,
        amount_used: row.try_get("amount_used")?,
    })
}

pub async fn create_budget_history(
    pool: &SqlitePool,
    input: &CreateBudgetHistory,
) -> Result<BudgetHistory> {
    input.validate()?;

    let result = sqlx::query(
        r#"
        INSERT INTO budget_history (project_id, month, amount_used)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(input.project_id)
    .bind(&input.month)
    .bind(input.amount_used)
    .execute(pool)
    .await
    .map_err(|e| Error::from_write(e, "budget history"))?;

    let id = result.last_insert_rowid();
    get_budget_history(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Budget history {} vanished after insert", id)))
}

pub async fn get_budget_history(pool: &SqlitePool, history_id: i64) -> Result<Option<BudgetHistory>> {
    let row = sqlx::query(&format!("{} WHERE history_id = ?", SELECT_HISTORY))
        .bind(history_id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(history_from_row).transpose()
}

pub async fn list_budget_history(
    pool: &SqlitePool,
    skip: i64,
    limit: i64,
) -> Result<Vec<BudgetHistory>> {
    let rows = sqlx::query(&format!(
        "{} ORDER BY history_id LIMIT ? OFFSET ?",
        SELECT_HISTORY
    ))
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    rows.iter().map(history_from_row).collect()
}

/// Budget rows for one project, oldest month first
pub async fn list_budget_history_by_project(
    pool: &SqlitePool,
    project_id: i64,
    skip: i64,
    limit: i64,
) -> Result<Vec<BudgetHistory>> {
    let rows = sqlx::query(&format!(
        "{} WHERE project_id = ? ORDER BY month, history_id LIMIT ? OFFSET ?",
        SELECT_HISTORY
    ))
    .bind(project_id)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    rows.iter().map(history_from_row).collect()
}

pub async fn update_budget_history(
    pool: &SqlitePool,
    history_id: i64,
    update: &UpdateBudgetHistory,
) -> Result<Option<BudgetHistory>> {
    update.validate()?;

    let result = sqlx::query(
        r#"
        UPDATE budget_history SET
            project_id = COALESCE(?, project_id),
            month = COALESCE(?, month),
            amount_used = COALESCE(?, amount_used)
        WHERE history_id = ?
        "#,
    )
    .bind(update.project_id)
    .bind(&update.month)
    .bind(update.amount_used)
    .bind(history_id)
    .execute(pool)
    .await
    .map_err(|e| Error::from_write(e, "budget history"))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_budget_history(pool, history_id).await
}

pub async fn delete_budget_history(pool: &SqlitePool, history_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM budget_history WHERE history_id = ?")
        .bind(history_id)
        .execute(pool)
        .await
        .map_err(|e| Error::from_delete(e, "budget history"))?;

    Ok(result.rows_affected() > 0)
}

//! Employee database operations
//!
//! E-mail addresses are unique; a duplicate insert surfaces as `Error::Conflict`.

use crate::db::models::{CreateEmployee, Employee, UpdateEmployee};
use crate::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_EMPLOYEE: &str = "SELECT employee_id, name, email, password_hash FROM employees";

fn employee_from_row(row: &SqliteRow) -> Result<Employee> {
    Ok(Employee {
        employee_id: row.try_get("employee_id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
    })
}

pub async fn create_employee(pool: &SqlitePool, input: &CreateEmployee) -> Result<Employee> {
    input.validate()?;

    let result = sqlx::query(
        r#"
        INSERT INTO employees (name, email, password_hash)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.password_hash)
    .execute(pool)
    .await
    .map_err(|e| Error::from_write(e, "employee email"))?;

    let id = result.last_insert_rowid();
    get_employee(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Employee {} vanished after insert", id)))
}

pub async fn get_employee(pool: &SqlitePool, employee_id: i64) -> Result<Option<Employee>> {
    let row = sqlx::query(&format!("{} WHERE employee_id = ?", SELECT_EMPLOYEE))
        .bind(employee_id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(employee_from_row).transpose()
}

/// Look up an employee by exact e-mail address
pub async fn get_employee_by_email(pool: &SqlitePool, email: &str) -> Result<Option<Employee>> {
    let row = sqlx::query(&format!("{} WHERE email = ?", SELECT_EMPLOYEE))
        .bind(email)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(employee_from_row).transpose()
}

pub async fn list_employees(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<Employee>> {
    let rows = sqlx::query(&format!(
        "{} ORDER BY employee_id LIMIT ? OFFSET ?",
        SELECT_EMPLOYEE
    ))
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    rows.iter().map(employee_from_row).collect()
}

pub async fn update_employee(
    pool: &SqlitePool,
    employee_id: i64,
    update: &UpdateEmployee,
) -> Result<Option<Employee>> {
    update.validate()?;

    let result = sqlx::query(
        r#"
        UPDATE employees SET
            name = COALESCE(?, name),
            email = COALESCE(?, email),
            password_hash = COALESCE(?, password_hash)
        WHERE employee_id = ?
        "#,
    )
    .bind(&update.name)
    .bind(&update.email)
    .bind(&update.password_hash)
    .bind(employee_id)
    .execute(pool)
    .await
    .map_err(|e| Error::from_write(e, "employee email"))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_employee(pool, employee_id).await
}

pub async fn delete_employee(pool: &SqlitePool, employee_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM employees WHERE employee_id = ?")
        .bind(employee_id)
        .execute(pool)
        .await
        .map_err(|e| Error::from_delete(e, "employee"))?;

    Ok(result.rows_affected() > 0)
}

//! Customer database operations

use crate::db::models::{CreateCustomer, Customer, UpdateCustomer};
use crate::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const SELECT_CUSTOMER: &str = "SELECT customer_id, name, company, email, phone FROM customers";

fn customer_from_row(row: &SqliteRow) -> Result<Customer> {
    Ok(Customer {
        customer_id: row.try_get("customer_id")?,
        name: row.try_get("name")?,
        company: row.try_get("company")?,
        email: row.try_get("email")?,
        phone: row.try_get("phone")?,
    })
}

/// Insert a customer and return the stored row
pub async fn create_customer(pool: &SqlitePool, input: &CreateCustomer) -> Result<Customer> {
    input.validate()?;

    let result = sqlx::query(
        r#"
        INSERT INTO customers (name, company, email, phone)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&input.name)
    .bind(&input.company)
    .bind(&input.email)
    .bind(&input.phone)
    .execute(pool)
    .await
    .map_err(|e| Error::from_write(e, "customer"))?;

    let id = result.last_insert_rowid();
    get_customer(pool, id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Customer {} vanished after insert", id)))
}

/// Load customer by id
pub async fn get_customer(pool: &SqlitePool, customer_id: i64) -> Result<Option<Customer>> {
    let row = sqlx::query(&format!("{} WHERE customer_id = ?", SELECT_CUSTOMER))
        .bind(customer_id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(customer_from_row).transpose()
}

/// List customers ordered by id
pub async fn list_customers(pool: &SqlitePool, skip: i64, limit: i64) -> Result<Vec<Customer>> {
    let rows = sqlx::query(&format!(
        "{} ORDER BY customer_id LIMIT ? OFFSET ?",
        SELECT_CUSTOMER
    ))
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    rows.iter().map(customer_from_row).collect()
}

/// Apply the provided fields; returns `None` when the customer does not exist
pub async fn update_customer(
    pool: &SqlitePool,
    customer_id: i64,
    update: &UpdateCustomer,
) -> Result<Option<Customer>> {
    update.validate()?;

    let result = sqlx::query(
        r#"
        UPDATE customers SET
            name = COALESCE(?, name),
            company = COALESCE(?, company),
            email = COALESCE(?, email),
            phone = COALESCE(?, phone)
        WHERE customer_id = ?
        "#,
    )
    .bind(&update.name)
    .bind(&update.company)
    .bind(&update.email)
    .bind(&update.phone)
    .bind(customer_id)
    .execute(pool)
    .await
    .map_err(|e| Error::from_write(e, "customer"))?;

    if result.rows_affected() == 0 {
        return Ok(None);
    }

    get_customer(pool, customer_id).await
}

/// Delete customer; `false` when no such row
pub async fn delete_customer(pool: &SqlitePool, customer_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM customers WHERE customer_id = ?")
        .bind(customer_id)
        .execute(pool)
        .await
        .map_err(|e| Error::from_delete(e, "customer"))?;

    Ok(result.rows_affected() > 0)
}

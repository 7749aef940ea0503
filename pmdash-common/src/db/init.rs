//! Database initialization
//!
//! Opens (or creates) the SQLite database and makes sure every table exists.
//! All statements are idempotent, so this runs on every startup.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // foreign_keys is per-connection; every pooled connection gets it
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(5000));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all tables and indexes
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_customers_table(pool).await?;
    create_employees_table(pool).await?;
    create_projects_table(pool).await?;
    create_tasks_table(pool).await?;
    create_alerts_table(pool).await?;
    create_budget_history_table(pool).await?;
    create_project_kpis_table(pool).await?;
    create_indexes(pool).await?;
    Ok(())
}

async fn create_customers_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            customer_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            company TEXT,
            email TEXT NOT NULL,
            phone TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_employees_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            employee_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_projects_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            project_id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_name TEXT NOT NULL,
            customer_id INTEGER NOT NULL REFERENCES customers(customer_id),
            status TEXT NOT NULL DEFAULT 'Not Started'
                CHECK (status IN ('Not Started', 'In Progress', 'Completed', 'On Hold', 'Canceled')),
            completion_percentage REAL,
            budget_total REAL,
            budget_used REAL,
            budget_status TEXT
                CHECK (budget_status IS NULL OR budget_status IN ('Under Budget', 'On Budget', 'Over Budget')),
            start_date TEXT,
            launch_date TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_tasks_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            task_id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id INTEGER NOT NULL REFERENCES projects(project_id),
            task_name TEXT NOT NULL,
            employee_id INTEGER REFERENCES employees(employee_id),
            deadline TEXT,
            status TEXT NOT NULL DEFAULT 'Pending'
                CHECK (status IN ('Pending', 'In Progress', 'Completed', 'Overdue'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_alerts_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS alerts (
            alert_id INTEGER PRIMARY KEY AUTOINCREMENT,
            alert_type TEXT NOT NULL CHECK (alert_type IN ('Urgent', 'Warning', 'Info')),
            alert_source TEXT NOT NULL,
            project_id INTEGER REFERENCES projects(project_id),
            task_id INTEGER REFERENCES tasks(task_id),
            message TEXT,
            status TEXT NOT NULL DEFAULT 'Unread' CHECK (status IN ('Read', 'Unread')),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_budget_history_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS budget_history (
            history_id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id INTEGER NOT NULL REFERENCES projects(project_id),
            month TEXT NOT NULL,
            amount_used REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Project KPI table
///
/// Metric columns are nullable so rows written by other tools still load;
/// the API itself always writes concrete values. There is deliberately no
/// UNIQUE constraint on project_id.
async fn create_project_kpis_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS project_kpis (
            kpi_id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id INTEGER NOT NULL REFERENCES projects(project_id),
            completion_percentage REAL DEFAULT 0.0,
            milestone_completion REAL DEFAULT 0.0,
            budget_utilization REAL DEFAULT 0.0,
            schedule_variance REAL DEFAULT 0.0,
            overdue_tasks INTEGER DEFAULT 0,
            alert_count INTEGER DEFAULT 0,
            avg_task_completion_time REAL DEFAULT 0.0,
            employee_workload_index REAL DEFAULT 0.0,
            customer_priority_level TEXT DEFAULT 'Medium'
                CHECK (customer_priority_level IS NULL OR customer_priority_level IN ('Low', 'Medium', 'High')),
            reopened_tasks INTEGER DEFAULT 0,
            risk_flag INTEGER DEFAULT 0,
            kpi_class TEXT NOT NULL DEFAULT 'Medium'
                CHECK (kpi_class IN ('Low', 'Medium', 'High')),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<()> {
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_projects_customer ON projects(customer_id)",
        "CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id)",
        "CREATE INDEX IF NOT EXISTS idx_tasks_employee ON tasks(employee_id)",
        "CREATE INDEX IF NOT EXISTS idx_alerts_project ON alerts(project_id)",
        "CREATE INDEX IF NOT EXISTS idx_budget_history_project ON budget_history(project_id)",
        "CREATE INDEX IF NOT EXISTS idx_project_kpis_project ON project_kpis(project_id)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}

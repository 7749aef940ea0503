//! KPI record access used by the classification orchestrator

use async_trait::async_trait;
use pmdash_common::db::{project_kpis, KpiClass, ProjectKpi};
use sqlx::SqlitePool;

/// The two record-store operations classification needs
#[async_trait]
pub trait KpiStore: Send + Sync {
    /// KPI record for a project, `None` if the project has none
    async fn get_kpi_by_project(&self, project_id: i64) -> pmdash_common::Result<Option<ProjectKpi>>;

    /// Persist a new class on one record, leaving every other field alone.
    /// `None` if the record no longer exists.
    async fn update_kpi_class(
        &self,
        kpi_id: i64,
        kpi_class: KpiClass,
    ) -> pmdash_common::Result<Option<ProjectKpi>>;
}

/// [`KpiStore`] backed by the SQLite record store
#[derive(Clone)]
pub struct SqliteKpiStore {
    pool: SqlitePool,
}

impl SqliteKpiStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KpiStore for SqliteKpiStore {
    async fn get_kpi_by_project(&self, project_id: i64) -> pmdash_common::Result<Option<ProjectKpi>> {
        project_kpis::get_kpi_by_project(&self.pool, project_id).await
    }

    async fn update_kpi_class(
        &self,
        kpi_id: i64,
        kpi_class: KpiClass,
    ) -> pmdash_common::Result<Option<ProjectKpi>> {
        project_kpis::update_kpi_class(&self.pool, kpi_id, kpi_class).await
    }
}

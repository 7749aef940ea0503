//! KPI classification orchestrator
//!
//! Drives one classification request through
//! `Loading -> Snapshotting -> Classifying -> Persisting -> Done | Failed`.
//! Nothing is written unless the classifier produced a valid label, and the
//! write touches `kpi_class` only.

use crate::kpi::classifier::{ClassificationError, KpiClassifier};
use crate::kpi::snapshot::KpiSnapshot;
use crate::kpi::store::KpiStore;
use pmdash_common::db::ProjectKpi;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

/// Classification failures visible to callers
#[derive(Debug, Error)]
pub enum KpiError {
    #[error("No KPI record for project {0}")]
    NotFound(i64),

    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),
}

/// Stages of a single classification run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationStage {
    Loading,
    Snapshotting,
    Classifying,
    Persisting,
    Done,
    Failed,
}

impl ClassificationStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationStage::Loading => "loading",
            ClassificationStage::Snapshotting => "snapshotting",
            ClassificationStage::Classifying => "classifying",
            ClassificationStage::Persisting => "persisting",
            ClassificationStage::Done => "done",
            ClassificationStage::Failed => "failed",
        }
    }
}

/// Runs classification requests against a store and a classifier.
///
/// Holds no per-request state; one instance is shared by every handler.
pub struct KpiOrchestrator {
    store: Arc<dyn KpiStore>,
    classifier: Arc<dyn KpiClassifier>,
    max_wait: Duration,
}

impl KpiOrchestrator {
    pub fn new(
        store: Arc<dyn KpiStore>,
        classifier: Arc<dyn KpiClassifier>,
        max_wait: Duration,
    ) -> Self {
        Self {
            store,
            classifier,
            max_wait,
        }
    }

    /// Classify the KPI record of `project_id` and persist the new class.
    ///
    /// Returns the refreshed record. Never creates a record.
    pub async fn classify_project(&self, project_id: i64) -> Result<ProjectKpi, KpiError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("classify_project", %run_id, project_id);

        async move {
            let result = self.run(project_id).await;
            match &result {
                Ok(kpi) => tracing::info!(
                    stage = ClassificationStage::Done.as_str(),
                    kpi_id = kpi.kpi_id,
                    kpi_class = %kpi.kpi_class,
                    "KPI classification complete"
                ),
                Err(e) => tracing::warn!(
                    stage = ClassificationStage::Failed.as_str(),
                    error = %e,
                    "KPI classification failed"
                ),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(&self, project_id: i64) -> Result<ProjectKpi, KpiError> {
        enter(ClassificationStage::Loading);
        let record = self
            .store
            .get_kpi_by_project(project_id)
            .await
            .map_err(|e| KpiError::StoreUnavailable(e.to_string()))?
            .ok_or(KpiError::NotFound(project_id))?;

        enter(ClassificationStage::Snapshotting);
        let snapshot = KpiSnapshot::from_record(&record);

        enter(ClassificationStage::Classifying);
        let kpi_class = tokio::time::timeout(self.max_wait, self.classifier.classify(&snapshot))
            .await
            .map_err(|_| ClassificationError::Timeout(self.max_wait))??;

        enter(ClassificationStage::Persisting);
        let updated = self
            .store
            .update_kpi_class(record.kpi_id, kpi_class)
            .await
            .map_err(|e| KpiError::StoreUnavailable(e.to_string()))?;

        // Row deleted while the classifier was running
        updated.ok_or(KpiError::NotFound(project_id))
    }
}

fn enter(stage: ClassificationStage) {
    tracing::debug!(stage = stage.as_str(), "Entering stage");
}

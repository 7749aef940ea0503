//! KPI classification core
//!
//! Snapshot building, the classifier gateway and the orchestrator that ties
//! them to the record store.

pub mod classifier;
pub mod orchestrator;
pub mod snapshot;
pub mod store;

pub use classifier::{ClassificationError, HttpClassifier, KpiClassifier};
pub use orchestrator::{ClassificationStage, KpiError, KpiOrchestrator};
pub use snapshot::{priority_ordinal, KpiSnapshot};
pub use store::{KpiStore, SqliteKpiStore};

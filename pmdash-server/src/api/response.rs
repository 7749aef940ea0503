//! Response bodies for record endpoints
//!
//! Every record goes out with an extra `id` field equal to its primary key,
//! next to the key under its own name (`project_id`, `kpi_id`, ...).

use axum::Json;
use pmdash_common::db::{
    Alert, BudgetHistory, Customer, Employee, Project, ProjectKpi, Task,
};
use serde::Serialize;

/// Records that have a single integer primary key
pub trait RecordId {
    fn record_id(&self) -> i64;
}

macro_rules! record_id {
    ($($ty:ty => $field:ident),+ $(,)?) => {
        $(impl RecordId for $ty {
            fn record_id(&self) -> i64 {
                self.$field
            }
        })+
    };
}

record_id!(
    Customer => customer_id,
    Employee => employee_id,
    Project => project_id,
    Task => task_id,
    Alert => alert_id,
    BudgetHistory => history_id,
    ProjectKpi => kpi_id,
);

/// A record serialized with its `id` alias
#[derive(Debug, Clone, Serialize)]
pub struct Identified<T> {
    pub id: i64,
    #[serde(flatten)]
    pub record: T,
}

impl<T: RecordId> From<T> for Identified<T> {
    fn from(record: T) -> Self {
        Self {
            id: record.record_id(),
            record,
        }
    }
}

pub fn record_json<T: RecordId>(record: T) -> Json<Identified<T>> {
    Json(Identified::from(record))
}

pub fn record_list<T: RecordId>(records: Vec<T>) -> Json<Vec<Identified<T>>> {
    Json(records.into_iter().map(Identified::from).collect())
}

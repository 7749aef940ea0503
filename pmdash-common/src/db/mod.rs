//! Database models and queries
//!
//! One module per table. Every function takes the pool explicitly and
//! returns `Ok(None)` / `Ok(false)` for a missing row rather than an error,
//! leaving the HTTP mapping to the caller.

pub mod alerts;
pub mod budget_history;
pub mod customers;
pub mod employees;
pub mod init;
pub mod models;
pub mod project_kpis;
pub mod projects;
pub mod tasks;

pub use init::*;
pub use models::*;

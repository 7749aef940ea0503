//! # pmdash Common Library
//!
//! Shared code for the pmdash service including:
//! - Database initialization and the SQLite record store
//! - Entity models (customers, employees, projects, tasks, alerts,
//!   budget history, project KPIs)
//! - Bootstrap configuration loading

pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};

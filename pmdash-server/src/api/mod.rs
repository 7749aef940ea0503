//! HTTP API handlers for pmdash-server

pub mod alerts;
pub mod budget_history;
pub mod classification;
pub mod customers;
pub mod employees;
pub mod health;
pub mod project_kpis;
pub mod projects;
pub mod response;
pub mod tasks;

pub use alerts::alert_routes;
pub use budget_history::budget_history_routes;
pub use classification::classification_routes;
pub use customers::customer_routes;
pub use employees::employee_routes;
pub use health::health_routes;
pub use project_kpis::project_kpi_routes;
pub use projects::project_routes;
pub use tasks::task_routes;

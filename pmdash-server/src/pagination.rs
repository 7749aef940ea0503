//! Pagination utilities for list endpoints
//!
//! Lists take `skip`/`limit` query parameters. Both are clamped rather than
//! rejected.

use serde::Deserialize;

/// Rows returned when `limit` is not given
pub const DEFAULT_LIMIT: i64 = 100;

/// Largest accepted `limit`
pub const MAX_LIMIT: i64 = 1000;

/// Query parameters shared by list endpoints
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
    /// Restrict child-entity lists to one project
    pub project_id: Option<i64>,
}

impl ListQuery {
    /// Sanitized `(skip, limit)` ready for `LIMIT ? OFFSET ?`
    ///
    /// # Examples
    /// ```
    /// use pmdash_server::pagination::ListQuery;
    ///
    /// let q = ListQuery { skip: Some(-5), limit: Some(5000), project_id: None };
    /// assert_eq!(q.bounds(), (0, 1000));
    /// ```
    pub fn bounds(&self) -> (i64, i64) {
        let skip = self.skip.unwrap_or(0).max(0);
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        (skip, limit)
    }
}

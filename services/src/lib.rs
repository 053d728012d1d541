//! Business operations over the course ledger and its derived aggregates.
//!
//! Services are stateless structs; every operation takes the shared
//! [`util::state::AppState`] and returns [`error::ServiceError`].

use serde::Serialize;

pub mod announcement_service;
pub mod bootstrap_service;
pub mod class_service;
pub mod course_service;
pub mod error;
pub mod grade_service;
pub mod registration_service;
pub mod statistics;
pub mod submission_service;
pub mod user_service;

mod lookups;

#[cfg(test)]
mod test_support;

/// One page of a listing. Pages are numbered from 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub has_prev: bool,
    pub has_next: bool,
}

impl<T> Page<T> {
    /// Builds a page from a query that fetched up to `limit + 1` rows.
    pub fn from_overfetch(mut rows: Vec<T>, page: u64, limit: u64) -> Self {
        let has_next = rows.len() as u64 > limit;
        rows.truncate(limit as usize);
        Self {
            items: rows,
            page,
            has_prev: page > 1,
            has_next,
        }
    }
}

use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;
use util::cache::CacheError;

/// Offending course ids from a rejected registration batch, by category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistrationErrors {
    pub course_not_found: Vec<String>,
    pub not_registrable_status: Vec<String>,
    pub schedule_conflict: Vec<String>,
}

impl RegistrationErrors {
    pub fn is_empty(&self) -> bool {
        self.course_not_found.is_empty()
            && self.not_registrable_status.is_empty()
            && self.schedule_conflict.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("Registration rejected")]
    Registration(RegistrationErrors),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

//! Unified error handling for the directory subsystem.
//!
//! Directory and publication operations surface a small typed taxonomy that
//! a transport layer can map 1:1 onto status codes. None of these are retried
//! internally: each represents a client input error or a policy decision,
//! not a transient fault.

use crate::db::DbError;
use thiserror::Error;

/// Errors surfaced by directory and publication operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// The alias or room does not exist.
    #[error("not found")]
    NotFound,

    /// The alias is already bound to a different room.
    #[error("alias is already bound to another room")]
    Conflict,

    /// The request references a room that does not exist, or an alias the
    /// caller's appservice has not reserved.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Authorization denied.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Underlying storage failure, propagated verbatim.
    #[error(transparent)]
    Storage(#[from] DbError),
}

impl DirectoryError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::BadRequest(_) => "bad_request",
            Self::Forbidden(_) => "forbidden",
            Self::Storage(_) => "storage",
        }
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

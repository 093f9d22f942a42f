//! Structured error body returned by every route.

use chrono::{DateTime, SubsecRound, Utc};
use photodesk_core::RepoError;
use serde::Serialize;
use thiserror::Error;

pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_CONFLICT: u16 = 409;
pub const STATUS_INTERNAL: u16 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{status} {path}: {message}")]
pub struct ApiError {
    pub path: String,
    pub message: String,
    pub status: u16,
    pub timestamp: DateTime<Utc>,
}

impl ApiError {
    pub fn new(path: impl Into<String>, message: impl Into<String>, status: u16) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            status,
            timestamp: Utc::now().trunc_subsecs(3),
        }
    }

    pub fn not_found(path: impl Into<String>) -> Self {
        Self::new(path, "Not Found", STATUS_NOT_FOUND)
    }

    /// Maps the core taxonomy onto status codes.
    pub fn from_repo(path: impl Into<String>, err: &RepoError) -> Self {
        let status = match err {
            RepoError::Validation(_) => STATUS_BAD_REQUEST,
            RepoError::NotFound { .. } => STATUS_NOT_FOUND,
            RepoError::Concurrency { .. } => STATUS_CONFLICT,
            RepoError::Db(_) | RepoError::InvalidData(_) => STATUS_INTERNAL,
        };
        Self::new(path, err.to_string(), status)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == STATUS_NOT_FOUND
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

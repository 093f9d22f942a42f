//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage collaborator contract per entity kind.
//! - Isolate SQLite query details from orchestration.
//!
//! # Invariants
//! - Repository writes validate the record before any SQL mutation.
//! - Only repositories assign surrogate keys, versions and `modified_at`.
//! - Versioned updates touch a row only when the stored version matches.

pub mod address_repo;
pub mod photo_repo;

use crate::db::DbError;
use crate::model::address::AddressValidationError;
use crate::model::photo::PhotoValidationError;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

/// Record-level constraint failure, raised before any write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Photo(#[from] PhotoValidationError),
    #[error(transparent)]
    Address(#[from] AddressValidationError),
}

/// Error taxonomy shared by repositories and orchestrators.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{kind} not found: {external_id}")]
    NotFound {
        kind: &'static str,
        external_id: String,
    },
    #[error(
        "{kind} {external_id} was modified concurrently: expected version {expected_version}, found {actual_version}"
    )]
    Concurrency {
        kind: &'static str,
        external_id: String,
        expected_version: u32,
        actual_version: u32,
    },
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("invalid persisted data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<PhotoValidationError> for RepoError {
    fn from(value: PhotoValidationError) -> Self {
        Self::Validation(value.into())
    }
}

impl From<AddressValidationError> for RepoError {
    fn from(value: AddressValidationError) -> Self {
        Self::Validation(value.into())
    }
}

pub(crate) fn to_millis(value: DateTime<Utc>) -> i64 {
    value.timestamp_millis()
}

pub(crate) fn from_millis(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!("timestamp `{value}` out of range in {column}"))
    })
}

//! Persistence orchestrators.
//!
//! # Responsibility
//! - Own transaction boundaries for every logical operation.
//! - Wrap storage results in entity façades and apply null-object
//!   substitution at call sites that must always receive a handle.
//!
//! # Invariants
//! - Each operation acquires its own connection and releases it on return.
//! - Write operations commit or roll back on their own; they never join a
//!   caller transaction.
//! - Writes flush before committing, so returned records are fully populated.

pub mod address_service;
pub mod photo_service;

use crate::db::Database;
use crate::repo::RepoResult;
use rusqlite::{Connection, TransactionBehavior};

/// Runs `op` inside a fresh `BEGIN IMMEDIATE` transaction.
///
/// Commits when `op` succeeds; dropping the transaction on error rolls back.
pub(crate) fn in_write_transaction<T>(
    db: &Database,
    op: impl FnOnce(&Connection) -> RepoResult<T>,
) -> RepoResult<T> {
    let mut conn = db.connect()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let value = op(&tx)?;
    tx.commit()?;
    Ok(value)
}

/// Runs a read-only `op` on a fresh connection.
pub(crate) fn with_read_connection<T>(
    db: &Database,
    op: impl FnOnce(&Connection) -> RepoResult<T>,
) -> RepoResult<T> {
    let conn = db.connect()?;
    op(&conn)
}

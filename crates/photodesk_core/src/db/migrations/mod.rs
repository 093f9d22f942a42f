//! Schema migrations for the photodesk store.
//!
//! # Responsibility
//! - Own the ordered list of schema steps for `photos` and `addresses`.
//! - Bring any older database file up to the latest schema in one transaction.
//!
//! # Invariants
//! - Step numbers start at 1 and increase by exactly one.
//! - `PRAGMA user_version` always equals the last step applied.
//! - A database written by a newer binary is refused, never downgraded.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, Transaction};

/// One forward-only schema step.
struct SchemaStep {
    number: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: [SchemaStep; 2] = [
    SchemaStep {
        number: 1,
        name: "photos",
        sql: include_str!("0001_init.sql"),
    },
    SchemaStep {
        number: 2,
        name: "addresses",
        sql: include_str!("0002_addresses.sql"),
    },
];

/// Schema number this binary writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.len() as u32
}

/// Upgrades `conn` to [`latest_version`].
///
/// No-op when the schema is already current.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let on_disk = schema_version(conn)?;
    let target = latest_version();

    if on_disk > target {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: on_disk,
            latest_supported: target,
        });
    }
    if on_disk == target {
        debug!("event=db_migrate module=db status=skip version={on_disk}");
        return Ok(());
    }

    let tx = conn.transaction()?;
    SCHEMA_STEPS
        .iter()
        .skip_while(|step| step.number <= on_disk)
        .try_for_each(|step| run_step(&tx, step))?;
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from_version={on_disk} to_version={target}");
    Ok(())
}

fn run_step(tx: &Transaction<'_>, step: &SchemaStep) -> DbResult<()> {
    tx.execute_batch(step.sql)?;
    tx.pragma_update(None, "user_version", step.number)?;
    debug!(
        "event=db_migrate_step module=db status=ok step={} name={}",
        step.number, step.name
    );
    Ok(())
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

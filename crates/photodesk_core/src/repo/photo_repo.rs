//! Photo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide save/find/delete/list APIs over the `photos` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `save` inserts unpersisted states and version-checks managed ones.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::identity::{now_millis, ExternalId, Identity, SurrogateKey};
use crate::model::photo::PhotoState;
use crate::repo::{from_millis, to_millis, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const KIND: &str = "photo";

const PHOTO_SELECT_SQL: &str = "SELECT
    id,
    version,
    created_at,
    modified_at,
    external_id,
    file_name,
    file,
    content_type
FROM photos";

/// Storage collaborator for photo records.
pub trait PhotoRepository {
    /// Writes the record and returns the managed copy with key and timestamps.
    fn save(&self, state: &PhotoState) -> RepoResult<PhotoState>;
    fn find_by_external_id(&self, external_id: &str) -> RepoResult<Option<PhotoState>>;
    /// Deletes the record and returns its last stored state.
    fn delete_by_external_id(&self, external_id: &str) -> RepoResult<Option<PhotoState>>;
    fn find_all(&self) -> RepoResult<Vec<PhotoState>>;
    /// Forces pending writes out of the page cache.
    fn flush(&self) -> RepoResult<()>;
}

/// SQLite-backed photo repository.
///
/// Borrows a connection (or transaction) owned by the caller.
pub struct SqlitePhotoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePhotoRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn insert(&self, state: &PhotoState) -> RepoResult<PhotoState> {
        let created_at = state.identity().created_at();
        let modified_at = now_millis();

        self.conn.execute(
            "INSERT INTO photos (
                version,
                created_at,
                modified_at,
                external_id,
                file_name,
                file,
                content_type
            ) VALUES (0, ?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                to_millis(created_at),
                to_millis(modified_at),
                state.external_id().as_str(),
                state.file_name.as_str(),
                state.file.as_slice(),
                state.content_type.as_str(),
            ],
        )?;

        let identity =
            Identity::from_storage(self.conn.last_insert_rowid(), 0, created_at, Some(modified_at));
        Ok(PhotoState::from_storage(
            identity,
            state.external_id().clone(),
            state.file_name.clone(),
            state.file.clone(),
            state.content_type.clone(),
        ))
    }

    fn update(&self, state: &PhotoState) -> RepoResult<PhotoState> {
        let external_id = state.external_id().as_str();
        let expected_version = state.identity().version();
        let Some(id) = state.identity().id() else {
            return Err(RepoError::NotFound {
                kind: KIND,
                external_id: external_id.to_string(),
            });
        };

        let changed = self.conn.execute(
            "UPDATE photos
             SET
                file_name = ?1,
                file = ?2,
                content_type = ?3,
                version = version + 1,
                modified_at = ?4
             WHERE id = ?5
               AND external_id = ?6
               AND version = ?7;",
            params![
                state.file_name.as_str(),
                state.file.as_slice(),
                state.content_type.as_str(),
                to_millis(now_millis()),
                id,
                external_id,
                expected_version,
            ],
        )?;

        if changed == 0 {
            return Err(self.stale_write_error(id, external_id, expected_version)?);
        }

        self.find_by_external_id(external_id)?
            .ok_or_else(|| RepoError::NotFound {
                kind: KIND,
                external_id: external_id.to_string(),
            })
    }

    /// Classifies a versioned update that touched no row.
    ///
    /// A row under the same external id but another key is a replacement of
    /// a deleted record, not a newer version of this one.
    fn stale_write_error(
        &self,
        id: SurrogateKey,
        external_id: &str,
        expected_version: u32,
    ) -> RepoResult<RepoError> {
        let stored: Option<(SurrogateKey, u32)> = self
            .conn
            .query_row(
                "SELECT id, version FROM photos WHERE external_id = ?1;",
                [external_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        Ok(match stored {
            Some((stored_id, actual_version)) if stored_id == id => RepoError::Concurrency {
                kind: KIND,
                external_id: external_id.to_string(),
                expected_version,
                actual_version,
            },
            _ => RepoError::NotFound {
                kind: KIND,
                external_id: external_id.to_string(),
            },
        })
    }
}

impl PhotoRepository for SqlitePhotoRepository<'_> {
    fn save(&self, state: &PhotoState) -> RepoResult<PhotoState> {
        state.validate()?;

        if state.identity().is_persisted() {
            self.update(state)
        } else {
            self.insert(state)
        }
    }

    fn find_by_external_id(&self, external_id: &str) -> RepoResult<Option<PhotoState>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PHOTO_SELECT_SQL} WHERE external_id = ?1;"))?;

        let mut rows = stmt.query([external_id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_photo_row(row)?));
        }

        Ok(None)
    }

    fn delete_by_external_id(&self, external_id: &str) -> RepoResult<Option<PhotoState>> {
        let Some(existing) = self.find_by_external_id(external_id)? else {
            return Ok(None);
        };

        self.conn
            .execute("DELETE FROM photos WHERE external_id = ?1;", [external_id])?;

        Ok(Some(existing))
    }

    fn find_all(&self) -> RepoResult<Vec<PhotoState>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PHOTO_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut states = Vec::new();

        while let Some(row) = rows.next()? {
            states.push(parse_photo_row(row)?);
        }

        Ok(states)
    }

    fn flush(&self) -> RepoResult<()> {
        self.conn.cache_flush()?;
        Ok(())
    }
}

fn parse_photo_row(row: &Row<'_>) -> RepoResult<PhotoState> {
    let external_text: String = row.get("external_id")?;
    let external_id = ExternalId::new(external_text.as_str()).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid external id `{external_text}` in photos.external_id: {err}"
        ))
    })?;

    let modified_at = match row.get::<_, Option<i64>>("modified_at")? {
        Some(value) => Some(from_millis(value, "photos.modified_at")?),
        None => None,
    };

    let identity = Identity::from_storage(
        row.get("id")?,
        row.get("version")?,
        from_millis(row.get("created_at")?, "photos.created_at")?,
        modified_at,
    );

    Ok(PhotoState::from_storage(
        identity,
        external_id,
        row.get("file_name")?,
        row.get::<_, Option<Vec<u8>>>("file")?.unwrap_or_default(),
        row.get("content_type")?,
    ))
}

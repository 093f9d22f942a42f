//! Photo persistence orchestrator.
//!
//! # Responsibility
//! - Provide create/read/update/delete entry points for photo callers.
//! - Rebuild a fresh `Photo` façade from storage on every read.
//!
//! # Invariants
//! - Lookups report absence as `None`; only `try_get` and `remove` substitute
//!   the null façade.
//! - `remove` returns the pre-deletion snapshot; a deleted record is never
//!   resurrected by later lookups.

use crate::db::Database;
use crate::model::photo::{Photo, PhotoState};
use crate::repo::photo_repo::{PhotoRepository, SqlitePhotoRepository};
use crate::repo::{RepoError, RepoResult};
use crate::service::{in_write_transaction, with_read_connection};
use log::{debug, info, warn};

/// Use-case service for photo records.
#[derive(Debug, Clone)]
pub struct PhotoService {
    db: Database,
}

impl PhotoService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Persists a state record and returns the managed photo.
    ///
    /// # Contract
    /// - Validation failures surface before any write.
    /// - Unpersisted states are inserted; managed states take the versioned
    ///   update path and may fail with `RepoError::Concurrency`.
    /// - The returned photo has its surrogate key and timestamps populated.
    pub fn create(&self, state: PhotoState) -> RepoResult<Photo> {
        let result = in_write_transaction(&self.db, |conn| {
            let repo = SqlitePhotoRepository::new(conn);
            let saved = repo.save(&state)?;
            repo.flush()?;
            Ok(saved)
        });
        log_write("photo_create", state.external_id().as_str(), &result);
        result.map(Photo::create)
    }

    /// Creates an empty-content photo from a bare file name.
    pub fn create_from_file_name(&self, file_name: impl Into<String>) -> RepoResult<Photo> {
        self.create(PhotoState::new(file_name, Vec::new(), ""))
    }

    /// Creates a photo from uploaded bytes.
    pub fn create_upload(
        &self,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
        content_type: impl Into<String>,
    ) -> RepoResult<Photo> {
        self.create(PhotoState::new(file_name, bytes, content_type))
    }

    /// Writes changes to a managed record, checking its version.
    ///
    /// Returns `NotFound` for states that were never persisted or have since
    /// been deleted, and `Concurrency` when another writer got there first.
    pub fn update(&self, state: PhotoState) -> RepoResult<Photo> {
        if !state.identity().is_persisted() {
            return Err(RepoError::NotFound {
                kind: "photo",
                external_id: state.external_id().to_string(),
            });
        }

        let result = in_write_transaction(&self.db, |conn| {
            let repo = SqlitePhotoRepository::new(conn);
            let saved = repo.save(&state)?;
            repo.flush()?;
            Ok(saved)
        });
        log_write("photo_update", state.external_id().as_str(), &result);
        result.map(Photo::create)
    }

    pub fn find_by_external_id(&self, external_id: &str) -> RepoResult<Option<Photo>> {
        with_read_connection(&self.db, |conn| {
            SqlitePhotoRepository::new(conn).find_by_external_id(external_id)
        })
        .map(|found| found.map(Photo::create))
    }

    /// Lookup for call sites that always need a handle.
    pub fn try_get(&self, external_id: &str) -> RepoResult<Photo> {
        Ok(self
            .find_by_external_id(external_id)?
            .unwrap_or_else(Photo::null))
    }

    /// Deletes by external id and returns the last known state.
    ///
    /// Missing records yield the null façade.
    pub fn remove(&self, external_id: &str) -> RepoResult<Photo> {
        let removed = in_write_transaction(&self.db, |conn| {
            let repo = SqlitePhotoRepository::new(conn);
            let removed = repo.delete_by_external_id(external_id)?;
            if removed.is_some() {
                repo.flush()?;
            }
            Ok(removed)
        })?;

        match removed {
            Some(state) => {
                info!("event=photo_remove module=service status=ok external_id={external_id}");
                Ok(Photo::create(state))
            }
            None => {
                debug!(
                    "event=photo_remove module=service status=not_found external_id={external_id}"
                );
                Ok(Photo::null())
            }
        }
    }

    /// Lists every photo. No pagination.
    pub fn find_all(&self) -> RepoResult<Vec<Photo>> {
        let states =
            with_read_connection(&self.db, |conn| SqlitePhotoRepository::new(conn).find_all())?;
        Ok(states.into_iter().map(Photo::create).collect())
    }
}

fn log_write(event: &str, external_id: &str, result: &RepoResult<PhotoState>) {
    match result {
        Ok(saved) => info!(
            "event={event} module=service status=ok external_id={external_id} id={} version={}",
            saved.identity().id().unwrap_or_default(),
            saved.identity().version()
        ),
        Err(err @ RepoError::Concurrency { .. }) => warn!(
            "event={event} module=service status=conflict external_id={external_id} error={err}"
        ),
        Err(err) => warn!(
            "event={event} module=service status=error external_id={external_id} error={err}"
        ),
    }
}

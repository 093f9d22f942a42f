//! Address persistence orchestrator.

use crate::db::Database;
use crate::model::address::{Address, AddressInput};
use crate::repo::address_repo::{AddressRepository, SqliteAddressRepository};
use crate::repo::RepoResult;
use crate::service::{in_write_transaction, with_read_connection};
use log::{info, warn};

/// Use-case service for postal addresses.
#[derive(Debug, Clone)]
pub struct AddressService {
    db: Database,
}

impl AddressService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Validates submitted input, builds a fresh record and persists it.
    pub fn create_and_persist(&self, input: &AddressInput) -> RepoResult<Address> {
        input.validate()?;
        self.save(Address::from_input(input))
    }

    /// Inserts an unpersisted address or version-checks a managed one.
    pub fn save(&self, address: Address) -> RepoResult<Address> {
        let result = in_write_transaction(&self.db, |conn| {
            let repo = SqliteAddressRepository::new(conn);
            let saved = repo.save(&address)?;
            repo.flush()?;
            Ok(saved)
        });

        match &result {
            Ok(saved) => info!(
                "event=address_save module=service status=ok external_id={} id={} version={}",
                saved.external_id(),
                saved.identity().id().unwrap_or_default(),
                saved.identity().version()
            ),
            Err(err) => warn!(
                "event=address_save module=service status=error external_id={} error={err}",
                address.external_id()
            ),
        }
        result
    }

    pub fn find_by_external_id(&self, external_id: &str) -> RepoResult<Option<Address>> {
        with_read_connection(&self.db, |conn| {
            SqliteAddressRepository::new(conn).find_by_external_id(external_id)
        })
    }

    /// Lookup that substitutes the null address for missing records.
    pub fn try_get(&self, external_id: &str) -> RepoResult<Address> {
        Ok(self
            .find_by_external_id(external_id)?
            .unwrap_or_else(Address::null))
    }

    /// Deletes by external id, returning the pre-deletion snapshot or the
    /// null address.
    pub fn remove(&self, external_id: &str) -> RepoResult<Address> {
        let removed = in_write_transaction(&self.db, |conn| {
            let repo = SqliteAddressRepository::new(conn);
            let removed = repo.delete_by_external_id(external_id)?;
            repo.flush()?;
            Ok(removed)
        })?;

        info!(
            "event=address_remove module=service status={} external_id={external_id}",
            if removed.is_some() { "ok" } else { "not_found" }
        );
        Ok(removed.unwrap_or_else(Address::null))
    }

    pub fn find_all(&self) -> RepoResult<Vec<Address>> {
        with_read_connection(&self.db, |conn| SqliteAddressRepository::new(conn).find_all())
    }
}

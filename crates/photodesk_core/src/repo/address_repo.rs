//! Address repository contract and SQLite implementation.

use crate::model::address::Address;
use crate::model::identity::{now_millis, ExternalId, Identity};
use crate::repo::{from_millis, to_millis, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const KIND: &str = "address";

const ADDRESS_SELECT_SQL: &str = "SELECT
    id,
    version,
    created_at,
    modified_at,
    external_id,
    house_number,
    street_data,
    street_name,
    street_suffix,
    city,
    postal_code
FROM addresses";

/// Storage collaborator for address records.
pub trait AddressRepository {
    fn save(&self, address: &Address) -> RepoResult<Address>;
    fn find_by_external_id(&self, external_id: &str) -> RepoResult<Option<Address>>;
    fn delete_by_external_id(&self, external_id: &str) -> RepoResult<Option<Address>>;
    fn find_all(&self) -> RepoResult<Vec<Address>>;
    fn flush(&self) -> RepoResult<()>;
}

/// SQLite-backed address repository.
pub struct SqliteAddressRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAddressRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn insert(&self, address: &Address) -> RepoResult<Address> {
        let created_at = address.identity().created_at();
        let modified_at = now_millis();

        self.conn.execute(
            "INSERT INTO addresses (
                version,
                created_at,
                modified_at,
                external_id,
                house_number,
                street_data,
                street_name,
                street_suffix,
                city,
                postal_code
            ) VALUES (0, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                to_millis(created_at),
                to_millis(modified_at),
                address.external_id().as_str(),
                address.house_number.as_deref(),
                address.street_data.as_deref(),
                address.street_name.as_deref(),
                address.street_suffix.as_deref(),
                address.city.as_deref(),
                address.postal_code.as_deref(),
            ],
        )?;

        let identity =
            Identity::from_storage(self.conn.last_insert_rowid(), 0, created_at, Some(modified_at));
        Ok(address.clone().with_identity(identity))
    }

    fn update(&self, address: &Address) -> RepoResult<Address> {
        let external_id = address.external_id().as_str();
        let expected_version = address.identity().version();
        let not_found = || RepoError::NotFound {
            kind: KIND,
            external_id: external_id.to_string(),
        };
        let id = address.identity().id().ok_or_else(not_found)?;

        let changed = self.conn.execute(
            "UPDATE addresses
             SET
                house_number = ?1,
                street_data = ?2,
                street_name = ?3,
                street_suffix = ?4,
                city = ?5,
                postal_code = ?6,
                version = version + 1,
                modified_at = ?7
             WHERE id = ?8
               AND external_id = ?9
               AND version = ?10;",
            params![
                address.house_number.as_deref(),
                address.street_data.as_deref(),
                address.street_name.as_deref(),
                address.street_suffix.as_deref(),
                address.city.as_deref(),
                address.postal_code.as_deref(),
                to_millis(now_millis()),
                id,
                external_id,
                expected_version,
            ],
        )?;

        if changed == 0 {
            // Same external id under another key means the record was replaced.
            let stored: Option<(i64, u32)> = self
                .conn
                .query_row(
                    "SELECT id, version FROM addresses WHERE external_id = ?1;",
                    [external_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;

            return Err(match stored {
                Some((stored_id, actual_version)) if stored_id == id => RepoError::Concurrency {
                    kind: KIND,
                    external_id: external_id.to_string(),
                    expected_version,
                    actual_version,
                },
                _ => not_found(),
            });
        }

        self.find_by_external_id(external_id)?.ok_or_else(not_found)
    }
}

impl AddressRepository for SqliteAddressRepository<'_> {
    fn save(&self, address: &Address) -> RepoResult<Address> {
        address.validate()?;

        if address.identity().is_persisted() {
            self.update(address)
        } else {
            self.insert(address)
        }
    }

    fn find_by_external_id(&self, external_id: &str) -> RepoResult<Option<Address>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ADDRESS_SELECT_SQL} WHERE external_id = ?1;"))?;

        let mut rows = stmt.query([external_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_address_row(row)?)),
            None => Ok(None),
        }
    }

    fn delete_by_external_id(&self, external_id: &str) -> RepoResult<Option<Address>> {
        let existing = self.find_by_external_id(external_id)?;
        if existing.is_some() {
            self.conn
                .execute("DELETE FROM addresses WHERE external_id = ?1;", [external_id])?;
        }
        Ok(existing)
    }

    fn find_all(&self) -> RepoResult<Vec<Address>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ADDRESS_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut addresses = Vec::new();

        while let Some(row) = rows.next()? {
            addresses.push(parse_address_row(row)?);
        }

        Ok(addresses)
    }

    fn flush(&self) -> RepoResult<()> {
        self.conn.cache_flush()?;
        Ok(())
    }
}

fn parse_address_row(row: &Row<'_>) -> RepoResult<Address> {
    let external_text: String = row.get("external_id")?;
    let external_id = ExternalId::new(external_text.as_str()).map_err(|err| {
        RepoError::InvalidData(format!(
            "invalid external id `{external_text}` in addresses.external_id: {err}"
        ))
    })?;

    let modified_at = row
        .get::<_, Option<i64>>("modified_at")?
        .map(|value| from_millis(value, "addresses.modified_at"))
        .transpose()?;

    let identity = Identity::from_storage(
        row.get("id")?,
        row.get("version")?,
        from_millis(row.get("created_at")?, "addresses.created_at")?,
        modified_at,
    );

    let mut address = Address::with_external_id(external_id).with_identity(identity);
    address.house_number = row.get("house_number")?;
    address.street_data = row.get("street_data")?;
    address.street_name = row.get("street_name")?;
    address.street_suffix = row.get("street_suffix")?;
    address.city = row.get("city")?;
    address.postal_code = row.get("postal_code")?;
    Ok(address)
}

//! Core domain logic for photodesk.
//! This crate is the single source of truth for entity identity and
//! lifecycle invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use db::{Database, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::address::{Address, AddressInput, AddressValidationError};
pub use model::identity::{ExternalId, ExternalIdError, Identity, SurrogateKey, NULL_PLACEHOLDER};
pub use model::photo::{Photo, PhotoState, PhotoValidationError};
pub use repo::address_repo::{AddressRepository, SqliteAddressRepository};
pub use repo::photo_repo::{PhotoRepository, SqlitePhotoRepository};
pub use repo::{RepoError, RepoResult, ValidationError};
pub use service::address_service::AddressService;
pub use service::photo_service::PhotoService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

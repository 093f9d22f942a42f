//! Shared identity model embedded by every persisted entity kind.
//!
//! # Responsibility
//! - Carry the surrogate key, optimistic version and audit timestamps.
//! - Provide the caller-facing `ExternalId` distinct from the storage key.
//!
//! # Invariants
//! - `id` is assigned by storage on first write and never changes after.
//! - `version` starts at 0 and only storage advances it.
//! - `created_at` is fixed at construction; `modified_at` is storage-owned.
//! - An `ExternalId` is non-empty and at most 36 characters.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;
use uuid::Uuid;

/// Literal placeholder used by null-object sentinels.
pub const NULL_PLACEHOLDER: &str = "null";

/// Column width reserved for external identifiers (UUID text form).
pub const EXTERNAL_ID_MAX_LEN: usize = 36;

/// Storage-assigned numeric key. Opaque to callers.
pub type SurrogateKey = i64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExternalIdError {
    #[error("external id cannot be empty")]
    Empty,
    #[error("external id must be at most {max} characters, got {0}", max = EXTERNAL_ID_MAX_LEN)]
    TooLong(usize),
}

/// Caller-facing stable identifier.
///
/// Generated values are UUID v4 strings. The type stays string-backed because
/// null sentinels carry the literal `"null"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExternalId(String);

impl ExternalId {
    /// Generates a fresh UUID-shaped identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wraps a caller-provided identifier.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn new(value: impl Into<String>) -> Result<Self, ExternalIdError> {
        let value = value.into();
        let len = value.chars().count();
        if value.trim().is_empty() {
            return Err(ExternalIdError::Empty);
        }
        if len > EXTERNAL_ID_MAX_LEN {
            return Err(ExternalIdError::TooLong(len));
        }
        Ok(Self(value))
    }

    /// The sentinel identifier carried by null objects.
    pub fn null() -> Self {
        Self(NULL_PLACEHOLDER.to_string())
    }

    pub fn is_null_placeholder(&self) -> bool {
        self.0 == NULL_PLACEHOLDER
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ExternalId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ExternalId {
    type Error = ExternalIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ExternalId> for String {
    fn from(value: ExternalId) -> Self {
        value.0
    }
}

impl Default for ExternalId {
    fn default() -> Self {
        Self::generate()
    }
}

/// Surrogate key, version and audit timestamps for one record.
///
/// Fields are private: only the storage layer (crate-internal) may assign the
/// key, bump the version or stamp `modified_at`. Callers can re-apply a value
/// they were handed by cloning it.
///
/// Serialization is one-way. Deserializing always yields a fresh identity,
/// whatever the incoming body carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(skip_deserializing)]
    id: Option<SurrogateKey>,
    #[serde(skip_deserializing)]
    version: u32,
    #[serde(skip_deserializing, default = "now_millis")]
    created_at: DateTime<Utc>,
    #[serde(skip_deserializing)]
    modified_at: Option<DateTime<Utc>>,
}

impl Identity {
    /// Identity of a record that has not been written yet.
    pub fn new() -> Self {
        Self {
            id: None,
            version: 0,
            created_at: now_millis(),
            modified_at: None,
        }
    }

    /// Deterministic identity for null-object sentinels.
    pub fn null() -> Self {
        Self {
            id: None,
            version: 0,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            modified_at: None,
        }
    }

    pub(crate) fn from_storage(
        id: SurrogateKey,
        version: u32,
        created_at: DateTime<Utc>,
        modified_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: Some(id),
            version,
            created_at,
            modified_at,
        }
    }

    pub fn id(&self) -> Option<SurrogateKey> {
        self.id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }

    /// Whether storage has assigned a surrogate key.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl Default for Identity {
    fn default() -> Self {
        Self::new()
    }
}

/// Current time truncated to the millisecond precision storage keeps.
pub(crate) fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

#[cfg(test)]
mod tests {
    use super::{ExternalId, ExternalIdError, Identity};

    #[test]
    fn generated_external_id_has_uuid_shape() {
        let id = ExternalId::generate();
        assert_eq!(id.as_str().len(), 36);
        assert!(!id.is_null_placeholder());
    }

    #[test]
    fn external_id_rejects_empty_and_oversized_values() {
        assert_eq!(ExternalId::new("  ").unwrap_err(), ExternalIdError::Empty);
        assert_eq!(
            ExternalId::new("x".repeat(37)).unwrap_err(),
            ExternalIdError::TooLong(37)
        );
    }

    #[test]
    fn new_identity_is_unpersisted_at_version_zero() {
        let identity = Identity::new();
        assert!(!identity.is_persisted());
        assert_eq!(identity.version(), 0);
        assert!(identity.modified_at().is_none());
    }

    #[test]
    fn deserialized_identity_ignores_storage_fields() {
        let identity: Identity = serde_json::from_value(serde_json::json!({
            "id": 7,
            "version": 3,
            "created_at": "2001-01-01T00:00:00Z",
            "modified_at": "2001-01-02T00:00:00Z"
        }))
        .unwrap();

        assert!(!identity.is_persisted());
        assert_eq!(identity.version(), 0);
        assert!(identity.modified_at().is_none());
        assert!(identity.created_at().timestamp() > 978_307_200);
    }

    #[test]
    fn null_identity_is_deterministic() {
        assert_eq!(Identity::null(), Identity::null());
    }
}

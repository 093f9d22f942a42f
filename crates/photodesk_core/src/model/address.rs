//! Postal address entity and its request-shaped input form.
//!
//! # Responsibility
//! - `Address` is both the durable record and the caller-facing entity.
//! - `AddressInput` carries the field set callers submit, with its own rules.
//!
//! # Invariants
//! - `external_id` is present from construction on and never changes.
//! - Absent optional fields always pass validation.

use crate::model::identity::{ExternalId, Identity, EXTERNAL_ID_MAX_LEN, NULL_PLACEHOLDER};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const POSTAL_CODE_MAX_LEN: usize = 32;

static STREET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\s,'#\.\-]*$").expect("valid street regex"));
static CITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s\.\-]+$").expect("valid city regex"));
static ZIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("valid zip regex"));

const ADDRESS_TYPES: &[&str] = &["PRESENT", "MAILING", "FORMER"];

/// Field constraint failures for addresses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressValidationError {
    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} contains invalid characters")]
    InvalidCharacters { field: &'static str },
    #[error("zip code `{0}` must be a valid 5-digit or 9-digit format (e.g., 12345 or 12345-6789)")]
    InvalidZipCode(String),
    #[error("address type `{0}` must be one of PRESENT|MAILING|FORMER")]
    InvalidAddressType(String),
    #[error("external id must be at most {max} characters", max = EXTERNAL_ID_MAX_LEN)]
    ExternalIdTooLong,
    #[error("null address sentinel cannot be persisted")]
    NullSentinel,
}

/// Address fields as submitted by callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInput {
    pub street1: Option<String>,
    pub street2: Option<String>,
    pub unit_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub address_type: Option<String>,
}

impl AddressInput {
    pub fn validate(&self) -> Result<(), AddressValidationError> {
        check_len("street1", self.street1.as_deref(), 100)?;

        check_len("street2", self.street2.as_deref(), 100)?;
        check_pattern("street2", self.street2.as_deref(), &STREET_RE)?;

        check_len("unit_number", self.unit_number.as_deref(), 100)?;
        check_pattern("unit_number", self.unit_number.as_deref(), &STREET_RE)?;

        check_len("city", self.city.as_deref(), 50)?;
        check_pattern("city", self.city.as_deref(), &CITY_RE)?;

        check_len("state", self.state.as_deref(), 50)?;

        if let Some(zip) = self.zip_code.as_deref() {
            if !ZIP_RE.is_match(zip) {
                return Err(AddressValidationError::InvalidZipCode(zip.to_string()));
            }
        }

        if let Some(kind) = self.address_type.as_deref() {
            if !ADDRESS_TYPES
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(kind))
            {
                return Err(AddressValidationError::InvalidAddressType(kind.to_string()));
            }
        }

        Ok(())
    }
}

/// Durable postal address record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(flatten)]
    identity: Identity,
    #[serde(rename = "uuid", default)]
    external_id: ExternalId,
    pub house_number: Option<String>,
    pub street_data: Option<String>,
    pub street_name: Option<String>,
    pub street_suffix: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    #[serde(rename = "null", default)]
    is_null: bool,
}

impl Address {
    /// Creates an empty unpersisted address with a generated external id.
    pub fn new() -> Self {
        Self::with_external_id(ExternalId::generate())
    }

    pub fn with_external_id(external_id: ExternalId) -> Self {
        Self {
            identity: Identity::new(),
            external_id,
            house_number: None,
            street_data: None,
            street_name: None,
            street_suffix: None,
            city: None,
            postal_code: None,
            is_null: false,
        }
    }

    /// Maps submitted input onto a fresh record.
    ///
    /// `street1` becomes the street name and `street2` the suffix.
    pub fn from_input(input: &AddressInput) -> Self {
        let mut address = Self::new();
        address.street_name = input.street1.clone();
        address.street_suffix = input.street2.clone();
        address.city = input.city.clone();
        address.postal_code = input.zip_code.clone();
        address
    }

    /// Null-object sentinel for lookups that must return a handle.
    pub fn null() -> Self {
        Self {
            identity: Identity::null(),
            external_id: ExternalId::null(),
            house_number: None,
            street_data: None,
            street_name: None,
            street_suffix: None,
            city: None,
            postal_code: None,
            is_null: true,
        }
    }

    pub(crate) fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = identity;
        self
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn external_id(&self) -> &ExternalId {
        &self.external_id
    }

    pub fn is_null(&self) -> bool {
        self.is_null
    }

    /// Record-level checks applied before every write.
    pub fn validate(&self) -> Result<(), AddressValidationError> {
        if self.is_null || self.external_id.is_null_placeholder() {
            return Err(AddressValidationError::NullSentinel);
        }
        if self.external_id.as_str().chars().count() > EXTERNAL_ID_MAX_LEN {
            return Err(AddressValidationError::ExternalIdTooLong);
        }

        check_len("postal_code", self.postal_code.as_deref(), POSTAL_CODE_MAX_LEN)?;
        if let Some(code) = self.postal_code.as_deref() {
            if !ZIP_RE.is_match(code) {
                return Err(AddressValidationError::InvalidZipCode(code.to_string()));
            }
        }

        Ok(())
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::new()
    }
}

fn check_len(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<(), AddressValidationError> {
    match value {
        Some(value) if value.chars().count() > max => {
            Err(AddressValidationError::TooLong { field, max })
        }
        _ => Ok(()),
    }
}

fn check_pattern(
    field: &'static str,
    value: Option<&str>,
    pattern: &Regex,
) -> Result<(), AddressValidationError> {
    match value {
        Some(value) if !pattern.is_match(value) => {
            Err(AddressValidationError::InvalidCharacters { field })
        }
        _ => Ok(()),
    }
}

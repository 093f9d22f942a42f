//! Photo state record and entity façade.
//!
//! # Responsibility
//! - `PhotoState` holds the durable field set persisted in `photos`.
//! - `Photo` is the caller-facing handle rebuilt from a state on every read.
//!
//! # Invariants
//! - Every live `Photo` carries an external id generated at construction.
//! - `Photo::state()` hands out a deep copy; callers never alias internals.
//! - Binary content is never serialized.
//! - A null sentinel can never pass `validate()` and so is never persisted.

use crate::model::identity::{ExternalId, Identity, EXTERNAL_ID_MAX_LEN, NULL_PLACEHOLDER};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub const FILE_NAME_MAX_LEN: usize = 255;
pub const CONTENT_TYPE_MAX_LEN: usize = 255;
pub const DEFAULT_CONTENT_TYPE: &str = "image/png";

static IMAGE_FILE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[^\\/:*?"<>|]+\.(png|jpe?g|gif)$"#).expect("valid image file name regex")
});

/// Field constraint failures for photo records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhotoValidationError {
    #[error("file name cannot be empty")]
    EmptyFileName,
    #[error("file name must be {max} characters or less, got {0}", max = FILE_NAME_MAX_LEN)]
    FileNameTooLong(usize),
    #[error("file name `{0}` must end with .png, .jpg, .jpeg or .gif")]
    InvalidFileName(String),
    #[error("content type must be {max} characters or less, got {0}", max = CONTENT_TYPE_MAX_LEN)]
    ContentTypeTooLong(usize),
    #[error("external id must be at most {max} characters", max = EXTERNAL_ID_MAX_LEN)]
    ExternalIdTooLong,
    #[error("null photo sentinel cannot be persisted")]
    NullSentinel,
}

/// Durable photo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoState {
    #[serde(flatten)]
    identity: Identity,
    /// Serialized as `uuid` to match the external schema naming.
    #[serde(rename = "uuid", default)]
    external_id: ExternalId,
    pub file_name: String,
    /// Raw image bytes. Kept off the wire; served only by download paths.
    #[serde(skip)]
    pub file: Vec<u8>,
    #[serde(default)]
    pub content_type: String,
    #[serde(rename = "null", default)]
    is_null: bool,
}

impl PhotoState {
    /// Creates an unpersisted record with a generated external id.
    pub fn new(
        file_name: impl Into<String>,
        file: Vec<u8>,
        content_type: impl Into<String>,
    ) -> Self {
        Self::with_external_id(ExternalId::generate(), file_name, file, content_type)
    }

    /// Creates an unpersisted record with a caller-provided external id.
    pub fn with_external_id(
        external_id: ExternalId,
        file_name: impl Into<String>,
        file: Vec<u8>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            identity: Identity::new(),
            external_id,
            file_name: file_name.into(),
            file,
            content_type: content_type.into(),
            is_null: false,
        }
    }

    /// Builds the null-object sentinel.
    pub fn create_null() -> Self {
        Self {
            identity: Identity::null(),
            external_id: ExternalId::null(),
            file_name: NULL_PLACEHOLDER.to_string(),
            file: Vec::new(),
            content_type: NULL_PLACEHOLDER.to_string(),
            is_null: true,
        }
    }

    /// Builds a valid record with synthetic values, for fixtures and smoke runs.
    pub fn create_random() -> Self {
        Self::new(
            format!("{}.png", Uuid::new_v4()),
            Vec::new(),
            DEFAULT_CONTENT_TYPE,
        )
    }

    pub(crate) fn from_storage(
        identity: Identity,
        external_id: ExternalId,
        file_name: String,
        file: Vec<u8>,
        content_type: String,
    ) -> Self {
        Self {
            identity,
            external_id,
            file_name,
            file,
            content_type,
            is_null: false,
        }
    }

    /// Returns an independent copy of every field, payload included.
    pub fn copy(&self) -> Self {
        Self {
            identity: self.identity.clone(),
            external_id: self.external_id.clone(),
            file_name: self.file_name.clone(),
            file: self.file.to_vec(),
            content_type: self.content_type.clone(),
            is_null: self.is_null,
        }
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

    /// Checks field constraints required before any write.
    pub fn validate(&self) -> Result<(), PhotoValidationError> {
        if self.is_null || self.external_id.is_null_placeholder() {
            return Err(PhotoValidationError::NullSentinel);
        }
        if self.external_id.as_str().chars().count() > EXTERNAL_ID_MAX_LEN {
            return Err(PhotoValidationError::ExternalIdTooLong);
        }

        let name_len = self.file_name.chars().count();
        if self.file_name.trim().is_empty() {
            return Err(PhotoValidationError::EmptyFileName);
        }
        if name_len > FILE_NAME_MAX_LEN {
            return Err(PhotoValidationError::FileNameTooLong(name_len));
        }
        if !IMAGE_FILE_NAME_RE.is_match(&self.file_name) {
            return Err(PhotoValidationError::InvalidFileName(self.file_name.clone()));
        }

        let content_type_len = self.content_type.chars().count();
        if content_type_len > CONTENT_TYPE_MAX_LEN {
            return Err(PhotoValidationError::ContentTypeTooLong(content_type_len));
        }

        Ok(())
    }
}

/// Caller-facing handle over exactly one `PhotoState`.
///
/// Accessors and mutators delegate to the wrapped state. Only `state()`
/// returns a copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    state: PhotoState,
}

impl Photo {
    /// Wraps a state record. Never fails.
    ///
    /// The external id is already present: states generate it eagerly.
    pub fn create(state: PhotoState) -> Self {
        Self { state }
    }

    /// Façade over the null-object sentinel.
    pub fn null() -> Self {
        Self {
            state: PhotoState::create_null(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.state.is_null()
    }

    pub fn external_id(&self) -> &ExternalId {
        self.state.external_id()
    }

    pub fn identity(&self) -> &Identity {
        self.state.identity()
    }

    pub fn file_name(&self) -> &str {
        &self.state.file_name
    }

    pub fn set_file_name(&mut self, file_name: impl Into<String>) {
        self.state.file_name = file_name.into();
    }

    pub fn file(&self) -> &[u8] {
        &self.state.file
    }

    pub fn set_file(&mut self, file: Vec<u8>) {
        self.state.file = file;
    }

    pub fn content_type(&self) -> &str {
        &self.state.content_type
    }

    pub fn set_content_type(&mut self, content_type: impl Into<String>) {
        self.state.content_type = content_type.into();
    }

    /// Defensive copy of the wrapped record.
    pub fn state(&self) -> PhotoState {
        self.state.copy()
    }

    pub fn into_state(self) -> PhotoState {
        self.state
    }
}

impl From<PhotoState> for Photo {
    fn from(value: PhotoState) -> Self {
        Self::create(value)
    }
}

//! Document domain model.
//!
//! # Responsibility
//! - Define the canonical record exchanged by repository, codecs and service.
//! - Validate identity and payload presence before anything is stored.
//! - Produce the canonical JSON text used when `data` is flattened.
//!
//! # Invariants
//! - `id` is not blank and is 3..=100 characters long.
//! - `tags` keeps caller order; duplicates are allowed.
//! - `data` is never JSON `null`.
//! - Canonical text is compact and keeps object key insertion order.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Minimum accepted id length, in characters.
pub const MIN_ID_CHARS: usize = 3;
/// Maximum accepted id length, in characters.
pub const MAX_ID_CHARS: usize = 100;

/// String key identifying one stored document.
pub type DocumentId = String;

/// Validation errors for document invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentValidationError {
    /// `id` is empty or whitespace only.
    EmptyId,
    /// `id` length is outside `MIN_ID_CHARS..=MAX_ID_CHARS`.
    InvalidIdLength { length: usize },
    /// `data` is absent or JSON `null`.
    MissingData,
}

impl Display for DocumentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "document id cannot be empty"),
            Self::InvalidIdLength { length } => write!(
                f,
                "document id must be {MIN_ID_CHARS}..={MAX_ID_CHARS} characters, got {length}"
            ),
            Self::MissingData => write!(f, "document data is required"),
        }
    }
}

impl Error for DocumentValidationError {}

/// Stored record: string key, ordered tags and an opaque JSON payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    pub tags: Vec<String>,
    pub data: Value,
}

impl Document {
    /// Builds a validated document.
    pub fn new(
        id: impl Into<DocumentId>,
        tags: Vec<String>,
        data: Value,
    ) -> Result<Self, DocumentValidationError> {
        let document = Self {
            id: id.into(),
            tags,
            data,
        };
        document.validate()?;
        Ok(document)
    }

    /// Builds a validated document under a freshly generated id.
    pub fn with_generated_id(
        tags: Vec<String>,
        data: Value,
    ) -> Result<Self, DocumentValidationError> {
        Self::new(generate_id(), tags, data)
    }

    /// Checks every invariant listed in the module docs.
    pub fn validate(&self) -> Result<(), DocumentValidationError> {
        validate_id(&self.id)?;
        if self.data.is_null() {
            return Err(DocumentValidationError::MissingData);
        }
        Ok(())
    }

    /// Returns `data` as canonical JSON text.
    pub fn data_text(&self) -> String {
        canonical_json(&self.data)
    }
}

/// Validates one document id without building a document.
pub fn validate_id(id: &str) -> Result<(), DocumentValidationError> {
    if id.trim().is_empty() {
        return Err(DocumentValidationError::EmptyId);
    }
    let length = id.chars().count();
    if !(MIN_ID_CHARS..=MAX_ID_CHARS).contains(&length) {
        return Err(DocumentValidationError::InvalidIdLength { length });
    }
    Ok(())
}

/// Generates a random globally unique document id.
pub fn generate_id() -> DocumentId {
    Uuid::new_v4().to_string()
}

/// Renders a JSON value as compact, key-order-preserving text.
///
/// Serializing a `Value` into an in-memory string cannot fail: map keys are
/// always strings and numbers are always finite.
pub fn canonical_json(value: &Value) -> String {
    value.to_string()
}

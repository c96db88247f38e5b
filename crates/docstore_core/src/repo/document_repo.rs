//! Document repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Provide insert-if-absent / update-if-present / get / delete over documents.
//! - Keep the concurrent map details inside the storage boundary.
//!
//! # Invariants
//! - Write paths call `Document::validate()` before touching storage.
//! - The existence check and the write happen under one shard lock, so they
//!   are atomic per key.
//! - The store never holds two documents with the same id.
//! - Absence on `get`/`delete` is a normal result, not an error.

use crate::model::document::{Document, DocumentId, DocumentValidationError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for document write operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    Validation(DocumentValidationError),
    Conflict(DocumentId),
    NotFound(DocumentId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Conflict(id) => write!(f, "document already exists: {id}"),
            Self::NotFound(id) => write!(f, "document not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Conflict(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<DocumentValidationError> for RepoError {
    fn from(value: DocumentValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Repository interface for document storage.
///
/// Implementations must be safe to call from many threads at once without
/// external locking.
pub trait DocumentRepository: Send + Sync {
    fn get(&self, id: &str) -> Option<Document>;
    fn add(&self, document: Document) -> RepoResult<Document>;
    fn update(&self, document: Document) -> RepoResult<Document>;
    fn delete(&self, id: &str);
}

impl<R: DocumentRepository + ?Sized> DocumentRepository for Arc<R> {
    fn get(&self, id: &str) -> Option<Document> {
        (**self).get(id)
    }

    fn add(&self, document: Document) -> RepoResult<Document> {
        (**self).add(document)
    }

    fn update(&self, document: Document) -> RepoResult<Document> {
        (**self).update(document)
    }

    fn delete(&self, id: &str) {
        (**self).delete(id)
    }
}

/// Volatile, process-lifetime document store backed by a sharded map.
///
/// Operations on different ids only contend when they hash to the same shard.
#[derive(Debug, Default)]
pub struct InMemoryDocumentRepository {
    documents: DashMap<DocumentId, Document>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }
}

impl DocumentRepository for InMemoryDocumentRepository {
    fn get(&self, id: &str) -> Option<Document> {
        self.documents.get(id).map(|entry| entry.value().clone())
    }

    fn add(&self, document: Document) -> RepoResult<Document> {
        document.validate()?;

        match self.documents.entry(document.id.clone()) {
            Entry::Occupied(_) => Err(RepoError::Conflict(document.id)),
            Entry::Vacant(slot) => {
                slot.insert(document.clone());
                Ok(document)
            }
        }
    }

    fn update(&self, document: Document) -> RepoResult<Document> {
        document.validate()?;

        match self.documents.get_mut(document.id.as_str()) {
            Some(mut stored) => {
                *stored = document.clone();
                Ok(document)
            }
            None => Err(RepoError::NotFound(document.id)),
        }
    }

    fn delete(&self, id: &str) {
        self.documents.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentRepository, InMemoryDocumentRepository, RepoError};
    use crate::model::document::{Document, DocumentValidationError};
    use serde_json::json;

    fn doc(id: &str) -> Document {
        Document {
            id: id.to_string(),
            tags: vec!["a".to_string()],
            data: json!({"k": 1}),
        }
    }

    #[test]
    fn add_rejects_invalid_document_before_storage() {
        let repo = InMemoryDocumentRepository::new();
        let mut invalid = doc("doc-1");
        invalid.data = json!(null);

        let err = repo.add(invalid).unwrap_err();
        assert_eq!(
            err,
            RepoError::Validation(DocumentValidationError::MissingData)
        );
        assert!(repo.is_empty());
    }

    #[test]
    fn update_replaces_stored_value() {
        let repo = InMemoryDocumentRepository::new();
        repo.add(doc("doc-1")).unwrap();

        let mut changed = doc("doc-1");
        changed.tags = vec!["b".to_string(), "b".to_string()];
        repo.update(changed.clone()).unwrap();

        assert_eq!(repo.get("doc-1"), Some(changed));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn contains_tracks_add_and_delete() {
        let repo = InMemoryDocumentRepository::new();
        repo.add(doc("doc-1")).unwrap();
        assert!(repo.contains("doc-1"));

        repo.delete("doc-1");
        assert!(!repo.contains("doc-1"));
    }
}

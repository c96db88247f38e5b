//! Document use-case service.
//!
//! # Responsibility
//! - Provide create/get/update/delete entry points for boundary callers.
//! - Apply id generation and partial-update merge rules.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Update never changes a document id; `data` is always replaced and
//!   `tags` only when supplied.
//! - Absence on get/update is reported as `None`, not as an error.
//! - Delete always succeeds.

use crate::model::document::{generate_id, Document, DocumentValidationError};
use crate::repo::document_repo::{DocumentRepository, RepoError, RepoResult};
use log::{info, warn};
use serde::Deserialize;
use serde_json::Value;

/// Create/update input. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DocumentRequest {
    /// Caller-chosen id; generated on create when absent. Ignored on update.
    pub id: Option<String>,
    /// Replacement tags; empty on create and unchanged on update when absent.
    pub tags: Option<Vec<String>>,
    /// Payload; required on both create and update.
    pub data: Option<Value>,
}

impl DocumentRequest {
    pub fn new(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    fn take_data(&mut self) -> Result<Value, DocumentValidationError> {
        match self.data.take() {
            Some(Value::Null) | None => Err(DocumentValidationError::MissingData),
            Some(value) => Ok(value),
        }
    }
}

/// Use-case service over a document repository.
pub struct DocumentManager<R: DocumentRepository> {
    repo: R,
}

impl<R: DocumentRepository> DocumentManager<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Creates one document.
    ///
    /// # Contract
    /// - Missing `id` is replaced by a generated UUID string.
    /// - Missing `tags` become an empty sequence.
    /// - Returns `Validation` for missing data or an invalid id, `Conflict`
    ///   when the id is taken.
    pub fn create(&self, mut request: DocumentRequest) -> RepoResult<Document> {
        let data = request.take_data()?;
        let id = request.id.take().unwrap_or_else(generate_id);
        let tags = request.tags.take().unwrap_or_default();
        let document = Document::new(id, tags, data)?;

        match self.repo.add(document) {
            Ok(created) => {
                info!(
                    "event=document_create module=service status=ok id={} tags={}",
                    created.id,
                    created.tags.len()
                );
                Ok(created)
            }
            Err(err) => {
                warn!(
                    "event=document_create module=service status=error error={}",
                    err
                );
                Err(err)
            }
        }
    }

    /// Gets one document by id.
    pub fn get(&self, id: &str) -> Option<Document> {
        self.repo.get(id)
    }

    /// Replaces tags (when supplied) and data of an existing document.
    ///
    /// Returns `Ok(None)` when no document has this id, including when it
    /// is deleted concurrently between read and write.
    pub fn update(&self, id: &str, mut request: DocumentRequest) -> RepoResult<Option<Document>> {
        let Some(mut document) = self.repo.get(id) else {
            info!("event=document_update module=service status=not_found id={id}");
            return Ok(None);
        };

        document.data = request.take_data()?;
        if let Some(tags) = request.tags.take() {
            document.tags = tags;
        }

        match self.repo.update(document) {
            Ok(updated) => {
                info!(
                    "event=document_update module=service status=ok id={} tags={}",
                    updated.id,
                    updated.tags.len()
                );
                Ok(Some(updated))
            }
            Err(RepoError::NotFound(_)) => {
                info!("event=document_update module=service status=not_found id={id}");
                Ok(None)
            }
            Err(err) => {
                warn!(
                    "event=document_update module=service status=error id={} error={}",
                    id, err
                );
                Err(err)
            }
        }
    }

    /// Deletes one document; absent ids are a no-op.
    pub fn delete(&self, id: &str) {
        self.repo.delete(id);
        info!("event=document_delete module=service status=ok id={id}");
    }
}

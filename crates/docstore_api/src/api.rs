//! Boundary entry points for an HTTP-style transport.
//!
//! # Responsibility
//! - Parse request bodies into `DocumentRequest`.
//! - Map service results to status codes and response envelopes.
//! - Negotiate the response codec on read from an Accept-style value.
//!
//! # Invariants
//! - Entry points never panic and always return an `ApiResponse`.
//! - Create/update responses are always JSON; only reads are negotiated.
//! - Error bodies are JSON objects `{"error": <code>, "message": <text>}`.

use docstore_core::{
    CodecSelector, Document, DocumentCodec, DocumentManager, DocumentRepository, DocumentRequest,
    InMemoryDocumentRepository, JsonCodec, RepoError, JSON_CONTENT_TYPE,
};
use log::warn;
use serde_json::json;

pub const STATUS_OK: u16 = 200;
pub const STATUS_CREATED: u16 = 201;
pub const STATUS_NO_CONTENT: u16 = 204;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_NOT_FOUND: u16 = 404;
pub const STATUS_CONFLICT: u16 = 409;
pub const STATUS_INTERNAL_ERROR: u16 = 500;

/// Response envelope handed back to the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP-style status code.
    pub status: u16,
    /// Media type of `body`; `None` when there is no body.
    pub content_type: Option<&'static str>,
    pub body: String,
}

impl ApiResponse {
    fn with_body(status: u16, content_type: &'static str, body: String) -> Self {
        Self {
            status,
            content_type: Some(content_type),
            body,
        }
    }

    fn empty(status: u16) -> Self {
        Self {
            status,
            content_type: None,
            body: String::new(),
        }
    }

    fn failure(status: u16, code: &str, message: impl Into<String>) -> Self {
        let body = json!({ "error": code, "message": message.into() }).to_string();
        Self::with_body(status, JSON_CONTENT_TYPE, body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Document endpoints over one manager and one codec table.
pub struct DocumentApi<R: DocumentRepository> {
    manager: DocumentManager<R>,
    codecs: CodecSelector,
}

impl DocumentApi<InMemoryDocumentRepository> {
    /// Fresh volatile store with the standard codec table.
    pub fn in_memory() -> Self {
        Self::new(
            DocumentManager::new(InMemoryDocumentRepository::new()),
            CodecSelector::standard(),
        )
    }
}

impl<R: DocumentRepository> DocumentApi<R> {
    pub fn new(manager: DocumentManager<R>, codecs: CodecSelector) -> Self {
        Self { manager, codecs }
    }

    /// Creates a document from a JSON body `{id?, tags?, data}`.
    ///
    /// 201 with the stored document, 400 on malformed body or validation
    /// failure, 409 when the id is taken.
    pub fn create_document(&self, body: &str) -> ApiResponse {
        let request = match parse_request("create", body) {
            Ok(request) => request,
            Err(response) => return response,
        };

        match self.manager.create(request) {
            Ok(document) => document_response("create", STATUS_CREATED, &document),
            Err(err) => repo_failure("create", err),
        }
    }

    /// Reads one document encoded with the codec chosen from `accept`.
    ///
    /// 200 with the representation and its content type, 404 when absent,
    /// 500 when encoding fails.
    pub fn get_document(&self, id: &str, accept: Option<&str>) -> ApiResponse {
        let Some(document) = self.manager.get(id) else {
            return ApiResponse::failure(
                STATUS_NOT_FOUND,
                "not_found",
                format!("document not found: {id}"),
            );
        };

        encode("get", self.codecs.select(accept), STATUS_OK, &document)
    }

    /// Replaces tags (when supplied) and data of an existing document.
    ///
    /// 200 with the updated document, 404 when absent, 400 on malformed body
    /// or validation failure.
    pub fn update_document(&self, id: &str, body: &str) -> ApiResponse {
        let request = match parse_request("update", body) {
            Ok(request) => request,
            Err(response) => return response,
        };

        match self.manager.update(id, request) {
            Ok(Some(document)) => document_response("update", STATUS_OK, &document),
            Ok(None) => ApiResponse::failure(
                STATUS_NOT_FOUND,
                "not_found",
                format!("document not found: {id}"),
            ),
            Err(err) => repo_failure("update", err),
        }
    }

    /// Deletes one document. Always 204.
    pub fn delete_document(&self, id: &str) -> ApiResponse {
        self.manager.delete(id);
        ApiResponse::empty(STATUS_NO_CONTENT)
    }
}

fn parse_request(op: &str, body: &str) -> Result<DocumentRequest, ApiResponse> {
    serde_json::from_str(body).map_err(|err| {
        warn!(
            "event=api_request module=api op={} status=error error_code=malformed_body error={}",
            op, err
        );
        ApiResponse::failure(
            STATUS_BAD_REQUEST,
            "malformed_body",
            format!("request body is not a valid document request: {err}"),
        )
    })
}

fn document_response(op: &str, status: u16, document: &Document) -> ApiResponse {
    encode(op, &JsonCodec, status, document)
}

fn encode(op: &str, codec: &dyn DocumentCodec, status: u16, document: &Document) -> ApiResponse {
    match codec.serialize(document) {
        Ok(body) => ApiResponse::with_body(status, codec.content_type(), body),
        Err(err) => {
            warn!(
                "event=api_request module=api op={} status=error error_code=serialization_failed error={}",
                op, err
            );
            ApiResponse::failure(STATUS_INTERNAL_ERROR, "serialization_failed", err.to_string())
        }
    }
}

fn repo_failure(op: &str, err: RepoError) -> ApiResponse {
    let (status, code) = match &err {
        RepoError::Validation(_) => (STATUS_BAD_REQUEST, "validation_failed"),
        RepoError::Conflict(_) => (STATUS_CONFLICT, "conflict"),
        RepoError::NotFound(_) => (STATUS_NOT_FOUND, "not_found"),
    };
    warn!(
        "event=api_request module=api op={} status=error error_code={} error={}",
        op, code, err
    );
    ApiResponse::failure(status, code, err.to_string())
}

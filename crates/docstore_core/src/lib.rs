//! Core domain logic for DocStore.
//! Documents, their concurrent in-memory store, and the wire codecs used to
//! hand them out in JSON, XML or MessagePack.

pub mod codec;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use codec::{
    CodecError, CodecOperation, CodecRegistryError, CodecResult, CodecSelector, DocumentCodec,
    JsonCodec, MessagePackCodec, XmlCodec, JSON_CONTENT_TYPE, MSGPACK_CONTENT_TYPE,
    XML_CONTENT_TYPE,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{Document, DocumentId, DocumentValidationError};
pub use repo::document_repo::{
    DocumentRepository, InMemoryDocumentRepository, RepoError, RepoResult,
};
pub use service::document_service::{DocumentManager, DocumentRequest};

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

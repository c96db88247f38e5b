//! Wire codecs for documents and content negotiation.
//!
//! # Responsibility
//! - Convert a `Document` to and from one wire representation per format.
//! - Resolve a requested media type to exactly one codec.
//!
//! # Invariants
//! - Codecs are stateless and never touch the repository.
//! - `deserialize(serialize(doc)) == doc` for every valid document.
//! - Every codec failure surfaces as `CodecError`, never as a raw lower-level
//!   error or a repository error.
//! - Formats without a native JSON tree (XML, MessagePack) carry `data` as
//!   canonical JSON text and re-parse it on read.

use crate::model::document::Document;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod json;
pub mod msgpack;
pub mod selector;
pub mod xml;

pub use json::JsonCodec;
pub use msgpack::MessagePackCodec;
pub use selector::{normalize_media_type, CodecRegistryError, CodecSelector};
pub use xml::XmlCodec;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const XML_CONTENT_TYPE: &str = "application/xml";
pub const MSGPACK_CONTENT_TYPE: &str = "application/x-msgpack";

pub type CodecResult<T> = Result<T, CodecError>;

/// Reversible encoder/decoder for one wire format.
pub trait DocumentCodec: Send + Sync {
    /// Constant media type identifying this format.
    fn content_type(&self) -> &'static str;

    /// Encodes one document. Output is a deterministic function of the input.
    fn serialize(&self, document: &Document) -> CodecResult<String>;

    /// Decodes one representation and validates the resulting document.
    fn deserialize(&self, representation: &str) -> CodecResult<Document>;
}

/// Direction of a failed codec call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecOperation {
    Serialize,
    Deserialize,
}

impl Display for CodecOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize => write!(f, "serialization"),
            Self::Deserialize => write!(f, "deserialization"),
        }
    }
}

/// Serialization error raised by any codec.
///
/// Carries the format label, the direction and the underlying cause, which
/// stays reachable through `Error::source`.
#[derive(Debug)]
pub struct CodecError {
    format: &'static str,
    operation: CodecOperation,
    message: String,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl CodecError {
    pub fn new(
        format: &'static str,
        operation: CodecOperation,
        message: impl Into<String>,
    ) -> Self {
        Self {
            format,
            operation,
            message: message.into(),
            source: None,
        }
    }

    pub fn serialize(
        format: &'static str,
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        Self::new(format, CodecOperation::Serialize, message).with_source(source)
    }

    pub fn deserialize(
        format: &'static str,
        message: impl Into<String>,
        source: impl Error + Send + Sync + 'static,
    ) -> Self {
        Self::new(format, CodecOperation::Deserialize, message).with_source(source)
    }

    /// Failure for blank input, shared by every codec.
    pub fn empty_input(format: &'static str) -> Self {
        Self::new(
            format,
            CodecOperation::Deserialize,
            "representation cannot be empty",
        )
    }

    fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Short format label, e.g. `xml`.
    pub fn format(&self) -> &'static str {
        self.format
    }

    pub fn operation(&self) -> CodecOperation {
        self.operation
    }
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} error: {}", self.format, self.operation, self.message)?;
        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn Error + 'static))
    }
}

/// Parses canonical JSON text back into a value, as flattened by XML and
/// MessagePack.
pub(crate) fn parse_data_text(
    format: &'static str,
    text: &str,
) -> CodecResult<serde_json::Value> {
    serde_json::from_str(text)
        .map_err(|err| CodecError::deserialize(format, "data is not valid JSON text", err))
}

/// Validates a decoded document, reporting violations as codec failures.
pub(crate) fn validated(format: &'static str, document: Document) -> CodecResult<Document> {
    document
        .validate()
        .map_err(|err| CodecError::deserialize(format, "decoded document is invalid", err))?;
    Ok(document)
}

//! JSON codec: the document's in-memory shape is already the wire shape.

use super::{validated, CodecError, CodecResult, DocumentCodec, JSON_CONTENT_TYPE};
use crate::model::document::Document;
use serde::Deserialize;
use serde_json::Value;

const FORMAT: &str = "json";

/// Wire shape accepted on read. `tags` may be omitted.
#[derive(Deserialize)]
struct JsonDocument {
    id: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    data: Value,
}

/// Encodes `{"id":…,"tags":[…],"data":<json>}` with `data` nested as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl DocumentCodec for JsonCodec {
    fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }

    fn serialize(&self, document: &Document) -> CodecResult<String> {
        serde_json::to_string(document)
            .map_err(|err| CodecError::serialize(FORMAT, "failed to encode document", err))
    }

    fn deserialize(&self, representation: &str) -> CodecResult<Document> {
        if representation.trim().is_empty() {
            return Err(CodecError::empty_input(FORMAT));
        }

        let decoded: JsonDocument = serde_json::from_str(representation)
            .map_err(|err| CodecError::deserialize(FORMAT, "malformed document", err))?;

        validated(
            FORMAT,
            Document {
                id: decoded.id,
                tags: decoded.tags,
                data: decoded.data,
            },
        )
    }
}

//! MessagePack codec.
//!
//! Encodes a positional 3-element array `[id, tags, data-json-text]` and
//! base64-encodes the bytes (standard alphabet, padded) so the result travels
//! as text like the other formats.

use super::{parse_data_text, validated, CodecError, CodecResult, DocumentCodec};
use super::MSGPACK_CONTENT_TYPE;
use crate::model::document::Document;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

const FORMAT: &str = "msgpack";

/// Borrowed write-side record. Field order is the wire position.
#[derive(Serialize)]
struct PackedDocumentRef<'a> {
    id: &'a str,
    tags: &'a [String],
    data: String,
}

/// Owned read-side record. A nil `tags` element decodes to no tags.
#[derive(Deserialize)]
struct PackedDocument {
    id: String,
    tags: Option<Vec<String>>,
    data: String,
}

/// Encodes documents as base64 MessagePack tuples.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessagePackCodec;

impl DocumentCodec for MessagePackCodec {
    fn content_type(&self) -> &'static str {
        MSGPACK_CONTENT_TYPE
    }

    fn serialize(&self, document: &Document) -> CodecResult<String> {
        let packed = PackedDocumentRef {
            id: &document.id,
            tags: &document.tags,
            data: document.data_text(),
        };
        // `to_vec` writes structs as arrays, which gives the positional layout.
        let bytes = rmp_serde::to_vec(&packed)
            .map_err(|err| CodecError::serialize(FORMAT, "failed to pack document", err))?;
        Ok(STANDARD.encode(bytes))
    }

    fn deserialize(&self, representation: &str) -> CodecResult<Document> {
        let encoded = representation.trim();
        if encoded.is_empty() {
            return Err(CodecError::empty_input(FORMAT));
        }

        let bytes = STANDARD
            .decode(encoded)
            .map_err(|err| CodecError::deserialize(FORMAT, "invalid base64 payload", err))?;
        let packed: PackedDocument = rmp_serde::from_slice(&bytes)
            .map_err(|err| CodecError::deserialize(FORMAT, "malformed document tuple", err))?;
        let data = parse_data_text(FORMAT, &packed.data)?;

        validated(
            FORMAT,
            Document {
                id: packed.id,
                tags: packed.tags.unwrap_or_default(),
                data,
            },
        )
    }
}

//! Content negotiation: explicit media type -> codec table.

use super::{DocumentCodec, JsonCodec, MessagePackCodec, XmlCodec};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Codec registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecRegistryError {
    InvalidContentType(String),
    DuplicateContentType(String),
}

impl Display for CodecRegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidContentType(value) => write!(f, "content type is invalid: `{value}`"),
            Self::DuplicateContentType(value) => {
                write!(f, "content type already registered: {value}")
            }
        }
    }
}

impl Error for CodecRegistryError {}

/// Maps requested media types to codecs, falling back to a default codec.
///
/// Built once and shared read-only; selection never fails.
pub struct CodecSelector {
    codecs: BTreeMap<String, Arc<dyn DocumentCodec>>,
    fallback: Arc<dyn DocumentCodec>,
}

impl CodecSelector {
    /// Creates a selector holding only `fallback`, which is also registered
    /// under its own content type.
    pub fn new(fallback: Arc<dyn DocumentCodec>) -> Self {
        let mut codecs = BTreeMap::new();
        codecs.insert(
            fallback.content_type().to_ascii_lowercase(),
            Arc::clone(&fallback),
        );
        Self { codecs, fallback }
    }

    /// JSON (default), XML and MessagePack.
    pub fn standard() -> Self {
        let mut selector = Self::new(Arc::new(JsonCodec));
        selector.insert(Arc::new(XmlCodec));
        selector.insert(Arc::new(MessagePackCodec));
        selector
    }

    /// Registers one more codec under its content type.
    pub fn register(&mut self, codec: Arc<dyn DocumentCodec>) -> Result<(), CodecRegistryError> {
        let raw = codec.content_type();
        let key = match normalize_media_type(raw) {
            Some(key) if key == raw.trim().to_ascii_lowercase() => key,
            _ => return Err(CodecRegistryError::InvalidContentType(raw.to_string())),
        };
        if self.codecs.contains_key(key.as_str()) {
            return Err(CodecRegistryError::DuplicateContentType(key));
        }

        self.codecs.insert(key, codec);
        Ok(())
    }

    // Standard codecs have distinct constant content types.
    fn insert(&mut self, codec: Arc<dyn DocumentCodec>) {
        self.codecs
            .insert(codec.content_type().to_ascii_lowercase(), codec);
    }

    /// Resolves a media type header value to a codec.
    ///
    /// Absent, blank and unrecognized values resolve to the fallback codec.
    pub fn select(&self, media_type: Option<&str>) -> &dyn DocumentCodec {
        media_type
            .and_then(normalize_media_type)
            .and_then(|key| self.codecs.get(key.as_str()))
            .unwrap_or(&self.fallback)
            .as_ref()
    }

    /// Returns one codec by exact (case-insensitive) content type.
    pub fn get(&self, content_type: &str) -> Option<Arc<dyn DocumentCodec>> {
        self.codecs
            .get(content_type.trim().to_ascii_lowercase().as_str())
            .cloned()
    }

    /// Returns sorted registered content types.
    pub fn content_types(&self) -> Vec<String> {
        self.codecs.keys().cloned().collect()
    }

    pub fn default_content_type(&self) -> &'static str {
        self.fallback.content_type()
    }

    pub fn len(&self) -> usize {
        self.codecs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }
}

impl Default for CodecSelector {
    fn default() -> Self {
        Self::standard()
    }
}

/// Reduces a header value to a lowercase bare media type.
///
/// Drops parameters after the first `;` and trims. A multi-valued list is
/// not split, so it only matches a codec registered under the same text.
/// Returns `None` when nothing is left.
pub fn normalize_media_type(header: &str) -> Option<String> {
    let bare = header.split(';').next().unwrap_or_default().trim();
    if bare.is_empty() {
        return None;
    }
    Some(bare.to_ascii_lowercase())
}

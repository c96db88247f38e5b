//! XML codec.
//!
//! Wire shape:
//! `<document><id>…</id><tags><tag>…</tag>…</tags><data>…</data></document>`
//!
//! # Invariants
//! - `data` is written as escaped canonical JSON text and re-parsed on read.
//! - Leaf text is preserved exactly; whitespace is only ignored between
//!   elements.
//! - A missing `<tags>` decodes to no tags; a missing `<id>` or `<data>` is
//!   an error.
//! - Output carries no declaration and no indentation; both are accepted on
//!   input, as are comments and processing instructions.
//! - Control characters other than tab and line feed are written as
//!   character references; NUL cannot be written at all.

use super::{parse_data_text, validated, CodecError, CodecOperation, CodecResult};
use super::{DocumentCodec, XML_CONTENT_TYPE};
use crate::model::document::Document;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::borrow::Cow;
use std::error::Error;
use std::fmt::Write as _;

const FORMAT: &str = "xml";

const ROOT: &str = "document";
const ID: &str = "id";
const TAGS: &str = "tags";
const TAG: &str = "tag";
const DATA: &str = "data";

/// Encodes documents as XML with `data` flattened to JSON text.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlCodec;

impl DocumentCodec for XmlCodec {
    fn content_type(&self) -> &'static str {
        XML_CONTENT_TYPE
    }

    fn serialize(&self, document: &Document) -> CodecResult<String> {
        let mut writer = Writer::new(Vec::new());

        emit(&mut writer, Event::Start(BytesStart::new(ROOT)))?;
        write_leaf(&mut writer, ID, &document.id)?;
        emit(&mut writer, Event::Start(BytesStart::new(TAGS)))?;
        for tag in &document.tags {
            write_leaf(&mut writer, TAG, tag)?;
        }
        emit(&mut writer, Event::End(BytesEnd::new(TAGS)))?;
        write_leaf(&mut writer, DATA, &document.data_text())?;
        emit(&mut writer, Event::End(BytesEnd::new(ROOT)))?;

        String::from_utf8(writer.into_inner())
            .map_err(|err| CodecError::serialize(FORMAT, "writer produced invalid UTF-8", err))
    }

    fn deserialize(&self, representation: &str) -> CodecResult<Document> {
        if representation.trim().is_empty() {
            return Err(CodecError::empty_input(FORMAT));
        }

        let fields = parse_fields(representation)?;
        let id = fields.id.ok_or_else(|| malformed("missing <id> element"))?;
        let data_text = fields
            .data
            .ok_or_else(|| malformed("missing <data> element"))?;
        let data = parse_data_text(FORMAT, &data_text)?;

        validated(
            FORMAT,
            Document {
                id,
                tags: fields.tags,
                data,
            },
        )
    }
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> CodecResult<()> {
    writer
        .write_event(event)
        .map_err(|err| CodecError::serialize(FORMAT, "failed to write xml event", err))
}

fn write_leaf(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> CodecResult<()> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::from_escaped(escape_text(text)?)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn escape_text(text: &str) -> CodecResult<Cow<'_, str>> {
    if text.contains('\0') {
        return Err(CodecError::new(
            FORMAT,
            CodecOperation::Serialize,
            "NUL character cannot be represented in xml",
        ));
    }

    let escaped = partial_escape(text);
    if !escaped.chars().any(needs_char_ref) {
        return Ok(escaped);
    }

    let mut out = String::with_capacity(escaped.len() + 8);
    for ch in escaped.chars() {
        if needs_char_ref(ch) {
            let _ = write!(out, "&#x{:X};", u32::from(ch));
        } else {
            out.push(ch);
        }
    }
    Ok(Cow::Owned(out))
}

// Parsers normalize raw CR and reject the remaining C0 range.
fn needs_char_ref(ch: char) -> bool {
    ch < ' ' && ch != '\t' && ch != '\n'
}

fn malformed(message: &str) -> CodecError {
    CodecError::new(FORMAT, CodecOperation::Deserialize, message)
}

fn read_failure(message: &str, err: impl Error + Send + Sync + 'static) -> CodecError {
    CodecError::deserialize(FORMAT, message, err)
}

/// Raw field values collected while walking the element tree.
#[derive(Debug, Default)]
struct XmlFields {
    id: Option<String>,
    tags: Vec<String>,
    data: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leaf {
    Id,
    Tag,
    Data,
}

/// Position of the reader inside the expected element tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    BeforeRoot,
    Root,
    Tags,
    Leaf(Leaf),
    AfterRoot,
}

fn parse_fields(representation: &str) -> CodecResult<XmlFields> {
    let mut reader = Reader::from_str(representation);
    let mut fields = XmlFields::default();
    let mut scope = Scope::BeforeRoot;
    let mut text = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|err| read_failure("malformed xml", err))?;

        match event {
            Event::Start(start) => {
                scope = open_element(scope, start.name().as_ref(), &mut fields)?;
                text.clear();
            }
            Event::Empty(start) => {
                let opened = open_element(scope, start.name().as_ref(), &mut fields)?;
                text.clear();
                scope = close_element(opened, &mut text, &mut fields)?;
            }
            Event::End(_) => {
                // Reader checks that end names match their start tags.
                scope = close_element(scope, &mut text, &mut fields)?;
            }
            Event::Text(content) => {
                let unescaped = content
                    .unescape()
                    .map_err(|err| read_failure("invalid escape sequence", err))?;
                if matches!(scope, Scope::Leaf(_)) {
                    text.push_str(&unescaped);
                } else if !unescaped.trim().is_empty() {
                    return Err(malformed("unexpected text outside a leaf element"));
                }
            }
            Event::CData(content) => {
                if !matches!(scope, Scope::Leaf(_)) {
                    return Err(malformed("unexpected CDATA outside a leaf element"));
                }
                let raw = std::str::from_utf8(&content)
                    .map_err(|err| read_failure("CDATA is not valid UTF-8", err))?;
                text.push_str(raw);
            }
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if scope != Scope::AfterRoot {
        return Err(malformed("missing or unterminated <document> element"));
    }
    Ok(fields)
}

fn open_element(scope: Scope, name: &[u8], fields: &mut XmlFields) -> CodecResult<Scope> {
    let next = match (scope, name) {
        (Scope::BeforeRoot, b"document") => Scope::Root,
        (Scope::Root, b"id") => {
            if fields.id.is_some() {
                return Err(malformed("duplicate <id> element"));
            }
            Scope::Leaf(Leaf::Id)
        }
        (Scope::Root, b"tags") => Scope::Tags,
        (Scope::Root, b"data") => {
            if fields.data.is_some() {
                return Err(malformed("duplicate <data> element"));
            }
            Scope::Leaf(Leaf::Data)
        }
        (Scope::Tags, b"tag") => Scope::Leaf(Leaf::Tag),
        (Scope::AfterRoot, _) => return Err(malformed("content after </document>")),
        _ => {
            return Err(malformed(&format!(
                "unexpected element <{}>",
                String::from_utf8_lossy(name)
            )))
        }
    };
    Ok(next)
}

fn close_element(scope: Scope, text: &mut String, fields: &mut XmlFields) -> CodecResult<Scope> {
    let next = match scope {
        Scope::Leaf(Leaf::Id) => {
            fields.id = Some(std::mem::take(text));
            Scope::Root
        }
        Scope::Leaf(Leaf::Tag) => {
            fields.tags.push(std::mem::take(text));
            Scope::Tags
        }
        Scope::Leaf(Leaf::Data) => {
            fields.data = Some(std::mem::take(text));
            Scope::Root
        }
        Scope::Tags => Scope::Root,
        Scope::Root => Scope::AfterRoot,
        Scope::BeforeRoot | Scope::AfterRoot => {
            return Err(malformed("unbalanced closing tag"));
        }
    };
    Ok(next)
}

use docstore_core::{
    CodecSelector, Document, DocumentCodec, JsonCodec, MessagePackCodec, XmlCodec,
    JSON_CONTENT_TYPE, MSGPACK_CONTENT_TYPE, XML_CONTENT_TYPE,
};
use proptest::prelude::*;
use serde_json::{json, Value};

fn codecs() -> [&'static dyn DocumentCodec; 3] {
    [&JsonCodec, &XmlCodec, &MessagePackCodec]
}

fn assert_roundtrip(document: &Document) {
    for codec in codecs() {
        let encoded = codec.serialize(document).unwrap();
        let decoded = codec.deserialize(&encoded).unwrap();
        assert_eq!(&decoded, document, "{} roundtrip", codec.content_type());
    }
}

#[test]
fn roundtrip_preserves_edge_case_documents() {
    let cases = [
        Document::new("doc-1", vec![], json!({})).unwrap(),
        Document::new(
            "doc-2",
            vec!["dup".into(), "dup".into(), "".into(), "  spaced  ".into()],
            json!([1, "two", null, false, 3.5]),
        )
        .unwrap(),
        Document::new(
            "<id & \"quotes\">",
            vec!["<tag>".into(), "a&b".into(), "'single'".into()],
            json!({"markup": "</data><data>", "amp": "&amp;"}),
        )
        .unwrap(),
        Document::new("ünïcødé-ид", vec!["標籤".into()], json!("plain scalar")).unwrap(),
        Document::new("doc-5", vec!["x".into()], json!(42)).unwrap(),
        Document::new(
            "doc-6",
            vec![],
            json!({"z": {"y": [{"x": 1}, []]}, "a": {}, "m": -0.25, "big": 18446744073709551615u64}),
        )
        .unwrap(),
    ];

    for document in &cases {
        assert_roundtrip(document);
    }
}

#[test]
fn flattening_codecs_keep_data_key_order() {
    let document = Document::new("doc-1", vec![], json!({"b": 1, "a": 2, "c": {"z": 0, "y": 1}}))
        .unwrap();
    for codec in codecs() {
        let decoded = codec
            .deserialize(&codec.serialize(&document).unwrap())
            .unwrap();
        assert_eq!(
            decoded.data_text(),
            r#"{"b":1,"a":2,"c":{"z":0,"y":1}}"#,
            "{}",
            codec.content_type()
        );
    }
}

#[test]
fn serialization_is_deterministic() {
    let document =
        Document::new("doc-1", vec!["a".into()], json!({"k": [1, 2, {"n": null}]})).unwrap();
    for codec in codecs() {
        assert_eq!(
            codec.serialize(&document).unwrap(),
            codec.serialize(&document.clone()).unwrap()
        );
    }
}

#[test]
fn codecs_report_their_content_types() {
    assert_eq!(JsonCodec.content_type(), "application/json");
    assert_eq!(XmlCodec.content_type(), "application/xml");
    assert_eq!(MessagePackCodec.content_type(), "application/x-msgpack");
}

#[test]
fn selector_resolves_known_types_and_defaults_to_json() {
    let selector = CodecSelector::standard();

    let cases = [
        (None, JSON_CONTENT_TYPE),
        (Some(""), JSON_CONTENT_TYPE),
        (Some("   "), JSON_CONTENT_TYPE),
        (Some("text/plain"), JSON_CONTENT_TYPE),
        (Some("*/*"), JSON_CONTENT_TYPE),
        (Some("application/json; charset=utf-8"), JSON_CONTENT_TYPE),
        (Some("application/xml"), XML_CONTENT_TYPE),
        (Some("APPLICATION/XML"), XML_CONTENT_TYPE),
        (Some(" application/x-msgpack ;q=1"), MSGPACK_CONTENT_TYPE),
        (Some("application/x-msgpack"), MSGPACK_CONTENT_TYPE),
        (Some("application/xml, application/json"), JSON_CONTENT_TYPE),
        (Some("application/x-msgpack, application/xml"), JSON_CONTENT_TYPE),
        (Some("text/html, application/xml"), JSON_CONTENT_TYPE),
    ];

    for (header, expected) in cases {
        assert_eq!(
            selector.select(header).content_type(),
            expected,
            "header: {header:?}"
        );
    }
}

#[test]
fn codec_errors_never_look_like_repository_errors() {
    for codec in codecs() {
        let err = codec.deserialize("definitely not a document").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("deserialization error"), "{message}");
        assert!(!message.contains("not found"));
        assert!(!message.contains("already exists"));
    }
}

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        any::<u64>().prop_map(Value::from),
        any::<f64>()
            .prop_filter("json numbers are finite", |n| n.is_finite())
            .prop_map(Value::from),
        "[a-zA-Z0-9 <>&\"'_.-]{0,12}".prop_map(Value::from),
        "\\PC{0,8}".prop_map(Value::from),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    json_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::vec(("[a-z<&>\"]{0,6}|\\PC{0,6}", inner), 0..4).prop_map(|entries| {
                let mut map = serde_json::Map::new();
                for (key, value) in entries {
                    map.insert(key, value);
                }
                Value::Object(map)
            }),
        ]
    })
}

fn document() -> impl Strategy<Value = Document> {
    (
        "[a-zA-Z0-9_<>&' -]{3,40}|\\PC{3,24}",
        prop::collection::vec("[a-zA-Z0-9 <>&\"'_.-]{0,10}|\\PC{0,8}", 0..6),
        json_value(),
    )
        .prop_filter_map("id and data must be valid", |(id, tags, data)| {
            Document::new(id, tags, data).ok()
        })
}

proptest! {
    #[test]
    fn prop_every_codec_roundtrips_valid_documents(document in document()) {
        for codec in codecs() {
            let encoded = codec.serialize(&document).unwrap();
            let decoded = codec.deserialize(&encoded).unwrap();
            prop_assert_eq!(&decoded, &document);
        }
    }
}

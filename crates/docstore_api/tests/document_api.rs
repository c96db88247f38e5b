use docstore_api::{
    ApiResponse, DocumentApi, STATUS_BAD_REQUEST, STATUS_CONFLICT, STATUS_CREATED,
    STATUS_NOT_FOUND, STATUS_NO_CONTENT, STATUS_OK,
};
use docstore_core::{
    Document, DocumentCodec, JsonCodec, MessagePackCodec, XmlCodec, JSON_CONTENT_TYPE,
    MSGPACK_CONTENT_TYPE, XML_CONTENT_TYPE,
};
use serde_json::{json, Value};

fn created_id(response: &ApiResponse) -> String {
    assert_eq!(response.status, STATUS_CREATED, "{}", response.body);
    JsonCodec.deserialize(&response.body).unwrap().id
}

fn error_code(response: &ApiResponse) -> String {
    let body: Value = serde_json::from_str(&response.body).unwrap();
    body["error"].as_str().unwrap().to_string()
}

#[test]
fn create_returns_stored_document_as_json() {
    let api = DocumentApi::in_memory();
    let response = api.create_document(r#"{"tags":["a","b"],"data":{"k":1}}"#);

    assert_eq!(response.status, STATUS_CREATED);
    assert_eq!(response.content_type, Some(JSON_CONTENT_TYPE));
    let document = JsonCodec.deserialize(&response.body).unwrap();
    assert!(!document.id.is_empty());
    assert_eq!(document.tags, vec!["a", "b"]);
    assert_eq!(document.data, json!({"k": 1}));
}

#[test]
fn get_negotiates_representation_from_accept_value() {
    let api = DocumentApi::in_memory();
    let id = created_id(&api.create_document(
        r#"{"id":"doc-1","tags":["x"],"data":{"b":[1,2],"a":"text"}}"#,
    ));
    let expected = Document::new(id.as_str(), vec!["x".into()], json!({"b": [1, 2], "a": "text"}))
        .unwrap();

    let cases: [(Option<&str>, &str, &dyn DocumentCodec); 5] = [
        (None, JSON_CONTENT_TYPE, &JsonCodec),
        (Some("text/plain"), JSON_CONTENT_TYPE, &JsonCodec),
        (Some("application/json; charset=utf-8"), JSON_CONTENT_TYPE, &JsonCodec),
        (Some("application/xml"), XML_CONTENT_TYPE, &XmlCodec),
        (Some("application/x-msgpack"), MSGPACK_CONTENT_TYPE, &MessagePackCodec),
    ];

    for (accept, content_type, codec) in cases {
        let response = api.get_document(&id, accept);
        assert_eq!(response.status, STATUS_OK);
        assert_eq!(response.content_type, Some(content_type));
        assert_eq!(codec.deserialize(&response.body).unwrap(), expected);
    }
}

#[test]
fn get_xml_wire_shape_matches_contract() {
    let api = DocumentApi::in_memory();
    api.create_document(r#"{"id":"doc-1","tags":["a","b"],"data":{"k":1}}"#);

    let response = api.get_document("doc-1", Some("application/xml"));
    assert_eq!(
        response.body,
        r#"<document><id>doc-1</id><tags><tag>a</tag><tag>b</tag></tags><data>{"k":1}</data></document>"#
    );
}

#[test]
fn get_unknown_id_is_not_found() {
    let api = DocumentApi::in_memory();
    let response = api.get_document("missing-1", Some("application/xml"));

    assert_eq!(response.status, STATUS_NOT_FOUND);
    assert_eq!(error_code(&response), "not_found");
}

#[test]
fn create_maps_validation_and_conflict_errors() {
    let api = DocumentApi::in_memory();

    let missing_data = api.create_document(r#"{"id":"doc-1","tags":[]}"#);
    assert_eq!(missing_data.status, STATUS_BAD_REQUEST);
    assert_eq!(error_code(&missing_data), "validation_failed");

    let short_id = api.create_document(r#"{"id":"ab","data":1}"#);
    assert_eq!(short_id.status, STATUS_BAD_REQUEST);

    created_id(&api.create_document(r#"{"id":"doc-1","data":1}"#));
    let conflict = api.create_document(r#"{"id":"doc-1","data":2}"#);
    assert_eq!(conflict.status, STATUS_CONFLICT);
    assert_eq!(error_code(&conflict), "conflict");
}

#[test]
fn update_missing_returns_not_found_then_create_succeeds() {
    let api = DocumentApi::in_memory();

    let response = api.update_document("missing-1", r#"{"data":{"k":1}}"#);
    assert_eq!(response.status, STATUS_NOT_FOUND);

    let created = api.create_document(r#"{"id":"missing-1","data":{"k":1}}"#);
    assert_eq!(created.status, STATUS_CREATED);
}

#[test]
fn update_merges_tags_and_replaces_data() {
    let api = DocumentApi::in_memory();
    created_id(&api.create_document(r#"{"id":"doc-1","tags":["keep"],"data":{"v":1}}"#));

    let response = api.update_document("doc-1", r#"{"data":{"v":2}}"#);
    assert_eq!(response.status, STATUS_OK);
    assert_eq!(response.content_type, Some(JSON_CONTENT_TYPE));
    let updated = JsonCodec.deserialize(&response.body).unwrap();
    assert_eq!(updated.tags, vec!["keep"]);
    assert_eq!(updated.data, json!({"v": 2}));

    let invalid = api.update_document("doc-1", r#"{"tags":["x"]}"#);
    assert_eq!(invalid.status, STATUS_BAD_REQUEST);
}

#[test]
fn delete_is_idempotent() {
    let api = DocumentApi::in_memory();
    created_id(&api.create_document(r#"{"id":"doc-1","data":1}"#));

    assert_eq!(api.delete_document("doc-1").status, STATUS_NO_CONTENT);
    assert_eq!(api.delete_document("doc-1").status, STATUS_NO_CONTENT);
    assert_eq!(api.get_document("doc-1", None).status, STATUS_NOT_FOUND);
}

use serde_json::json;

use super::*;

#[test]
fn missing_optional_fields_default() {
    let doc = GenogramDocument::from_value(&json!({
        "members": [{ "id": "self" }],
        "marriages": [{ "husband": "self" }]
    }))
    .unwrap();

    let person = &doc.members[0];
    assert_eq!(person.name, UNKNOWN_NAME);
    assert_eq!(person.gender, Gender::Unknown);
    assert_eq!(person.generation, 0);
    assert!(!person.is_self && !person.is_deceased && !person.is_key_person);
    assert!(person.birth_year.is_none() && person.note.is_none());

    let union = &doc.marriages[0];
    assert_eq!(union.partner_a.as_deref(), Some("self"));
    assert!(union.partner_b.is_none());
    assert_eq!(union.status, UnionStatus::Married);
    assert!(union.children.is_empty());
}

#[test]
fn nulls_fall_back_to_defaults() {
    let doc = GenogramDocument::from_value(&json!({
        "members": [{ "id": "a", "name": null, "gender": null, "generation": null, "isSelf": null }],
        "marriages": [{ "husband": "a", "status": null, "children": null }]
    }))
    .unwrap();
    assert_eq!(doc.members[0].name, UNKNOWN_NAME);
    assert_eq!(doc.members[0].generation, 0);
    assert_eq!(doc.marriages[0].status, UnionStatus::Married);
}

#[test]
fn camel_case_fields_and_gender_codes() {
    let doc = GenogramDocument::from_json_str(
        r#"{
            "members": [
                { "id": "f", "name": "Father", "gender": "M", "birthYear": 1950, "isDeceased": true, "generation": -1 },
                { "id": "m", "name": "Mother", "gender": "female", "isKeyPerson": true, "generation": -1, "note": "lives alone" }
            ],
            "marriages": [{ "husband": "f", "wife": "m", "status": "divorced", "children": [] }]
        }"#,
    )
    .unwrap();
    assert_eq!(doc.members[0].gender, Gender::Male);
    assert_eq!(doc.members[0].birth_year, Some(1950));
    assert!(doc.members[0].is_deceased);
    assert_eq!(doc.members[0].generation, -1);
    assert_eq!(doc.members[1].gender, Gender::Female);
    assert!(doc.members[1].is_key_person);
    assert_eq!(doc.members[1].note.as_deref(), Some("lives alone"));
    assert_eq!(doc.marriages[0].status, UnionStatus::Divorced);
}

#[test]
fn partner_aliases_are_accepted() {
    let doc = GenogramDocument::from_value(&json!({
        "members": [],
        "marriages": [{ "partnerA": "x", "partnerB": "y" }]
    }))
    .unwrap();
    assert_eq!(doc.marriages[0].partner_a.as_deref(), Some("x"));
    assert_eq!(doc.marriages[0].partner_b.as_deref(), Some("y"));
}

#[test]
fn union_serializes_with_historical_keys() {
    let union = Union { partner_a: Some("a".into()), partner_b: Some("b".into()), ..Union::default() };
    let value = serde_json::to_value(&union).unwrap();
    assert_eq!(value["husband"], "a");
    assert_eq!(value["wife"], "b");
    assert_eq!(value["status"], "married");
}

#[test]
fn node_id_prefers_declared_id() {
    let declared = Union { id: Some("m1".into()), ..Union::default() };
    let blank = Union { id: Some(String::new()), ..Union::default() };
    assert_eq!(declared.node_id(4), "m1");
    assert_eq!(blank.node_id(4), "union-4");
    assert_eq!(Union::default().node_id(0), "union-0");
}

// =============================================================================
// INVALID INPUT
// =============================================================================

fn invalid_message(value: &serde_json::Value) -> String {
    match GenogramDocument::from_value(value) {
        Err(LayoutError::InvalidInput(msg)) => msg,
        Ok(_) => panic!("expected InvalidInput for {value}"),
    }
}

#[test]
fn non_object_document_is_invalid() {
    assert!(invalid_message(&json!([1, 2])).contains("object"));
    assert!(invalid_message(&json!("members")).contains("object"));
}

#[test]
fn missing_lists_are_invalid() {
    assert!(invalid_message(&json!({ "marriages": [] })).contains("members"));
    assert!(invalid_message(&json!({ "members": [] })).contains("marriages"));
}

#[test]
fn non_array_lists_are_invalid() {
    assert!(invalid_message(&json!({ "members": {}, "marriages": [] })).contains("array"));
    assert!(invalid_message(&json!({ "members": [], "marriages": 3 })).contains("array"));
}

#[test]
fn bad_records_name_their_position() {
    let msg = invalid_message(&json!({ "members": [{ "id": "a" }, 7], "marriages": [] }));
    assert!(msg.contains("members[1]"), "{msg}");

    let msg = invalid_message(&json!({ "members": [{ "name": "no id" }], "marriages": [] }));
    assert!(msg.contains("members[0]"), "{msg}");

    let msg = invalid_message(&json!({ "members": [], "marriages": [{ "children": "c1" }] }));
    assert!(msg.contains("marriages[0]"), "{msg}");
}

#[test]
fn unparseable_text_is_invalid() {
    let err = GenogramDocument::from_json_str("{ not json").unwrap_err();
    assert!(err.to_string().contains("not valid JSON"));
}

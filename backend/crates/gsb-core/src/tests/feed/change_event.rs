use crate::tests::{business, id};
use crate::{BUSINESSES_COLLECTION, ChangeEvent, ChangeKind, CoreError, RemoteChange};

const ROW: &str = r#"{
    "id": "00000000-0000-0000-0000-000000000001",
    "name": "Cafe",
    "category": "Food",
    "city": "NY",
    "owner": "00000000-0000-0000-0000-0000000a11ce",
    "created_at": "2025-01-01T00:00:00+00:00"
}"#;

#[test]
fn given_canonical_insert_payload_when_decoded_then_yields_insert() {
    let payload = format!(r#"{{"kind":"Insert","collection":"businesses","new":{ROW},"old":null}}"#);

    let event = ChangeEvent::from_json(&payload).unwrap();

    assert_eq!(event.kind, ChangeKind::Insert);
    assert!(event.concerns(BUSINESSES_COLLECTION));
    let change = event.into_remote_change().unwrap();
    assert_eq!(change, RemoteChange::Insert(business(1, "Cafe", 0)));
}

#[test]
fn given_native_update_payload_when_decoded_then_yields_update() {
    let payload = format!(
        r#"{{"eventType":"UPDATE","schema":"public","table":"businesses","new":{ROW},"old":{{"id":"00000000-0000-0000-0000-000000000001"}}}}"#
    );

    let event = ChangeEvent::from_json(&payload).unwrap();

    assert_eq!(event.kind, ChangeKind::Update);
    assert!(matches!(
        event.into_remote_change().unwrap(),
        RemoteChange::Update(record) if record.id == id(1)
    ));
}

#[test]
fn given_native_delete_with_empty_new_when_decoded_then_yields_delete() {
    let payload = r#"{"eventType":"DELETE","table":"businesses","new":{},"old":{"id":"00000000-0000-0000-0000-000000000009"}}"#;

    let event = ChangeEvent::from_json(payload).unwrap();

    assert!(event.new.is_none());
    assert_eq!(event.into_remote_change().unwrap(), RemoteChange::Delete(id(9)));
}

#[test]
fn given_delete_without_old_when_validated_then_invalid_event() {
    let payload = r#"{"kind":"Delete","collection":"businesses","new":null,"old":{}}"#;

    let result = ChangeEvent::from_json(payload).unwrap().into_remote_change();

    assert!(matches!(result, Err(CoreError::InvalidChangeEvent { .. })));
}

#[test]
fn given_insert_without_new_when_validated_then_invalid_event() {
    let event = ChangeEvent {
        kind: ChangeKind::Insert,
        collection: BUSINESSES_COLLECTION.to_string(),
        new: None,
        old: None,
    };

    let err = event.into_remote_change().unwrap_err();
    assert!(err.to_string().contains("insert event is missing the new record"));
}

#[test]
fn given_other_collection_when_concerns_then_false() {
    let payload = r#"{"eventType":"DELETE","table":"reviews","old":{"id":"00000000-0000-0000-0000-000000000001"}}"#;

    let event = ChangeEvent::from_json(payload).unwrap();

    assert!(!event.concerns(BUSINESSES_COLLECTION));
}

#[test]
fn given_malformed_payload_when_decoded_then_json_error() {
    let result = ChangeEvent::from_json(r#"{"kind":"Upsert","collection":"businesses"}"#);

    assert!(matches!(result, Err(CoreError::Json { .. })));
}

#[test]
fn given_constructors_when_built_then_target_businesses() {
    let record = business(3, "Shop", 1);

    assert_eq!(ChangeEvent::insert(record.clone()).collection, BUSINESSES_COLLECTION);
    assert_eq!(ChangeEvent::update(record.clone()).old.map(|k| k.id), Some(id(3)));
    assert_eq!(
        ChangeEvent::delete(id(3)).into_remote_change().unwrap(),
        RemoteChange::Delete(id(3))
    );
}

use crate::{BusinessFields, CoreError};

use googletest::prelude::*;

#[test]
fn given_valid_input_when_new_then_trims_values() {
    let fields = BusinessFields::new("  Cafe ", " Food", Some(" NY ")).unwrap();

    assert_that!(fields.name, eq("Cafe"));
    assert_that!(fields.category, eq("Food"));
    assert_that!(fields.city, some(eq("NY")));
}

#[test]
fn given_blank_city_when_new_then_city_is_none() {
    let fields = BusinessFields::new("Cafe", "Food", Some("   ")).unwrap();
    assert_that!(fields.city, none());

    let fields = BusinessFields::new("Cafe", "Food", None).unwrap();
    assert_that!(fields.city, none());
}

#[test]
fn given_blank_name_when_new_then_validation_error_on_name() {
    let result = BusinessFields::new("  ", "Food", None);

    match result {
        Err(CoreError::Validation { field, .. }) => assert_eq!(field.as_deref(), Some("name")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn given_blank_category_when_new_then_validation_error_on_category() {
    let result = BusinessFields::new("Cafe", "", Some("NY"));

    match result {
        Err(CoreError::Validation { field, .. }) => {
            assert_eq!(field.as_deref(), Some("category"))
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn given_fields_without_city_when_serialized_then_city_is_null() {
    let fields = BusinessFields::new("Cafe", "Food", None).unwrap();
    let json = serde_json::to_value(&fields).unwrap();

    assert_that!(json["city"].is_null(), eq(true));
    assert_that!(json["name"], eq(&serde_json::json!("Cafe")));
}

mod common;

use common::{purchase_fields, record};
use michi::prelude::*;
use serde_json::json;

fn check(condition: Condition, data: &ValueRecord) -> bool {
    condition.evaluate(data, &purchase_fields())
}

#[test]
fn test_number_equality_is_numeric() {
    let data = record(&[("amount", json!("100"))]);
    assert!(check(Condition::value("c", "amount", Operator::Equal, json!(100)), &data));
    assert!(check(Condition::value("c", "amount", Operator::Equal, "100.0"), &data));
    assert!(!check(Condition::value("c", "amount", Operator::NotEqual, json!(100)), &data));
}

#[test]
fn test_non_numeric_operand_never_equals() {
    let data = record(&[("amount", json!("abc"))]);
    assert!(!check(Condition::value("c", "amount", Operator::Equal, "abc"), &data));
    assert!(check(Condition::value("c", "amount", Operator::NotEqual, "abc"), &data));
    assert!(!check(Condition::value("c", "amount", Operator::GreaterThan, json!(0)), &data));
    assert!(!check(Condition::value("c", "amount", Operator::LessThanOrEqual, json!(0)), &data));
}

#[test]
fn test_number_ordering() {
    let data = record(&[("amount", json!(150))]);
    assert!(check(Condition::value("c", "amount", Operator::GreaterThan, "100"), &data));
    assert!(check(Condition::value("c", "amount", Operator::GreaterThanOrEqual, json!(150)), &data));
    assert!(check(Condition::value("c", "amount", Operator::LessThanOrEqual, json!(150)), &data));
    assert!(!check(Condition::value("c", "amount", Operator::LessThan, json!(150)), &data));
}

#[test]
fn test_missing_number_is_not_ordered() {
    let data = ValueRecord::new();
    assert!(!check(Condition::value("c", "amount", Operator::GreaterThan, json!(100)), &data));
    assert!(!check(Condition::value("c", "amount", Operator::LessThan, json!(100)), &data));
}

#[test]
fn test_currency_compares_numerically() {
    let data = record(&[("price", json!("19.90"))]);
    assert!(check(Condition::value("c", "price", Operator::Equal, json!(19.9)), &data));
}

#[test]
fn test_text_equality_is_exact_string_comparison() {
    let data = record(&[("decision", json!("Approved"))]);
    assert!(check(Condition::value("c", "decision", Operator::Equal, "Approved"), &data));
    assert!(!check(Condition::value("c", "decision", Operator::Equal, "approved"), &data));

    let numeric_text = record(&[("decision", json!(100))]);
    assert!(check(Condition::value("c", "decision", Operator::Equal, "100"), &numeric_text));
}

#[test]
fn test_text_has_no_ordering() {
    let data = record(&[("decision", json!("b"))]);
    assert!(!check(Condition::value("c", "decision", Operator::GreaterThan, "a"), &data));
    assert!(!check(Condition::value("c", "decision", Operator::LessThan, "c"), &data));
    assert!(!check(Condition::value("c", "decision", Operator::GreaterThanOrEqual, "b"), &data));
}

#[test]
fn test_contains_ignores_case() {
    let data = record(&[("notes", json!("Urgent delivery requested"))]);
    assert!(check(Condition::value("c", "notes", Operator::Contains, "URGENT"), &data));
    assert!(!check(Condition::value("c", "notes", Operator::NotContains, "delivery"), &data));
    assert!(check(Condition::value("c", "notes", Operator::NotContains, "cancel"), &data));
}

#[test]
fn test_empty_and_not_empty() {
    let fields = purchase_fields();
    let is_empty = Condition::value("c", "notes", Operator::Empty, json!(null));
    let not_empty = Condition::value("c", "notes", Operator::NotEmpty, json!(null));

    for value in [json!(null), json!(""), json!([])] {
        let data = record(&[("notes", value)]);
        assert!(is_empty.evaluate(&data, &fields));
        assert!(!not_empty.evaluate(&data, &fields));
    }
    assert!(is_empty.evaluate(&ValueRecord::new(), &fields));

    let zero = record(&[("notes", json!(0))]);
    assert!(!is_empty.evaluate(&zero, &fields));
    assert!(not_empty.evaluate(&zero, &fields));
}

#[test]
fn test_dates_compare_chronologically() {
    let data = record(&[("due", json!("2024-05-01"))]);
    assert!(check(Condition::value("c", "due", Operator::GreaterThan, "2024-04-30"), &data));
    assert!(check(Condition::value("c", "due", Operator::LessThan, "2024-05-01T08:00:00Z"), &data));
    assert!(check(Condition::value("c", "due", Operator::GreaterThanOrEqual, "2024-05-01"), &data));
}

#[test]
fn test_date_against_empty_is_false() {
    let data = record(&[("due", json!("2024-05-01"))]);
    assert!(!check(Condition::value("c", "due", Operator::GreaterThan, ""), &data));
    assert!(!check(Condition::value("c", "due", Operator::LessThan, ""), &data));
}

#[test]
fn test_field_mode_compares_two_fields() {
    let data = record(&[
        ("due", json!("2024-06-01")),
        ("submitted", json!("2024-05-20")),
        ("amount", json!(5)),
        ("total", json!(3)),
    ]);
    assert!(check(Condition::field("c", "due", Operator::GreaterThan, "submitted"), &data));
    assert!(check(Condition::field("c", "amount", Operator::GreaterThan, "total"), &data));
    assert!(!check(Condition::field("c", "amount", Operator::Equal, "total"), &data));
}

#[test]
fn test_unknown_right_field_reads_as_undefined() {
    let data = record(&[("amount", json!(5)), ("ghost", json!(5))]);
    assert!(!check(Condition::field("c", "amount", Operator::Equal, "ghost"), &data));
    assert!(check(Condition::field("c", "amount", Operator::NotEqual, "ghost"), &data));
}

#[test]
fn test_unknown_left_field_reads_as_empty() {
    let data = record(&[("ghost", json!("value"))]);
    assert!(check(Condition::value("c", "ghost", Operator::Empty, json!(null)), &data));
    assert!(!check(Condition::value("c", "ghost", Operator::Equal, "value"), &data));
}

#[test]
fn test_operator_deserializes_from_symbols() {
    let condition: Condition = serde_json::from_value(json!({
        "id": "c1",
        "leftFieldId": "amount",
        "operator": ">=",
        "rightMode": "value",
        "rightValue": 10
    }))
    .unwrap();
    assert_eq!(condition.operator, Operator::GreaterThanOrEqual);
    assert_eq!(condition.right_mode, RightMode::Value);

    let unknown = serde_json::from_value::<Condition>(json!({
        "leftFieldId": "amount",
        "operator": "between"
    }));
    assert!(unknown.is_err());
}

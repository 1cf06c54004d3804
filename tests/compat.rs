mod common;

use common::purchase_fields;
use michi::field::FieldType::*;
use michi::mapping::{
    available_transformations, compatible_targets, is_compatible, transformations_for_source,
};
use michi::prelude::*;

#[test]
fn test_arithmetic_only_for_numeric_and_date_sources() {
    for source in [Number, Currency, Date] {
        assert_eq!(available_transformations(source).len(), 4, "{source}");
    }
    for source in [Text, Textarea, Email, Select, Dropdown, YesNo, Checkbox, User, Users] {
        assert_eq!(
            available_transformations(source),
            &[Transformation::Copy, Transformation::Set],
            "{source}"
        );
    }
}

#[test]
fn test_unresolved_source_offers_copy_and_set() {
    let fields = purchase_fields();
    assert_eq!(transformations_for_source(&fields, None).len(), 2);
    assert_eq!(transformations_for_source(&fields, Some("ghost")).len(), 2);
    assert_eq!(transformations_for_source(&fields, Some("price")).len(), 4);
}

#[test]
fn test_copy_compatibility() {
    assert!(is_compatible(Date, Transformation::Copy, Date));
    assert!(is_compatible(Date, Transformation::Copy, Text));
    assert!(is_compatible(Number, Transformation::Copy, Currency));
    assert!(is_compatible(Currency, Transformation::Copy, Number));
    assert!(!is_compatible(Text, Transformation::Copy, Number));
    assert!(!is_compatible(Date, Transformation::Copy, Number));
    assert!(!is_compatible(Select, Transformation::Copy, Dropdown));
}

#[test]
fn test_arithmetic_compatibility() {
    assert!(is_compatible(Number, Transformation::Add, Currency));
    assert!(is_compatible(Date, Transformation::Subtract, Date));
    assert!(!is_compatible(Date, Transformation::Add, Number));
    assert!(!is_compatible(Number, Transformation::Add, Date));
    assert!(!is_compatible(Text, Transformation::Add, Text));
}

#[test]
fn test_set_accepts_any_target() {
    for target in [Text, Number, Date, Select, Users, Checkbox] {
        assert!(is_compatible(Text, Transformation::Set, target));
    }
}

#[test]
fn test_compatible_targets_filters_mapping_fields() {
    let fields = purchase_fields();
    let candidates = fields.mapping_fields();
    let amount = fields.get_field("amount");

    let targets: Vec<&str> = compatible_targets(amount, Transformation::Add, candidates.clone())
        .into_iter()
        .map(|f| f.id.as_str())
        .collect();
    assert_eq!(targets, vec!["amount", "total", "price"]);

    let everything = compatible_targets(None, Transformation::Add, candidates.clone());
    assert_eq!(everything.len(), candidates.len());
}

#[test]
fn test_mapping_fields_exclude_platform_fields() {
    let fields = purchase_fields();
    let ids: Vec<&str> = fields.mapping_fields().iter().map(|f| f.id.as_str()).collect();

    assert!(!ids.contains(&"enterprise_id"));
    assert!(ids.contains(&"enterprise_status"));
    assert_eq!(ids.last(), Some(&"workflow_assigned_to"));
}

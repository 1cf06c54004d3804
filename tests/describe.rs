mod common;

use common::{purchase_fields, rejected_rule};
use michi::prelude::*;
use serde_json::json;

#[test]
fn test_grouped_rule_description() {
    let fields = purchase_fields();
    let rule = Rule::new("r", "Big and rejected", Logic::And)
        .with_condition(Condition::value("c1", "amount", Operator::GreaterThanOrEqual, json!(100)))
        .with_condition(Condition::field("c2", "total", Operator::NotEqual, "amount"))
        .with_condition(Condition::value("c3", "notes", Operator::NotEmpty, json!(null)));

    assert_eq!(
        Describer::new(&fields).describe_rule(Some(&rule)),
        "Amount ≥ \"100\" AND Total ≠ [Amount] AND Notes is not empty"
    );
}

#[test]
fn test_or_and_empty_literals() {
    let fields = purchase_fields();
    let rule = Rule::new("r", "Either", Logic::Or)
        .with_condition(Condition::value("c1", "decision", Operator::Equal, ""))
        .with_condition(Condition::value("c2", "notes", Operator::NotContains, "rush"));

    assert_eq!(
        Describer::new(&fields).describe_rule(Some(&rule)),
        "Decision = \"(empty)\" OR Notes does not contain \"rush\""
    );
}

#[test]
fn test_missing_and_empty_rules() {
    let fields = purchase_fields();
    let describer = Describer::new(&fields);
    assert_eq!(describer.describe_rule(None), "");
    assert_eq!(
        describer.describe_rule(Some(&Rule::new("r", "Nothing", Logic::And))),
        "Always"
    );
}

#[test]
fn test_unknown_fields_render_as_unknown() {
    let fields = purchase_fields();
    let rule = Rule::new("r", "Dangling", Logic::And)
        .with_condition(Condition::field("c1", "ghost", Operator::Equal, "phantom"));
    assert_eq!(
        Describer::new(&fields).describe_rule(Some(&rule)),
        "Unknown = [Unknown]"
    );
}

#[test]
fn test_legacy_rule_renders_without_decoration() {
    let fields = purchase_fields();
    let legacy: Rule = serde_json::from_value(json!({
        "id": "legacy",
        "leftFieldId": "amount",
        "operator": "<=",
        "rightMode": "value",
        "rightValue": 50
    }))
    .unwrap();
    assert_eq!(Describer::new(&fields).describe_rule(Some(&legacy)), "Amount ≤ 50");
}

#[test]
fn test_bare_value_rule_renders_its_literal() {
    let fields = purchase_fields();
    let legacy: Rule = serde_json::from_value(json!({
        "id": "r1",
        "leftFieldId": "decision",
        "operator": "=",
        "value": "Approved"
    }))
    .unwrap();
    assert_eq!(Describer::new(&fields).describe_rule(Some(&legacy)), "Decision = Approved");
}

#[test]
fn test_choice_literal_uses_option_label_when_datasets_given() {
    let fields = purchase_fields();
    let datasets = DatasetCatalog::new(Vec::new());
    let rule = Rule::new("r", "Status", Logic::And)
        .with_condition(Condition::value("c1", "status", Operator::Equal, "approved"))
        .with_condition(Condition::value("c2", "enterprise_status", Operator::Equal, "cancelled"));

    assert_eq!(
        Describer::new(&fields).describe_rule(Some(&rule)),
        "Order Status = \"approved\" AND Status = \"cancelled\""
    );
    assert_eq!(
        Describer::new(&fields)
            .with_datasets(&datasets)
            .describe_rule(Some(&rule)),
        "Order Status = \"Approved\" AND Status = \"Cancelled\""
    );
}

#[test]
fn test_describe_rule_used_by_routing_and_shared_fixture() {
    let fields = purchase_fields();
    assert_eq!(
        Describer::new(&fields).describe_rule(Some(&rejected_rule())),
        "Decision = \"Rejected\""
    );
}

#[test]
fn test_mapping_descriptions() {
    let fields = purchase_fields();
    let describer = Describer::new(&fields);

    let copy = DataMapping::new("m1").with_source("amount").with_target("total");
    assert_eq!(describer.describe_mapping(&copy), "Amount → Copy to → Total");

    let subtract = DataMapping::new("m2")
        .with_source("price")
        .with_transformation(Transformation::Subtract)
        .with_target("total");
    assert_eq!(describer.describe_mapping(&subtract), "Price → Subtract from → Total");

    let set = DataMapping::new("m3")
        .with_source("decision")
        .with_transformation(Transformation::Set)
        .with_target("decision");
    assert_eq!(describer.describe_mapping(&set), "Decision → Set value → No value");
    assert_eq!(
        describer.describe_mapping(&set.with_value("Approved")),
        "Decision → Set value → Approved"
    );

    let blank = DataMapping::new("m4");
    assert_eq!(describer.describe_mapping(&blank), "Unknown → Copy to → Unknown");
}

#[test]
fn test_falsy_literals_are_not_empty() {
    let fields = purchase_fields();
    let describer = Describer::new(&fields);
    let zero = Rule::new("r", "Zero", Logic::And)
        .with_condition(Condition::value("c1", "amount", Operator::Equal, json!(0)))
        .with_condition(Condition::value("c2", "decision", Operator::Equal, json!("")));

    assert_eq!(
        describer.describe_rule(Some(&zero)),
        "Amount = \"0\" AND Decision = \"(empty)\""
    );
}

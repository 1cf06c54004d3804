mod common;

use common::{branching_workflow, large_amount_rule, linear_workflow, purchase_fields, record};
use michi::mapping::SkipReason;
use michi::prelude::*;
use michi::workflow::RouteVia;
use serde_json::json;

#[test]
fn test_advance_applies_mappings_before_routing() {
    let (mut workflow, [a, b, c]) = linear_workflow();
    let fields = purchase_fields();
    let rules = RuleBook::new(&[large_amount_rule()]);

    // The routing rule reads `amount`, which only the step's own data mapping sets.
    workflow
        .add_data_mapping(
            &a,
            DataMapping::new("m1")
                .with_source("price")
                .with_transformation(Transformation::Add)
                .with_target("amount"),
        )
        .unwrap();
    workflow
        .add_routing_mapping(
            &a,
            RoutingMapping::new("big", Some(c.clone())).with_rule(large_amount_rule()),
        )
        .unwrap();

    let runner = StepRunner::new(&workflow, &fields, &rules);

    let cheap = runner.advance(&InstanceCursor::at("i1", a.clone(), record(&[("price", json!(20))])));
    assert_eq!(cheap.record["amount"], json!(20));
    assert_eq!(cheap.decision.next_step_id.as_deref(), Some(b.as_str()));

    let pricey = runner.advance(&InstanceCursor::at("i2", a, record(&[("price", json!(500))])));
    assert_eq!(pricey.record["amount"], json!(500));
    assert_eq!(pricey.decision.next_step_id.as_deref(), Some(c.as_str()));
    assert!(pricey.outcomes.iter().all(|o| o.applied()));
}

#[test]
fn test_starting_cursor_only_routes() {
    let (mut workflow, [a, _, _]) = linear_workflow();
    workflow
        .add_data_mapping(
            &a,
            DataMapping::new("m1")
                .with_transformation(Transformation::Set)
                .with_target("decision")
                .with_value("Started"),
        )
        .unwrap();
    let fields = purchase_fields();
    let rules = RuleBook::default();

    let advance = StepRunner::new(&workflow, &fields, &rules)
        .advance(&InstanceCursor::start("i1", ValueRecord::new()));

    assert_eq!(advance.decision.via, RouteVia::Start);
    assert_eq!(advance.decision.next_step_id.as_deref(), Some(a.as_str()));
    assert!(advance.record.is_empty());
    assert!(advance.outcomes.is_empty());
}

#[test]
fn test_advance_reports_skipped_mappings() {
    let (mut workflow, [a, _, _]) = linear_workflow();
    workflow
        .add_data_mapping(&a, DataMapping::new("m1").with_source("amount").with_target("total").disabled())
        .unwrap();
    let fields = purchase_fields();
    let rules = RuleBook::default();

    let advance = StepRunner::new(&workflow, &fields, &rules)
        .advance(&InstanceCursor::at("i1", a, record(&[("amount", json!(1))])));
    assert_eq!(advance.outcomes[0].skipped, Some(SkipReason::Disabled));
    assert!(!advance.record.contains_key("total"));
}

#[test]
fn test_cursor_walks_to_the_end() {
    let (workflow, [a, _, c]) = branching_workflow();
    let fields = purchase_fields();
    let rules = RuleBook::default();
    let runner = StepRunner::new(&workflow, &fields, &rules);

    let first = runner.advance(&InstanceCursor::start("i1", record(&[("decision", json!("Approved"))])));
    let cursor = first.into_cursor();
    assert_eq!(cursor.current_step_id.as_deref(), Some(a.as_str()));

    let second = runner.advance(&cursor);
    assert_eq!(second.decision.next_step_id.as_deref(), Some(c.as_str()));

    let last = runner.advance(&second.into_cursor());
    assert!(last.is_finished());
    assert_eq!(last.into_cursor().current_step_id, None);
}

#[test]
fn test_advance_all_preserves_order() {
    let (workflow, [a, _, c]) = branching_workflow();
    let fields = purchase_fields();
    let rules = RuleBook::default();

    let cursors: Vec<InstanceCursor> = (0..64)
        .map(|n| {
            let decision = if n % 2 == 0 { "Rejected" } else { "Approved" };
            InstanceCursor::at(format!("i{n}"), a.clone(), record(&[("decision", json!(decision))]))
        })
        .collect();

    let advances = StepRunner::new(&workflow, &fields, &rules).advance_all(&cursors);

    assert_eq!(advances.len(), cursors.len());
    for (n, advance) in advances.iter().enumerate() {
        assert_eq!(advance.instance_id, format!("i{n}"));
        if n % 2 == 0 {
            assert!(advance.is_finished());
        } else {
            assert_eq!(advance.decision.next_step_id.as_deref(), Some(c.as_str()));
        }
    }
}

#[test]
fn test_unknown_current_step_keeps_record() {
    let (workflow, _) = linear_workflow();
    let fields = purchase_fields();
    let rules = RuleBook::default();
    let data = record(&[("amount", json!(3))]);

    let advance = StepRunner::new(&workflow, &fields, &rules)
        .advance(&InstanceCursor::at("i1", "ghost", data.clone()));
    assert_eq!(advance.record, data);
    assert!(advance.is_finished());
}

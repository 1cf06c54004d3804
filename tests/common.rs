//! Common test fixtures: a purchase-approval field namespace, rules and workflows.
use michi::field::FieldOption;
use michi::prelude::*;
use serde_json::{Value, json};

/// The field namespace used across the test suite.
///
/// Enterprise: `enterprise_id`, `enterprise_status`.
/// Process: amount, total, price, decision, status, due, notes, reviewer, approved.
#[allow(dead_code)]
pub fn purchase_fields() -> FieldIndex {
    FieldIndex::new(
        vec![
            Field::new("enterprise_id", "Enterprise ID", FieldType::Id),
            Field::new("enterprise_status", "Status", FieldType::Select),
        ],
        vec![
            Field::new("amount", "Amount", FieldType::Number),
            Field::new("total", "Total", FieldType::Number),
            Field::new("price", "Price", FieldType::Currency),
            Field::new("decision", "Decision", FieldType::Text),
            Field::new("status", "Order Status", FieldType::Select).with_options(vec![
                FieldOption::Labeled {
                    value: "approved".to_string(),
                    label: Some("Approved".to_string()),
                },
                FieldOption::Labeled {
                    value: "rejected".to_string(),
                    label: Some("Rejected".to_string()),
                },
            ]),
            Field::new("due", "Due Date", FieldType::Date),
            Field::new("submitted", "Submitted", FieldType::Date),
            Field::new("notes", "Notes", FieldType::Textarea),
            Field::new("reviewer", "Reviewer", FieldType::User),
            Field::new("approved", "Approved", FieldType::YesNo),
        ],
    )
}

/// Builds a record from `(field_id, value)` pairs.
#[allow(dead_code)]
pub fn record(pairs: &[(&str, Value)]) -> ValueRecord {
    pairs
        .iter()
        .map(|(id, value)| (id.to_string(), value.clone()))
        .collect()
}

/// `decision = "Rejected"`
#[allow(dead_code)]
pub fn rejected_rule() -> Rule {
    Rule::new("rule-rejected", "Rejected", Logic::And).with_condition(Condition::value(
        "c-rejected",
        "decision",
        Operator::Equal,
        "Rejected",
    ))
}

/// `amount > 100`
#[allow(dead_code)]
pub fn large_amount_rule() -> Rule {
    Rule::new("rule-large", "Large amount", Logic::And).with_condition(Condition::value(
        "c-large",
        "amount",
        Operator::GreaterThan,
        json!(100),
    ))
}

/// A three-step workflow `A → B → C` without any mappings. Returns the ids in order.
#[allow(dead_code)]
pub fn linear_workflow() -> (Workflow, [String; 3]) {
    let mut workflow = Workflow::new("Purchase approval");
    let a = workflow.add_step(NewStep::named("Request").with_id("A").with_form("form-request"));
    let b = workflow.add_step(NewStep::named("Review").with_id("B").with_form("form-review"));
    let c = workflow.add_step(NewStep::named("Archive").with_id("C"));
    (workflow, [a, b, c])
}

/// `A` routes to the end when the decision is "Rejected", otherwise unconditionally to `C`.
#[allow(dead_code)]
pub fn branching_workflow() -> (Workflow, [String; 3]) {
    let (mut workflow, ids) = linear_workflow();
    workflow
        .add_routing_mapping(
            &ids[0],
            RoutingMapping::new("route-reject", None)
                .named("Reject")
                .with_rule(rejected_rule()),
        )
        .unwrap();
    workflow
        .add_routing_mapping(
            &ids[0],
            RoutingMapping::new("route-skip-review", Some(ids[2].clone())).named("Skip review"),
        )
        .unwrap();
    (workflow, ids)
}

/// A designer document with one process holding the branching workflow.
#[allow(dead_code)]
pub fn purchase_document() -> DesignerDocument {
    json_document(purchase_document_json())
}

/// The stored form of [`purchase_document`], as the designer writes it.
#[allow(dead_code)]
pub fn purchase_document_json() -> Value {
    json!({
        "enterprise": {
            "metadataFields": [
                { "id": "enterprise_id", "name": "Enterprise ID", "type": "id" },
                { "id": "enterprise_status", "name": "Status", "type": "select" }
            ]
        },
        "processes": [{
            "id": "purchase",
            "name": "Purchase",
            "metadataFields": [
                { "id": "amount", "name": "Amount", "type": "number" },
                { "id": "total", "name": "Total", "type": "number" },
                { "id": "decision", "name": "Decision", "type": "text" }
            ],
            "rules": [
                {
                    "id": "rule-rejected",
                    "name": "Rejected",
                    "logic": "AND",
                    "conditions": [
                        { "id": "c1", "leftFieldId": "decision", "operator": "=", "rightMode": "value", "rightValue": "Rejected" }
                    ]
                },
                {
                    "id": "rule-legacy-large",
                    "name": "Large",
                    "leftFieldId": "amount",
                    "operator": ">",
                    "rightMode": "value",
                    "rightValue": "100"
                },
                {
                    "id": "rule-approved",
                    "name": "Approved",
                    "leftFieldId": "decision",
                    "operator": "=",
                    "value": "Approved"
                }
            ],
            "workflow": {
                "name": "Purchase approval",
                "steps": [
                    {
                        "id": "A", "order": 1, "name": "Request", "formId": "form-request",
                        "mappings": {
                            "routing": [
                                { "id": "r1", "name": "Reject", "nextStepId": null,
                                  "rule": { "logic": "AND", "conditions": [
                                      { "id": "c1", "leftFieldId": "decision", "operator": "=", "rightMode": "value", "rightValue": "Rejected" }
                                  ] } }
                            ],
                            "data": [
                                { "id": "m1", "sourceField": "amount", "targetField": "total",
                                  "transformation": "add", "ruleId": "rule-legacy-large" }
                            ]
                        }
                    },
                    { "id": "B", "order": 2, "name": "Review", "formId": "form-review" },
                    { "id": "C", "order": 3, "name": "Archive" }
                ]
            },
            "forms": ["form-request", "form-review"]
        }],
        "users": [{ "id": "user_1", "name": "Ada" }]
    })
}

#[allow(dead_code)]
pub fn json_document(value: Value) -> DesignerDocument {
    serde_json::from_value(value).expect("fixture document should deserialize")
}

//! # Michi - Workflow Rule and Data-Mapping Engine
//!
//! **Michi** evaluates the decision logic of form-driven business processes. A
//! process is an ordered list of workflow steps; every step carries routing
//! mappings (a rule plus the step to go to) and data mappings (copy, set, add or
//! subtract a value between fields, optionally gated by a rule).
//!
//! ## Core Workflow
//!
//! 1.  **Describe the field namespace**: Combine enterprise and process fields into a
//!     [`FieldIndex`](field::FieldIndex). Every operator and coercion depends on the
//!     declared field type.
//! 2.  **Load the rules**: Rules come in two stored shapes, grouped conditions and the
//!     older single-condition form. Both deserialize into [`Rule`](rule::Rule) and
//!     are indexed by id in a [`RuleBook`](rule::RuleBook).
//! 3.  **Build or load the workflow**: [`Workflow`](workflow::Workflow) owns its steps
//!     and keeps their `order` contiguous across every structural edit.
//! 4.  **Advance instances**: When a step completes, its data mappings are applied to
//!     the instance record and the workflow decides which step follows.
//!
//! Evaluation is pure. Records are never modified in place and nothing is shared
//! mutably, so any number of instances can be evaluated concurrently.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use michi::prelude::*;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let fields = FieldIndex::from_fields(vec![
//!         Field::new("amount", "Amount", FieldType::Number),
//!         Field::new("total", "Total", FieldType::Number),
//!     ]);
//!
//!     let big_order = Rule::new("big", "Big order", Logic::And).with_condition(
//!         Condition::value("c1", "amount", Operator::GreaterThan, json!(100)),
//!     );
//!     let rules = RuleBook::new(std::slice::from_ref(&big_order));
//!
//!     let mut workflow = Workflow::new("Orders");
//!     let review = workflow.add_step(NewStep::named("Review"));
//!     let approve = workflow.add_step(NewStep::named("Approve"));
//!     let archive = workflow.add_step(NewStep::named("Archive"));
//!
//!     workflow.add_routing_mapping(
//!         &review,
//!         RoutingMapping::new("r1", Some(approve.clone())).with_rule(big_order),
//!     )?;
//!     workflow.add_routing_mapping(&review, RoutingMapping::new("r2", Some(archive)))?;
//!     workflow.add_data_mapping(
//!         &review,
//!         DataMapping::new("m1")
//!             .with_source("amount")
//!             .with_transformation(Transformation::Add)
//!             .with_target("total"),
//!     )?;
//!
//!     let mut data = ValueRecord::new();
//!     data.insert("amount".to_string(), json!(250));
//!
//!     let runner = StepRunner::new(&workflow, &fields, &rules);
//!     let advance = runner.advance(&InstanceCursor::at("order-1", review, data));
//!
//!     println!("-> Next step: {:?} ({})", advance.decision.next_step_id, advance.decision.reason);
//!     println!("-> Total: {}", advance.record["total"]);
//!     Ok(())
//! }
//! ```

pub mod describe;
pub mod error;
pub mod field;
pub mod instance;
pub mod mapping;
pub mod prelude;
pub mod repository;
pub mod rule;
pub mod value;
pub mod workflow;

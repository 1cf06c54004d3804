use crate::field::FieldRegistry;
use crate::mapping::{MappingExecutor, MappingOutcome, MappingPolicy};
use crate::repository::ProcessContext;
use crate::rule::RuleBook;
use crate::value::ValueRecord;
use crate::workflow::{RoutingDecision, Workflow};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Where one process instance stands: the step it just completed and its data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceCursor {
    pub instance_id: String,
    /// `None` before the first step has run.
    #[serde(default)]
    pub current_step_id: Option<String>,
    #[serde(default)]
    pub data: ValueRecord,
}

impl InstanceCursor {
    pub fn start(instance_id: impl Into<String>, data: ValueRecord) -> Self {
        Self {
            instance_id: instance_id.into(),
            current_step_id: None,
            data,
        }
    }

    pub fn at(instance_id: impl Into<String>, step_id: impl Into<String>, data: ValueRecord) -> Self {
        Self {
            instance_id: instance_id.into(),
            current_step_id: Some(step_id.into()),
            data,
        }
    }
}

/// The result of completing one step of an instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Advance {
    pub instance_id: String,
    /// The record after the completed step's data mappings ran.
    pub record: ValueRecord,
    pub decision: RoutingDecision,
    pub outcomes: Vec<MappingOutcome>,
}

impl Advance {
    /// `true` when no further step follows.
    pub fn is_finished(&self) -> bool {
        self.decision.next_step_id.is_none()
    }

    /// A cursor positioned on the chosen next step, carrying the mapped record.
    pub fn into_cursor(self) -> InstanceCursor {
        InstanceCursor {
            instance_id: self.instance_id,
            current_step_id: self.decision.next_step_id,
            data: self.record,
        }
    }
}

/// Drives process instances through one workflow.
///
/// Completing a step first applies that step's data mappings, then resolves
/// routing against the mapped record. Nothing here mutates shared state, so
/// independent instances can be advanced in parallel.
pub struct StepRunner<'a> {
    workflow: &'a Workflow,
    registry: &'a dyn FieldRegistry,
    rules: &'a RuleBook,
    policy: MappingPolicy,
}

impl<'a> StepRunner<'a> {
    pub fn new(workflow: &'a Workflow, registry: &'a dyn FieldRegistry, rules: &'a RuleBook) -> Self {
        Self {
            workflow,
            registry,
            rules,
            policy: MappingPolicy::default(),
        }
    }

    pub fn from_context(context: &'a ProcessContext) -> Self {
        Self::new(&context.workflow, &context.fields, &context.rules)
    }

    pub fn with_policy(mut self, policy: MappingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn advance(&self, cursor: &InstanceCursor) -> Advance {
        let current = cursor.current_step_id.as_deref();

        let (record, outcomes) = match current.map(|id| (id, self.workflow.step(id))) {
            Some((_, Some(step))) => {
                let report = MappingExecutor::new(self.registry, self.rules)
                    .with_policy(self.policy)
                    .apply_with_report(&step.mappings.data, &cursor.data);
                (report.record, report.outcomes)
            }
            Some((step_id, None)) => {
                tracing::warn!(
                    instance = %cursor.instance_id,
                    step_id,
                    "completed step is not part of the workflow"
                );
                (cursor.data.clone(), Vec::new())
            }
            None => (cursor.data.clone(), Vec::new()),
        };

        let decision = self
            .workflow
            .resolve_next_step(current, &record, self.registry);

        Advance {
            instance_id: cursor.instance_id.clone(),
            record,
            decision,
            outcomes,
        }
    }

    /// Advances many instances at once. Results keep the order of `cursors`.
    pub fn advance_all(&self, cursors: &[InstanceCursor]) -> Vec<Advance> {
        cursors.par_iter().map(|cursor| self.advance(cursor)).collect()
    }
}

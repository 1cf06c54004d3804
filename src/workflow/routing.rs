use super::{StepStatus, Workflow};
use crate::field::FieldRegistry;
use crate::rule::evaluate_rule;
use crate::value::ValueRecord;
use std::fmt;

/// How a routing decision was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteVia {
    /// No step had run yet; the first pending step starts the workflow.
    Start,
    /// A routing mapping of the completed step matched.
    Routing { mapping_id: String },
    /// No routing mapping matched; the next step in order follows.
    Sequential,
    /// Nothing follows.
    End,
}

impl fmt::Display for RouteVia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteVia::Start => write!(f, "start"),
            RouteVia::Routing { mapping_id } => write!(f, "routing mapping '{}'", mapping_id),
            RouteVia::Sequential => write!(f, "sequential order"),
            RouteVia::End => write!(f, "end"),
        }
    }
}

/// The outcome of resolving the next step, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingDecision {
    /// `None` means the workflow ends.
    pub next_step_id: Option<String>,
    pub via: RouteVia,
    pub reason: String,
}

impl RoutingDecision {
    fn end(reason: String) -> Self {
        Self {
            next_step_id: None,
            via: RouteVia::End,
            reason,
        }
    }
}

impl Workflow {
    /// Decides which step follows `current_step_id`.
    ///
    /// Without a current step the first pending step starts the workflow.
    /// Otherwise the completed step's routing mappings are tested in list order
    /// and the first one whose rule holds wins, even when it ends the workflow.
    /// If none holds, the step at `order + 1` follows; after the last step the
    /// workflow ends.
    pub fn resolve_next_step(
        &self,
        current_step_id: Option<&str>,
        record: &ValueRecord,
        registry: &dyn FieldRegistry,
    ) -> RoutingDecision {
        let decision = self.decide(current_step_id, record, registry);
        tracing::debug!(
            from = current_step_id.unwrap_or("<start>"),
            to = decision.next_step_id.as_deref().unwrap_or("<end>"),
            via = %decision.via,
            "routing resolved"
        );
        decision
    }

    /// The next step id only; `None` ends the workflow.
    pub fn next_step(
        &self,
        current_step_id: Option<&str>,
        record: &ValueRecord,
        registry: &dyn FieldRegistry,
    ) -> Option<String> {
        self.resolve_next_step(current_step_id, record, registry)
            .next_step_id
    }

    fn decide(
        &self,
        current_step_id: Option<&str>,
        record: &ValueRecord,
        registry: &dyn FieldRegistry,
    ) -> RoutingDecision {
        let Some(current_id) = current_step_id else {
            return match self.steps().iter().find(|s| s.status == StepStatus::Pending) {
                Some(first) => RoutingDecision {
                    next_step_id: Some(first.id.clone()),
                    via: RouteVia::Start,
                    reason: format!("'{}' is the first pending step", first.name),
                },
                None => RoutingDecision::end("no step is pending".to_string()),
            };
        };

        let Some(current) = self.step(current_id) else {
            return RoutingDecision::end(format!("step '{}' is not part of this workflow", current_id));
        };

        if let Some(mapping) = current
            .mappings
            .routing
            .iter()
            .find(|m| evaluate_rule(m.rule.as_ref(), record, registry))
        {
            let reason = match (&mapping.rule, mapping.target()) {
                (None, Some(_)) => format!("routing '{}' applies unconditionally", mapping.name),
                (None, None) => format!("routing '{}' ends the workflow unconditionally", mapping.name),
                (Some(_), Some(_)) => format!("rule of routing '{}' is satisfied", mapping.name),
                (Some(_), None) => format!("rule of routing '{}' is satisfied and ends the workflow", mapping.name),
            };
            return RoutingDecision {
                next_step_id: mapping.target().map(str::to_string),
                via: RouteVia::Routing {
                    mapping_id: mapping.id.clone(),
                },
                reason,
            };
        }

        match self.step_at_order(current.order + 1) {
            Some(next) => RoutingDecision {
                next_step_id: Some(next.id.clone()),
                via: RouteVia::Sequential,
                reason: format!("'{}' follows '{}' in order", next.name, current.name),
            },
            None => RoutingDecision::end(format!("'{}' is the last step", current.name)),
        }
    }
}

use super::StepStatus;
use crate::mapping::DataMapping;
use crate::rule::Rule;
use serde::{Deserialize, Serialize};

/// Whether an assignee is a single user or a user group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssigneeKind {
    User,
    Group,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignee {
    #[serde(rename = "type")]
    pub kind: AssigneeKind,
    pub id: String,
}

impl Assignee {
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            kind: AssigneeKind::User,
            id: id.into(),
        }
    }

    pub fn group(id: impl Into<String>) -> Self {
        Self {
            kind: AssigneeKind::Group,
            id: id.into(),
        }
    }
}

/// A rule paired with the step to activate when it holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingMapping {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rule: Option<Rule>,
    /// `None` ends the workflow.
    #[serde(default)]
    pub next_step_id: Option<String>,
}

impl RoutingMapping {
    pub fn new(id: impl Into<String>, next_step_id: Option<String>) -> Self {
        Self {
            id: id.into(),
            name: "New Routing Rule".to_string(),
            rule: None,
            next_step_id,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rule = Some(rule);
        self
    }

    /// The step this mapping routes to. A blank id ends the workflow like a null one.
    pub fn target(&self) -> Option<&str> {
        self.next_step_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// The two mapping lists a step carries. Missing lists read as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepMappings {
    #[serde(default)]
    pub routing: Vec<RoutingMapping>,
    #[serde(default)]
    pub data: Vec<DataMapping>,
}

/// Selects one of a step's mapping lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingKind {
    Routing,
    Data,
}

fn required_by_default() -> bool {
    true
}

/// One node of the workflow's ordered process graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStep {
    pub id: String,
    /// 1-based position, maintained by the owning workflow.
    #[serde(default)]
    pub order: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_id: Option<String>,
    #[serde(default = "required_by_default")]
    pub required: bool,
    #[serde(default)]
    pub assigned_to: Vec<Assignee>,
    /// Single-group assignment kept for older documents.
    #[serde(default)]
    pub assigned_to_user_group: Option<String>,
    #[serde(default)]
    pub status: StepStatus,
    #[serde(default)]
    pub mappings: StepMappings,
}

impl WorkflowStep {
    /// The bound form, treating a blank id as unbound.
    pub fn bound_form(&self) -> Option<&str> {
        self.form_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// The caller-supplied part of a new step. Everything else takes its default.
#[derive(Debug, Clone)]
pub struct NewStep {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub form_id: Option<String>,
    pub required: bool,
    pub assigned_to: Vec<Assignee>,
    pub mappings: StepMappings,
}

impl Default for NewStep {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: None,
            form_id: None,
            required: true,
            assigned_to: Vec::new(),
            mappings: StepMappings::default(),
        }
    }
}

impl NewStep {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_form(mut self, form_id: impl Into<String>) -> Self {
        self.form_id = Some(form_id.into());
        self
    }

    pub fn assign(mut self, assignee: Assignee) -> Self {
        self.assigned_to.push(assignee);
        self
    }
}

/// A partial update of a step's non-structural properties.
///
/// `id` and `order` cannot be updated here; only the workflow's structural
/// operations change them.
#[derive(Debug, Clone, Default)]
pub struct StepUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub form_id: Option<Option<String>>,
    pub required: Option<bool>,
    pub assigned_to: Option<Vec<Assignee>>,
    pub status: Option<StepStatus>,
    pub mappings: Option<StepMappings>,
}

impl StepUpdate {
    pub(super) fn apply_to(self, step: &mut WorkflowStep) {
        if let Some(name) = self.name {
            step.name = name;
        }
        if let Some(description) = self.description {
            step.description = description;
        }
        if let Some(form_id) = self.form_id {
            step.form_id = form_id;
        }
        if let Some(required) = self.required {
            step.required = required;
        }
        if let Some(assigned_to) = self.assigned_to {
            step.assigned_to = assigned_to;
        }
        if let Some(status) = self.status {
            step.status = status;
        }
        if let Some(mappings) = self.mappings {
            step.mappings = mappings;
        }
    }
}

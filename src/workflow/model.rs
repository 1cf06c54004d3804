use super::{
    MappingKind, NewStep, RoutingMapping, StepMappings, StepStatus, StepUpdate, WorkflowStep,
};
use crate::error::{TransitionError, WorkflowError};
use crate::mapping::DataMapping;
use serde::{Deserialize, Serialize};

fn default_name() -> String {
    "Workflow".to_string()
}

fn default_timeout_minutes() -> u32 {
    1440
}

/// Workflow-wide switches. Keys missing from a stored document take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkflowSettings {
    pub auto_assign: bool,
    pub require_approval: bool,
    pub allow_parallel: bool,
    pub timeout_minutes: u32,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            auto_assign: false,
            require_approval: false,
            allow_parallel: false,
            timeout_minutes: default_timeout_minutes(),
        }
    }
}

/// An ordered set of steps plus settings.
///
/// The workflow owns its steps outright. Every structural edit (add, remove,
/// move) renumbers the steps so that `order` is `1..=N` in list position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    steps: Vec<WorkflowStep>,
    #[serde(default)]
    pub settings: WorkflowSettings,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new(default_name())
    }
}

impl Workflow {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            steps: Vec::new(),
            settings: WorkflowSettings::default(),
        }
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    // --- Structural operations ---

    /// Appends a step and returns its id.
    ///
    /// A missing id is generated as `step<unix millis>`, bumped until unique.
    pub fn add_step(&mut self, draft: NewStep) -> String {
        let id = match draft.id {
            Some(id) if !id.is_empty() => id,
            _ => self.generate_step_id(),
        };
        self.steps.push(WorkflowStep {
            id: id.clone(),
            order: 0,
            name: draft.name,
            description: draft.description,
            form_id: draft.form_id,
            required: draft.required,
            assigned_to: draft.assigned_to,
            assigned_to_user_group: None,
            status: StepStatus::Pending,
            mappings: draft.mappings,
        });
        self.renumber();
        tracing::debug!(step_id = %id, steps = self.steps.len(), "step added");
        id
    }

    /// Removes a step, returning it if it existed.
    pub fn remove_step(&mut self, step_id: &str) -> Option<WorkflowStep> {
        let position = self.position(step_id)?;
        let removed = self.steps.remove(position);
        self.renumber();
        tracing::debug!(step_id, steps = self.steps.len(), "step removed");
        Some(removed)
    }

    /// Moves a step to `new_index` (0-based), shifting the steps in between.
    pub fn move_step(&mut self, step_id: &str, new_index: usize) -> Result<(), WorkflowError> {
        let position = self
            .position(step_id)
            .ok_or_else(|| WorkflowError::StepNotFound(step_id.to_string()))?;
        if new_index >= self.steps.len() {
            return Err(WorkflowError::IndexOutOfBounds {
                index: new_index,
                len: self.steps.len(),
            });
        }
        let step = self.steps.remove(position);
        self.steps.insert(new_index, step);
        self.renumber();
        Ok(())
    }

    fn renumber(&mut self) {
        for (index, step) in self.steps.iter_mut().enumerate() {
            step.order = index as u32 + 1;
        }
    }

    fn generate_step_id(&self) -> String {
        let mut stamp = chrono::Utc::now().timestamp_millis();
        loop {
            let candidate = format!("step{}", stamp);
            if self.position(&candidate).is_none() {
                return candidate;
            }
            stamp += 1;
        }
    }

    fn position(&self, step_id: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.id == step_id)
    }

    fn step_mut(&mut self, step_id: &str) -> Result<&mut WorkflowStep, WorkflowError> {
        self.steps
            .iter_mut()
            .find(|s| s.id == step_id)
            .ok_or_else(|| WorkflowError::StepNotFound(step_id.to_string()))
    }

    // --- Non-structural edits ---

    /// Applies a partial update to a step, returning the updated step.
    pub fn update_step(&mut self, step_id: &str, update: StepUpdate) -> Option<&WorkflowStep> {
        let step = self.step_mut(step_id).ok()?;
        update.apply_to(step);
        Some(&*step)
    }

    /// Assigns a step to a user group through the older single-group field.
    pub fn assign_step_to_user_group(
        &mut self,
        step_id: &str,
        group_id: impl Into<String>,
    ) -> Option<&WorkflowStep> {
        let step = self.step_mut(step_id).ok()?;
        step.assigned_to_user_group = Some(group_id.into());
        step.status = StepStatus::Assigned;
        Some(&*step)
    }

    pub fn add_form_to_step(
        &mut self,
        step_id: &str,
        form_id: impl Into<String>,
    ) -> Option<&WorkflowStep> {
        let step = self.step_mut(step_id).ok()?;
        step.form_id = Some(form_id.into());
        Some(&*step)
    }

    pub fn remove_form_from_step(&mut self, step_id: &str) -> Option<&WorkflowStep> {
        let step = self.step_mut(step_id).ok()?;
        step.form_id = None;
        Some(&*step)
    }

    /// Sets a status without consulting the transition table.
    pub fn set_step_status(&mut self, step_id: &str, status: StepStatus) -> Result<(), WorkflowError> {
        self.step_mut(step_id)?.status = status;
        Ok(())
    }

    /// Moves a step to a new status, rejecting moves the lifecycle does not allow.
    pub fn transition_step(&mut self, step_id: &str, next: StepStatus) -> Result<(), TransitionError> {
        let step = self
            .step_mut(step_id)
            .map_err(|_| TransitionError::StepNotFound(step_id.to_string()))?;
        if !step.status.can_transition_to(next) {
            return Err(TransitionError::IllegalTransition {
                step_id: step_id.to_string(),
                from: step.status,
                to: next,
            });
        }
        step.status = next;
        Ok(())
    }

    /// Merges new settings into the current ones.
    pub fn update_settings(&mut self, update: impl FnOnce(&mut WorkflowSettings)) {
        update(&mut self.settings);
    }

    // --- Mapping lists ---

    pub fn add_routing_mapping(
        &mut self,
        step_id: &str,
        mapping: RoutingMapping,
    ) -> Result<(), WorkflowError> {
        self.step_mut(step_id)?.mappings.routing.push(mapping);
        Ok(())
    }

    pub fn update_routing_mapping(
        &mut self,
        step_id: &str,
        mapping_id: &str,
        update: impl FnOnce(&mut RoutingMapping),
    ) -> Result<(), WorkflowError> {
        let mapping = self
            .step_mut(step_id)?
            .mappings
            .routing
            .iter_mut()
            .find(|m| m.id == mapping_id)
            .ok_or_else(|| WorkflowError::MappingNotFound {
                step_id: step_id.to_string(),
                mapping_id: mapping_id.to_string(),
            })?;
        update(mapping);
        Ok(())
    }

    pub fn add_data_mapping(&mut self, step_id: &str, mapping: DataMapping) -> Result<(), WorkflowError> {
        self.step_mut(step_id)?.mappings.data.push(mapping);
        Ok(())
    }

    /// Replaces the data mapping with the same id, keeping its position in the list.
    pub fn replace_data_mapping(
        &mut self,
        step_id: &str,
        mapping: DataMapping,
    ) -> Result<(), WorkflowError> {
        let slot = self
            .step_mut(step_id)?
            .mappings
            .data
            .iter_mut()
            .find(|m| m.id == mapping.id)
            .ok_or_else(|| WorkflowError::MappingNotFound {
                step_id: step_id.to_string(),
                mapping_id: mapping.id.clone(),
            })?;
        *slot = mapping;
        Ok(())
    }

    pub fn remove_mapping(
        &mut self,
        step_id: &str,
        kind: MappingKind,
        mapping_id: &str,
    ) -> Result<(), WorkflowError> {
        let StepMappings { routing, data } = &mut self.step_mut(step_id)?.mappings;
        let before = routing.len() + data.len();
        match kind {
            MappingKind::Routing => routing.retain(|m| m.id != mapping_id),
            MappingKind::Data => data.retain(|m| m.id != mapping_id),
        }
        if routing.len() + data.len() == before {
            return Err(WorkflowError::MappingNotFound {
                step_id: step_id.to_string(),
                mapping_id: mapping_id.to_string(),
            });
        }
        Ok(())
    }

    // --- Lookups ---

    pub fn step(&self, step_id: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn step_by_form(&self, form_id: &str) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.bound_form() == Some(form_id))
    }

    pub fn step_at_order(&self, order: u32) -> Option<&WorkflowStep> {
        self.steps.iter().find(|s| s.order == order)
    }

    pub fn ordered_steps(&self) -> Vec<&WorkflowStep> {
        let mut ordered: Vec<_> = self.steps.iter().collect();
        ordered.sort_by_key(|s| s.order);
        ordered
    }

    pub fn steps_by_status(&self, status: StepStatus) -> Vec<&WorkflowStep> {
        self.steps.iter().filter(|s| s.status == status).collect()
    }
}

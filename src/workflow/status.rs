use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a step is in its lifecycle.
///
/// The model itself writes statuses loosely (see
/// [`Workflow::set_step_status`](super::Workflow::set_step_status)); the transition
/// table below is only enforced by
/// [`Workflow::transition_step`](super::Workflow::transition_step).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    #[default]
    Pending,
    Assigned,
    #[serde(alias = "in-progress", alias = "in_progress", alias = "inprogress")]
    Active,
    Completed,
    Skipped,
    Cancelled,
}

impl StepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Assigned => "assigned",
            StepStatus::Active => "active",
            StepStatus::Completed => "completed",
            StepStatus::Skipped => "skipped",
            StepStatus::Cancelled => "cancelled",
        }
    }

    /// Completed, skipped and cancelled steps never change again.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            StepStatus::Completed | StepStatus::Skipped | StepStatus::Cancelled
        )
    }

    pub fn can_transition_to(self, next: StepStatus) -> bool {
        use StepStatus::*;
        match self {
            Pending => matches!(next, Assigned | Active | Skipped | Cancelled),
            Assigned => matches!(next, Pending | Active | Skipped | Cancelled),
            Active => matches!(next, Completed | Skipped | Cancelled),
            Completed | Skipped | Cancelled => false,
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

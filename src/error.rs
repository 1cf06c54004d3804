use crate::workflow::StepStatus;
use thiserror::Error;

/// Errors raised by the structural operations of a [`Workflow`](crate::workflow::Workflow).
///
/// Evaluation never produces these; they only report that a requested edit
/// could not be located. The step order stays contiguous either way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Step '{0}' does not exist in this workflow")]
    StepNotFound(String),

    #[error("Target index {index} is out of bounds for a workflow with {len} steps")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Mapping '{mapping_id}' was not found on step '{step_id}'")]
    MappingNotFound { step_id: String, mapping_id: String },
}

/// Errors raised by the strict step lifecycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Step '{0}' does not exist in this workflow")]
    StepNotFound(String),

    #[error("Step '{step_id}' cannot move from '{from}' to '{to}'")]
    IllegalTransition {
        step_id: String,
        from: StepStatus,
        to: StepStatus,
    },
}

/// Errors that can occur while loading or replacing a persisted designer document.
#[derive(Error, Debug, Clone)]
pub enum RepositoryError {
    #[error("Could not read document '{key}': {message}")]
    Read { key: String, message: String },

    #[error("Could not write document '{key}': {message}")]
    Write { key: String, message: String },

    #[error("Document '{key}' is not valid JSON: {message}")]
    Parse { key: String, message: String },

    #[error("Serialization failed: {0}")]
    Serialize(String),

    #[error("Process '{0}' not found in the document")]
    ProcessNotFound(String),
}

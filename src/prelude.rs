//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the michi crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use michi::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! // Load a stored designer document and resolve one process
//! let repository = DocumentRepository::new(FileStore::new("path/to/store"));
//! let context = repository.load_process("purchase")?;
//!
//! // Route every instance that just finished its first step
//! let cursors: Vec<InstanceCursor> = serde_json::from_str(&std::fs::read_to_string("path/to/instances.json")?)?;
//! let advances = StepRunner::from_context(&context).advance_all(&cursors);
//!
//! for advance in advances {
//!     println!("{} -> {:?}", advance.instance_id, advance.decision.next_step_id);
//! }
//! # Ok(())
//! # }
//! ```

// Field namespace
pub use crate::field::{
    Dataset, DatasetCatalog, DatasetResolver, Field, FieldIndex, FieldOption, FieldRegistry,
    FieldType,
};

// Rules
pub use crate::rule::{Condition, ConditionGroup, Logic, Operator, RightMode, Rule, RuleBook};

// Data mappings
pub use crate::mapping::{DataMapping, MappingExecutor, MappingPolicy, Transformation};

// Workflow model and routing
pub use crate::workflow::{
    Assignee, NewStep, RoutingDecision, RoutingMapping, StepStatus, StepUpdate, Workflow,
    WorkflowSettings, WorkflowStep,
};

// Instances and persistence
pub use crate::instance::{Advance, InstanceCursor, StepRunner};
pub use crate::repository::{
    DesignerDocument, DocumentRepository, FieldRepository, FileStore, MemoryStore,
    WorkflowRepository,
};

// Descriptions and values
pub use crate::describe::Describer;
pub use crate::value::ValueRecord;

// Error types
pub use crate::error::{RepositoryError, TransitionError, WorkflowError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

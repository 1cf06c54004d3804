use crate::field::{Dataset, DatasetCatalog, Field, FieldIndex};
use crate::rule::{Rule, RuleBook};
use crate::workflow::Workflow;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields shared by every process of an enterprise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnterpriseSection {
    #[serde(default)]
    pub metadata_fields: Vec<Field>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One process: its own fields, rule set, datasets and workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDocument {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub metadata_fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow: Option<Workflow>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub datasets: Vec<Dataset>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProcessDocument {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            metadata_fields: Vec::new(),
            workflow: None,
            rules: Vec::new(),
            datasets: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// The whole persisted designer configuration.
///
/// Keys this crate does not model (forms, users, layout state) are kept in
/// `extra` so that a load/replace cycle does not drop them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignerDocument {
    #[serde(default)]
    pub enterprise: EnterpriseSection,
    #[serde(default)]
    pub processes: Vec<ProcessDocument>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DesignerDocument {
    pub fn process(&self, process_id: &str) -> Option<&ProcessDocument> {
        self.processes.iter().find(|p| p.id == process_id)
    }

    pub fn process_mut(&mut self, process_id: &str) -> Option<&mut ProcessDocument> {
        self.processes.iter_mut().find(|p| p.id == process_id)
    }

    /// Everything needed to evaluate one process, resolved from this document.
    pub fn context(&self, process_id: &str) -> Option<ProcessContext> {
        let process = self.process(process_id)?;
        Some(ProcessContext {
            workflow: process.workflow.clone().unwrap_or_default(),
            fields: FieldIndex::new(
                self.enterprise.metadata_fields.clone(),
                process.metadata_fields.clone(),
            ),
            rules: RuleBook::new(&process.rules),
            datasets: DatasetCatalog::new(process.datasets.clone()),
        })
    }
}

/// A process resolved into its evaluation-ready parts.
#[derive(Debug, Clone)]
pub struct ProcessContext {
    pub workflow: Workflow,
    pub fields: FieldIndex,
    pub rules: RuleBook,
    pub datasets: DatasetCatalog,
}

use super::{DesignerDocument, KeyValueStore, ProcessContext};
use crate::error::RepositoryError;
use crate::field::{DatasetCatalog, Field, FieldIndex, FieldRegistry};
use crate::rule::Rule;
use crate::workflow::Workflow;

/// Key the designer document is stored under by default.
pub const DEFAULT_DOCUMENT_KEY: &str = "workflow_designer_config";

/// Loads and replaces the workflow of a process.
pub trait WorkflowRepository {
    /// `Ok(None)` when the process exists but has no workflow yet.
    fn load_workflow(&self, process_id: &str) -> Result<Option<Workflow>, RepositoryError>;

    /// Replaces the stored workflow wholesale.
    fn save_workflow(&self, process_id: &str, workflow: &Workflow) -> Result<(), RepositoryError>;
}

/// Read access to the field namespace, datasets and rules of a process.
pub trait FieldRepository {
    fn enterprise_fields(&self) -> Result<Vec<Field>, RepositoryError>;

    fn process_fields(&self, process_id: &str) -> Result<Vec<Field>, RepositoryError>;

    fn datasets(&self, process_id: &str) -> Result<DatasetCatalog, RepositoryError>;

    fn rules(&self, process_id: &str) -> Result<Vec<Rule>, RepositoryError>;

    /// The combined, lookup-ready namespace of a process.
    fn field_index(&self, process_id: &str) -> Result<FieldIndex, RepositoryError> {
        Ok(FieldIndex::new(
            self.enterprise_fields()?,
            self.process_fields(process_id)?,
        ))
    }

    /// Enterprise fields followed by the process fields.
    fn fields_for_process(&self, process_id: &str) -> Result<Vec<Field>, RepositoryError> {
        Ok(self.field_index(process_id)?.fields().to_vec())
    }

    fn get_field(&self, process_id: &str, field_id: &str) -> Result<Option<Field>, RepositoryError> {
        Ok(self.field_index(process_id)?.get_field(field_id).cloned())
    }
}

/// A repository over one [`DesignerDocument`] kept under a single store key.
///
/// Every write loads the current document, changes it and replaces it whole,
/// so concurrent writers overwrite each other (last writer wins).
pub struct DocumentRepository<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> DocumentRepository<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_DOCUMENT_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the document. Nothing stored yet loads as an empty document.
    pub fn load_document(&self) -> Result<DesignerDocument, RepositoryError> {
        let Some(raw) = self.store.get(&self.key)? else {
            tracing::info!(key = %self.key, "no stored document, starting empty");
            return Ok(DesignerDocument::default());
        };
        let document: DesignerDocument =
            serde_json::from_str(&raw).map_err(|e| RepositoryError::Parse {
                key: self.key.clone(),
                message: e.to_string(),
            })?;
        tracing::info!(
            key = %self.key,
            processes = document.processes.len(),
            "document loaded"
        );
        Ok(document)
    }

    pub fn replace_document(&self, document: &DesignerDocument) -> Result<(), RepositoryError> {
        let raw = serde_json::to_string_pretty(document)
            .map_err(|e| RepositoryError::Serialize(e.to_string()))?;
        self.store.set(&self.key, &raw)?;
        tracing::info!(
            key = %self.key,
            processes = document.processes.len(),
            "document replaced"
        );
        Ok(())
    }

    /// Loads everything needed to evaluate one process.
    pub fn load_process(&self, process_id: &str) -> Result<ProcessContext, RepositoryError> {
        self.load_document()?
            .context(process_id)
            .ok_or_else(|| RepositoryError::ProcessNotFound(process_id.to_string()))
    }

    fn with_document<T>(
        &self,
        read: impl FnOnce(&DesignerDocument) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        read(&self.load_document()?)
    }
}

impl<S: KeyValueStore> WorkflowRepository for DocumentRepository<S> {
    fn load_workflow(&self, process_id: &str) -> Result<Option<Workflow>, RepositoryError> {
        self.with_document(|document| {
            document
                .process(process_id)
                .map(|p| p.workflow.clone())
                .ok_or_else(|| RepositoryError::ProcessNotFound(process_id.to_string()))
        })
    }

    fn save_workflow(&self, process_id: &str, workflow: &Workflow) -> Result<(), RepositoryError> {
        let mut document = self.load_document()?;
        let process = document
            .process_mut(process_id)
            .ok_or_else(|| RepositoryError::ProcessNotFound(process_id.to_string()))?;
        process.workflow = Some(workflow.clone());
        self.replace_document(&document)
    }
}

impl<S: KeyValueStore> FieldRepository for DocumentRepository<S> {
    fn enterprise_fields(&self) -> Result<Vec<Field>, RepositoryError> {
        self.with_document(|document| Ok(document.enterprise.metadata_fields.clone()))
    }

    fn process_fields(&self, process_id: &str) -> Result<Vec<Field>, RepositoryError> {
        self.with_document(|document| {
            document
                .process(process_id)
                .map(|p| p.metadata_fields.clone())
                .ok_or_else(|| RepositoryError::ProcessNotFound(process_id.to_string()))
        })
    }

    fn datasets(&self, process_id: &str) -> Result<DatasetCatalog, RepositoryError> {
        self.with_document(|document| {
            document
                .process(process_id)
                .map(|p| DatasetCatalog::new(p.datasets.clone()))
                .ok_or_else(|| RepositoryError::ProcessNotFound(process_id.to_string()))
        })
    }

    fn rules(&self, process_id: &str) -> Result<Vec<Rule>, RepositoryError> {
        self.with_document(|document| {
            document
                .process(process_id)
                .map(|p| p.rules.clone())
                .ok_or_else(|| RepositoryError::ProcessNotFound(process_id.to_string()))
        })
    }

    /// Reads the document once instead of once per field list.
    fn field_index(&self, process_id: &str) -> Result<FieldIndex, RepositoryError> {
        self.with_document(|document| {
            let process = document
                .process(process_id)
                .ok_or_else(|| RepositoryError::ProcessNotFound(process_id.to_string()))?;
            Ok(FieldIndex::new(
                document.enterprise.metadata_fields.clone(),
                process.metadata_fields.clone(),
            ))
        })
    }
}

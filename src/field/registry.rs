use super::{Field, FieldType};
use ahash::AHashMap;

/// Id of the enterprise status field, which is always backed by the status dataset.
pub const ENTERPRISE_STATUS_FIELD: &str = "enterprise_status";

/// Id of the synthetic field holding the assignee of the current workflow step.
pub const WORKFLOW_ASSIGNED_TO: &str = "workflow_assigned_to";

/// Enterprise fields that are managed by the platform and never offered as mapping targets.
const RESERVED_FIELD_IDS: [&str; 3] = [
    "enterprise_id",
    "enterprise_title",
    "enterprise_assigned_to",
];

/// Resolves field ids to their declarations.
///
/// Read-only from the engine's point of view. Implementations must be shareable
/// across threads so evaluation can fan out over many instances.
pub trait FieldRegistry: Send + Sync {
    fn get_field(&self, field_id: &str) -> Option<&Field>;

    /// Every field in scope, enterprise fields first.
    fn fields(&self) -> &[Field];

    fn field_type(&self, field_id: &str) -> Option<FieldType> {
        self.get_field(field_id).map(|f| f.field_type)
    }
}

/// The combined field namespace of one process.
#[derive(Debug, Clone, Default)]
pub struct FieldIndex {
    fields: Vec<Field>,
    index: AHashMap<String, usize>,
}

impl FieldIndex {
    /// Combines enterprise and process fields, enterprise first.
    ///
    /// On an id collision the enterprise declaration wins. The synthetic
    /// `workflow_assigned_to` field is always appended.
    pub fn new(enterprise: Vec<Field>, process: Vec<Field>) -> Self {
        let mut this = Self::default();
        for mut field in enterprise {
            if field.id == ENTERPRISE_STATUS_FIELD {
                field.dataset_id = Some(super::ENTERPRISE_STATUS_DATASET.to_string());
            }
            this.push(field);
        }
        for field in process {
            this.push(field);
        }
        this.push(Self::workflow_assignee_field());
        this
    }

    /// An index over an arbitrary list of fields, without enterprise handling.
    pub fn from_fields(fields: impl IntoIterator<Item = Field>) -> Self {
        let mut this = Self::default();
        for field in fields {
            this.push(field);
        }
        this
    }

    fn push(&mut self, field: Field) {
        if self.index.contains_key(&field.id) {
            tracing::debug!(field_id = %field.id, "duplicate field id ignored");
            return;
        }
        self.index.insert(field.id.clone(), self.fields.len());
        self.fields.push(field);
    }

    fn workflow_assignee_field() -> Field {
        let mut field = Field::new(WORKFLOW_ASSIGNED_TO, "Assigned To", FieldType::User);
        field.description = Some("User assigned to this workflow step".to_string());
        field
    }

    /// Fields that may take part in a data mapping.
    ///
    /// Platform-managed identity fields and anything named "name" are left out.
    pub fn mapping_fields(&self) -> Vec<&Field> {
        self.fields
            .iter()
            .filter(|f| {
                !RESERVED_FIELD_IDS.contains(&f.id.as_str())
                    && f.field_type != FieldType::Id
                    && !f.name.eq_ignore_ascii_case("name")
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FieldRegistry for FieldIndex {
    fn get_field(&self, field_id: &str) -> Option<&Field> {
        self.index.get(field_id).map(|&i| &self.fields[i])
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// The declared type of a field.
///
/// The condition evaluator and the compatibility matrix match on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Number,
    Currency,
    Date,
    Email,
    Select,
    Dropdown,
    #[serde(rename = "yes/no", alias = "boolean", alias = "yes-no")]
    YesNo,
    Checkbox,
    User,
    Users,
    Id,
}

impl FieldType {
    /// Number-like types that compare and add as numbers.
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Number | FieldType::Currency)
    }

    /// Choice types whose values may be backed by an option list or a dataset.
    pub fn is_choice(self) -> bool {
        matches!(self, FieldType::Select | FieldType::Dropdown)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Number => "number",
            FieldType::Currency => "currency",
            FieldType::Date => "date",
            FieldType::Email => "email",
            FieldType::Select => "select",
            FieldType::Dropdown => "dropdown",
            FieldType::YesNo => "yes/no",
            FieldType::Checkbox => "checkbox",
            FieldType::User => "user",
            FieldType::Users => "users",
            FieldType::Id => "id",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable option of a choice field.
///
/// Older documents store options as bare strings; both forms are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldOption {
    Labeled {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
    },
    Plain(String),
}

impl FieldOption {
    pub fn value(&self) -> &str {
        match self {
            FieldOption::Labeled { value, .. } => value,
            FieldOption::Plain(value) => value,
        }
    }

    /// The label shown to a user, falling back to the raw value.
    pub fn label(&self) -> &str {
        match self {
            FieldOption::Labeled {
                label: Some(label), ..
            } if !label.is_empty() => label,
            _ => self.value(),
        }
    }
}

/// A typed, named data slot, either enterprise-wide or process-specific.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
}

impl Field {
    pub fn new(id: impl Into<String>, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            field_type,
            options: None,
            dataset_id: None,
            required: None,
            description: None,
            placeholder: None,
            read_only: None,
        }
    }

    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_dataset(mut self, dataset_id: impl Into<String>) -> Self {
        self.dataset_id = Some(dataset_id.into());
        self
    }
}

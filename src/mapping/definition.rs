use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// What a data mapping does to its target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transformation {
    #[default]
    Copy,
    Set,
    Add,
    Subtract,
}

impl Transformation {
    /// The wording shown to a user.
    pub fn display(self) -> &'static str {
        match self {
            Transformation::Copy => "Copy to",
            Transformation::Set => "Set value",
            Transformation::Add => "Add to",
            Transformation::Subtract => "Subtract from",
        }
    }
}

impl fmt::Display for Transformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Transformation::Copy => "copy",
            Transformation::Set => "set",
            Transformation::Add => "add",
            Transformation::Subtract => "subtract",
        })
    }
}

fn enabled_by_default() -> bool {
    true
}

/// A field-to-field (or literal-to-field) transformation, optionally gated by a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataMapping {
    pub id: String,
    #[serde(default)]
    pub source_field: Option<String>,
    #[serde(default)]
    pub target_field: Option<String>,
    #[serde(default)]
    pub transformation: Transformation,
    /// Only meaningful for [`Transformation::Set`].
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub rule_id: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl DataMapping {
    /// A blank, enabled `copy` mapping.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_field: None,
            target_field: None,
            transformation: Transformation::Copy,
            value: None,
            rule_id: None,
            enabled: true,
        }
    }

    /// Changes the source field.
    ///
    /// A different source invalidates the transformation and target that were
    /// chosen for the old one, so they are reset.
    pub fn with_source(mut self, source_field: impl Into<String>) -> Self {
        let source_field = source_field.into();
        if self.source_field.as_deref() != Some(source_field.as_str()) {
            self.transformation = Transformation::Copy;
            self.target_field = None;
            self.value = None;
        }
        self.source_field = Some(source_field);
        self
    }

    /// Changes the transformation, clearing target and value when it actually changes.
    pub fn with_transformation(mut self, transformation: Transformation) -> Self {
        if self.transformation != transformation {
            self.target_field = None;
            self.value = None;
        }
        self.transformation = transformation;
        self
    }

    /// Changes the target field. A `set` mapping drops its literal along with the old target.
    pub fn with_target(mut self, target_field: impl Into<String>) -> Self {
        if self.transformation == Transformation::Set {
            self.value = None;
        }
        self.target_field = Some(target_field.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_rule(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = Some(rule_id.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// The referenced rule id, treating a blank id as no rule.
    pub fn gating_rule(&self) -> Option<&str> {
        self.rule_id.as_deref().filter(|id| !id.is_empty())
    }
}

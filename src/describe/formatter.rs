use crate::field::{DatasetResolver, FieldRegistry, choice_options};
use crate::mapping::{DataMapping, Transformation};
use crate::rule::{Condition, LegacyRule, Rule, RightMode};
use crate::value::{is_empty, to_text};
use serde_json::Value;

const UNKNOWN: &str = "Unknown";

/// Renders rules and data mappings as the one-line summaries shown to designers.
pub struct Describer<'a> {
    registry: &'a dyn FieldRegistry,
    datasets: Option<&'a dyn DatasetResolver>,
}

impl<'a> Describer<'a> {
    pub fn new(registry: &'a dyn FieldRegistry) -> Self {
        Self {
            registry,
            datasets: None,
        }
    }

    /// Resolves choice-field literals to their option labels when describing.
    pub fn with_datasets(mut self, datasets: &'a dyn DatasetResolver) -> Self {
        self.datasets = Some(datasets);
        self
    }

    /// Summarises a rule, e.g. `Amount ≥ "100" AND Status = "Approved"`.
    ///
    /// No rule renders as an empty string, an empty rule as `Always`.
    pub fn describe_rule(&self, rule: Option<&Rule>) -> String {
        match rule {
            None => String::new(),
            Some(Rule::Grouped(group)) if group.conditions.is_empty() => "Always".to_string(),
            Some(Rule::Grouped(group)) => group
                .conditions
                .iter()
                .map(|c| self.describe_condition(c))
                .collect::<Vec<_>>()
                .join(&format!(" {} ", group.logic)),
            Some(Rule::Legacy(legacy)) => self.describe_legacy(legacy),
        }
    }

    pub fn describe_condition(&self, condition: &Condition) -> String {
        let left = self.field_name(Some(&condition.left_field_id));
        let operator = condition.operator.display();

        let right = match condition.right_mode {
            RightMode::Field => Some(format!(
                "[{}]",
                self.field_name(condition.right_field_id.as_deref())
            )),
            RightMode::Value if condition.operator.is_unary() => None,
            RightMode::Value => Some(format!(
                "\"{}\"",
                self.literal(&condition.left_field_id, condition.right_value.as_ref())
            )),
        };

        match right {
            Some(right) => format!("{} {} {}", left, operator, right),
            None => format!("{} {}", left, operator),
        }
    }

    /// Older rules render without brackets or quotes around the right side.
    fn describe_legacy(&self, legacy: &LegacyRule) -> String {
        let right = match legacy.right_mode() {
            RightMode::Value => self.literal(&legacy.left_field_id, legacy.right_literal()),
            RightMode::Field => self.field_name(legacy.right_field_id.as_deref()).to_string(),
        };
        format!(
            "{} {} {}",
            self.field_name(Some(&legacy.left_field_id)),
            legacy.operator.display(),
            right
        )
    }

    /// Summarises a data mapping, e.g. `Amount → Add to → Total`.
    pub fn describe_mapping(&self, mapping: &DataMapping) -> String {
        let source = self.field_name(mapping.source_field.as_deref());
        let target = match mapping.transformation {
            Transformation::Set if is_empty(mapping.value.as_ref()) => "No value".to_string(),
            Transformation::Set => to_text(mapping.value.as_ref()).into_owned(),
            Transformation::Copy | Transformation::Add | Transformation::Subtract => {
                self.field_name(mapping.target_field.as_deref()).to_string()
            }
        };
        format!("{} → {} → {}", source, mapping.transformation.display(), target)
    }

    fn field_name(&self, field_id: Option<&str>) -> &str {
        field_id
            .and_then(|id| self.registry.get_field(id))
            .map_or(UNKNOWN, |f| f.name.as_str())
    }

    /// The literal as a user would read it: the option label for choice fields
    /// when datasets are available, `(empty)` for nothing.
    fn literal(&self, left_field_id: &str, value: Option<&Value>) -> String {
        if is_empty(value) {
            return "(empty)".to_string();
        }
        let raw = to_text(value);
        let label = self.datasets.and_then(|datasets| {
            let field = self.registry.get_field(left_field_id)?;
            choice_options(field, datasets)
                .into_iter()
                .find(|option| option.value() == raw)
                .map(|option| option.label().to_string())
        });
        label.unwrap_or_else(|| raw.into_owned())
    }
}

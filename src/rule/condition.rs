use crate::field::{FieldRegistry, FieldType};
use crate::value::{ValueRecord, compare_dates, is_empty, to_number, to_text};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

/// The comparison a condition performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "not_contains")]
    NotContains,
    #[serde(rename = "empty")]
    Empty,
    #[serde(rename = "not_empty")]
    NotEmpty,
}

impl Operator {
    /// The symbol used in the persisted document.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThanOrEqual => "<=",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::Empty => "empty",
            Operator::NotEmpty => "not_empty",
        }
    }

    /// The wording shown to a user.
    pub fn display(self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "≠",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterThanOrEqual => "≥",
            Operator::LessThanOrEqual => "≤",
            Operator::Contains => "contains",
            Operator::NotContains => "does not contain",
            Operator::Empty => "is empty",
            Operator::NotEmpty => "is not empty",
        }
    }

    /// `empty` and `not_empty` only look at the left side.
    pub fn is_unary(self) -> bool {
        matches!(self, Operator::Empty | Operator::NotEmpty)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Where the right-hand side of a condition comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RightMode {
    #[default]
    Field,
    Value,
}

/// One atomic comparison between a field's value and another field or a literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub left_field_id: String,
    pub operator: Operator,
    #[serde(default)]
    pub right_mode: RightMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_field_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_value: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Condition {
    /// A condition comparing a field against a literal.
    pub fn value(
        id: impl Into<String>,
        left_field_id: impl Into<String>,
        operator: Operator,
        right_value: impl Into<Value>,
    ) -> Self {
        Self {
            id: id.into(),
            left_field_id: left_field_id.into(),
            operator,
            right_mode: RightMode::Value,
            right_field_id: None,
            right_value: Some(right_value.into()),
            extra: Map::new(),
        }
    }

    /// A condition comparing two fields of the same record.
    pub fn field(
        id: impl Into<String>,
        left_field_id: impl Into<String>,
        operator: Operator,
        right_field_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            left_field_id: left_field_id.into(),
            operator,
            right_mode: RightMode::Field,
            right_field_id: Some(right_field_id.into()),
            right_value: None,
            extra: Map::new(),
        }
    }

    /// Evaluates the condition against a record.
    ///
    /// Never fails: an unresolvable left field reads as empty, an unresolvable
    /// right field reads as undefined, and an ordering operator on a field type
    /// without an ordering is `false`.
    pub fn evaluate(&self, record: &ValueRecord, registry: &dyn FieldRegistry) -> bool {
        let left_type = registry.field_type(&self.left_field_id);
        let left = match left_type {
            Some(_) => record.get(&self.left_field_id),
            None => {
                tracing::trace!(
                    condition = %self.id,
                    field_id = %self.left_field_id,
                    "left field unresolved, treating it as empty"
                );
                None
            }
        };
        let field_type = left_type.unwrap_or(FieldType::Text);
        let right = || self.right_operand(record, registry);

        let verdict = match self.operator {
            Operator::Empty => is_empty(left),
            Operator::NotEmpty => !is_empty(left),
            Operator::Equal => equals(field_type, left, right()),
            Operator::NotEqual => !equals(field_type, left, right()),
            Operator::GreaterThan => ordering(field_type, left, right()) == Some(Ordering::Greater),
            Operator::LessThan => ordering(field_type, left, right()) == Some(Ordering::Less),
            Operator::GreaterThanOrEqual => matches!(
                ordering(field_type, left, right()),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::LessThanOrEqual => matches!(
                ordering(field_type, left, right()),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Operator::Contains => contains(left, right()),
            Operator::NotContains => !contains(left, right()),
        };

        tracing::trace!(condition = %self.id, operator = %self.operator, verdict, "condition evaluated");
        verdict
    }

    fn right_operand<'r>(
        &'r self,
        record: &'r ValueRecord,
        registry: &dyn FieldRegistry,
    ) -> Option<&'r Value> {
        match self.right_mode {
            RightMode::Value => self.right_value.as_ref(),
            RightMode::Field => self
                .right_field_id
                .as_deref()
                .filter(|id| registry.get_field(id).is_some())
                .and_then(|id| record.get(id)),
        }
    }
}

/// Equality by the left field's declared type.
fn equals(field_type: FieldType, left: Option<&Value>, right: Option<&Value>) -> bool {
    match field_type {
        // NaN never equals anything, so `!=` on a non-numeric operand is always true.
        FieldType::Number | FieldType::Currency => to_number(left) == to_number(right),
        FieldType::Text
        | FieldType::Textarea
        | FieldType::Date
        | FieldType::Email
        | FieldType::Select
        | FieldType::Dropdown
        | FieldType::YesNo
        | FieldType::Checkbox
        | FieldType::User
        | FieldType::Users
        | FieldType::Id => to_text(left) == to_text(right),
    }
}

/// Ordering by the left field's declared type. `None` means "not comparable".
fn ordering(field_type: FieldType, left: Option<&Value>, right: Option<&Value>) -> Option<Ordering> {
    match field_type {
        FieldType::Number | FieldType::Currency => to_number(left).partial_cmp(&to_number(right)),
        FieldType::Date => compare_dates(left, right),
        FieldType::Text
        | FieldType::Textarea
        | FieldType::Email
        | FieldType::Select
        | FieldType::Dropdown
        | FieldType::YesNo
        | FieldType::Checkbox
        | FieldType::User
        | FieldType::Users
        | FieldType::Id => None,
    }
}

fn contains(left: Option<&Value>, right: Option<&Value>) -> bool {
    to_text(left)
        .to_lowercase()
        .contains(&to_text(right).to_lowercase())
}

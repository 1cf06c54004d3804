use super::{Condition, Operator, RightMode};
use crate::field::FieldRegistry;
use crate::value::ValueRecord;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;

/// How the conditions of a rule are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Logic {
    #[default]
    #[serde(rename = "AND", alias = "and")]
    And,
    #[serde(rename = "OR", alias = "or")]
    Or,
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::And => f.write_str("AND"),
            Logic::Or => f.write_str("OR"),
        }
    }
}

/// The current rule shape: an ordered list of conditions joined by one logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub logic: Logic,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The older flat shape: a single condition stored directly on the rule.
///
/// Rules created from the rules table carry only a bare `value` and no
/// `rightMode`; such a rule compares against that literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub left_field_id: String,
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_mode: Option<RightMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_field_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LegacyRule {
    /// The effective right-hand mode.
    ///
    /// An explicit `rightMode` wins; otherwise a bare `value` makes this a
    /// literal comparison, and anything else compares against a field.
    pub fn right_mode(&self) -> RightMode {
        match self.right_mode {
            Some(mode) => mode,
            None if self.right_value.is_none() && self.value.is_some() => RightMode::Value,
            None => RightMode::Field,
        }
    }

    /// The literal compared against, `rightValue` first and then the bare `value`.
    pub fn right_literal(&self) -> Option<&Value> {
        self.right_value.as_ref().or(self.value.as_ref())
    }

    fn to_condition(&self) -> Condition {
        Condition {
            id: self.id.clone().unwrap_or_default(),
            left_field_id: self.left_field_id.clone(),
            operator: self.operator,
            right_mode: self.right_mode(),
            right_field_id: self.right_field_id.clone(),
            right_value: self.right_literal().cloned(),
            extra: Map::new(),
        }
    }
}

/// A rule as it is stored.
///
/// Both shapes are kept verbatim so that a document round-trips unchanged;
/// [`Rule::canonical`] adapts either one to the form the evaluator works on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rule {
    Grouped(ConditionGroup),
    Legacy(LegacyRule),
}

impl Rule {
    /// A rule in the current shape.
    pub fn new(id: impl Into<String>, name: impl Into<String>, logic: Logic) -> Self {
        Rule::Grouped(ConditionGroup {
            id: Some(id.into()),
            name: Some(name.into()),
            conditions: Vec::new(),
            logic,
            extra: Map::new(),
        })
    }

    /// Appends a condition. A legacy rule is upgraded to the current shape first.
    pub fn with_condition(self, condition: Condition) -> Self {
        let mut group = match self {
            Rule::Grouped(group) => group,
            Rule::Legacy(legacy) => ConditionGroup {
                conditions: vec![legacy.to_condition()],
                id: legacy.id,
                name: legacy.name,
                logic: Logic::And,
                extra: legacy.extra,
            },
        };
        group.conditions.push(condition);
        Rule::Grouped(group)
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            Rule::Grouped(group) => group.id.as_deref(),
            Rule::Legacy(legacy) => legacy.id.as_deref(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Rule::Grouped(group) => group.name.as_deref(),
            Rule::Legacy(legacy) => legacy.name.as_deref(),
        }
    }

    pub fn is_legacy(&self) -> bool {
        matches!(self, Rule::Legacy(_))
    }

    /// Adapts the stored shape into conditions plus logic.
    ///
    /// A legacy rule becomes a single condition, for which the logic is irrelevant.
    pub fn canonical(&self) -> CanonicalRule<'_> {
        match self {
            Rule::Grouped(group) => CanonicalRule {
                conditions: Cow::Borrowed(&group.conditions),
                logic: group.logic,
            },
            Rule::Legacy(legacy) => CanonicalRule {
                conditions: Cow::Owned(vec![legacy.to_condition()]),
                logic: Logic::And,
            },
        }
    }

    pub fn evaluate(&self, record: &ValueRecord, registry: &dyn FieldRegistry) -> bool {
        self.canonical().evaluate(record, registry)
    }
}

/// The evaluation form of a rule.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRule<'a> {
    pub conditions: Cow<'a, [Condition]>,
    pub logic: Logic,
}

impl CanonicalRule<'_> {
    /// Combines the condition verdicts, short-circuiting in list order.
    ///
    /// An empty list is vacuously `true` under either logic.
    pub fn evaluate(&self, record: &ValueRecord, registry: &dyn FieldRegistry) -> bool {
        if self.conditions.is_empty() {
            return true;
        }
        match self.logic {
            Logic::And => self
                .conditions
                .iter()
                .all(|c| c.evaluate(record, registry)),
            Logic::Or => self
                .conditions
                .iter()
                .any(|c| c.evaluate(record, registry)),
        }
    }

    pub fn into_owned(self) -> CanonicalRule<'static> {
        CanonicalRule {
            conditions: Cow::Owned(self.conditions.into_owned()),
            logic: self.logic,
        }
    }
}

/// Evaluates an optional rule. No rule at all is the same verdict as an empty rule.
pub fn evaluate_rule(rule: Option<&Rule>, record: &ValueRecord, registry: &dyn FieldRegistry) -> bool {
    rule.is_none_or(|r| r.evaluate(record, registry))
}

/// A process's named rules, indexed by id and canonicalised once up front.
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    rules: AHashMap<String, CanonicalRule<'static>>,
}

impl RuleBook {
    pub fn new(rules: &[Rule]) -> Self {
        let mut book = AHashMap::with_capacity(rules.len());
        for rule in rules {
            match rule.id() {
                Some(id) => {
                    book.insert(id.to_string(), rule.canonical().into_owned());
                }
                None => tracing::warn!("rule without an id cannot be referenced and was ignored"),
            }
        }
        Self { rules: book }
    }

    pub fn get(&self, rule_id: &str) -> Option<&CanonicalRule<'static>> {
        self.rules.get(rule_id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

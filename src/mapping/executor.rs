use super::{DataMapping, Transformation};
use crate::field::FieldRegistry;
use crate::rule::RuleBook;
use crate::value::{ValueRecord, from_number, is_empty, to_number};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What to do with a mapping whose `ruleId` no longer resolves to a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedRulePolicy {
    /// Treat the mapping as unconditional.
    #[default]
    ApplyAlways,
    /// Never apply the mapping.
    Skip,
}

/// What to do when `add`/`subtract` meets an operand that is not a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonNumericPolicy {
    /// The operand contributes zero.
    #[default]
    ZeroContribution,
    /// The whole mapping is skipped.
    SkipMapping,
}

/// Tunable behaviour of the mapping executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MappingPolicy {
    pub unresolved_rule: UnresolvedRulePolicy,
    pub non_numeric: NonNumericPolicy,
}

/// Why a mapping left the record untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    RuleNotSatisfied(String),
    UnresolvedRule(String),
    MissingSource,
    MissingTarget,
    UnknownField(String),
    NonNumericOperand,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Disabled => write!(f, "mapping is disabled"),
            SkipReason::RuleNotSatisfied(id) => write!(f, "rule '{}' is not satisfied", id),
            SkipReason::UnresolvedRule(id) => write!(f, "rule '{}' does not exist", id),
            SkipReason::MissingSource => write!(f, "no source field selected"),
            SkipReason::MissingTarget => write!(f, "no target field selected"),
            SkipReason::UnknownField(id) => write!(f, "field '{}' does not exist", id),
            SkipReason::NonNumericOperand => write!(f, "operand is not numeric"),
        }
    }
}

/// The fate of one mapping in an executor run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingOutcome {
    pub mapping_id: String,
    pub skipped: Option<SkipReason>,
}

impl MappingOutcome {
    pub fn applied(&self) -> bool {
        self.skipped.is_none()
    }
}

/// The mapped record plus a per-mapping account of what happened.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingReport {
    pub record: ValueRecord,
    pub outcomes: Vec<MappingOutcome>,
}

/// Applies ordered lists of data mappings to value records.
///
/// The executor only borrows its collaborators, so one instance can be shared
/// across threads and reused for any number of records.
pub struct MappingExecutor<'a> {
    registry: &'a dyn FieldRegistry,
    rules: &'a RuleBook,
    policy: MappingPolicy,
}

impl<'a> MappingExecutor<'a> {
    pub fn new(registry: &'a dyn FieldRegistry, rules: &'a RuleBook) -> Self {
        Self {
            registry,
            rules,
            policy: MappingPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: MappingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> MappingPolicy {
        self.policy
    }

    /// Applies `mappings` in order and returns the resulting record.
    ///
    /// Each mapping sees the output of the ones before it. The input record is
    /// never modified.
    pub fn apply(&self, mappings: &[DataMapping], record: &ValueRecord) -> ValueRecord {
        self.apply_with_report(mappings, record).record
    }

    /// Like [`apply`](Self::apply), also reporting which mappings were skipped and why.
    pub fn apply_with_report(&self, mappings: &[DataMapping], record: &ValueRecord) -> MappingReport {
        let mut output = record.clone();
        let outcomes = mappings
            .iter()
            .map(|mapping| {
                let skipped = self.apply_one(mapping, &mut output).err();
                if let Some(reason) = &skipped {
                    tracing::debug!(mapping = %mapping.id, %reason, "data mapping skipped");
                }
                MappingOutcome {
                    mapping_id: mapping.id.clone(),
                    skipped,
                }
            })
            .collect();
        MappingReport {
            record: output,
            outcomes,
        }
    }

    fn apply_one(&self, mapping: &DataMapping, record: &mut ValueRecord) -> Result<(), SkipReason> {
        if !mapping.enabled {
            return Err(SkipReason::Disabled);
        }
        self.check_gate(mapping, record)?;

        let target = self.resolve(mapping.target_field.as_deref(), SkipReason::MissingTarget)?;

        match mapping.transformation {
            Transformation::Set => {
                match &mapping.value {
                    Some(value) => record.insert(target.to_string(), value.clone()),
                    None => record.remove(target),
                };
            }
            Transformation::Copy => {
                let source = self.resolve(mapping.source_field.as_deref(), SkipReason::MissingSource)?;
                match record.get(source).cloned() {
                    Some(value) => record.insert(target.to_string(), value),
                    None => record.remove(target),
                };
            }
            Transformation::Add | Transformation::Subtract => {
                let source = self.resolve(mapping.source_field.as_deref(), SkipReason::MissingSource)?;
                let current = match record.get(target) {
                    current if is_empty(current) => 0.0,
                    current => self.operand(to_number(current))?,
                };
                let delta = self.operand(to_number(record.get(source)))?;
                let result = if mapping.transformation == Transformation::Add {
                    current + delta
                } else {
                    current - delta
                };
                record.insert(target.to_string(), from_number(result));
            }
        }
        Ok(())
    }

    fn check_gate(&self, mapping: &DataMapping, record: &ValueRecord) -> Result<(), SkipReason> {
        let Some(rule_id) = mapping.gating_rule() else {
            return Ok(());
        };
        match self.rules.get(rule_id) {
            Some(rule) if rule.evaluate(record, self.registry) => Ok(()),
            Some(_) => Err(SkipReason::RuleNotSatisfied(rule_id.to_string())),
            None => {
                tracing::warn!(mapping = %mapping.id, rule_id, "data mapping references a missing rule");
                match self.policy.unresolved_rule {
                    UnresolvedRulePolicy::ApplyAlways => Ok(()),
                    UnresolvedRulePolicy::Skip => Err(SkipReason::UnresolvedRule(rule_id.to_string())),
                }
            }
        }
    }

    fn resolve<'m>(&self, field_id: Option<&'m str>, missing: SkipReason) -> Result<&'m str, SkipReason> {
        let field_id = field_id.filter(|id| !id.is_empty()).ok_or(missing)?;
        if self.registry.get_field(field_id).is_none() {
            tracing::warn!(field_id, "data mapping references a missing field");
            return Err(SkipReason::UnknownField(field_id.to_string()));
        }
        Ok(field_id)
    }

    fn operand(&self, n: f64) -> Result<f64, SkipReason> {
        if !n.is_nan() {
            return Ok(n);
        }
        match self.policy.non_numeric {
            NonNumericPolicy::ZeroContribution => Ok(0.0),
            NonNumericPolicy::SkipMapping => Err(SkipReason::NonNumericOperand),
        }
    }
}

/// Applies mappings with the default policy.
pub fn apply_mappings(
    mappings: &[DataMapping],
    record: &ValueRecord,
    registry: &dyn FieldRegistry,
    rules: &RuleBook,
) -> ValueRecord {
    MappingExecutor::new(registry, rules).apply(mappings, record)
}

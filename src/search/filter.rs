//! Filter conditions over canonical entity rows.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Task;

/// Comparison applied by a [`FilterCondition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOperator {
    /// Field equals the value (numbers compare numerically).
    #[serde(rename = "equals")]
    Equals,
    /// Case-insensitive substring; arrays match if any element does.
    #[serde(rename = "contains")]
    Contains,
    /// Numeric `>`.
    #[serde(rename = "greater_than")]
    GreaterThan,
    /// Numeric `<`.
    #[serde(rename = "less_than")]
    LessThan,
    /// Field equals one of the listed values.
    #[serde(rename = "in")]
    In,
    /// Field lists task IDs, one of which requires the skill.
    #[serde(rename = "hasTasksWithSkill")]
    HasTasksWithSkill,
}

/// One `{field, operator, value}` condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// Canonical field name (`PriorityLevel`, `Skills`, ...).
    pub field: String,
    /// Comparison.
    pub operator: FilterOperator,
    /// Operand.
    pub value: Value,
}

impl FilterCondition {
    /// Creates a condition.
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Whether `row` satisfies the condition.
    ///
    /// A row without the field never matches. `tasks` resolves task IDs
    /// for [`FilterOperator::HasTasksWithSkill`].
    pub fn matches(&self, row: &Value, tasks: &[Task]) -> bool {
        let Some(field) = row.get(&self.field) else {
            return false;
        };

        match self.operator {
            FilterOperator::Equals => loose_eq(field, &self.value),
            FilterOperator::Contains => {
                let needle = text(&self.value).to_lowercase();
                match field {
                    Value::Array(items) => items
                        .iter()
                        .any(|v| text(v).to_lowercase().contains(&needle)),
                    other => text(other).to_lowercase().contains(&needle),
                }
            }
            FilterOperator::GreaterThan => compare(field, &self.value, |a, b| a > b),
            FilterOperator::LessThan => compare(field, &self.value, |a, b| a < b),
            FilterOperator::In => match &self.value {
                Value::Array(options) => options.iter().any(|o| loose_eq(field, o)),
                _ => false,
            },
            FilterOperator::HasTasksWithSkill => {
                let skill = text(&self.value).to_lowercase();
                let Value::Array(ids) = field else {
                    return false;
                };
                ids.iter().filter_map(Value::as_str).any(|id| {
                    tasks.iter().any(|t| {
                        t.id == id
                            && t.required_skills
                                .iter()
                                .any(|s| s.to_lowercase() == skill)
                    })
                })
            }
        }
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(_), _) | (_, Value::Number(_)) => match (number(a), number(b)) {
            (Some(x), Some(y)) => (x - y).abs() < f64::EPSILON,
            _ => false,
        },
        _ => a == b,
    }
}

fn compare(field: &Value, operand: &Value, cmp: impl Fn(f64, f64) -> bool) -> bool {
    match (number(field), number(operand)) {
        (Some(a), Some(b)) => cmp(a, b),
        _ => false,
    }
}

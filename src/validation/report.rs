//! Validation request and report shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{validate, validate_rules, EntityKind, Severity, ValidationError};
use crate::error::Result;
use crate::models::{BusinessRule, Client, Task, Worker};

/// Input of a validation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRequest {
    /// Clients.
    pub clients: Vec<Client>,
    /// Workers.
    pub workers: Vec<Worker>,
    /// Tasks.
    pub tasks: Vec<Task>,
    /// Rules to check as well (optional on the wire).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<BusinessRule>,
}

impl ValidationRequest {
    /// Parses a JSON request.
    ///
    /// # Errors
    /// Returns [`AllocateError::InvalidRequest`](crate::AllocateError::InvalidRequest)
    /// if the payload is malformed or an entity collection is missing.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Runs entity checks, then rule checks.
    pub fn validate(&self) -> ValidationReport {
        let mut errors = validate(&self.clients, &self.workers, &self.tasks);
        errors.extend(validate_rules(&self.rules, &self.tasks, &self.workers));
        ValidationReport::new(errors)
    }
}

/// Finding counts.
///
/// Every entity and severity key is present, zero counts included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Number of findings.
    pub total_errors: usize,
    /// Findings per entity collection.
    pub errors_by_entity: BTreeMap<EntityKind, usize>,
    /// Findings per severity.
    pub errors_by_severity: BTreeMap<Severity, usize>,
}

impl Default for ValidationSummary {
    fn default() -> Self {
        Self {
            total_errors: 0,
            errors_by_entity: EntityKind::ALL.iter().map(|&k| (k, 0)).collect(),
            errors_by_severity: Severity::ALL.iter().map(|&s| (s, 0)).collect(),
        }
    }
}

/// Findings with their summary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Findings in check order.
    pub errors: Vec<ValidationError>,
    /// Counts.
    pub summary: ValidationSummary,
}

impl ValidationReport {
    /// Builds a report and its summary.
    pub fn new(errors: Vec<ValidationError>) -> Self {
        let mut summary = ValidationSummary {
            total_errors: errors.len(),
            ..ValidationSummary::default()
        };
        for e in &errors {
            *summary.errors_by_entity.entry(e.entity).or_insert(0) += 1;
            *summary.errors_by_severity.entry(e.severity).or_insert(0) += 1;
        }
        Self { errors, summary }
    }

    /// Whether any finding is critical (allocation should be held back).
    pub fn has_critical(&self) -> bool {
        self.errors.iter().any(ValidationError::is_critical)
    }

    /// Whether there are no findings at all.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of findings with the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.summary
            .errors_by_severity
            .get(&severity)
            .copied()
            .unwrap_or(0)
    }

    /// Findings for one row.
    pub fn errors_for_row(&self, entity: EntityKind, row_id: &str) -> Vec<&ValidationError> {
        self.errors
            .iter()
            .filter(|e| e.entity == entity && e.row_id == row_id)
            .collect()
    }
}

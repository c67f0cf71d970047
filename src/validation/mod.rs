//! Input validation for allocation problems.
//!
//! Checks the integrity of clients, workers, tasks and business rules
//! before allocation. Every finding is returned as a [`ValidationError`]
//! record; nothing here fails. All checks run on every call, so one pass
//! surfaces the full error set.
//!
//! # Entity checks ([`validate`])
//!
//! | Check | Severity |
//! |-------|----------|
//! | Missing ID or name | critical |
//! | Duplicate ID (one error per offending row) | critical |
//! | Non-integer or non-positive `AvailableSlots` entries | warning |
//! | `PriorityLevel` outside 1..=5 | warning |
//! | `Duration` below 1 | warning |
//! | Negative `MaxLoadPerPhase`, `MaxConcurrent` below 1 | warning |
//! | Invalid `AttributesJSON` | warning |
//! | Unknown `RequestedTaskIDs` / `Dependencies` | critical |
//! | Circular `Dependencies` | warning |
//! | Required skill no worker has | critical |
//! | Fewer `AvailableSlots` than `MaxLoadPerPhase` | warning |
//! | `MaxConcurrent` above the qualified worker count | warning |
//! | Unparsable `PreferredPhases` | warning |
//! | Single-phase demand above phase capacity | warning |
//!
//! # Rule checks ([`validate_rules`])
//!
//! Unknown task references, empty phase windows, degenerate co-run
//! groups, load limits for empty groups, unknown skills, overlapping
//! co-run groups and duplicate rule IDs.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

mod entities;
mod report;
mod rules;

pub use entities::validate;
pub use report::{ValidationReport, ValidationRequest, ValidationSummary};
pub use rules::validate_rules;

use serde::{Deserialize, Serialize};

/// Entity collection a finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Client rows.
    Clients,
    /// Worker rows.
    Workers,
    /// Task rows.
    Tasks,
    /// Business rules.
    Rules,
}

impl EntityKind {
    /// Every collection, in report order.
    pub const ALL: [Self; 4] = [Self::Clients, Self::Workers, Self::Tasks, Self::Rules];
}

/// How serious a finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks a meaningful allocation.
    Critical,
    /// Likely data problem; allocation still runs.
    Warning,
    /// Informational.
    Info,
}

impl Severity {
    /// Every severity, most serious first.
    pub const ALL: [Self; 3] = [Self::Critical, Self::Warning, Self::Info];
}

/// A validation finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Finding identifier, unique within one run.
    pub id: String,
    /// Entity collection.
    pub entity: EntityKind,
    /// Row key, or `row-<index>` when the key itself is missing.
    pub row_id: String,
    /// Offending field.
    pub field: String,
    /// Human-readable description.
    pub message: String,
    /// Severity.
    pub severity: Severity,
    /// Offending value, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    /// Suggested fix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ValidationError {
    /// Creates a finding without value or suggestion.
    pub fn new(
        id: impl Into<String>,
        entity: EntityKind,
        row_id: impl Into<String>,
        field: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            entity,
            row_id: row_id.into(),
            field: field.into(),
            message: message.into(),
            severity,
            value: None,
            suggestion: None,
        }
    }

    /// Attaches the offending value.
    pub fn with_value(mut self, value: impl Serialize) -> Self {
        self.value = serde_json::to_value(value).ok();
        self
    }

    /// Attaches a suggested fix.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Whether the finding is critical.
    pub fn is_critical(&self) -> bool {
        self.severity == Severity::Critical
    }
}

/// Row key, falling back to `row-<index>` for a blank key.
pub(crate) fn row_key(id: &str, index: usize) -> String {
    if id.trim().is_empty() {
        format!("row-{index}")
    } else {
        id.to_string()
    }
}

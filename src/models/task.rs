//! Task model.
//!
//! A task is a unit of work requested by clients and performed by one
//! worker within one phase, consuming `duration` load-units there.

use serde::{Deserialize, Serialize};

use super::PhaseSpec;

/// A task row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    /// Unique task identifier.
    #[serde(rename = "TaskID")]
    pub id: String,
    /// Display name.
    #[serde(rename = "TaskName")]
    pub name: String,
    /// Skills a worker must have (all of them).
    #[serde(rename = "RequiredSkills")]
    pub required_skills: Vec<String>,
    /// Load-units consumed (≥ 1).
    #[serde(rename = "Duration", alias = "EstimatedDuration")]
    pub duration: i64,
    /// Task category.
    #[serde(rename = "Category")]
    pub category: String,
    /// Preferred phases, as written in the source data.
    #[serde(rename = "PreferredPhases", skip_serializing_if = "Option::is_none")]
    pub preferred_phases: Option<PhaseSpec>,
    /// Maximum simultaneous workers (≥ 1).
    #[serde(rename = "MaxConcurrent")]
    pub max_concurrent: i64,
    /// Task IDs this task depends on.
    #[serde(rename = "Dependencies")]
    pub dependencies: Vec<String>,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            required_skills: Vec::new(),
            duration: 1,
            category: String::new(),
            preferred_phases: None,
            max_concurrent: 1,
            dependencies: Vec::new(),
        }
    }
}

impl Task {
    /// Creates a new task with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the task name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a required skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.required_skills.push(skill.into());
        self
    }

    /// Sets the duration in load-units.
    pub fn with_duration(mut self, duration: i64) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the task category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the preferred phases.
    pub fn with_preferred_phases(mut self, phases: impl Into<PhaseSpec>) -> Self {
        self.preferred_phases = Some(phases.into());
        self
    }

    /// Sets the concurrency cap.
    pub fn with_max_concurrent(mut self, max: i64) -> Self {
        self.max_concurrent = max;
        self
    }

    /// Adds a dependency.
    pub fn with_dependency(mut self, task_id: impl Into<String>) -> Self {
        self.dependencies.push(task_id.into());
        self
    }

    /// Duration as an unsigned load, clamping malformed values to 0.
    pub fn load(&self) -> u64 {
        self.duration.max(0) as u64
    }
}

//! Allocation (solution) model.
//!
//! An allocation result places tasks on workers in phases, lists the
//! tasks that could not be placed, and records the rule violations met
//! while searching.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::BusinessRule;

/// A task-worker-phase assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Assigned task ID.
    pub task_id: String,
    /// Assigned worker ID.
    pub worker_id: String,
    /// Phase (1-indexed).
    pub phase: u32,
    /// Confidence in the placement. Always 1.0 for the greedy allocator.
    pub confidence: f64,
}

/// A non-fatal rule breach met during allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleViolation {
    /// The rule that was breached.
    pub rule: BusinessRule,
    /// Human-readable description.
    pub description: String,
}

/// Aggregate allocation scores.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationMetrics {
    /// Number of assignments.
    pub total_assignments: usize,
    /// Weighted client fulfillment score.
    pub client_priority_fulfillment: f64,
    /// Weighted utilization balance score.
    pub worker_utilization_balance: f64,
    /// Weighted cost score.
    pub cost_efficiency: f64,
}

/// Complete allocation output.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationResult {
    /// Placements, in the order they were made.
    pub assignments: Vec<Assignment>,
    /// IDs of tasks that could not be placed.
    pub unassigned_tasks: Vec<String>,
    /// Rule breaches encountered.
    pub violations: Vec<RuleViolation>,
    /// Summary scores.
    pub metrics: AllocationMetrics,
}

impl Assignment {
    /// Creates an assignment with confidence 1.0.
    pub fn new(task_id: impl Into<String>, worker_id: impl Into<String>, phase: u32) -> Self {
        Self {
            task_id: task_id.into(),
            worker_id: worker_id.into(),
            phase,
            confidence: 1.0,
        }
    }
}

impl RuleViolation {
    /// Creates a violation for `rule`.
    pub fn new(rule: &BusinessRule, description: impl Into<String>) -> Self {
        Self {
            rule: rule.clone(),
            description: description.into(),
        }
    }
}

impl AllocationResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Finds the assignment of a task.
    pub fn assignment_for_task(&self, task_id: &str) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.task_id == task_id)
    }

    /// Returns all assignments of a worker.
    pub fn assignments_for_worker(&self, worker_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.worker_id == worker_id)
            .collect()
    }

    /// Whether the task was placed.
    pub fn is_assigned(&self, task_id: &str) -> bool {
        self.assignment_for_task(task_id).is_some()
    }

    /// Whether the task is listed as unassigned.
    pub fn is_unassigned(&self, task_id: &str) -> bool {
        self.unassigned_tasks.iter().any(|t| t == task_id)
    }

    /// Assignment count per worker.
    pub fn assignment_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for a in &self.assignments {
            *counts.entry(a.worker_id.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

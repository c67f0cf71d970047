//! Export bundle.
//!
//! Collects the inputs and the allocation outcome into one JSON-shaped
//! package for downstream renderers (spreadsheet writers and the like).

use serde::{Deserialize, Serialize};

use crate::models::{
    AllocationMetrics, AllocationResult, Assignment, BusinessRule, Client, PriorityWeights,
    RuleViolation, Task, Worker,
};

/// Package format version.
pub const EXPORT_VERSION: &str = "1.0";

/// Package metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    /// Export timestamp, as given by the caller.
    pub exported_at: String,
    /// Package format version.
    pub version: String,
    /// Clients + workers + tasks.
    pub total_records: usize,
}

/// Everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPackage {
    /// Clients.
    pub clients: Vec<Client>,
    /// Workers.
    pub workers: Vec<Worker>,
    /// Tasks.
    pub tasks: Vec<Task>,
    /// Business rules.
    pub rules: Vec<BusinessRule>,
    /// Objective weights.
    pub priorities: PriorityWeights,
    /// Placements.
    pub assignments: Vec<Assignment>,
    /// Scores.
    pub metrics: AllocationMetrics,
    /// Rule breaches.
    pub violations: Vec<RuleViolation>,
    /// Tasks left unplaced.
    pub unassigned_tasks: Vec<String>,
    /// Metadata.
    pub metadata: ExportMetadata,
}

impl ExportPackage {
    /// Builds a package from the inputs and an allocation outcome.
    pub fn new(
        clients: &[Client],
        workers: &[Worker],
        tasks: &[Task],
        rules: &[BusinessRule],
        priorities: &PriorityWeights,
        result: AllocationResult,
        exported_at: impl Into<String>,
    ) -> Self {
        Self {
            metadata: ExportMetadata {
                exported_at: exported_at.into(),
                version: EXPORT_VERSION.to_string(),
                total_records: clients.len() + workers.len() + tasks.len(),
            },
            clients: clients.to_vec(),
            workers: workers.to_vec(),
            tasks: tasks.to_vec(),
            rules: rules.to_vec(),
            priorities: *priorities,
            assignments: result.assignments,
            metrics: result.metrics,
            violations: result.violations,
            unassigned_tasks: result.unassigned_tasks,
        }
    }

    /// Serializes the package as pretty-printed JSON.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::allocate;

    #[test]
    fn test_package_contents() {
        let clients = vec![Client::new("C1").with_name("Acme").with_task("T1")];
        let workers = vec![Worker::new("W1")
            .with_name("Ann")
            .with_slots(vec![1])
            .with_max_load(1)];
        let tasks = vec![Task::new("T1").with_name("Audit"), Task::new("T2").with_name("Extra")];
        let rules = vec![BusinessRule::load_limit("cap", "Ops", 3)];
        let weights = PriorityWeights::default();

        let result = allocate(&clients, &workers, &tasks, &rules, &weights);
        let pkg = ExportPackage::new(
            &clients,
            &workers,
            &tasks,
            &rules,
            &weights,
            result,
            "2024-01-01T00:00:00Z",
        );

        assert_eq!(pkg.metadata.total_records, 4);
        assert_eq!(pkg.metadata.version, EXPORT_VERSION);
        assert_eq!(pkg.assignments.len(), 1);
        assert_eq!(pkg.unassigned_tasks, vec!["T2"]);

        let v: serde_json::Value = serde_json::from_str(&pkg.to_json().unwrap()).unwrap();
        assert_eq!(v["metadata"]["exportedAt"], "2024-01-01T00:00:00Z");
        assert_eq!(v["unassignedTasks"][0], "T2");
        assert_eq!(v["clients"][0]["ClientID"], "C1");
        assert_eq!(v["rules"][0]["type"], "loadLimit");
        assert_eq!(v["metrics"]["totalAssignments"], 1);
    }
}

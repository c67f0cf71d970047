//! Business-rule checks.

use std::collections::{HashMap, HashSet};

use super::{row_key, EntityKind, Severity, ValidationError};
use crate::models::{BusinessRule, RuleKind, Task, Worker};

/// Validates business rules against the entities they reference.
///
/// Disabled rules are checked too, so they can be enabled safely later.
pub fn validate_rules(
    rules: &[BusinessRule],
    tasks: &[Task],
    workers: &[Worker],
) -> Vec<ValidationError> {
    let task_ids: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    let skills: HashSet<&str> = workers
        .iter()
        .flat_map(|w| w.skills.iter().map(String::as_str))
        .collect();
    let groups: HashSet<&str> = workers.iter().map(|w| w.group.as_str()).collect();

    let mut id_counts: HashMap<&str, usize> = HashMap::new();
    for rule in rules.iter().filter(|r| !r.id.trim().is_empty()) {
        *id_counts.entry(rule.id.as_str()).or_insert(0) += 1;
    }

    let mut co_run_seen: HashSet<&str> = HashSet::new();
    let mut errors = Vec::new();

    for (i, rule) in rules.iter().enumerate() {
        let row = row_key(&rule.id, i);
        let finding = |suffix: &str, field: &str, severity: Severity, message: String| {
            ValidationError::new(
                format!("rule-{suffix}-{i}"),
                EntityKind::Rules,
                row.clone(),
                field,
                severity,
                message,
            )
        };

        if id_counts.get(rule.id.as_str()).copied().unwrap_or(0) > 1 {
            errors.push(
                finding(
                    "duplicate-id",
                    "id",
                    Severity::Critical,
                    format!("Duplicate rule ID: {}", rule.id),
                )
                .with_value(&rule.id),
            );
        }

        match &rule.kind {
            RuleKind::CoRun { tasks, required } => {
                let unknown: Vec<&str> = tasks
                    .iter()
                    .map(String::as_str)
                    .filter(|t| !task_ids.contains(t))
                    .collect();
                if !unknown.is_empty() {
                    errors.push(
                        finding(
                            "unknown-tasks",
                            "tasks",
                            Severity::Critical,
                            format!("Co-run rule references unknown tasks: {}", unknown.join(", ")),
                        )
                        .with_value(tasks)
                        .with_suggestion("Remove or correct the unknown task IDs"),
                    );
                }

                let distinct: HashSet<&str> = tasks.iter().map(String::as_str).collect();
                if distinct.len() < 2 {
                    errors.push(finding(
                        "co-run-size",
                        "tasks",
                        Severity::Warning,
                        "Co-run rule needs at least two tasks".to_string(),
                    ));
                }

                if *required {
                    let shared: Vec<&str> = tasks
                        .iter()
                        .map(String::as_str)
                        .filter(|t| co_run_seen.contains(t))
                        .collect();
                    if !shared.is_empty() {
                        errors.push(finding(
                            "co-run-overlap",
                            "tasks",
                            Severity::Info,
                            format!(
                                "Tasks {} already belong to another co-run group; the groups will be merged",
                                shared.join(", ")
                            ),
                        ));
                    }
                    co_run_seen.extend(distinct);
                }
            }
            RuleKind::PhaseWindow {
                task_id,
                allowed_phases,
            } => {
                if !task_ids.contains(task_id.as_str()) {
                    errors.push(
                        finding(
                            "unknown-task",
                            "taskId",
                            Severity::Critical,
                            format!("Phase window references unknown task: {task_id}"),
                        )
                        .with_value(task_id),
                    );
                }
                if allowed_phases.is_empty() || allowed_phases.iter().any(|&p| p < 1) {
                    errors.push(
                        finding(
                            "phase-window",
                            "allowedPhases",
                            Severity::Warning,
                            "Phase window must list positive phases".to_string(),
                        )
                        .with_value(allowed_phases),
                    );
                }
            }
            RuleKind::LoadLimit { worker_group, .. } => {
                if !groups.contains(worker_group.as_str()) {
                    errors.push(
                        finding(
                            "empty-group",
                            "workerGroup",
                            Severity::Info,
                            format!("No worker belongs to group {worker_group}"),
                        )
                        .with_value(worker_group),
                    );
                }
            }
            RuleKind::SkillRequirement { required_skills } => {
                let unknown: Vec<&str> = required_skills
                    .iter()
                    .map(String::as_str)
                    .filter(|s| !skills.contains(s))
                    .collect();
                if !unknown.is_empty() {
                    errors.push(
                        finding(
                            "unknown-skills",
                            "requiredSkills",
                            Severity::Warning,
                            format!("No workers have these skills: {}", unknown.join(", ")),
                        )
                        .with_value(required_skills),
                    );
                }
            }
            RuleKind::SlotRestriction { .. } => {}
        }
    }

    errors
}

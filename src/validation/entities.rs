//! Client, worker and task checks.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use super::{row_key, EntityKind, Severity, ValidationError};
use crate::models::{Client, PhaseSpec, Task, Worker, MAX_PRIORITY_LEVEL};

/// Validates the three entity collections.
///
/// Checks run independently and in a fixed order, so identical inputs
/// give identical findings.
///
/// # Example
///
/// ```
/// use u_allocate::models::{Client, Task, Worker};
/// use u_allocate::validation::{validate, Severity};
///
/// let clients = vec![Client::new("C1").with_name("Acme").with_task("T9")];
/// let workers = vec![Worker::new("W1").with_name("Ann").with_slots(vec![1]).with_max_load(1)];
/// let tasks = vec![Task::new("T1").with_name("Audit")];
///
/// let errors = validate(&clients, &workers, &tasks);
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors[0].field, "RequestedTaskIDs");
/// assert_eq!(errors[0].severity, Severity::Critical);
/// ```
pub fn validate(clients: &[Client], workers: &[Worker], tasks: &[Task]) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_required_fields(clients, workers, tasks, &mut errors);
    check_duplicate_ids(clients, workers, tasks, &mut errors);
    check_available_slots(workers, &mut errors);
    check_ranges(clients, workers, tasks, &mut errors);
    check_attributes_json(clients, &mut errors);
    check_references(clients, tasks, &mut errors);
    check_dependency_cycles(tasks, &mut errors);
    check_overloaded_workers(workers, &mut errors);
    check_preferred_phases(tasks, &mut errors);
    check_phase_saturation(workers, tasks, &mut errors);
    check_skill_coverage(workers, tasks, &mut errors);
    check_max_concurrency(workers, tasks, &mut errors);

    debug!(
        clients = clients.len(),
        workers = workers.len(),
        tasks = tasks.len(),
        errors = errors.len(),
        critical = errors.iter().filter(|e| e.is_critical()).count(),
        "validation finished"
    );

    errors
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn required(
    entity: EntityKind,
    id: String,
    row_id: String,
    field: &str,
    value: &str,
    suggestion: &str,
) -> Option<ValidationError> {
    if !value.trim().is_empty() {
        return None;
    }
    Some(
        ValidationError::new(
            id,
            entity,
            row_id,
            field,
            Severity::Critical,
            format!("{field} is required"),
        )
        .with_value(value)
        .with_suggestion(suggestion),
    )
}

fn check_required_fields(
    clients: &[Client],
    workers: &[Worker],
    tasks: &[Task],
    errors: &mut Vec<ValidationError>,
) {
    for (i, c) in clients.iter().enumerate() {
        let row = row_key(&c.id, i);
        errors.extend(required(
            EntityKind::Clients,
            format!("missing-client-id-{i}"),
            row.clone(),
            "ClientID",
            &c.id,
            "Generate a unique ClientID for this client",
        ));
        errors.extend(required(
            EntityKind::Clients,
            format!("missing-client-name-{i}"),
            row,
            "ClientName",
            &c.name,
            "Provide a name for this client",
        ));
    }

    for (i, w) in workers.iter().enumerate() {
        let row = row_key(&w.id, i);
        errors.extend(required(
            EntityKind::Workers,
            format!("missing-worker-id-{i}"),
            row.clone(),
            "WorkerID",
            &w.id,
            "Generate a unique WorkerID for this worker",
        ));
        errors.extend(required(
            EntityKind::Workers,
            format!("missing-worker-name-{i}"),
            row,
            "WorkerName",
            &w.name,
            "Provide a name for this worker",
        ));
    }

    for (i, t) in tasks.iter().enumerate() {
        let row = row_key(&t.id, i);
        errors.extend(required(
            EntityKind::Tasks,
            format!("missing-task-id-{i}"),
            row.clone(),
            "TaskID",
            &t.id,
            "Generate a unique TaskID for this task",
        ));
        errors.extend(required(
            EntityKind::Tasks,
            format!("missing-task-name-{i}"),
            row,
            "TaskName",
            &t.name,
            "Provide a name for this task",
        ));
    }
}

fn duplicate_ids(
    entity: EntityKind,
    label: &str,
    field: &str,
    ids: &[&str],
    errors: &mut Vec<ValidationError>,
) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &id in ids.iter().filter(|id| !id.trim().is_empty()) {
        *counts.entry(id).or_insert(0) += 1;
    }

    for (i, &id) in ids.iter().enumerate() {
        if counts.get(id).copied().unwrap_or(0) > 1 {
            errors.push(
                ValidationError::new(
                    format!("duplicate-{label}-id-{i}"),
                    entity,
                    id,
                    field,
                    Severity::Critical,
                    format!("Duplicate {field}: {id}"),
                )
                .with_value(id)
                .with_suggestion(format!("Ensure each {field} is unique")),
            );
        }
    }
}

fn check_duplicate_ids(
    clients: &[Client],
    workers: &[Worker],
    tasks: &[Task],
    errors: &mut Vec<ValidationError>,
) {
    let ids: Vec<&str> = clients.iter().map(|c| c.id.as_str()).collect();
    duplicate_ids(EntityKind::Clients, "client", "ClientID", &ids, errors);

    let ids: Vec<&str> = workers.iter().map(|w| w.id.as_str()).collect();
    duplicate_ids(EntityKind::Workers, "worker", "WorkerID", &ids, errors);

    let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
    duplicate_ids(EntityKind::Tasks, "task", "TaskID", &ids, errors);
}

fn check_available_slots(workers: &[Worker], errors: &mut Vec<ValidationError>) {
    for (i, w) in workers.iter().enumerate() {
        let invalid = w.invalid_slots();
        if invalid.is_empty() {
            continue;
        }
        errors.push(
            ValidationError::new(
                format!("malformed-available-slots-{i}"),
                EntityKind::Workers,
                row_key(&w.id, i),
                "AvailableSlots",
                Severity::Warning,
                format!(
                    "Invalid available slots: {}. Must be positive integers.",
                    join(&invalid)
                ),
            )
            .with_value(&w.available_slots)
            .with_suggestion("Convert all slots to positive integers"),
        );
    }
}

fn check_ranges(
    clients: &[Client],
    workers: &[Worker],
    tasks: &[Task],
    errors: &mut Vec<ValidationError>,
) {
    for (i, c) in clients.iter().enumerate() {
        if !(1..=MAX_PRIORITY_LEVEL).contains(&c.priority_level) {
            errors.push(
                ValidationError::new(
                    format!("invalid-priority-level-{i}"),
                    EntityKind::Clients,
                    row_key(&c.id, i),
                    "PriorityLevel",
                    Severity::Warning,
                    format!(
                        "PriorityLevel must be between 1 and {MAX_PRIORITY_LEVEL}, got: {}",
                        c.priority_level
                    ),
                )
                .with_value(c.priority_level)
                .with_suggestion("Set PriorityLevel to a value between 1 and 5"),
            );
        }
    }

    for (i, w) in workers.iter().enumerate() {
        if w.max_load_per_phase < 0 {
            errors.push(
                ValidationError::new(
                    format!("invalid-max-load-{i}"),
                    EntityKind::Workers,
                    row_key(&w.id, i),
                    "MaxLoadPerPhase",
                    Severity::Warning,
                    format!(
                        "MaxLoadPerPhase must not be negative, got: {}",
                        w.max_load_per_phase
                    ),
                )
                .with_value(w.max_load_per_phase)
                .with_suggestion("Set MaxLoadPerPhase to 0 or greater"),
            );
        }
    }

    for (i, t) in tasks.iter().enumerate() {
        if t.duration < 1 {
            errors.push(
                ValidationError::new(
                    format!("invalid-duration-{i}"),
                    EntityKind::Tasks,
                    row_key(&t.id, i),
                    "Duration",
                    Severity::Warning,
                    format!("Duration must be at least 1, got: {}", t.duration),
                )
                .with_value(t.duration)
                .with_suggestion("Set Duration to a value of 1 or greater"),
            );
        }
        if t.max_concurrent < 1 {
            errors.push(
                ValidationError::new(
                    format!("invalid-max-concurrent-{i}"),
                    EntityKind::Tasks,
                    row_key(&t.id, i),
                    "MaxConcurrent",
                    Severity::Warning,
                    format!("MaxConcurrent must be at least 1, got: {}", t.max_concurrent),
                )
                .with_value(t.max_concurrent)
                .with_suggestion("Set MaxConcurrent to a value of 1 or greater"),
            );
        }
    }
}

fn check_attributes_json(clients: &[Client], errors: &mut Vec<ValidationError>) {
    for (i, c) in clients.iter().enumerate() {
        let Some(text) = c.attributes_json.as_deref() else {
            continue;
        };
        if text.trim().is_empty() {
            continue;
        }
        if let Err(err) = serde_json::from_str::<serde_json::Value>(text) {
            errors.push(
                ValidationError::new(
                    format!("broken-json-{i}"),
                    EntityKind::Clients,
                    row_key(&c.id, i),
                    "AttributesJSON",
                    Severity::Warning,
                    format!("Invalid JSON format in AttributesJSON: {err}"),
                )
                .with_value(text)
                .with_suggestion("Fix the JSON syntax or remove invalid characters"),
            );
        }
    }
}

fn check_references(clients: &[Client], tasks: &[Task], errors: &mut Vec<ValidationError>) {
    let task_ids: HashSet<&str> = tasks.iter().map(|t| t.id.as_str()).collect();

    for (i, c) in clients.iter().enumerate() {
        let unknown: Vec<&str> = c
            .requested_task_ids
            .iter()
            .map(String::as_str)
            .filter(|id| !task_ids.contains(id))
            .collect();
        if !unknown.is_empty() {
            errors.push(
                ValidationError::new(
                    format!("unknown-requested-tasks-{i}"),
                    EntityKind::Clients,
                    row_key(&c.id, i),
                    "RequestedTaskIDs",
                    Severity::Critical,
                    format!("Unknown task IDs: {}", join(&unknown)),
                )
                .with_value(&c.requested_task_ids)
                .with_suggestion("Remove or correct the unknown task IDs"),
            );
        }
    }

    for (i, t) in tasks.iter().enumerate() {
        let unknown: Vec<&str> = t
            .dependencies
            .iter()
            .map(String::as_str)
            .filter(|id| !task_ids.contains(id))
            .collect();
        if !unknown.is_empty() {
            errors.push(
                ValidationError::new(
                    format!("unknown-dependencies-{i}"),
                    EntityKind::Tasks,
                    row_key(&t.id, i),
                    "Dependencies",
                    Severity::Critical,
                    format!("Unknown dependency IDs: {}", join(&unknown)),
                )
                .with_value(&t.dependencies)
                .with_suggestion("Remove or correct the unknown dependency IDs"),
            );
        }
    }
}

/// Reports the first dependency cycle, found by DFS in task input order.
fn check_dependency_cycles(tasks: &[Task], errors: &mut Vec<ValidationError>) {
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for t in tasks {
        adj.entry(t.id.as_str())
            .or_default()
            .extend(t.dependencies.iter().map(String::as_str));
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for t in tasks {
        let node = t.id.as_str();
        if visited.contains(node) {
            continue;
        }
        if let Some(found) = find_cycle(node, &adj, &mut visited, &mut in_stack) {
            let index = tasks.iter().position(|t| t.id == found).unwrap_or(0);
            errors.push(
                ValidationError::new(
                    format!("circular-dependency-{index}"),
                    EntityKind::Tasks,
                    row_key(found, index),
                    "Dependencies",
                    Severity::Warning,
                    format!("Circular dependency detected involving task '{found}'"),
                )
                .with_suggestion("Remove one of the dependencies in the cycle"),
            );
            return;
        }
    }
}

fn find_cycle<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> Option<&'a str> {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(next_nodes) = adj.get(node) {
        for &next in next_nodes {
            if in_stack.contains(next) {
                return Some(next); // Back edge
            }
            if !visited.contains(next) {
                if let Some(found) = find_cycle(next, adj, visited, in_stack) {
                    return Some(found);
                }
            }
        }
    }

    in_stack.remove(node);
    None
}

fn check_overloaded_workers(workers: &[Worker], errors: &mut Vec<ValidationError>) {
    for (i, w) in workers.iter().enumerate() {
        let slots = w.available_slots.len();
        if (slots as i64) < w.max_load_per_phase {
            errors.push(
                ValidationError::new(
                    format!("overloaded-worker-{i}"),
                    EntityKind::Workers,
                    row_key(&w.id, i),
                    "MaxLoadPerPhase",
                    Severity::Warning,
                    format!(
                        "Worker has {slots} available slots but MaxLoadPerPhase is {}",
                        w.max_load_per_phase
                    ),
                )
                .with_value(w.max_load_per_phase)
                .with_suggestion("Increase available slots or decrease MaxLoadPerPhase"),
            );
        }
    }
}

fn check_preferred_phases(tasks: &[Task], errors: &mut Vec<ValidationError>) {
    for (i, t) in tasks.iter().enumerate() {
        let Some(spec) = &t.preferred_phases else {
            continue;
        };
        if let Err(err) = spec.resolve() {
            errors.push(
                ValidationError::new(
                    format!("invalid-preferred-phases-{i}"),
                    EntityKind::Tasks,
                    row_key(&t.id, i),
                    "PreferredPhases",
                    Severity::Warning,
                    format!("Invalid PreferredPhases: {err}"),
                )
                .with_value(spec)
                .with_suggestion("Use a list like 1,3,5 or a range like 2-4"),
            );
        }
    }
}

/// Compares single-phase demand with the load workers offer in that phase.
fn check_phase_saturation(workers: &[Worker], tasks: &[Task], errors: &mut Vec<ValidationError>) {
    let mut demand: BTreeMap<u32, i64> = BTreeMap::new();
    for t in tasks {
        let Some(Ok(phases)) = t.preferred_phases.as_ref().map(PhaseSpec::resolve) else {
            continue;
        };
        if phases.len() != 1 {
            continue;
        }
        if let Some(&phase) = phases.first() {
            *demand.entry(phase).or_insert(0) += t.duration.max(0);
        }
    }

    for (phase, needed) in demand {
        let offered: i64 = workers
            .iter()
            .filter(|w| w.phases().contains(&phase))
            .map(|w| w.max_load_per_phase.max(0))
            .sum();
        if needed > offered {
            errors.push(
                ValidationError::new(
                    format!("phase-saturation-{phase}"),
                    EntityKind::Tasks,
                    format!("phase-{phase}"),
                    "PreferredPhases",
                    Severity::Warning,
                    format!(
                        "Phase {phase} needs {needed} load-units from single-phase tasks but workers offer {offered}"
                    ),
                )
                .with_value(needed)
                .with_suggestion("Widen preferred phases or add worker availability"),
            );
        }
    }
}

fn check_skill_coverage(workers: &[Worker], tasks: &[Task], errors: &mut Vec<ValidationError>) {
    let skills: HashSet<&str> = workers
        .iter()
        .flat_map(|w| w.skills.iter().map(String::as_str))
        .collect();

    for (i, t) in tasks.iter().enumerate() {
        let mut uncovered: Vec<&str> = Vec::new();
        for skill in &t.required_skills {
            if !skills.contains(skill.as_str()) && !uncovered.contains(&skill.as_str()) {
                uncovered.push(skill);
            }
        }
        if !uncovered.is_empty() {
            errors.push(
                ValidationError::new(
                    format!("uncovered-skills-{i}"),
                    EntityKind::Tasks,
                    row_key(&t.id, i),
                    "RequiredSkills",
                    Severity::Critical,
                    format!("No workers have these skills: {}", join(&uncovered)),
                )
                .with_value(&t.required_skills)
                .with_suggestion("Add workers with these skills or modify task requirements"),
            );
        }
    }
}

fn check_max_concurrency(workers: &[Worker], tasks: &[Task], errors: &mut Vec<ValidationError>) {
    for (i, t) in tasks.iter().enumerate() {
        let qualified = workers.iter().filter(|w| w.covers(&t.required_skills)).count();
        if t.max_concurrent > qualified as i64 {
            errors.push(
                ValidationError::new(
                    format!("max-concurrency-{i}"),
                    EntityKind::Tasks,
                    row_key(&t.id, i),
                    "MaxConcurrent",
                    Severity::Warning,
                    format!(
                        "MaxConcurrent is {} but only {qualified} workers have the required skills",
                        t.max_concurrent
                    ),
                )
                .with_value(t.max_concurrent)
                .with_suggestion("Lower MaxConcurrent or add qualified workers"),
            );
        }
    }
}

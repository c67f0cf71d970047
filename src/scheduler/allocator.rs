//! Priority-driven greedy allocator.
//!
//! # Algorithm
//!
//! 1. Order tasks with the dispatching rule engine (client priority, then
//!    shortest duration, then input order).
//! 2. Give every worker `MaxLoadPerPhase` load-units in each of its
//!    available phases.
//! 3. For each task, keep the workers that have every required skill,
//!    at least `Duration` phases with capacity left, and a per-phase cap
//!    of at least `Duration`.
//! 4. Rank them by weighted score (client priority, spare utilization,
//!    inverse qualification), best first.
//! 5. Walk each worker's phases in ascending order and take the first one
//!    with enough capacity that the phase windows and load limits allow.
//!    Load-limit rejections are recorded as violations and the walk goes on.
//! 6. A task that fits nowhere is unassigned. There is no backtracking.
//!
//! Required co-run groups are placed together on one worker when their
//! first member comes up, or not at all.
//!
//! # Complexity
//! O(t · w · p) where t=tasks, w=workers, p=phases per worker.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::metrics::{compute_metrics_with_target, DEFAULT_TARGET_UTILIZATION};
use crate::constraints::{Placement, RuleSet};
use crate::dispatching::{DispatchContext, RuleEngine};
use crate::error::Result;
use crate::models::{
    AllocationResult, Assignment, BusinessRule, Client, PriorityWeights, RuleViolation, Task,
    Worker, DEFAULT_PRIORITY_LEVEL, MAX_PRIORITY_LEVEL,
};

/// Input container for allocation.
///
/// Every collection is required on the wire; a request missing one is
/// rejected by [`AllocationRequest::from_json`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationRequest {
    /// Clients.
    pub clients: Vec<Client>,
    /// Workers.
    pub workers: Vec<Worker>,
    /// Tasks.
    pub tasks: Vec<Task>,
    /// Business rules, in insertion order.
    pub rules: Vec<BusinessRule>,
    /// Objective weights.
    pub priorities: PriorityWeights,
}

impl AllocationRequest {
    /// Creates a request with no rules and default weights.
    pub fn new(clients: Vec<Client>, workers: Vec<Worker>, tasks: Vec<Task>) -> Self {
        Self {
            clients,
            workers,
            tasks,
            rules: Vec::new(),
            priorities: PriorityWeights::default(),
        }
    }

    /// Sets the rules.
    pub fn with_rules(mut self, rules: Vec<BusinessRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Sets the weights.
    pub fn with_priorities(mut self, priorities: PriorityWeights) -> Self {
        self.priorities = priorities;
        self
    }

    /// Parses a JSON request.
    ///
    /// # Errors
    /// Returns [`AllocateError::InvalidRequest`](crate::AllocateError::InvalidRequest)
    /// if the payload is malformed or a collection is missing.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Greedy task-to-worker allocator.
///
/// # Example
///
/// ```
/// use u_allocate::scheduler::Allocator;
/// use u_allocate::models::{Client, PriorityWeights, Task, Worker};
///
/// let clients = vec![Client::new("C1").with_priority(1).with_task("T1")];
/// let workers = vec![
///     Worker::new("W1").with_skill("python").with_slots(vec![1, 2]).with_max_load(2),
/// ];
/// let tasks = vec![Task::new("T1").with_skill("python").with_duration(1)];
///
/// let result = Allocator::new().allocate(
///     &clients, &workers, &tasks, &[], &PriorityWeights::default(),
/// );
/// assert_eq!(result.assignment_count(), 1);
/// assert_eq!(result.assignments[0].phase, 1);
/// ```
#[derive(Debug, Clone)]
pub struct Allocator {
    ordering: RuleEngine,
    default_client_priority: i32,
    target_utilization: f64,
}

impl Allocator {
    /// Creates an allocator with the default task order.
    pub fn new() -> Self {
        Self {
            ordering: RuleEngine::client_priority_first(),
            default_client_priority: DEFAULT_PRIORITY_LEVEL,
            target_utilization: DEFAULT_TARGET_UTILIZATION,
        }
    }

    /// Sets the rule engine that orders tasks.
    pub fn with_task_ordering(mut self, engine: RuleEngine) -> Self {
        self.ordering = engine;
        self
    }

    /// Sets the priority level assumed for tasks no client requests.
    pub fn with_default_client_priority(mut self, level: i32) -> Self {
        self.default_client_priority = level;
        self
    }

    /// Sets the utilization the balance metric rewards.
    pub fn with_target_utilization(mut self, target: f64) -> Self {
        self.target_utilization = target;
        self
    }

    /// Allocates tasks to workers and phases.
    ///
    /// Never fails: tasks that cannot be placed are listed in
    /// `unassigned_tasks`, and rule breaches in `violations`.
    pub fn allocate(
        &self,
        clients: &[Client],
        workers: &[Worker],
        tasks: &[Task],
        rules: &[BusinessRule],
        priorities: &PriorityWeights,
    ) -> AllocationResult {
        let rule_set = RuleSet::new(rules);
        let context = DispatchContext::from_clients(clients, self.default_client_priority);
        let order = self.ordering.sort_indices(tasks, &context);
        let groups = rule_set.co_run_groups();

        let mut run = Run {
            workers,
            tasks,
            rules: &rule_set,
            context: &context,
            priorities,
            capacity: workers.iter().map(initial_capacity).collect(),
            counts: vec![0; workers.len()],
            result: AllocationResult::new(),
        };
        let mut decided = vec![false; tasks.len()];

        for &idx in &order {
            if decided[idx] {
                continue;
            }

            let group = groups.iter().find(|g| g.contains(&tasks[idx].id));
            match group {
                Some(group) => {
                    let members: Vec<usize> = order
                        .iter()
                        .copied()
                        .filter(|&i| !decided[i] && group.contains(&tasks[i].id))
                        .collect();
                    for &m in &members {
                        decided[m] = true;
                    }
                    run.place_group(&members);
                }
                None => {
                    decided[idx] = true;
                    run.place_task(idx);
                }
            }
        }

        let mut result = run.result;
        result
            .violations
            .extend(rule_set.slot_restriction_findings(clients, workers, tasks));
        result.metrics = compute_metrics_with_target(
            &result.assignments,
            clients,
            workers,
            tasks,
            priorities,
            self.target_utilization,
        );

        info!(
            tasks = tasks.len(),
            workers = workers.len(),
            rules = rule_set.len(),
            assigned = result.assignments.len(),
            unassigned = result.unassigned_tasks.len(),
            violations = result.violations.len(),
            "allocation finished"
        );

        result
    }

    /// Allocates from a request.
    pub fn allocate_request(&self, request: &AllocationRequest) -> AllocationResult {
        self.allocate(
            &request.clients,
            &request.workers,
            &request.tasks,
            &request.rules,
            &request.priorities,
        )
    }
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Remaining load per phase for one worker.
type PhaseCapacity = BTreeMap<u32, u64>;

fn initial_capacity(worker: &Worker) -> PhaseCapacity {
    let per_phase = worker.max_load_per_phase.max(0) as u64;
    worker.phases().into_iter().map(|p| (p, per_phase)).collect()
}

fn open_phases(capacity: &PhaseCapacity) -> usize {
    capacity.values().filter(|&&left| left > 0).count()
}

/// Mutable state of one allocation run.
struct Run<'a> {
    workers: &'a [Worker],
    tasks: &'a [Task],
    rules: &'a RuleSet<'a>,
    context: &'a DispatchContext,
    priorities: &'a PriorityWeights,
    capacity: Vec<PhaseCapacity>,
    counts: Vec<usize>,
    result: AllocationResult,
}

impl Run<'_> {
    fn place_task(&mut self, idx: usize) {
        let task = &self.tasks[idx];
        let ranked = self.ranked_candidates(&[idx]);
        if ranked.is_empty() {
            debug!(task = %task.id, "no qualified worker with capacity");
            self.result.unassigned_tasks.push(task.id.clone());
            return;
        }

        for w in ranked {
            let worker = &self.workers[w];
            let found = find_phase(
                task,
                worker,
                &self.capacity[w],
                self.rules,
                &mut self.result.violations,
            );
            if let Some(phase) = found {
                self.commit(w, idx, phase);
                return;
            }
        }

        debug!(task = %task.id, "no feasible phase on any candidate");
        self.result.unassigned_tasks.push(task.id.clone());
    }

    /// Places every member on one worker, or none of them.
    fn place_group(&mut self, members: &[usize]) {
        for w in self.ranked_candidates(members) {
            let worker = &self.workers[w];
            let mut scratch = self.capacity[w].clone();
            let mut staged = Vec::with_capacity(members.len());

            for &m in members {
                let task = &self.tasks[m];
                let found = find_phase(
                    task,
                    worker,
                    &scratch,
                    self.rules,
                    &mut self.result.violations,
                );
                match found {
                    Some(phase) => {
                        if let Some(left) = scratch.get_mut(&phase) {
                            *left -= task.load();
                        }
                        staged.push((m, phase));
                    }
                    None => break,
                }
            }

            if staged.len() == members.len() {
                debug!(worker = %worker.id, members = members.len(), "co-run group placed");
                for (m, phase) in staged {
                    self.commit(w, m, phase);
                }
                return;
            }
        }

        debug!(members = members.len(), "co-run group left unassigned");
        for &m in members {
            self.result.unassigned_tasks.push(self.tasks[m].id.clone());
        }
    }

    fn commit(&mut self, w: usize, idx: usize, phase: u32) {
        let task = &self.tasks[idx];
        if let Some(left) = self.capacity[w].get_mut(&phase) {
            *left -= task.load();
        }
        self.counts[w] += 1;
        self.result
            .assignments
            .push(Assignment::new(&task.id, &self.workers[w].id, phase));
    }

    /// Workers qualified for every listed task, best score first.
    ///
    /// Scores are computed against the first task. Ties keep worker input
    /// order.
    fn ranked_candidates(&self, members: &[usize]) -> Vec<usize> {
        let Some(&lead) = members.first() else {
            return Vec::new();
        };

        let mut scored: Vec<(usize, f64)> = (0..self.workers.len())
            .filter(|&w| {
                members
                    .iter()
                    .all(|&m| self.is_candidate(&self.workers[w], &self.capacity[w], &self.tasks[m]))
            })
            .map(|w| (w, self.score(w, &self.tasks[lead])))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.into_iter().map(|(w, _)| w).collect()
    }

    fn is_candidate(&self, worker: &Worker, capacity: &PhaseCapacity, task: &Task) -> bool {
        worker.covers(&task.required_skills)
            && open_phases(capacity) as i64 >= task.duration
            && worker.max_load_per_phase >= task.duration
    }

    fn score(&self, w: usize, task: &Task) -> f64 {
        let worker = &self.workers[w];
        let mut score = 0.0;

        if self.context.is_requested(&task.id) {
            let level = self.context.priority_of(&task.id) as f64;
            score += self.priorities.client_priority_fulfillment * (level / MAX_PRIORITY_LEVEL as f64);
        }

        if worker.max_load_per_phase > 0 {
            let utilization = self.counts[w] as f64 / worker.max_load_per_phase as f64;
            score += self.priorities.worker_work_life_balance * (1.0 - utilization);
        }

        score += self.priorities.cost_efficiency / worker.effective_qualification() as f64;
        score
    }
}

/// First phase of `worker` that fits `task` and passes the rules.
fn find_phase(
    task: &Task,
    worker: &Worker,
    capacity: &PhaseCapacity,
    rules: &RuleSet<'_>,
    violations: &mut Vec<RuleViolation>,
) -> Option<u32> {
    let load = task.load();
    for (&phase, &left) in capacity {
        if left < load {
            continue;
        }
        match rules.evaluate(task, worker, phase) {
            Placement::Allowed => return Some(phase),
            Placement::OutsideWindow => continue,
            Placement::LoadLimited(rule) => {
                debug!(task = %task.id, worker = %worker.id, phase, rule = %rule.id, "load limit rejected placement");
                violations.push(RuleViolation::new(
                    rule,
                    format!(
                        "Task {} exceeds load limit for worker group {}",
                        task.id, worker.group
                    ),
                ));
            }
        }
    }
    None
}

/// Allocates with the default [`Allocator`].
pub fn allocate(
    clients: &[Client],
    workers: &[Worker],
    tasks: &[Task],
    rules: &[BusinessRule],
    priorities: &PriorityWeights,
) -> AllocationResult {
    Allocator::new().allocate(clients, workers, tasks, rules, priorities)
}

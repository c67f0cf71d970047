//! Allocation quality metrics.
//!
//! Computes summary scores from a finished assignment set.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total assignments | Number of placements |
//! | Client priority fulfillment | mean over clients of (placed / requested) × level/5, × weight |
//! | Worker utilization balance | mean over workers of 1 − \|utilization − target\|, × weight |
//! | Cost efficiency | constant 1.0 × weight |
//!
//! Utilization is the worker's assignment count over `MaxLoadPerPhase`.
//! The default target is 0.8. Averages over an empty collection are 0.

use crate::models::{AllocationMetrics, Assignment, Client, PriorityWeights, Task, Worker};

/// Utilization the balance metric rewards.
pub const DEFAULT_TARGET_UTILIZATION: f64 = 0.8;

/// Computes metrics with the default utilization target.
pub fn compute_metrics(
    assignments: &[Assignment],
    clients: &[Client],
    workers: &[Worker],
    tasks: &[Task],
    priorities: &PriorityWeights,
) -> AllocationMetrics {
    compute_metrics_with_target(
        assignments,
        clients,
        workers,
        tasks,
        priorities,
        DEFAULT_TARGET_UTILIZATION,
    )
}

/// Computes metrics for a given utilization target.
///
/// `tasks` is accepted for cost models that need durations; the current
/// cost score is a fixed placeholder.
pub fn compute_metrics_with_target(
    assignments: &[Assignment],
    clients: &[Client],
    workers: &[Worker],
    _tasks: &[Task],
    priorities: &PriorityWeights,
    target_utilization: f64,
) -> AllocationMetrics {
    let fulfillment = mean(
        clients
            .iter()
            .map(|c| client_fulfillment(c, assignments) * c.priority_weight()),
        clients.len(),
    );

    let balance = mean(
        workers
            .iter()
            .map(|w| 1.0 - (worker_utilization(w, assignments) - target_utilization).abs()),
        workers.len(),
    );

    let cost = 1.0;

    AllocationMetrics {
        total_assignments: assignments.len(),
        client_priority_fulfillment: fulfillment * priorities.client_priority_fulfillment,
        worker_utilization_balance: balance * priorities.worker_work_life_balance,
        cost_efficiency: cost * priorities.cost_efficiency,
    }
}

/// Fraction of a client's requested tasks that were placed.
///
/// A client that requests nothing scores 0.
pub fn client_fulfillment(client: &Client, assignments: &[Assignment]) -> f64 {
    if client.requested_task_ids.is_empty() {
        return 0.0;
    }
    let placed = assignments
        .iter()
        .filter(|a| client.requests(&a.task_id))
        .count();
    placed as f64 / client.requested_task_ids.len() as f64
}

/// Assignment count over `MaxLoadPerPhase` (0 when the cap is not positive).
pub fn worker_utilization(worker: &Worker, assignments: &[Assignment]) -> f64 {
    if worker.max_load_per_phase <= 0 {
        return 0.0;
    }
    let count = assignments
        .iter()
        .filter(|a| a.worker_id == worker.id)
        .count();
    count as f64 / worker.max_load_per_phase as f64
}

fn mean(values: impl Iterator<Item = f64>, len: usize) -> f64 {
    if len == 0 {
        return 0.0;
    }
    values.sum::<f64>() / len as f64
}

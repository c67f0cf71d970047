//! Built-in dispatching rules.
//!
//! All rules return lower scores for tasks that should be placed first.

use super::{DispatchContext, DispatchingRule, RuleScore};
use crate::models::Task;

/// Client priority.
///
/// Tasks of clients with a higher `PriorityLevel` go first. Tasks that no
/// client requests use the context's default level.
#[derive(Debug, Clone, Copy)]
pub struct ClientPriority;

impl DispatchingRule for ClientPriority {
    fn name(&self) -> &'static str {
        "CLIENT_PRIORITY"
    }

    fn evaluate(&self, task: &Task, context: &DispatchContext) -> RuleScore {
        -(context.priority_of(&task.id) as f64)
    }

    fn description(&self) -> &'static str {
        "Requesting Client Priority"
    }
}

/// Shortest Processing Time.
///
/// Shorter tasks go first, which maximizes the number of tasks that fit
/// into limited capacity.
///
/// # Reference
/// Smith (1956), optimal for minimizing mean flow time on single machine.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl DispatchingRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, task: &Task, _context: &DispatchContext) -> RuleScore {
        task.duration as f64
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}

/// Longest Processing Time.
///
/// Longer tasks go first, so large tasks claim capacity before it
/// fragments.
#[derive(Debug, Clone, Copy)]
pub struct Lpt;

impl DispatchingRule for Lpt {
    fn name(&self) -> &'static str {
        "LPT"
    }

    fn evaluate(&self, task: &Task, _context: &DispatchContext) -> RuleScore {
        -(task.duration as f64)
    }

    fn description(&self) -> &'static str {
        "Longest Processing Time"
    }
}

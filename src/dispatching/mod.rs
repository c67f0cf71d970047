//! Dispatching rules that order tasks before allocation.
//!
//! The allocator places tasks one at a time, so the order decides who
//! gets scarce capacity. The default order is client priority (highest
//! level first), then shortest duration, then input order.
//!
//! # Usage
//!
//! ```
//! use u_allocate::dispatching::{rules, DispatchContext, RuleEngine};
//! use u_allocate::models::{Client, Task};
//!
//! let tasks = vec![
//!     Task::new("T1").with_duration(3),
//!     Task::new("T2").with_duration(1),
//! ];
//! let clients = vec![Client::new("C1").with_priority(5).with_task("T1")];
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::ClientPriority)
//!     .with_rule(rules::Spt);
//! let ctx = DispatchContext::from_clients(&clients, 3);
//!
//! assert_eq!(engine.sort_indices(&tasks, &ctx), vec![0, 1]);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod context;
mod engine;
pub mod rules;

pub use context::DispatchContext;
pub use engine::{EvaluationMode, RuleEngine, TieBreaker};

use crate::models::Task;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (placed first).
pub type RuleScore = f64;

/// A dispatching rule that evaluates task urgency.
///
/// # Score Convention
/// **Lower score = higher priority.**
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "SPT").
    fn name(&self) -> &'static str;

    /// Evaluates a task in the given context.
    fn evaluate(&self, task: &Task, context: &DispatchContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}

//! Greedy allocation and allocation metrics.
//!
//! # Algorithm
//!
//! [`Allocator`] places tasks one at a time in dispatching-rule order,
//! choosing the best-scoring qualified worker and its earliest feasible
//! phase. It does not backtrack, so it is fast and deterministic but not
//! optimal.
//!
//! # Metrics
//!
//! [`compute_metrics`] scores a finished assignment set: client priority
//! fulfillment, worker utilization balance, and cost efficiency.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod allocator;
pub mod metrics;

pub use allocator::{allocate, AllocationRequest, Allocator};
pub use metrics::{compute_metrics, compute_metrics_with_target, DEFAULT_TARGET_UTILIZATION};

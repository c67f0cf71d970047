//! Rule-driven task allocation for the U-Engine ecosystem.
//!
//! Validates client, worker and task data, then assigns tasks to workers
//! across discrete phases with a deterministic, priority-driven greedy
//! heuristic under skill, capacity and business-rule constraints.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Client`, `Worker`, `Task`, `BusinessRule`,
//!   `PriorityWeights`, `Assignment`, `AllocationResult`
//! - **`validation`**: Integrity checks returning `ValidationError` records
//! - **`constraints`**: `RuleSet`, the compiled view of enabled business rules
//! - **`dispatching`**: Task ordering rules and the `RuleEngine`
//! - **`scheduler`**: The greedy `Allocator` and allocation metrics
//! - **`rulebook`**: Ordered, id-addressed rule collection
//! - **`search`**: Filter conditions and pluggable query strategies
//! - **`export`**: JSON export bundle
//!
//! # Quick Start
//!
//! ```
//! use u_allocate::models::{BusinessRule, Client, PriorityWeights, Task, Worker};
//! use u_allocate::{allocate, validate};
//!
//! let clients = vec![Client::new("C1").with_name("Acme").with_priority(4).with_task("T1")];
//! let workers = vec![Worker::new("W1")
//!     .with_name("Ann")
//!     .with_skill("python")
//!     .with_slots(vec![1, 2])
//!     .with_max_load(2)];
//! let tasks = vec![Task::new("T1").with_name("ETL").with_skill("python")];
//! let rules = vec![BusinessRule::phase_window("late", "T1", vec![2])];
//!
//! assert!(validate(&clients, &workers, &tasks).is_empty());
//!
//! let result = allocate(&clients, &workers, &tasks, &rules, &PriorityWeights::default());
//! assert_eq!(result.assignments[0].phase, 2);
//! ```
//!
//! # Logging
//!
//! The crate logs through [`tracing`] and installs no subscriber.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

pub mod constraints;
pub mod dispatching;
pub mod error;
pub mod export;
pub mod models;
pub mod rulebook;
pub mod scheduler;
pub mod search;
pub mod validation;

pub use error::{AllocateError, Result};
pub use scheduler::{allocate, compute_metrics, AllocationRequest, Allocator};
pub use validation::{validate, validate_rules, ValidationError, ValidationReport};

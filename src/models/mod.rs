//! Allocation domain models.
//!
//! Provides the record types that flow through validation and
//! allocation: the three spreadsheet entities, business rules, priority
//! weights, and the allocation result.
//!
//! # Entity Mappings
//!
//! | u-allocate | Consulting | Field Service | Education |
//! |------------|------------|---------------|-----------|
//! | Client | Customer | Site | Department |
//! | Worker | Consultant | Technician | Instructor |
//! | Task | Engagement | Work Order | Course |
//! | Phase | Sprint | Shift | Term |

mod allocation;
mod client;
mod phase;
mod priorities;
mod rule;
mod task;
mod worker;

pub use allocation::{AllocationMetrics, AllocationResult, Assignment, RuleViolation};
pub use client::{Client, DEFAULT_PRIORITY_LEVEL, MAX_PRIORITY_LEVEL};
pub use phase::{PhaseParseError, PhaseSpec, MAX_RANGE_SPAN};
pub use priorities::PriorityWeights;
pub use rule::{BusinessRule, GroupType, RuleKind};
pub use task::Task;
pub use worker::{SlotCell, Worker};

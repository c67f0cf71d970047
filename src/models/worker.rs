//! Worker model.
//!
//! Workers perform tasks. Each worker has a skill set, a group label,
//! the phases it can work in, and a per-phase load cap.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

/// One `AvailableSlots` cell as it arrived.
///
/// Cells that are not integers are kept rather than rejected so the
/// validator can report them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotCell {
    /// An integer cell.
    Phase(i64),
    /// Anything else (fractions, text, nulls).
    Other(Value),
}

impl SlotCell {
    /// The phase this cell names, if it is a positive integer.
    ///
    /// Whole-valued floats such as `2.0` count as integers.
    pub fn phase(&self) -> Option<u32> {
        let value = match self {
            Self::Phase(p) => *p,
            Self::Other(Value::Number(n)) => {
                let f = n.as_f64()?;
                if f.fract() != 0.0 || !f.is_finite() {
                    return None;
                }
                f as i64
            }
            Self::Other(_) => return None,
        };
        (1..=u32::MAX as i64).contains(&value).then_some(value as u32)
    }
}

impl From<i64> for SlotCell {
    fn from(phase: i64) -> Self {
        Self::Phase(phase)
    }
}

impl fmt::Display for SlotCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phase(p) => write!(f, "{p}"),
            Self::Other(Value::String(text)) => write!(f, "{text}"),
            Self::Other(other) => write!(f, "{other}"),
        }
    }
}

/// A worker row.
///
/// # Capacity
/// A worker can take up to `max_load_per_phase` load-units in each phase
/// listed in `available_slots`, and nothing in any other phase.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Worker {
    /// Unique worker identifier.
    #[serde(rename = "WorkerID")]
    pub id: String,
    /// Display name.
    #[serde(rename = "WorkerName")]
    pub name: String,
    /// Skill tags.
    #[serde(rename = "Skills")]
    pub skills: Vec<String>,
    /// Group label (matched by load-limit and slot-restriction rules).
    #[serde(rename = "WorkerGroup")]
    pub group: String,
    /// Phase numbers (1-indexed) in which this worker is available.
    #[serde(rename = "AvailableSlots")]
    pub available_slots: Vec<SlotCell>,
    /// Maximum load-units per phase.
    #[serde(rename = "MaxLoadPerPhase")]
    pub max_load_per_phase: i64,
    /// Qualification level (inverse cost proxy).
    #[serde(rename = "QualificationLevel")]
    pub qualification_level: i64,
}

impl Worker {
    /// Creates a worker with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            qualification_level: 1,
            ..Self::default()
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a skill.
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.push(skill.into());
        self
    }

    /// Sets the group label.
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Sets the available phases.
    pub fn with_slots(mut self, slots: Vec<i64>) -> Self {
        self.available_slots = slots.into_iter().map(SlotCell::from).collect();
        self
    }

    /// Sets the per-phase load cap.
    pub fn with_max_load(mut self, max_load: i64) -> Self {
        self.max_load_per_phase = max_load;
        self
    }

    /// Sets the qualification level.
    pub fn with_qualification(mut self, level: i64) -> Self {
        self.qualification_level = level;
        self
    }

    /// Whether this worker has a given skill.
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s == skill)
    }

    /// Whether this worker's skills are a superset of `required`.
    pub fn covers<S: AsRef<str>>(&self, required: &[S]) -> bool {
        required.iter().all(|s| self.has_skill(s.as_ref()))
    }

    /// Distinct valid phases in ascending order.
    ///
    /// Non-positive and non-integer entries are dropped.
    pub fn phases(&self) -> BTreeSet<u32> {
        self.available_slots.iter().filter_map(SlotCell::phase).collect()
    }

    /// Cells that do not name a valid phase.
    pub fn invalid_slots(&self) -> Vec<&SlotCell> {
        self.available_slots
            .iter()
            .filter(|cell| cell.phase().is_none())
            .collect()
    }

    /// Whether the worker is available in `phase`.
    pub fn is_available_in(&self, phase: u32) -> bool {
        self.available_slots.iter().any(|cell| cell.phase() == Some(phase))
    }

    /// Qualification level used for cost scoring (never below 1).
    pub fn effective_qualification(&self) -> i64 {
        self.qualification_level.max(1)
    }
}

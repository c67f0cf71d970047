//! Business rules.
//!
//! A business rule is a user-defined allocation constraint. Each kind
//! carries its own parameter payload; the wire form keeps the
//! `{type, parameters}` envelope used by rule editors and generators.

use serde::{Deserialize, Serialize};

/// A user-defined allocation rule.
///
/// Rules are ordered by `priority` (ascending), then by their position in
/// the rule collection. Disabled rules are ignored everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRule {
    /// Unique rule identifier.
    pub id: String,
    /// Short name.
    #[serde(default)]
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Rule kind and parameters.
    #[serde(flatten)]
    pub kind: RuleKind,
    /// Ordering weight among rules (lower is evaluated first).
    #[serde(default)]
    pub priority: i32,
    /// Whether the rule participates in evaluation.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Rule kinds with their parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "parameters",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum RuleKind {
    /// Listed tasks run on the same worker.
    CoRun {
        /// Task IDs in the group.
        tasks: Vec<String>,
        /// Hard constraint when `true`; advisory otherwise.
        #[serde(default = "default_true")]
        required: bool,
    },

    /// A client or worker group needs at least `min_slots` common phases.
    SlotRestriction {
        /// Which entity the group refers to.
        group_type: GroupType,
        /// Group label (`GroupTag` or `WorkerGroup`).
        group_name: String,
        /// Minimum number of common phases.
        min_slots: u32,
    },

    /// Caps the load of a single assignment for workers in a group.
    LoadLimit {
        /// Worker group label.
        worker_group: String,
        /// Maximum load-units per phase.
        max_slots_per_phase: i64,
    },

    /// Restricts a task to explicit phases.
    PhaseWindow {
        /// Governed task.
        task_id: String,
        /// Allowed phases (1-indexed).
        allowed_phases: Vec<i64>,
    },

    /// Extra skills beyond a task's own requirements.
    ///
    /// Reserved: accepted and validated, not enforced by the allocator.
    SkillRequirement {
        /// Skill tags.
        required_skills: Vec<String>,
    },
}

/// Entity a slot-restriction group refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupType {
    /// Clients sharing a `GroupTag`.
    Client,
    /// Workers sharing a `WorkerGroup`.
    Worker,
}

fn default_true() -> bool {
    true
}

impl BusinessRule {
    /// Creates an enabled rule with priority 0.
    pub fn new(id: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            description: String::new(),
            kind,
            priority: 0,
            enabled: true,
        }
    }

    /// Creates a required co-run rule.
    pub fn co_run(id: impl Into<String>, tasks: Vec<String>) -> Self {
        Self::new(
            id,
            RuleKind::CoRun {
                tasks,
                required: true,
            },
        )
    }

    /// Creates a slot-restriction rule.
    pub fn slot_restriction(
        id: impl Into<String>,
        group_type: GroupType,
        group_name: impl Into<String>,
        min_slots: u32,
    ) -> Self {
        Self::new(
            id,
            RuleKind::SlotRestriction {
                group_type,
                group_name: group_name.into(),
                min_slots,
            },
        )
    }

    /// Creates a load-limit rule.
    pub fn load_limit(
        id: impl Into<String>,
        worker_group: impl Into<String>,
        max_slots_per_phase: i64,
    ) -> Self {
        Self::new(
            id,
            RuleKind::LoadLimit {
                worker_group: worker_group.into(),
                max_slots_per_phase,
            },
        )
    }

    /// Creates a phase-window rule.
    pub fn phase_window(
        id: impl Into<String>,
        task_id: impl Into<String>,
        allowed_phases: Vec<i64>,
    ) -> Self {
        Self::new(
            id,
            RuleKind::PhaseWindow {
                task_id: task_id.into(),
                allowed_phases,
            },
        )
    }

    /// Creates a skill-requirement rule.
    pub fn skill_requirement(id: impl Into<String>, required_skills: Vec<String>) -> Self {
        Self::new(id, RuleKind::SkillRequirement { required_skills })
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the ordering priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Marks the rule disabled.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Wire name of the rule kind.
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

impl RuleKind {
    /// Wire name (`coRun`, `loadLimit`, ...).
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::CoRun { .. } => "coRun",
            Self::SlotRestriction { .. } => "slotRestriction",
            Self::LoadLimit { .. } => "loadLimit",
            Self::PhaseWindow { .. } => "phaseWindow",
            Self::SkillRequirement { .. } => "skillRequirement",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_builders() {
        let r = BusinessRule::load_limit("r1", "GroupA", 2)
            .with_name("cap")
            .with_description("cap group A")
            .with_priority(5)
            .disabled();

        assert_eq!(r.id, "r1");
        assert_eq!(r.name, "cap");
        assert_eq!(r.priority, 5);
        assert!(!r.enabled);
        assert_eq!(r.type_name(), "loadLimit");
        match r.kind {
            RuleKind::LoadLimit {
                worker_group,
                max_slots_per_phase,
            } => {
                assert_eq!(worker_group, "GroupA");
                assert_eq!(max_slots_per_phase, 2);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_co_run_defaults_required() {
        let r = BusinessRule::co_run("r1", vec!["T1".into(), "T2".into()]);
        match r.kind {
            RuleKind::CoRun { tasks, required } => {
                assert_eq!(tasks.len(), 2);
                assert!(required);
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn test_wire_shape() {
        let r = BusinessRule::phase_window("r1", "T1", vec![1, 2]);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["type"], "phaseWindow");
        assert_eq!(v["parameters"]["taskId"], "T1");
        assert_eq!(v["parameters"]["allowedPhases"][1], 2);
        assert_eq!(v["enabled"], true);
    }

    #[test]
    fn test_deserialize_envelope() {
        let json = r#"{
            "id": "r7",
            "type": "slotRestriction",
            "name": "min common",
            "description": "",
            "parameters": {"groupType": "worker", "groupName": "Ops", "minSlots": 2},
            "priority": 1,
            "enabled": false
        }"#;
        let r: BusinessRule = serde_json::from_str(json).unwrap();
        assert_eq!(r.priority, 1);
        assert!(!r.enabled);
        assert_eq!(
            r.kind,
            RuleKind::SlotRestriction {
                group_type: GroupType::Worker,
                group_name: "Ops".into(),
                min_slots: 2,
            }
        );
    }

    #[test]
    fn test_missing_parameter_rejected() {
        let json = r#"{"id": "r1", "type": "loadLimit", "parameters": {"workerGroup": "A"}}"#;
        assert!(serde_json::from_str::<BusinessRule>(json).is_err());
    }

    #[test]
    fn test_co_run_required_default_on_wire() {
        let json = r#"{"id": "r1", "type": "coRun", "parameters": {"tasks": ["T1", "T2"]}}"#;
        let r: BusinessRule = serde_json::from_str(json).unwrap();
        assert!(r.enabled);
        assert!(matches!(r.kind, RuleKind::CoRun { required: true, .. }));
    }
}

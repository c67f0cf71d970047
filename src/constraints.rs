//! Business-rule constraint filters.
//!
//! [`RuleSet`] is a read-only, ordered view over the enabled business
//! rules. The allocator consults it for every candidate
//! (task, worker, phase) triple:
//!
//! | Rule | Effect |
//! |------|--------|
//! | `phaseWindow` | Hard filter: phases outside the window are never tried |
//! | `loadLimit` | Hard filter: task duration above the group cap is rejected and reported |
//! | `coRun` | Groups tasks that must share a worker (handled by the allocator) |
//! | `slotRestriction` | Reported after allocation, never blocks a placement |
//! | `skillRequirement` | Reserved, no effect |
//!
//! Rules are evaluated by `priority` ascending, then by position in the
//! input slice.

use std::collections::{BTreeSet, HashMap};

use crate::models::{BusinessRule, Client, GroupType, RuleKind, RuleViolation, Task, Worker};

/// Outcome of checking one placement against the rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement<'a> {
    /// No rule objects.
    Allowed,
    /// The phase lies outside the task's phase window.
    OutsideWindow,
    /// The task exceeds a load limit of the worker's group.
    LoadLimited(&'a BusinessRule),
}

/// Enabled rules in evaluation order, with precomputed lookups.
#[derive(Debug, Clone)]
pub struct RuleSet<'a> {
    rules: Vec<&'a BusinessRule>,
    windows: HashMap<&'a str, BTreeSet<u32>>,
}

impl<'a> RuleSet<'a> {
    /// Builds a rule set from the rule collection.
    ///
    /// Disabled rules are dropped. The sort is stable, so equal
    /// priorities keep insertion order.
    pub fn new(rules: &'a [BusinessRule]) -> Self {
        let mut ordered: Vec<&BusinessRule> = rules.iter().filter(|r| r.enabled).collect();
        ordered.sort_by_key(|r| r.priority);

        let mut windows: HashMap<&str, BTreeSet<u32>> = HashMap::new();
        for rule in &ordered {
            if let RuleKind::PhaseWindow {
                task_id,
                allowed_phases,
            } = &rule.kind
            {
                let entry = windows.entry(task_id.as_str()).or_default();
                entry.extend(
                    allowed_phases
                        .iter()
                        .filter(|&&p| p >= 1 && p <= u32::MAX as i64)
                        .map(|&p| p as u32),
                );
            }
        }

        Self {
            rules: ordered,
            windows,
        }
    }

    /// Iterates enabled rules in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &'a BusinessRule> + '_ {
        self.rules.iter().copied()
    }

    /// Number of enabled rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule is enabled.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Allowed phases of a task, or `None` if no window governs it.
    ///
    /// Several windows for the same task union their phases.
    pub fn allowed_phases(&self, task_id: &str) -> Option<&BTreeSet<u32>> {
        self.windows.get(task_id)
    }

    /// Whether the phase windows permit `task_id` in `phase`.
    pub fn phase_allowed(&self, task_id: &str, phase: u32) -> bool {
        self.allowed_phases(task_id)
            .map_or(true, |phases| phases.contains(&phase))
    }

    /// First load limit of the worker's group that the task exceeds.
    pub fn load_limit_breach(&self, worker: &Worker, task: &Task) -> Option<&'a BusinessRule> {
        self.rules.iter().copied().find(|rule| match &rule.kind {
            RuleKind::LoadLimit {
                worker_group,
                max_slots_per_phase,
            } => *worker_group == worker.group && *max_slots_per_phase < task.duration,
            _ => false,
        })
    }

    /// Checks a candidate placement.
    ///
    /// Phase windows are checked before load limits, so a phase outside
    /// the window never produces a load-limit report.
    pub fn evaluate(&self, task: &Task, worker: &Worker, phase: u32) -> Placement<'a> {
        if !self.phase_allowed(&task.id, phase) {
            return Placement::OutsideWindow;
        }
        match self.load_limit_breach(worker, task) {
            Some(rule) => Placement::LoadLimited(rule),
            None => Placement::Allowed,
        }
    }

    /// Required co-run groups, with overlapping groups merged.
    ///
    /// Groups are returned in the order their first rule is evaluated.
    pub fn co_run_groups(&self) -> Vec<BTreeSet<String>> {
        let mut groups: Vec<BTreeSet<String>> = Vec::new();

        for rule in &self.rules {
            let RuleKind::CoRun {
                tasks,
                required: true,
            } = &rule.kind
            else {
                continue;
            };

            let mut merged: BTreeSet<String> = tasks.iter().cloned().collect();
            let mut insert_at = groups.len();
            let mut idx = 0;
            while idx < groups.len() {
                if groups[idx].is_disjoint(&merged) {
                    idx += 1;
                } else {
                    insert_at = insert_at.min(idx);
                    merged.extend(groups.remove(idx));
                }
            }
            groups.insert(insert_at.min(groups.len()), merged);
        }

        groups
    }

    /// Reports slot restrictions whose group lacks enough common phases.
    ///
    /// Worker groups intersect the members' available slots. Client
    /// groups intersect the preferred phases of the tasks their members
    /// request; tasks without a usable preference don't constrain, and a
    /// group with no constraining task is never reported.
    pub fn slot_restriction_findings(
        &self,
        clients: &[Client],
        workers: &[Worker],
        tasks: &[Task],
    ) -> Vec<RuleViolation> {
        let mut findings = Vec::new();

        for rule in &self.rules {
            let RuleKind::SlotRestriction {
                group_type,
                group_name,
                min_slots,
            } = &rule.kind
            else {
                continue;
            };

            let common = match group_type {
                GroupType::Worker => worker_group_common_slots(workers, group_name),
                GroupType::Client => client_group_common_slots(clients, tasks, group_name),
            };

            match common {
                GroupSlots::Empty => findings.push(RuleViolation::new(
                    rule,
                    format!("{} group {group_name} has no members", group_label(*group_type)),
                )),
                GroupSlots::Unconstrained => {}
                GroupSlots::Common(slots) if slots.len() < *min_slots as usize => {
                    findings.push(RuleViolation::new(
                        rule,
                        format!(
                            "{} group {group_name} has {} common slots, fewer than the required {min_slots}",
                            group_label(*group_type),
                            slots.len()
                        ),
                    ))
                }
                GroupSlots::Common(_) => {}
            }
        }

        findings
    }
}

enum GroupSlots {
    Empty,
    Unconstrained,
    Common(BTreeSet<u32>),
}

fn group_label(group_type: GroupType) -> &'static str {
    match group_type {
        GroupType::Client => "Client",
        GroupType::Worker => "Worker",
    }
}

fn intersect_all(mut sets: impl Iterator<Item = BTreeSet<u32>>) -> Option<BTreeSet<u32>> {
    let first = sets.next()?;
    Some(sets.fold(first, |acc, s| acc.intersection(&s).copied().collect()))
}

fn worker_group_common_slots(workers: &[Worker], group: &str) -> GroupSlots {
    let slots = workers.iter().filter(|w| w.group == group).map(|w| w.phases());
    match intersect_all(slots) {
        Some(common) => GroupSlots::Common(common),
        None => GroupSlots::Empty,
    }
}

fn client_group_common_slots(clients: &[Client], tasks: &[Task], group: &str) -> GroupSlots {
    let members: Vec<&Client> = clients
        .iter()
        .filter(|c| c.group_tag.as_deref() == Some(group))
        .collect();
    if members.is_empty() {
        return GroupSlots::Empty;
    }

    let preferred = tasks
        .iter()
        .filter(|t| members.iter().any(|c| c.requests(&t.id)))
        .filter_map(|t| t.preferred_phases.as_ref()?.resolve().ok())
        .filter(|phases| !phases.is_empty());

    match intersect_all(preferred) {
        Some(common) => GroupSlots::Common(common),
        None => GroupSlots::Unconstrained,
    }
}

//! Property-based tests for allocation and validation invariants.
//!
//! Problems are generated with small skill, group and phase pools so that
//! contention, rule hits and infeasible tasks are all common.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use proptest::prelude::*;

use u_allocate::constraints::RuleSet;
use u_allocate::models::{
    AllocationResult, BusinessRule, Client, PriorityWeights, RuleKind, Task, Worker,
};
use u_allocate::{allocate, validate};

const SKILLS: [&str; 3] = ["a", "b", "c"];
const GROUPS: [&str; 2] = ["G1", "G2"];
const TASK_REFS: usize = 8;

#[derive(Debug, Clone)]
struct Problem {
    clients: Vec<Client>,
    workers: Vec<Worker>,
    tasks: Vec<Task>,
    rules: Vec<BusinessRule>,
    priorities: PriorityWeights,
}

impl Problem {
    fn solve(&self) -> AllocationResult {
        allocate(
            &self.clients,
            &self.workers,
            &self.tasks,
            &self.rules,
            &self.priorities,
        )
    }

    fn task(&self, id: &str) -> &Task {
        self.tasks.iter().find(|t| t.id == id).expect("known task")
    }

    fn worker(&self, id: &str) -> &Worker {
        self.workers.iter().find(|w| w.id == id).expect("known worker")
    }
}

#[derive(Debug, Clone)]
enum RawRule {
    Window(usize, Vec<i64>),
    Limit(usize, i64),
    CoRun(Vec<usize>, bool),
}

fn arb_skills(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::sample::subsequence(SKILLS.to_vec(), 0..=max)
        .prop_map(|s| s.into_iter().map(String::from).collect())
}

/// (skills, slots, max load, qualification, group index)
fn arb_worker() -> impl Strategy<Value = (Vec<String>, Vec<i64>, i64, i64, usize)> {
    (
        arb_skills(3),
        prop::collection::vec(-1i64..6, 0..5),
        0i64..4,
        0i64..4,
        0usize..GROUPS.len(),
    )
}

/// (skills, duration)
fn arb_task() -> impl Strategy<Value = (Vec<String>, i64)> {
    (arb_skills(2), 1i64..4)
}

/// (priority level, requested task refs)
fn arb_client() -> impl Strategy<Value = (i32, Vec<usize>)> {
    (1i32..=5, prop::collection::vec(0usize..TASK_REFS, 0..4))
}

/// (rule, priority, enabled)
fn arb_rule() -> impl Strategy<Value = (RawRule, i32, bool)> {
    let raw = prop_oneof![
        (0usize..TASK_REFS, prop::collection::vec(0i64..6, 0..3))
            .prop_map(|(t, phases)| RawRule::Window(t, phases)),
        (0usize..GROUPS.len(), 0i64..4).prop_map(|(g, max)| RawRule::Limit(g, max)),
        (prop::collection::vec(0usize..TASK_REFS, 1..4), any::<bool>())
            .prop_map(|(tasks, required)| RawRule::CoRun(tasks, required)),
    ];
    (raw, 0i32..3, prop::bool::weighted(0.8))
}

fn arb_problem() -> impl Strategy<Value = Problem> {
    (
        prop::collection::vec(arb_worker(), 1..5),
        prop::collection::vec(arb_task(), 0..TASK_REFS),
        prop::collection::vec(arb_client(), 0..3),
        prop::collection::vec(arb_rule(), 0..4),
        (0u8..=100, 0u8..=100, 0u8..=100),
    )
        .prop_map(|(workers, tasks, clients, rules, (w1, w2, w3))| {
            let task_id = |i: usize| format!("T{i}");

            let workers = workers
                .into_iter()
                .enumerate()
                .map(|(i, (skills, slots, max_load, qual, group))| {
                    let mut w = Worker::new(format!("W{i}"))
                        .with_name(format!("Worker {i}"))
                        .with_group(GROUPS[group])
                        .with_slots(slots)
                        .with_max_load(max_load)
                        .with_qualification(qual);
                    w.skills = skills;
                    w
                })
                .collect();

            let tasks = tasks
                .into_iter()
                .enumerate()
                .map(|(i, (skills, duration))| {
                    let mut t = Task::new(task_id(i))
                        .with_name(format!("Task {i}"))
                        .with_duration(duration);
                    t.required_skills = skills;
                    t
                })
                .collect();

            let clients = clients
                .into_iter()
                .enumerate()
                .map(|(i, (level, refs))| {
                    refs.into_iter().fold(
                        Client::new(format!("C{i}"))
                            .with_name(format!("Client {i}"))
                            .with_priority(level),
                        |c, r| c.with_task(task_id(r)),
                    )
                })
                .collect();

            let rules = rules
                .into_iter()
                .enumerate()
                .map(|(i, (raw, priority, enabled))| {
                    let id = format!("R{i}");
                    let rule = match raw {
                        RawRule::Window(t, phases) => BusinessRule::phase_window(id, task_id(t), phases),
                        RawRule::Limit(g, max) => BusinessRule::load_limit(id, GROUPS[g], max),
                        RawRule::CoRun(refs, required) => BusinessRule::new(
                            id,
                            RuleKind::CoRun {
                                tasks: refs.into_iter().map(task_id).collect(),
                                required,
                            },
                        ),
                    };
                    let rule = rule.with_priority(priority);
                    if enabled {
                        rule
                    } else {
                        rule.disabled()
                    }
                })
                .collect();

            Problem {
                clients,
                workers,
                tasks,
                rules,
                priorities: PriorityWeights::new(w1 as f64, w2 as f64, w3 as f64),
            }
        })
}

proptest! {
    #[test]
    fn prop_allocation_is_deterministic(p in arb_problem()) {
        prop_assert_eq!(p.solve(), p.solve());
    }

    #[test]
    fn prop_every_task_accounted_once(p in arb_problem()) {
        let result = p.solve();
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for a in &result.assignments {
            *seen.entry(a.task_id.as_str()).or_insert(0) += 1;
        }
        for id in &result.unassigned_tasks {
            *seen.entry(id.as_str()).or_insert(0) += 1;
        }

        prop_assert_eq!(seen.len(), p.tasks.len());
        for t in &p.tasks {
            prop_assert_eq!(seen.get(t.id.as_str()).copied(), Some(1));
        }
    }

    #[test]
    fn prop_capacity_respected(p in arb_problem()) {
        let result = p.solve();
        let mut load: HashMap<(&str, u32), i64> = HashMap::new();
        for a in &result.assignments {
            let worker = p.worker(&a.worker_id);
            prop_assert!(worker.phases().contains(&a.phase));
            *load.entry((a.worker_id.as_str(), a.phase)).or_insert(0) += p.task(&a.task_id).duration;
        }
        for ((worker_id, phase), used) in load {
            let cap = p.worker(worker_id).max_load_per_phase;
            prop_assert!(used <= cap, "{} phase {} uses {} of {}", worker_id, phase, used, cap);
        }
    }

    #[test]
    fn prop_skills_covered(p in arb_problem()) {
        let result = p.solve();
        for a in &result.assignments {
            let task = p.task(&a.task_id);
            prop_assert!(p.worker(&a.worker_id).covers(&task.required_skills));
        }
    }

    #[test]
    fn prop_phase_windows_respected(p in arb_problem()) {
        let result = p.solve();
        let rules = RuleSet::new(&p.rules);
        for a in &result.assignments {
            if let Some(allowed) = rules.allowed_phases(&a.task_id) {
                prop_assert!(allowed.contains(&a.phase));
            }
        }
    }

    #[test]
    fn prop_load_limits_respected(p in arb_problem()) {
        let result = p.solve();
        for a in &result.assignments {
            let worker = p.worker(&a.worker_id);
            let task = p.task(&a.task_id);
            for rule in p.rules.iter().filter(|r| r.enabled) {
                if let RuleKind::LoadLimit { worker_group, max_slots_per_phase } = &rule.kind {
                    if *worker_group == worker.group {
                        prop_assert!(task.duration <= *max_slots_per_phase);
                    }
                }
            }
        }
    }

    #[test]
    fn prop_co_run_groups_all_or_nothing(p in arb_problem()) {
        let result = p.solve();
        for group in RuleSet::new(&p.rules).co_run_groups() {
            let present: Vec<&Task> = p.tasks.iter().filter(|t| group.contains(&t.id)).collect();
            let workers: BTreeSet<&str> = present
                .iter()
                .filter_map(|t| result.assignment_for_task(&t.id))
                .map(|a| a.worker_id.as_str())
                .collect();
            let assigned = present.iter().filter(|t| result.is_assigned(&t.id)).count();

            prop_assert!(assigned == 0 || assigned == present.len());
            prop_assert!(workers.len() <= 1);
        }
    }

    #[test]
    fn prop_metrics_count_matches(p in arb_problem()) {
        let result = p.solve();
        prop_assert_eq!(result.metrics.total_assignments, result.assignments.len());
        prop_assert!(result.metrics.client_priority_fulfillment.is_finite());
        prop_assert!(result.metrics.worker_utilization_balance.is_finite());
    }

    #[test]
    fn prop_validation_is_idempotent(p in arb_problem()) {
        let first = validate(&p.clients, &p.workers, &p.tasks);
        let second = validate(&p.clients, &p.workers, &p.tasks);
        prop_assert_eq!(first, second);
    }
}

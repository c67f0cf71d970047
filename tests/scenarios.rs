//! End-to-end allocation scenarios: validate, then allocate.

use u_allocate::models::{BusinessRule, Client, GroupType, PriorityWeights, Task, Worker};
use u_allocate::validation::{EntityKind, Severity, ValidationRequest};
use u_allocate::{allocate, validate, AllocationRequest, Allocator};

fn worker(id: &str, skills: &[&str], slots: Vec<i64>, max_load: i64) -> Worker {
    skills.iter().fold(
        Worker::new(id)
            .with_name(format!("Worker {id}"))
            .with_slots(slots)
            .with_max_load(max_load),
        |w, s| w.with_skill(*s),
    )
}

fn task(id: &str, skills: &[&str], duration: i64) -> Task {
    skills.iter().fold(
        Task::new(id)
            .with_name(format!("Task {id}"))
            .with_duration(duration),
        |t, s| t.with_skill(*s),
    )
}

#[test]
fn test_single_assignment() {
    let clients = vec![Client::new("C1")
        .with_name("Acme")
        .with_priority(1)
        .with_task("T1")];
    let workers = vec![worker("W1", &["python"], vec![1, 2], 2)];
    let tasks = vec![task("T1", &["python"], 1)];

    assert!(validate(&clients, &workers, &tasks).is_empty());

    let result = allocate(&clients, &workers, &tasks, &[], &PriorityWeights::default());
    assert_eq!(result.assignments.len(), 1);
    let a = &result.assignments[0];
    assert_eq!((a.task_id.as_str(), a.worker_id.as_str(), a.phase), ("T1", "W1", 1));
    assert!((a.confidence - 1.0).abs() < 1e-12);
    assert!(result.unassigned_tasks.is_empty());
}

#[test]
fn test_uncovered_skill() {
    let clients = vec![Client::new("C1").with_name("Acme").with_task("T1")];
    let workers = vec![worker("W1", &["python"], vec![1, 2], 2)];
    let tasks = vec![task("T1", &["rust"], 1)];

    let errors = validate(&clients, &workers, &tasks);
    let coverage = errors
        .iter()
        .find(|e| e.field == "RequiredSkills")
        .expect("skill coverage error");
    assert_eq!(coverage.severity, Severity::Critical);
    assert_eq!(coverage.entity, EntityKind::Tasks);
    assert_eq!(coverage.row_id, "T1");

    let result = allocate(&clients, &workers, &tasks, &[], &PriorityWeights::default());
    assert!(result.assignments.is_empty());
    assert_eq!(result.unassigned_tasks, vec!["T1"]);
}

#[test]
fn test_scarce_worker_goes_to_higher_priority() {
    let clients = vec![
        Client::new("C1").with_name("Low").with_priority(2).with_task("T1"),
        Client::new("C2").with_name("High").with_priority(5).with_task("T2"),
    ];
    let workers = vec![worker("W1", &["sql"], vec![1], 1)];
    let tasks = vec![task("T1", &["sql"], 1), task("T2", &["sql"], 1)];

    let result = allocate(&clients, &workers, &tasks, &[], &PriorityWeights::default());
    assert_eq!(result.assignments.len(), 1);
    assert_eq!(result.assignments[0].task_id, "T2");
    assert_eq!(result.unassigned_tasks, vec!["T1"]);
}

#[test]
fn test_scarce_phase_goes_to_shorter_task() {
    let clients = vec![Client::new("C1")
        .with_name("Acme")
        .with_priority(3)
        .with_task("long")
        .with_task("short")];
    let workers = vec![worker("W1", &[], vec![1, 2], 2)];
    let tasks = vec![task("long", &[], 2), task("short", &[], 1)];
    let rules = vec![
        BusinessRule::phase_window("long-window", "long", vec![1]),
        BusinessRule::phase_window("short-window", "short", vec![1]),
    ];

    // Alone, "long" fits in phase 1.
    let alone = allocate(&clients, &workers, &tasks[..1], &rules, &PriorityWeights::default());
    assert_eq!(alone.assignment_for_task("long").map(|a| a.phase), Some(1));

    // Together, "short" goes first and leaves phase 1 with one unit.
    let result = allocate(&clients, &workers, &tasks, &rules, &PriorityWeights::default());
    assert_eq!(result.assignment_for_task("short").map(|a| a.phase), Some(1));
    assert_eq!(result.unassigned_tasks, vec!["long"]);
}

#[test]
fn test_load_limit_records_violation() {
    let workers = vec![
        worker("W1", &[], vec![1, 2], 2).with_group("Interns"),
        worker("W2", &[], vec![1, 2], 2).with_group("Seniors"),
    ];
    let tasks = vec![task("T1", &[], 2)];
    let rules = vec![BusinessRule::load_limit("intern-cap", "Interns", 1)];

    let result = allocate(&[], &workers, &tasks, &rules, &PriorityWeights::default());
    assert!(!result.violations.is_empty());
    assert!(result.violations.iter().all(|v| v.rule.id == "intern-cap"));
    assert_eq!(result.assignment_for_task("T1").map(|a| a.worker_id.as_str()), Some("W2"));
}

#[test]
fn test_load_limit_without_alternative() {
    let workers = vec![worker("W1", &[], vec![1, 2], 2).with_group("Interns")];
    let tasks = vec![task("T1", &[], 2)];
    let rules = vec![BusinessRule::load_limit("intern-cap", "Interns", 1)];

    let result = allocate(&[], &workers, &tasks, &rules, &PriorityWeights::default());
    assert!(!result.violations.is_empty());
    assert_eq!(result.unassigned_tasks, vec!["T1"]);
}

#[test]
fn test_duplicate_client_ids() {
    let clients = vec![
        Client::new("C1").with_name("First"),
        Client::new("C1").with_name("Second"),
    ];
    let errors = validate(&clients, &[], &[]);
    let dups: Vec<_> = errors
        .iter()
        .filter(|e| e.field == "ClientID" && e.severity == Severity::Critical)
        .collect();
    assert_eq!(dups.len(), 2);
    assert_ne!(dups[0].id, dups[1].id);
}

#[test]
fn test_co_run_and_slot_restriction() {
    let clients = vec![Client::new("C1")
        .with_name("Acme")
        .with_group("VIP")
        .with_task("T1")
        .with_task("T2")];
    let workers = vec![
        worker("W1", &["etl"], vec![1, 2], 2).with_group("Data"),
        worker("W2", &["etl", "bi"], vec![2, 3], 2).with_group("Data"),
    ];
    let tasks = vec![
        task("T1", &["etl"], 1).with_preferred_phases("1-2"),
        task("T2", &["bi"], 1).with_preferred_phases("2"),
        task("T3", &["etl"], 1),
    ];
    let rules = vec![
        BusinessRule::co_run("pair", vec!["T1".into(), "T2".into()]),
        BusinessRule::slot_restriction("data-overlap", GroupType::Worker, "Data", 2),
        BusinessRule::slot_restriction("vip-overlap", GroupType::Client, "VIP", 1),
    ];

    let result = allocate(&clients, &workers, &tasks, &rules, &PriorityWeights::default());
    assert_eq!(result.assignment_for_task("T1").map(|a| a.worker_id.as_str()), Some("W2"));
    assert_eq!(result.assignment_for_task("T2").map(|a| a.worker_id.as_str()), Some("W2"));
    assert!(result.is_assigned("T3"));

    // Data workers share only phase 2; VIP preferences share phase 2.
    let reported: Vec<&str> = result.violations.iter().map(|v| v.rule.id.as_str()).collect();
    assert_eq!(reported, vec!["data-overlap"]);
}

#[test]
fn test_json_request_round_trip() {
    let json = r#"{
        "clients": [
            {"ClientID": "C1", "ClientName": "Acme", "PriorityLevel": 4, "RequestedTaskIDs": ["T1", "T2"]}
        ],
        "workers": [
            {"WorkerID": "W1", "WorkerName": "Ann", "Skills": ["python"], "WorkerGroup": "A",
             "AvailableSlots": [1, 2, 3], "MaxLoadPerPhase": 1, "QualificationLevel": 2}
        ],
        "tasks": [
            {"TaskID": "T1", "TaskName": "ETL", "RequiredSkills": ["python"], "Duration": 1},
            {"TaskID": "T2", "TaskName": "Model", "RequiredSkills": ["python"], "EstimatedDuration": 1}
        ],
        "rules": [
            {"id": "r1", "type": "phaseWindow", "parameters": {"taskId": "T2", "allowedPhases": [3]},
             "priority": 1, "enabled": true}
        ],
        "priorities": {"clientPriorityFulfillment": 60, "workerWorkLifeBalance": 20, "costEfficiency": 20}
    }"#;

    let request = AllocationRequest::from_json(json).expect("valid request");
    let result = Allocator::new().allocate_request(&request);

    assert_eq!(result.assignment_for_task("T1").map(|a| a.phase), Some(1));
    assert_eq!(result.assignment_for_task("T2").map(|a| a.phase), Some(3));

    let response = serde_json::to_value(&result).expect("serializable");
    assert_eq!(response["assignments"][1]["workerId"], "W1");
    assert_eq!(response["metrics"]["totalAssignments"], 2);
    // One client, all requests placed, level 4: 1.0 * 0.8 * 60.
    let fulfillment = response["metrics"]["clientPriorityFulfillment"]
        .as_f64()
        .expect("number");
    assert!((fulfillment - 48.0).abs() < 1e-9);
}

#[test]
fn test_validation_gate() {
    let request = ValidationRequest::from_json(
        r#"{"clients": [{"ClientID": "C1", "ClientName": "A", "RequestedTaskIDs": ["T9"]}],
            "workers": [], "tasks": []}"#,
    )
    .expect("valid request");
    let report = request.validate();
    assert!(report.has_critical());
    assert_eq!(report.summary.total_errors, report.errors.len());
}

#[test]
fn test_malformed_slots_still_allocate() {
    let json = r#"{
        "clients": [{"ClientID": "C1", "ClientName": "Acme", "RequestedTaskIDs": ["T1"]}],
        "workers": [{"WorkerID": "W1", "WorkerName": "Ann", "AvailableSlots": ["x", 2.5, 3],
                     "MaxLoadPerPhase": 1}],
        "tasks": [{"TaskID": "T1", "TaskName": "Audit", "Duration": 1}],
        "rules": [],
        "priorities": {"clientPriorityFulfillment": 50, "workerWorkLifeBalance": 50, "costEfficiency": 50}
    }"#;

    let request = AllocationRequest::from_json(json).expect("malformed cells are data, not errors");
    let errors = validate(&request.clients, &request.workers, &request.tasks);
    assert!(errors
        .iter()
        .any(|e| e.field == "AvailableSlots" && e.severity == Severity::Warning));

    let result = Allocator::new().allocate_request(&request);
    assert_eq!(result.assignment_for_task("T1").map(|a| a.phase), Some(3));
}

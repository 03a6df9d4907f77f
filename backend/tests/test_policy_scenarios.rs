//! Policy scenario tests
//!
//! Whole runs of each policy over small task sets with hand-checked
//! schedules.

use sched_simulator_core_rs::analysis::{edf_feasible, rm_bound_check};
use sched_simulator_core_rs::orchestrator::result_digest;
use sched_simulator_core_rs::policy::{
    EdfPolicy, FcfsPolicy, FixedPriorityPolicy, RoundRobinPolicy,
};
use sched_simulator_core_rs::{
    generate_and_simulate, PolicyConfig, ScenarioConfig, Segment, SimConfig, SimResult, Task,
};

fn config(horizon: usize) -> SimConfig {
    SimConfig {
        horizon,
        rr_quantum: 5,
    }
}

fn run(policy: PolicyConfig, tasks: Vec<Task>, horizon: usize) -> SimResult {
    ScenarioConfig {
        sim: config(horizon),
        policy,
        tasks,
    }
    .run()
    .unwrap()
}

// ============================================================================
// EDF
// ============================================================================

#[test]
fn test_edf_single_task_no_overload() {
    let tasks = vec![Task::new(1, 10, 3, 10)];
    let result = generate_and_simulate(&tasks, &config(30), Box::new(EdfPolicy::new())).unwrap();

    assert_eq!(result.jobs.len(), 3);
    for job in &result.jobs {
        assert!(job.is_finished());
        assert!(!job.missed_deadline());
        assert_eq!(job.response_time(), Some(3));
    }

    assert_eq!(
        result.timeline,
        vec![
            Segment::run(0, 3, "T1J1"),
            Segment::idle(3, 10),
            Segment::run(10, 13, "T1J2"),
            Segment::idle(13, 20),
            Segment::run(20, 23, "T1J3"),
            Segment::idle(23, 30),
        ]
    );
}

#[test]
fn test_edf_preempts_for_earlier_deadline() {
    let tasks = vec![
        Task::new(1, 20, 6, 20),
        Task::new(2, 5, 1, 3).with_phase(2),
    ];
    let result = run(PolicyConfig::Edf, tasks, 20);

    assert_eq!(
        result.timeline,
        vec![
            Segment::run(0, 2, "T1J1"),
            Segment::run(2, 3, "T2J1"),
            Segment::run(3, 7, "T1J1"),
            Segment::run(7, 8, "T2J2"),
            Segment::idle(8, 12),
            Segment::run(12, 13, "T2J3"),
            Segment::idle(13, 17),
            Segment::run(17, 18, "T2J4"),
            Segment::idle(18, 20),
        ]
    );

    let long = result.job(1, 1).unwrap();
    assert_eq!(long.preemptions(), 1);
    assert_eq!(long.start_tick(), Some(0));
    assert_eq!(long.finish_tick(), Some(7));
    assert_eq!(result.missed_jobs().count(), 0);
}

#[test]
fn test_edf_meets_full_utilization_where_rm_misses() {
    let tasks = vec![Task::new(1, 4, 2, 4), Task::new(2, 6, 3, 6)];
    assert!(edf_feasible(&tasks));
    assert!(!rm_bound_check(&tasks).guaranteed);

    let edf = run(PolicyConfig::Edf, tasks.clone(), 12);
    assert_eq!(edf.missed_jobs().count(), 0);
    assert!(edf.jobs.iter().all(|j| j.is_finished()));

    let rm = run(PolicyConfig::RateMonotonic, tasks, 12);
    let late = rm.job(2, 1).unwrap();
    assert!(late.missed_deadline());
    assert_eq!(late.finish_tick(), Some(7));
    assert_eq!(late.slack(), Some(-1));
}

// ============================================================================
// Fixed priority / rate-monotonic
// ============================================================================

#[test]
fn test_rm_tie_resolved_by_lower_task_id() {
    // Listed in reverse order so the vector position cannot decide the tie
    let tasks = vec![Task::new(2, 10, 2, 10), Task::new(1, 10, 2, 10)];

    let first = generate_and_simulate(
        &tasks,
        &config(10),
        Box::new(FixedPriorityPolicy::new(&tasks)),
    )
    .unwrap();

    assert_eq!(
        first.timeline,
        vec![
            Segment::run(0, 2, "T1J1"),
            Segment::run(2, 4, "T2J1"),
            Segment::idle(4, 10),
        ]
    );

    for _ in 0..5 {
        let again = generate_and_simulate(
            &tasks,
            &config(10),
            Box::new(FixedPriorityPolicy::new(&tasks)),
        )
        .unwrap();
        assert_eq!(again, first);
    }
}

#[test]
fn test_explicit_priority_overrides_rate_monotonic_order() {
    // Task 2 has the longer period but an explicit top priority
    let tasks = vec![
        Task::new(1, 5, 2, 5),
        Task::new(2, 50, 3, 50).with_priority(1),
    ];
    let result = run(PolicyConfig::RateMonotonic, tasks, 10);

    assert_eq!(result.timeline[0], Segment::run(0, 3, "T2J1"));
    assert_eq!(result.job(1, 1).unwrap().start_tick(), Some(3));
}

// ============================================================================
// Round-robin
// ============================================================================

#[test]
fn test_rr_fairness_with_quantum_two() {
    let tasks = vec![
        Task::new(1, 20, 4, 20),
        Task::new(2, 20, 4, 20),
        Task::new(3, 20, 4, 20),
    ];
    let cfg = SimConfig {
        horizon: 20,
        rr_quantum: 2,
    };
    let result = generate_and_simulate(&tasks, &cfg, Box::new(RoundRobinPolicy::new(2))).unwrap();

    assert_eq!(
        result.timeline,
        vec![
            Segment::run(0, 2, "T1J1"),
            Segment::run(2, 4, "T2J1"),
            Segment::run(4, 6, "T3J1"),
            Segment::run(6, 8, "T1J1"),
            Segment::run(8, 10, "T2J1"),
            Segment::run(10, 12, "T3J1"),
            Segment::idle(12, 20),
        ]
    );

    let finishes: Vec<Option<usize>> = result.jobs.iter().map(|j| j.finish_tick()).collect();
    assert_eq!(finishes, vec![Some(8), Some(10), Some(12)]);
    assert!(result.jobs.iter().all(|j| j.preemptions() == 1));
}

#[test]
fn test_rr_single_job_keeps_processor_across_quanta() {
    let tasks = vec![Task::new(1, 20, 7, 20)];
    let result = run(PolicyConfig::RoundRobin { quantum: Some(2) }, tasks, 10);

    assert_eq!(
        result.timeline,
        vec![Segment::run(0, 7, "T1J1"), Segment::idle(7, 10)]
    );
    assert_eq!(result.job(1, 1).unwrap().preemptions(), 0);
}

#[test]
fn test_rr_late_arrival_joins_back_of_rotation() {
    let tasks = vec![
        Task::new(1, 50, 6, 50),
        Task::new(2, 50, 6, 50),
        Task::new(3, 50, 2, 50).with_phase(1),
    ];
    let result = run(PolicyConfig::RoundRobin { quantum: Some(3) }, tasks, 20);

    assert_eq!(
        result.timeline,
        vec![
            Segment::run(0, 3, "T1J1"),
            Segment::run(3, 6, "T2J1"),
            Segment::run(6, 8, "T3J1"),
            Segment::run(8, 11, "T1J1"),
            Segment::run(11, 14, "T2J1"),
            Segment::idle(14, 20),
        ]
    );
}

// ============================================================================
// FCFS
// ============================================================================

#[test]
fn test_fcfs_overload_misses_deadline() {
    let tasks = vec![Task::new(1, 4, 3, 4), Task::new(2, 6, 3, 6)];
    assert!(rm_bound_check(&tasks).overloaded);

    let result =
        generate_and_simulate(&tasks, &config(24), Box::new(FcfsPolicy::new())).unwrap();

    assert!(result.jobs.iter().any(|j| j.missed_deadline()));
    // An earlier release is never displaced by a later one
    assert_eq!(result.summary().preemptions, 0);
}

#[test]
fn test_fcfs_runs_in_release_order() {
    let tasks = vec![
        Task::new(1, 100, 4, 100).with_phase(1),
        Task::new(2, 100, 2, 3),
    ];
    let result = run(PolicyConfig::Fcfs, tasks, 10);

    assert_eq!(
        result.timeline,
        vec![
            Segment::run(0, 2, "T2J1"),
            Segment::run(2, 6, "T1J1"),
            Segment::idle(6, 10),
        ]
    );
}

// ============================================================================
// Cross-policy
// ============================================================================

#[test]
fn test_every_policy_is_idempotent() {
    let tasks = vec![
        Task::new(1, 10, 3, 10),
        Task::new(2, 25, 8, 25),
        Task::new(3, 40, 6, 40).with_phase(5),
    ];

    for policy in PolicyConfig::all() {
        let a = run(policy.clone(), tasks.clone(), 200);
        let b = run(policy.clone(), tasks.clone(), 200);
        assert_eq!(a, b, "{} produced different results", policy);
        assert_eq!(result_digest(&a).unwrap(), result_digest(&b).unwrap());
    }
}

#[test]
fn test_deadline_shorter_than_budget_always_misses() {
    let tasks = vec![Task::new(1, 10, 3, 2)];
    for policy in PolicyConfig::all() {
        let result = run(policy.clone(), tasks.clone(), 30);
        assert_eq!(result.missed_jobs().count(), 3, "policy {}", policy);
    }
}

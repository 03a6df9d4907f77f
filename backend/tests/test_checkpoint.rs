//! Report Tests - Save/Load and Verification of Completed Runs
//!
//! Critical invariants tested:
//! - Determinism: Same scenario produces the same config hash and result digest
//! - Round trip: A report survives JSON serialization unchanged
//! - Config matching: Reject a report checked against a different scenario
//! - Integrity: Tampered timelines, jobs or summaries are detected

use sched_simulator_core_rs::orchestrator::{
    compute_config_hash, result_digest, validate_result, RunReport,
};
use sched_simulator_core_rs::{
    PolicyConfig, ScenarioConfig, Segment, SimConfig, SimulationError, Task,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn demo_scenario(policy: PolicyConfig) -> ScenarioConfig {
    ScenarioConfig {
        sim: SimConfig {
            horizon: 200,
            rr_quantum: 4,
        },
        policy,
        tasks: vec![
            Task::new(1, 10, 3, 10),
            Task::new(2, 25, 8, 25),
            Task::new(3, 40, 6, 40).with_phase(5),
        ],
    }
}

fn demo_report(policy: PolicyConfig) -> (ScenarioConfig, RunReport) {
    let scenario = demo_scenario(policy);
    let result = scenario.run().unwrap();
    let report = RunReport::new(&scenario, result).unwrap();
    (scenario, report)
}

// ============================================================================
// Round Trip
// ============================================================================

#[test]
fn test_report_json_round_trip() {
    for policy in PolicyConfig::all() {
        let (scenario, report) = demo_report(policy);
        let json = report.to_json().unwrap();
        let restored = RunReport::from_json(&json).unwrap();

        assert_eq!(restored, report);
        assert!(restored.verify_against(&scenario).is_ok());
    }
}

#[test]
fn test_report_records_effective_quantum() {
    let (_, report) = demo_report(PolicyConfig::RoundRobin { quantum: Some(2) });
    assert_eq!(report.policy, "rr");
    assert_eq!(report.sim.rr_quantum, 2);
    assert_eq!(report.summary, report.result.summary());
}

#[test]
fn test_malformed_json_rejected() {
    assert!(matches!(
        RunReport::from_json("{\"policy\": \"edf\"}"),
        Err(SimulationError::Serialization(_))
    ));
}

// ============================================================================
// Hashing
// ============================================================================

#[test]
fn test_config_hash_ignores_key_order() {
    let a = ScenarioConfig::from_json_str(
        r#"{"sim": {"horizon": 50, "rr_quantum": 2}, "policy": {"type": "Edf"},
            "tasks": [{"id": 1, "period": 10, "wcet": 3, "deadline": 10}]}"#,
    )
    .unwrap();
    let b = ScenarioConfig::from_json_str(
        r#"{"tasks": [{"deadline": 10, "wcet": 3, "period": 10, "id": 1}],
            "policy": {"type": "Edf"}, "sim": {"rr_quantum": 2, "horizon": 50}}"#,
    )
    .unwrap();

    assert_eq!(
        compute_config_hash(&a).unwrap(),
        compute_config_hash(&b).unwrap()
    );
}

#[test]
fn test_config_hash_differs_by_policy() {
    let edf = compute_config_hash(&demo_scenario(PolicyConfig::Edf)).unwrap();
    let rm = compute_config_hash(&demo_scenario(PolicyConfig::RateMonotonic)).unwrap();
    assert_ne!(edf, rm);
    assert_eq!(edf.len(), 64);
}

#[test]
fn test_result_digest_stable_across_runs() {
    let scenario = demo_scenario(PolicyConfig::RoundRobin { quantum: None });
    let first = result_digest(&scenario.run().unwrap()).unwrap();
    for _ in 0..3 {
        assert_eq!(result_digest(&scenario.run().unwrap()).unwrap(), first);
    }
}

// ============================================================================
// Verification
// ============================================================================

#[test]
fn test_verify_rejects_other_scenario() {
    let (_, report) = demo_report(PolicyConfig::Edf);
    let other = demo_scenario(PolicyConfig::Fcfs);

    match report.verify_against(&other) {
        Err(SimulationError::InvalidConfig(msg)) => assert!(msg.contains("Config hash mismatch")),
        other => panic!("expected config hash mismatch, got {:?}", other),
    }
}

#[test]
fn test_verify_detects_tampered_summary() {
    let (scenario, mut report) = demo_report(PolicyConfig::Edf);
    report.summary.missed += 1;

    assert!(matches!(
        report.verify_against(&scenario),
        Err(SimulationError::ResultValidation(_))
    ));
}

#[test]
fn test_validate_detects_truncated_timeline() {
    let (scenario, report) = demo_report(PolicyConfig::Edf);
    let mut result = report.result.clone();
    result.timeline.pop();

    assert!(validate_result(&scenario.tasks, &scenario.sim, &result).is_err());
}

#[test]
fn test_validate_detects_unmerged_segments() {
    let (scenario, report) = demo_report(PolicyConfig::Edf);
    let mut result = report.result.clone();

    let first = result.timeline.remove(0);
    let mid = first.start + 1;
    result
        .timeline
        .insert(0, Segment::run(mid, first.end, first.label.clone()));
    result
        .timeline
        .insert(0, Segment::run(first.start, mid, first.label));

    assert!(validate_result(&scenario.tasks, &scenario.sim, &result).is_err());
}

#[test]
fn test_validate_detects_dropped_job() {
    let (scenario, report) = demo_report(PolicyConfig::RateMonotonic);
    let mut result = report.result.clone();
    result.jobs.pop();

    assert!(matches!(
        validate_result(&scenario.tasks, &scenario.sim, &result),
        Err(SimulationError::ResultValidation(_))
    ));
}

#[test]
fn test_validate_accepts_every_policy() {
    for policy in PolicyConfig::all() {
        let (scenario, report) = demo_report(policy);
        validate_result(&scenario.tasks, &scenario.effective_sim_config(), &report.result)
            .unwrap();
    }
}

#[test]
fn test_validate_rejects_overflowing_deadline() {
    let (scenario, report) = demo_report(PolicyConfig::Edf);
    let mut tasks = scenario.tasks.clone();
    tasks[0].deadline = usize::MAX;

    assert!(matches!(
        validate_result(&tasks, &scenario.sim, &report.result),
        Err(SimulationError::InvalidConfig(_))
    ));
}

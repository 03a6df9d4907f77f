//! Scheduling Simulator CLI
//!
//! Runs one scheduling policy over a periodic task set, validates the
//! result, writes it to disk and prints a summary.
//!
//! # Output
//!
//! `timeline.csv`, `jobs.csv` and `report.json` in the output directory
//! (default `outputs/`). The run summary and per-task statistics go to
//! stdout.
//!
//! # Exit Codes
//!
//! - `0`: Success (regardless of deadline misses)
//! - `1`: Simulation, validation or export failure
//! - `2`: Invalid arguments or configuration error

use sched_simulator_core_rs::analysis::{rm_bound_check, task_statistics, TaskStatistics};
use sched_simulator_core_rs::export::export_run;
use sched_simulator_core_rs::orchestrator::{validate_result, RunReport};
use sched_simulator_core_rs::{PolicyConfig, ScenarioConfig, SimConfig, Task};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

fn print_usage(exe: &str) {
    eprintln!(
        "usage: {} [POLICY] [OPTIONS]

POLICY:
    fcfs | edf | rm | rr    Scheduling policy (default: edf)

OPTIONS:
    --scenario <FILE>       JSON scenario (default: built-in three-task set)
    --horizon <N>           Ticks to simulate (overrides the scenario)
    --quantum <N>           Round-robin quantum (overrides the scenario)
    --out <DIR>             Output directory (default: outputs)
    --help, -h              Show this help message",
        exe
    );
}

struct CliArgs {
    policy: Option<PolicyConfig>,
    scenario: Option<PathBuf>,
    horizon: Option<usize>,
    quantum: Option<usize>,
    out: PathBuf,
}

/// Three periodic tasks, utilization 0.77
fn demo_tasks() -> Vec<Task> {
    vec![
        Task::new(1, 10, 3, 10),
        Task::new(2, 25, 8, 25),
        Task::new(3, 40, 6, 40).with_phase(5),
    ]
}

/// Parse the command line; `Ok(None)` means help was requested
fn parse_args() -> Result<Option<CliArgs>, String> {
    let mut args = env::args();
    let exe = args.next().unwrap_or_else(|| "sched-sim".to_string());
    let mut cli = CliArgs {
        policy: None,
        scenario: None,
        horizon: None,
        quantum: None,
        out: PathBuf::from("outputs"),
    };

    while let Some(arg) = args.next() {
        let (flag, inline) = match arg.split_once('=') {
            Some((flag, value)) if flag.starts_with("--") => (flag.to_string(), Some(value.to_string())),
            _ => (arg.clone(), None),
        };
        let mut value = |name: &str| -> Result<String, String> {
            inline
                .clone()
                .or_else(|| args.next())
                .ok_or_else(|| format!("{} requires a value", name))
        };

        match flag.as_str() {
            "--help" | "-h" => {
                print_usage(&exe);
                return Ok(None);
            }
            "--scenario" => cli.scenario = Some(PathBuf::from(value("--scenario")?)),
            "--out" => cli.out = PathBuf::from(value("--out")?),
            "--horizon" => cli.horizon = Some(parse_positive(&value("--horizon")?, "--horizon")?),
            "--quantum" => cli.quantum = Some(parse_positive(&value("--quantum")?, "--quantum")?),
            other if other.starts_with('-') => {
                print_usage(&exe);
                return Err(format!("unknown option: {}", other));
            }
            name => {
                if cli.policy.is_some() {
                    return Err(format!("unexpected argument: {}", name));
                }
                let policy: PolicyConfig = name.parse().map_err(|e| format!("{}", e))?;
                cli.policy = Some(policy);
            }
        }
    }

    Ok(Some(cli))
}

fn parse_positive(s: &str, flag: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err(format!("{} must be >= 1", flag)),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("invalid {} value: {}", flag, s)),
    }
}

/// Merge the scenario file (or the demo set) with command-line overrides
fn build_scenario(cli: &CliArgs) -> Result<ScenarioConfig, String> {
    let mut scenario = match &cli.scenario {
        Some(path) => ScenarioConfig::from_json_file(path).map_err(|e| e.to_string())?,
        None => ScenarioConfig {
            sim: SimConfig::default(),
            policy: PolicyConfig::Edf,
            tasks: demo_tasks(),
        },
    };

    if let Some(policy) = &cli.policy {
        scenario.policy = policy.clone();
    }
    if let Some(horizon) = cli.horizon {
        scenario.sim.horizon = horizon;
    }
    if let Some(quantum) = cli.quantum {
        scenario.sim.rr_quantum = quantum;
        if let PolicyConfig::RoundRobin { quantum: q } = &mut scenario.policy {
            *q = Some(quantum);
        }
    }

    Ok(scenario)
}

fn print_task_statistics(stats: &[TaskStatistics]) {
    println!(
        "{:>5} {:>8} {:>8} {:>6} {:>8} {:>8} {:>8} {:>6} {:>6} {:>7}",
        "task", "released", "finished", "missed", "min_rt", "max_rt", "mean_rt", "jitter", "slack", "preempt"
    );
    let show = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
    for s in stats {
        println!(
            "{:>5} {:>8} {:>8} {:>6} {:>8} {:>8} {:>8} {:>6} {:>6} {:>7}",
            s.task_id,
            s.released,
            s.finished,
            s.missed,
            show(s.min_response.map(|v| v.to_string())),
            show(s.max_response.map(|v| v.to_string())),
            show(s.mean_response.map(|v| format!("{:.2}", v))),
            show(s.jitter.map(|v| v.to_string())),
            show(s.worst_slack.map(|v| v.to_string())),
            s.preemptions
        );
    }
}

fn main() -> ExitCode {
    let cli = match parse_args() {
        Ok(Some(cli)) => cli,
        Ok(None) => return ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("error: {}", msg);
            return ExitCode::from(2);
        }
    };

    let scenario = match build_scenario(&cli) {
        Ok(scenario) => scenario,
        Err(msg) => {
            eprintln!("error: {}", msg);
            return ExitCode::from(2);
        }
    };

    let check = rm_bound_check(&scenario.tasks);
    println!(
        "Policy: {} | horizon: {} | tasks: {} | U = {:.3} (RM bound {:.3})",
        scenario.policy,
        scenario.sim.horizon,
        scenario.tasks.len(),
        check.utilization,
        check.bound
    );

    let result = match scenario.run() {
        Ok(result) => result,
        Err(e) => {
            eprintln!("simulation failed: {}", e);
            return ExitCode::from(1);
        }
    };

    if let Err(e) = validate_result(&scenario.tasks, &scenario.effective_sim_config(), &result) {
        eprintln!("{}", e);
        return ExitCode::from(1);
    }

    let stats = task_statistics(&result.jobs);
    let report = match RunReport::new(&scenario, result) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    match export_run(&cli.out, &report) {
        Ok(paths) => {
            println!("{}", report.summary);
            print_task_statistics(&stats);
            println!(
                "Wrote {}, {}, {}",
                paths.timeline.display(),
                paths.jobs.display(),
                paths.report.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("export failed: {}", e);
            ExitCode::from(1)
        }
    }
}

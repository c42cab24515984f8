use serde::Deserialize;
use std::{env, fs, path::PathBuf, process::Command};

#[derive(Debug, Deserialize)]
struct Solution {
    nest: Vec<f64>,
    fitness: f64,
}

#[derive(Debug, Deserialize)]
struct Report {
    init_fitness: f64,
    n_evals: usize,
    n_abandoned: usize,
    best: Option<Solution>,
}

#[derive(Debug, Deserialize)]
struct Stats {
    mean: f64,
    min: f64,
    max: f64,
}

#[derive(Debug, Deserialize)]
struct TrialsReport {
    n_runs: usize,
    best_fitness: Stats,
    best: Option<Solution>,
}

fn run_bin(args: &[&str]) -> (bool, String, String) {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_cuckoo"));

    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("failed to execute command");

    let stdout_str = String::from_utf8(output.stdout).expect("failed to convert stdout to string");
    let stderr_str = String::from_utf8(output.stderr).expect("failed to convert stderr to string");

    (output.status.success(), stdout_str, stderr_str)
}

fn run_bin_ok(args: &[&str]) -> String {
    let (success, stdout_str, stderr_str) = run_bin(args);
    assert!(
        success,
        "failed to run binary with {args:?}\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
    );
    stdout_str
}

fn test_dir(name: &str) -> PathBuf {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(name);
    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir_all(&test_dir).expect("failed to create test directory");
    test_dir
}

#[test]
fn basic_workflow() {
    let test_dir = test_dir("basic_workflow");

    let config_path = test_dir.join("config.toml");
    let config_contents = String::new()
        + "seed = 42\n"
        + "\n"
        + "[search]\n"
        + "n_nests = 10\n"
        + "n_dims = 3\n"
        + "n_iters = 50\n"
        + "prob_abandon = 0.2\n"
        + "\n"
        + "[domain]\n"
        + "lower = -5.0\n"
        + "upper = 5.0\n"
        + "\n"
        + "[levy]\n"
        + "beta = 1.5\n"
        + "step_scale = 1.0\n";

    fs::write(&config_path, config_contents).expect("failed to write config file");

    let config_str = config_path
        .to_str()
        .expect("failed to convert config path to string");

    let stdout_str = run_bin_ok(&["--config", config_str, "run", "--objective", "sphere"]);
    let report: Report = toml::from_str(&stdout_str).expect("failed to parse report");

    assert_eq!(report.n_evals, 10 + 50 * 10 * (1 + 2));
    assert_eq!(report.n_abandoned, 50 * 10 * 2);
    let best = report.best.expect("missing best solution");
    assert_eq!(best.nest.len(), 3);
    assert!(best.nest.iter().all(|&x| (-5.0..=5.0).contains(&x)));
    assert!(best.fitness < report.init_fitness);

    let stdout_again = run_bin_ok(&["--config", config_str, "run", "--objective", "sphere"]);
    assert_eq!(stdout_str, stdout_again);

    let stdout_str = run_bin_ok(&[
        "--config",
        config_str,
        "repeat",
        "--objective",
        "rastrigin",
        "--n-runs",
        "3",
    ]);
    let report: TrialsReport = toml::from_str(&stdout_str).expect("failed to parse report");
    assert_eq!(report.n_runs, 3);
    assert!(report.best_fitness.min <= report.best_fitness.mean);
    assert!(report.best_fitness.mean <= report.best_fitness.max);
    let best = report.best.expect("missing best solution");
    assert_eq!(best.fitness, report.best_fitness.min);

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn default_config_with_seed() {
    let stdout_str = run_bin_ok(&["--seed", "7", "run", "--objective", "ackley"]);
    let report: Report = toml::from_str(&stdout_str).expect("failed to parse report");

    assert_eq!(report.n_abandoned, 100 * 50 * 12);
    let best = report.best.expect("missing best solution");
    assert_eq!(best.nest.len(), 2);
}

#[test]
fn invalid_config_fails() {
    let test_dir = test_dir("invalid_config_fails");

    let config_path = test_dir.join("config.toml");
    fs::write(&config_path, "[search]\nprob_abandon = 1.5\n").expect("failed to write config file");

    let config_str = config_path
        .to_str()
        .expect("failed to convert config path to string");

    let (success, _, stderr_str) = run_bin(&["--config", config_str, "run"]);
    assert!(!success);
    assert!(stderr_str.contains("invalid abandonment probability"));

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn zero_iterations_report_no_solution() {
    let test_dir = test_dir("zero_iterations_report_no_solution");

    let config_path = test_dir.join("config.toml");
    fs::write(&config_path, "seed = 1\n[search]\nn_iters = 0\n").expect("failed to write config file");

    let config_str = config_path
        .to_str()
        .expect("failed to convert config path to string");

    let stdout_str = run_bin_ok(&["--config", config_str, "run"]);
    let report: Report = toml::from_str(&stdout_str).expect("failed to parse report");
    assert!(report.best.is_none());
    assert_eq!(report.n_evals, 50);

    fs::remove_dir_all(&test_dir).ok();
}

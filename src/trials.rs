//! Repeated independent searches.

use crate::analysis::Obs;
use crate::config::Config;
use crate::engine::optimize_with;
use crate::model::Solution;
use crate::objective::Objective;
use crate::stats::{Accumulator, AccumulatorReport};
use anyhow::{Context, Result, bail};
use serde::Serialize;
use std::time::Instant;

/// Summary of repeated searches on the same objective.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialsReport {
    /// Number of runs performed.
    pub n_runs: usize,
    /// Statistics of the best fitness of each run.
    pub best_fitness: AccumulatorReport,
    /// Statistics of the wall-clock time of each run (milliseconds).
    pub time_ms: AccumulatorReport,
    /// Best solution over all runs.
    pub best: Option<Solution>,
}

/// Run `n_runs` independent searches.
///
/// With a base seed `s`, run `k` is seeded with `s + k` so the whole
/// set of runs is reproducible.
pub fn run_trials<F>(
    cfg: &Config,
    objective: F,
    n_runs: usize,
    obs: &mut dyn Obs,
) -> Result<TrialsReport>
where
    F: Objective + Clone,
{
    if n_runs == 0 {
        bail!("number of runs must be at least 1");
    }

    let mut fitness_acc = Accumulator::new();
    let mut time_acc = Accumulator::new();
    let mut best: Option<Solution> = None;

    for i_run in 0..n_runs {
        let mut run_cfg = cfg.clone();
        run_cfg.seed = cfg.seed.map(|seed| seed.wrapping_add(i_run as u64));

        let start = Instant::now();
        let report = optimize_with(objective.clone(), &run_cfg, obs)
            .with_context(|| format!("failed to perform run {i_run}"))?;
        let time_ms = start.elapsed().as_secs_f64() * 1e3;

        fitness_acc.add(report.best_fitness());
        time_acc.add(time_ms);
        log::info!(
            "run {}/{n_runs}: best fitness {:e} ({time_ms:.3} ms)",
            i_run + 1,
            report.best_fitness()
        );

        if let Some(sol) = report.best {
            let best_fitness = best.as_ref().map_or(f64::INFINITY, |sol| sol.fitness);
            if sol.fitness < best_fitness {
                best = Some(sol);
            }
        }
    }

    Ok(TrialsReport {
        n_runs,
        best_fitness: fitness_acc.report(),
        time_ms: time_acc.report(),
        best,
    })
}

use crate::model::Solution;
use anyhow::Result;

/// Snapshot of the search emitted after every inner step.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// Current iteration (starting at 1).
    pub i_iter: usize,
    /// Total number of iterations.
    pub n_iters: usize,
    /// Index of the nest just processed.
    pub i_nest: usize,
    /// Total number of nests.
    pub n_nests: usize,
    /// Best solution found so far.
    pub best: Option<&'a Solution>,
}

impl Progress<'_> {
    /// Fitness of the best solution, or infinity if there is none yet.
    pub fn best_fitness(&self) -> f64 {
        self.best.map_or(f64::INFINITY, |sol| sol.fitness)
    }
}

pub trait Obs {
    fn update(&mut self, progress: &Progress) -> Result<()>;
}

/// Writes the progress of the search to the logger.
pub struct ProgressLog;

impl Obs for ProgressLog {
    fn update(&mut self, progress: &Progress) -> Result<()> {
        log::debug!("{}", progress_line(progress));

        if progress.i_nest + 1 == progress.n_nests {
            let percent = 100.0 * progress.i_iter as f64 / progress.n_iters as f64;
            log::info!(
                "completed {percent:06.2}% (best fitness: {:e})",
                progress.best_fitness()
            );
        }
        Ok(())
    }
}

fn progress_line(progress: &Progress) -> String {
    let best_nest = match progress.best {
        Some(sol) => format!("{:?}", sol.nest),
        None => "none".to_string(),
    };
    format!(
        "iteration {}/{}, best fitness: {:e}, best solution: {best_nest}",
        progress.i_iter,
        progress.n_iters,
        progress.best_fitness(),
    )
}

/// Records the best fitness after every inner step.
pub struct BestTrace {
    vals: Vec<f64>,
}

impl BestTrace {
    pub fn new() -> Self {
        Self { vals: Vec::new() }
    }

    pub fn vals(&self) -> &[f64] {
        &self.vals
    }
}

impl Obs for BestTrace {
    fn update(&mut self, progress: &Progress) -> Result<()> {
        self.vals.push(progress.best_fitness());
        Ok(())
    }
}

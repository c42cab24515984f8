use crate::analysis::{Obs, Progress, ProgressLog};
use crate::config::Config;
use crate::levy::LevyFlight;
use crate::model::{Solution, sample_nests};
use crate::objective::Objective;
use anyhow::{Context, Result};
use rand::{prelude::*, seq::index};
use rand_chacha::ChaCha12Rng;
use rand_distr::Uniform;
use serde::Serialize;

/// Outcome of a search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Best fitness of the initial population.
    pub init_fitness: f64,
    /// Number of objective evaluations.
    pub n_evals: usize,
    /// Number of nests replaced by abandonment.
    pub n_abandoned: usize,
    /// Best solution found (none if no iteration was performed).
    pub best: Option<Solution>,
}

impl Report {
    /// Fitness of the best solution, or infinity if there is none.
    pub fn best_fitness(&self) -> f64 {
        self.best.as_ref().map_or(f64::INFINITY, |sol| sol.fitness)
    }
}

/// Search engine.
///
/// Holds the configuration, objective, population and random number generator,
/// and provides methods to run the search one iteration at a time or to completion.
pub struct Engine<F> {
    cfg: Config,
    objective: F,
    rng: ChaCha12Rng,

    levy_dist: LevyFlight,
    dir_dist: Uniform<f64>,
    n_abandon: usize,

    nests: Vec<Vec<f64>>,
    fitness: Vec<f64>,
    best: Option<Solution>,

    init_fitness: f64,
    i_iter: usize,
    n_evals: usize,
    n_abandoned: usize,
}

impl<F: Objective> Engine<F> {
    /// Create a new `Engine` with the given configuration and a random initial population.
    pub fn new(cfg: Config, mut objective: F) -> Result<Self> {
        cfg.validate().context("invalid config")?;

        let mut rng = match cfg.seed {
            Some(seed) => ChaCha12Rng::seed_from_u64(seed),
            None => ChaCha12Rng::try_from_os_rng().context("failed to seed rng")?,
        };

        let levy_dist = LevyFlight::new(cfg.levy.beta)?;
        let dir_dist = Uniform::new(-1.0, 1.0)?;
        let n_abandon = (cfg.search.prob_abandon * cfg.search.n_nests as f64).floor() as usize;

        let nests = sample_nests(
            cfg.search.n_nests,
            cfg.search.n_dims,
            cfg.domain.lower,
            cfg.domain.upper,
            &mut rng,
        )
        .context("failed to sample initial nests")?;

        let mut fitness = Vec::with_capacity(nests.len());
        for nest in &nests {
            fitness.push(evaluate(&mut objective, nest)?);
        }
        let init_fitness = fitness.iter().copied().fold(f64::INFINITY, f64::min);
        log::info!(
            "initialized {} nests (best fitness: {init_fitness:e})",
            nests.len()
        );

        Ok(Self {
            n_evals: nests.len(),
            cfg,
            objective,
            rng,
            levy_dist,
            dir_dist,
            n_abandon,
            nests,
            fitness,
            best: None,
            init_fitness,
            i_iter: 0,
            n_abandoned: 0,
        })
    }

    /// Perform the remaining iterations and return the report.
    pub fn run(&mut self, obs: &mut dyn Obs) -> Result<Report> {
        while self.i_iter < self.cfg.search.n_iters {
            self.perform_iteration(obs)
                .with_context(|| format!("failed to perform iteration {}", self.i_iter + 1))?;
        }

        match &self.best {
            Some(sol) => log::info!(
                "best solution: {:?}, best fitness: {:e}",
                sol.nest,
                sol.fitness
            ),
            None => log::warn!("no iteration performed, no solution found"),
        }

        Ok(self.report())
    }

    /// Perform one iteration, visiting every nest in order.
    ///
    /// `obs` is updated after every nest.
    pub fn perform_iteration(&mut self, obs: &mut dyn Obs) -> Result<()> {
        self.i_iter += 1;

        let n_nests = self.nests.len();
        for i_nest in 0..n_nests {
            self.perform_step(i_nest)
                .with_context(|| format!("failed to perform step on nest {i_nest}"))?;

            let progress = Progress {
                i_iter: self.i_iter,
                n_iters: self.cfg.search.n_iters,
                i_nest,
                n_nests,
                best: self.best.as_ref(),
            };
            obs.update(&progress).context("failed to update observer")?;
        }

        Ok(())
    }

    /// Get the current nests.
    pub fn nests(&self) -> &[Vec<f64>] {
        &self.nests
    }

    /// Get the fitness of the current nests.
    pub fn fitness(&self) -> &[f64] {
        &self.fitness
    }

    /// Get the best solution found so far.
    pub fn best(&self) -> Option<&Solution> {
        self.best.as_ref()
    }

    /// Summarize the search so far.
    pub fn report(&self) -> Report {
        Report {
            init_fitness: self.init_fitness,
            n_evals: self.n_evals,
            n_abandoned: self.n_abandoned,
            best: self.best.clone(),
        }
    }

    fn perform_step(&mut self, i_nest: usize) -> Result<()> {
        // Move the nest with a Lévy flight.
        let new_nest = self.perturb_nest(i_nest);

        // Keep the new nest only if it is strictly better.
        let new_fitness = evaluate(&mut self.objective, &new_nest)?;
        self.n_evals += 1;
        if new_fitness < self.fitness[i_nest] {
            self.nests[i_nest] = new_nest;
            self.fitness[i_nest] = new_fitness;
        }

        self.update_best();

        // Abandoned slots are not protected, even if they were just improved.
        self.abandon_nests().context("failed to abandon nests")?;

        Ok(())
    }

    fn perturb_nest(&mut self, i_nest: usize) -> Vec<f64> {
        let step = self.cfg.levy.step_scale * self.levy_dist.sample(&mut self.rng);
        let lower = self.cfg.domain.lower;
        let upper = self.cfg.domain.upper;

        self.nests[i_nest]
            .iter()
            .map(|&ele| {
                let dir = self.dir_dist.sample(&mut self.rng);
                step_coord(ele, step, dir, lower, upper)
            })
            .collect()
    }

    fn update_best(&mut self) {
        let Some((i_min, &fitness_min)) = self
            .fitness
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
        else {
            return;
        };

        let best_fitness = self.best.as_ref().map_or(f64::INFINITY, |sol| sol.fitness);
        if fitness_min < best_fitness {
            self.best = Some(Solution {
                nest: self.nests[i_min].clone(),
                fitness: fitness_min,
            });
        }
    }

    fn abandon_nests(&mut self) -> Result<()> {
        if self.n_abandon == 0 {
            return Ok(());
        }

        let i_nest_vec = index::sample(&mut self.rng, self.nests.len(), self.n_abandon);
        let new_nests = sample_nests(
            self.n_abandon,
            self.cfg.search.n_dims,
            self.cfg.domain.lower,
            self.cfg.domain.upper,
            &mut self.rng,
        )?;

        for (i_nest, new_nest) in i_nest_vec.into_iter().zip(new_nests) {
            self.fitness[i_nest] = evaluate(&mut self.objective, &new_nest)?;
            self.nests[i_nest] = new_nest;
            self.n_evals += 1;
            self.n_abandoned += 1;
        }

        Ok(())
    }
}

fn step_coord(ele: f64, step: f64, dir: f64, lower: f64, upper: f64) -> f64 {
    let new_ele = ele + step * dir;
    // NaN (infinite step times zero direction) keeps the old coordinate.
    if new_ele.is_nan() {
        ele
    } else {
        new_ele.clamp(lower, upper)
    }
}

fn evaluate<F: Objective>(objective: &mut F, nest: &[f64]) -> Result<f64> {
    let fitness = objective
        .evaluate(nest)
        .context("failed to evaluate objective")?;
    // Store NaN as the worst value so that it never wins a comparison.
    Ok(if fitness.is_nan() {
        f64::INFINITY
    } else {
        fitness
    })
}

/// Minimize `objective`, logging the progress of the search.
pub fn optimize<F: Objective>(objective: F, cfg: &Config) -> Result<Report> {
    optimize_with(objective, cfg, &mut ProgressLog)
}

/// Minimize `objective`, reporting the progress of the search to `obs`.
pub fn optimize_with<F: Objective>(
    objective: F,
    cfg: &Config,
    obs: &mut dyn Obs,
) -> Result<Report> {
    let mut engine = Engine::new(cfg.clone(), objective).context("failed to construct engine")?;
    engine.run(obs)
}

//! Search data types.

use anyhow::{Context, Result};
use rand::prelude::*;
use rand_distr::Uniform;
use serde::Serialize;

/// Best nest found by a search, together with its fitness.
///
/// Always an owned copy, later changes to the population never alter it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    /// Coordinates of the nest.
    pub nest: Vec<f64>,

    /// Objective value at `nest`.
    pub fitness: f64,
}

/// Sample `n_nests` nests of `n_dims` coordinates uniformly within `[lower, upper)`.
///
/// Zero nests or zero dimensions produce an empty population.
pub fn sample_nests<R: Rng + ?Sized>(
    n_nests: usize,
    n_dims: usize,
    lower: f64,
    upper: f64,
    rng: &mut R,
) -> Result<Vec<Vec<f64>>> {
    let coord_dist = Uniform::new(lower, upper)
        .with_context(|| format!("failed to create uniform distribution on [{lower}, {upper})"))?;

    let mut nests = Vec::with_capacity(n_nests);
    for _ in 0..n_nests {
        nests.push((0..n_dims).map(|_| coord_dist.sample(rng)).collect());
    }

    Ok(nests)
}

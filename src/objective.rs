//! Objective functions.

use anyhow::Result;
use clap::ValueEnum;
use std::f64::consts::{E, PI};

/// Function to be minimized.
///
/// Implemented for every closure `FnMut(&[f64]) -> f64`. Implement it directly
/// for objectives that can fail; their errors are returned by the search as is.
pub trait Objective {
    fn evaluate(&mut self, nest: &[f64]) -> Result<f64>;
}

impl<F> Objective for F
where
    F: FnMut(&[f64]) -> f64,
{
    fn evaluate(&mut self, nest: &[f64]) -> Result<f64> {
        Ok(self(nest))
    }
}

/// Built-in test functions, all with global minimum 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Benchmark {
    Sphere,
    Rastrigin,
    Rosenbrock,
    Ackley,
}

impl Benchmark {
    /// Get the function implementing the benchmark.
    pub fn function(self) -> fn(&[f64]) -> f64 {
        match self {
            Benchmark::Sphere => sphere,
            Benchmark::Rastrigin => rastrigin,
            Benchmark::Rosenbrock => rosenbrock,
            Benchmark::Ackley => ackley,
        }
    }
}

/// Sum of squares, minimum at the origin.
pub fn sphere(x: &[f64]) -> f64 {
    x.iter().map(|&xi| xi * xi).sum()
}

/// Rastrigin function, highly multimodal, minimum at the origin.
pub fn rastrigin(x: &[f64]) -> f64 {
    10.0 * x.len() as f64
        + x.iter()
            .map(|&xi| xi * xi - 10.0 * (2.0 * PI * xi).cos())
            .sum::<f64>()
}

/// Rosenbrock valley, minimum at `(1, ..., 1)`.
pub fn rosenbrock(x: &[f64]) -> f64 {
    x.windows(2)
        .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
        .sum()
}

/// Ackley function, minimum at the origin.
pub fn ackley(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    let n = x.len() as f64;
    let sum_sq: f64 = x.iter().map(|&xi| xi * xi).sum();
    let sum_cos: f64 = x.iter().map(|&xi| (2.0 * PI * xi).cos()).sum();

    -20.0 * (-0.2 * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + 20.0 + E
}

//! Minimization of real-valued functions with Cuckoo Search.
//!
//! A population of nests is moved with Lévy flights, improved nests replace
//! their predecessors, and a fraction of the nests is abandoned and resampled
//! after every step. See [`optimize`] for the entry point.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod levy;
pub mod model;
pub mod objective;
pub mod stats;
pub mod trials;

pub use config::Config;
pub use engine::{Engine, Report, optimize, optimize_with};
pub use model::Solution;
pub use objective::{Benchmark, Objective};

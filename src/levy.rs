//! Lévy flight step lengths drawn with Mantegna's algorithm.

use anyhow::{Context, Result, bail};
use rand::prelude::*;
use rand_distr::{Normal, StandardNormal};
use std::f64::consts::PI;

/// Heavy-tailed step length distribution.
///
/// Most samples are small, but occasionally a very long step is drawn,
/// which lets the search alternate between local refinement and exploration.
/// The scale of the numerator is computed once on construction.
#[derive(Debug, Clone, Copy)]
pub struct LevyFlight {
    beta: f64,
    u_dist: Normal<f64>,
}

impl LevyFlight {
    /// Create a new distribution with stability index `beta` (must be in `(0, 2]`).
    pub fn new(beta: f64) -> Result<Self> {
        if !(beta > 0.0 && beta <= 2.0) {
            bail!("stability index must be in the range (0, 2], but is {beta}");
        }
        let sigma = levy_sigma(beta);
        let u_dist = Normal::new(0.0, sigma)
            .with_context(|| format!("failed to create normal distribution (sigma = {sigma})"))?;
        Ok(Self { beta, u_dist })
    }

    /// Get the stability index of the distribution.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Get the standard deviation of the numerator.
    pub fn sigma(&self) -> f64 {
        self.u_dist.std_dev()
    }
}

impl Distribution<f64> for LevyFlight {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u = self.u_dist.sample(rng);
        let v: f64 = rng.sample(StandardNormal);
        // No clamping: v close to 0 yields an extreme step.
        u / v.abs().powf(1.0 / self.beta)
    }
}

/// Draw a single Lévy step length.
pub fn levy_step<R: Rng + ?Sized>(beta: f64, rng: &mut R) -> Result<f64> {
    let dist = LevyFlight::new(beta)?;
    Ok(dist.sample(rng))
}

/// Standard deviation of the numerator in Mantegna's algorithm.
pub fn levy_sigma(beta: f64) -> f64 {
    let num = gamma(1.0 + beta) * (PI * beta / 2.0).sin();
    let den = gamma((1.0 + beta) / 2.0) * beta * 2.0_f64.powf((beta - 1.0) / 2.0);
    (num / den).powf(1.0 / beta)
}

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Gamma function (Lanczos approximation).
pub fn gamma(z: f64) -> f64 {
    if z < 0.5 {
        // Reflection formula: Γ(z) = π / (sin(πz) * Γ(1-z))
        PI / ((PI * z).sin() * gamma(1.0 - z))
    } else {
        let z = z - 1.0;
        let mut ser = LANCZOS_COEFS[0];
        for (i, &coef) in LANCZOS_COEFS.iter().enumerate().skip(1) {
            ser += coef / (z + i as f64);
        }
        let t = z + LANCZOS_G + 0.5;
        (2.0 * PI).sqrt() * t.powf(z + 0.5) * (-t).exp() * ser
    }
}

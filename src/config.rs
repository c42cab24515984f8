use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    fs,
    ops::{Bound, RangeBounds},
    path::Path,
};

/// Search configuration parameters.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed of the random number generator (drawn from the OS if absent).
    pub seed: Option<u64>,

    /// Population and iteration parameters.
    pub search: SearchConfig,
    /// Box bounds of the search domain.
    pub domain: DomainConfig,
    /// Lévy flight parameters.
    pub levy: LevyConfig,
}

/// Population and iteration parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of nests.
    pub n_nests: usize,
    /// Number of dimensions of each nest.
    pub n_dims: usize,
    /// Number of iterations.
    pub n_iters: usize,
    /// Fraction of nests abandoned after every step.
    pub prob_abandon: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            n_nests: 50,
            n_dims: 2,
            n_iters: 100,
            prob_abandon: 0.25,
        }
    }
}

/// Box bounds shared by every coordinate.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainConfig {
    pub lower: f64,
    pub upper: f64,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            lower: -5.0,
            upper: 5.0,
        }
    }
}

/// Lévy flight parameters.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevyConfig {
    /// Stability index of the step distribution.
    pub beta: f64,
    /// Scale factor applied to every step.
    pub step_scale: f64,
}

impl Default for LevyConfig {
    fn default() -> Self {
        Self {
            beta: 1.5,
            step_scale: 1.0,
        }
    }
}

impl Config {
    /// Load a [`Config`] from a file.
    ///
    /// The file must be TOML-encoded. Missing fields take their default value.
    /// Performs validation on all parameters before returning.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    /// Check that every parameter is within its valid range.
    pub fn validate(&self) -> Result<()> {
        let search = &self.search;
        check_num(search.n_nests, 1..100_000).context("invalid number of nests")?;
        check_num(search.n_dims, 1..10_000).context("invalid number of dimensions")?;
        check_num(search.prob_abandon, 0.0..=1.0).context("invalid abandonment probability")?;

        let domain = &self.domain;
        if !domain.lower.is_finite() || !domain.upper.is_finite() {
            bail!(
                "domain bounds must be finite, but are [{}, {}]",
                domain.lower,
                domain.upper
            );
        }
        if !(domain.upper - domain.lower).is_finite() {
            bail!(
                "domain width must be finite, but [{}, {}] overflows",
                domain.lower,
                domain.upper
            );
        }
        if domain.lower >= domain.upper {
            bail!(
                "lower bound must be less than upper bound, but {} >= {}",
                domain.lower,
                domain.upper
            );
        }

        let levy = &self.levy;
        check_num(levy.beta, (Bound::Excluded(0.0), Bound::Included(2.0)))
            .context("invalid Lévy stability index")?;
        check_num(levy.step_scale, (Bound::Excluded(0.0), Bound::Excluded(f64::INFINITY)))
            .context("invalid step scale")?;

        Ok(())
    }
}

fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert_eq!(cfg.search.n_nests, 50);
        assert_eq!(cfg.search.n_dims, 2);
        assert_eq!(cfg.search.n_iters, 100);
        assert_eq!(cfg.search.prob_abandon, 0.25);
        assert_eq!(cfg.domain.lower, -5.0);
        assert_eq!(cfg.domain.upper, 5.0);
        assert_eq!(cfg.levy.beta, 1.5);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: Config = toml::from_str(
            "seed = 7\n\
             [search]\n\
             n_nests = 10\n",
        )
        .expect("failed to parse config");
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.search.n_nests, 10);
        assert_eq!(cfg.search.n_dims, 2);
        assert_eq!(cfg.levy, LevyConfig::default());
    }

    #[test]
    fn rejects_invalid_values() {
        let mut cfg = Config::default();
        cfg.search.n_nests = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.search.n_dims = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.search.prob_abandon = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.search.prob_abandon = f64::NAN;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.domain.lower = 5.0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.domain.lower = -1e308;
        cfg.domain.upper = 1e308;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.levy.beta = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.levy.step_scale = -1.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn from_file_rejects_overflowing_domain() {
        let file = std::env::temp_dir().join("cuckoo_overflowing_domain.toml");
        fs::write(&file, "[domain]\nlower = -1e308\nupper = 1e308\n")
            .expect("failed to write config file");

        let err = Config::from_file(&file).unwrap_err();
        assert!(format!("{err:#}").contains("domain width must be finite"));

        fs::remove_file(&file).ok();
    }

    #[test]
    fn accepts_boundary_values() {
        let mut cfg = Config::default();
        cfg.search.n_iters = 0;
        cfg.search.prob_abandon = 0.0;
        cfg.levy.beta = 2.0;
        assert!(cfg.validate().is_ok());

        cfg.search.prob_abandon = 1.0;
        assert!(cfg.validate().is_ok());
    }
}

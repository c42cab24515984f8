use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cuckoo::{Benchmark, Config, analysis::ProgressLog, engine::optimize, trials::run_trials};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// TOML configuration file (defaults are used if absent).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed of the random number generator (overrides the configuration).
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Minimize a benchmark function once.
    Run {
        #[arg(long, value_enum, default_value_t = Benchmark::Sphere)]
        objective: Benchmark,
    },

    /// Minimize a benchmark function several times and summarize the results.
    Repeat {
        #[arg(long, value_enum, default_value_t = Benchmark::Sphere)]
        objective: Benchmark,

        #[arg(long, default_value_t = 10)]
        n_runs: usize,
    },
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mut cfg = match &args.config {
        Some(file) => Config::from_file(file).context("failed to construct cfg")?,
        None => Config::default(),
    };
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    log::info!("{cfg:#?}");

    match args.command {
        Command::Run { objective } => {
            let report = optimize(objective.function(), &cfg).context("failed to optimize")?;
            print_toml(&report)?;
        }
        Command::Repeat { objective, n_runs } => {
            let report = run_trials(&cfg, objective.function(), n_runs, &mut ProgressLog)
                .context("failed to run trials")?;
            print_toml(&report)?;
        }
    }

    Ok(())
}

fn print_toml<T: Serialize>(report: &T) -> Result<()> {
    let report = toml::to_string(report).context("failed to serialize report")?;
    print!("{report}");
    Ok(())
}

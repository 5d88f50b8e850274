//! Review Economy - Entry Point
//!
//! Runs a peer review economy for a fixed number of days, prints a summary
//! and writes the full snapshot series as JSON.

use std::path::PathBuf;

use clap::Parser;
use review_economy::core::config::{CapPolicy, EconomyConfig};
use review_economy::core::error::Result;
use review_economy::economy::simulate;

/// Token-based peer review simulation
#[derive(Parser, Debug)]
#[command(name = "review_economy")]
#[command(about = "Simulate a peer review economy where reviews earn submission tokens")]
struct Args {
    /// TOML configuration file (missing keys take their defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Days to simulate
    #[arg(long)]
    days: Option<u32>,

    /// Random seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Number of researchers
    #[arg(long)]
    population: Option<usize>,

    /// Tokens every researcher starts with
    #[arg(long)]
    initial_tokens: Option<u32>,

    /// Daily chance that a researcher writes a paper
    #[arg(long)]
    submission_prob: Option<f64>,

    /// Acceptance probability of Lazy researchers
    #[arg(long)]
    accept_lazy: Option<f64>,

    /// Acceptance probability of Eager researchers
    #[arg(long)]
    accept_eager: Option<f64>,

    /// Invite rounds per missing reviewer per day
    #[arg(long)]
    invite_rounds: Option<u32>,

    /// Days before submissions start costing tokens
    #[arg(long)]
    grace_days: Option<u32>,

    /// Never require tokens to submit
    #[arg(long)]
    no_tokens: bool,

    /// Same yearly review cap for everyone (0 for none)
    #[arg(long)]
    flat_cap: Option<u32>,

    /// Refuse invitations to review one's own paper
    #[arg(long)]
    no_self_review: bool,

    /// Where to write the JSON output
    #[arg(long, default_value = "review_economy_output.json")]
    output: PathBuf,
}

impl Args {
    fn into_config(self) -> Result<(EconomyConfig, PathBuf)> {
        let mut config = match &self.config {
            Some(path) => EconomyConfig::from_file(path)?,
            None => EconomyConfig::default(),
        };

        if let Some(days) = self.days {
            config.days = days;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(population) = self.population {
            config.population = population;
        }
        if let Some(tokens) = self.initial_tokens {
            config.initial_tokens = tokens;
        }
        if let Some(p) = self.submission_prob {
            config.daily_submission_prob = p;
        }
        if let Some(p) = self.accept_lazy {
            config.accept_prob_lazy = p;
        }
        if let Some(p) = self.accept_eager {
            config.accept_prob_eager = p;
        }
        if let Some(rounds) = self.invite_rounds {
            config.invite_rounds_per_slot = rounds;
        }
        if let Some(days) = self.grace_days {
            config.grace_period_days = days;
        }
        if self.no_tokens {
            config.gating_disabled = true;
        }
        if let Some(cap) = self.flat_cap {
            config.review_cap = if cap == 0 { CapPolicy::Unlimited } else { CapPolicy::Flat(cap) };
        }
        if self.no_self_review {
            config.allow_self_review = false;
        }

        config.validate()?;
        Ok((config, self.output))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let (config, output_path) = Args::parse().into_config()?;

    tracing::info!(
        population = config.population,
        days = config.days,
        seed = config.seed,
        "starting review economy simulation"
    );

    let output = simulate(config)?;

    println!("{}", output.summary());

    std::fs::write(&output_path, output.to_json()?)?;
    tracing::info!(path = %output_path.display(), "output written");

    Ok(())
}

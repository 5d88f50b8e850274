//! Simulation configuration with documented constants
//!
//! The defaults reproduce the calibrated model: a population the size of a
//! large publisher's author base, empirical review turnaround for passive
//! reviewers, and a one-year grace period before tokens are required.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{ConfigError, Result};
use crate::core::types::{Day, Status, YEAR_DAYS};
use crate::economy::distribution::EmpiricalDistribution;

/// Researchers per yearly review cap, used for the default distributed cap policy
const CAP_COUNTS: [(u32, u32); 31] = [
    (10, 8386), (11, 8119), (12, 7852), (13, 7586), (14, 7319), (15, 7052),
    (16, 6786), (17, 6519), (18, 6252), (19, 5986), (20, 5719), (21, 5452),
    (22, 5186), (23, 4919), (24, 4652), (25, 4387), (26, 4119), (27, 3852),
    (28, 3586), (29, 3319), (30, 3052), (31, 2786), (32, 2519), (33, 2252),
    (34, 1986), (35, 1719), (36, 1452), (37, 1186), (38, 919), (39, 652),
    (40, 386),
];

/// Observed turnaround of passive reviewers: cumulative share done by day N
const LAZY_DURATIONS: [(f64, u32); 17] = [
    (0.063, 10), (0.107, 20), (0.145, 30), (0.201, 40), (0.289, 50),
    (0.358, 60), (0.440, 70), (0.503, 80), (0.767, 90), (0.843, 100),
    (0.899, 110), (0.931, 120), (0.950, 130), (0.969, 140), (0.981, 170),
    (0.987, 180), (1.000, 200),
];

/// Turnaround of a reviewer who needs the token
const EAGER_DURATION_DAYS: u32 = 7;

/// Yearly review cap assignment across the population
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapPolicy {
    /// Nobody is capped
    Unlimited,
    /// Everyone shares the same cap
    Flat(u32),
    /// Everyone is capped at the steady-state yearly review demand per author
    Stable,
    /// Caps are spread over the population following the table, by quota
    Distributed(EmpiricalDistribution<u32>),
}

/// Per-status review duration tables (days from acceptance to completion)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewDurations {
    pub lazy: EmpiricalDistribution<u32>,
    pub eager: EmpiricalDistribution<u32>,
}

impl ReviewDurations {
    pub fn for_status(&self, status: Status) -> &EmpiricalDistribution<u32> {
        match status {
            Status::Lazy => &self.lazy,
            Status::Eager => &self.eager,
        }
    }
}

impl Default for ReviewDurations {
    fn default() -> Self {
        Self {
            lazy: EmpiricalDistribution::new(&LAZY_DURATIONS, "lazy review duration")
                .expect("built-in lazy duration table is a valid cumulative partition"),
            eager: EmpiricalDistribution::constant(EAGER_DURATION_DAYS),
        }
    }
}

/// Initialization contract for a review-economy run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    // === POPULATION ===
    /// Number of researchers, created once and kept for the whole run
    pub population: usize,

    /// Token balance every researcher starts with
    pub initial_tokens: u32,

    // === PAPER GENERATION ===
    /// Daily chance that a researcher writes a new paper
    ///
    /// At 0.023 a researcher writes about 8.4 papers a year.
    pub daily_submission_prob: f64,

    /// Chance that a new paper needs 2 reviews (otherwise 3)
    pub prob_two_reviews: f64,

    // === REVIEW INVITATIONS ===
    /// Chance that a Lazy researcher accepts an invitation
    pub accept_prob_lazy: f64,

    /// Chance that an Eager researcher accepts an invitation
    pub accept_prob_eager: f64,

    /// Invite rounds attempted per missing reviewer slot per day
    ///
    /// Each round reaches a candidate with probability 1/7, so more rounds
    /// means faster reviewer recruitment.
    pub invite_rounds_per_slot: u32,

    /// Whether an author may be drawn and accepted as reviewer of their own paper
    pub allow_self_review: bool,

    /// Yearly review cap policy
    pub review_cap: CapPolicy,

    /// Per-status review turnaround tables
    pub review_durations: ReviewDurations,

    // === TOKEN GATING ===
    /// Days at the start of the run during which submitting needs no tokens
    /// and reviewing earns none
    pub grace_period_days: Day,

    /// Turns token gating off for the whole run
    pub gating_disabled: bool,

    // === RUN ===
    /// Seed for the single random stream
    pub seed: u64,

    /// Run length for the batch driver
    pub days: u32,

    /// Days at the start of the run whose activity is kept out of the
    /// rolling averages
    pub stats_warmup_days: Day,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            population: 135_972,
            initial_tokens: 3,
            daily_submission_prob: 0.023,
            prob_two_reviews: 0.73,
            accept_prob_lazy: 0.20,
            accept_prob_eager: 1.00,
            invite_rounds_per_slot: 1,
            allow_self_review: true,
            review_cap: default_cap_policy(),
            review_durations: ReviewDurations::default(),
            grace_period_days: YEAR_DAYS,
            gating_disabled: false,
            seed: 12345,
            days: 2 * YEAR_DAYS,
            stats_warmup_days: 0,
        }
    }
}

fn default_cap_policy() -> CapPolicy {
    let table = EmpiricalDistribution::from_counts(&CAP_COUNTS, "review cap")
        .expect("built-in review cap counts are positive");
    CapPolicy::Distributed(table)
}

impl EconomyConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.population == 0 || self.population > u32::MAX as usize {
            return Err(ConfigError::NonPositivePopulation);
        }
        if self.days == 0 {
            return Err(ConfigError::InvalidRunLength);
        }

        let probabilities = [
            ("daily_submission_prob", self.daily_submission_prob),
            ("prob_two_reviews", self.prob_two_reviews),
            ("accept_prob_lazy", self.accept_prob_lazy),
            ("accept_prob_eager", self.accept_prob_eager),
        ];
        for (name, value) in probabilities {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { name, value });
            }
        }

        self.review_durations.lazy.validate("lazy review duration")?;
        self.review_durations.eager.validate("eager review duration")?;
        if let CapPolicy::Distributed(dist) = &self.review_cap {
            dist.validate("review cap")?;
        }

        Ok(())
    }

    /// Whether submissions cost tokens (and reviews earn them) on `day`
    pub fn gating_active(&self, day: Day) -> bool {
        !self.gating_disabled && day > self.grace_period_days
    }

    pub fn acceptance_probability(&self, status: Status) -> f64 {
        match status {
            Status::Lazy => self.accept_prob_lazy,
            Status::Eager => self.accept_prob_eager,
        }
    }

    /// Reviews per year each author must write for supply to match demand
    pub fn stable_yearly_reviews(&self) -> u32 {
        (f64::from(YEAR_DAYS) * self.daily_submission_prob * (3.0 - self.prob_two_reviews)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EconomyConfig::default();
        assert!(config.validate().is_ok());
        assert!(matches!(config.review_cap, CapPolicy::Distributed(_)));
    }

    #[test]
    fn test_rejects_zero_population() {
        let config = EconomyConfig { population: 0, ..Default::default() };
        assert_eq!(config.validate(), Err(ConfigError::NonPositivePopulation));
    }

    #[test]
    fn test_rejects_probability_out_of_range() {
        let config = EconomyConfig { accept_prob_lazy: 1.5, ..Default::default() };
        match config.validate() {
            Err(ConfigError::ProbabilityOutOfRange { name, value }) => {
                assert_eq!(name, "accept_prob_lazy");
                assert_eq!(value, 1.5);
            }
            other => panic!("unexpected {:?}", other),
        }

        let config = EconomyConfig { daily_submission_prob: -0.01, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_gating_respects_grace_period_and_override() {
        let config = EconomyConfig { grace_period_days: 10, ..Default::default() };
        assert!(!config.gating_active(10));
        assert!(config.gating_active(11));

        let config = EconomyConfig { gating_disabled: true, grace_period_days: 0, ..Default::default() };
        assert!(!config.gating_active(1000));
    }

    #[test]
    fn test_stable_yearly_reviews_matches_demand() {
        let config = EconomyConfig::default();
        // 365 * 0.023 * 2.27 = 19.05
        assert_eq!(config.stable_yearly_reviews(), 19);
    }

    #[test]
    fn test_builtin_tables_build_directly() {
        let lazy = EmpiricalDistribution::new(&LAZY_DURATIONS, "lazy review duration").unwrap();
        assert_eq!(lazy.thresholds().len(), LAZY_DURATIONS.len());
        assert_eq!(lazy.max_value(), 200);
        assert_eq!(lazy.pick(0.0), 10);

        let caps = EmpiricalDistribution::from_counts(&CAP_COUNTS, "review cap").unwrap();
        assert_eq!(caps.thresholds().len(), CAP_COUNTS.len());
        assert_eq!(caps.pick(0.0), 10);
        assert_eq!(caps.max_value(), 40);

        let defaults = ReviewDurations::default();
        assert_eq!(defaults.lazy, lazy);
        assert_eq!(EconomyConfig::default().review_cap, CapPolicy::Distributed(caps));
    }

    #[test]
    fn test_toml_overrides_and_defaults() {
        let content = r#"
            population = 200
            accept_prob_lazy = 0.5
            review_cap = "unlimited"

            [review_durations]
            lazy = [{ cumulative = 0.5, value = 20 }, { cumulative = 1.0, value = 60 }]
            eager = [{ cumulative = 1.0, value = 5 }]
        "#;
        let config = EconomyConfig::from_toml_str(content).unwrap();
        assert_eq!(config.population, 200);
        assert_eq!(config.accept_prob_lazy, 0.5);
        assert_eq!(config.review_cap, CapPolicy::Unlimited);
        assert_eq!(config.review_durations.eager.max_value(), 5);
        assert_eq!(config.initial_tokens, 3);
    }

    #[test]
    fn test_toml_with_broken_distribution_is_rejected() {
        let content = r#"
            [review_durations]
            lazy = [{ cumulative = 0.5, value = 20 }]
            eager = [{ cumulative = 1.0, value = 5 }]
        "#;
        let err = EconomyConfig::from_toml_str(content).unwrap_err();
        assert!(err.to_string().contains("lazy review duration"));
    }
}

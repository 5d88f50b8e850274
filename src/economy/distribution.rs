//! Empirical distributions as ordered cumulative-threshold tables
//!
//! A table is a list of `(cumulative probability, outcome)` pairs. Sampling
//! draws a uniform roll in [0, 1) and returns the first outcome whose
//! cumulative probability is at least the roll. Review durations and
//! per-researcher review caps are both expressed this way.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

const CUMULATIVE_EPSILON: f64 = 1e-9;

/// One step of a cumulative table
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Threshold<T> {
    pub cumulative: f64,
    pub value: T,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmpiricalDistribution<T> {
    thresholds: Vec<Threshold<T>>,
}

impl<T: Copy + Default> EmpiricalDistribution<T> {
    /// Build from `(cumulative, value)` pairs, rejecting anything that is not
    /// a non-decreasing partition of [0, 1] ending at 1.0
    pub fn new(pairs: &[(f64, T)], name: &str) -> Result<Self, ConfigError> {
        let dist = Self {
            thresholds: pairs
                .iter()
                .map(|&(cumulative, value)| Threshold { cumulative, value })
                .collect(),
        };
        dist.validate(name)?;
        Ok(dist)
    }

    /// Single-outcome table
    pub fn constant(value: T) -> Self {
        Self {
            thresholds: vec![Threshold { cumulative: 1.0, value }],
        }
    }

    /// Build from absolute frequencies, normalized in the given order
    pub fn from_counts(counts: &[(T, u32)], name: &str) -> Result<Self, ConfigError> {
        let total: u64 = counts.iter().map(|&(_, c)| u64::from(c)).sum();
        if total == 0 {
            return Err(ConfigError::InvalidDistribution {
                name: name.to_string(),
                reason: "counts sum to zero".to_string(),
            });
        }

        let mut running = 0u64;
        let mut pairs = Vec::with_capacity(counts.len());
        for &(value, count) in counts {
            running += u64::from(count);
            pairs.push((running as f64 / total as f64, value));
        }
        Self::new(&pairs, name)
    }

    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidDistribution {
            name: name.to_string(),
            reason,
        };

        let last = self
            .thresholds
            .last()
            .ok_or_else(|| invalid("table is empty".to_string()))?;

        let mut previous = 0.0;
        for (i, t) in self.thresholds.iter().enumerate() {
            if !t.cumulative.is_finite() || !(0.0..=1.0).contains(&t.cumulative) {
                return Err(invalid(format!(
                    "entry {} has cumulative probability {} outside [0, 1]",
                    i, t.cumulative
                )));
            }
            if t.cumulative < previous {
                return Err(invalid(format!(
                    "entry {} decreases from {} to {}",
                    i, previous, t.cumulative
                )));
            }
            previous = t.cumulative;
        }

        if (last.cumulative - 1.0).abs() > CUMULATIVE_EPSILON {
            return Err(invalid(format!(
                "table ends at {} instead of 1.0",
                last.cumulative
            )));
        }

        Ok(())
    }

    /// Outcome for a given roll in [0, 1]
    pub fn pick(&self, roll: f64) -> T {
        let idx = self.thresholds.partition_point(|t| t.cumulative < roll);
        self.thresholds
            .get(idx)
            .or_else(|| self.thresholds.last())
            .map(|t| t.value)
            .unwrap_or_default()
    }

    /// Draw one outcome, consuming exactly one uniform from `rng`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        let roll: f64 = rng.gen();
        self.pick(roll)
    }

    pub fn thresholds(&self) -> &[Threshold<T>] {
        &self.thresholds
    }
}

impl<T: Copy + Default + Ord> EmpiricalDistribution<T> {
    pub fn max_value(&self) -> T {
        self.thresholds.iter().map(|t| t.value).max().unwrap_or_default()
    }
}

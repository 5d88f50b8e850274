//! Simulation output and serialization

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::config::EconomyConfig;
use crate::core::error::Result;
use crate::core::types::YEAR_DAYS;
use crate::economy::events::DiagnosticLog;
use crate::economy::metrics::{ratio, DailySnapshot};
use crate::economy::world::ReviewWorld;

/// Complete simulation output
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub config: EconomyConfig,
    pub snapshots: Vec<DailySnapshot>,
    pub statistics: SimulationStats,
    pub diagnostics: DiagnosticLog,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationStats {
    pub days_simulated: u32,
    pub simulation_time_ms: u64,
    pub papers_generated: u64,
    pub papers_submitted: u64,
    pub reviews_completed: u64,
    pub invites_sent: u64,
    pub papers_active_at_end: usize,
    pub papers_awaiting_reviewers_at_end: usize,
    pub papers_waiting_for_tokens_at_end: usize,
    pub eager_at_end: usize,
    pub tokens_held_at_end: u64,
    /// Papers written per researcher over the final trailing year
    pub mean_papers_generated_1y: f64,
    /// Reviews accepted per researcher over the final trailing year
    pub mean_reviews_accepted_1y: f64,
    pub anomalies: usize,
}

impl SimulationOutput {
    pub fn new(
        config: EconomyConfig,
        world: ReviewWorld,
        snapshots: Vec<DailySnapshot>,
        elapsed: Duration,
    ) -> Self {
        let total = |f: fn(&DailySnapshot) -> u32| -> u64 {
            snapshots.iter().map(|s| u64::from(f(s))).sum()
        };

        let day = world.day;
        let population = world.researchers.len() as u64;
        let generated_1y: usize = world
            .researchers
            .iter()
            .map(|r| r.papers_generated_since(day, YEAR_DAYS))
            .sum();
        let accepted_1y: usize = world
            .researchers
            .iter()
            .map(|r| r.reviews_accepted_since(day, YEAR_DAYS))
            .sum();

        let statistics = SimulationStats {
            days_simulated: world.day,
            simulation_time_ms: elapsed.as_millis() as u64,
            papers_generated: total(|s| s.counters.papers_generated),
            papers_submitted: total(|s| s.counters.papers_submitted),
            reviews_completed: total(|s| s.counters.reviews_completed),
            invites_sent: total(|s| s.counters.invites_sent),
            papers_active_at_end: world.registry.len(),
            papers_awaiting_reviewers_at_end: world.registry.awaiting_reviewers(),
            papers_waiting_for_tokens_at_end: world
                .researchers
                .iter()
                .map(|r| r.papers_to_submit.len())
                .sum(),
            eager_at_end: world.researchers.iter().filter(|r| r.status.is_eager()).count(),
            tokens_held_at_end: world.total_tokens(),
            mean_papers_generated_1y: ratio(generated_1y as u64, population),
            mean_reviews_accepted_1y: ratio(accepted_1y as u64, population),
            anomalies: world.diagnostics.len(),
        };

        Self {
            config,
            snapshots,
            statistics,
            diagnostics: world.diagnostics,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    pub fn summary(&self) -> String {
        let last = self.snapshots.last();
        format!(
            "Simulated {} days in {}ms\n\
             {} papers written, {} submitted, {} reviews delivered\n\
             {} papers active ({} awaiting reviewers), {} waiting for tokens, {} researchers eager\n\
             per researcher over the last year: {:.2} papers written, {:.2} reviews accepted\n\
             avg review time {:.1} days (1y) / {:.1} days (1m), avg invites per paper {:.2} (1y)\n\
             {} consistency anomalies",
            self.statistics.days_simulated,
            self.statistics.simulation_time_ms,
            self.statistics.papers_generated,
            self.statistics.papers_submitted,
            self.statistics.reviews_completed,
            self.statistics.papers_active_at_end,
            self.statistics.papers_awaiting_reviewers_at_end,
            self.statistics.papers_waiting_for_tokens_at_end,
            self.statistics.eager_at_end,
            self.statistics.mean_papers_generated_1y,
            self.statistics.mean_reviews_accepted_1y,
            last.map_or(0.0, |s| s.avg_review_days_1y),
            last.map_or(0.0, |s| s.avg_review_days_1m),
            last.map_or(0.0, |s| s.avg_invites_per_paper_1y),
            self.statistics.anomalies,
        )
    }
}

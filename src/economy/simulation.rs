//! Main simulation loop

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::EconomyConfig;
use crate::core::error::ConfigError;
use crate::core::types::Day;
use crate::economy::metrics::{DailySnapshot, MetricsAggregator};
use crate::economy::output::SimulationOutput;
use crate::economy::systems;
use crate::economy::world::ReviewWorld;

/// Receiver for the per-day snapshot (display, persistence, ...)
pub trait SnapshotSink {
    fn record(&mut self, snapshot: &DailySnapshot);
}

impl SnapshotSink for Vec<DailySnapshot> {
    fn record(&mut self, snapshot: &DailySnapshot) {
        self.push(snapshot.clone());
    }
}

/// Day-stepped driver owning the configuration and the world
pub struct Simulation {
    config: EconomyConfig,
    world: ReviewWorld,
    latest: Option<DailySnapshot>,
}

impl Simulation {
    /// Validate the configuration and build the initial population
    pub fn new(config: EconomyConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let researchers = systems::generate_researchers(&config);
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let metrics = MetricsAggregator::new(config.stats_warmup_days);
        let world = ReviewWorld::new(researchers, rng, metrics);

        Ok(Self {
            config,
            world,
            latest: None,
        })
    }

    /// Advance one day: every researcher acts, reviewers are matched, metrics
    /// are recomputed
    pub fn step(&mut self) -> &DailySnapshot {
        self.world.day += 1;
        let day = self.world.day;
        self.world.metrics.begin_day(day);

        // 1. Each researcher acts, in population order
        systems::run_researcher_actions(&mut self.world, &self.config);

        // 2. Population-wide reviewer matching
        systems::assign_reviews(&mut self.world, &self.config);

        // 3. Metrics
        let world = &mut self.world;
        let snapshot = world
            .metrics
            .finish_day(day, &world.registry, &world.researchers);

        tracing::debug!(
            day,
            submitted = snapshot.submitted,
            awaiting = snapshot.awaiting_reviewers,
            eager = snapshot.eager_researchers,
            avg_review_days_1y = snapshot.avg_review_days_1y,
            avg_invites_1y = snapshot.avg_invites_per_paper_1y,
            "day complete"
        );

        self.latest.insert(snapshot)
    }

    /// Advance `days` days, handing every snapshot to `sink`
    pub fn run_with_sink<S: SnapshotSink + ?Sized>(&mut self, days: u32, sink: &mut S) {
        for _ in 0..days {
            let snapshot = self.step();
            sink.record(snapshot);
        }
    }

    pub fn day(&self) -> Day {
        self.world.day
    }

    pub fn world(&self) -> &ReviewWorld {
        &self.world
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    /// Snapshot of the most recent day, if any day has run
    pub fn latest(&self) -> Option<&DailySnapshot> {
        self.latest.as_ref()
    }

    pub fn into_world(self) -> ReviewWorld {
        self.world
    }
}

/// Run a whole simulation of `config.days` days
pub fn simulate(config: EconomyConfig) -> Result<SimulationOutput, ConfigError> {
    let start = std::time::Instant::now();
    let days = config.days;

    let mut simulation = Simulation::new(config)?;
    let mut snapshots: Vec<DailySnapshot> = Vec::with_capacity(days as usize);
    simulation.run_with_sink(days, &mut snapshots);

    let elapsed = start.elapsed();
    let config = simulation.config().clone();

    Ok(SimulationOutput::new(config, simulation.into_world(), snapshots, elapsed))
}

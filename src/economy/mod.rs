//! Token-based peer review economy
//!
//! Researchers write papers, spend review tokens to submit them, and earn
//! tokens by reviewing each other's work. A researcher short on tokens turns
//! Eager: it expedites its reviews and is invited first. The simulation
//! advances in whole days over a fixed population.

pub mod distribution;
pub mod events;
pub mod metrics;
pub mod output;
pub mod paper;
pub mod registry;
pub mod researcher;
pub mod simulation;
pub mod systems;
pub mod world;

pub use distribution::EmpiricalDistribution;
pub use events::{Anomaly, AnomalyKind, DiagnosticLog};
pub use metrics::{DailySnapshot, DayCounters, MetricsAggregator};
pub use output::SimulationOutput;
pub use paper::{Paper, ReviewerSlot};
pub use registry::PaperRegistry;
pub use researcher::{Researcher, ReviewCommitment, SubmissionRecord};
pub use simulation::{simulate, Simulation, SnapshotSink};
pub use world::ReviewWorld;

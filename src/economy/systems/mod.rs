//! Simulation systems

mod assignment;
mod population;
mod submission;

use rand::Rng;

use crate::core::config::EconomyConfig;
use crate::core::types::{Day, Status};

pub use assignment::{assign_reviews, ACTIVATION_DELAY_DAYS, RESPONSE_PROBABILITY};
pub use population::{generate_researchers, yearly_cap_for};
pub use submission::{act, run_researcher_actions};

/// Upper bound of the uniform jitter added to every sampled review duration
pub const MAX_REVIEW_JITTER_DAYS: Day = 10;

/// Days until a review gets done at `status` pace: one table draw, then one jitter draw
pub fn sample_review_delay<R: Rng + ?Sized>(config: &EconomyConfig, status: Status, rng: &mut R) -> Day {
    let base = config.review_durations.for_status(status).sample(rng);
    base + rng.gen_range(0..=MAX_REVIEW_JITTER_DAYS)
}

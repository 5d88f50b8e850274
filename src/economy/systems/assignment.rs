//! Population-wide reviewer matching
//!
//! Runs once per day after every researcher has acted. Candidates are drawn
//! from the whole Eager pool (or from everyone when the pool is empty) and
//! only then judged against the cap, self-review and acceptance rules, so
//! refused and ineligible draws still cost the paper an invite.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::EconomyConfig;
use crate::core::types::{Day, PaperId, ResearcherId, Status};
use crate::economy::metrics::MetricsAggregator;
use crate::economy::paper::Paper;
use crate::economy::researcher::{Researcher, ReviewCommitment};
use crate::economy::systems::sample_review_delay;
use crate::economy::world::ReviewWorld;

/// Editorial onboarding lag, in days, between submission and first invitations
pub const ACTIVATION_DELAY_DAYS: Day = 4;

/// Chance that an invite round reaches a candidate on a given day
pub const RESPONSE_PROBABILITY: f64 = 1.0 / 7.0;

/// Shared state of one assignment pass
struct Matcher<'a> {
    config: &'a EconomyConfig,
    day: Day,
    gating: bool,
    researchers: &'a mut [Researcher],
    eager_pool: Vec<ResearcherId>,
    rng: &'a mut ChaCha8Rng,
    metrics: &'a mut MetricsAggregator,
}

/// Recruit reviewers for every active paper still missing some, then retire
/// papers whose reviews are all delivered
pub fn assign_reviews(world: &mut ReviewWorld, config: &EconomyConfig) {
    let day = world.day;
    let eager_pool = world.eager_researchers();

    let ReviewWorld {
        researchers,
        registry,
        rng,
        metrics,
        ..
    } = world;

    let mut matcher = Matcher {
        config,
        day,
        gating: config.gating_active(day),
        researchers: researchers.as_mut_slice(),
        eager_pool,
        rng,
        metrics,
    };

    let ids: Vec<PaperId> = registry.ids().to_vec();
    for id in ids {
        let Some(paper) = registry.get_mut(id) else {
            continue;
        };
        if !paper.needs_reviewers() || !open_for_invites(paper, day) {
            continue;
        }

        tracing::trace!(
            paper = %paper.id,
            required = paper.required_reviews,
            reviewers = paper.slots().len(),
            "inviting reviewers"
        );

        for _ in 0..paper.missing_reviewers() {
            matcher.fill_slot(paper);
        }
    }

    let retired = registry.remove_fully_reviewed();
    tracing::trace!(day, retired = retired.len(), "retired fully reviewed papers");
}

/// Whether invitations may be sent for `paper` on `day`
fn open_for_invites(paper: &Paper, day: Day) -> bool {
    paper
        .submission_day
        .map_or(false, |submitted| submitted <= day + ACTIVATION_DELAY_DAYS)
}

impl Matcher<'_> {
    /// Run invite rounds for one missing slot. A round that does not reach
    /// anyone moves on to the next; the first candidate reached ends the
    /// rounds whether they accept or not.
    fn fill_slot(&mut self, paper: &mut Paper) {
        for _ in 0..self.config.invite_rounds_per_slot {
            if self.rng.gen::<f64>() >= RESPONSE_PROBABILITY {
                continue;
            }

            paper.invites += 1;
            self.metrics.counters.invites_sent += 1;

            let candidate = self.draw_candidate();
            if self.accepts(candidate, paper) {
                self.commit(candidate, paper);
            } else {
                tracing::trace!(paper = %paper.id, reviewer = %candidate, "invitation refused");
            }
            return;
        }
    }

    /// Uniform over the Eager pool, or over everyone when nobody is Eager
    fn draw_candidate(&mut self) -> ResearcherId {
        if self.eager_pool.is_empty() {
            self.metrics.counters.approached_non_eager = true;
            ResearcherId(self.rng.gen_range(0..self.researchers.len()) as u32)
        } else {
            self.eager_pool[self.rng.gen_range(0..self.eager_pool.len())]
        }
    }

    /// Self-review and cap rules first; the acceptance draw only happens
    /// when both allow the review
    fn accepts(&mut self, candidate: ResearcherId, paper: &Paper) -> bool {
        if !self.config.allow_self_review && candidate == paper.author {
            return false;
        }
        let Some(reviewer) = self.researchers.get(candidate.index()) else {
            return false;
        };
        if !reviewer.can_take_review(self.day) {
            return false;
        }
        let probability = self.config.acceptance_probability(reviewer.status);
        self.rng.gen::<f64>() < probability
    }

    fn commit(&mut self, candidate: ResearcherId, paper: &mut Paper) {
        let Some(reviewer) = self.researchers.get_mut(candidate.index()) else {
            return;
        };

        let delay = sample_review_delay(self.config, reviewer.status, &mut *self.rng);
        reviewer.commitments.push(ReviewCommitment {
            paper: paper.id,
            scheduled_day: self.day + delay,
            status: reviewer.status,
            accepted_day: self.day,
        });
        paper.add_reviewer(reviewer.id);
        self.metrics.counters.reviews_accepted += 1;

        tracing::trace!(
            paper = %paper.id,
            reviewer = %reviewer.id,
            status = %reviewer.status,
            delay,
            "invitation accepted"
        );

        if !paper.needs_reviewers() {
            self.metrics.record_paper_staffed(self.day, paper.invites);
        }

        if reviewer.status.is_eager() && reviewer.uncovered_deficit(self.gating) <= 0 {
            reviewer.status = Status::Lazy;
            self.metrics.record_transition(Status::Eager, Status::Lazy);
            self.eager_pool.retain(|id| *id != candidate);
        }
    }
}

//! Researcher - an author who writes papers and reviews other people's

use serde::{Deserialize, Serialize};

use crate::core::types::{Day, PaperId, ResearcherId, Status, YEAR_DAYS};
use crate::economy::paper::Paper;

/// An accepted review invitation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCommitment {
    pub paper: PaperId,
    pub scheduled_day: Day,
    /// Status under which the current schedule was set
    pub status: Status,
    pub accepted_day: Day,
}

impl ReviewCommitment {
    /// Same commitment moved to an earlier day by an Eager researcher
    pub fn expedited(self, scheduled_day: Day) -> Self {
        Self {
            scheduled_day,
            status: Status::Eager,
            ..self
        }
    }
}

/// Trace of one of the researcher's own submitted papers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub paper: PaperId,
    pub generation_day: Day,
    pub submission_day: Day,
    pub required_reviews: u8,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Researcher {
    pub id: ResearcherId,
    pub status: Status,
    pub previous_status: Status,
    pub tokens: u32,
    /// Written but not yet submitted, in generation order
    pub papers_to_submit: Vec<Paper>,
    /// Accepted reviews not yet delivered
    pub commitments: Vec<ReviewCommitment>,
    /// Delivered reviews accepted within the trailing year
    pub completed_reviews: Vec<ReviewCommitment>,
    /// Own papers generated within the trailing year and already submitted
    pub papers_submitted: Vec<SubmissionRecord>,
    /// 0 means no cap
    pub max_yearly_reviews: u32,
}

impl Researcher {
    pub fn new(id: ResearcherId, tokens: u32, max_yearly_reviews: u32) -> Self {
        Self {
            id,
            status: Status::Lazy,
            previous_status: Status::Lazy,
            tokens,
            papers_to_submit: Vec::new(),
            commitments: Vec::new(),
            completed_reviews: Vec::new(),
            papers_submitted: Vec::new(),
            max_yearly_reviews,
        }
    }

    /// Tokens needed to submit every queued paper (0 while gating is off)
    pub fn tokens_to_submit(&self, gating_active: bool) -> u64 {
        if !gating_active {
            return 0;
        }
        self.papers_to_submit
            .iter()
            .map(|p| u64::from(p.required_reviews))
            .sum()
    }

    /// Tokens still missing to clear the submission queue
    pub fn token_deficit(&self, gating_active: bool) -> i64 {
        self.tokens_to_submit(gating_active) as i64 - i64::from(self.tokens)
    }

    pub fn needs_reviews_to_publish(&self, gating_active: bool) -> bool {
        self.token_deficit(gating_active) > 0
    }

    /// Deficit left after counting every outstanding commitment as a future token
    pub fn uncovered_deficit(&self, gating_active: bool) -> i64 {
        self.token_deficit(gating_active) - self.commitments.len() as i64
    }

    /// Reviews accepted in the `back` days before `day`, delivered or not
    pub fn reviews_accepted_since(&self, day: Day, back: Day) -> usize {
        let since = day.saturating_sub(back);
        self.commitments
            .iter()
            .chain(self.completed_reviews.iter())
            .filter(|c| c.accepted_day >= since)
            .count()
    }

    /// Papers generated in the `back` days before `day`, submitted or not
    pub fn papers_generated_since(&self, day: Day, back: Day) -> usize {
        let since = day.saturating_sub(back);
        self.papers_submitted
            .iter()
            .filter(|p| p.generation_day >= since)
            .count()
            + self
                .papers_to_submit
                .iter()
                .filter(|p| p.generation_day >= since)
                .count()
    }

    /// Yearly cap check: uncapped, Eager, or still under the cap
    pub fn can_take_review(&self, day: Day) -> bool {
        self.max_yearly_reviews == 0
            || self.status.is_eager()
            || self.reviews_accepted_since(day, YEAR_DAYS) < self.max_yearly_reviews as usize
    }

    /// Drop history older than the trailing year
    pub fn prune_history(&mut self, day: Day) {
        let since = day.saturating_sub(YEAR_DAYS);
        self.completed_reviews.retain(|c| c.accepted_day >= since);
        self.papers_submitted.retain(|p| p.generation_day >= since);
    }
}

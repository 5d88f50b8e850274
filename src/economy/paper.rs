//! Paper - a manuscript moving from an author's queue through review

use serde::{Deserialize, Serialize};

use crate::core::types::{Day, PaperId, ResearcherId};

/// A reviewer who agreed to review, and the day they delivered (None while pending)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerSlot {
    pub reviewer: ResearcherId,
    pub completed_on: Option<Day>,
}

impl ReviewerSlot {
    pub fn pending(reviewer: ResearcherId) -> Self {
        Self { reviewer, completed_on: None }
    }

    pub fn is_pending(&self) -> bool {
        self.completed_on.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub id: PaperId,
    pub author: ResearcherId,
    pub generation_day: Day,
    /// Unset until the author pays for (or is excused from) submission
    pub submission_day: Option<Day>,
    /// 2 or 3
    pub required_reviews: u8,
    /// Never longer than `required_reviews`
    slots: Vec<ReviewerSlot>,
    /// Candidates approached so far, accepted or not
    pub invites: u32,
}

impl Paper {
    pub fn new(id: PaperId, author: ResearcherId, generation_day: Day, required_reviews: u8) -> Self {
        Self {
            id,
            author,
            generation_day,
            submission_day: None,
            required_reviews,
            slots: Vec::with_capacity(required_reviews as usize),
            invites: 0,
        }
    }

    pub fn slots(&self) -> &[ReviewerSlot] {
        &self.slots
    }

    pub fn missing_reviewers(&self) -> usize {
        (self.required_reviews as usize).saturating_sub(self.slots.len())
    }

    pub fn needs_reviewers(&self) -> bool {
        self.missing_reviewers() > 0
    }

    pub fn is_submitted(&self) -> bool {
        self.submission_day.is_some()
    }

    /// Every required slot is filled and delivered
    pub fn is_fully_reviewed(&self) -> bool {
        !self.needs_reviewers() && self.slots.iter().all(|s| !s.is_pending())
    }

    /// Add a pending slot. Returns false (and changes nothing) when the paper
    /// already has all the reviewers it needs.
    pub fn add_reviewer(&mut self, reviewer: ResearcherId) -> bool {
        if !self.needs_reviewers() {
            return false;
        }
        self.slots.push(ReviewerSlot::pending(reviewer));
        true
    }

    /// Mark the first pending slot held by `reviewer` as delivered on `day`.
    /// Returns false if the reviewer holds no pending slot on this paper.
    pub fn complete_review(&mut self, reviewer: ResearcherId, day: Day) -> bool {
        match self
            .slots
            .iter_mut()
            .find(|s| s.reviewer == reviewer && s.is_pending())
        {
            Some(slot) => {
                slot.completed_on = Some(day);
                true
            }
            None => false,
        }
    }
}

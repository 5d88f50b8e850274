//! Per-researcher daily actions: write, review, submit, re-plan
//!
//! Each researcher acts alone. The population is lifted out of the world for
//! the duration of the phase, so an acting researcher can only touch itself,
//! the registry, and the shared random stream.

use rand::Rng;

use crate::core::config::EconomyConfig;
use crate::core::types::{Day, Status};
use crate::economy::events::AnomalyKind;
use crate::economy::paper::Paper;
use crate::economy::researcher::{Researcher, SubmissionRecord};
use crate::economy::systems::sample_review_delay;
use crate::economy::world::ReviewWorld;

/// Run every researcher's daily actions in population order
pub fn run_researcher_actions(world: &mut ReviewWorld, config: &EconomyConfig) {
    let mut researchers = std::mem::take(&mut world.researchers);
    for researcher in researchers.iter_mut() {
        act(researcher, world, config);
    }
    world.researchers = researchers;
}

/// One researcher's day, in order: generation, review completion,
/// submission, status reevaluation, history retention
pub fn act(researcher: &mut Researcher, world: &mut ReviewWorld, config: &EconomyConfig) {
    let day = world.day;
    let gating = config.gating_active(day);

    write_paper(researcher, world, config, day);
    complete_due_reviews(researcher, world, day, gating);
    submit_papers(researcher, world, day, gating);
    update_status(researcher, world, config, day, gating);
    researcher.prune_history(day);
}

fn write_paper(researcher: &mut Researcher, world: &mut ReviewWorld, config: &EconomyConfig, day: Day) {
    let roll: f64 = world.rng.gen();
    if roll >= config.daily_submission_prob {
        return;
    }

    let required_reviews = if world.rng.gen::<f64>() < config.prob_two_reviews { 2 } else { 3 };
    let id = world.next_paper_id();
    researcher
        .papers_to_submit
        .push(Paper::new(id, researcher.id, day, required_reviews));
    world.metrics.counters.papers_generated += 1;

    tracing::trace!(
        researcher = %researcher.id,
        paper = %id,
        required_reviews,
        queued = researcher.papers_to_submit.len(),
        "wrote a paper"
    );
}

fn complete_due_reviews(researcher: &mut Researcher, world: &mut ReviewWorld, day: Day, gating: bool) {
    let (due, pending): (Vec<_>, Vec<_>) = researcher
        .commitments
        .drain(..)
        .partition(|c| c.scheduled_day <= day);
    researcher.commitments = pending;

    for commitment in due {
        let delivered = world
            .registry
            .get_mut(commitment.paper)
            .map(|paper| paper.complete_review(researcher.id, day));

        match delivered {
            Some(true) => {
                if gating {
                    researcher.tokens += 1;
                }
                world
                    .metrics
                    .record_review(day, day.saturating_sub(commitment.accepted_day));
                tracing::trace!(
                    researcher = %researcher.id,
                    paper = %commitment.paper,
                    tokens = researcher.tokens,
                    "delivered a review"
                );
            }
            Some(false) => {
                world.diagnostics.record(
                    AnomalyKind::ReviewerNotListed,
                    day,
                    researcher.id,
                    commitment.paper,
                );
            }
            None => {
                world.diagnostics.record(
                    AnomalyKind::PaperNotInRegistry,
                    day,
                    researcher.id,
                    commitment.paper,
                );
            }
        }
        researcher.completed_reviews.push(commitment);
    }
}

fn submit_papers(researcher: &mut Researcher, world: &mut ReviewWorld, day: Day, gating: bool) {
    let queue = std::mem::take(&mut researcher.papers_to_submit);

    for mut paper in queue {
        let cost = u32::from(paper.required_reviews);
        if gating {
            if researcher.tokens < cost {
                tracing::trace!(
                    researcher = %researcher.id,
                    paper = %paper.id,
                    tokens = researcher.tokens,
                    cost,
                    "not enough tokens to submit"
                );
                researcher.papers_to_submit.push(paper);
                continue;
            }
            researcher.tokens -= cost;
        }

        paper.submission_day = Some(day);
        let record = SubmissionRecord {
            paper: paper.id,
            generation_day: paper.generation_day,
            submission_day: day,
            required_reviews: paper.required_reviews,
        };

        match world.registry.insert(paper) {
            Ok(()) => {
                researcher.papers_submitted.push(record);
                world.metrics.counters.papers_submitted += 1;
            }
            Err(mut rejected) => {
                tracing::error!(paper = %rejected.id, "registry refused a submitted paper");
                if gating {
                    researcher.tokens += cost;
                }
                rejected.submission_day = None;
                researcher.papers_to_submit.push(rejected);
            }
        }
    }
}

fn update_status(
    researcher: &mut Researcher,
    world: &mut ReviewWorld,
    config: &EconomyConfig,
    day: Day,
    gating: bool,
) {
    researcher.previous_status = researcher.status;

    let mut deficit = researcher.token_deficit(gating);
    if deficit > 0 {
        let pace = researcher.status;
        for commitment in researcher.commitments.iter_mut() {
            if deficit <= 0 {
                break;
            }
            let proposed = day + sample_review_delay(config, pace, &mut world.rng);
            if proposed < commitment.scheduled_day {
                *commitment = commitment.expedited(proposed);
                deficit -= 1;
            }
        }
    }

    researcher.status = if deficit > 0 { Status::Eager } else { Status::Lazy };

    if researcher.status != researcher.previous_status {
        world
            .metrics
            .record_transition(researcher.previous_status, researcher.status);
        tracing::trace!(
            researcher = %researcher.id,
            from = %researcher.previous_status,
            to = %researcher.status,
            deficit,
            "status changed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CapPolicy;
    use crate::core::types::{PaperId, ResearcherId};
    use crate::economy::metrics::MetricsAggregator;
    use crate::economy::researcher::ReviewCommitment;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn config() -> EconomyConfig {
        EconomyConfig {
            population: 2,
            daily_submission_prob: 0.0,
            grace_period_days: 0,
            review_cap: CapPolicy::Unlimited,
            ..Default::default()
        }
    }

    fn world_on_day(day: Day) -> ReviewWorld {
        let mut world = ReviewWorld::new(Vec::new(), ChaCha8Rng::seed_from_u64(7), MetricsAggregator::new(0));
        world.day = day;
        world.metrics.begin_day(day);
        world
    }

    fn submitted_paper(world: &mut ReviewWorld, author: u32, required: u8, reviewer: Option<u32>) -> PaperId {
        let id = world.next_paper_id();
        let mut paper = Paper::new(id, ResearcherId(author), 1, required);
        paper.submission_day = Some(1);
        if let Some(r) = reviewer {
            paper.add_reviewer(ResearcherId(r));
        }
        world.registry.insert(paper).unwrap();
        id
    }

    fn commitment(paper: PaperId, scheduled_day: Day, accepted_day: Day) -> ReviewCommitment {
        ReviewCommitment { paper, scheduled_day, status: Status::Lazy, accepted_day }
    }

    #[test]
    fn test_generation_with_certain_probability_queues_paper() {
        let config = EconomyConfig { daily_submission_prob: 1.0, prob_two_reviews: 1.0, ..config() };
        let mut world = world_on_day(1);
        let mut researcher = Researcher::new(ResearcherId(0), 0, 0);
        act(&mut researcher, &mut world, &config);

        assert_eq!(researcher.papers_to_submit.len(), 1);
        let paper = &researcher.papers_to_submit[0];
        assert_eq!(paper.required_reviews, 2);
        assert_eq!(paper.generation_day, 1);
        assert!(paper.submission_day.is_none());
        assert_eq!(world.metrics.counters.papers_generated, 1);
    }

    #[test]
    fn test_due_review_marks_slot_and_earns_token() {
        let config = config();
        let mut world = world_on_day(40);
        let paper = submitted_paper(&mut world, 1, 2, Some(0));
        let mut researcher = Researcher::new(ResearcherId(0), 0, 0);
        researcher.commitments.push(commitment(paper, 40, 10));

        act(&mut researcher, &mut world, &config);

        assert_eq!(researcher.tokens, 1);
        assert!(researcher.commitments.is_empty());
        assert_eq!(researcher.completed_reviews.len(), 1);
        let slot = world.registry.get(paper).unwrap().slots()[0];
        assert_eq!(slot.completed_on, Some(40));
        assert_eq!(world.metrics.review_durations().get(40).total, 30);
        assert!(world.diagnostics.is_empty());
    }

    #[test]
    fn test_no_token_credit_during_grace_period() {
        let config = EconomyConfig { grace_period_days: 100, ..config() };
        let mut world = world_on_day(40);
        let paper = submitted_paper(&mut world, 1, 2, Some(0));
        let mut researcher = Researcher::new(ResearcherId(0), 0, 0);
        researcher.commitments.push(commitment(paper, 40, 10));

        act(&mut researcher, &mut world, &config);

        assert_eq!(researcher.tokens, 0);
        assert_eq!(world.metrics.counters.reviews_completed, 1);
    }

    #[test]
    fn test_missing_paper_is_a_recoverable_anomaly() {
        let config = config();
        let mut world = world_on_day(20);
        let mut researcher = Researcher::new(ResearcherId(0), 0, 0);
        researcher.commitments.push(commitment(PaperId(999), 20, 5));

        act(&mut researcher, &mut world, &config);

        assert_eq!(world.diagnostics.len(), 1);
        assert_eq!(world.diagnostics.anomalies[0].kind, AnomalyKind::PaperNotInRegistry);
        assert_eq!(researcher.tokens, 0);
        assert_eq!(researcher.completed_reviews.len(), 1);
        assert!(researcher.commitments.is_empty());
    }

    #[test]
    fn test_unlisted_reviewer_is_a_recoverable_anomaly() {
        let config = config();
        let mut world = world_on_day(20);
        let paper = submitted_paper(&mut world, 1, 2, Some(5));
        let mut researcher = Researcher::new(ResearcherId(0), 0, 0);
        researcher.commitments.push(commitment(paper, 20, 5));

        act(&mut researcher, &mut world, &config);

        assert_eq!(world.diagnostics.anomalies[0].kind, AnomalyKind::ReviewerNotListed);
        assert!(world.registry.get(paper).unwrap().slots()[0].is_pending());
        assert_eq!(researcher.tokens, 0);
    }

    #[test]
    fn test_gated_submission_spends_tokens_in_queue_order() {
        let config = config();
        let mut world = world_on_day(5);
        let mut researcher = Researcher::new(ResearcherId(0), 4, 0);
        for required in [3u8, 2] {
            let id = world.next_paper_id();
            researcher.papers_to_submit.push(Paper::new(id, researcher.id, 2, required));
        }

        act(&mut researcher, &mut world, &config);

        // the 3-review paper fits, the 2-review paper then lacks a token
        assert_eq!(researcher.tokens, 1);
        assert_eq!(researcher.papers_submitted.len(), 1);
        assert_eq!(researcher.papers_submitted[0].required_reviews, 3);
        assert_eq!(researcher.papers_to_submit.len(), 1);
        assert_eq!(world.registry.len(), 1);
        assert_eq!(world.registry.iter().next().unwrap().submission_day, Some(5));
    }

    #[test]
    fn test_ungated_submission_is_free() {
        let config = EconomyConfig { gating_disabled: true, ..config() };
        let mut world = world_on_day(5);
        let mut researcher = Researcher::new(ResearcherId(0), 0, 0);
        let id = world.next_paper_id();
        researcher.papers_to_submit.push(Paper::new(id, researcher.id, 5, 3));

        act(&mut researcher, &mut world, &config);

        assert_eq!(researcher.tokens, 0);
        assert!(researcher.papers_to_submit.is_empty());
        assert_eq!(researcher.papers_submitted[0].submission_day, 5);
        assert_eq!(researcher.status, Status::Lazy);
    }

    #[test]
    fn test_deficit_without_commitments_turns_eager() {
        let config = config();
        let mut world = world_on_day(5);
        let mut researcher = Researcher::new(ResearcherId(0), 0, 0);
        let id = world.next_paper_id();
        researcher.papers_to_submit.push(Paper::new(id, researcher.id, 5, 2));

        act(&mut researcher, &mut world, &config);

        assert_eq!(researcher.status, Status::Eager);
        assert_eq!(researcher.previous_status, Status::Lazy);
        assert_eq!(world.metrics.counters.lazy_to_eager, 1);
    }

    #[test]
    fn test_deficit_covered_by_expedited_reviews_stays_lazy() {
        let config = config();
        let mut world = world_on_day(5);
        let mut researcher = Researcher::new(ResearcherId(0), 0, 0);
        let id = world.next_paper_id();
        researcher.papers_to_submit.push(Paper::new(id, researcher.id, 5, 2));
        // scheduled far beyond any lazy duration (200 + 10 jitter)
        for paper in [PaperId(50), PaperId(51), PaperId(52)] {
            researcher.commitments.push(commitment(paper, 1000, 1));
        }

        act(&mut researcher, &mut world, &config);

        assert_eq!(researcher.status, Status::Lazy);
        let expedited: Vec<_> = researcher
            .commitments
            .iter()
            .filter(|c| c.status == Status::Eager)
            .collect();
        // stops as soon as the 2-token deficit is covered
        assert_eq!(expedited.len(), 2);
        assert!(expedited.iter().all(|c| c.scheduled_day <= 5 + 210 && c.accepted_day == 1));
        assert_eq!(researcher.commitments[2].scheduled_day, 1000);
    }

    #[test]
    fn test_commitment_already_sooner_is_not_rescheduled() {
        let config = config();
        let mut world = world_on_day(5);
        let mut researcher = Researcher::new(ResearcherId(0), 0, 0);
        let id = world.next_paper_id();
        researcher.papers_to_submit.push(Paper::new(id, researcher.id, 5, 2));
        // lazy pace is at least 10 days out, so day 6 can never be improved on
        researcher.commitments.push(commitment(PaperId(50), 6, 1));

        act(&mut researcher, &mut world, &config);

        assert_eq!(researcher.commitments[0].scheduled_day, 6);
        assert_eq!(researcher.commitments[0].status, Status::Lazy);
        assert_eq!(researcher.status, Status::Eager);
    }

    #[test]
    fn test_refused_submission_is_requeued_and_refunded() {
        let config = config();
        let mut world = world_on_day(5);
        let clash = submitted_paper(&mut world, 1, 2, None);
        let mut researcher = Researcher::new(ResearcherId(0), 2, 0);
        researcher.papers_to_submit.push(Paper::new(clash, researcher.id, 4, 2));

        act(&mut researcher, &mut world, &config);

        assert_eq!(researcher.tokens, 2);
        assert!(researcher.papers_submitted.is_empty());
        assert_eq!(researcher.papers_to_submit.len(), 1);
        assert!(researcher.papers_to_submit[0].submission_day.is_none());
        assert_eq!(world.registry.get(clash).unwrap().author, ResearcherId(1));
        assert_eq!(world.metrics.counters.papers_submitted, 0);
    }
}

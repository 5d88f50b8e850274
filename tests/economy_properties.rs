//! Property tests: day-by-day invariants over random seeds and small economies

use proptest::prelude::*;
use review_economy::core::config::{CapPolicy, EconomyConfig};
use review_economy::economy::Simulation;

fn small_economy(seed: u64, population: usize, submission: f64, grace: u32, cap: u32) -> EconomyConfig {
    EconomyConfig {
        population,
        daily_submission_prob: submission,
        grace_period_days: grace,
        review_cap: if cap == 0 { CapPolicy::Unlimited } else { CapPolicy::Flat(cap) },
        accept_prob_lazy: 0.5,
        invite_rounds_per_slot: 4,
        seed,
        ..Default::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_daily_invariants_hold(
        seed in any::<u64>(),
        population in 2usize..40,
        submission in 0.0f64..0.3,
        grace in 0u32..20,
        cap in 0u32..6,
    ) {
        let mut sim = Simulation::new(small_economy(seed, population, submission, grace, cap)).unwrap();

        for _ in 0..60 {
            let snapshot = sim.step().clone();
            let world = sim.world();
            let day = world.day;

            prop_assert_eq!(snapshot.submitted, world.registry.len());
            prop_assert!(snapshot.awaiting_reviewers <= snapshot.submitted);
            prop_assert_eq!(
                snapshot.eager_researchers,
                world.researchers.iter().filter(|r| r.status.is_eager()).count()
            );

            for paper in world.registry.iter() {
                prop_assert!(paper.slots().len() <= paper.required_reviews as usize);
                prop_assert!((2..=3).contains(&paper.required_reviews));
                prop_assert!(paper.submission_day.is_some());
                prop_assert!(!paper.is_fully_reviewed());
            }

            for researcher in &world.researchers {
                prop_assert!(researcher.papers_to_submit.iter().all(|p| p.submission_day.is_none()));
                prop_assert!(researcher.commitments.iter().all(|c| c.scheduled_day > day));
                prop_assert!(researcher
                    .completed_reviews
                    .iter()
                    .all(|c| c.scheduled_day <= day && day - c.accepted_day <= 365));
                if !sim.config().gating_active(day) {
                    prop_assert!(researcher.papers_to_submit.is_empty());
                }
            }
        }

        prop_assert!(sim.world().diagnostics.is_empty());
    }

    #[test]
    fn test_same_seed_same_history(seed in any::<u64>(), population in 2usize..25) {
        let config = small_economy(seed, population, 0.1, 5, 0);
        let mut first = Simulation::new(config.clone()).unwrap();
        let mut second = Simulation::new(config).unwrap();

        for _ in 0..40 {
            let a = first.step().clone();
            let b = second.step().clone();
            prop_assert_eq!(a, b);
        }
    }
}

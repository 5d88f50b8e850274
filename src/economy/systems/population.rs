//! Population initialization

use crate::core::config::{CapPolicy, EconomyConfig};
use crate::core::types::ResearcherId;
use crate::economy::researcher::Researcher;

/// Create the population in its fixed acting order
pub fn generate_researchers(config: &EconomyConfig) -> Vec<Researcher> {
    let population = config.population;
    let researchers: Vec<Researcher> = (0..population)
        .map(|index| {
            Researcher::new(
                ResearcherId(index as u32),
                config.initial_tokens,
                yearly_cap_for(config, index, population),
            )
        })
        .collect();

    tracing::debug!(
        population,
        capped = researchers.iter().filter(|r| r.max_yearly_reviews > 0).count(),
        "generated researchers"
    );

    researchers
}

/// Yearly review cap for the researcher at `index`
///
/// Distributed caps are assigned by quota: the researcher takes the cap at the
/// midpoint of its share of the population, so the population reproduces the
/// table's proportions without consuming random draws.
pub fn yearly_cap_for(config: &EconomyConfig, index: usize, population: usize) -> u32 {
    match &config.review_cap {
        CapPolicy::Unlimited => 0,
        CapPolicy::Flat(cap) => *cap,
        CapPolicy::Stable => config.stable_yearly_reviews(),
        CapPolicy::Distributed(table) => {
            let position = (index as f64 + 0.5) / population.max(1) as f64;
            table.pick(position)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::distribution::EmpiricalDistribution;

    #[test]
    fn test_researchers_start_lazy_with_initial_tokens() {
        let config = EconomyConfig {
            population: 10,
            initial_tokens: 4,
            review_cap: CapPolicy::Unlimited,
            ..Default::default()
        };
        let researchers = generate_researchers(&config);
        assert_eq!(researchers.len(), 10);
        for (i, r) in researchers.iter().enumerate() {
            assert_eq!(r.id, ResearcherId(i as u32));
            assert_eq!(r.tokens, 4);
            assert_eq!(r.max_yearly_reviews, 0);
            assert!(!r.status.is_eager());
        }
    }

    #[test]
    fn test_flat_and_stable_caps() {
        let flat = EconomyConfig { population: 3, review_cap: CapPolicy::Flat(12), ..Default::default() };
        assert!(generate_researchers(&flat).iter().all(|r| r.max_yearly_reviews == 12));

        let stable = EconomyConfig { population: 3, review_cap: CapPolicy::Stable, ..Default::default() };
        let expected = stable.stable_yearly_reviews();
        assert!(generate_researchers(&stable).iter().all(|r| r.max_yearly_reviews == expected));
    }

    #[test]
    fn test_distributed_caps_follow_table_proportions() {
        let table = EmpiricalDistribution::from_counts(&[(10u32, 1), (20, 3)], "cap").unwrap();
        let config = EconomyConfig {
            population: 100,
            review_cap: CapPolicy::Distributed(table),
            ..Default::default()
        };
        let researchers = generate_researchers(&config);
        let tens = researchers.iter().filter(|r| r.max_yearly_reviews == 10).count();
        let twenties = researchers.iter().filter(|r| r.max_yearly_reviews == 20).count();
        assert_eq!(tens, 25);
        assert_eq!(twenties, 75);
        // lower caps come first, matching the table order
        assert_eq!(researchers[0].max_yearly_reviews, 10);
        assert_eq!(researchers[99].max_yearly_reviews, 20);
    }
}

//! Rolling review metrics and the per-day snapshot
//!
//! Two per-day tallies feed the moving averages: delivered reviews with
//! their turnaround, and fully staffed papers with the invites it took.
//! Each tally keeps one entry per day for the trailing 366 days.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::{Day, Status, MONTH_DAYS, YEAR_DAYS};
use crate::economy::registry::PaperRegistry;
use crate::economy::researcher::Researcher;

/// Days of per-day entries kept behind the current day
const RETAINED_DAYS: Day = YEAR_DAYS + 1;

/// Division that yields 0 instead of failing on an empty window
pub fn ratio(total: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub count: u64,
    pub total: u64,
}

/// Per-day (count, total) accumulator
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RollingTally {
    days: BTreeMap<Day, Tally>,
}

impl RollingTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_day(&mut self, day: Day) {
        self.days.entry(day).or_default();
    }

    pub fn add(&mut self, day: Day, value: u64) {
        let tally = self.days.entry(day).or_default();
        tally.count += 1;
        tally.total += value;
    }

    pub fn get(&self, day: Day) -> Tally {
        self.days.get(&day).copied().unwrap_or_default()
    }

    /// Sum over days `day - back ..= day`
    pub fn window(&self, day: Day, back: Day) -> Tally {
        self.days
            .range(day.saturating_sub(back)..=day)
            .fold(Tally::default(), |acc, (_, t)| Tally {
                count: acc.count + t.count,
                total: acc.total + t.total,
            })
    }

    pub fn window_average(&self, day: Day, back: Day) -> f64 {
        let tally = self.window(day, back);
        ratio(tally.total, tally.count)
    }

    /// Forget days before `day - keep`
    pub fn prune(&mut self, day: Day, keep: Day) {
        let cutoff = day.saturating_sub(keep);
        self.days = self.days.split_off(&cutoff);
    }

    pub fn retained_days(&self) -> usize {
        self.days.len()
    }
}

/// Activity counters for the day in progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCounters {
    pub papers_generated: u32,
    pub papers_submitted: u32,
    pub reviews_completed: u32,
    pub invites_sent: u32,
    pub reviews_accepted: u32,
    pub lazy_to_eager: u32,
    pub eager_to_lazy: u32,
    /// The Eager pool was empty and a candidate had to come from everyone
    pub approached_non_eager: bool,
}

/// What the driver exposes after each day
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    pub day: Day,
    /// Papers in the active registry
    pub submitted: usize,
    pub awaiting_reviewers: usize,
    pub in_review: usize,
    pub avg_review_days_1y: f64,
    pub avg_review_days_1m: f64,
    pub avg_invites_per_paper_1y: f64,
    pub avg_invites_per_paper_1m: f64,
    pub eager_researchers: usize,
    /// Written papers held back for lack of tokens
    pub waiting_for_tokens: usize,
    pub counters: DayCounters,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MetricsAggregator {
    review_durations: RollingTally,
    invites_per_paper: RollingTally,
    warmup_days: Day,
    pub counters: DayCounters,
}

impl MetricsAggregator {
    pub fn new(warmup_days: Day) -> Self {
        Self {
            warmup_days,
            ..Self::default()
        }
    }

    /// Reset the day's counters and open the day's tally entries
    pub fn begin_day(&mut self, day: Day) {
        self.counters = DayCounters::default();
        self.review_durations.open_day(day);
        self.invites_per_paper.open_day(day);
    }

    fn collecting(&self, day: Day) -> bool {
        day > self.warmup_days
    }

    pub fn record_review(&mut self, day: Day, duration_days: Day) {
        self.counters.reviews_completed += 1;
        if self.collecting(day) {
            self.review_durations.add(day, u64::from(duration_days));
        }
    }

    pub fn record_paper_staffed(&mut self, day: Day, invites: u32) {
        if self.collecting(day) {
            self.invites_per_paper.add(day, u64::from(invites));
        }
    }

    pub fn record_transition(&mut self, from: Status, to: Status) {
        match (from, to) {
            (Status::Lazy, Status::Eager) => self.counters.lazy_to_eager += 1,
            (Status::Eager, Status::Lazy) => self.counters.eager_to_lazy += 1,
            _ => {}
        }
    }

    pub fn review_durations(&self) -> &RollingTally {
        &self.review_durations
    }

    pub fn invites_per_paper(&self) -> &RollingTally {
        &self.invites_per_paper
    }

    /// Recompute the moving averages and summarize the day
    pub fn finish_day(
        &mut self,
        day: Day,
        registry: &PaperRegistry,
        researchers: &[Researcher],
    ) -> DailySnapshot {
        self.review_durations.prune(day, RETAINED_DAYS);
        self.invites_per_paper.prune(day, RETAINED_DAYS);

        let submitted = registry.len();
        let awaiting_reviewers = registry.awaiting_reviewers();

        DailySnapshot {
            day,
            submitted,
            awaiting_reviewers,
            in_review: submitted - awaiting_reviewers,
            avg_review_days_1y: self.review_durations.window_average(day, YEAR_DAYS),
            avg_review_days_1m: self.review_durations.window_average(day, MONTH_DAYS),
            avg_invites_per_paper_1y: self.invites_per_paper.window_average(day, YEAR_DAYS),
            avg_invites_per_paper_1m: self.invites_per_paper.window_average(day, MONTH_DAYS),
            eager_researchers: researchers.iter().filter(|r| r.status.is_eager()).count(),
            waiting_for_tokens: researchers.iter().map(|r| r.papers_to_submit.len()).sum(),
            counters: self.counters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_guards_zero_denominator() {
        assert_eq!(ratio(10, 0), 0.0);
        assert_eq!(ratio(10, 4), 2.5);
    }

    #[test]
    fn test_window_includes_boundary_day() {
        let mut tally = RollingTally::new();
        tally.add(70, 10);
        tally.add(100, 30);
        // 100 - 30 = 70 is inside the monthly window
        assert_eq!(tally.window(100, MONTH_DAYS), Tally { count: 2, total: 40 });
        assert_eq!(tally.window(101, MONTH_DAYS), Tally { count: 1, total: 30 });
    }

    #[test]
    fn test_prune_keeps_retained_days() {
        let mut tally = RollingTally::new();
        for day in 1..=500 {
            tally.add(day, 1);
        }
        tally.prune(500, RETAINED_DAYS);
        assert_eq!(tally.retained_days(), RETAINED_DAYS as usize + 1);
        assert_eq!(tally.window(500, YEAR_DAYS).count, 366);
    }

    #[test]
    fn test_empty_windows_average_to_zero() {
        let mut metrics = MetricsAggregator::new(0);
        metrics.begin_day(1);
        let snapshot = metrics.finish_day(1, &PaperRegistry::new(), &[]);
        assert_eq!(snapshot.avg_review_days_1y, 0.0);
        assert_eq!(snapshot.avg_invites_per_paper_1m, 0.0);
        assert_eq!(snapshot.submitted, 0);
    }

    #[test]
    fn test_monthly_average_forgets_old_reviews() {
        let mut metrics = MetricsAggregator::new(0);
        metrics.begin_day(1);
        metrics.record_review(1, 100);
        metrics.begin_day(50);
        metrics.record_review(50, 10);
        let snapshot = metrics.finish_day(50, &PaperRegistry::new(), &[]);
        assert_eq!(snapshot.avg_review_days_1y, 55.0);
        assert_eq!(snapshot.avg_review_days_1m, 10.0);
        assert_eq!(snapshot.counters.reviews_completed, 1);
    }

    #[test]
    fn test_warmup_days_are_not_averaged() {
        let mut metrics = MetricsAggregator::new(5);
        metrics.begin_day(5);
        metrics.record_review(5, 40);
        metrics.record_paper_staffed(5, 3);
        metrics.begin_day(6);
        metrics.record_review(6, 20);
        let snapshot = metrics.finish_day(6, &PaperRegistry::new(), &[]);
        assert_eq!(snapshot.avg_review_days_1y, 20.0);
        assert_eq!(snapshot.avg_invites_per_paper_1y, 0.0);
    }

    #[test]
    fn test_transitions_are_counted_by_direction() {
        let mut metrics = MetricsAggregator::new(0);
        metrics.begin_day(1);
        metrics.record_transition(Status::Lazy, Status::Eager);
        metrics.record_transition(Status::Lazy, Status::Eager);
        metrics.record_transition(Status::Eager, Status::Lazy);
        metrics.record_transition(Status::Lazy, Status::Lazy);
        assert_eq!(metrics.counters.lazy_to_eager, 2);
        assert_eq!(metrics.counters.eager_to_lazy, 1);
    }
}

//! ReviewWorld - the simulation context threaded through every phase

use rand_chacha::ChaCha8Rng;

use crate::core::types::{Day, PaperId, ResearcherId};
use crate::economy::events::DiagnosticLog;
use crate::economy::metrics::MetricsAggregator;
use crate::economy::registry::PaperRegistry;
use crate::economy::researcher::Researcher;

/// All mutable state of a run
pub struct ReviewWorld {
    /// Population, in the fixed order researchers act each day
    pub researchers: Vec<Researcher>,
    /// Submitted papers not yet fully reviewed
    pub registry: PaperRegistry,
    /// Current simulation day (0 before the first step)
    pub day: Day,
    /// Single random stream feeding every decision
    pub rng: ChaCha8Rng,
    pub metrics: MetricsAggregator,
    pub diagnostics: DiagnosticLog,
    /// Next paper ID to assign
    next_paper_id: u64,
}

impl ReviewWorld {
    pub fn new(researchers: Vec<Researcher>, rng: ChaCha8Rng, metrics: MetricsAggregator) -> Self {
        Self {
            researchers,
            registry: PaperRegistry::new(),
            day: 0,
            rng,
            metrics,
            diagnostics: DiagnosticLog::new(),
            next_paper_id: 1,
        }
    }

    /// Generate a new unique PaperId
    pub fn next_paper_id(&mut self) -> PaperId {
        let id = PaperId(self.next_paper_id);
        self.next_paper_id += 1;
        id
    }

    pub fn population(&self) -> usize {
        self.researchers.len()
    }

    pub fn get_researcher(&self, id: ResearcherId) -> Option<&Researcher> {
        self.researchers.get(id.index())
    }

    pub fn get_researcher_mut(&mut self, id: ResearcherId) -> Option<&mut Researcher> {
        self.researchers.get_mut(id.index())
    }

    /// Ids of Eager researchers in population order
    pub fn eager_researchers(&self) -> Vec<ResearcherId> {
        self.researchers
            .iter()
            .filter(|r| r.status.is_eager())
            .map(|r| r.id)
            .collect()
    }

    pub fn total_tokens(&self) -> u64 {
        self.researchers.iter().map(|r| u64::from(r.tokens)).sum()
    }
}

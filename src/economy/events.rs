//! Diagnostic channel for data consistency anomalies
//!
//! Anomalies never stop the run. The affected commitment is skipped, the
//! anomaly is logged through `tracing` and kept here for inspection.

use serde::{Deserialize, Serialize};

use crate::core::types::{Day, PaperId, ResearcherId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnomalyKind {
    /// A commitment points at a paper that is no longer active
    PaperNotInRegistry,
    /// The paper exists but holds no pending slot for the reviewer
    ReviewerNotListed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub id: u32,
    pub day: Day,
    pub kind: AnomalyKind,
    pub researcher: ResearcherId,
    pub paper: PaperId,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DiagnosticLog {
    pub anomalies: Vec<Anomaly>,
    next_id: u32,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: AnomalyKind, day: Day, researcher: ResearcherId, paper: PaperId) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        match kind {
            AnomalyKind::PaperNotInRegistry => tracing::warn!(
                day,
                %researcher,
                %paper,
                "review due for a paper missing from the active registry"
            ),
            AnomalyKind::ReviewerNotListed => tracing::warn!(
                day,
                %researcher,
                %paper,
                "review due but the reviewer holds no pending slot on the paper"
            ),
        }

        self.anomalies.push(Anomaly {
            id,
            day,
            kind,
            researcher,
            paper,
        });

        id
    }

    pub fn len(&self) -> usize {
        self.anomalies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anomalies.is_empty()
    }

    pub fn anomalies_for_day(&self, day: Day) -> impl Iterator<Item = &Anomaly> {
        self.anomalies.iter().filter(move |a| a.day == day)
    }
}

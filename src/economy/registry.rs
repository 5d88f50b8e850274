//! PaperRegistry - submitted papers that are not yet fully reviewed

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::types::PaperId;
use crate::economy::paper::Paper;

/// Active papers, iterated in submission order and looked up by id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaperRegistry {
    papers: AHashMap<PaperId, Paper>,
    /// Submission order
    order: Vec<PaperId>,
}

impl PaperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a submitted paper. Unsubmitted or duplicate papers are refused and
    /// handed back.
    pub fn insert(&mut self, paper: Paper) -> Result<(), Paper> {
        if !paper.is_submitted() || self.papers.contains_key(&paper.id) {
            return Err(paper);
        }
        self.order.push(paper.id);
        self.papers.insert(paper.id, paper);
        Ok(())
    }

    pub fn get(&self, id: PaperId) -> Option<&Paper> {
        self.papers.get(&id)
    }

    pub fn get_mut(&mut self, id: PaperId) -> Option<&mut Paper> {
        self.papers.get_mut(&id)
    }

    pub fn contains(&self, id: PaperId) -> bool {
        self.papers.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids in submission order
    pub fn ids(&self) -> &[PaperId] {
        &self.order
    }

    /// Papers in submission order
    pub fn iter(&self) -> impl Iterator<Item = &Paper> {
        self.order.iter().filter_map(move |id| self.papers.get(id))
    }

    /// Papers still missing at least one reviewer
    pub fn awaiting_reviewers(&self) -> usize {
        self.papers.values().filter(|p| p.needs_reviewers()).count()
    }

    /// Remove every paper whose reviews are all delivered, returning them in
    /// submission order
    pub fn remove_fully_reviewed(&mut self) -> Vec<Paper> {
        let mut removed = Vec::new();
        let papers = &mut self.papers;
        self.order.retain(|id| {
            let done = papers.get(id).map_or(true, |p| p.is_fully_reviewed());
            if done {
                if let Some(paper) = papers.remove(id) {
                    removed.push(paper);
                }
            }
            !done
        });
        removed
    }
}

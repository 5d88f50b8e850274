//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulation day counter. Day 0 is the initial state; the first step is day 1.
pub type Day = u32;

/// Days in the trailing yearly window
pub const YEAR_DAYS: Day = 365;

/// Days in the trailing monthly window
pub const MONTH_DAYS: Day = 30;

/// Unique identifier for researchers (index into the population)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResearcherId(pub u32);

impl ResearcherId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ResearcherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R{}", self.0)
    }
}

/// Unique identifier for papers, assigned in generation order starting at 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PaperId(pub u64);

impl PaperId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for PaperId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Behavioral mode of a researcher
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// Passive: reviews at the slow empirical pace, rarely accepts invites
    #[default]
    Lazy,
    /// Short on tokens: expedites reviews and is prioritized for invites
    Eager,
}

impl Status {
    pub fn is_eager(self) -> bool {
        matches!(self, Status::Eager)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Lazy => write!(f, "lazy"),
            Status::Eager => write!(f, "eager"),
        }
    }
}

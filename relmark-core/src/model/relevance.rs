use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Relevance level attached to a marked span.
///
/// Levels are totally ordered `High > Medium > Neutral > Low`. The order
/// decides which annotation labels a segment when several overlap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RelevanceLevel {
    High,
    Medium,
    Neutral,
    Low,
}

impl RelevanceLevel {
    /// All levels, highest first.
    pub fn all() -> &'static [RelevanceLevel] {
        &[
            RelevanceLevel::High,
            RelevanceLevel::Medium,
            RelevanceLevel::Neutral,
            RelevanceLevel::Low,
        ]
    }

    /// Ordinal used for priority; larger wins.
    pub fn rank(&self) -> u8 {
        match self {
            RelevanceLevel::High => 3,
            RelevanceLevel::Medium => 2,
            RelevanceLevel::Neutral => 1,
            RelevanceLevel::Low => 0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelevanceLevel::High => "High",
            RelevanceLevel::Medium => "Medium",
            RelevanceLevel::Neutral => "Neutral",
            RelevanceLevel::Low => "Low",
        }
    }

    pub fn short(&self) -> &'static str {
        match self {
            RelevanceLevel::High => "HIGH",
            RelevanceLevel::Medium => "MED",
            RelevanceLevel::Neutral => "NEUT",
            RelevanceLevel::Low => "LOW",
        }
    }
}

impl Default for RelevanceLevel {
    fn default() -> Self {
        RelevanceLevel::Neutral
    }
}

impl Ord for RelevanceLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for RelevanceLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

//! Per-level counts and coverage, derived on demand from the store.

use serde::Serialize;

use crate::model::{Annotation, RelevanceLevel};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelStats {
    pub relevance_level: RelevanceLevel,
    pub count: usize,
    /// Sum of annotated lengths at this level, overlaps counted twice
    pub covered_chars: usize,
    /// `covered_chars` as a share of the document, capped to `[0, 100]`
    pub coverage_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelevanceStatistics {
    levels: Vec<LevelStats>,
}

impl RelevanceStatistics {
    /// Aggregate `annotations` against a document of `document_len` characters.
    ///
    /// Ranges are clamped to the document first, so marks left behind by a
    /// shortened document count for what is still visible.
    pub fn compute(annotations: &[Annotation], document_len: usize) -> Self {
        let levels = RelevanceLevel::all()
            .iter()
            .map(|&level| {
                let (count, covered_chars) = annotations
                    .iter()
                    .filter(|a| a.relevance_level == level)
                    .fold((0, 0), |(count, covered), a| {
                        let visible = a.range.clamp(document_len).map_or(0, |r| r.len());
                        (count + 1, covered + visible)
                    });

                LevelStats {
                    relevance_level: level,
                    count,
                    covered_chars,
                    coverage_percent: percent(covered_chars, document_len),
                }
            })
            .collect();

        Self { levels }
    }

    pub fn get(&self, level: RelevanceLevel) -> &LevelStats {
        &self.levels[slot(level)]
    }

    /// Levels from highest to lowest
    pub fn iter(&self) -> impl Iterator<Item = &LevelStats> {
        self.levels.iter()
    }

    pub fn total_count(&self) -> usize {
        self.levels.iter().map(|s| s.count).sum()
    }
}

/// Position of `level` in `RelevanceLevel::all()`
fn slot(level: RelevanceLevel) -> usize {
    match level {
        RelevanceLevel::High => 0,
        RelevanceLevel::Medium => 1,
        RelevanceLevel::Neutral => 2,
        RelevanceLevel::Low => 3,
    }
}

fn percent(covered: usize, document_len: usize) -> f64 {
    if document_len == 0 {
        return 0.0;
    }
    (covered as f64 / document_len as f64 * 100.0).min(100.0)
}

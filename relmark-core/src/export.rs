//! One-way export of a marked document as JSON or a markdown summary.

use serde::Serialize;

use crate::model::{Annotation, Document, RelevanceLevel};
use crate::stats::{LevelStats, RelevanceStatistics};

/// Export format written by the CLI
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub filepath: Option<String>,
    pub filename: Option<String>,
    pub title: String,
    pub content: String,
    pub word_count: usize,
    pub annotations: Vec<ExportAnnotation>,
    pub statistics: Vec<LevelStats>,
    pub summary: String,
}

/// All five annotation fields, unchanged
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportAnnotation {
    pub id: String,
    pub start_index: usize,
    pub end_index: usize,
    pub relevance_level: RelevanceLevel,
    pub text: String,
    pub comment: Option<String>,
}

impl From<&Annotation> for ExportAnnotation {
    fn from(ann: &Annotation) -> Self {
        Self {
            id: ann.id.to_string(),
            start_index: ann.range.start_index,
            end_index: ann.range.end_index,
            relevance_level: ann.relevance_level,
            text: ann.text.clone(),
            comment: ann.comment.clone(),
        }
    }
}

impl From<&Document> for ExportDocument {
    fn from(doc: &Document) -> Self {
        let statistics = doc.relevance_statistics();
        Self {
            filepath: doc.filepath.clone(),
            filename: doc.filename.clone(),
            title: doc.title.clone(),
            content: doc.content().to_string(),
            word_count: doc.word_count(),
            annotations: doc.annotations().iter().map(ExportAnnotation::from).collect(),
            summary: summary_with(doc, &statistics),
            statistics: statistics.iter().cloned().collect(),
        }
    }
}

/// Serialize a document with its annotations to pretty JSON
pub fn to_json(doc: &Document) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ExportDocument::from(doc))
}

/// Markdown report of the marks, grouped by level from High to Low
pub fn generate_summary(doc: &Document) -> String {
    summary_with(doc, &doc.relevance_statistics())
}

fn summary_with(doc: &Document, statistics: &RelevanceStatistics) -> String {
    let mut summary = String::new();

    summary.push_str(&format!("## Document: {}\n\n", doc.title));

    if doc.annotations().is_empty() {
        summary.push_str("No passages marked.\n");
        return summary;
    }

    summary.push_str(&format!("### Marked passages ({} items)\n\n", doc.annotations().len()));

    for stats in statistics.iter().filter(|s| s.count > 0) {
        summary.push_str(&format!(
            "#### {} ({}, {:.1}% of text)\n\n",
            stats.relevance_level.as_str(),
            stats.count,
            stats.coverage_percent
        ));

        // Reading order within a level
        for ann in doc
            .annotations_sorted()
            .into_iter()
            .filter(|a| a.relevance_level == stats.relevance_level)
        {
            summary.push_str(&format!("**\"{}\"**\n", ann.text));
            if let Some(comment) = ann.comment() {
                summary.push_str(&format!("- Comment: {}\n", comment));
            }
            summary.push('\n');
        }
    }

    summary
}

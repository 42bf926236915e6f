use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::resolver::Segment;
use crate::stats::RelevanceStatistics;
use crate::store::AnnotationStore;
use crate::text;

use super::{Annotation, RelevanceLevel, TextRange};

/// A document and the relevance marks made on it during one session
#[derive(Debug, Clone)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    content: String,
    pub filename: Option<String>,
    pub filepath: Option<String>,
    annotations: AnnotationStore,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    pub fn new(title: String, content: String) -> Self {
        let now = Utc::now();
        let annotations = AnnotationStore::new(text::char_len(&content));
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            filename: None,
            filepath: None,
            annotations,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a document with filename metadata (used by CLI when loading from file)
    pub fn with_file_info(title: String, content: String, filepath: String, filename: String) -> Self {
        let mut doc = Self::new(title, content);
        doc.filepath = Some(filepath);
        doc.filename = Some(filename);
        doc
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.annotations.document_len()
    }

    /// Replace the text. Annotations are kept and clamped when rendered.
    pub fn set_content(&mut self, content: String) {
        self.annotations.set_document_len(text::char_len(&content));
        self.content = content;
        self.touch();
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    /// Record a completed selection at the given level.
    ///
    /// # Errors
    ///
    /// `InvalidRange` for empty or out-of-bounds selections.
    pub fn submit_selection(&mut self, start: usize, end: usize, level: RelevanceLevel) -> Result<Annotation> {
        let selected = text::char_slice(&self.content, &TextRange::new(start, end)).to_string();
        let annotation = self.annotations.add(start, end, level, selected)?.clone();
        self.touch();
        Ok(annotation)
    }

    /// # Errors
    ///
    /// `NotFound` when `id` is unknown.
    pub fn attach_comment(&mut self, id: Uuid, comment: &str) -> Result<()> {
        self.annotations.set_comment(id, comment)?;
        self.touch();
        Ok(())
    }

    /// # Errors
    ///
    /// `NotFound` when `id` is unknown.
    pub fn delete_annotation(&mut self, id: Uuid) -> Result<Annotation> {
        let removed = self.annotations.remove(id)?;
        self.touch();
        Ok(removed)
    }

    pub fn clear_all(&mut self) {
        self.annotations.clear();
        self.touch();
    }

    /// Segments for the document's own text
    pub fn render_segments(&self) -> Vec<Segment> {
        self.annotations.render_segments(&self.content)
    }

    pub fn relevance_statistics(&self) -> RelevanceStatistics {
        self.annotations.relevance_statistics()
    }

    /// Get annotations sorted by start offset
    pub fn annotations_sorted(&self) -> Vec<&Annotation> {
        let mut sorted: Vec<_> = self.annotations.iter().collect();
        sorted.sort_by_key(|a| a.range.start_index);
        sorted
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnnotationError;
    use pretty_assertions::assert_eq;

    fn doc(content: &str) -> Document {
        Document::new("Test".to_string(), content.to_string())
    }

    #[test]
    fn test_submit_selection_captures_text() {
        let mut doc = doc("Hello wörld");
        let ann = doc.submit_selection(6, 11, RelevanceLevel::High).unwrap();
        assert_eq!(ann.text, "wörld");
        assert_eq!(doc.annotations().list(), &[ann]);
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let mut doc = doc("Hello world");
        let err = doc.submit_selection(4, 4, RelevanceLevel::Low).unwrap_err();
        assert!(matches!(err, AnnotationError::InvalidRange { start: 4, end: 4, .. }));
        assert!(doc.annotations().list().is_empty());
    }

    #[test]
    fn test_out_of_bounds_selection_is_rejected() {
        let mut doc = doc("short");
        assert!(doc.submit_selection(2, 6, RelevanceLevel::Low).is_err());
    }

    #[test]
    fn test_comment_and_delete_flow() {
        let mut doc = doc("Hello world");
        let id = doc.submit_selection(0, 5, RelevanceLevel::Medium).unwrap().id;

        doc.attach_comment(id, "greeting").unwrap();
        assert_eq!(doc.annotations().get(id).unwrap().comment(), Some("greeting"));

        doc.delete_annotation(id).unwrap();
        assert_eq!(doc.delete_annotation(id).unwrap_err(), AnnotationError::NotFound(id));
        assert_eq!(doc.attach_comment(id, "late"), Err(AnnotationError::NotFound(id)));
    }

    #[test]
    fn test_shortened_content_clamps_but_keeps_annotation() {
        let mut doc = doc("0123456789");
        let ann = doc.submit_selection(5, 10, RelevanceLevel::High).unwrap();

        doc.set_content("012345".to_string());
        let segments = doc.render_segments();
        let labeled: Vec<&str> = segments.iter().filter(|s| s.is_labeled()).map(|s| s.text.as_str()).collect();
        assert_eq!(labeled, vec!["5"]);

        doc.set_content("012".to_string());
        assert!(doc.render_segments().iter().all(|s| !s.is_labeled()));
        assert_eq!(doc.annotations().get(ann.id).map(|a| a.text.as_str()), Some("56789"));
    }

    #[test]
    fn test_clear_all() {
        let mut doc = doc("Hello world");
        doc.submit_selection(0, 5, RelevanceLevel::High).unwrap();
        doc.submit_selection(6, 11, RelevanceLevel::Low).unwrap();
        doc.clear_all();
        assert!(doc.annotations().is_empty());
        assert_eq!(doc.render_segments().len(), 1);
    }

    #[test]
    fn test_annotations_sorted_by_start() {
        let mut doc = doc("Hello world");
        doc.submit_selection(6, 11, RelevanceLevel::Low).unwrap();
        doc.submit_selection(0, 5, RelevanceLevel::High).unwrap();

        let starts: Vec<usize> = doc.annotations_sorted().iter().map(|a| a.start_index()).collect();
        assert_eq!(starts, vec![0, 6]);
    }
}

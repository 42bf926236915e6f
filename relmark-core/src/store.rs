//! Range store: the annotations recorded against one document.

use tracing::debug;
use uuid::Uuid;

use crate::error::{AnnotationError, Result};
use crate::model::annotation::normalize_comment;
use crate::model::{Annotation, RelevanceLevel, TextRange};
use crate::resolver::{self, Segment};
use crate::stats::RelevanceStatistics;

/// Ordered set of annotations over a document of known length.
///
/// Insertion order is preserved and doubles as the tie-break order when the
/// resolver picks a label for overlapping marks.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    annotations: Vec<Annotation>,
    document_len: usize,
}

impl AnnotationStore {
    pub fn new(document_len: usize) -> Self {
        Self {
            annotations: Vec::new(),
            document_len,
        }
    }

    pub fn document_len(&self) -> usize {
        self.document_len
    }

    /// Rebind to a document whose length changed. Existing ranges are kept
    /// as-is and clamped when read.
    pub fn set_document_len(&mut self, document_len: usize) {
        self.document_len = document_len;
    }

    /// Record a new annotation over `start..end` and return it.
    ///
    /// # Errors
    ///
    /// `InvalidRange` when the range is empty, reversed, or ends past the document.
    pub fn add(
        &mut self,
        start: usize,
        end: usize,
        level: RelevanceLevel,
        text: impl Into<String>,
    ) -> Result<&Annotation> {
        if start >= end || end > self.document_len {
            return Err(AnnotationError::InvalidRange {
                start,
                end,
                document_len: self.document_len,
            });
        }

        let annotation = Annotation::new(TextRange::new(start, end), level, text.into());
        debug!(id = %annotation.id, start, end, level = level.as_str(), "annotation added");
        self.annotations.push(annotation);

        let last = self.annotations.len() - 1;
        Ok(&self.annotations[last])
    }

    /// Replace the comment of an annotation. Blank comments clear it.
    ///
    /// # Errors
    ///
    /// `NotFound` when no annotation has this id.
    pub fn set_comment(&mut self, id: Uuid, comment: &str) -> Result<()> {
        let annotation = self
            .annotations
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(AnnotationError::NotFound(id))?;

        annotation.comment = normalize_comment(comment);
        debug!(%id, has_comment = annotation.comment.is_some(), "annotation comment set");
        Ok(())
    }

    /// Remove exactly one annotation, keeping the order of the rest.
    ///
    /// # Errors
    ///
    /// `NotFound` when no annotation has this id.
    pub fn remove(&mut self, id: Uuid) -> Result<Annotation> {
        let pos = self
            .annotations
            .iter()
            .position(|a| a.id == id)
            .ok_or(AnnotationError::NotFound(id))?;

        debug!(%id, "annotation removed");
        Ok(self.annotations.remove(pos))
    }

    pub fn clear(&mut self) {
        if !self.annotations.is_empty() {
            debug!(count = self.annotations.len(), "annotations cleared");
        }
        self.annotations.clear();
    }

    /// Annotations in insertion order
    pub fn list(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub fn get(&self, id: Uuid) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Resolve the current annotations over `text` into display segments
    pub fn render_segments(&self, text: &str) -> Vec<Segment> {
        resolver::resolve(text, &self.annotations)
    }

    pub fn relevance_statistics(&self) -> RelevanceStatistics {
        RelevanceStatistics::compute(&self.annotations, self.document_len)
    }
}

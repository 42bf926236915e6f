//! Thread-safe handle for a document shared between several callers.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::error::Result;
use crate::model::{Annotation, Document, RelevanceLevel};
use crate::resolver::Segment;
use crate::stats::RelevanceStatistics;

/// Cloneable handle to one document.
///
/// Mutations are serialized behind the write lock and reads hold the read
/// lock for the whole computation, so segments and statistics never observe
/// a half-applied change.
#[derive(Debug, Clone)]
pub struct SharedDocument {
    inner: Arc<RwLock<Document>>,
}

impl SharedDocument {
    pub fn new(document: Document) -> Self {
        Self {
            inner: Arc::new(RwLock::new(document)),
        }
    }

    // Mutations are single Vec operations; a poisoned lock still holds a consistent document.
    fn read(&self) -> RwLockReadGuard<'_, Document> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Document> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// # Errors
    ///
    /// `InvalidRange` for empty or out-of-bounds selections.
    pub fn submit_selection(&self, start: usize, end: usize, level: RelevanceLevel) -> Result<Annotation> {
        self.write().submit_selection(start, end, level)
    }

    /// # Errors
    ///
    /// `NotFound` when `id` is unknown.
    pub fn attach_comment(&self, id: Uuid, comment: &str) -> Result<()> {
        self.write().attach_comment(id, comment)
    }

    /// # Errors
    ///
    /// `NotFound` when `id` is unknown.
    pub fn delete_annotation(&self, id: Uuid) -> Result<Annotation> {
        self.write().delete_annotation(id)
    }

    pub fn clear_all(&self) {
        self.write().clear_all();
    }

    pub fn render_segments(&self) -> Vec<Segment> {
        self.read().render_segments()
    }

    pub fn relevance_statistics(&self) -> RelevanceStatistics {
        self.read().relevance_statistics()
    }

    /// Snapshot of the annotations in insertion order
    pub fn list(&self) -> Vec<Annotation> {
        self.read().annotations().list().to_vec()
    }

    /// Run `f` against a consistent view of the document
    pub fn with_document<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.read())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_concurrent_submissions_are_all_recorded() {
        let text = "x".repeat(100);
        let shared = SharedDocument::new(Document::new("Shared".to_string(), text.clone()));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0..25 {
                        let start = t * 25 + i;
                        shared.submit_selection(start, start + 1, RelevanceLevel::Low).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let list = shared.list();
        assert_eq!(list.len(), 100);

        let mut ids: Vec<Uuid> = list.iter().map(|a| a.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 100);

        let segments = shared.render_segments();
        let joined: String = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(joined, text);
        assert_eq!(shared.relevance_statistics().get(RelevanceLevel::Low).coverage_percent, 100.0);
    }

    #[test]
    fn test_with_document_reads_snapshot() {
        let shared = SharedDocument::new(Document::new("Shared".to_string(), "abc".to_string()));
        shared.submit_selection(0, 1, RelevanceLevel::High).unwrap();
        let count = shared.with_document(|doc| doc.annotations().len());
        assert_eq!(count, 1);
    }
}

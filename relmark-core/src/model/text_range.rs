use serde::{Deserialize, Serialize};

/// Half-open range of text by character offsets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TextRange {
    pub start_index: usize,
    pub end_index: usize,
}

impl TextRange {
    /// Build a range from two selection endpoints in either order
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start_index: start.min(end),
            end_index: start.max(end),
        }
    }

    /// Check if this range contains the given offset
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start_index && offset < self.end_index
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }

    /// Restrict the range to `[0, document_len)`.
    ///
    /// Returns `None` when nothing of the range is left inside the document.
    pub fn clamp(&self, document_len: usize) -> Option<TextRange> {
        let start = self.start_index.min(document_len);
        let end = self.end_index.min(document_len);
        (start < end).then_some(TextRange {
            start_index: start,
            end_index: end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_orders_endpoints() {
        let range = TextRange::new(9, 4);
        assert_eq!(range.start_index, 4);
        assert_eq!(range.end_index, 9);
        assert_eq!(range.len(), 5);
    }

    #[test]
    fn test_contains_is_half_open() {
        let range = TextRange::new(2, 4);
        assert!(!range.contains(1));
        assert!(range.contains(2));
        assert!(range.contains(3));
        assert!(!range.contains(4));
    }

    #[test]
    fn test_clamp() {
        let range = TextRange::new(5, 10);
        assert_eq!(range.clamp(20), Some(range));
        assert_eq!(range.clamp(6), Some(TextRange::new(5, 6)));
        assert_eq!(range.clamp(5), None);
        assert_eq!(range.clamp(3), None);
    }
}

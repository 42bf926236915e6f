use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{RelevanceLevel, TextRange};

/// A relevance mark over a span of the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub id: Uuid,
    #[serde(flatten)]
    pub range: TextRange,
    pub relevance_level: RelevanceLevel,
    /// Copy of the marked text taken at creation; not refreshed on edits.
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Annotation {
    pub(crate) fn new(range: TextRange, relevance_level: RelevanceLevel, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            range,
            relevance_level,
            text,
            comment: None,
        }
    }

    pub fn start_index(&self) -> usize {
        self.range.start_index
    }

    pub fn end_index(&self) -> usize {
        self.range.end_index
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

/// Trim a comment and map blank input to "no comment".
pub(crate) fn normalize_comment(comment: &str) -> Option<String> {
    let trimmed = comment.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_field_names() {
        let mut ann = Annotation::new(TextRange::new(3, 8), RelevanceLevel::High, "lorem".to_string());
        ann.comment = Some("key claim".to_string());

        let json = serde_json::to_string(&ann).unwrap();
        assert!(json.contains("\"startIndex\":3"));
        assert!(json.contains("\"endIndex\":8"));
        assert!(json.contains("\"relevanceLevel\":\"high\""));
        assert!(json.contains("\"text\":\"lorem\""));
        assert!(json.contains("\"comment\":\"key claim\""));

        let back: Annotation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ann);
    }

    #[test]
    fn test_normalize_comment() {
        assert_eq!(normalize_comment("   "), None);
        assert_eq!(normalize_comment(""), None);
        assert_eq!(normalize_comment("  keep me "), Some("keep me".to_string()));
    }
}

use thiserror::Error;
use uuid::Uuid;

/// Rejected annotation operations. The store is never left modified when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnnotationError {
    #[error("invalid range {start}..{end} for a document of {document_len} characters")]
    InvalidRange {
        start: usize,
        end: usize,
        document_len: usize,
    },

    #[error("no annotation with id {0}")]
    NotFound(Uuid),
}

pub type Result<T, E = AnnotationError> = std::result::Result<T, E>;

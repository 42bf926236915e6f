pub mod annotation;
pub mod document;
pub mod relevance;
pub mod text_range;

pub use annotation::Annotation;
pub use document::Document;
pub use relevance::RelevanceLevel;
pub use text_range::TextRange;

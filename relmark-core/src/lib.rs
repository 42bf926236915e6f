//! Relmark Core - relevance annotations over text
//!
//! This crate holds the annotation store, the resolver that turns
//! overlapping annotations into a flat sequence of labeled segments, and
//! the platform-agnostic application state used by the terminal front-end.

pub mod actions;
pub mod app;
pub mod cursor;
pub mod error;
pub mod export;
pub mod model;
pub mod resolver;
pub mod shared;
pub mod stats;
pub mod store;
pub mod text;

pub use app::{App, Focus, InputTarget, Mode};
pub use cursor::CursorState;
pub use error::AnnotationError;
pub use export::{generate_summary, to_json, ExportAnnotation, ExportDocument};
pub use model::{Annotation, Document, RelevanceLevel, TextRange};
pub use resolver::{resolve, Segment, SegmentLabel};
pub use shared::SharedDocument;
pub use stats::{LevelStats, RelevanceStatistics};
pub use store::AnnotationStore;

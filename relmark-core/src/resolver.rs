//! Segment resolver.
//!
//! Turns a document and its (possibly overlapping) annotations into an
//! ordered, gap-free partition of the text. Every character lands in exactly
//! one segment, and all characters of a segment are covered by the same set
//! of annotations.
//!
//! The sweep only visits range boundaries: starts and ends are sorted once,
//! and the active set is updated incrementally between them, so cost grows
//! with the annotation count rather than the document length.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use serde::Serialize;
use tracing::trace;
use uuid::Uuid;

use crate::model::{Annotation, RelevanceLevel, TextRange};
use crate::text;

/// Label chosen to represent a segment's covering annotations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentLabel {
    /// Annotation the label was taken from
    pub annotation_id: Uuid,
    pub relevance_level: RelevanceLevel,
    pub comment: Option<String>,
}

/// A contiguous slice of the document with at most one label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub text: String,
    #[serde(flatten)]
    pub range: TextRange,
    /// Ids of every annotation covering the whole segment, in insertion order
    pub covering: Vec<Uuid>,
    pub label: Option<SegmentLabel>,
}

impl Segment {
    pub fn is_labeled(&self) -> bool {
        self.label.is_some()
    }

    pub fn level(&self) -> Option<RelevanceLevel> {
        self.label.as_ref().map(|l| l.relevance_level)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Edge {
    End,
    Start,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Event {
    position: usize,
    edge: Edge,
    /// Insertion index of the annotation
    index: usize,
}

/// Resolve `annotations` over `text` into display segments.
///
/// Ranges reaching past the end of `text` are clamped; a range that clamps
/// to nothing contributes no characters. An empty text yields no segments.
pub fn resolve(text: &str, annotations: &[Annotation]) -> Vec<Segment> {
    let len = text::char_len(text);
    if len == 0 {
        return Vec::new();
    }

    let mut events: Vec<Event> = Vec::with_capacity(annotations.len() * 2);
    for (index, annotation) in annotations.iter().enumerate() {
        let Some(range) = annotation.range.clamp(len) else {
            continue;
        };
        events.push(Event {
            position: range.start_index,
            edge: Edge::Start,
            index,
        });
        events.push(Event {
            position: range.end_index,
            edge: Edge::End,
            index,
        });
    }
    events.sort_unstable();

    // Candidate boundaries: document start, every event, document end.
    let mut boundaries: Vec<usize> = Vec::with_capacity(events.len() + 2);
    boundaries.push(0);
    boundaries.extend(events.iter().map(|e| e.position));
    boundaries.push(len);
    boundaries.dedup();

    let byte_at = text::byte_offsets(text, &boundaries);

    let mut segments: Vec<Segment> = Vec::new();
    let mut active: BTreeSet<usize> = BTreeSet::new();
    let mut pending = events.iter().peekable();
    let mut open: Option<(usize, BTreeSet<usize>)> = None;

    for (slot, &position) in boundaries.iter().enumerate() {
        while let Some(event) = pending.next_if(|e| e.position == position) {
            match event.edge {
                Edge::Start => active.insert(event.index),
                Edge::End => active.remove(&event.index),
            };
        }

        let changed = open.as_ref().map_or(true, |(_, covering)| *covering != active);
        if !changed && position < len {
            continue;
        }

        if let Some((start_slot, covering)) = open.take() {
            segments.push(build_segment(
                text,
                annotations,
                (boundaries[start_slot], position),
                (byte_at[start_slot], byte_at[slot]),
                &covering,
            ));
        }

        if position < len {
            open = Some((slot, active.clone()));
        }
    }

    trace!(
        annotations = annotations.len(),
        segments = segments.len(),
        "segments resolved"
    );
    segments
}

fn build_segment(
    text: &str,
    annotations: &[Annotation],
    (start, end): (usize, usize),
    (start_byte, end_byte): (usize, usize),
    covering: &BTreeSet<usize>,
) -> Segment {
    Segment {
        text: text[start_byte..end_byte].to_string(),
        range: TextRange::new(start, end),
        covering: covering.iter().map(|&i| annotations[i].id).collect(),
        label: representative(annotations, covering).map(|a| SegmentLabel {
            annotation_id: a.id,
            relevance_level: a.relevance_level,
            comment: a.comment.clone(),
        }),
    }
}

/// Highest level wins; among equal levels the earliest-added wins.
fn representative<'a>(annotations: &'a [Annotation], covering: &BTreeSet<usize>) -> Option<&'a Annotation> {
    covering
        .iter()
        .max_by_key(|&&i| (annotations[i].relevance_level, Reverse(i)))
        .map(|&i| &annotations[i])
}

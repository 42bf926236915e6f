use crate::model::Document;

/// Start offset of the annotation at `index` in reading order
pub fn annotation_offset_by_index(doc: &Document, index: usize) -> Option<usize> {
    doc.annotations_sorted()
        .get(index)
        .map(|a| a.range.start_index)
}

pub mod navigation;

pub use navigation::annotation_offset_by_index;

//! URL segmentation and classification
//!
//! Pure, deterministic mapping from a discovered URL to a content category:
//! the path is split into ordered segments and the first segment is looked
//! up in the table-driven vocabulary.

mod classifier;
mod segments;

pub use classifier::{apply_filter_status, classify, Vocabulary};
pub use segments::{segment_url, PathSegments};

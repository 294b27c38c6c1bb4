//! Review export
//!
//! Serializes the items held by a review session into the downloadable
//! JSON document offered to the reviewer.

mod json_exporter;

pub use json_exporter::{JsonExporter, EXPORT_FILE_NAME};

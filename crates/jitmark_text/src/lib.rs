//! # jitmark_text
//!
//! Text derived from a document and its mapping back to source.
//!
//! - [`TextOffsetMap`] flattens an inline run to display text and maps any
//!   rendered range back to the source range that produced it.
//! - [`align_to_source`] recovers per-character source ranges for a node
//!   whose decoded value differs from its raw source.
//! - [`extract_plain_text`] flattens a whole document for copy and export.

mod align;
mod offset_map;
mod plain;
mod policy;

pub use align::align_to_source;
pub use offset_map::TextOffsetMap;
pub use plain::extract_plain_text;
pub use policy::SpanMappingPolicy;

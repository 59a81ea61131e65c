//! coco_core: Shared source-text primitives.
//!
//! Spans and line indexing used throughout the toolchain to attribute
//! diagnostics to source locations.

pub mod text;

pub use text::{LineAndColumn, LineMap, TextPos, TextSpan};

//! coco_scanner: converts source text into tokens.

pub mod scanner;

pub use scanner::{scan, Scanner};

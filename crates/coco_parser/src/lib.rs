//! coco_parser: recursive-descent parser producing a `SyntaxTree`.

pub mod parser;

pub use parser::parse;

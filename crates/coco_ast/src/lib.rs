//! coco_ast: Syntax kinds, tokens, and the syntax tree.
//!
//! The syntax tree is a closed set of owned tagged unions. Every node
//! exposes a source span for diagnostic attribution.

pub mod node;
pub mod printer;
pub mod syntax_kind;
pub mod token;
pub mod tree;

pub use node::*;
pub use syntax_kind::SyntaxKind;
pub use token::{Token, TokenValue};
pub use tree::SyntaxTree;

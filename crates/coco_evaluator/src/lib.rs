//! coco_evaluator: direct execution of lowered bound trees.

pub mod evaluator;
pub mod value;

pub use evaluator::{Evaluator, RuntimeFault, Variables};
pub use value::Value;

//! coco_lowering: desugars structured control flow into labels and gotos.

pub mod lowerer;

pub use lowerer::lower;

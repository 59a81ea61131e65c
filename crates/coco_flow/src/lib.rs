//! coco_flow: control-flow graphs over lowered bound trees.

pub mod graph;

pub use graph::{all_paths_return, BasicBlock, BlockId, Branch, ControlFlowGraph};

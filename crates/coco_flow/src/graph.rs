//! Control-flow graph construction over a lowered statement list.
//!
//! Two phases: partition the flat statement list into basic blocks, then
//! wire the blocks with conditional and unconditional branches between
//! sentinel Start and End blocks. Unreachable blocks are pruned to a fix
//! point before the graph is returned, so every surviving block except
//! Start is reachable from Start.

use coco_binder::bound::{BoundExpression, BoundLabel, BoundStatement, Constant};
use coco_binder::operators::BoundUnaryOperator;
use rustc_hash::FxHashMap;
use std::fmt::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(pub usize);

#[derive(Debug)]
pub struct BasicBlock {
    pub id: BlockId,
    pub is_start: bool,
    pub is_end: bool,
    pub statements: Vec<BoundStatement>,
}

impl fmt::Display for BasicBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_start {
            return f.write_str("<Start>");
        }
        if self.is_end {
            return f.write_str("<End>");
        }
        for (i, statement) in self.statements.iter().enumerate() {
            if i > 0 {
                f.write_char('\n')?;
            }
            let rendered = coco_binder::printer::statement_to_string(statement);
            f.write_str(rendered.trim_end())?;
        }
        Ok(())
    }
}

/// An edge between two blocks. `condition` is the guard under which the
/// edge is taken; `None` means unconditional.
#[derive(Debug)]
pub struct Branch {
    pub from: BlockId,
    pub to: BlockId,
    pub condition: Option<BoundExpression>,
}

#[derive(Debug)]
pub struct ControlFlowGraph {
    blocks: Vec<BasicBlock>,
    branches: Vec<Branch>,
    start: BlockId,
    end: BlockId,
}

impl ControlFlowGraph {
    /// Build the graph for a lowered body.
    pub fn from_body(body: &BoundStatement) -> ControlFlowGraph {
        let blocks = partition(body);
        GraphBuilder::default().build(blocks)
    }

    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn start(&self) -> BlockId {
        self.start
    }

    pub fn end(&self) -> BlockId {
        self.end
    }

    fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.iter().find(|block| block.id == id)
    }

    /// True when every edge into End leaves a block whose final
    /// statement is a return. Falling off the end of the body shows up
    /// as a non-return terminator reaching End, which fails the check.
    pub fn all_paths_return(&self) -> bool {
        self.branches
            .iter()
            .filter(|branch| branch.to == self.end)
            .all(|branch| {
                self.block(branch.from)
                    .and_then(|block| block.statements.last())
                    .is_some_and(|statement| matches!(statement, BoundStatement::Return(_)))
            })
    }

    /// Export the graph in DOT form for inspection with graph tooling.
    pub fn write_to(&self, writer: &mut dyn Write) -> fmt::Result {
        writeln!(writer, "digraph G {{")?;
        for block in &self.blocks {
            let label = quote(&block.to_string());
            writeln!(writer, "    N{} [label = {label}, shape = box]", block.id.0)?;
        }
        for branch in &self.branches {
            let label = match &branch.condition {
                Some(condition) => {
                    quote(&coco_binder::printer::expression_to_string(condition))
                }
                None => "\"\"".to_string(),
            };
            writeln!(
                writer,
                "    N{} -> N{} [label = {label}]",
                branch.from.0, branch.to.0
            )?;
        }
        writeln!(writer, "}}")
    }
}

fn quote(text: &str) -> String {
    format!("{:?}", text)
}

/// Build the graph for a body and run the return-path check in one step.
pub fn all_paths_return(body: &BoundStatement) -> bool {
    ControlFlowGraph::from_body(body).all_paths_return()
}

// ============================================================================
// Phase 1: basic-block partition
// ============================================================================

/// Split a lowered statement list into basic blocks: a label starts a new
/// block, a goto, conditional goto, or return ends the current one.
fn partition(body: &BoundStatement) -> Vec<Vec<BoundStatement>> {
    let statements: &[BoundStatement] = match body {
        BoundStatement::Block(statements) => statements,
        other => std::slice::from_ref(other),
    };

    let mut blocks = Vec::new();
    let mut current: Vec<BoundStatement> = Vec::new();
    for statement in statements {
        match statement {
            BoundStatement::Label(_) => {
                if !current.is_empty() {
                    blocks.push(std::mem::take(&mut current));
                }
                current.push(statement.clone());
            }
            BoundStatement::Goto(_)
            | BoundStatement::ConditionalGoto { .. }
            | BoundStatement::Return(_) => {
                current.push(statement.clone());
                blocks.push(std::mem::take(&mut current));
            }
            BoundStatement::VariableDeclaration { .. } | BoundStatement::Expression(_) => {
                current.push(statement.clone());
            }
            // Lowered input contains no structured control flow.
            BoundStatement::Block(_)
            | BoundStatement::If { .. }
            | BoundStatement::While { .. }
            | BoundStatement::DoWhile { .. }
            | BoundStatement::For { .. } => {}
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

// ============================================================================
// Phase 2: graph construction
// ============================================================================

#[derive(Default)]
struct GraphBuilder {
    branches: Vec<Branch>,
}

impl GraphBuilder {
    fn build(mut self, block_statements: Vec<Vec<BoundStatement>>) -> ControlFlowGraph {
        // Ids: 0 is Start, 1..=n the real blocks, n + 1 is End.
        let start = BlockId(0);
        let end = BlockId(block_statements.len() + 1);

        let mut blocks = Vec::with_capacity(block_statements.len() + 2);
        blocks.push(BasicBlock {
            id: start,
            is_start: true,
            is_end: false,
            statements: Vec::new(),
        });
        for (i, statements) in block_statements.into_iter().enumerate() {
            blocks.push(BasicBlock {
                id: BlockId(i + 1),
                is_start: false,
                is_end: false,
                statements,
            });
        }
        blocks.push(BasicBlock {
            id: end,
            is_start: false,
            is_end: true,
            statements: Vec::new(),
        });

        let label_targets: FxHashMap<BoundLabel, BlockId> = blocks
            .iter()
            .flat_map(|block| {
                block.statements.iter().filter_map(|statement| match statement {
                    BoundStatement::Label(label) => Some((label.clone(), block.id)),
                    _ => None,
                })
            })
            .collect();

        match blocks.len() {
            // Only the sentinels: an empty body runs straight through.
            2 => self.connect(start, end, None),
            _ => self.connect(start, BlockId(1), None),
        }

        for block in &blocks[1..blocks.len() - 1] {
            let next = if block.id.0 + 1 == end.0 {
                end
            } else {
                BlockId(block.id.0 + 1)
            };
            let statement_count = block.statements.len();
            for (i, statement) in block.statements.iter().enumerate() {
                let is_last = i + 1 == statement_count;
                match statement {
                    BoundStatement::Goto(label) => {
                        if let Some(&target) = label_targets.get(label) {
                            self.connect(block.id, target, None);
                        }
                    }
                    BoundStatement::ConditionalGoto {
                        label,
                        condition,
                        jump_if_true,
                    } => {
                        if let Some(&target) = label_targets.get(label) {
                            let taken = with_polarity(condition, *jump_if_true);
                            let fallthrough = with_polarity(condition, !*jump_if_true);
                            self.connect(block.id, target, Some(taken));
                            self.connect(block.id, next, Some(fallthrough));
                        }
                    }
                    BoundStatement::Return(_) => {
                        self.connect(block.id, end, None);
                    }
                    _ => {
                        if is_last {
                            self.connect(block.id, next, None);
                        }
                    }
                }
            }
        }

        self.prune(&mut blocks, start);
        ControlFlowGraph {
            blocks,
            branches: self.branches,
            start,
            end,
        }
    }

    /// Add an edge, simplifying literal boolean guards: a `true` guard
    /// becomes unconditional and a `false` guard produces no edge at all.
    fn connect(&mut self, from: BlockId, to: BlockId, condition: Option<BoundExpression>) {
        let condition = match condition {
            Some(BoundExpression::Literal(Constant::Bool(true))) => None,
            Some(BoundExpression::Literal(Constant::Bool(false))) => return,
            other => other,
        };
        self.branches.push(Branch {
            from,
            to,
            condition,
        });
    }

    /// Remove blocks with no incoming edges, together with their
    /// outgoing edges, until none remain. Removing a block can strand
    /// another, so the scan restarts after each removal.
    fn prune(&mut self, blocks: &mut Vec<BasicBlock>, start: BlockId) {
        loop {
            let unreachable = blocks.iter().position(|block| {
                block.id != start
                    && !block.is_end
                    && !self.branches.iter().any(|branch| branch.to == block.id)
            });
            let Some(index) = unreachable else {
                break;
            };
            let dead = blocks.remove(index);
            self.branches.retain(|branch| branch.from != dead.id);
        }
    }
}

/// The guard for an edge taken when `condition` evaluates to `polarity`.
fn with_polarity(condition: &BoundExpression, polarity: bool) -> BoundExpression {
    if polarity {
        return condition.clone();
    }
    match condition {
        BoundExpression::Literal(Constant::Bool(value)) => {
            BoundExpression::Literal(Constant::Bool(!value))
        }
        _ => BoundExpression::Unary {
            operator: &BoundUnaryOperator::BOOL_LOGICAL_NEGATION,
            operand: Box::new(condition.clone()),
        },
    }
}

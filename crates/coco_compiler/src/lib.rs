//! coco_compiler: the compilation session tying the pipeline together.
//!
//! A `Compilation` owns one parsed submission and an optional link to
//! the previous submission, so global declarations accumulate across an
//! interactive session. The bound global scope is computed once per
//! compilation and published through a `OnceLock`, matching the
//! compute-once semantics a host needs when it queries the scope from
//! more than one place.

pub mod program;

use coco_ast::tree::SyntaxTree;
use coco_binder::{bind_global_scope, BoundGlobalScope};
use coco_diagnostics::Diagnostic;
use coco_evaluator::{Evaluator, RuntimeFault, Value, Variables};
use coco_flow::ControlFlowGraph;
use program::{bind_program, BoundProgram};
use std::fmt::{self, Write};
use std::rc::Rc;
use std::sync::OnceLock;

pub use coco_evaluator::Variables as VariableStore;

/// The outcome of evaluating one submission: either a non-empty set of
/// diagnostics and no value, or the submission's result value.
#[derive(Debug)]
pub struct EvaluationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub value: Option<Value>,
}

pub struct Compilation {
    previous: Option<Rc<Compilation>>,
    tree: SyntaxTree,
    global_scope: OnceLock<Rc<BoundGlobalScope>>,
}

impl Compilation {
    pub fn new(tree: SyntaxTree) -> Compilation {
        Compilation {
            previous: None,
            tree,
            global_scope: OnceLock::new(),
        }
    }

    /// Chain a new submission onto this one. The new compilation sees
    /// every symbol declared by this compilation and its predecessors.
    pub fn continue_with(self: Rc<Compilation>, tree: SyntaxTree) -> Rc<Compilation> {
        Rc::new(Compilation {
            previous: Some(self),
            tree,
            global_scope: OnceLock::new(),
        })
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    /// The bound global scope, computed on first access and published
    /// for every later caller.
    pub fn global_scope(&self) -> &Rc<BoundGlobalScope> {
        self.global_scope.get_or_init(|| {
            let previous = self
                .previous
                .as_ref()
                .map(|compilation| Rc::clone(compilation.global_scope()));
            Rc::new(bind_global_scope(previous, &self.tree))
        })
    }

    fn bind_program(&self) -> BoundProgram {
        bind_program(self.global_scope())
    }

    /// Parse/bind diagnostics for this submission, in source order.
    fn check_diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = self.tree.diagnostics().to_vec();
        diagnostics.extend(self.global_scope().diagnostics.iter().cloned());
        diagnostics
    }

    /// Run this submission. Any diagnostic from any pipeline stage stops
    /// progression to the next stage; a clean program is executed and
    /// its result value returned. Runtime faults (division by zero and
    /// friends) abort evaluation through the error channel.
    pub fn evaluate(&self, variables: &mut Variables) -> Result<EvaluationResult, RuntimeFault> {
        let diagnostics = self.check_diagnostics();
        if !diagnostics.is_empty() {
            return Ok(EvaluationResult {
                diagnostics,
                value: None,
            });
        }

        let program = self.bind_program();
        if !program.diagnostics.is_empty() {
            return Ok(EvaluationResult {
                diagnostics: program.diagnostics,
                value: None,
            });
        }

        let mut evaluator = Evaluator::new(&program.functions, variables);
        let value = evaluator.evaluate(&program.statement)?;
        Ok(EvaluationResult {
            diagnostics: Vec::new(),
            value: match value {
                Value::Unit => None,
                value => Some(value),
            },
        })
    }

    /// Dump the bound and lowered program: each function, then the
    /// top-level statements.
    pub fn emit_tree(&self, writer: &mut dyn Write) -> fmt::Result {
        let program = self.bind_program();
        let mut functions: Vec<_> = program.functions.iter().collect();
        functions.sort_by_key(|(function, _)| function.id);
        for (function, body) in functions {
            write!(writer, "function {}(", function.name)?;
            for (i, parameter) in function.parameters.iter().enumerate() {
                if i > 0 {
                    writer.write_str(", ")?;
                }
                write!(writer, "{}: {}", parameter.name, parameter.ty)?;
            }
            writeln!(writer, "): {}", function.return_type)?;
            coco_binder::printer::write_statement(writer, body)?;
        }
        coco_binder::printer::write_statement(writer, &program.statement)
    }

    /// Export the control-flow graph of the lowered top-level block in
    /// DOT form.
    pub fn emit_control_flow_graph(&self, writer: &mut dyn Write) -> fmt::Result {
        let program = self.bind_program();
        ControlFlowGraph::from_body(&program.statement).write_to(writer)
    }
}

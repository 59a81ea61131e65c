//! Whole-program binding: every function body across all submissions,
//! lowered and flow-checked, plus the lowered top-level statement block.

use coco_binder::bound::BoundStatement;
use coco_binder::{bind_function_body, BoundGlobalScope, Type};
use coco_binder::{FunctionSymbol, VariableSymbol};
use coco_diagnostics::{Diagnostic, DiagnosticBag};
use coco_lowering::lower;
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// The executable artifact: lowered bodies keyed by function symbol and
/// the lowered global statement block. Rebuilt whenever the global scope
/// changes; never mutated.
pub struct BoundProgram {
    pub diagnostics: Vec<Diagnostic>,
    pub functions: FxHashMap<Rc<FunctionSymbol>, Rc<BoundStatement>>,
    pub statement: Rc<BoundStatement>,
    /// Variables the lowered global block may touch, for tooling.
    pub variables: Vec<Rc<VariableSymbol>>,
}

pub fn bind_program(global_scope: &Rc<BoundGlobalScope>) -> BoundProgram {
    let mut diagnostics = Vec::new();
    let mut functions = FxHashMap::default();

    for function in global_scope.all_functions() {
        let (body, body_diagnostics) = bind_function_body(global_scope, &function);
        diagnostics.extend(body_diagnostics);
        let lowered = lower(body);

        // A non-void function must return on every statically reachable
        // exit path; the diagnostic points at the function's name.
        if function.return_type != Type::Void && !coco_flow::all_paths_return(&lowered) {
            if let Some(declaration) = &function.declaration {
                let mut bag = DiagnosticBag::new();
                bag.report_all_paths_must_return(declaration.identifier.span);
                diagnostics.extend(bag);
            }
        }

        functions.insert(function, Rc::new(lowered));
    }

    let statement = Rc::new(lower(BoundStatement::Block(global_scope.statements.clone())));
    BoundProgram {
        diagnostics,
        functions,
        statement,
        variables: global_scope.variables.clone(),
    }
}

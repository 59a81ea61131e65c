//! Symbols: named, typed entities produced by binding declarations.
//!
//! Symbols are shared by reference between the scope that declares them
//! and every bound node that uses them. Equality and hashing go through
//! a process-unique id rather than the name, so symbols from different
//! submissions of an incremental session never collide as map keys.

use crate::types::Type;
use coco_ast::node::FunctionDeclaration;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

pub type SymbolId = u32;

// Ids below 16 are reserved for the builtin functions and their
// parameters, which must compare equal across all sessions.
static NEXT_SYMBOL_ID: AtomicU32 = AtomicU32::new(16);

fn next_symbol_id() -> SymbolId {
    NEXT_SYMBOL_ID.fetch_add(1, Ordering::Relaxed)
}

/// Where a variable's storage lives at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Global,
    Local,
    Parameter,
}

#[derive(Debug)]
pub struct VariableSymbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: VariableKind,
    pub is_read_only: bool,
    pub ty: Type,
}

impl VariableSymbol {
    pub fn new(name: impl Into<String>, kind: VariableKind, is_read_only: bool, ty: Type) -> Self {
        Self {
            id: next_symbol_id(),
            name: name.into(),
            kind,
            is_read_only,
            ty,
        }
    }
}

impl PartialEq for VariableSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for VariableSymbol {}

impl std::hash::Hash for VariableSymbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for VariableSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Debug)]
pub struct FunctionSymbol {
    pub id: SymbolId,
    pub name: String,
    pub parameters: Vec<Rc<VariableSymbol>>,
    pub return_type: Type,
    /// The syntax that declared this function; `None` for builtins.
    pub declaration: Option<Rc<FunctionDeclaration>>,
}

impl FunctionSymbol {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<Rc<VariableSymbol>>,
        return_type: Type,
        declaration: Rc<FunctionDeclaration>,
    ) -> Self {
        Self {
            id: next_symbol_id(),
            name: name.into(),
            parameters,
            return_type,
            declaration: Some(declaration),
        }
    }
}

impl PartialEq for FunctionSymbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FunctionSymbol {}

impl std::hash::Hash for FunctionSymbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for FunctionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The builtin functions. Each carries a fixed reserved id, so every
/// construction of the same builtin compares equal and the evaluator can
/// dispatch on the id.
pub mod builtins {
    use super::*;

    pub const PRINT_ID: SymbolId = 0;
    pub const INPUT_ID: SymbolId = 1;
    pub const RANDOM_ID: SymbolId = 2;

    fn parameter(id: SymbolId, name: &str, ty: Type) -> Rc<VariableSymbol> {
        Rc::new(VariableSymbol {
            id,
            name: name.to_string(),
            kind: VariableKind::Parameter,
            is_read_only: true,
            ty,
        })
    }

    fn builtin(
        id: SymbolId,
        name: &str,
        parameters: Vec<Rc<VariableSymbol>>,
        return_type: Type,
    ) -> Rc<FunctionSymbol> {
        Rc::new(FunctionSymbol {
            id,
            name: name.to_string(),
            parameters,
            return_type,
            declaration: None,
        })
    }

    /// `print(text: string)`
    pub fn print() -> Rc<FunctionSymbol> {
        builtin(
            PRINT_ID,
            "print",
            vec![parameter(3, "text", Type::String)],
            Type::Void,
        )
    }

    /// `input(): string`
    pub fn input() -> Rc<FunctionSymbol> {
        builtin(INPUT_ID, "input", Vec::new(), Type::String)
    }

    /// `random(max: int): int`
    pub fn random() -> Rc<FunctionSymbol> {
        builtin(
            RANDOM_ID,
            "random",
            vec![parameter(4, "max", Type::Int)],
            Type::Int,
        )
    }

    pub fn all() -> [Rc<FunctionSymbol>; 3] {
        [print(), input(), random()]
    }
}

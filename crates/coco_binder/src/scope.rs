//! The scope chain used during binding.

use crate::symbol::{FunctionSymbol, VariableSymbol};
use indexmap::IndexMap;
use std::rc::Rc;

/// Either kind of declarable symbol. Variables and functions share one
/// namespace within a scope.
#[derive(Debug, Clone)]
enum Symbol {
    Variable(Rc<VariableSymbol>),
    Function(Rc<FunctionSymbol>),
}

/// A mapping from name to symbol, chained to an enclosing scope.
///
/// `try_declare_*` only consults this scope's own table, so shadowing an
/// outer declaration is legal. Lookups walk the chain outward. Insertion
/// order is preserved so `declared_variables`/`declared_functions` report
/// symbols in declaration order.
#[derive(Debug, Default)]
pub struct BoundScope {
    parent: Option<Box<BoundScope>>,
    symbols: IndexMap<String, Symbol>,
}

impl BoundScope {
    pub fn new(parent: Option<Box<BoundScope>>) -> Self {
        Self {
            parent,
            symbols: IndexMap::new(),
        }
    }

    /// Detach and return the parent scope, if any.
    pub fn take_parent(&mut self) -> Option<Box<BoundScope>> {
        self.parent.take()
    }

    /// Declare a variable in this scope. Returns false without mutating
    /// anything if the name is already taken here, by either a variable
    /// or a function.
    pub fn try_declare_variable(&mut self, variable: Rc<VariableSymbol>) -> bool {
        self.try_declare(variable.name.clone(), Symbol::Variable(variable))
    }

    pub fn try_declare_function(&mut self, function: Rc<FunctionSymbol>) -> bool {
        self.try_declare(function.name.clone(), Symbol::Function(function))
    }

    fn try_declare(&mut self, name: String, symbol: Symbol) -> bool {
        if self.symbols.contains_key(&name) {
            return false;
        }
        self.symbols.insert(name, symbol);
        true
    }

    /// Resolve a name to the nearest enclosing variable declaration.
    pub fn lookup_variable(&self, name: &str) -> Option<Rc<VariableSymbol>> {
        match self.symbols.get(name) {
            Some(Symbol::Variable(variable)) => Some(Rc::clone(variable)),
            Some(Symbol::Function(_)) => None,
            None => self.parent.as_ref()?.lookup_variable(name),
        }
    }

    pub fn lookup_function(&self, name: &str) -> Option<Rc<FunctionSymbol>> {
        match self.symbols.get(name) {
            Some(Symbol::Function(function)) => Some(Rc::clone(function)),
            Some(Symbol::Variable(_)) => None,
            None => self.parent.as_ref()?.lookup_function(name),
        }
    }

    /// The variables declared directly in this scope, in declaration
    /// order. Ancestors are not included.
    pub fn declared_variables(&self) -> Vec<Rc<VariableSymbol>> {
        self.symbols
            .values()
            .filter_map(|symbol| match symbol {
                Symbol::Variable(variable) => Some(Rc::clone(variable)),
                Symbol::Function(_) => None,
            })
            .collect()
    }

    pub fn declared_functions(&self) -> Vec<Rc<FunctionSymbol>> {
        self.symbols
            .values()
            .filter_map(|symbol| match symbol {
                Symbol::Function(function) => Some(Rc::clone(function)),
                Symbol::Variable(_) => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::VariableKind;
    use crate::types::Type;

    fn variable(name: &str) -> Rc<VariableSymbol> {
        Rc::new(VariableSymbol::new(name, VariableKind::Global, false, Type::Int))
    }

    #[test]
    fn test_redeclaration_in_same_scope_fails() {
        let mut scope = BoundScope::new(None);
        assert!(scope.try_declare_variable(variable("x")));
        assert!(!scope.try_declare_variable(variable("x")));
    }

    #[test]
    fn test_nested_scope_shadows_outer() {
        let mut outer = BoundScope::new(None);
        let outer_x = variable("x");
        assert!(outer.try_declare_variable(Rc::clone(&outer_x)));

        let mut inner = BoundScope::new(Some(Box::new(outer)));
        let inner_x = variable("x");
        assert!(inner.try_declare_variable(Rc::clone(&inner_x)));
        assert_eq!(inner.lookup_variable("x"), Some(inner_x));
    }

    #[test]
    fn test_lookup_walks_chain() {
        let mut outer = BoundScope::new(None);
        let x = variable("x");
        assert!(outer.try_declare_variable(Rc::clone(&x)));
        let inner = BoundScope::new(Some(Box::new(outer)));
        assert_eq!(inner.lookup_variable("x"), Some(x));
        assert_eq!(inner.lookup_variable("y"), None);
    }

    #[test]
    fn test_variables_and_functions_share_namespace() {
        let mut scope = BoundScope::new(None);
        assert!(scope.try_declare_function(crate::symbol::builtins::print()));
        assert!(!scope.try_declare_variable(variable("print")));
    }

    #[test]
    fn test_declared_variables_excludes_ancestors() {
        let mut outer = BoundScope::new(None);
        assert!(outer.try_declare_variable(variable("a")));
        let mut inner = BoundScope::new(Some(Box::new(outer)));
        assert!(inner.try_declare_variable(variable("b")));
        let declared = inner.declared_variables();
        assert_eq!(declared.len(), 1);
        assert_eq!(declared[0].name, "b");
    }
}

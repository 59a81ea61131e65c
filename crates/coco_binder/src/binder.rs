//! The binder.
//!
//! Walks a syntax tree bottom-up and produces a bound tree in which every
//! expression carries a resolved static type. Binding never fails: name
//! resolution or type errors are reported to the diagnostic bag and the
//! offending subtree becomes an error-typed placeholder, so a single root
//! cause cannot cascade into a pile of follow-on diagnostics.

use crate::bound::{BoundExpression, BoundLabel, BoundStatement, Constant};
use crate::operators::{BoundBinaryOperator, BoundUnaryOperator};
use crate::scope::BoundScope;
use crate::symbol::{builtins, FunctionSymbol, VariableKind, VariableSymbol};
use crate::types::{Conversion, Type};
use coco_ast::node::*;
use coco_ast::tree::SyntaxTree;
use coco_core::text::TextSpan;
use coco_diagnostics::{Diagnostic, DiagnosticBag};
use std::rc::Rc;

/// The result of binding one submission's top level: the symbols it
/// declared, its bound global statements, and a link to the previous
/// submission so scopes accumulate across an incremental session.
#[derive(Debug)]
pub struct BoundGlobalScope {
    pub previous: Option<Rc<BoundGlobalScope>>,
    pub diagnostics: Vec<Diagnostic>,
    pub variables: Vec<Rc<VariableSymbol>>,
    pub functions: Vec<Rc<FunctionSymbol>>,
    pub statements: Vec<BoundStatement>,
}

impl BoundGlobalScope {
    /// Every function declared by this submission or any earlier one,
    /// oldest first.
    pub fn all_functions(&self) -> Vec<Rc<FunctionSymbol>> {
        let mut chain = Vec::new();
        let mut current = Some(self);
        while let Some(scope) = current {
            chain.push(scope);
            current = scope.previous.as_deref();
        }
        let mut functions = Vec::new();
        for scope in chain.into_iter().rev() {
            functions.extend(scope.functions.iter().cloned());
        }
        functions
    }
}

/// Bind the top level of one submission against the accumulated scope of
/// all previous submissions.
pub fn bind_global_scope(
    previous: Option<Rc<BoundGlobalScope>>,
    tree: &SyntaxTree,
) -> BoundGlobalScope {
    let parent = create_parent_scope(previous.as_deref());
    let mut binder = Binder::new(parent, None);

    // Declare every function first so global statements and function
    // bodies may call functions declared later in the text.
    for member in &tree.root().members {
        if let Member::Function(declaration) = member {
            binder.bind_function_declaration(declaration);
        }
    }

    let mut statements = Vec::new();
    for member in &tree.root().members {
        if let Member::GlobalStatement(statement) = member {
            statements.push(binder.bind_statement(statement));
        }
    }

    let variables = binder.scope.declared_variables();
    let functions = binder.scope.declared_functions();

    // Diagnostics from earlier submissions stay visible when chaining.
    let mut diagnostics = previous
        .as_ref()
        .map(|scope| scope.diagnostics.clone())
        .unwrap_or_default();
    diagnostics.extend(binder.diagnostics.into_vec());

    BoundGlobalScope {
        previous,
        diagnostics,
        variables,
        functions,
        statements,
    }
}

/// Bind the body of a declared function against the full accumulated
/// scope. Returns the bound body and the diagnostics it produced.
pub fn bind_function_body(
    global_scope: &Rc<BoundGlobalScope>,
    function: &Rc<FunctionSymbol>,
) -> (BoundStatement, Vec<Diagnostic>) {
    let Some(declaration) = function.declaration.clone() else {
        // Builtins have no body to bind.
        return (BoundStatement::Block(Vec::new()), Vec::new());
    };
    let parent = create_parent_scope(Some(global_scope));
    let mut binder = Binder::new(parent, Some(Rc::clone(function)));
    binder.push_scope();
    for parameter in &function.parameters {
        binder.scope.try_declare_variable(Rc::clone(parameter));
    }
    let body = binder.bind_statement(&declaration.body);
    (body, binder.diagnostics.into_vec())
}

/// Build the scope chain for a new submission: the builtin functions at
/// the root, then one scope per earlier submission, oldest outermost.
fn create_parent_scope(previous: Option<&BoundGlobalScope>) -> BoundScope {
    let mut submissions = Vec::new();
    let mut current = previous;
    while let Some(scope) = current {
        submissions.push(scope);
        current = scope.previous.as_deref();
    }

    let mut parent = create_root_scope();
    while let Some(submission) = submissions.pop() {
        let mut scope = BoundScope::new(Some(Box::new(parent)));
        for function in &submission.functions {
            scope.try_declare_function(Rc::clone(function));
        }
        for variable in &submission.variables {
            scope.try_declare_variable(Rc::clone(variable));
        }
        parent = scope;
    }
    parent
}

fn create_root_scope() -> BoundScope {
    let mut scope = BoundScope::new(None);
    for function in builtins::all() {
        scope.try_declare_function(function);
    }
    scope
}

struct Binder {
    scope: BoundScope,
    diagnostics: DiagnosticBag,
    function: Option<Rc<FunctionSymbol>>,
    /// (break, continue) label pairs for the enclosing loops, innermost
    /// last.
    loop_labels: Vec<(BoundLabel, BoundLabel)>,
    label_counter: u32,
}

impl Binder {
    fn new(parent: BoundScope, function: Option<Rc<FunctionSymbol>>) -> Self {
        Self {
            scope: BoundScope::new(Some(Box::new(parent))),
            diagnostics: DiagnosticBag::new(),
            function,
            loop_labels: Vec::new(),
            label_counter: 0,
        }
    }

    fn push_scope(&mut self) {
        let current = std::mem::take(&mut self.scope);
        self.scope = BoundScope::new(Some(Box::new(current)));
    }

    fn pop_scope(&mut self) {
        if let Some(parent) = self.scope.take_parent() {
            self.scope = *parent;
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn bind_function_declaration(&mut self, declaration: &Rc<FunctionDeclaration>) {
        let mut parameters: Vec<Rc<VariableSymbol>> = Vec::new();
        for parameter in &declaration.parameters {
            let name = parameter.identifier.text.clone();
            let ty = self
                .bind_type_clause(&parameter.type_clause)
                .unwrap_or(Type::Error);
            if parameters.iter().any(|p| p.name == name) {
                self.diagnostics
                    .report_parameter_already_declared(parameter.identifier.span, &name);
                continue;
            }
            parameters.push(Rc::new(VariableSymbol::new(
                name,
                VariableKind::Parameter,
                true,
                ty,
            )));
        }

        let return_type = declaration
            .type_clause
            .as_ref()
            .map(|clause| self.bind_type_clause(clause).unwrap_or(Type::Error))
            .unwrap_or(Type::Void);

        let function = Rc::new(FunctionSymbol::new(
            declaration.identifier.text.clone(),
            parameters,
            return_type,
            Rc::clone(declaration),
        ));
        if !self.scope.try_declare_function(Rc::clone(&function)) {
            self.diagnostics
                .report_symbol_already_declared(declaration.identifier.span, &function.name);
        }
    }

    fn bind_type_clause(&mut self, clause: &TypeClause) -> Option<Type> {
        let ty = Type::lookup(&clause.identifier.text);
        if ty.is_none() && !clause.identifier.is_missing {
            self.diagnostics
                .report_undefined_type(clause.identifier.span, &clause.identifier.text);
        }
        ty
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn bind_statement(&mut self, statement: &Statement) -> BoundStatement {
        match statement {
            Statement::Block(block) => self.bind_block_statement(block),
            Statement::VariableDeclaration(declaration) => {
                self.bind_variable_declaration(declaration)
            }
            Statement::If(if_statement) => self.bind_if_statement(if_statement),
            Statement::While(while_statement) => self.bind_while_statement(while_statement),
            Statement::DoWhile(do_while) => self.bind_do_while_statement(do_while),
            Statement::For(for_statement) => self.bind_for_statement(for_statement),
            Statement::Break(break_statement) => self.bind_break_statement(break_statement),
            Statement::Continue(continue_statement) => {
                self.bind_continue_statement(continue_statement)
            }
            Statement::Return(return_statement) => self.bind_return_statement(return_statement),
            Statement::Expression(expression_statement) => BoundStatement::Expression(
                self.bind_expression(&expression_statement.expression, true),
            ),
        }
    }

    fn bind_block_statement(&mut self, block: &BlockStatement) -> BoundStatement {
        self.push_scope();
        let statements = block
            .statements
            .iter()
            .map(|statement| self.bind_statement(statement))
            .collect();
        self.pop_scope();
        BoundStatement::Block(statements)
    }

    fn bind_variable_declaration(
        &mut self,
        declaration: &VariableDeclarationStatement,
    ) -> BoundStatement {
        let is_read_only = declaration.keyword.kind == coco_ast::SyntaxKind::LetKeyword;
        let declared_type = declaration
            .type_clause
            .as_ref()
            .and_then(|clause| self.bind_type_clause(clause));
        let initializer = self.bind_expression(&declaration.initializer, false);
        let variable_type = declared_type.unwrap_or_else(|| initializer.ty());
        let initializer = self.convert(
            initializer,
            variable_type,
            declaration.initializer.span(),
            false,
        );
        let variable = self.declare_variable(&declaration.identifier, is_read_only, variable_type);
        BoundStatement::VariableDeclaration {
            variable,
            initializer,
        }
    }

    fn declare_variable(
        &mut self,
        identifier: &coco_ast::Token,
        is_read_only: bool,
        ty: Type,
    ) -> Rc<VariableSymbol> {
        let kind = if self.function.is_none() {
            VariableKind::Global
        } else {
            VariableKind::Local
        };
        let variable = Rc::new(VariableSymbol::new(
            identifier.text.clone(),
            kind,
            is_read_only,
            ty,
        ));
        let declared = self.scope.try_declare_variable(Rc::clone(&variable));
        if !declared && !identifier.is_missing {
            self.diagnostics
                .report_symbol_already_declared(identifier.span, &variable.name);
        }
        variable
    }

    fn bind_if_statement(&mut self, if_statement: &IfStatement) -> BoundStatement {
        let condition = self.bind_condition(&if_statement.condition);
        let then_branch = Box::new(self.bind_statement(&if_statement.then_statement));
        let else_branch = if_statement
            .else_clause
            .as_ref()
            .map(|clause| Box::new(self.bind_statement(&clause.else_statement)));
        BoundStatement::If {
            condition,
            then_branch,
            else_branch,
        }
    }

    fn bind_while_statement(&mut self, while_statement: &WhileStatement) -> BoundStatement {
        let condition = self.bind_condition(&while_statement.condition);
        let (body, break_label, continue_label) = self.bind_loop_body(&while_statement.body);
        BoundStatement::While {
            condition,
            body: Box::new(body),
            break_label,
            continue_label,
        }
    }

    fn bind_do_while_statement(&mut self, do_while: &DoWhileStatement) -> BoundStatement {
        let (body, break_label, continue_label) = self.bind_loop_body(&do_while.body);
        let condition = self.bind_condition(&do_while.condition);
        BoundStatement::DoWhile {
            body: Box::new(body),
            condition,
            break_label,
            continue_label,
        }
    }

    fn bind_for_statement(&mut self, for_statement: &ForStatement) -> BoundStatement {
        let lower_bound = self.bind_converted(&for_statement.lower_bound, Type::Int);
        let upper_bound = self.bind_converted(&for_statement.upper_bound, Type::Int);

        // The loop variable lives in its own scope covering only the loop.
        self.push_scope();
        let variable = self.declare_variable(&for_statement.identifier, true, Type::Int);
        let (body, break_label, continue_label) = self.bind_loop_body(&for_statement.body);
        self.pop_scope();

        BoundStatement::For {
            variable,
            lower_bound,
            upper_bound,
            body: Box::new(body),
            break_label,
            continue_label,
        }
    }

    fn bind_loop_body(&mut self, body: &Statement) -> (BoundStatement, BoundLabel, BoundLabel) {
        self.label_counter += 1;
        let break_label = BoundLabel::new(format!("break{}", self.label_counter));
        let continue_label = BoundLabel::new(format!("continue{}", self.label_counter));
        self.loop_labels
            .push((break_label.clone(), continue_label.clone()));
        let bound = self.bind_statement(body);
        self.loop_labels.pop();
        (bound, break_label, continue_label)
    }

    fn bind_break_statement(&mut self, break_statement: &BreakStatement) -> BoundStatement {
        match self.loop_labels.last() {
            Some((break_label, _)) => BoundStatement::Goto(break_label.clone()),
            None => {
                self.diagnostics
                    .report_invalid_break_or_continue(break_statement.keyword.span, "break");
                self.error_statement()
            }
        }
    }

    fn bind_continue_statement(&mut self, continue_statement: &ContinueStatement) -> BoundStatement {
        match self.loop_labels.last() {
            Some((_, continue_label)) => BoundStatement::Goto(continue_label.clone()),
            None => {
                self.diagnostics
                    .report_invalid_break_or_continue(continue_statement.keyword.span, "continue");
                self.error_statement()
            }
        }
    }

    fn bind_return_statement(&mut self, return_statement: &ReturnStatement) -> BoundStatement {
        let expression = return_statement
            .expression
            .as_ref()
            .map(|expression| (self.bind_expression(expression, false), expression.span()));

        let expression = match self.function.clone() {
            None => {
                self.diagnostics
                    .report_invalid_return(return_statement.keyword.span);
                None
            }
            Some(function) if function.return_type == Type::Void => {
                if let Some((_, span)) = &expression {
                    self.diagnostics
                        .report_invalid_return_expression(*span, &function.name);
                }
                None
            }
            Some(function) => match expression {
                None => {
                    self.diagnostics.report_missing_return_expression(
                        return_statement.keyword.span,
                        function.return_type,
                    );
                    None
                }
                Some((bound, span)) => {
                    Some(self.convert(bound, function.return_type, span, false))
                }
            },
        };
        BoundStatement::Return(expression)
    }

    fn error_statement(&self) -> BoundStatement {
        BoundStatement::Expression(BoundExpression::Error)
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn bind_condition(&mut self, syntax: &Expression) -> BoundExpression {
        self.bind_converted(syntax, Type::Bool)
    }

    fn bind_converted(&mut self, syntax: &Expression, ty: Type) -> BoundExpression {
        let expression = self.bind_expression(syntax, false);
        self.convert(expression, ty, syntax.span(), false)
    }

    fn bind_expression(&mut self, syntax: &Expression, can_be_void: bool) -> BoundExpression {
        let bound = self.bind_expression_internal(syntax);
        if !can_be_void && bound.ty() == Type::Void {
            self.diagnostics
                .report_expression_must_have_value(syntax.span());
            return BoundExpression::Error;
        }
        bound
    }

    fn bind_expression_internal(&mut self, syntax: &Expression) -> BoundExpression {
        match syntax {
            Expression::Literal(literal) => self.bind_literal(literal),
            Expression::Name(name) => self.bind_name(name),
            Expression::Assignment(assignment) => self.bind_assignment(assignment),
            Expression::Unary(unary) => self.bind_unary(unary),
            Expression::Binary(binary) => self.bind_binary(binary),
            Expression::Call(call) => self.bind_call(call),
            Expression::Parenthesized(parenthesized) => {
                self.bind_expression_internal(&parenthesized.expression)
            }
        }
    }

    fn bind_literal(&mut self, literal: &LiteralExpression) -> BoundExpression {
        let constant = match &literal.value {
            LiteralValue::Bool(value) => Constant::Bool(*value),
            LiteralValue::Int(value) => Constant::Int(*value),
            LiteralValue::String(value) => Constant::String(Rc::from(value.as_str())),
        };
        BoundExpression::Literal(constant)
    }

    fn bind_name(&mut self, name: &NameExpression) -> BoundExpression {
        if name.identifier.is_missing {
            // The parser already reported the missing token.
            return BoundExpression::Error;
        }
        match self.scope.lookup_variable(&name.identifier.text) {
            Some(variable) => BoundExpression::Variable(variable),
            None => {
                self.diagnostics
                    .report_undefined_name(name.identifier.span, &name.identifier.text);
                BoundExpression::Error
            }
        }
    }

    fn bind_assignment(&mut self, assignment: &AssignmentExpression) -> BoundExpression {
        let bound = self.bind_expression(&assignment.expression, false);
        let Some(variable) = self.scope.lookup_variable(&assignment.identifier.text) else {
            self.diagnostics
                .report_undefined_name(assignment.identifier.span, &assignment.identifier.text);
            return bound;
        };
        if variable.is_read_only {
            self.diagnostics
                .report_cannot_assign(assignment.equals.span, &variable.name);
        }
        // The assignment still binds so the surrounding expression keeps
        // the variable's type.
        let converted = self.convert(bound, variable.ty, assignment.expression.span(), false);
        BoundExpression::Assignment {
            variable,
            expression: Box::new(converted),
        }
    }

    fn bind_unary(&mut self, unary: &UnaryExpression) -> BoundExpression {
        let operand = self.bind_expression(&unary.operand, false);
        if operand.ty() == Type::Error {
            return BoundExpression::Error;
        }
        match BoundUnaryOperator::bind(unary.operator.kind, operand.ty()) {
            Some(operator) => BoundExpression::Unary {
                operator,
                operand: Box::new(operand),
            },
            None => {
                self.diagnostics.report_undefined_unary_operator(
                    unary.operator.span,
                    &unary.operator.text,
                    operand.ty(),
                );
                BoundExpression::Error
            }
        }
    }

    fn bind_binary(&mut self, binary: &BinaryExpression) -> BoundExpression {
        let left = self.bind_expression(&binary.left, false);
        let right = self.bind_expression(&binary.right, false);
        if left.ty() == Type::Error || right.ty() == Type::Error {
            return BoundExpression::Error;
        }
        match BoundBinaryOperator::bind(binary.operator.kind, left.ty(), right.ty()) {
            Some(operator) => BoundExpression::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
            None => {
                self.diagnostics.report_undefined_binary_operator(
                    binary.operator.span,
                    &binary.operator.text,
                    left.ty(),
                    right.ty(),
                );
                BoundExpression::Error
            }
        }
    }

    fn bind_call(&mut self, call: &CallExpression) -> BoundExpression {
        // A single-argument call on a type name is conversion syntax,
        // e.g. `int("42")`.
        if call.arguments.len() == 1 {
            if let Some(ty) = Type::lookup(&call.identifier.text) {
                let argument = self.bind_expression(&call.arguments[0], false);
                return self.convert(argument, ty, call.arguments[0].span(), true);
            }
        }

        if call.identifier.is_missing {
            return BoundExpression::Error;
        }

        // Arguments are bound up front so names inside them are resolved
        // and diagnosed even when the call itself is malformed.
        let mut arguments = Vec::with_capacity(call.arguments.len());
        for argument in &call.arguments {
            arguments.push(self.bind_expression(argument, false));
        }

        let Some(function) = self.scope.lookup_function(&call.identifier.text) else {
            self.diagnostics
                .report_undefined_function(call.identifier.span, &call.identifier.text);
            return BoundExpression::Error;
        };

        if arguments.len() != function.parameters.len() {
            let span = call.identifier.span.union(&call.close_paren.span);
            self.diagnostics.report_wrong_argument_count(
                span,
                &function.name,
                function.parameters.len(),
                arguments.len(),
            );
            return BoundExpression::Error;
        }

        let mut has_errors = false;
        for ((argument, bound), parameter) in
            call.arguments.iter().zip(&arguments).zip(&function.parameters)
        {
            if bound.ty() == parameter.ty {
                continue;
            }
            if bound.ty() != Type::Error {
                self.diagnostics.report_wrong_argument_type(
                    argument.span(),
                    &parameter.name,
                    parameter.ty,
                    bound.ty(),
                );
            }
            has_errors = true;
        }
        if has_errors {
            return BoundExpression::Error;
        }
        BoundExpression::Call {
            function,
            arguments,
        }
    }

    /// Wrap an expression in a conversion to the target type, or report
    /// why no such conversion is allowed. Never reports when either side
    /// is already error-typed.
    fn convert(
        &mut self,
        expression: BoundExpression,
        ty: Type,
        span: TextSpan,
        allow_explicit: bool,
    ) -> BoundExpression {
        let conversion = Conversion::classify(expression.ty(), ty);
        match conversion {
            Conversion::None => {
                if expression.ty() != Type::Error && ty != Type::Error {
                    self.diagnostics
                        .report_cannot_convert(span, expression.ty(), ty);
                }
                BoundExpression::Error
            }
            Conversion::Explicit if !allow_explicit => {
                self.diagnostics
                    .report_cannot_convert_implicitly(span, expression.ty(), ty);
                BoundExpression::Error
            }
            Conversion::Identity => expression,
            Conversion::Implicit | Conversion::Explicit => BoundExpression::Conversion {
                ty,
                expression: Box::new(expression),
            },
        }
    }
}

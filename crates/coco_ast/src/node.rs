//! The syntax tree node definitions.
//!
//! One closed tagged union per tree (members, statements, expressions)
//! instead of an open class hierarchy: dispatch over node kinds in the
//! binder is exhaustiveness-checked at compile time. Every node exposes
//! `span()`, the source range diagnostics attach to.

use crate::token::Token;
use coco_core::text::TextSpan;
use std::rc::Rc;

/// The root of a parsed source text: a sequence of members.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub members: Vec<Member>,
    pub end_of_file: Token,
}

/// A top-level member: a function declaration or a global statement.
#[derive(Debug, Clone)]
pub enum Member {
    Function(Rc<FunctionDeclaration>),
    GlobalStatement(Statement),
}

#[derive(Debug, Clone)]
pub struct FunctionDeclaration {
    pub function_keyword: Token,
    pub identifier: Token,
    pub open_paren: Token,
    pub parameters: Vec<ParameterSyntax>,
    pub close_paren: Token,
    pub type_clause: Option<TypeClause>,
    pub body: Statement,
}

impl FunctionDeclaration {
    pub fn span(&self) -> TextSpan {
        self.function_keyword.span.union(&self.body.span())
    }
}

#[derive(Debug, Clone)]
pub struct ParameterSyntax {
    pub identifier: Token,
    pub type_clause: TypeClause,
}

impl ParameterSyntax {
    pub fn span(&self) -> TextSpan {
        self.identifier.span.union(&self.type_clause.span())
    }
}

/// `: typename`, on parameters, variable declarations, and function
/// return types.
#[derive(Debug, Clone)]
pub struct TypeClause {
    pub colon: Token,
    pub identifier: Token,
}

impl TypeClause {
    pub fn span(&self) -> TextSpan {
        self.colon.span.union(&self.identifier.span)
    }
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone)]
pub enum Statement {
    Block(BlockStatement),
    VariableDeclaration(VariableDeclarationStatement),
    If(IfStatement),
    While(WhileStatement),
    DoWhile(DoWhileStatement),
    For(ForStatement),
    Break(BreakStatement),
    Continue(ContinueStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
}

impl Statement {
    pub fn span(&self) -> TextSpan {
        match self {
            Statement::Block(s) => s.open_brace.span.union(&s.close_brace.span),
            Statement::VariableDeclaration(s) => s.keyword.span.union(&s.initializer.span()),
            Statement::If(s) => {
                let end = match &s.else_clause {
                    Some(else_clause) => else_clause.else_statement.span(),
                    None => s.then_statement.span(),
                };
                s.if_keyword.span.union(&end)
            }
            Statement::While(s) => s.while_keyword.span.union(&s.body.span()),
            Statement::DoWhile(s) => s.do_keyword.span.union(&s.condition.span()),
            Statement::For(s) => s.for_keyword.span.union(&s.body.span()),
            Statement::Break(s) => s.keyword.span,
            Statement::Continue(s) => s.keyword.span,
            Statement::Return(s) => match &s.expression {
                Some(expression) => s.keyword.span.union(&expression.span()),
                None => s.keyword.span,
            },
            Statement::Expression(s) => s.expression.span(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BlockStatement {
    pub open_brace: Token,
    pub statements: Vec<Statement>,
    pub close_brace: Token,
}

#[derive(Debug, Clone)]
pub struct VariableDeclarationStatement {
    /// `var` or `let`.
    pub keyword: Token,
    pub identifier: Token,
    pub type_clause: Option<TypeClause>,
    pub equals: Token,
    pub initializer: Expression,
}

#[derive(Debug, Clone)]
pub struct IfStatement {
    pub if_keyword: Token,
    pub condition: Expression,
    pub then_statement: Box<Statement>,
    pub else_clause: Option<ElseClause>,
}

#[derive(Debug, Clone)]
pub struct ElseClause {
    pub else_keyword: Token,
    pub else_statement: Box<Statement>,
}

#[derive(Debug, Clone)]
pub struct WhileStatement {
    pub while_keyword: Token,
    pub condition: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone)]
pub struct DoWhileStatement {
    pub do_keyword: Token,
    pub body: Box<Statement>,
    pub while_keyword: Token,
    pub condition: Expression,
}

#[derive(Debug, Clone)]
pub struct ForStatement {
    pub for_keyword: Token,
    pub identifier: Token,
    pub equals: Token,
    pub lower_bound: Expression,
    pub to_keyword: Token,
    pub upper_bound: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone)]
pub struct BreakStatement {
    pub keyword: Token,
}

#[derive(Debug, Clone)]
pub struct ContinueStatement {
    pub keyword: Token,
}

#[derive(Debug, Clone)]
pub struct ReturnStatement {
    pub keyword: Token,
    pub expression: Option<Expression>,
}

#[derive(Debug, Clone)]
pub struct ExpressionStatement {
    pub expression: Expression,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone)]
pub enum Expression {
    Literal(LiteralExpression),
    Name(NameExpression),
    Assignment(AssignmentExpression),
    Unary(UnaryExpression),
    Binary(BinaryExpression),
    Call(CallExpression),
    Parenthesized(ParenthesizedExpression),
}

impl Expression {
    pub fn span(&self) -> TextSpan {
        match self {
            Expression::Literal(e) => e.token.span,
            Expression::Name(e) => e.identifier.span,
            Expression::Assignment(e) => e.identifier.span.union(&e.expression.span()),
            Expression::Unary(e) => e.operator.span.union(&e.operand.span()),
            Expression::Binary(e) => e.left.span().union(&e.right.span()),
            Expression::Call(e) => e.identifier.span.union(&e.close_paren.span),
            Expression::Parenthesized(e) => e.open_paren.span.union(&e.close_paren.span),
        }
    }
}

/// The value of a literal expression, computed by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Bool(bool),
    Int(i64),
    String(String),
}

#[derive(Debug, Clone)]
pub struct LiteralExpression {
    pub token: Token,
    pub value: LiteralValue,
}

#[derive(Debug, Clone)]
pub struct NameExpression {
    pub identifier: Token,
}

#[derive(Debug, Clone)]
pub struct AssignmentExpression {
    pub identifier: Token,
    pub equals: Token,
    pub expression: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct UnaryExpression {
    pub operator: Token,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct BinaryExpression {
    pub left: Box<Expression>,
    pub operator: Token,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct CallExpression {
    pub identifier: Token,
    pub open_paren: Token,
    pub arguments: Vec<Expression>,
    pub close_paren: Token,
}

#[derive(Debug, Clone)]
pub struct ParenthesizedExpression {
    pub open_paren: Token,
    pub expression: Box<Expression>,
    pub close_paren: Token,
}

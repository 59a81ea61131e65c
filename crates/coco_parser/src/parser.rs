//! The parser.
//!
//! A recursive-descent parser over the scanner's token stream. Expressions
//! use precedence climbing driven by the operator tables on `SyntaxKind`.
//! On an unexpected token the parser reports a diagnostic and fabricates a
//! zero-width missing token of the expected kind, so it always produces a
//! complete tree.

use coco_ast::node::*;
use coco_ast::syntax_kind::SyntaxKind;
use coco_ast::token::{Token, TokenValue};
use coco_ast::tree::SyntaxTree;
use coco_core::text::LineMap;
use coco_diagnostics::DiagnosticBag;
use std::rc::Rc;

/// Parse source text into a syntax tree. Scanner and parser diagnostics
/// are merged into the tree, in that order.
pub fn parse(text: impl Into<String>) -> SyntaxTree {
    let text = text.into();
    let (tokens, scan_diagnostics) = coco_scanner::scan(&text);
    let mut parser = Parser::new(&text, tokens);
    let root = parser.parse_compilation_unit();
    let mut diagnostics = scan_diagnostics.into_vec();
    diagnostics.extend(parser.diagnostics.into_vec());
    SyntaxTree::new(text, root, diagnostics)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    line_map: LineMap,
    diagnostics: DiagnosticBag,
}

impl Parser {
    fn new(text: &str, tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(
            tokens.last().map(|t| t.kind),
            Some(SyntaxKind::EndOfFile)
        ));
        Self {
            tokens,
            pos: 0,
            line_map: LineMap::new(text),
            diagnostics: DiagnosticBag::new(),
        }
    }

    fn peek(&self, offset: usize) -> &Token {
        let index = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn current(&self) -> &Token {
        self.peek(0)
    }

    fn next_token(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it has the expected kind; otherwise
    /// report a diagnostic and fabricate a zero-width missing token so
    /// parsing can continue.
    fn match_token(&mut self, kind: SyntaxKind) -> Token {
        if self.current().kind == kind {
            return self.next_token();
        }
        let span = self.current().span;
        let actual = self.current().kind;
        self.diagnostics
            .report_unexpected_token(span, &format!("{actual}"), &format!("{kind}"));
        Token::missing(kind, span.start)
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn parse_compilation_unit(&mut self) -> CompilationUnit {
        let mut members = Vec::new();
        while self.current().kind != SyntaxKind::EndOfFile {
            let start_pos = self.pos;
            members.push(self.parse_member());
            // A member parse that consumed nothing means the current token
            // was already reported as unexpected. Skip it to avoid looping.
            if self.pos == start_pos {
                self.next_token();
            }
        }
        let end_of_file = self.match_token(SyntaxKind::EndOfFile);
        CompilationUnit {
            members,
            end_of_file,
        }
    }

    fn parse_member(&mut self) -> Member {
        if self.current().kind == SyntaxKind::FunctionKeyword {
            Member::Function(Rc::new(self.parse_function_declaration()))
        } else {
            Member::GlobalStatement(self.parse_statement())
        }
    }

    fn parse_function_declaration(&mut self) -> FunctionDeclaration {
        let function_keyword = self.match_token(SyntaxKind::FunctionKeyword);
        let identifier = self.match_token(SyntaxKind::Identifier);
        let open_paren = self.match_token(SyntaxKind::OpenParen);
        let parameters = self.parse_parameter_list();
        let close_paren = self.match_token(SyntaxKind::CloseParen);
        let type_clause = self.parse_optional_type_clause();
        let body = self.parse_block_statement();
        FunctionDeclaration {
            function_keyword,
            identifier,
            open_paren,
            parameters,
            close_paren,
            type_clause,
            body,
        }
    }

    fn parse_parameter_list(&mut self) -> Vec<ParameterSyntax> {
        let mut parameters = Vec::new();
        let mut expect_parameter = true;
        while expect_parameter
            && self.current().kind != SyntaxKind::CloseParen
            && self.current().kind != SyntaxKind::EndOfFile
        {
            let identifier = self.match_token(SyntaxKind::Identifier);
            let type_clause = self.parse_type_clause();
            parameters.push(ParameterSyntax {
                identifier,
                type_clause,
            });
            if self.current().kind == SyntaxKind::Comma {
                self.next_token();
            } else {
                expect_parameter = false;
            }
        }
        parameters
    }

    fn parse_optional_type_clause(&mut self) -> Option<TypeClause> {
        if self.current().kind == SyntaxKind::Colon {
            Some(self.parse_type_clause())
        } else {
            None
        }
    }

    fn parse_type_clause(&mut self) -> TypeClause {
        let colon = self.match_token(SyntaxKind::Colon);
        let identifier = self.match_token(SyntaxKind::Identifier);
        TypeClause { colon, identifier }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_statement(&mut self) -> Statement {
        match self.current().kind {
            SyntaxKind::OpenBrace => self.parse_block_statement(),
            SyntaxKind::VarKeyword | SyntaxKind::LetKeyword => {
                self.parse_variable_declaration()
            }
            SyntaxKind::IfKeyword => self.parse_if_statement(),
            SyntaxKind::WhileKeyword => self.parse_while_statement(),
            SyntaxKind::DoKeyword => self.parse_do_while_statement(),
            SyntaxKind::ForKeyword => self.parse_for_statement(),
            SyntaxKind::BreakKeyword => Statement::Break(BreakStatement {
                keyword: self.next_token(),
            }),
            SyntaxKind::ContinueKeyword => Statement::Continue(ContinueStatement {
                keyword: self.next_token(),
            }),
            SyntaxKind::ReturnKeyword => self.parse_return_statement(),
            _ => Statement::Expression(ExpressionStatement {
                expression: self.parse_expression(),
            }),
        }
    }

    fn parse_block_statement(&mut self) -> Statement {
        let open_brace = self.match_token(SyntaxKind::OpenBrace);
        let mut statements = Vec::new();
        while self.current().kind != SyntaxKind::CloseBrace
            && self.current().kind != SyntaxKind::EndOfFile
        {
            let start_pos = self.pos;
            statements.push(self.parse_statement());
            if self.pos == start_pos {
                self.next_token();
            }
        }
        let close_brace = self.match_token(SyntaxKind::CloseBrace);
        Statement::Block(BlockStatement {
            open_brace,
            statements,
            close_brace,
        })
    }

    fn parse_variable_declaration(&mut self) -> Statement {
        let keyword = self.next_token();
        let identifier = self.match_token(SyntaxKind::Identifier);
        let type_clause = self.parse_optional_type_clause();
        let equals = self.match_token(SyntaxKind::Equals);
        let initializer = self.parse_expression();
        Statement::VariableDeclaration(VariableDeclarationStatement {
            keyword,
            identifier,
            type_clause,
            equals,
            initializer,
        })
    }

    fn parse_if_statement(&mut self) -> Statement {
        let if_keyword = self.match_token(SyntaxKind::IfKeyword);
        let condition = self.parse_expression();
        let then_statement = Box::new(self.parse_statement());
        let else_clause = if self.current().kind == SyntaxKind::ElseKeyword {
            let else_keyword = self.next_token();
            let else_statement = Box::new(self.parse_statement());
            Some(ElseClause {
                else_keyword,
                else_statement,
            })
        } else {
            None
        };
        Statement::If(IfStatement {
            if_keyword,
            condition,
            then_statement,
            else_clause,
        })
    }

    fn parse_while_statement(&mut self) -> Statement {
        let while_keyword = self.match_token(SyntaxKind::WhileKeyword);
        let condition = self.parse_expression();
        let body = Box::new(self.parse_statement());
        Statement::While(WhileStatement {
            while_keyword,
            condition,
            body,
        })
    }

    fn parse_do_while_statement(&mut self) -> Statement {
        let do_keyword = self.match_token(SyntaxKind::DoKeyword);
        let body = Box::new(self.parse_statement());
        let while_keyword = self.match_token(SyntaxKind::WhileKeyword);
        let condition = self.parse_expression();
        Statement::DoWhile(DoWhileStatement {
            do_keyword,
            body,
            while_keyword,
            condition,
        })
    }

    fn parse_for_statement(&mut self) -> Statement {
        let for_keyword = self.match_token(SyntaxKind::ForKeyword);
        let identifier = self.match_token(SyntaxKind::Identifier);
        let equals = self.match_token(SyntaxKind::Equals);
        let lower_bound = self.parse_expression();
        let to_keyword = self.match_token(SyntaxKind::ToKeyword);
        let upper_bound = self.parse_expression();
        let body = Box::new(self.parse_statement());
        Statement::For(ForStatement {
            for_keyword,
            identifier,
            equals,
            lower_bound,
            to_keyword,
            upper_bound,
            body,
        })
    }

    fn parse_return_statement(&mut self) -> Statement {
        let keyword = self.match_token(SyntaxKind::ReturnKeyword);
        // The return value, when present, must start on the same line as
        // the keyword. Anything on a following line is the next statement.
        let keyword_line = self.line_map.line_of(keyword.span.start);
        let current = self.current();
        let same_line = current.kind != SyntaxKind::EndOfFile
            && self.line_map.line_of(current.span.start) == keyword_line;
        let is_statement_end = matches!(
            current.kind,
            SyntaxKind::CloseBrace | SyntaxKind::EndOfFile
        );
        let expression = if same_line && !is_statement_end {
            Some(self.parse_expression())
        } else {
            None
        };
        Statement::Return(ReturnStatement {
            keyword,
            expression,
        })
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_expression(&mut self) -> Expression {
        self.parse_assignment_expression()
    }

    fn parse_assignment_expression(&mut self) -> Expression {
        // Assignment is right-associative, so recurse on the value side.
        if self.current().kind == SyntaxKind::Identifier
            && self.peek(1).kind == SyntaxKind::Equals
        {
            let identifier = self.next_token();
            let equals = self.next_token();
            let expression = Box::new(self.parse_assignment_expression());
            return Expression::Assignment(AssignmentExpression {
                identifier,
                equals,
                expression,
            });
        }
        self.parse_binary_expression(0)
    }

    fn parse_binary_expression(&mut self, parent_precedence: u8) -> Expression {
        let unary_precedence = self.current().kind.unary_operator_precedence();
        let mut left = if unary_precedence != 0 && unary_precedence >= parent_precedence {
            let operator = self.next_token();
            let operand = Box::new(self.parse_binary_expression(unary_precedence));
            Expression::Unary(UnaryExpression { operator, operand })
        } else {
            self.parse_primary_expression()
        };

        loop {
            let precedence = self.current().kind.binary_operator_precedence();
            if precedence == 0 || precedence <= parent_precedence {
                break;
            }
            let operator = self.next_token();
            let right = Box::new(self.parse_binary_expression(precedence));
            left = Expression::Binary(BinaryExpression {
                left: Box::new(left),
                operator,
                right,
            });
        }
        left
    }

    fn parse_primary_expression(&mut self) -> Expression {
        match self.current().kind {
            SyntaxKind::OpenParen => {
                let open_paren = self.next_token();
                let expression = Box::new(self.parse_expression());
                let close_paren = self.match_token(SyntaxKind::CloseParen);
                Expression::Parenthesized(ParenthesizedExpression {
                    open_paren,
                    expression,
                    close_paren,
                })
            }
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                let token = self.next_token();
                let value = LiteralValue::Bool(token.kind == SyntaxKind::TrueKeyword);
                Expression::Literal(LiteralExpression { token, value })
            }
            SyntaxKind::Number => {
                let token = self.next_token();
                let value = match token.value {
                    Some(TokenValue::Int(n)) => LiteralValue::Int(n),
                    _ => LiteralValue::Int(0),
                };
                Expression::Literal(LiteralExpression { token, value })
            }
            SyntaxKind::String => {
                let token = self.next_token();
                let value = match &token.value {
                    Some(TokenValue::String(s)) => LiteralValue::String(s.clone()),
                    _ => LiteralValue::String(String::new()),
                };
                Expression::Literal(LiteralExpression { token, value })
            }
            SyntaxKind::Identifier if self.peek(1).kind == SyntaxKind::OpenParen => {
                self.parse_call_expression()
            }
            _ => {
                let identifier = self.match_token(SyntaxKind::Identifier);
                Expression::Name(NameExpression { identifier })
            }
        }
    }

    fn parse_call_expression(&mut self) -> Expression {
        let identifier = self.match_token(SyntaxKind::Identifier);
        let open_paren = self.match_token(SyntaxKind::OpenParen);
        let mut arguments = Vec::new();
        let mut expect_argument = true;
        while expect_argument
            && self.current().kind != SyntaxKind::CloseParen
            && self.current().kind != SyntaxKind::EndOfFile
        {
            arguments.push(self.parse_expression());
            if self.current().kind == SyntaxKind::Comma {
                self.next_token();
            } else {
                expect_argument = false;
            }
        }
        let close_paren = self.match_token(SyntaxKind::CloseParen);
        Expression::Call(CallExpression {
            identifier,
            open_paren,
            arguments,
            close_paren,
        })
    }
}

// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing: the Pratt core, primaries, member/class access
//! chains, array accesses, function calls, chained conditions and
//! conditional assignments.

use crate::ast::{
    AccessChain, AccessLink, AccessOp, Argument, Expression, FunctionCall, Identifier, IncDecOp,
};
use crate::diagnostics::Diagnostic;
use crate::source_analysis::{Keyword, TokenKind};

use super::{InfixOp, Parser, infix_binding_power};

impl Parser {
    /// Parses a full expression, including comparisons and `and`/`or`
    /// connectives.
    pub(super) fn parse_expression(&mut self) -> Result<Expression, Diagnostic> {
        self.parse_expression_bp(0)
    }

    /// The Pratt loop: climbs while the next operator binds at least as
    /// tightly as `min_bp`.
    fn parse_expression_bp(&mut self, min_bp: u8) -> Result<Expression, Diagnostic> {
        let mut lhs = self.parse_primary()?;

        while let Some((op, power)) = infix_binding_power(self.current_kind()) {
            if power.left < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_expression_bp(power.right)?;
            let span = lhs.span().merge(rhs.span());
            lhs = match op {
                InfixOp::Arithmetic(op) => Expression::Binary {
                    op,
                    left: Box::new(lhs),
                    right: Box::new(rhs),
                    span,
                },
                InfixOp::Comparison(op) => Expression::Comparison {
                    op,
                    left: Box::new(lhs),
                    right: Box::new(rhs),
                    span,
                },
                InfixOp::Logical(op) => Expression::Logical {
                    op,
                    left: Box::new(lhs),
                    right: Box::new(rhs),
                    span,
                },
            };
        }

        Ok(lhs)
    }

    /// Parses a chained condition and rejects expressions that cannot act
    /// as one. A lone boolean literal counts as a full condition.
    pub(super) fn parse_condition(&mut self) -> Result<Expression, Diagnostic> {
        let condition = self.parse_expression()?;
        if condition.is_condition() {
            Ok(condition)
        } else {
            Err(self.syntax_mismatch("a condition"))
        }
    }

    /// Parses an expression that may be a conditional assignment
    /// `cond ? a : b`, with right-nested conditionals in both value
    /// positions.
    pub(super) fn parse_conditional_assignment(&mut self) -> Result<Expression, Diagnostic> {
        let first = self.parse_expression()?;
        if !self.eat(&TokenKind::Question) {
            return Ok(first);
        }

        let if_true = self.parse_conditional_assignment()?;
        self.expect(&TokenKind::Colon)?;
        let if_false = self.parse_conditional_assignment()?;
        let span = first.span().merge(if_false.span());
        Ok(Expression::Conditional {
            condition: Box::new(first),
            if_true: Box::new(if_true),
            if_false: Box::new(if_false),
            span,
        })
    }

    /// Parses the right-hand side of a declaration or return: instance
    /// creation, array creation, or a (possibly conditional) expression.
    pub(super) fn parse_initializer(&mut self) -> Result<Expression, Diagnostic> {
        match self.current_kind() {
            TokenKind::Keyword(Keyword::New) => self.parse_new(),
            TokenKind::LeftBrace => self.parse_array_literal(),
            _ => self.parse_conditional_assignment(),
        }
    }

    /// Parses `new ClassPath(args)`.
    fn parse_new(&mut self) -> Result<Expression, Diagnostic> {
        let new_token = self.advance();
        let target = self.parse_postfix_chain()?;
        let span = new_token.span().merge(target.span());
        Ok(Expression::New {
            target: Box::new(target),
            span,
        })
    }

    /// Parses a brace-delimited array creation `{a, b, c}`; nested braces
    /// create nested array literals.
    fn parse_array_literal(&mut self) -> Result<Expression, Diagnostic> {
        let open = self.expect(&TokenKind::LeftBrace)?;
        let mut elements = Vec::new();

        if !self.eat(&TokenKind::RightBrace) {
            loop {
                let element = if matches!(self.current_kind(), TokenKind::LeftBrace) {
                    self.parse_array_literal()?
                } else {
                    self.parse_expression()?
                };
                elements.push(element);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RightBrace)?;
        }

        let span = open.span().merge(self.previous_span());
        Ok(Expression::ArrayLiteral { elements, span })
    }

    /// Parses a primary: a literal, a parenthesized sub-term, or a postfix
    /// chain starting from an identifier or `this`.
    fn parse_primary(&mut self) -> Result<Expression, Diagnostic> {
        match self.current_kind().clone() {
            TokenKind::Integer(text) => {
                let token = self.advance();
                Ok(Expression::Integer(text, token.span()))
            }
            TokenKind::Float(text) => {
                let token = self.advance();
                Ok(Expression::Float(text, token.span()))
            }
            TokenKind::Str(text) => {
                let token = self.advance();
                Ok(Expression::Str(text, token.span()))
            }
            TokenKind::CharArray(text) => {
                let token = self.advance();
                Ok(Expression::CharArray(text, token.span()))
            }
            TokenKind::Keyword(Keyword::True) => {
                let token = self.advance();
                Ok(Expression::Bool(true, token.span()))
            }
            TokenKind::Keyword(Keyword::False) => {
                let token = self.advance();
                Ok(Expression::Bool(false, token.span()))
            }
            TokenKind::Keyword(Keyword::Null) => {
                let token = self.advance();
                Ok(Expression::Null(token.span()))
            }
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(inner)
            }
            // Pointer and reference spans act as opaque identifiers from the
            // parser's point of view.
            TokenKind::Pointer(text) | TokenKind::Reference(text) => {
                let token = self.advance();
                Ok(Expression::Identifier(Identifier::new(text, token.span())))
            }
            TokenKind::Identifier(_) | TokenKind::Keyword(Keyword::This) => {
                self.parse_postfix_chain()
            }
            _ => Err(self.syntax_mismatch("an expression")),
        }
    }

    /// Parses an access element followed by `.`/`->` links and an optional
    /// trailing `++`/`--`.
    pub(super) fn parse_postfix_chain(&mut self) -> Result<Expression, Diagnostic> {
        let head = self.parse_access_element()?;
        let start = head.span();
        let mut links = Vec::new();

        loop {
            let op = match self.current_kind() {
                TokenKind::Dot => AccessOp::Member,
                TokenKind::Arrow => AccessOp::Class,
                _ => break,
            };
            self.advance();
            let element = self.parse_access_element()?;
            links.push(AccessLink { op, element });
        }

        let mut expr = if links.is_empty() {
            head
        } else {
            let span = start.merge(self.previous_span());
            Expression::Access(AccessChain {
                head: Box::new(head),
                links,
                span,
            })
        };

        let inc_dec = match self.current_kind() {
            TokenKind::PlusPlus => Some(IncDecOp::Increment),
            TokenKind::MinusMinus => Some(IncDecOp::Decrement),
            _ => None,
        };
        if let Some(op) = inc_dec {
            let token = self.advance();
            let span = expr.span().merge(token.span());
            expr = Expression::IncDec {
                op,
                target: Box::new(expr),
                span,
            };
        }

        Ok(expr)
    }

    /// Parses one chain element: `this`, an identifier, or a function call,
    /// each with optional `[index]` groups attached.
    fn parse_access_element(&mut self) -> Result<Expression, Diagnostic> {
        let element = if matches!(self.current_kind(), TokenKind::Keyword(Keyword::This)) {
            let token = self.advance();
            Expression::This(token.span())
        } else {
            let name = self.expect_identifier()?;
            if matches!(self.current_kind(), TokenKind::LeftParen) {
                Expression::Call(self.parse_call(name)?)
            } else {
                Expression::Identifier(name)
            }
        };

        self.parse_array_suffix(element)
    }

    /// Attaches consecutive `[expr]` groups to an element.
    fn parse_array_suffix(&mut self, element: Expression) -> Result<Expression, Diagnostic> {
        if !matches!(self.current_kind(), TokenKind::LeftBracket) {
            return Ok(element);
        }

        let mut indices = Vec::new();
        while self.eat(&TokenKind::LeftBracket) {
            indices.push(self.parse_expression()?);
            self.expect(&TokenKind::RightBracket)?;
        }

        let span = element.span().merge(self.previous_span());
        Ok(Expression::ArrayAccess {
            target: Box::new(element),
            indices,
            span,
        })
    }

    /// Parses the parenthesized argument list of a call. Each argument may
    /// carry a `: Type` annotation after its expression.
    pub(super) fn parse_call(&mut self, name: Identifier) -> Result<FunctionCall, Diagnostic> {
        self.expect(&TokenKind::LeftParen)?;
        let mut arguments = Vec::new();

        if !matches!(self.current_kind(), TokenKind::RightParen) {
            loop {
                let value = self.parse_expression()?;
                let type_name = if self.eat(&TokenKind::Colon) {
                    Some(self.parse_type_name()?)
                } else {
                    None
                };
                arguments.push(Argument { value, type_name });
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let close = self.expect(&TokenKind::RightParen)?;
        let span = name.span.merge(close.span());
        Ok(FunctionCall {
            name,
            arguments,
            span,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, CompareOp, LogicalOp, Module, Statement, VarDecl};
    use crate::parse::parse;
    use crate::source_analysis::{SourceBuffer, lex};

    fn parse_source(source: &str) -> Module {
        let buffer = SourceBuffer::new("test.spc", source);
        parse(lex(&buffer).unwrap()).unwrap()
    }

    fn first_initializer(module: &Module) -> &Expression {
        match &module.statements[0] {
            Statement::Var(VarDecl {
                initializer: Some(expr),
                ..
            }) => expr,
            other => panic!("expected var declaration, got {other:?}"),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let module = parse_source("var x:int = 3 + 4 * 5;");
        let Expression::Binary {
            op: BinaryOp::Add,
            left,
            right,
            ..
        } = first_initializer(&module)
        else {
            panic!("expected + at the root");
        };
        assert!(matches!(**left, Expression::Integer(ref s, _) if s == "3"));
        assert!(
            matches!(**right, Expression::Binary { op: BinaryOp::Mul, .. }),
            "4 * 5 should be the right operand"
        );
    }

    #[test]
    fn parentheses_override_precedence() {
        let module = parse_source("var x = (3 + 4) * 5;");
        let Expression::Binary {
            op: BinaryOp::Mul,
            left,
            ..
        } = first_initializer(&module)
        else {
            panic!("expected * at the root");
        };
        assert!(matches!(
            **left,
            Expression::Binary {
                op: BinaryOp::Add,
                ..
            }
        ));
    }

    #[test]
    fn chained_condition_is_left_associative() {
        let module = parse_source("var ok = a == 1 and b == 2 or c == 3 ? 1 : 0;");
        let Expression::Conditional { condition, .. } = first_initializer(&module) else {
            panic!("expected conditional assignment");
        };
        // ((a == 1 and b == 2) or c == 3)
        let Expression::Logical {
            op: LogicalOp::Or,
            left,
            ..
        } = condition.as_ref()
        else {
            panic!("expected or at the root");
        };
        assert!(matches!(
            **left,
            Expression::Logical {
                op: LogicalOp::And,
                ..
            }
        ));
    }

    #[test]
    fn conditional_assignment_right_nests() {
        let module = parse_source("var grade = score >= 90 ? 1 : score >= 50 ? 2 : 3;");
        let Expression::Conditional { if_false, .. } = first_initializer(&module) else {
            panic!("expected conditional assignment");
        };
        assert!(matches!(**if_false, Expression::Conditional { .. }));
    }

    #[test]
    fn access_chain_flattens_segments() {
        let module = parse_source("var item = List->toList().getItem();");
        let Expression::Access(chain) = first_initializer(&module) else {
            panic!("expected access chain");
        };
        assert!(matches!(*chain.head, Expression::Identifier(ref id) if id.name == "List"));
        assert_eq!(chain.links.len(), 2);
        assert_eq!(chain.links[0].op, AccessOp::Class);
        assert_eq!(chain.links[1].op, AccessOp::Member);
        assert!(matches!(chain.links[1].element, Expression::Call(_)));
    }

    #[test]
    fn array_access_groups_collect_indices() {
        let module = parse_source("var cell = grid[1][2];");
        let Expression::ArrayAccess {
            target, indices, ..
        } = first_initializer(&module)
        else {
            panic!("expected array access");
        };
        assert!(matches!(**target, Expression::Identifier(ref id) if id.name == "grid"));
        assert_eq!(indices.len(), 2);
    }

    #[test]
    fn call_arguments_take_type_annotations() {
        let module = parse_source("var r = combine(first: int, 2 + 3);");
        let Expression::Call(call) = first_initializer(&module) else {
            panic!("expected call");
        };
        assert_eq!(call.arguments.len(), 2);
        assert_eq!(call.arguments[0].type_name.as_ref().unwrap().base, "int");
        assert!(call.arguments[1].type_name.is_none());
    }

    #[test]
    fn new_expression_wraps_constructor_path() {
        let module = parse_source("var a = new A();");
        let Expression::New { target, .. } = first_initializer(&module) else {
            panic!("expected new expression");
        };
        assert!(matches!(**target, Expression::Call(_)));
    }

    #[test]
    fn comparison_builds_comparison_node() {
        let module = parse_source("var flag = x != 10 ? 1 : 0;");
        let Expression::Conditional { condition, .. } = first_initializer(&module) else {
            panic!("expected conditional");
        };
        assert!(matches!(
            condition.as_ref(),
            Expression::Comparison {
                op: CompareOp::NotEq,
                ..
            }
        ));
    }

    #[test]
    fn postfix_increment_parses_as_statement() {
        let module = parse_source("counter++;");
        assert!(matches!(
            module.statements[0],
            Statement::Expression(Expression::IncDec { .. }, _)
        ));
    }
}

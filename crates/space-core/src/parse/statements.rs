// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Statement parsing: top-level dispatch, blocks and control flow.

use crate::ast::{
    Assignment, AssignOp, Block, CatchStatement, CheckStatement, DoStatement, ForStatement,
    IfStatement, IsArm, Statement, TryStatement, WhileStatement,
};
use crate::diagnostics::Diagnostic;
use crate::source_analysis::{Keyword, TokenKind};

use super::Parser;

impl Parser {
    /// Dispatches on the leading token of a statement.
    pub(super) fn parse_statement(&mut self) -> Result<Statement, Diagnostic> {
        match self.current_kind() {
            TokenKind::Keyword(Keyword::Var | Keyword::Const) => {
                self.parse_var_decl(crate::ast::Modifier::PGlobal)
            }
            TokenKind::Keyword(Keyword::Include) => self.parse_include(),
            TokenKind::Keyword(Keyword::Export) => self.parse_export(),
            TokenKind::Keyword(Keyword::Enum) => self.parse_enum_decl(),
            TokenKind::Keyword(Keyword::Function) => {
                self.parse_function_decl(crate::ast::Modifier::PGlobal)
            }
            TokenKind::Keyword(Keyword::Class) => {
                self.parse_class_decl(crate::ast::Modifier::PGlobal)
            }
            TokenKind::Keyword(Keyword::Global | Keyword::Private | Keyword::Secure) => {
                self.parse_modified_statement()
            }
            TokenKind::Keyword(Keyword::This)
                if matches!(self.peek_kind_at(1), Some(TokenKind::Colon))
                    && matches!(self.peek_kind_at(2), Some(TokenKind::Colon)) =>
            {
                self.parse_constructor_decl()
            }
            TokenKind::Keyword(Keyword::Try) => self.parse_try(),
            TokenKind::Keyword(Keyword::Catch) => self.parse_catch(),
            TokenKind::Keyword(Keyword::While) => self.parse_while(),
            TokenKind::Keyword(Keyword::Do) => self.parse_do(),
            TokenKind::Keyword(Keyword::For) => self.parse_for(),
            TokenKind::Keyword(Keyword::If) => self.parse_if(),
            TokenKind::Keyword(Keyword::Else) => self.parse_else(),
            TokenKind::Keyword(Keyword::Check) => self.parse_check(),
            TokenKind::Keyword(Keyword::Is) => {
                Err(self.syntax_mismatch("a statement (\"is\" arms belong inside \"check\")"))
            }
            TokenKind::Keyword(Keyword::Return) => self.parse_return(),
            TokenKind::Keyword(Keyword::Break) => {
                let token = self.advance();
                let semicolon = self.expect(&TokenKind::Semicolon)?;
                Ok(Statement::Break(token.span().merge(semicolon.span())))
            }
            TokenKind::Keyword(Keyword::Continue) => {
                let token = self.advance();
                let semicolon = self.expect(&TokenKind::Semicolon)?;
                Ok(Statement::Continue(token.span().merge(semicolon.span())))
            }
            _ => self.parse_expression_statement(),
        }
    }

    /// Parses a brace-delimited runnable.
    pub(super) fn parse_block(&mut self) -> Result<Block, Diagnostic> {
        let open = self.expect(&TokenKind::LeftBrace)?;
        let mut statements = Vec::new();

        while !matches!(self.current_kind(), TokenKind::RightBrace) {
            if self.is_at_end() {
                return Err(self.syntax_mismatch("\"}\""));
            }
            statements.push(self.parse_statement()?);
        }

        let close = self.expect(&TokenKind::RightBrace)?;
        Ok(Block::new(statements, open.span().merge(close.span())))
    }

    /// Parses `if (cond) { … }`.
    fn parse_if(&mut self) -> Result<Statement, Diagnostic> {
        let keyword = self.advance();
        self.expect(&TokenKind::LeftParen)?;
        let condition = self.parse_condition()?;
        self.expect(&TokenKind::RightParen)?;
        let body = self.parse_block()?;
        let span = keyword.span().merge(body.span);
        Ok(Statement::If(IfStatement {
            condition,
            body,
            span,
        }))
    }

    /// Parses `else { … }` or `else if (cond) { … }`.
    fn parse_else(&mut self) -> Result<Statement, Diagnostic> {
        let keyword = self.advance();

        if self.eat(&TokenKind::Keyword(Keyword::If)) {
            self.expect(&TokenKind::LeftParen)?;
            let condition = self.parse_condition()?;
            self.expect(&TokenKind::RightParen)?;
            let body = self.parse_block()?;
            let span = keyword.span().merge(body.span);
            return Ok(Statement::ElseIf(IfStatement {
                condition,
                body,
                span,
            }));
        }

        let body = self.parse_block()?;
        let span = keyword.span().merge(body.span);
        Ok(Statement::Else(body, span))
    }

    /// Parses `while (cond) { … }`.
    fn parse_while(&mut self) -> Result<Statement, Diagnostic> {
        let keyword = self.advance();
        self.expect(&TokenKind::LeftParen)?;
        let condition = self.parse_condition()?;
        self.expect(&TokenKind::RightParen)?;
        let body = self.parse_block()?;
        let span = keyword.span().merge(body.span);
        Ok(Statement::While(WhileStatement {
            condition,
            body,
            span,
        }))
    }

    /// Parses `do { … } while (cond);`.
    fn parse_do(&mut self) -> Result<Statement, Diagnostic> {
        let keyword = self.advance();
        let body = self.parse_block()?;
        self.expect(&TokenKind::Keyword(Keyword::While))?;
        self.expect(&TokenKind::LeftParen)?;
        let condition = self.parse_condition()?;
        self.expect(&TokenKind::RightParen)?;
        let semicolon = self.expect(&TokenKind::Semicolon)?;
        let span = keyword.span().merge(semicolon.span());
        Ok(Statement::Do(DoStatement {
            body,
            condition,
            span,
        }))
    }

    /// Parses `for (init; cond; action) { … }` where init is a variable
    /// declaration, cond a chained condition and action an assignment or
    /// inc/dec.
    fn parse_for(&mut self) -> Result<Statement, Diagnostic> {
        let keyword = self.advance();
        self.expect(&TokenKind::LeftParen)?;

        if !matches!(
            self.current_kind(),
            TokenKind::Keyword(Keyword::Var | Keyword::Const)
        ) {
            return Err(self.syntax_mismatch("a variable declaration"));
        }
        // The declaration consumes its own terminating semicolon.
        let init = self.parse_var_decl(crate::ast::Modifier::PGlobal)?;

        let condition = self.parse_condition()?;
        self.expect(&TokenKind::Semicolon)?;

        let action = self.parse_simple_statement()?;
        self.expect(&TokenKind::RightParen)?;

        let body = self.parse_block()?;
        let span = keyword.span().merge(body.span);
        Ok(Statement::For(ForStatement {
            init: Box::new(init),
            condition,
            action: Box::new(action),
            body,
            span,
        }))
    }

    /// Parses `check (expr) { is v: …; … }`. The body accepts only `is`
    /// arms.
    fn parse_check(&mut self) -> Result<Statement, Diagnostic> {
        let keyword = self.advance();
        self.expect(&TokenKind::LeftParen)?;
        let value = self.parse_expression()?;
        self.expect(&TokenKind::RightParen)?;

        let open = self.expect(&TokenKind::LeftBrace)?;
        let mut arms = Vec::new();
        while matches!(self.current_kind(), TokenKind::Keyword(Keyword::Is)) {
            arms.push(self.parse_is_arm()?);
        }
        let close = self.expect(&TokenKind::RightBrace)?;

        let body = Block::new(arms, open.span().merge(close.span()));
        let span = keyword.span().merge(body.span);
        Ok(Statement::Check(CheckStatement { value, body, span }))
    }

    /// Parses one `is value: statements…` arm; the arm body runs up to the
    /// next `is` or the closing brace of the check body.
    fn parse_is_arm(&mut self) -> Result<Statement, Diagnostic> {
        let keyword = self.advance();
        let value = self.parse_expression()?;
        self.expect(&TokenKind::Colon)?;

        let body_start = self.current_token().span();
        let mut statements = Vec::new();
        while !matches!(
            self.current_kind(),
            TokenKind::Keyword(Keyword::Is) | TokenKind::RightBrace
        ) {
            if self.is_at_end() {
                return Err(self.syntax_mismatch("\"}\""));
            }
            statements.push(self.parse_statement()?);
        }

        let body = Block::new(statements, body_start.merge(self.previous_span()));
        let span = keyword.span().merge(body.span);
        Ok(Statement::Is(IsArm { value, body, span }))
    }

    /// Parses `try { … }`; the matching `catch` follows as a sibling
    /// statement.
    fn parse_try(&mut self) -> Result<Statement, Diagnostic> {
        let keyword = self.advance();
        let body = self.parse_block()?;
        let span = keyword.span().merge(body.span);
        Ok(Statement::Try(TryStatement { body, span }))
    }

    /// Parses `catch (Type name) { … }`.
    fn parse_catch(&mut self) -> Result<Statement, Diagnostic> {
        let keyword = self.advance();
        self.expect(&TokenKind::LeftParen)?;
        let error_type = self.expect_identifier()?;
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::RightParen)?;
        let body = self.parse_block()?;
        let span = keyword.span().merge(body.span);
        Ok(Statement::Catch(CatchStatement {
            error_type,
            name,
            body,
            span,
        }))
    }

    /// Parses `return expr?;`.
    fn parse_return(&mut self) -> Result<Statement, Diagnostic> {
        let keyword = self.advance();
        let value = if matches!(self.current_kind(), TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_initializer()?)
        };
        let semicolon = self.expect(&TokenKind::Semicolon)?;
        Ok(Statement::Return(
            value,
            keyword.span().merge(semicolon.span()),
        ))
    }

    /// Parses a fall-through expression statement terminated by `;`:
    /// an assignment, compound assignment, inc/dec or call.
    fn parse_expression_statement(&mut self) -> Result<Statement, Diagnostic> {
        let statement = self.parse_simple_statement()?;
        let semicolon = self.expect(&TokenKind::Semicolon)?;
        Ok(match statement {
            Statement::Assignment(mut assignment) => {
                assignment.span = assignment.span.merge(semicolon.span());
                Statement::Assignment(assignment)
            }
            Statement::Expression(expr, span) => {
                Statement::Expression(expr, span.merge(semicolon.span()))
            }
            other => other,
        })
    }

    /// Parses an assignment or expression without its terminator; shared
    /// by expression statements and for-loop actions.
    fn parse_simple_statement(&mut self) -> Result<Statement, Diagnostic> {
        let target = self.parse_postfix_chain()?;

        let op = match self.current_kind() {
            TokenKind::Assign => Some(AssignOp::Assign),
            TokenKind::PlusAssign => Some(AssignOp::AddAssign),
            TokenKind::MinusAssign => Some(AssignOp::SubAssign),
            TokenKind::StarAssign => Some(AssignOp::MulAssign),
            TokenKind::SlashAssign => Some(AssignOp::DivAssign),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            let value = self.parse_initializer()?;
            let span = target.span().merge(value.span());
            return Ok(Statement::Assignment(Assignment {
                target,
                op,
                value,
                span,
            }));
        }

        let span = target.span();
        Ok(Statement::Expression(target, span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expression, Module};
    use crate::diagnostics::Category;
    use crate::parse::parse;
    use crate::source_analysis::{SourceBuffer, lex};

    fn parse_source(source: &str) -> Module {
        let buffer = SourceBuffer::new("test.spc", source);
        parse(lex(&buffer).unwrap()).unwrap()
    }

    fn parse_error(source: &str) -> Diagnostic {
        let buffer = SourceBuffer::new("test.spc", source);
        parse(lex(&buffer).unwrap()).unwrap_err()
    }

    #[test]
    fn if_else_if_else_are_siblings() {
        let module =
            parse_source("if (a == 1 and b == 2) { } else if (c == 3) { } else { }");
        assert_eq!(module.statements.len(), 3);
        assert!(matches!(module.statements[0], Statement::If(_)));
        assert!(matches!(module.statements[1], Statement::ElseIf(_)));
        assert!(matches!(module.statements[2], Statement::Else(..)));
    }

    #[test]
    fn while_with_break() {
        let module = parse_source("while (x < 10) { break; }");
        let Statement::While(stmt) = &module.statements[0] else {
            panic!("expected while");
        };
        assert!(matches!(stmt.body.statements[0], Statement::Break(_)));
    }

    #[test]
    fn do_requires_trailing_condition() {
        let module = parse_source("do { x += 1; } while (x < 3);");
        assert!(matches!(module.statements[0], Statement::Do(_)));

        let err = parse_error("do { } while (x < 3)");
        assert_eq!(err.category(), Category::SyntaxMismatch);
    }

    #[test]
    fn for_holds_init_condition_action() {
        let module = parse_source("for (var i = 0; i < 10; i++) { total += i; }");
        let Statement::For(stmt) = &module.statements[0] else {
            panic!("expected for");
        };
        assert!(matches!(*stmt.init, Statement::Var(_)));
        assert!(matches!(stmt.condition, Expression::Comparison { .. }));
        assert!(matches!(
            *stmt.action,
            Statement::Expression(Expression::IncDec { .. }, _)
        ));
        assert_eq!(stmt.body.statements.len(), 1);
    }

    #[test]
    fn check_accepts_only_is_arms() {
        let module = parse_source("check (mode) { is 1: run(); is 2: stop(); halt(); }");
        let Statement::Check(stmt) = &module.statements[0] else {
            panic!("expected check");
        };
        assert_eq!(stmt.body.statements.len(), 2);
        let Statement::Is(second) = &stmt.body.statements[1] else {
            panic!("expected is arm");
        };
        // `halt();` belongs to the second arm's body, not a third arm.
        assert_eq!(second.body.statements.len(), 2);
    }

    #[test]
    fn stray_is_arm_is_rejected() {
        let err = parse_error("is 1: run();");
        assert_eq!(err.category(), Category::SyntaxMismatch);
    }

    #[test]
    fn try_and_catch_parse_as_siblings() {
        let module = parse_source("try { risky(); } catch (Exception e) { log(e); }");
        assert!(matches!(module.statements[0], Statement::Try(_)));
        let Statement::Catch(catch) = &module.statements[1] else {
            panic!("expected catch");
        };
        assert_eq!(catch.error_type.name, "Exception");
        assert_eq!(catch.name.name, "e");
    }

    #[test]
    fn return_with_and_without_value() {
        let module = parse_source("return;\nreturn x + 1;");
        assert!(matches!(&module.statements[0], Statement::Return(None, _)));
        assert!(matches!(
            &module.statements[1],
            Statement::Return(Some(_), _)
        ));
    }

    #[test]
    fn compound_assignment_statement() {
        let module = parse_source("total /= 2;");
        let Statement::Assignment(assignment) = &module.statements[0] else {
            panic!("expected assignment");
        };
        assert_eq!(assignment.op, AssignOp::DivAssign);
    }

    #[test]
    fn class_access_call_statement() {
        let module = parse_source("a->f(1);");
        assert!(matches!(
            &module.statements[0],
            Statement::Expression(Expression::Access(_), _)
        ));
    }

    #[test]
    fn unclosed_block_is_a_syntax_mismatch() {
        let err = parse_error("while (x < 1) { var a = 2;");
        assert_eq!(err.category(), Category::SyntaxMismatch);
    }
}

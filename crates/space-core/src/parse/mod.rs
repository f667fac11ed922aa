// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Recursive descent parser for SPACE source code.
//!
//! The parser consumes the token vector produced by the lexer and builds the
//! typed AST bottom-up. Every construction routine returns
//! `Result<_, Diagnostic>`: the first grammar violation unwinds to the
//! driver and aborts the compilation, so there is no error recovery and no
//! partial tree.
//!
//! # Binary operator precedence (Pratt parsing)
//!
//! Expression precedence is handled with binding powers rather than a
//! routine per level:
//!
//! | Level | Operators           | Associativity |
//! |-------|---------------------|---------------|
//! | 10    | `and` `or`          | Left          |
//! | 20    | `== != < > <= >=`   | Left          |
//! | 30    | `+` `-`             | Left          |
//! | 40    | `*` `/` `%`         | Left          |
//!
//! `and` and `or` share one level: chained conditions are left-associative
//! across both connectives, with parentheses promoting sub-conditions.
//!
//! # Usage
//!
//! ```
//! use space_core::parse::parse;
//! use space_core::source_analysis::{lex, SourceBuffer};
//!
//! let buffer = SourceBuffer::new("main.spc", "var x:int = 3 + 4 * 5;");
//! let tokens = lex(&buffer).unwrap();
//! let module = parse(tokens).unwrap();
//! assert_eq!(module.statements.len(), 1);
//! ```

use crate::ast::{BinaryOp, CompareOp, Identifier, LogicalOp, Module};
use crate::diagnostics::{Category, Diagnostic};
use crate::source_analysis::{Span, Token, TokenKind};

mod declarations;
mod expressions;
mod statements;

/// Parses a token vector into a module.
///
/// This is the only entry point; the token vector must be terminated by an
/// EOF token as produced by [`lex`](crate::source_analysis::lex).
pub fn parse(tokens: Vec<Token>) -> Result<Module, Diagnostic> {
    let mut parser = Parser::new(tokens);
    parser.parse_module()
}

// ============================================================================
// Pratt binding powers
// ============================================================================

/// Binding power of a binary operator; `left < right` gives left
/// associativity.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BindingPower {
    pub(crate) left: u8,
    pub(crate) right: u8,
}

impl BindingPower {
    const fn left_assoc(precedence: u8) -> Self {
        Self {
            left: precedence,
            right: precedence + 1,
        }
    }
}

/// The operator family a token maps to inside expressions.
#[derive(Debug, Clone, Copy)]
pub(crate) enum InfixOp {
    Arithmetic(BinaryOp),
    Comparison(CompareOp),
    Logical(LogicalOp),
}

/// Maps a token to its infix operator and binding power, or `None` when the
/// token ends the expression.
pub(crate) fn infix_binding_power(kind: &TokenKind) -> Option<(InfixOp, BindingPower)> {
    use crate::source_analysis::Keyword;

    let (op, power) = match kind {
        TokenKind::Keyword(Keyword::And) => {
            (InfixOp::Logical(LogicalOp::And), BindingPower::left_assoc(10))
        }
        TokenKind::Keyword(Keyword::Or) => {
            (InfixOp::Logical(LogicalOp::Or), BindingPower::left_assoc(10))
        }
        TokenKind::EqEq => (
            InfixOp::Comparison(CompareOp::Eq),
            BindingPower::left_assoc(20),
        ),
        TokenKind::NotEq => (
            InfixOp::Comparison(CompareOp::NotEq),
            BindingPower::left_assoc(20),
        ),
        TokenKind::Less => (
            InfixOp::Comparison(CompareOp::Less),
            BindingPower::left_assoc(20),
        ),
        TokenKind::Greater => (
            InfixOp::Comparison(CompareOp::Greater),
            BindingPower::left_assoc(20),
        ),
        TokenKind::LessEq => (
            InfixOp::Comparison(CompareOp::LessEq),
            BindingPower::left_assoc(20),
        ),
        TokenKind::GreaterEq => (
            InfixOp::Comparison(CompareOp::GreaterEq),
            BindingPower::left_assoc(20),
        ),
        TokenKind::Plus => (
            InfixOp::Arithmetic(BinaryOp::Add),
            BindingPower::left_assoc(30),
        ),
        TokenKind::Minus => (
            InfixOp::Arithmetic(BinaryOp::Sub),
            BindingPower::left_assoc(30),
        ),
        TokenKind::Star => (
            InfixOp::Arithmetic(BinaryOp::Mul),
            BindingPower::left_assoc(40),
        ),
        TokenKind::Slash => (
            InfixOp::Arithmetic(BinaryOp::Div),
            BindingPower::left_assoc(40),
        ),
        TokenKind::Percent => (
            InfixOp::Arithmetic(BinaryOp::Mod),
            BindingPower::left_assoc(40),
        ),
        _ => return None,
    };
    Some((op, power))
}

// ============================================================================
// Parser state
// ============================================================================

/// The parser over one token vector.
pub(crate) struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    fn parse_module(&mut self) -> Result<Module, Diagnostic> {
        let start = self.current_token().span();
        let mut statements = Vec::new();

        while !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        let end = self.current_token().span();
        Ok(Module::new(statements, start.merge(end)))
    }

    // ========================================================================
    // Token management
    // ========================================================================

    /// Returns the current token; past the end, the trailing EOF token.
    pub(crate) fn current_token(&self) -> &Token {
        self.tokens
            .get(self.current)
            .or_else(|| self.tokens.last())
            .expect("token vector always ends with EOF")
    }

    /// Returns the current token kind.
    pub(crate) fn current_kind(&self) -> &TokenKind {
        self.current_token().kind()
    }

    /// Peeks `n` tokens ahead of the current one.
    pub(crate) fn peek_kind_at(&self, n: usize) -> Option<&TokenKind> {
        self.tokens.get(self.current + n).map(Token::kind)
    }

    /// Returns `true` once the cursor sits on the EOF token.
    pub(crate) fn is_at_end(&self) -> bool {
        self.current_kind().is_eof()
    }

    /// Consumes and returns the current token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    /// Consumes the current token if it matches, returning whether it did.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.current_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token or raises a syntax mismatch naming the
    /// expected and observed values.
    pub(crate) fn expect(&mut self, kind: &TokenKind) -> Result<Token, Diagnostic> {
        if self.current_kind() == kind {
            Ok(self.advance())
        } else {
            Err(self.syntax_mismatch(&format!("\"{kind}\"")))
        }
    }

    /// Consumes an identifier token or raises a syntax mismatch.
    pub(crate) fn expect_identifier(&mut self) -> Result<Identifier, Diagnostic> {
        if let TokenKind::Identifier(name) = self.current_kind() {
            let name = name.clone();
            let token = self.advance();
            Ok(Identifier::new(name, token.span()))
        } else {
            Err(self.syntax_mismatch("an identifier"))
        }
    }

    /// Builds the standard "expected X, got Y" grammar diagnostic at the
    /// current token.
    pub(crate) fn syntax_mismatch(&self, expected: &str) -> Diagnostic {
        Diagnostic::new(
            Category::SyntaxMismatch,
            format!("Expected {expected}, but got \"{}\".", self.current_kind()),
            self.current_token().span(),
        )
    }

    /// Span of the previously consumed token.
    pub(crate) fn previous_span(&self) -> Span {
        if self.current == 0 {
            self.current_token().span()
        } else {
            self.tokens[self.current - 1].span()
        }
    }
}

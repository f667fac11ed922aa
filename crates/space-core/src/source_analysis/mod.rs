// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Source-level analysis: buffers, spans, tokens and the lexer.

mod lexer;
#[cfg(test)]
mod lexer_property_tests;
mod source;
mod span;
mod token;

pub use lexer::{Lexer, lex};
pub use source::SourceBuffer;
pub use span::Span;
pub use token::{Keyword, Token, TokenKind};

// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! SPACE compiler core.
//!
//! This crate contains the compiler frontend:
//! - Lexical analysis (two-pass tokenization)
//! - Parsing (typed AST construction)
//! - Semantic analysis (scope tables, name resolution, type checking)
//! - Unparsing (AST back to source text)
//!
//! The pipeline is strictly sequential: each stage consumes the previous
//! stage's final value, and all stages share one read-only
//! [`SourceBuffer`](source_analysis::SourceBuffer) for diagnostic
//! positioning.

pub mod ast;
pub mod diagnostics;
pub mod parse;
pub mod semantic_analysis;
pub mod source_analysis;
pub mod unparse;

/// Re-export of commonly used types.
pub mod prelude {
    pub use crate::ast::{Expression, Module, Statement};
    pub use crate::diagnostics::{Category, Diagnostic};
    pub use crate::parse::parse;
    pub use crate::semantic_analysis::{AnalysisResult, analyse};
    pub use crate::source_analysis::{SourceBuffer, Span, Token, TokenKind, lex};
    pub use crate::unparse::unparse_module;
}

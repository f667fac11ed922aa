// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Semantic error construction.
//!
//! The analyzer reports everything as a [`Diagnostic`]; this module keeps
//! the message templates in one place so repeated reports render
//! identically.

use crate::diagnostics::{Category, Diagnostic};
use crate::source_analysis::Span;

use super::types::VarDec;

/// A name was declared twice along the scope chain.
pub(super) fn already_defined(name: &str, span: Span) -> Diagnostic {
    Diagnostic::new(
        Category::AlreadyDefined,
        format!("\"{name}\" is already defined."),
        span,
    )
}

/// A referenced name has no declaration in scope.
pub(super) fn not_defined(name: &str, span: Span) -> Diagnostic {
    Diagnostic::new(
        Category::NotDefined,
        format!("\"{name}\" is not defined."),
        span,
    )
}

/// The expected/got type mismatch template.
pub(super) fn type_mismatch(expected: &VarDec, got: &VarDec, span: Span) -> Diagnostic {
    Diagnostic::new(
        Category::TypeMismatch,
        format!("Expected {expected}, but got {got} instead."),
        span,
    )
}

/// A statement appeared where its scope kind forbids it.
pub(super) fn misplacement(message: &str, span: Span) -> Diagnostic {
    Diagnostic::new(Category::StatementMisplacement, message, span)
}

/// The wrong access operator was used in a member/class access.
pub(super) fn wrong_accessor(message: &str, span: Span) -> Diagnostic {
    Diagnostic::new(Category::WrongAccessor, message, span)
}

/// A call does not match the callee's parameter list length.
pub(super) fn wrong_argument_count(span: Span) -> Diagnostic {
    Diagnostic::new(
        Category::WrongArgument,
        "The argument count is not equal to the definition.",
        span,
    )
}

/// A hidden (private/secure) declaration was reached from outside its
/// class.
pub(super) fn hidden_access(span: Span) -> Diagnostic {
    Diagnostic::new(
        Category::Modifier,
        "Tried to access \"hidden\" declaration.",
        span,
    )
}

/// A visibility modifier was written on a MAIN-scope declaration.
pub(super) fn modifier_outside_class(span: Span) -> Diagnostic {
    Diagnostic::new(
        Category::Modifier,
        "Modifiers outside of classes are not allowed.",
        span,
    )
}

/// An array access chain went below dimension zero.
pub(super) fn no_such_array_dimension(span: Span) -> Diagnostic {
    Diagnostic::new(
        Category::NoSuchArrayDimension,
        "Negative arrays are not allowed.",
        span,
    )
}

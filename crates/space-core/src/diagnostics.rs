// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Structured compiler diagnostics.
//!
//! Every stage of the pipeline reports problems as a [`Diagnostic`]: a
//! category, a human-readable description and the source span of the
//! offending token or AST node. Rendering resolves the span against the
//! [`SourceBuffer`] into the report format:
//!
//! ```text
//! TypeMismatchException: at line 3:9 from "main.spc"
//!     msg: Expected INTEGER, but got STRING instead.
//!     at: var x:int = "oops";
//!                     ^^^^^^
//! ```

use ecow::EcoString;

use crate::source_analysis::{SourceBuffer, Span};

/// The category of a diagnostic, named after the exception it renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Uncategorized fatal error.
    Exception,
    /// I/O failure in the driver (unreadable or empty source file).
    Io,
    /// Lexer met a byte outside every token class.
    UnexpectedSymbol,
    /// String literal without a closing quote.
    UnfinishedString,
    /// Pointer or reference span without its closing delimiter.
    UnfinishedPointer,
    /// Grammar mismatch: expected one token, observed another.
    SyntaxMismatch,
    /// A statement appeared in a scope that does not permit it.
    StatementMisplacement,
    /// A name was declared twice in the same scope chain.
    AlreadyDefined,
    /// A referenced name has no declaration in scope.
    NotDefined,
    /// An expression's type does not match its context.
    TypeMismatch,
    /// `.` used for a class access or `->` for a member access.
    WrongAccessor,
    /// A call's argument count or argument types do not match the callee.
    WrongArgument,
    /// A visibility modifier forbids the access or the declaration site.
    Modifier,
    /// An array access chain went below dimension zero.
    NoSuchArrayDimension,
    /// Internal failure between pipeline stages.
    Internal,
}

impl Category {
    /// Returns the exception name used in rendered reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Exception => "Exception",
            Self::Io => "IOException",
            Self::UnexpectedSymbol => "UnexpectedSymbolException",
            Self::UnfinishedString => "UnfinishedStringException",
            Self::UnfinishedPointer => "UnfinishedPointerException",
            Self::SyntaxMismatch => "SyntaxMismatchException",
            Self::StatementMisplacement => "StatementMisplacementException",
            Self::AlreadyDefined => "AlreadyDefinedException",
            Self::NotDefined => "NotDefinedException",
            Self::TypeMismatch => "TypeMismatchException",
            Self::WrongAccessor => "WrongAccessorException",
            Self::WrongArgument => "WrongArgumentException",
            Self::Modifier => "ModifierException",
            Self::NoSuchArrayDimension => "NoSuchArrayDimensionException",
            Self::Internal => "InternalException",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single structured error report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    category: Category,
    message: EcoString,
    span: Span,
}

impl Diagnostic {
    /// Creates a diagnostic.
    #[must_use]
    pub fn new(category: Category, message: impl Into<EcoString>, span: Span) -> Self {
        Self {
            category,
            message: message.into(),
            span,
        }
    }

    /// Returns the diagnostic category.
    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the source span the report points at.
    #[must_use]
    pub fn span(&self) -> Span {
        self.span
    }

    /// Renders the report against its source buffer.
    ///
    /// The caret line is aligned with the offending span's column within
    /// the quoted source line; a zero-length span still gets one caret.
    #[must_use]
    pub fn render(&self, buffer: &SourceBuffer) -> String {
        let (line, column) = buffer.line_col(self.span.start());
        let source_line = buffer.line_text(line);

        let mut out = String::new();
        out.push_str(&format!(
            "{}: at line {line}:{column} from \"{}\"\n",
            self.category,
            buffer.name()
        ));
        out.push_str(&format!("    msg: {}\n", self.message));
        out.push_str(&format!("    at: {source_line}\n"));

        // "    at: " is eight characters wide; the caret starts under the
        // span's first column.
        let indent = 8 + column as usize - 1;
        let carets = (self.span.len() as usize).max(1);
        out.push_str(&" ".repeat(indent));
        out.push_str(&"^".repeat(carets));
        out.push('\n');
        out
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.category, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_aligns_caret_with_column() {
        let buffer = SourceBuffer::new("main.spc", "var x = y;\n");
        let diagnostic = Diagnostic::new(
            Category::NotDefined,
            "Object \"y\" is not defined.",
            Span::new(8, 9),
        );
        let rendered = diagnostic.render(&buffer);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines[0],
            "NotDefinedException: at line 1:9 from \"main.spc\""
        );
        assert_eq!(lines[1], "    msg: Object \"y\" is not defined.");
        assert_eq!(lines[2], "    at: var x = y;");
        assert_eq!(lines[3], "                ^");
    }

    #[test]
    fn render_multi_byte_span_widens_caret() {
        let buffer = SourceBuffer::new("main.spc", "first\ncall();\n");
        let diagnostic = Diagnostic::new(Category::NotDefined, "no such function", Span::new(6, 10));
        let rendered = diagnostic.render(&buffer);
        assert!(rendered.contains("at line 2:1"));
        assert!(rendered.ends_with("        ^^^^\n"));
    }

    #[test]
    fn zero_length_span_still_gets_a_caret() {
        let buffer = SourceBuffer::new("main.spc", "x\n");
        let diagnostic = Diagnostic::new(Category::SyntaxMismatch, "expected \";\"", Span::point(1));
        let rendered = diagnostic.render(&buffer);
        assert!(rendered.ends_with("         ^\n"));
    }

    #[test]
    fn category_names() {
        assert_eq!(Category::TypeMismatch.name(), "TypeMismatchException");
        assert_eq!(
            Category::NoSuchArrayDimension.name(),
            "NoSuchArrayDimensionException"
        );
        assert_eq!(Category::Io.to_string(), "IOException");
    }
}

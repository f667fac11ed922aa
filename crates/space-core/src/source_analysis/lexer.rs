// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for SPACE source code.
//!
//! The lexer runs in two passes over the byte buffer:
//!
//! 1. **Sizing**: one scan that slices the buffer into pre-token spans,
//!    skipping whitespace and comments and absorbing strings, numbers and
//!    pointer/reference micro-syntax into single spans. Sizing up front
//!    gives the token vector its exact capacity before any token is built.
//! 2. **Classification**: each sized span becomes a [`Token`], with
//!    reserved words resolved through the keyword table and every token
//!    stamped with the 1-based line/column of its first byte.
//!
//! Lexical errors are fatal: the first unterminated string, unterminated
//! pointer span or unexpected symbol aborts the stage with a [`Diagnostic`]
//! pointing at the exact byte offset.

use ecow::EcoString;

use crate::diagnostics::{Category, Diagnostic};

use super::{Keyword, SourceBuffer, Span, Token, TokenKind};

/// A sized but not yet classified token span from the first pass.
#[derive(Debug, Clone, Copy)]
struct Pretoken {
    start: usize,
    len: usize,
}

impl Pretoken {
    fn span(self) -> Span {
        (self.start..self.start + self.len).into()
    }
}

/// Tokenizes a source buffer.
///
/// # Examples
///
/// ```
/// use space_core::source_analysis::{lex, SourceBuffer, TokenKind};
///
/// let buffer = SourceBuffer::new("main.spc", "var x = 1;");
/// let tokens = lex(&buffer).unwrap();
/// assert!(matches!(tokens.last().unwrap().kind(), TokenKind::Eof));
/// ```
pub fn lex(buffer: &SourceBuffer) -> Result<Vec<Token>, Diagnostic> {
    Lexer::new(buffer).tokenize()
}

/// The SPACE lexer.
///
/// See the module documentation for the two-pass design.
#[derive(Debug)]
pub struct Lexer<'src> {
    buffer: &'src SourceBuffer,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer over the given buffer.
    #[must_use]
    pub fn new(buffer: &'src SourceBuffer) -> Self {
        Self { buffer }
    }

    /// Runs both passes and returns the token vector, terminated by EOF.
    pub fn tokenize(self) -> Result<Vec<Token>, Diagnostic> {
        let pretokens = self.measure()?;
        self.classify(&pretokens)
    }

    // ========================================================================
    // Pass A: sizing
    // ========================================================================

    /// Scans the buffer once and slices it into pre-token spans.
    fn measure(&self) -> Result<Vec<Pretoken>, Diagnostic> {
        let bytes = self.buffer.as_bytes();
        let mut pretokens = Vec::new();
        let mut i = 0;

        while i < bytes.len() {
            let byte = bytes[i];

            if is_space(byte) {
                i += 1;
            } else if byte == b'/' && bytes.get(i + 1) == Some(&b'/') {
                i = skip_line_comment(bytes, i);
            } else if byte == b'/' && bytes.get(i + 1) == Some(&b'*') {
                i = skip_block_comment(bytes, i);
            } else if byte == b'"' || byte == b'\'' {
                i = measure_quoted(bytes, i, byte, &mut pretokens)?;
            } else if is_digit(byte) || (byte == b'-' && bytes.get(i + 1).copied().is_some_and(is_digit)) {
                i = measure_number(bytes, i, &mut pretokens);
            } else if byte == b'&' {
                i = measure_reference(bytes, i, &mut pretokens)?;
            } else if byte == b'*' && is_pointer_start(bytes, i) {
                i = measure_pointer(bytes, i, &mut pretokens);
            } else if is_operator_byte(byte) {
                let len = if is_double_operator(byte, bytes.get(i + 1).copied()) {
                    2
                } else {
                    1
                };
                pretokens.push(Pretoken { start: i, len });
                i += len;
            } else {
                i = measure_word(bytes, i, &mut pretokens);
            }
        }

        Ok(pretokens)
    }

    // ========================================================================
    // Pass B: classification
    // ========================================================================

    /// Turns the sized spans into tokens and appends the EOF marker.
    fn classify(&self, pretokens: &[Pretoken]) -> Result<Vec<Token>, Diagnostic> {
        let mut tokens = Vec::with_capacity(pretokens.len() + 1);

        for pretoken in pretokens {
            let span = pretoken.span();
            let text = self.buffer.slice(span);
            let kind = classify_span(text, span)?;
            let (line, column) = self.buffer.line_col(span.start());
            tokens.push(Token::new(kind, span, line, column));
        }

        let end = span_offset(self.buffer.len());
        let (line, column) = self.buffer.line_col(end);
        tokens.push(Token::new(TokenKind::Eof, Span::point(end), line, column));
        Ok(tokens)
    }
}

/// Absorbs a string or character-array literal, honoring backslash
/// escapes before the closing quote.
fn measure_quoted(
    bytes: &[u8],
    start: usize,
    quote: u8,
    pretokens: &mut Vec<Pretoken>,
) -> Result<usize, Diagnostic> {
    let mut j = start + 1;
    while j < bytes.len() {
        if bytes[j] == quote && bytes[j - 1] != b'\\' {
            pretokens.push(Pretoken {
                start,
                len: j - start + 1,
            });
            return Ok(j + 1);
        }
        j += 1;
    }

    Err(Diagnostic::new(
        Category::UnfinishedString,
        "String literal is never closed.",
        Span::point(span_offset(start)),
    ))
}

/// Absorbs a reference-to-pointer span `&( … )`, where `*`, `(` and `)`
/// belong to the span until the opening bracket is balanced out.
fn measure_reference(
    bytes: &[u8],
    start: usize,
    pretokens: &mut Vec<Pretoken>,
) -> Result<usize, Diagnostic> {
    if bytes.get(start + 1) != Some(&b'(') {
        return Err(Diagnostic::new(
            Category::UnexpectedSymbol,
            "Unexpected symbol \"&\".",
            Span::point(span_offset(start)),
        ));
    }

    let mut depth = 0usize;
    let mut j = start + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    pretokens.push(Pretoken {
                        start,
                        len: j - start + 1,
                    });
                    return Ok(j + 1);
                }
            }
            b'*' => {}
            byte if is_ident_byte(byte) => {}
            _ => break,
        }
        j += 1;
    }

    Err(Diagnostic::new(
        Category::UnfinishedPointer,
        "Reference span is never closed.",
        Span::point(span_offset(start)),
    ))
}

/// Classifies one sized span by its text.
fn classify_span(text: &str, span: Span) -> Result<TokenKind, Diagnostic> {
    if text.is_empty() {
        return Err(Diagnostic::new(
            Category::Exception,
            "Token has an empty value.",
            span,
        ));
    }

    if let Some(inner) = text.strip_prefix('"') {
        let inner = inner.strip_suffix('"').unwrap_or(inner);
        return Ok(TokenKind::Str(EcoString::from(inner)));
    }
    if let Some(inner) = text.strip_prefix('\'') {
        let inner = inner.strip_suffix('\'').unwrap_or(inner);
        return Ok(TokenKind::CharArray(EcoString::from(inner)));
    }

    if let Some(kind) = classify_operator(text) {
        return Ok(kind);
    }

    let first = text.as_bytes()[0];
    if is_digit(first) || (first == b'-' && text.len() > 1) {
        let kind = if text.contains('.') {
            TokenKind::Float(EcoString::from(text))
        } else {
            TokenKind::Integer(EcoString::from(text))
        };
        return Ok(kind);
    }

    if first == b'&' {
        return Ok(TokenKind::Reference(EcoString::from(text)));
    }
    if first == b'*' {
        return Ok(TokenKind::Pointer(EcoString::from(text)));
    }

    if !is_ident_start(first) {
        return Err(Diagnostic::new(
            Category::UnexpectedSymbol,
            format!(
                "Unexpected symbol \"{}\".",
                text.chars().next().unwrap_or('?')
            ),
            span,
        ));
    }
    if let Some(bad) = text.bytes().find(|&b| !is_ident_byte(b)) {
        return Err(Diagnostic::new(
            Category::UnexpectedSymbol,
            format!("Unexpected symbol \"{}\".", bad as char),
            span,
        ));
    }

    Ok(Keyword::lookup(text).map_or_else(
        || TokenKind::Identifier(EcoString::from(text)),
        TokenKind::Keyword,
    ))
}

// ============================================================================
// Byte classification helpers
// ============================================================================

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

fn is_digit(byte: u8) -> bool {
    byte.is_ascii_digit()
}

fn is_ident_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// The single-character operator alphabet.
fn is_operator_byte(byte: u8) -> bool {
    matches!(
        byte,
        b'+' | b'-'
            | b'*'
            | b'/'
            | b'%'
            | b'='
            | b'<'
            | b'>'
            | b'!'
            | b'('
            | b')'
            | b'{'
            | b'}'
            | b'['
            | b']'
            | b','
            | b';'
            | b':'
            | b'.'
            | b'?'
    )
}

/// Returns `true` if the two bytes form one of the two-character operators
/// `+= -= *= /= != == <= >= ++ -- -> =>`.
fn is_double_operator(current: u8, next: Option<u8>) -> bool {
    let Some(next) = next else { return false };
    matches!(
        (current, next),
        (b'+' | b'-' | b'*' | b'/' | b'!' | b'=' | b'<' | b'>', b'=')
            | (b'+', b'+')
            | (b'-', b'-' | b'>')
            | (b'=', b'>')
    )
}

/// A run of `*`s directly followed by an identifier byte is a pointer span.
fn is_pointer_start(bytes: &[u8], start: usize) -> bool {
    let mut j = start;
    while bytes.get(j) == Some(&b'*') {
        j += 1;
    }
    bytes.get(j).copied().is_some_and(is_ident_start)
}

fn skip_line_comment(bytes: &[u8], start: usize) -> usize {
    let mut j = start + 2;
    while j < bytes.len() && bytes[j] != b'\n' {
        j += 1;
    }
    j
}

fn skip_block_comment(bytes: &[u8], start: usize) -> usize {
    let mut j = start + 2;
    while j < bytes.len() {
        if bytes[j] == b'*' && bytes.get(j + 1) == Some(&b'/') {
            return j + 2;
        }
        j += 1;
    }
    j
}

/// Absorbs a numeric literal: an optional leading `-`, digits, and one
/// inner `.` flanked by digits on both sides.
fn measure_number(bytes: &[u8], start: usize, pretokens: &mut Vec<Pretoken>) -> usize {
    let mut j = start;
    if bytes[j] == b'-' {
        j += 1;
    }
    let mut seen_dot = false;
    while j < bytes.len() {
        let byte = bytes[j];
        if is_digit(byte) {
            j += 1;
        } else if byte == b'.'
            && !seen_dot
            && j > start
            && is_digit(bytes[j - 1])
            && bytes.get(j + 1).copied().is_some_and(is_digit)
        {
            seen_dot = true;
            j += 1;
        } else {
            break;
        }
    }
    pretokens.push(Pretoken {
        start,
        len: j - start,
    });
    j
}

/// Absorbs a pointer span: the `*` run plus the identifier it points at.
fn measure_pointer(bytes: &[u8], start: usize, pretokens: &mut Vec<Pretoken>) -> usize {
    let mut j = start;
    while bytes.get(j) == Some(&b'*') {
        j += 1;
    }
    while j < bytes.len() && is_ident_byte(bytes[j]) {
        j += 1;
    }
    pretokens.push(Pretoken {
        start,
        len: j - start,
    });
    j
}

/// Absorbs an identifier/keyword run: maximal bytes up to whitespace, an
/// operator byte, or the `#` terminator.
fn measure_word(bytes: &[u8], start: usize, pretokens: &mut Vec<Pretoken>) -> usize {
    let mut j = start;
    while j < bytes.len() {
        let byte = bytes[j];
        if is_space(byte) || is_operator_byte(byte) || byte == b'#' {
            break;
        }
        j += 1;
    }
    // A lone terminator byte still becomes a (mis)classifiable span.
    if j == start {
        j += 1;
    }
    pretokens.push(Pretoken {
        start,
        len: j - start,
    });
    j
}

/// Matches a span against the operator alphabet.
fn classify_operator(text: &str) -> Option<TokenKind> {
    let kind = match text {
        "+" => TokenKind::Plus,
        "-" => TokenKind::Minus,
        "*" => TokenKind::Star,
        "/" => TokenKind::Slash,
        "%" => TokenKind::Percent,
        "++" => TokenKind::PlusPlus,
        "--" => TokenKind::MinusMinus,
        "=" => TokenKind::Assign,
        "+=" => TokenKind::PlusAssign,
        "-=" => TokenKind::MinusAssign,
        "*=" => TokenKind::StarAssign,
        "/=" => TokenKind::SlashAssign,
        "==" => TokenKind::EqEq,
        "!=" => TokenKind::NotEq,
        "<" => TokenKind::Less,
        ">" => TokenKind::Greater,
        "<=" => TokenKind::LessEq,
        ">=" => TokenKind::GreaterEq,
        "(" => TokenKind::LeftParen,
        ")" => TokenKind::RightParen,
        "{" => TokenKind::LeftBrace,
        "}" => TokenKind::RightBrace,
        "[" => TokenKind::LeftBracket,
        "]" => TokenKind::RightBracket,
        "," => TokenKind::Comma,
        ";" => TokenKind::Semicolon,
        ":" => TokenKind::Colon,
        "." => TokenKind::Dot,
        "->" => TokenKind::Arrow,
        "=>" => TokenKind::FatArrow,
        "?" => TokenKind::Question,
        _ => return None,
    };
    Some(kind)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "source files over 4GB are not supported"
)]
fn span_offset(offset: usize) -> u32 {
    offset as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let buffer = SourceBuffer::new("test.spc", source);
        lex(&buffer)
            .unwrap()
            .into_iter()
            .map(Token::into_kind)
            .collect()
    }

    #[test]
    fn whitespace_and_comments_yield_single_eof() {
        let kinds = kinds("  \t\n // line comment\n /* block\n comment */ \n");
        assert_eq!(kinds, vec![TokenKind::Eof]);
    }

    #[test]
    fn declaration_statement() {
        let kinds = kinds("var x:int = 3 + 4 * 5;");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(Keyword::Var),
                TokenKind::Identifier("x".into()),
                TokenKind::Colon,
                TokenKind::Identifier("int".into()),
                TokenKind::Assign,
                TokenKind::Integer("3".into()),
                TokenKind::Plus,
                TokenKind::Integer("4".into()),
                TokenKind::Star,
                TokenKind::Integer("5".into()),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn two_character_operators() {
        let kinds = kinds("a += b; c ++; d != e; f -> g; h => i;");
        assert!(kinds.contains(&TokenKind::PlusAssign));
        assert!(kinds.contains(&TokenKind::PlusPlus));
        assert!(kinds.contains(&TokenKind::NotEq));
        assert!(kinds.contains(&TokenKind::Arrow));
        assert!(kinds.contains(&TokenKind::FatArrow));
    }

    #[test]
    fn negative_number_glues_to_minus() {
        assert_eq!(
            kinds("-12"),
            vec![TokenKind::Integer("-12".into()), TokenKind::Eof]
        );
        // A `-` not followed by a digit stays an operator.
        assert_eq!(
            kinds("a - b")[1],
            TokenKind::Minus
        );
    }

    #[test]
    fn float_keeps_inner_dot() {
        assert_eq!(
            kinds("3.14"),
            vec![TokenKind::Float("3.14".into()), TokenKind::Eof]
        );
        // A dot not flanked by digits splits the tokens.
        assert_eq!(
            kinds("a.b"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::Dot,
                TokenKind::Identifier("b".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_with_escaped_quote() {
        assert_eq!(
            kinds("\"say \\\"hi\\\"\""),
            vec![TokenKind::Str("say \\\"hi\\\"".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn char_array_literal() {
        assert_eq!(
            kinds("'a'"),
            vec![TokenKind::CharArray("a".into()), TokenKind::Eof]
        );
        assert_eq!(
            kinds("'word'"),
            vec![TokenKind::CharArray("word".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn pointer_and_reference_spans() {
        assert_eq!(
            kinds("*ptr"),
            vec![TokenKind::Pointer("*ptr".into()), TokenKind::Eof]
        );
        assert_eq!(
            kinds("**deep"),
            vec![TokenKind::Pointer("**deep".into()), TokenKind::Eof]
        );
        assert_eq!(
            kinds("&(*value)"),
            vec![TokenKind::Reference("&(*value)".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn star_between_identifiers_is_an_operator() {
        assert_eq!(
            kinds("a * b")[1],
            TokenKind::Star
        );
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let buffer = SourceBuffer::new("test.spc", "var s = \"oops;");
        let err = lex(&buffer).unwrap_err();
        assert_eq!(err.category(), Category::UnfinishedString);
        assert_eq!(err.span().start(), 8);
    }

    #[test]
    fn unterminated_reference_is_fatal() {
        let buffer = SourceBuffer::new("test.spc", "&(broken");
        let err = lex(&buffer).unwrap_err();
        assert_eq!(err.category(), Category::UnfinishedPointer);
    }

    #[test]
    fn unexpected_symbol_is_fatal() {
        let buffer = SourceBuffer::new("test.spc", "var a = 1 # 2;");
        let err = lex(&buffer).unwrap_err();
        assert_eq!(err.category(), Category::UnexpectedSymbol);
    }

    #[test]
    fn tokens_carry_line_and_column() {
        let buffer = SourceBuffer::new("test.spc", "var x;\n  return;\n");
        let tokens = lex(&buffer).unwrap();
        assert_eq!(tokens[0].line(), 1);
        assert_eq!(tokens[0].column(), 1);
        let ret = &tokens[3];
        assert!(matches!(ret.kind(), TokenKind::Keyword(Keyword::Return)));
        assert_eq!(ret.line(), 2);
        assert_eq!(ret.column(), 3);
    }

    #[test]
    fn lexeme_matches_source_slice() {
        let buffer = SourceBuffer::new("test.spc", "total += counter * 2;");
        let tokens = lex(&buffer).unwrap();
        for token in &tokens {
            if let Some(text) = token.kind().as_str() {
                if matches!(token.kind(), TokenKind::Identifier(_) | TokenKind::Integer(_)) {
                    assert_eq!(buffer.slice(token.span()), text);
                }
            }
        }
    }

    #[test]
    fn exactly_one_eof() {
        let buffer = SourceBuffer::new("test.spc", "a b c");
        let tokens = lex(&buffer).unwrap();
        let eof_count = tokens.iter().filter(|t| t.kind().is_eof()).count();
        assert_eq!(eof_count, 1);
        assert!(tokens.last().unwrap().kind().is_eof());
    }
}

// Copyright 2026 The SPACE Project Developers
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the lexer.

use proptest::prelude::*;

use super::{Keyword, SourceBuffer, Token, TokenKind, lex};

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z_][a-zA-Z0-9_]{0,12}".prop_filter("not a reserved word", |word| {
        Keyword::lookup(word).is_none()
    })
}

proptest! {
    #[test]
    fn single_identifier_lexes_to_one_token(word in identifier_strategy()) {
        let buffer = SourceBuffer::new("prop.spc", word.clone());
        let tokens = lex(&buffer).unwrap();
        prop_assert_eq!(tokens.len(), 2);
        prop_assert_eq!(tokens[0].kind(), &TokenKind::Identifier(word.into()));
        prop_assert!(tokens[1].kind().is_eof());
    }

    #[test]
    fn integers_round_trip(value in 0i64..=i64::from(i32::MAX)) {
        let text = value.to_string();
        let buffer = SourceBuffer::new("prop.spc", text.clone());
        let tokens = lex(&buffer).unwrap();
        prop_assert_eq!(tokens[0].kind(), &TokenKind::Integer(text.into()));
    }

    #[test]
    fn token_stream_ends_with_exactly_one_eof(
        words in prop::collection::vec(identifier_strategy(), 0..8)
    ) {
        let source = words.join(" ");
        let buffer = SourceBuffer::new("prop.spc", source);
        let tokens = lex(&buffer).unwrap();
        let eof_count = tokens.iter().filter(|t| t.kind().is_eof()).count();
        prop_assert_eq!(eof_count, 1);
        prop_assert!(tokens.last().unwrap().kind().is_eof());
    }

    #[test]
    fn lexeme_equals_source_slice(
        words in prop::collection::vec(identifier_strategy(), 1..8)
    ) {
        let source = words.join("  ");
        let buffer = SourceBuffer::new("prop.spc", source);
        let tokens = lex(&buffer).unwrap();
        for token in tokens.iter().filter(|t| !t.kind().is_eof()) {
            prop_assert_eq!(
                buffer.slice(token.span()),
                token.kind().as_str().unwrap()
            );
        }
    }

    #[test]
    fn surrounding_trivia_never_changes_kinds(
        padding in "[ \t\n]{0,6}",
        word in identifier_strategy()
    ) {
        let bare = SourceBuffer::new("prop.spc", word.clone());
        let padded = SourceBuffer::new(
            "prop.spc",
            format!("{padding}// note\n{word}{padding}"),
        );
        let bare_kinds: Vec<TokenKind> =
            lex(&bare).unwrap().into_iter().map(Token::into_kind).collect();
        let padded_kinds: Vec<TokenKind> =
            lex(&padded).unwrap().into_iter().map(Token::into_kind).collect();
        prop_assert_eq!(bare_kinds, padded_kinds);
    }
}

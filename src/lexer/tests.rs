//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Numeric literals (integers and floats)
//! - String literals with escape sequences
//! - Operators and punctuation
//! - Comments
//! - Error cases

use super::{lexer::tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source, Some("test.cr".to_string()))
        .unwrap()
        .iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    let source = "let be in end fun is if then else while do true false and or print input sort";

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Let,
            TokenKind::Be,
            TokenKind::In,
            TokenKind::End,
            TokenKind::Fun,
            TokenKind::Is,
            TokenKind::If,
            TokenKind::Then,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::Do,
            TokenKind::True,
            TokenKind::False,
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Print,
            TokenKind::Input,
            TokenKind::Sort,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_identifiers() {
    let source = "foo bar baz_123 _underscore letter ending";
    let tokens = tokenize(source, Some("test.cr".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[2].value, "baz_123");
    assert_eq!(tokens[3].value, "_underscore");
    // Keywords only match whole words.
    assert_eq!(tokens[4].kind, TokenKind::Identifier);
    assert_eq!(tokens[4].value, "letter");
    assert_eq!(tokens[5].kind, TokenKind::Identifier);
    assert_eq!(tokens[6].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let source = "42 3.14 0 100.5";
    let tokens = tokenize(source, Some("test.cr".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Integer);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Float);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Integer);
    assert_eq!(tokens[3].kind, TokenKind::Float);
    assert_eq!(tokens[3].value, "100.5");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_trailing_dot_is_member_access() {
    assert_eq!(
        kinds("m.1"),
        vec![TokenKind::Identifier, TokenKind::Dot, TokenKind::Integer, TokenKind::EOF]
    );
}

#[test]
fn test_tokenize_strings() {
    let source = r#""hello" "world" "multiple words""#;
    let tokens = tokenize(source, Some("test.cr".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].value, "world");
    assert_eq!(tokens[2].value, "multiple words");
    assert_eq!(tokens[3].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_string_escapes() {
    let source = r#""hello\nworld" "tab\there" "backslash\\" "quote\"test""#;
    let tokens = tokenize(source, Some("test.cr".to_string())).unwrap();

    assert_eq!(tokens[0].value, "hello\nworld");
    assert_eq!(tokens[1].value, "tab\there");
    assert_eq!(tokens[2].value, "backslash\\");
    assert_eq!(tokens[3].value, "quote\"test");
    assert_eq!(tokens[4].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_operators() {
    let source = "+ - * / % ^ == != < > <= >= :=";

    assert_eq!(
        kinds(source),
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Caret,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::Walrus,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } [ ] . , ; :"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::Dot,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_walrus_without_spaces() {
    assert_eq!(
        kinds("x:=1"),
        vec![TokenKind::Identifier, TokenKind::Walrus, TokenKind::Integer, TokenKind::EOF]
    );
}

#[test]
fn test_tokenize_comments() {
    let source = "x // the rest is ignored\n+ 1";

    assert_eq!(
        kinds(source),
        vec![TokenKind::Identifier, TokenKind::Plus, TokenKind::Integer, TokenKind::EOF]
    );
}

#[test]
fn test_token_spans_are_byte_offsets() {
    let tokens = tokenize("let  x", Some("test.cr".to_string())).unwrap();

    assert_eq!(tokens[0].span.start.0, 0);
    assert_eq!(tokens[0].span.end.0, 3);
    assert_eq!(tokens[1].span.start.0, 5);
    assert_eq!(tokens[2].span.start.0, 6);
}

#[test]
fn test_string_span_covers_quotes() {
    let tokens = tokenize(r#"  "ab""#, Some("test.cr".to_string())).unwrap();

    assert_eq!(tokens[0].span.start.0, 2);
    assert_eq!(tokens[0].span.end.0, 6);
}

#[test]
fn test_unrecognised_token() {
    let error = tokenize("1 + @", Some("test.cr".to_string())).unwrap_err();

    assert_eq!(error.get_error_name(), "SyntaxError");
    assert_eq!(error.get_position().0, 4);
}

#[test]
fn test_unterminated_string() {
    let error = tokenize("\"abc", Some("test.cr".to_string())).unwrap_err();

    assert_eq!(error.get_position().0, 0);
}

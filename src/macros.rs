//! Utility macros for the interpreter front end.
//!
//! This module defines helper macros used by the lexer:
//!
//! - `MK_TOKEN!` - Creates a Token instance
//! - `MK_DEFAULT_HANDLER!` - Creates a default lexer handler for fixed-text tokens
//!
//! These macros reduce boilerplate in the lexer pattern table.

/// Creates a Token instance.
///
/// # Arguments
///
/// * `$kind` - The TokenKind
/// * `$value` - The token's string value
/// * `$span` - The source span
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenKind::Integer, "42".to_string(), span);
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($kind:expr, $value:expr, $span:expr) => {
        $crate::lexer::tokens::Token {
            kind: $kind,
            value: $value,
            span: $span,
        }
    };
}

/// Creates a default lexer handler for tokens whose text never varies.
///
/// Generates a handler function that pushes a token with the given kind
/// and advances the lexer position by the token's length.
///
/// # Example
///
/// ```ignore
/// RegexPattern {
///     regex: Regex::new("^:=").unwrap(),
///     handler: MK_DEFAULT_HANDLER!(TokenKind::Walrus, ":="),
/// }
/// ```
#[macro_export]
macro_rules! MK_DEFAULT_HANDLER {
    ($kind:expr, $value:literal) => {
        |lexer: &mut $crate::lexer::lexer::Lexer, _regex: &regex::Regex| {
            let span = lexer.span_of($value.len());
            lexer.push($crate::MK_TOKEN!($kind, String::from($value), span));
            lexer.advance_n($value.len());
        }
    };
}

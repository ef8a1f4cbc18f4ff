//! Parser implementation for building the syntax tree.
//!
//! This module contains the main Parser struct and the `parse` entry point.
//! The parser uses a Pratt parser approach with NUD/LED handlers for
//! expression parsing; every construct in the language is an expression,
//! so there is no separate statement table.
//!
//! It maintains lookup tables for:
//! - NUD (null denotation) handlers for prefix expressions
//! - LED (left denotation) handlers for infix expressions
//! - Binding powers for operator precedence

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::ast::Expr,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{
    expr::parse_sequence,
    lookups::{create_token_lookups, BPLookup, BindingPower, LEDHandler, LEDLookup, NUDHandler, NUDLookup},
};

/// The main parser structure that maintains parsing state.
///
/// This struct holds the token stream and the lookup tables for parsing
/// expressions. It tracks the current position in the token stream and
/// provides methods for token consumption.
pub struct Parser {
    /// The list of tokens to parse, always terminated by EOF
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// The name of the source file being parsed
    file: Rc<String>,
    /// Lookup table for null denotation (prefix) expression handlers
    nud_lookup: NUDLookup,
    /// Lookup table for left denotation (infix) expression handlers
    led_lookup: LEDLookup,
    /// Lookup table for expression binding powers (precedence)
    binding_power_lookup: BPLookup,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// A missing trailing EOF token is supplied so the cursor can never run
    /// off the end of the stream.
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position(0, Rc::clone(&file)));

            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span { start: end.clone(), end },
            });
        }

        Parser {
            tokens,
            pos: 0,
            file,
            nud_lookup: HashMap::new(),
            led_lookup: HashMap::new(),
            binding_power_lookup: HashMap::new(),
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the binding power of the current token, `Default` if it has none.
    pub fn current_binding_power(&self) -> BindingPower {
        *self
            .binding_power_lookup
            .get(&self.current_token_kind())
            .unwrap_or(&BindingPower::Default)
    }

    /// Advances to the next token and returns the previous token.
    ///
    /// The cursor stays on EOF once it gets there.
    pub fn advance(&mut self) -> &Token {
        let previous = self.pos;
        if self.current_token_kind() != TokenKind::EOF {
            self.pos += 1;
        }
        &self.tokens[previous]
    }

    /// Expects a token of the specified kind, with optional custom error.
    ///
    /// Returns Ok(Token) if the current token matches, otherwise returns an Error.
    pub fn expect_error(&mut self, expected_kind: TokenKind, error: Option<Error>) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Error::new(
                    ErrorImpl::UnexpectedTokenDetailed {
                        token: token.value.clone(),
                        message: format!("expected {}", expected_kind),
                    },
                    token.span.start.clone(),
                )),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns a reference to the NUD (null denotation) lookup table.
    pub fn get_nud_lookup(&self) -> &NUDLookup {
        &self.nud_lookup
    }

    /// Returns a reference to the LED (left denotation) lookup table.
    pub fn get_led_lookup(&self) -> &LEDLookup {
        &self.led_lookup
    }

    /// Registers a left denotation (infix) handler for a token.
    pub fn led(&mut self, kind: TokenKind, binding_power: BindingPower, led_fn: LEDHandler) {
        self.binding_power_lookup.insert(kind, binding_power);
        self.led_lookup.insert(kind, led_fn);
    }

    /// Registers a null denotation (prefix) handler for a token.
    ///
    /// Prefix handlers carry no binding power of their own, so a token that
    /// is both prefix and infix (`-`, `(`, `[`) keeps its infix precedence.
    pub fn nud(&mut self, kind: TokenKind, nud_fn: NUDHandler) {
        self.nud_lookup.insert(kind, nud_fn);
    }

    /// Returns the position of the current token in the source file.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// Returns the end position of the most recently consumed token.
    pub fn last_end(&self) -> Position {
        match self.pos {
            0 => Position(0, Rc::clone(&self.file)),
            pos => self.tokens[pos - 1].span.end.clone(),
        }
    }

    /// Builds a span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        Span {
            start,
            end: self.last_end(),
        }
    }

    pub fn unexpected_token(&self) -> Error {
        Error::new(
            ErrorImpl::UnexpectedToken {
                token: self.current_token().value.clone(),
            },
            self.get_position(),
        )
    }
}

/// Parses a stream of tokens into a syntax tree.
///
/// This is the main entry point for parsing. It creates a parser instance,
/// initializes the lookup tables, and parses the whole program as one
/// sequence of `;`-separated expressions.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> Result<Expr, Error> {
    let mut parser = Parser::new(tokens, file);
    create_token_lookups(&mut parser);

    let program = parse_sequence(&mut parser, &[TokenKind::EOF], &[TokenKind::Semicolon])?;

    if parser.has_tokens() {
        return Err(parser.unexpected_token());
    }

    Ok(program)
}

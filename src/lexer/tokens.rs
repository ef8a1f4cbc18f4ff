use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("let", TokenKind::Let);
        map.insert("be", TokenKind::Be);
        map.insert("in", TokenKind::In);
        map.insert("end", TokenKind::End);
        map.insert("fun", TokenKind::Fun);
        map.insert("is", TokenKind::Is);
        map.insert("if", TokenKind::If);
        map.insert("then", TokenKind::Then);
        map.insert("else", TokenKind::Else);
        map.insert("while", TokenKind::While);
        map.insert("do", TokenKind::Do);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map.insert("print", TokenKind::Print);
        map.insert("input", TokenKind::Input);
        map.insert("sort", TokenKind::Sort);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Integer,
    Float,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Walrus,    // :=
    Equals,    // ==
    NotEquals, // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Dot,
    Semicolon,
    Colon,
    Comma,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,
    Caret,

    // Reserved
    Let,
    Be,
    In,
    End,
    Fun,
    Is,
    If,
    Then,
    Else,
    While,
    Do,
    True,
    False,
    And,
    Or,
    Print,
    Input,
    Sort,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_one_of_many(&[TokenKind::String, TokenKind::Identifier, TokenKind::Integer, TokenKind::Float]) {
            write!(f, "{} ({})", self.kind, self.value)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

impl Token {
    pub fn is_one_of_many(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }
}

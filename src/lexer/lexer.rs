use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{errors::errors::{Error, ErrorImpl}, Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    // Every pattern is anchored; multi-character operators precede their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new("^[0-9]+(\\.[0-9]+)?").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new("^\\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new(r#"^"(\\.|[^"\\])*""#).unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new("^//[^\n]*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^\\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[") },
        RegexPattern { regex: Regex::new("^\\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]") },
        RegexPattern { regex: Regex::new("^\\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
        RegexPattern { regex: Regex::new("^\\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
        RegexPattern { regex: Regex::new("^\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: Regex::new("^\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: Regex::new("^:=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Walrus, ":=") },
        RegexPattern { regex: Regex::new("^==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==") },
        RegexPattern { regex: Regex::new("^!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
        RegexPattern { regex: Regex::new("^<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
        RegexPattern { regex: Regex::new("^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        RegexPattern { regex: Regex::new("^>=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=") },
        RegexPattern { regex: Regex::new("^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
        RegexPattern { regex: Regex::new("^\\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dot, ".") },
        RegexPattern { regex: Regex::new("^;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        RegexPattern { regex: Regex::new("^:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":") },
        RegexPattern { regex: Regex::new("^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: Regex::new("^\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new("^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
        RegexPattern { regex: Regex::new("^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        RegexPattern { regex: Regex::new("^\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
        RegexPattern { regex: Regex::new("^%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Percent, "%") },
        RegexPattern { regex: Regex::new("^\\^").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Caret, "^") },
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            pos: 0,
            tokens: vec![],
            source,
            file: file_name,
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> char {
        self.remainder().chars().next().unwrap_or('\0')
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self) -> Position {
        Position(self.pos as u32, Rc::clone(&self.file))
    }

    /// Span covering the next `len` bytes of source.
    pub fn span_of(&self, len: usize) -> Span {
        Span {
            start: self.position(),
            end: Position((self.pos + len) as u32, Rc::clone(&self.file)),
        }
    }

    fn matched_len(&self, regex: &Regex) -> usize {
        regex.find(self.remainder()).map_or(0, |m| m.end())
    }
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let len = lexer.matched_len(regex);
    let matched = String::from(&lexer.remainder()[..len]);

    let kind = if matched.contains('.') {
        TokenKind::Float
    } else {
        TokenKind::Integer
    };

    lexer.push(MK_TOKEN!(kind, matched, lexer.span_of(len)));
    lexer.advance_n(len);
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let len = lexer.matched_len(regex);
    lexer.advance_n(len);
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) {
    let len = lexer.matched_len(regex);
    let raw = &lexer.remainder()[1..len - 1];

    let mut result = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('0') => result.push('\0'),
            _ => {
                result.push(ch); // Keep the backslash
                continue;
            }
        }
        chars.next();
    }

    let span = lexer.span_of(len);
    lexer.push(MK_TOKEN!(TokenKind::String, result, span));
    lexer.advance_n(len);
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let len = lexer.matched_len(regex);
    let value = String::from(&lexer.remainder()[..len]);

    let kind = RESERVED_LOOKUP.get(value.as_str()).copied().unwrap_or(TokenKind::Identifier);

    lexer.push(MK_TOKEN!(kind, value, lexer.span_of(len)));
    lexer.advance_n(len);
}

pub fn tokenize(source: &str, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(String::from(source), file);

    while !lex.at_eof() {
        let pattern = PATTERNS.iter().find(|pattern| pattern.regex.is_match(lex.remainder()));

        match pattern {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex),
            None => {
                return Err(Error::new(
                    ErrorImpl::UnrecognisedToken { token: lex.at().to_string() },
                    lex.position(),
                ))
            }
        }
    }

    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), lex.span_of(0)));
    Ok(lex.tokens)
}

use std::collections::HashMap;

use crate::{ast::ast::Expr, errors::errors::Error, lexer::tokens::TokenKind};

use super::{expr::*, parser::Parser};

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub enum BindingPower {
    Default,
    Assignment,
    Logical,
    Relational,
    Additive,
    Multiplicative,
    Power,
    Call,
    Member,
    Primary,
}

pub type NUDHandler = fn(&mut Parser) -> Result<Expr, Error>;
pub type LEDHandler = fn(&mut Parser, Expr, BindingPower) -> Result<Expr, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    parser.led(TokenKind::Walrus, BindingPower::Assignment, parse_assignment_expr);

    // Logical
    parser.led(TokenKind::And, BindingPower::Logical, parse_binary_expr);
    parser.led(TokenKind::Or, BindingPower::Logical, parse_binary_expr);

    // Relational
    parser.led(TokenKind::Less, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::LessEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Greater, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::GreaterEquals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::Equals, BindingPower::Relational, parse_binary_expr);
    parser.led(TokenKind::NotEquals, BindingPower::Relational, parse_binary_expr);

    // Additive, multiplicative and power
    parser.led(TokenKind::Plus, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Dash, BindingPower::Additive, parse_binary_expr);
    parser.led(TokenKind::Star, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Slash, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Percent, BindingPower::Multiplicative, parse_binary_expr);
    parser.led(TokenKind::Caret, BindingPower::Power, parse_binary_expr);

    // Postfix forms
    parser.led(TokenKind::OpenParen, BindingPower::Call, parse_call_expr);
    parser.led(TokenKind::OpenBracket, BindingPower::Call, parse_index_expr);
    parser.led(TokenKind::Dot, BindingPower::Member, parse_member_expr);

    // Literals and symbols
    parser.nud(TokenKind::Integer, parse_literal_expr);
    parser.nud(TokenKind::Float, parse_literal_expr);
    parser.nud(TokenKind::String, parse_literal_expr);
    parser.nud(TokenKind::True, parse_literal_expr);
    parser.nud(TokenKind::False, parse_literal_expr);
    parser.nud(TokenKind::Identifier, parse_symbol_expr);
    parser.nud(TokenKind::Dash, parse_prefix_expr);
    parser.nud(TokenKind::OpenParen, parse_grouping_expr);
    parser.nud(TokenKind::OpenBracket, parse_array_expr);
    parser.nud(TokenKind::OpenCurly, parse_map_expr);

    // Keyword forms
    parser.nud(TokenKind::Let, parse_let_expr);
    parser.nud(TokenKind::Fun, parse_fun_expr);
    parser.nud(TokenKind::If, parse_if_expr);
    parser.nud(TokenKind::While, parse_while_expr);
    parser.nud(TokenKind::Print, parse_builtin_expr);
    parser.nud(TokenKind::Input, parse_builtin_expr);
    parser.nud(TokenKind::Sort, parse_builtin_expr);
}

// Lookup tables inside parser struct, so it's easier
pub type NUDLookup = HashMap<TokenKind, NUDHandler>;
pub type LEDLookup = HashMap<TokenKind, LEDHandler>;
pub type BPLookup = HashMap<TokenKind, BindingPower>;

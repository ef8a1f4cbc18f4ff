//! Parser module for building the syntax tree.
//!
//! This module contains the parser that transforms a stream of tokens
//! into an unresolved expression tree. It uses a Pratt parser for
//! expressions with proper operator precedence and handles:
//!
//! - Keyword forms (`let`, `fun`, `if`, `while`, `print`, `input`, `sort`)
//! - Binary operators, calls, indexing and map member access
//! - Array, array-initialiser and map literals
//! - Assignment targets (names, array elements, map entries)
//!
//! The parser uses NUD (null denotation) and LED (left denotation) functions
//! for expression parsing with binding power for precedence handling.

pub mod expr;
pub mod lookups;
pub mod parser;

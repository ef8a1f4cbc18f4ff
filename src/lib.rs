#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::{
    ast::ast::Expr,
    errors::errors::{Error, ErrorTip},
    interpreter::{console::Console, interpreter::Interpreter, value::Value},
    lexer::lexer::tokenize,
    parser::parser::parse,
    resolver::resolver::resolve,
};

pub mod ast;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod resolver;

extern crate regex;

/// Byte offset into a source file, with the file's label.
#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Tokenizes, parses and resolves `source`, producing a tree ready for evaluation.
pub fn compile_source(source: &str, file: &str) -> Result<Expr, Error> {
    let tokens = tokenize(source, Some(String::from(file)))?;
    let tree = parse(tokens, Rc::new(String::from(file)))?;
    resolve(tree)
}

/// Runs `source` end to end against a fresh environment.
pub fn run_source(source: &str, file: &str, console: Console) -> (Interpreter, Result<Value, Error>) {
    let mut interpreter = Interpreter::with_console(console);

    let result = compile_source(source, file).and_then(|tree| interpreter.run(&tree));

    (interpreter, result)
}

/// Returns the 1-based line number, the line text and the column of `position`.
///
/// Positions past the end of the source clamp to the last line.
pub fn get_line_at_position(source: &str, position: u32) -> (usize, String, usize) {
    let pos = (position as usize).min(source.len().saturating_sub(1));

    let mut start = 0;
    let mut line_number = 1;

    for line in source.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            return (line_number, line.to_string(), pos - start);
        }

        start = end;
        line_number += 1;
    }

    (line_number, String::new(), 0)
}


pub fn display_error(error: &Error, source: &str, file: &str) {
    /*
        Error: TypeError (message)
        -> program.cr
           |
        20 | let a be # in a end
           | ---------^
    */

    let position = error.get_position();
    let (line, line_text, line_pos) = get_line_at_position(source, position.0);

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("-> {}", file);
    eprintln!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    eprintln!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}

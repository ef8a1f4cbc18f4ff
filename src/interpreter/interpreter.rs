//! Tree-walking evaluator for resolved syntax trees.
//!
//! This module contains the Interpreter struct and `evaluate_expr`, which
//! evaluates one node against an explicit environment. Variable references
//! carry the depth assigned by the resolver, so lookups never search by name.
//!
//! Every construct that the resolver scopes (let, if branches, while
//! iterations, call bodies) truncates the environment back to its entry
//! length on the way out, keeping runtime depths in step with static ones.

use std::{cell::RefCell, cmp::Ordering, rc::Rc};

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::{
    ast::ast::{AssignTarget, Expr, ExprKind},
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::{
    console::Console,
    environment::Environment,
    operators::evaluate_binary,
    value::{Closure, Value},
};

/// Owns everything evaluation needs besides the environment.
#[derive(Debug, Default)]
pub struct Interpreter {
    console: Console,
}

impl Interpreter {
    pub fn with_console(console: Console) -> Self {
        Interpreter { console }
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Evaluates a resolved program against a fresh environment.
    pub fn run(&mut self, tree: &Expr) -> Result<Value, Error> {
        let mut env = Environment::new();
        evaluate_expr(self, tree, &mut env)
    }
}

/// Runs `f`, then drops every binding it pushed, on success or failure.
fn in_scope<T>(env: &mut Environment, f: impl FnOnce(&mut Environment) -> Result<T, Error>) -> Result<T, Error> {
    let mark = env.len();
    let result = f(env);
    env.truncate(mark);
    result
}

fn type_mismatch(expected: &str, received: &Value, position: &Position) -> Error {
    Error::new(
        ErrorImpl::TypeMismatch {
            expected: expected.to_string(),
            received: received.type_name().to_string(),
        },
        position.clone(),
    )
}

fn expect_bool(value: &Value, position: &Position) -> Result<bool, Error> {
    match value {
        Value::Bool(value) => Ok(*value),
        other => Err(type_mismatch("Bool", other, position)),
    }
}

fn expect_int(value: &Value, position: &Position) -> Result<i64, Error> {
    match value {
        Value::Int(value) => Ok(*value),
        other => Err(type_mismatch("Int", other, position)),
    }
}

fn expect_array(value: &Value, position: &Position) -> Result<Rc<RefCell<Vec<Value>>>, Error> {
    match value {
        Value::Array(elements) => Ok(Rc::clone(elements)),
        other => Err(type_mismatch("Array", other, position)),
    }
}

fn expect_map(value: &Value, position: &Position) -> Result<Rc<RefCell<IndexMap<String, Value>>>, Error> {
    match value {
        Value::Map(entries) => Ok(Rc::clone(entries)),
        other => Err(type_mismatch("Map", other, position)),
    }
}

/// Strings key a map verbatim; numbers and booleans by their rendering.
fn map_key(value: &Value, position: &Position) -> Result<String, Error> {
    match value {
        Value::String(key) => Ok(key.clone()),
        Value::Int(_) | Value::Float(_) | Value::Bool(_) => Ok(value.to_string()),
        other => Err(type_mismatch("String", other, position)),
    }
}

fn check_bounds(index: i64, length: usize, position: &Position) -> Result<usize, Error> {
    match usize::try_from(index) {
        Ok(slot) if slot < length => Ok(slot),
        _ => Err(Error::new(ErrorImpl::IndexOutOfBounds { index, length }, position.clone())),
    }
}

fn io_error(error: std::io::Error, position: &Position) -> Error {
    Error::new(
        ErrorImpl::InputFailure {
            message: error.to_string(),
        },
        position.clone(),
    )
}

/// Input text becomes a Float if it has a `.`, else an Int, else stays a String.
fn parse_input(line: String) -> Value {
    let text = line.trim();

    let number = if text.contains('.') {
        text.parse().ok().map(Value::Float)
    } else {
        text.parse().ok().map(Value::Int)
    };

    number.unwrap_or(Value::String(line))
}

fn make_closure(params: &[String], body: &Rc<Expr>, env: &Environment, name: Option<String>) -> Value {
    Value::Closure(Rc::new(Closure {
        params: params.to_vec(),
        body: Rc::clone(body),
        env: env.clone(),
        name,
    }))
}

fn sort_array(elements: &mut [Value], position: &Position) -> Result<(), Error> {
    if elements.iter().all(Value::is_numeric) {
        elements.sort_by(|a, b| match (a, b) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (a, b) => as_float(a).partial_cmp(&as_float(b)).unwrap_or(Ordering::Equal),
        });
        return Ok(());
    }

    if elements.iter().all(|element| matches!(element, Value::String(_))) {
        elements.sort_by(|a, b| match (a, b) {
            (Value::String(a), Value::String(b)) => a.cmp(b),
            _ => Ordering::Equal,
        });
        return Ok(());
    }

    let offending = elements
        .iter()
        .find(|element| !element.is_numeric() && !matches!(element, Value::String(_)))
        .unwrap_or(&elements[0]);

    Err(type_mismatch("Int, Float or String elements", offending, position))
}

fn as_float(value: &Value) -> f64 {
    match value {
        Value::Int(value) => *value as f64,
        Value::Float(value) => *value,
        _ => f64::NAN,
    }
}

fn call_closure(
    interpreter: &mut Interpreter,
    closure: Rc<Closure>,
    arguments: Vec<Value>,
    position: &Position,
) -> Result<Value, Error> {
    if arguments.len() != closure.params.len() {
        return Err(Error::new(
            ErrorImpl::ArityMismatch {
                expected: closure.params.len(),
                received: arguments.len(),
            },
            position.clone(),
        ));
    }

    let mut call_env = closure.env.clone();
    if let Some(name) = &closure.name {
        call_env.push(name.clone(), Value::Closure(Rc::clone(&closure)));
    }
    for (param, argument) in closure.params.iter().zip(arguments) {
        call_env.push(param.clone(), argument);
    }

    trace!(
        function = closure.name.as_deref().unwrap_or("<anonymous>"),
        depth = call_env.len(),
        "calling closure"
    );

    evaluate_expr(interpreter, &closure.body, &mut call_env)
}

/// Evaluates `expr` against `env`.
///
/// `env` is left exactly as long as it was, except that a top-level
/// assignment to a fresh name appends one binding.
pub fn evaluate_expr(interpreter: &mut Interpreter, expr: &Expr, env: &mut Environment) -> Result<Value, Error> {
    let position = &expr.span.start;

    match &expr.kind {
        ExprKind::Literal(literal) => Ok(Value::from(literal)),
        ExprKind::VarRef { name, binding } => {
            let depth = binding.ok_or_else(|| {
                Error::new(ErrorImpl::UnresolvedVariable { variable: name.clone() }, position.clone())
            })?;

            env.get(depth)
                .cloned()
                .ok_or_else(|| Error::new(ErrorImpl::UnboundVariable { variable: name.clone() }, position.clone()))
        }
        ExprKind::BinOp { operator, left, right } => {
            let left = evaluate_expr(interpreter, left, env)?;
            let right = evaluate_expr(interpreter, right, env)?;

            evaluate_binary(*operator, left, right).map_err(|error| Error::new(error, position.clone()))
        }
        ExprKind::Let { name, value, body } => in_scope(env, |env| {
            let value = match &value.kind {
                ExprKind::Fun { params, body } => make_closure(params, body, env, Some(name.clone())),
                _ => evaluate_expr(interpreter, value, env)?,
            };

            env.push(name.clone(), value);
            evaluate_expr(interpreter, body, env)
        }),
        ExprKind::Assign { name, target, value } => {
            let value = evaluate_expr(interpreter, value, env)?;

            match target {
                AssignTarget::Existing(depth) if env.set(*depth, value.clone()) => {}
                AssignTarget::Fresh => {
                    debug!(name = %name, "declaring binding by assignment");
                    env.push(name.clone(), value.clone());
                }
                _ => {
                    return Err(Error::new(
                        ErrorImpl::UnresolvedVariable { variable: name.clone() },
                        position.clone(),
                    ))
                }
            }

            Ok(value)
        }
        ExprKind::If {
            condition,
            then_branch,
            else_branch,
        } => {
            let value = evaluate_expr(interpreter, condition, env)?;
            let branch = if expect_bool(&value, &condition.span.start)? {
                then_branch
            } else {
                else_branch
            };

            in_scope(env, |env| evaluate_expr(interpreter, branch, env))
        }
        ExprKind::While { condition, body } => {
            let mut last = Value::Nil;
            let mut iterations = 0usize;

            loop {
                let iteration = in_scope(env, |env| {
                    let value = evaluate_expr(interpreter, condition, env)?;
                    if !expect_bool(&value, &condition.span.start)? {
                        return Ok(None);
                    }

                    let mut result = Value::Nil;
                    for statement in body.iter() {
                        result = evaluate_expr(interpreter, statement, env)?;
                    }
                    Ok(Some(result))
                })?;

                match iteration {
                    Some(value) => last = value,
                    None => break,
                }

                iterations += 1;
                trace!(iterations, "loop iteration finished");
            }

            Ok(last)
        }
        ExprKind::Fun { params, body } => Ok(make_closure(params, body, env, None)),
        ExprKind::Call { callee, arguments } => {
            let function = evaluate_expr(interpreter, callee, env)?;
            let closure = match function {
                Value::Closure(closure) => closure,
                other => return Err(type_mismatch("Closure", &other, &callee.span.start)),
            };

            let arguments = arguments
                .iter()
                .map(|argument| evaluate_expr(interpreter, argument, env))
                .collect::<Result<Vec<_>, _>>()?;

            call_closure(interpreter, closure, arguments, position)
        }
        ExprKind::Array(elements) => {
            let elements = elements
                .iter()
                .map(|element| evaluate_expr(interpreter, element, env))
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Value::array(elements))
        }
        ExprKind::ArrayIndex { array, index } => {
            let array_value = evaluate_expr(interpreter, array, env)?;
            let index_value = evaluate_expr(interpreter, index, env)?;

            let elements = expect_array(&array_value, &array.span.start)?;
            let index = expect_int(&index_value, &index.span.start)?;

            let elements = elements.borrow();
            let slot = check_bounds(index, elements.len(), position)?;
            Ok(elements[slot].clone())
        }
        ExprKind::ArrayAssign { array, index, value } => {
            let array_value = evaluate_expr(interpreter, array, env)?;
            let index_value = evaluate_expr(interpreter, index, env)?;
            let value = evaluate_expr(interpreter, value, env)?;

            let elements = expect_array(&array_value, &array.span.start)?;
            let index = expect_int(&index_value, &index.span.start)?;

            let mut elements = elements.borrow_mut();
            let slot = check_bounds(index, elements.len(), position)?;
            elements[slot] = value.clone();
            Ok(value)
        }
        ExprKind::ArrayInit { value, size } => {
            let size_value = evaluate_expr(interpreter, size, env)?;
            let size_int = expect_int(&size_value, &size.span.start)?;
            let invalid_size = || Error::new(ErrorImpl::InvalidArraySize { size: size_int }, size.span.start.clone());
            let length = usize::try_from(size_int).map_err(|_| invalid_size())?;

            let value = evaluate_expr(interpreter, value, env)?;

            let mut elements = Vec::new();
            elements.try_reserve_exact(length).map_err(|_| invalid_size())?;
            // Every slot holds a clone of one value: arrays and maps end up shared.
            elements.resize(length, value);
            Ok(Value::array(elements))
        }
        ExprKind::Map(entries) => {
            let mut map = IndexMap::new();

            for (key, value) in entries.iter() {
                let key_value = evaluate_expr(interpreter, key, env)?;
                let key = map_key(&key_value, &key.span.start)?;
                let value = evaluate_expr(interpreter, value, env)?;

                map.insert(key, value);
            }

            Ok(Value::map(map))
        }
        ExprKind::MapAccess { map, key } => {
            let map_value = evaluate_expr(interpreter, map, env)?;
            let key_value = evaluate_expr(interpreter, key, env)?;

            let entries = expect_map(&map_value, &map.span.start)?;
            let key = map_key(&key_value, &key.span.start)?;

            let value = entries.borrow().get(&key).cloned();
            value.ok_or_else(|| Error::new(ErrorImpl::KeyNotFound { key }, position.clone()))
        }
        ExprKind::MapAssign { map, key, value } => {
            let map_value = evaluate_expr(interpreter, map, env)?;
            let key_value = evaluate_expr(interpreter, key, env)?;
            let value = evaluate_expr(interpreter, value, env)?;

            let entries = expect_map(&map_value, &map.span.start)?;
            let key = map_key(&key_value, &key.span.start)?;

            entries.borrow_mut().insert(key, value.clone());
            Ok(value)
        }
        ExprKind::Print(argument) => {
            let value = evaluate_expr(interpreter, argument, env)?;
            interpreter
                .console
                .println(&value.to_string())
                .map_err(|error| io_error(error, position))?;

            Ok(value)
        }
        ExprKind::Input(prompt) => {
            let prompt_value = evaluate_expr(interpreter, prompt, env)?;
            let prompt_text = match &prompt_value {
                Value::String(text) => text.clone(),
                other => return Err(type_mismatch("String", other, &prompt.span.start)),
            };

            let line = interpreter
                .console
                .read_line(&prompt_text)
                .map_err(|error| io_error(error, position))?;

            let value = parse_input(line);
            debug!(kind = value.type_name(), "read input");
            Ok(value)
        }
        ExprKind::Sort(argument) => {
            let value = evaluate_expr(interpreter, argument, env)?;
            let elements = expect_array(&value, &argument.span.start)?;

            sort_array(&mut elements.borrow_mut(), &argument.span.start)?;
            Ok(value)
        }
        ExprKind::Sequence(expressions) => {
            let mut last = Value::Nil;
            for expression in expressions.iter() {
                last = evaluate_expr(interpreter, expression, env)?;
            }
            Ok(last)
        }
    }
}

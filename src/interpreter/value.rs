use std::{cell::RefCell, fmt::Display, rc::Rc};

use indexmap::IndexMap;

use crate::ast::ast::{Expr, Literal};

use super::environment::Environment;

/// A runtime value.
///
/// Arrays and maps are reference values: cloning a `Value` clones the handle,
/// so every clone sees mutations made through any other.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Result of a loop that never ran or an empty sequence.
    Nil,
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Array(Rc<RefCell<Vec<Value>>>),
    /// Iterates in insertion order; an overwritten key keeps its slot.
    Map(Rc<RefCell<IndexMap<String, Value>>>),
    Closure(Rc<Closure>),
}

/// A function value together with the bindings it was created under.
#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    pub params: Vec<String>,
    pub body: Rc<Expr>,
    /// Snapshot of the environment at creation time.
    pub env: Environment,
    /// Set when the closure was bound by `let`; calls rebind it under this
    /// name between the captured bindings and the parameters.
    pub name: Option<String>,
}

impl Value {
    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn map(entries: IndexMap<String, Value>) -> Self {
        Value::Map(Rc::new(RefCell::new(entries)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bool(_) => "Bool",
            Value::Array(_) => "Array",
            Value::Map(_) => "Map",
            Value::Closure(_) => "Closure",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Renders the value; strings are quoted only when nested in a collection.
    fn render(&self, nested: bool) -> String {
        match self {
            Value::Nil => String::from("nil"),
            Value::Int(value) => value.to_string(),
            Value::Float(value) => render_float(*value),
            Value::String(value) if nested => format!("{:?}", value),
            Value::String(value) => value.clone(),
            Value::Bool(value) => value.to_string(),
            Value::Array(elements) => {
                let elements: Vec<String> = elements.borrow().iter().map(|element| element.render(true)).collect();
                format!("[{}]", elements.join(", "))
            }
            Value::Map(entries) => {
                let entries: Vec<String> = entries
                    .borrow()
                    .iter()
                    .map(|(key, value)| format!("{:?}: {}", key, value.render(true)))
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
            Value::Closure(closure) => format!("<fun({})>", closure.params.join(", ")),
        }
    }
}

fn render_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render(false))
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Int(value) => Value::Int(*value),
            Literal::Float(value) => Value::Float(*value),
            Literal::String(value) => Value::String(value.clone()),
            Literal::Bool(value) => Value::Bool(*value),
        }
    }
}

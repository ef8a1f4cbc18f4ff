use std::cmp::Ordering;

use crate::{ast::operators::BinaryOperator, errors::errors::ErrorImpl};

use super::value::Value;

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn of(value: &Value) -> Option<Number> {
        match value {
            Value::Int(value) => Some(Number::Int(*value)),
            Value::Float(value) => Some(Number::Float(*value)),
            _ => None,
        }
    }

    fn as_float(self) -> f64 {
        match self {
            Number::Int(value) => value as f64,
            Number::Float(value) => value,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Number::Int(value) => value == 0,
            Number::Float(value) => value == 0.0,
        }
    }
}

fn invalid_operands(operator: BinaryOperator, left: &Value, right: &Value) -> ErrorImpl {
    ErrorImpl::InvalidOperands {
        operator: operator.symbol().to_string(),
        left: left.type_name().to_string(),
        right: right.type_name().to_string(),
    }
}

fn overflow(operator: BinaryOperator) -> ErrorImpl {
    ErrorImpl::IntegerOverflow {
        operator: operator.symbol().to_string(),
    }
}

/// Applies `operator` to two evaluated operands.
///
/// Both operands are always evaluated by the caller, including for `and`/`or`.
pub fn evaluate_binary(operator: BinaryOperator, left: Value, right: Value) -> Result<Value, ErrorImpl> {
    match operator {
        BinaryOperator::Add => add(left, right),
        BinaryOperator::Multiply => multiply(left, right),
        BinaryOperator::Subtract | BinaryOperator::Divide | BinaryOperator::Modulo | BinaryOperator::Power => {
            match (Number::of(&left), Number::of(&right)) {
                (Some(l), Some(r)) => arithmetic(operator, l, r),
                _ => Err(invalid_operands(operator, &left, &right)),
            }
        }
        BinaryOperator::Less
        | BinaryOperator::Greater
        | BinaryOperator::LessEquals
        | BinaryOperator::GreaterEquals
        | BinaryOperator::Equals
        | BinaryOperator::NotEquals => compare(operator, &left, &right),
        BinaryOperator::And | BinaryOperator::Or => {
            let (l, r) = match (truthiness(&left), truthiness(&right)) {
                (Some(l), Some(r)) => (l, r),
                _ => return Err(invalid_operands(operator, &left, &right)),
            };

            let result = if operator == BinaryOperator::And { l && r } else { l || r };
            Ok(Value::Int(result as i64))
        }
    }
}

fn add(left: Value, right: Value) -> Result<Value, ErrorImpl> {
    match (left, right) {
        (Value::String(l), Value::String(r)) => Ok(Value::String(l + &r)),
        (Value::String(l), r) if r.is_numeric() => Ok(Value::String(format!("{}{}", l, r))),
        (l, Value::String(r)) if l.is_numeric() => Ok(Value::String(format!("{}{}", l, r))),
        (l, r) => match (Number::of(&l), Number::of(&r)) {
            (Some(a), Some(b)) => arithmetic(BinaryOperator::Add, a, b),
            _ => Err(invalid_operands(BinaryOperator::Add, &l, &r)),
        },
    }
}

fn multiply(left: Value, right: Value) -> Result<Value, ErrorImpl> {
    match (&left, &right) {
        (Value::String(text), Value::Int(count)) | (Value::Int(count), Value::String(text)) => repeat(text, *count),
        _ => match (Number::of(&left), Number::of(&right)) {
            (Some(a), Some(b)) => arithmetic(BinaryOperator::Multiply, a, b),
            _ => Err(invalid_operands(BinaryOperator::Multiply, &left, &right)),
        },
    }
}

fn repeat(text: &str, count: i64) -> Result<Value, ErrorImpl> {
    if count <= 0 || text.is_empty() {
        return Ok(Value::String(String::new()));
    }

    let count = usize::try_from(count).map_err(|_| overflow(BinaryOperator::Multiply))?;
    let length = text
        .len()
        .checked_mul(count)
        .ok_or_else(|| overflow(BinaryOperator::Multiply))?;

    let mut repeated = String::new();
    repeated
        .try_reserve_exact(length)
        .map_err(|_| overflow(BinaryOperator::Multiply))?;
    repeated.extend(std::iter::repeat(text).take(count));

    Ok(Value::String(repeated))
}

fn arithmetic(operator: BinaryOperator, left: Number, right: Number) -> Result<Value, ErrorImpl> {
    if matches!(operator, BinaryOperator::Divide | BinaryOperator::Modulo) && right.is_zero() {
        return Err(ErrorImpl::DivisionByZero {
            operator: operator.symbol().to_string(),
        });
    }

    // `/` is always a float division.
    if operator == BinaryOperator::Divide {
        return Ok(Value::Float(left.as_float() / right.as_float()));
    }

    match (left, right) {
        (Number::Int(l), Number::Int(r)) => int_arithmetic(operator, l, r),
        (l, r) => Ok(Value::Float(float_arithmetic(operator, l.as_float(), r.as_float()))),
    }
}

fn int_arithmetic(operator: BinaryOperator, left: i64, right: i64) -> Result<Value, ErrorImpl> {
    let result = match operator {
        BinaryOperator::Add => left.checked_add(right),
        BinaryOperator::Subtract => left.checked_sub(right),
        BinaryOperator::Multiply => left.checked_mul(right),
        BinaryOperator::Modulo => left.checked_rem(right).map(|rem| {
            if rem != 0 && (rem < 0) != (right < 0) {
                rem + right
            } else {
                rem
            }
        }),
        BinaryOperator::Power => {
            if right < 0 {
                return Ok(Value::Float((left as f64).powf(right as f64)));
            }
            int_power(left, right)
        }
        _ => None,
    };

    result.map(Value::Int).ok_or_else(|| overflow(operator))
}

fn int_power(base: i64, exponent: i64) -> Option<i64> {
    match base {
        0 | 1 => Some(if exponent == 0 { 1 } else { base }),
        -1 => Some(if exponent % 2 == 0 { 1 } else { -1 }),
        _ => base.checked_pow(u32::try_from(exponent).ok()?),
    }
}

fn float_arithmetic(operator: BinaryOperator, left: f64, right: f64) -> f64 {
    match operator {
        BinaryOperator::Add => left + right,
        BinaryOperator::Subtract => left - right,
        BinaryOperator::Multiply => left * right,
        BinaryOperator::Modulo => {
            let rem = left % right;
            if rem != 0.0 && (rem < 0.0) != (right < 0.0) {
                rem + right
            } else {
                rem
            }
        }
        BinaryOperator::Power => left.powf(right),
        _ => left / right,
    }
}

fn compare(operator: BinaryOperator, left: &Value, right: &Value) -> Result<Value, ErrorImpl> {
    let ordering = match (Number::of(left), Number::of(right)) {
        (Some(Number::Int(l)), Some(Number::Int(r))) => Some(l.cmp(&r)),
        (Some(l), Some(r)) => l.as_float().partial_cmp(&r.as_float()),
        _ => {
            let equal = match (left, right) {
                (Value::Bool(l), Value::Bool(r)) => l == r,
                (Value::String(l), Value::String(r)) => l == r,
                _ => return Err(invalid_operands(operator, left, right)),
            };

            return match operator {
                BinaryOperator::Equals => Ok(Value::Bool(equal)),
                BinaryOperator::NotEquals => Ok(Value::Bool(!equal)),
                _ => Err(invalid_operands(operator, left, right)),
            };
        }
    };

    // NaN compares unequal to everything.
    let result = match ordering {
        None => operator == BinaryOperator::NotEquals,
        Some(ordering) => match operator {
            BinaryOperator::Less => ordering == Ordering::Less,
            BinaryOperator::Greater => ordering == Ordering::Greater,
            BinaryOperator::LessEquals => ordering != Ordering::Greater,
            BinaryOperator::GreaterEquals => ordering != Ordering::Less,
            BinaryOperator::Equals => ordering == Ordering::Equal,
            _ => ordering != Ordering::Equal,
        },
    };

    Ok(Value::Bool(result))
}

fn truthiness(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(value) => Some(*value),
        Value::Int(value) => Some(*value != 0),
        Value::Float(value) => Some(*value != 0.0),
        _ => None,
    }
}

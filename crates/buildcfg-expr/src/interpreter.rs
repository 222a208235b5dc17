//! Tree-walking evaluator

use std::cmp::Ordering;

use crate::ast::{BinaryOp, CompareOp, Expr, UnaryOp};
use crate::env::Bindings;
use crate::error::{Error, Result};
use crate::parser::parse;
use crate::value::{Number, Value};

/// Evaluates expressions against a set of bindings.
///
/// The interpreter holds no state; the same instance can be shared freely.
#[derive(Debug, Default, Clone, Copy)]
pub struct Interpreter;

impl Interpreter {
    pub fn new() -> Self {
        Self
    }

    /// Parse and evaluate `source`.
    ///
    /// # Example
    /// ```
    /// use buildcfg_expr::{Bindings, Interpreter, Value};
    ///
    /// let value = Interpreter::new().evaluate("41 + 1 == 42", &Bindings::new()).unwrap();
    /// assert_eq!(value, Value::Bool(true));
    /// ```
    pub fn evaluate(&self, source: &str, bindings: &Bindings) -> Result<Value> {
        tracing::trace!(expression = source, "Evaluating expression");
        let expr = parse(source)?;
        self.eval(&expr, bindings)
    }

    /// Evaluate `source` and apply truthiness to the result.
    pub fn is_true(&self, source: &str, bindings: &Bindings) -> Result<bool> {
        self.evaluate(source, bindings).map(|v| v.is_truthy())
    }

    pub fn eval(&self, expr: &Expr, bindings: &Bindings) -> Result<Value> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Name(name) => bindings
                .get(name)
                .cloned()
                .ok_or_else(|| Error::UnknownName(name.clone())),
            Expr::List(items) => items
                .iter()
                .map(|item| self.eval(item, bindings))
                .collect::<Result<Vec<_>>>()
                .map(Value::List),
            Expr::Unary { op, operand } => unary(*op, self.eval(operand, bindings)?),
            Expr::Binary { op, left, right } => {
                let left = self.eval(left, bindings)?;
                let right = self.eval(right, bindings)?;
                binary(*op, &left, &right)
            }
            Expr::Compare { first, rest } => {
                let mut left = self.eval(first, bindings)?;
                for (op, operand) in rest {
                    let right = self.eval(operand, bindings)?;
                    if !compare(*op, &left, &right)? {
                        return Ok(Value::Bool(false));
                    }
                    left = right;
                }
                Ok(Value::Bool(true))
            }
            Expr::And(left, right) => {
                let left = self.eval(left, bindings)?;
                if left.is_truthy() {
                    self.eval(right, bindings)
                } else {
                    Ok(left)
                }
            }
            Expr::Or(left, right) => {
                let left = self.eval(left, bindings)?;
                if left.is_truthy() {
                    Ok(left)
                } else {
                    self.eval(right, bindings)
                }
            }
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => {
                if self.eval(condition, bindings)?.is_truthy() {
                    self.eval(then, bindings)
                } else {
                    self.eval(otherwise, bindings)
                }
            }
            Expr::Call { function, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg, bindings))
                    .collect::<Result<Vec<_>>>()?;
                call(function, args)
            }
            Expr::Index { target, index } => {
                let target = self.eval(target, bindings)?;
                let index = self.eval(index, bindings)?;
                subscript(&target, &index)
            }
            Expr::Attribute { target, name } => match self.eval(target, bindings)? {
                Value::Map(mut entries) => entries
                    .swap_remove(name)
                    .ok_or_else(|| Error::KeyNotFound(name.clone())),
                other => Err(Error::type_error(format!(
                    "'{}' object has no attribute '{name}'",
                    other.type_name()
                ))),
            },
        }
    }
}

fn unary(op: UnaryOp, value: Value) -> Result<Value> {
    if op == UnaryOp::Not {
        return Ok(Value::Bool(!value.is_truthy()));
    }
    match (op, value.as_number()) {
        (UnaryOp::Neg, Some(Number::Int(i))) => i.checked_neg().map(Value::Int).ok_or(Error::Overflow),
        (UnaryOp::Neg, Some(Number::Float(f))) => Ok(Value::Float(-f)),
        (_, Some(Number::Int(i))) => Ok(Value::Int(i)),
        (_, Some(Number::Float(f))) => Ok(Value::Float(f)),
        (_, None) => Err(Error::type_error(format!(
            "bad operand type for unary operator: '{}'",
            value.type_name()
        ))),
    }
}

fn unsupported(op: &str, left: &Value, right: &Value) -> Error {
    Error::type_error(format!(
        "unsupported operand types for {op}: '{}' and '{}'",
        left.type_name(),
        right.type_name()
    ))
}

/// Largest string (in chars) or list a repetition may build.
const MAX_REPEAT: usize = 1 << 20;

/// Size of `len` elements repeated `count` times, bounded by [`MAX_REPEAT`].
fn repeat_len(len: usize, count: i64) -> Result<usize> {
    if len == 0 || count <= 0 {
        return Ok(0);
    }
    usize::try_from(count)
        .ok()
        .and_then(|n| len.checked_mul(n))
        .filter(|&total| total <= MAX_REPEAT)
        .ok_or(Error::Overflow)
}

fn repeat_str(s: &str, count: i64) -> Result<String> {
    if repeat_len(s.chars().count(), count)? == 0 {
        return Ok(String::new());
    }
    // count is positive and bounded once repeat_len accepts it
    Ok(s.repeat(count as usize))
}

fn repeat<T: Clone>(items: &[T], count: i64) -> Result<Vec<T>> {
    let total = repeat_len(items.len(), count)?;
    let mut out = Vec::with_capacity(total);
    while out.len() < total {
        out.extend_from_slice(items);
    }
    Ok(out)
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value> {
    match (op, left, right) {
        (BinaryOp::Add, Value::Str(a), Value::Str(b)) => return Ok(Value::Str(format!("{a}{b}"))),
        (BinaryOp::Add, Value::List(a), Value::List(b)) => {
            let mut items = a.clone();
            items.extend(b.iter().cloned());
            return Ok(Value::List(items));
        }
        (BinaryOp::Mul, Value::Str(s), Value::Int(n)) | (BinaryOp::Mul, Value::Int(n), Value::Str(s)) => {
            return repeat_str(s, *n).map(Value::Str);
        }
        (BinaryOp::Mul, Value::List(items), Value::Int(n))
        | (BinaryOp::Mul, Value::Int(n), Value::List(items)) => {
            return repeat(items, *n).map(Value::List);
        }
        _ => {}
    }

    let symbol = match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::FloorDiv => "//",
        BinaryOp::Mod => "%",
    };
    let (Some(a), Some(b)) = (left.as_number(), right.as_number()) else {
        return Err(unsupported(symbol, left, right));
    };

    match (a, b) {
        (Number::Int(x), Number::Int(y)) => int_op(op, x, y),
        _ => float_op(op, a.as_f64(), b.as_f64()).map(Value::Float),
    }
}

fn int_op(op: BinaryOp, x: i64, y: i64) -> Result<Value> {
    match op {
        BinaryOp::Add => x.checked_add(y).map(Value::Int).ok_or(Error::Overflow),
        BinaryOp::Sub => x.checked_sub(y).map(Value::Int).ok_or(Error::Overflow),
        BinaryOp::Mul => x.checked_mul(y).map(Value::Int).ok_or(Error::Overflow),
        BinaryOp::Div => float_op(op, x as f64, y as f64).map(Value::Float),
        BinaryOp::FloorDiv | BinaryOp::Mod => {
            if y == 0 {
                return Err(Error::DivisionByZero);
            }
            let quotient = x.checked_div(y).ok_or(Error::Overflow)?;
            let remainder = x.checked_rem(y).ok_or(Error::Overflow)?;
            // Round toward negative infinity; the remainder takes the divisor's sign.
            let adjust = remainder != 0 && ((remainder < 0) != (y < 0));
            let result = match (op, adjust) {
                (BinaryOp::FloorDiv, true) => quotient - 1,
                (BinaryOp::FloorDiv, false) => quotient,
                (_, true) => remainder + y,
                (_, false) => remainder,
            };
            Ok(Value::Int(result))
        }
    }
}

fn float_op(op: BinaryOp, x: f64, y: f64) -> Result<f64> {
    match op {
        BinaryOp::Add => Ok(x + y),
        BinaryOp::Sub => Ok(x - y),
        BinaryOp::Mul => Ok(x * y),
        BinaryOp::Div | BinaryOp::FloorDiv | BinaryOp::Mod if y == 0.0 => Err(Error::DivisionByZero),
        BinaryOp::Div => Ok(x / y),
        BinaryOp::FloorDiv => Ok((x / y).floor()),
        BinaryOp::Mod => Ok(x - y * (x / y).floor()),
    }
}

/// Equality across numeric types; containers compare element-wise.
pub(crate) fn equals(left: &Value, right: &Value) -> bool {
    if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
        return match (a, b) {
            (Number::Int(x), Number::Int(y)) => x == y,
            _ => a.as_f64() == b.as_f64(),
        };
    }
    match (left, right) {
        (Value::None, Value::None) => true,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equals(x, y))
        }
        (Value::Map(a), Value::Map(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).is_some_and(|other| equals(v, other)))
        }
        _ => false,
    }
}

fn ordering(left: &Value, right: &Value) -> Result<Option<Ordering>> {
    if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
        return Ok(match (a, b) {
            (Number::Int(x), Number::Int(y)) => Some(x.cmp(&y)),
            _ => a.as_f64().partial_cmp(&b.as_f64()),
        });
    }
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Some(a.cmp(b))),
        (Value::List(a), Value::List(b)) => {
            for (x, y) in a.iter().zip(b) {
                if !equals(x, y) {
                    return ordering(x, y);
                }
            }
            Ok(Some(a.len().cmp(&b.len())))
        }
        _ => Err(Error::type_error(format!(
            "ordering not supported between instances of '{}' and '{}'",
            left.type_name(),
            right.type_name()
        ))),
    }
}

fn contains(container: &Value, item: &Value) -> Result<bool> {
    match (container, item) {
        (Value::Str(haystack), Value::Str(needle)) => Ok(haystack.contains(needle.as_str())),
        (Value::Str(_), other) => Err(Error::type_error(format!(
            "'in <string>' requires string as left operand, not {}",
            other.type_name()
        ))),
        (Value::List(items), _) => Ok(items.iter().any(|x| equals(x, item))),
        (Value::Map(entries), Value::Str(key)) => Ok(entries.contains_key(key)),
        (Value::Map(_), _) => Ok(false),
        (other, _) => Err(Error::type_error(format!(
            "argument of type '{}' is not iterable",
            other.type_name()
        ))),
    }
}

fn identical(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::None, Value::None) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        _ => left == right,
    }
}

fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool> {
    Ok(match op {
        CompareOp::Eq => equals(left, right),
        CompareOp::Ne => !equals(left, right),
        CompareOp::Lt => ordering(left, right)? == Some(Ordering::Less),
        CompareOp::Le => matches!(
            ordering(left, right)?,
            Some(Ordering::Less | Ordering::Equal)
        ),
        CompareOp::Gt => ordering(left, right)? == Some(Ordering::Greater),
        CompareOp::Ge => matches!(
            ordering(left, right)?,
            Some(Ordering::Greater | Ordering::Equal)
        ),
        CompareOp::In => contains(right, left)?,
        CompareOp::NotIn => !contains(right, left)?,
        CompareOp::Is => identical(left, right),
        CompareOp::IsNot => !identical(left, right),
    })
}

fn resolve_index(index: i64, len: usize) -> Result<usize> {
    let signed_len = i64::try_from(len).map_err(|_| Error::Overflow)?;
    let resolved = if index < 0 { index + signed_len } else { index };
    if (0..signed_len).contains(&resolved) {
        usize::try_from(resolved).map_err(|_| Error::Overflow)
    } else {
        Err(Error::IndexOutOfRange { index, len })
    }
}

fn subscript(target: &Value, index: &Value) -> Result<Value> {
    match (target, index) {
        (Value::List(items), _) => {
            let Some(Number::Int(i)) = index.as_number() else {
                return Err(Error::type_error("list indices must be integers"));
            };
            Ok(items[resolve_index(i, items.len())?].clone())
        }
        (Value::Str(s), _) => {
            let Some(Number::Int(i)) = index.as_number() else {
                return Err(Error::type_error("string indices must be integers"));
            };
            let chars: Vec<char> = s.chars().collect();
            Ok(Value::Str(chars[resolve_index(i, chars.len())?].to_string()))
        }
        (Value::Map(entries), Value::Str(key)) => entries
            .get(key)
            .cloned()
            .ok_or_else(|| Error::KeyNotFound(key.clone())),
        (Value::Map(_), other) => Err(Error::KeyNotFound(other.to_string())),
        (other, _) => Err(Error::type_error(format!(
            "'{}' object is not subscriptable",
            other.type_name()
        ))),
    }
}

fn iterate(value: &Value) -> Result<Vec<Value>> {
    match value {
        Value::List(items) => Ok(items.clone()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
        Value::Map(entries) => Ok(entries.keys().map(|k| Value::Str(k.clone())).collect()),
        other => Err(Error::type_error(format!(
            "'{}' object is not iterable",
            other.type_name()
        ))),
    }
}

fn check_arity(function: &str, args: &[Value], range: std::ops::RangeInclusive<usize>) -> Result<()> {
    if range.contains(&args.len()) {
        return Ok(());
    }
    let expected = if range.start() == range.end() {
        range.start().to_string()
    } else {
        format!("{} to {}", range.start(), range.end())
    };
    Err(Error::Arity {
        function: function.to_string(),
        expected,
        given: args.len(),
    })
}

fn extremum(function: &str, args: Vec<Value>, wanted: Ordering) -> Result<Value> {
    if args.is_empty() {
        return Err(Error::Arity {
            function: function.to_string(),
            expected: "at least 1".to_string(),
            given: 0,
        });
    }
    let candidates = if args.len() == 1 {
        iterate(&args[0])?
    } else {
        args
    };
    let mut best: Option<Value> = None;
    for candidate in candidates {
        best = match best {
            Some(current) if ordering(&candidate, &current)? != Some(wanted) => Some(current),
            _ => Some(candidate),
        };
    }
    best.ok_or_else(|| Error::type_error(format!("{function}() arg is an empty sequence")))
}

fn call(function: &str, mut args: Vec<Value>) -> Result<Value> {
    match function {
        "len" => {
            check_arity(function, &args, 1..=1)?;
            let len = match &args[0] {
                Value::Str(s) => s.chars().count(),
                Value::List(items) => items.len(),
                Value::Map(entries) => entries.len(),
                other => {
                    return Err(Error::type_error(format!(
                        "object of type '{}' has no len()",
                        other.type_name()
                    )));
                }
            };
            i64::try_from(len).map(Value::Int).map_err(|_| Error::Overflow)
        }
        "str" => {
            check_arity(function, &args, 0..=1)?;
            Ok(Value::Str(args.pop().map(|v| v.to_string()).unwrap_or_default()))
        }
        "bool" => {
            check_arity(function, &args, 0..=1)?;
            Ok(Value::Bool(args.pop().is_some_and(|v| v.is_truthy())))
        }
        "int" => {
            check_arity(function, &args, 1..=1)?;
            match &args[0] {
                Value::Str(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| Error::type_error(format!("invalid literal for int(): '{s}'"))),
                Value::Float(f) if f.is_finite() && f.abs() < 9.2e18 => Ok(Value::Int(f.trunc() as i64)),
                Value::Float(_) => Err(Error::Overflow),
                other => match other.as_number() {
                    Some(Number::Int(i)) => Ok(Value::Int(i)),
                    _ => Err(Error::type_error(format!(
                        "int() argument must be a string or a number, not '{}'",
                        other.type_name()
                    ))),
                },
            }
        }
        "float" => {
            check_arity(function, &args, 1..=1)?;
            match &args[0] {
                Value::Str(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| Error::type_error(format!("could not convert string to float: '{s}'"))),
                other => other.as_number().map(|n| Value::Float(n.as_f64())).ok_or_else(|| {
                    Error::type_error(format!(
                        "float() argument must be a string or a number, not '{}'",
                        other.type_name()
                    ))
                }),
            }
        }
        "any" => {
            check_arity(function, &args, 1..=1)?;
            Ok(Value::Bool(iterate(&args[0])?.iter().any(Value::is_truthy)))
        }
        "all" => {
            check_arity(function, &args, 1..=1)?;
            Ok(Value::Bool(iterate(&args[0])?.iter().all(Value::is_truthy)))
        }
        "min" => extremum(function, args, Ordering::Less),
        "max" => extremum(function, args, Ordering::Greater),
        _ => Err(Error::UnknownFunction(function.to_string())),
    }
}

//! Tree-walking evaluator

use crate::error::{DomainError, DomainResult};

use super::parser::{BinaryOp, Node};
use super::value::Value;

pub(super) fn evaluate<F>(node: &Node, source: &str, resolve: &mut F) -> DomainResult<Value>
where
    F: FnMut(&str) -> DomainResult<String>,
{
    match node {
        Node::Number(n) => Ok(Value::Number(*n)),
        Node::Text(s) => Ok(Value::Text(s.clone())),
        Node::Reference(name) => resolve(name).map(|raw| Value::from_variable(&raw)),
        Node::Negate(inner) => match evaluate(inner, source, resolve)? {
            Value::Number(n) => Ok(Value::Number(-n)),
            Value::Text(text) => Err(DomainError::arithmetic(
                source,
                format!("cannot negate text {text:?}"),
            )),
        },
        Node::Binary { op, lhs, rhs } => {
            let lhs = evaluate(lhs, source, resolve)?;
            let rhs = evaluate(rhs, source, resolve)?;
            apply(*op, lhs, rhs, source)
        }
    }
}

fn apply(op: BinaryOp, lhs: Value, rhs: Value, source: &str) -> DomainResult<Value> {
    let (a, b) = match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => (a, b),
        (lhs, rhs) if op == BinaryOp::Add => {
            return Ok(Value::Text(lhs.render() + &rhs.render()));
        }
        (Value::Text(text), _) | (_, Value::Text(text)) => {
            return Err(DomainError::arithmetic(
                source,
                format!("operator '{}' cannot be applied to text {text:?}", op.symbol()),
            ));
        }
    };

    let result = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Subtract => a - b,
        BinaryOp::Multiply => a * b,
        BinaryOp::Divide if b == 0.0 => {
            return Err(DomainError::arithmetic(source, "division by zero"));
        }
        BinaryOp::Divide => a / b,
    };

    if result.is_finite() {
        Ok(Value::Number(result))
    } else {
        Err(DomainError::arithmetic(source, "result is not a finite number"))
    }
}

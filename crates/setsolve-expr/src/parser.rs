//! JSON decoding of expressions.
//!
//! Expressions travel as nested JSON arrays: the first element of an array is
//! the operator token, the remaining elements are operands. Strings and
//! numbers are leaf operands.

use serde::Deserialize;
use serde_json::Value;

use super::ast::{Expr, Operand};

/// Deepest accepted nesting of operation nodes.
pub const MAX_DEPTH: usize = 1000;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced while building or compiling an expression.
#[derive(Debug, thiserror::Error)]
pub enum ExpressionError {
    /// The top-level expression is a bare operand, not an operation.
    #[error("Expression must be an operation, found operand {found}")]
    NotAnOperation {
        /// The offending operand.
        found: String,
    },
    /// An operation node without an operator.
    #[error("Empty operation node")]
    EmptyNode,
    /// The first element of a node is not a usable operator token.
    #[error("Invalid operator: expected a non-empty string, found {found}")]
    InvalidOperator {
        /// What was found in operator position.
        found: String,
    },
    /// A value that cannot be an operand.
    #[error("Invalid operand: {found}")]
    InvalidOperand {
        /// The offending value.
        found: String,
    },
    /// The expression nests deeper than [`MAX_DEPTH`].
    #[error("Expression nesting depth {depth} exceeds the limit of {max}")]
    TooDeep {
        /// Depth of the rejected expression.
        depth: usize,
        /// The enforced limit.
        max: usize,
    },
    /// Malformed JSON input.
    #[error("Invalid expression JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse an expression from its JSON array form.
///
/// The top level must be an operation node, nested at most [`MAX_DEPTH`]
/// levels deep.
pub fn parse_json(input: &str) -> Result<Expr, ExpressionError> {
    let depth = bracket_depth(input);
    if depth > MAX_DEPTH {
        return Err(ExpressionError::TooDeep {
            depth,
            max: MAX_DEPTH,
        });
    }

    let mut de = serde_json::Deserializer::from_str(input);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    from_json_value(&value)
}

/// Maximum nesting of JSON arrays and objects, ignoring brackets in strings.
fn bracket_depth(input: &str) -> usize {
    let (mut depth, mut max) = (0_usize, 0_usize);
    let (mut in_string, mut escaped) = (false, false);

    for b in input.bytes() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                max = max.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}

/// Convert an already-decoded JSON value into an expression.
///
/// The top level must be an operation node.
pub fn from_json_value(value: &Value) -> Result<Expr, ExpressionError> {
    match convert(value)? {
        Expr::Leaf(operand) => Err(ExpressionError::NotAnOperation {
            found: operand.to_string(),
        }),
        node @ Expr::Node { .. } => Ok(node),
    }
}

fn convert(value: &Value) -> Result<Expr, ExpressionError> {
    match value {
        Value::Array(items) => {
            let (head, tail) = items.split_first().ok_or(ExpressionError::EmptyNode)?;
            let op = match head {
                Value::String(op) if !op.is_empty() => op.clone(),
                other => {
                    return Err(ExpressionError::InvalidOperator {
                        found: other.to_string(),
                    });
                }
            };
            let args = tail.iter().map(convert).collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::Node { op, args })
        }
        Value::String(s) => Ok(Expr::Leaf(Operand::Str(s.clone()))),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Expr::Leaf(Operand::Int(i)))
            } else if let Some(f) = n.as_f64().filter(|_| n.is_f64()) {
                Ok(Expr::Leaf(Operand::Float(f)))
            } else {
                // Integers outside the i64 range.
                Err(ExpressionError::InvalidOperand {
                    found: n.to_string(),
                })
            }
        }
        Value::Null | Value::Bool(_) | Value::Object(_) => Err(ExpressionError::InvalidOperand {
            found: value.to_string(),
        }),
    }
}

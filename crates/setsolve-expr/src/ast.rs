//! AST types for set-algebra expressions.
//!
//! An expression is either a leaf operand (a key name or a literal such as a
//! weight) or an operation node: an operator token followed by operands, each
//! of which is itself an expression. The JSON array form
//! `["SUNION", "qux", ["SINTER", "foo", "bar"]]` maps one-to-one onto [`Expr`].

use std::fmt;

use serde::ser::SerializeSeq;

/// A scalar operand: a key name or a literal passed through verbatim.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum Operand {
    /// A string operand, usually a key name.
    Str(String),
    /// An integer literal (e.g. `numkeys` for sorted-set verbs).
    Int(i64),
    /// A floating point literal (e.g. a `WEIGHTS` factor).
    Float(f64),
}

impl Operand {
    /// The operand as a string slice, if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Int(_) | Self::Float(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

impl redis::ToRedisArgs for Operand {
    fn write_redis_args<W>(&self, out: &mut W)
    where
        W: ?Sized + redis::RedisWrite,
    {
        match self {
            Self::Str(s) => s.write_redis_args(out),
            Self::Int(i) => i.write_redis_args(out),
            Self::Float(v) => v.write_redis_args(out),
        }
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Operand {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Operand {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

/// Expression tree node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal operand.
    Leaf(Operand),
    /// An operation: `[op, args...]`.
    Node {
        /// Operator token (a set-algebra verb or any store command name).
        op: String,
        /// Operands, in order.
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Build an operation node.
    ///
    /// ```
    /// use setsolve_expr::Expr;
    ///
    /// let expr = Expr::node("SUNION", ["qux".into(), Expr::node("SINTER", ["foo".into(), "bar".into()])]);
    /// assert_eq!(expr.to_string(), r#"["SUNION","qux",["SINTER","foo","bar"]]"#);
    /// ```
    #[must_use]
    pub fn node(op: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Self {
        Self::Node {
            op: op.into(),
            args: args.into_iter().collect(),
        }
    }

    /// Build a leaf operand.
    #[must_use]
    pub fn leaf(value: impl Into<Operand>) -> Self {
        Self::Leaf(value.into())
    }

    /// Nesting depth counted in operation nodes (a leaf has depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Node { args, .. } => 1 + args.iter().map(Self::depth).max().unwrap_or(0),
        }
    }
}

impl From<Operand> for Expr {
    fn from(operand: Operand) -> Self {
        Self::Leaf(operand)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Self::Leaf(s.into())
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Self::Leaf(s.into())
    }
}

impl From<i64> for Expr {
    fn from(i: i64) -> Self {
        Self::Leaf(i.into())
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Self::Leaf(v.into())
    }
}

impl serde::Serialize for Expr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Leaf(operand) => operand.serialize(serializer),
            Self::Node { op, args } => {
                let mut seq = serializer.serialize_seq(Some(args.len() + 1))?;
                seq.serialize_element(op)?;
                for arg in args {
                    seq.serialize_element(arg)?;
                }
                seq.end()
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

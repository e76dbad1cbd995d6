//! Set-algebra expressions and their compilation into flat command plans.
//!
//! The pipeline is:
//!
//! 1. **Building**: construct an [`Expr`] directly or decode it from its JSON
//!    array form with [`parse_json`].
//! 2. **Compiling**: [`compile`] walks the tree once, allocating a temporary
//!    key per operation node and emitting store-and-compute commands in
//!    dependency order.
//!
//! Compilation is pure: no connection to the store is needed.

pub mod ast;
pub mod compiler;
pub mod parser;
pub mod verbs;

pub use ast::{Expr, Operand};
pub use compiler::{Command, Plan, compile, compile_with_namespace};
pub use parser::{ExpressionError, MAX_DEPTH, from_json_value, parse_json};

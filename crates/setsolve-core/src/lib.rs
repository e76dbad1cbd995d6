//! Core types, configuration, and errors for SetSolve.
//!
//! This crate provides the building blocks shared by the expression compiler
//! and the executor: the environment-driven configuration, the reserved
//! temporary-key namespace, and the execution strategy selector.

mod config;
mod error;
mod types;

pub use config::SetSolveConfig;
pub use error::{SetSolveError, SetSolveResult};
pub use types::{ExecutionStrategy, Namespace};

//! Atomic execution of compiled set-algebra plans.
//!
//! [`Solver`] is the public surface: it compiles an [`Expr`] into a plan and
//! runs it against the store in one atomic unit, returning the reply of the
//! outermost operation. Temporary keys written along the way are deleted
//! before the call returns, on success and on failure.
//!
//! # Usage
//!
//! ```no_run
//! use setsolve_core::SetSolveConfig;
//! use setsolve_exec::Solver;
//!
//! # async fn run() -> Result<(), setsolve_exec::SolveError> {
//! let solver = Solver::connect(SetSolveConfig::default()).await?;
//! let reply = solver
//!     .solve_json(r#"["SUNION", "qux", ["SDIFF", ["SINTER", "foo", "bar"], "baz"]]"#)
//!     .await?;
//! let members: Vec<String> = redis::from_redis_value(&reply).unwrap_or_default();
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`driver`] - Command-by-command driver with compensating cleanup
//! - [`error`] - Phase-annotated error type
//! - [`runner`] - Single-command store access trait
//! - [`script`] - Server-side Lua driver
//! - [`solver`] - Public entry point and strategy dispatch
//! - [`transaction`] - `MULTI`/`EXEC` execution

pub mod driver;
pub mod error;
pub mod runner;
pub mod script;
pub mod solver;
pub mod transaction;


pub use error::{SolveError, SolveResult};
pub use runner::CommandRunner;
pub use setsolve_expr::{Expr, Operand, Plan};
pub use solver::{Solver, execute};

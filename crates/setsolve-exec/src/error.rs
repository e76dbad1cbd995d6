//! Error types for plan execution.

use redis::RedisError;
use setsolve_core::SetSolveError;
use setsolve_expr::ExpressionError;

/// Error returned by [`crate::Solver`] and the executors.
///
/// Each variant names the phase that failed. Store errors are kept as the
/// source and never reinterpreted.
#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    /// The expression is malformed. Raised before any network call.
    #[error("invalid expression: {0}")]
    Expression(#[from] ExpressionError),

    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] SetSolveError),

    /// Opening the client or acquiring a connection failed.
    #[error("connection failed: {0}")]
    Connect(#[source] RedisError),

    /// Loading the driver script into the store failed.
    #[error("script load failed: {0}")]
    Load(#[source] RedisError),

    /// The plan could not be encoded for submission.
    #[error("plan encoding failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// A command failed in the store.
    #[error("execution failed: {0}")]
    Execute(#[source] RedisError),

    /// Deleting temporary keys after execution failed.
    #[error("temporary key cleanup failed: {0}")]
    Cleanup(#[source] RedisError),
}

impl SolveError {
    /// Short name of the phase that failed.
    #[must_use]
    pub fn phase(&self) -> &'static str {
        match self {
            Self::Expression(_) => "compile",
            Self::Config(_) => "config",
            Self::Connect(_) => "connect",
            Self::Load(_) => "load",
            Self::Encode(_) => "submit",
            Self::Execute(_) => "execute",
            Self::Cleanup(_) => "cleanup",
        }
    }

    /// Whether the error was detected before anything reached the store.
    #[must_use]
    pub fn is_construction(&self) -> bool {
        matches!(self, Self::Expression(_))
    }
}

/// Convenience result type for execution.
pub type SolveResult<T> = Result<T, SolveError>;

//! Error types for the SetSolve core.

/// Core error type for SetSolve configuration and shared types.
#[derive(Debug, thiserror::Error)]
pub enum SetSolveError {
    /// Invalid temporary-key namespace.
    #[error("invalid namespace: {0:?} (must be non-empty and contain no whitespace)")]
    InvalidNamespace(String),

    /// Unknown execution strategy name.
    #[error("invalid execution strategy: {0} (expected script, transaction or sequential)")]
    InvalidStrategy(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for SetSolve core operations.
pub type SetSolveResult<T> = Result<T, SetSolveError>;

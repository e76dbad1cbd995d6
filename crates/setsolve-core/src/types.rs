//! Shared type definitions.

use std::fmt;
use std::str::FromStr;

use crate::SetSolveError;

/// Reserved prefix under which temporary keys are allocated.
///
/// Temporary keys take the form `<namespace>:<index>`. Caller keys must not
/// live under this prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Namespace(String);

impl Namespace {
    /// Default namespace reserved for temporary keys.
    pub const DEFAULT: &str = "setsolve";

    /// Create a new namespace.
    ///
    /// # Errors
    /// Returns an error if the namespace is empty or contains whitespace.
    pub fn new(ns: impl Into<String>) -> Result<Self, SetSolveError> {
        let ns = ns.into();
        if ns.is_empty() || ns.chars().any(char::is_whitespace) {
            return Err(SetSolveError::InvalidNamespace(ns));
        }
        Ok(Self(ns))
    }

    /// Get the namespace as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive a child namespace, e.g. `setsolve:<call-id>`.
    #[must_use]
    pub fn scoped(&self, scope: &str) -> Self {
        Self(format!("{}:{scope}", self.0))
    }

    /// Glob pattern matching every key under this namespace.
    #[must_use]
    pub fn pattern(&self) -> String {
        format!("{}:*", self.0)
    }
}

impl Default for Namespace {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Namespace {
    type Error = SetSolveError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Namespace> for String {
    fn from(ns: Namespace) -> Self {
        ns.0
    }
}

/// How a compiled plan is submitted to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStrategy {
    /// Run the plan inside a server-side Lua script (one atomic round trip).
    #[default]
    Script,
    /// Queue the plan and the cleanup in a single `MULTI`/`EXEC` block.
    Transaction,
    /// Issue commands one at a time with compensating cleanup.
    ///
    /// Not isolated: intermediate keys are briefly visible to other clients.
    Sequential,
}

impl ExecutionStrategy {
    /// Lowercase name of the strategy.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Transaction => "transaction",
            Self::Sequential => "sequential",
        }
    }

    /// Whether the store runs the whole plan without interleaving.
    #[must_use]
    pub fn is_atomic(self) -> bool {
        !matches!(self, Self::Sequential)
    }
}

impl fmt::Display for ExecutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionStrategy {
    type Err = SetSolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "script" | "lua" => Ok(Self::Script),
            "transaction" | "multi" => Ok(Self::Transaction),
            "sequential" => Ok(Self::Sequential),
            _ => Err(SetSolveError::InvalidStrategy(s.to_owned())),
        }
    }
}

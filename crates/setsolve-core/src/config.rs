//! Configuration management for SetSolve.
//!
//! All configuration is driven by environment variables.

use crate::types::{ExecutionStrategy, Namespace};
use crate::{SetSolveError, SetSolveResult};

/// Global configuration for SetSolve.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetSolveConfig {
    /// Connection URL of the store.
    pub redis_url: String,
    /// Reserved namespace for temporary keys.
    pub namespace: Namespace,
    /// How compiled plans are submitted.
    pub strategy: ExecutionStrategy,
    /// Log level.
    pub log_level: String,
}

impl Default for SetSolveConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_owned(),
            namespace: Namespace::default(),
            strategy: ExecutionStrategy::default(),
            log_level: "info".to_owned(),
        }
    }
}

impl SetSolveConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Returns an error if `SETSOLVE_NAMESPACE` or `SETSOLVE_STRATEGY` holds an
    /// invalid value.
    pub fn from_env() -> SetSolveResult<Self> {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("REDIS_URL") {
            config.redis_url = v;
        }
        if let Ok(v) = std::env::var("SETSOLVE_NAMESPACE") {
            config.namespace = Namespace::new(v)?;
        }
        if let Ok(v) = std::env::var("SETSOLVE_STRATEGY") {
            config.strategy = v.parse()?;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }

        config.validate()?;
        Ok(config)
    }

    /// Builder-style override of the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: Namespace) -> Self {
        self.namespace = namespace;
        self
    }

    /// Builder-style override of the strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Check the configuration for values that cannot work.
    pub fn validate(&self) -> SetSolveResult<()> {
        if self.redis_url.trim().is_empty() {
            return Err(SetSolveError::Config("redis_url must not be empty".to_owned()));
        }
        if !self.redis_url.contains("://") {
            return Err(SetSolveError::Config(format!(
                "redis_url must include a scheme: {}",
                self.redis_url
            )));
        }
        Ok(())
    }
}

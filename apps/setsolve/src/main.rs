//! SetSolve - solve nested set-algebra expressions against Redis.
//!
//! # Usage
//!
//! ```text
//! setsolve '["SUNION", "qux", ["SDIFF", ["SINTER", "foo", "bar"], "baz"]]'
//! echo '["SINTER", "foo", "bar"]' | setsolve
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `REDIS_URL` | `redis://localhost:6379` | Store to connect to |
//! | `SETSOLVE_NAMESPACE` | `setsolve` | Prefix for temporary keys |
//! | `SETSOLVE_STRATEGY` | `script` | `script`, `transaction` or `sequential` |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod render;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use setsolve_core::SetSolveConfig;
use setsolve_exec::Solver;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
/// Logs go to stderr so stdout only carries the result.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Record the effective configuration. Must run after [`init_tracing`].
fn log_config(config: &SetSolveConfig) {
    debug!(
        redis_url = %config.redis_url,
        namespace = %config.namespace,
        strategy = %config.strategy,
        log_level = %config.log_level,
        "loaded configuration"
    );
}

/// Expression from the first argument, or from stdin when none is given.
async fn read_expression() -> Result<String> {
    if let Some(arg) = std::env::args().nth(1) {
        return Ok(arg);
    }
    let mut input = String::new();
    tokio::io::stdin()
        .read_to_string(&mut input)
        .await
        .context("failed to read expression from stdin")?;
    Ok(input)
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = SetSolveConfig::from_env().context("invalid configuration")?;
    init_tracing(&config.log_level)?;
    log_config(&config);

    let input = read_expression().await?;
    let solver = Solver::connect(config)
        .await
        .context("failed to prepare solver")?;
    debug!(expression = %input.trim(), strategy = %solver.config().strategy, "solving");

    let reply = solver
        .solve_json(&input)
        .await
        .with_context(|| format!("failed to solve {}", input.trim()))?;

    println!("{}", render::to_json(&reply));
    Ok(())
}

//! Public entry point: compile an expression and run it against the store.

use std::fmt;
use std::sync::Arc;

use redis::aio::MultiplexedConnection;
use redis::{Script, Value};
use setsolve_core::{ExecutionStrategy, Namespace, SetSolveConfig};
use setsolve_expr::{Expr, Plan, compile_with_namespace, parse_json};
use tracing::{debug, info};

use crate::driver;
use crate::error::{SolveError, SolveResult};
use crate::script;
use crate::transaction;

/// Solves nested set-algebra expressions in one atomic store round trip.
///
/// Cloning is cheap; clones share the underlying multiplexed connection.
#[derive(Clone)]
pub struct Solver {
    conn: MultiplexedConnection,
    script: Arc<Script>,
    config: SetSolveConfig,
}

impl fmt::Debug for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Solver")
            .field("redis_url", &self.config.redis_url)
            .field("namespace", &self.config.namespace)
            .field("strategy", &self.config.strategy)
            .field("script_sha", &self.script.get_hash())
            .finish_non_exhaustive()
    }
}

impl Solver {
    /// Open a connection to `config.redis_url` and prepare the solver.
    pub async fn connect(config: SetSolveConfig) -> SolveResult<Self> {
        config.validate()?;
        let client = redis::Client::open(config.redis_url.as_str()).map_err(SolveError::Connect)?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(SolveError::Connect)?;
        Self::with_connection(conn, config).await
    }

    /// Prepare a solver on an existing connection.
    ///
    /// With the script strategy, the driver script is loaded once here so
    /// later calls only send its SHA1.
    pub async fn with_connection(
        conn: MultiplexedConnection,
        config: SetSolveConfig,
    ) -> SolveResult<Self> {
        let lua = script::driver_script();

        if config.strategy == ExecutionStrategy::Script {
            let mut load_conn = conn.clone();
            let sha = script::load(&mut load_conn, &lua).await?;
            info!(sha = %sha, "loaded driver script");
        }

        Ok(Self {
            conn,
            script: Arc::new(lua),
            config,
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SetSolveConfig {
        &self.config
    }

    /// Compile an expression the way [`Solver::solve`] would, without running it.
    pub fn plan(&self, expr: &Expr) -> SolveResult<Plan> {
        Ok(compile_with_namespace(expr, &self.call_namespace())?)
    }

    /// Evaluate an expression and return the store's native reply.
    ///
    /// Convert the reply with [`redis::from_redis_value`] according to the
    /// outermost operator (members for `SUNION`, a count for `SINTERCARD`...).
    pub async fn solve(&self, expr: &Expr) -> SolveResult<Value> {
        let plan = self.plan(expr)?;
        let mut conn = self.conn.clone();
        execute(&mut conn, &self.script, self.config.strategy, &plan).await
    }

    /// Decode an expression from its JSON array form and evaluate it.
    pub async fn solve_json(&self, input: &str) -> SolveResult<Value> {
        let expr = parse_json(input)?;
        self.solve(&expr).await
    }

    /// Namespace for one call's temporary keys.
    ///
    /// Non-atomic execution needs names no concurrent call can produce.
    fn call_namespace(&self) -> Namespace {
        if self.config.strategy.is_atomic() {
            self.config.namespace.clone()
        } else {
            self.config
                .namespace
                .scoped(&uuid::Uuid::new_v4().simple().to_string())
        }
    }
}

/// Run a compiled plan with the given strategy.
///
/// A plan with a single command is always issued directly with its original
/// verb, whatever the strategy.
pub async fn execute(
    conn: &mut MultiplexedConnection,
    driver_script: &Script,
    strategy: ExecutionStrategy,
    plan: &Plan,
) -> SolveResult<Value> {
    if plan.is_single() {
        return driver::run_direct(conn, plan).await;
    }

    debug!(%strategy, commands = plan.len(), "executing plan");
    match strategy {
        ExecutionStrategy::Script => script::run(conn, driver_script, plan).await,
        ExecutionStrategy::Transaction => transaction::run(conn, plan).await,
        ExecutionStrategy::Sequential => driver::drive(conn, plan).await,
    }
}

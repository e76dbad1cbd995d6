//! Plan driver for runners without multi-command atomicity.
//!
//! Commands are issued one round trip at a time. The destination of every
//! issued command is recorded, and the recorded keys are deleted once the
//! plan finishes or on the first failure. Other clients can observe the
//! temporary keys while the plan runs, so plans driven this way must be
//! compiled under a per-call namespace.

use redis::Value;
use setsolve_expr::Plan;
use tracing::{debug, warn};

use crate::error::{SolveError, SolveResult};
use crate::runner::CommandRunner;

/// Run a single-command plan with its original verb. Nothing is stored.
pub async fn run_direct<R: CommandRunner + ?Sized>(runner: &mut R, plan: &Plan) -> SolveResult<Value> {
    debug!(verb = plan.root().verb(), "running unnested command directly");
    runner
        .run(&plan.root().direct_cmd())
        .await
        .map_err(SolveError::Execute)
}

/// Drive a plan command by command with compensating cleanup.
///
/// Returns the reply of the last real command. The root command is issued in
/// its direct form, so the reply has the native shape of the outermost
/// operator.
pub async fn drive<R: CommandRunner + ?Sized>(runner: &mut R, plan: &Plan) -> SolveResult<Value> {
    if plan.is_single() {
        return run_direct(runner, plan).await;
    }

    let mut written = Vec::with_capacity(plan.temp_keys().len());
    let outcome = run_commands(runner, plan, &mut written).await;
    let cleanup = delete_keys(runner, &written).await;

    match (outcome, cleanup) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(SolveError::Cleanup(e)),
        (Err(e), Ok(())) => {
            warn!(error = %e, removed = written.len(), "plan failed, temporary keys removed");
            Err(e)
        }
        (Err(e), Err(cleanup_err)) => {
            warn!(
                error = %e,
                cleanup_error = %cleanup_err,
                keys = ?written,
                "plan failed and temporary keys could not be removed"
            );
            Err(e)
        }
    }
}

async fn run_commands<R: CommandRunner + ?Sized>(
    runner: &mut R,
    plan: &Plan,
    written: &mut Vec<String>,
) -> SolveResult<Value> {
    let last = plan.len() - 1;
    let mut result = Value::Nil;

    for (i, command) in plan.commands().iter().enumerate() {
        let cmd = if i == last {
            command.direct_cmd()
        } else {
            // Recorded before the call: a lost reply may still mean a written key.
            written.push(command.destination().to_owned());
            command.stored_cmd()
        };

        let reply = runner.run(&cmd).await.map_err(SolveError::Execute)?;
        if command.is_real() {
            result = reply;
        }
    }

    Ok(result)
}

async fn delete_keys<R: CommandRunner + ?Sized>(
    runner: &mut R,
    keys: &[String],
) -> redis::RedisResult<()> {
    if keys.is_empty() {
        return Ok(());
    }
    let mut del = redis::cmd("DEL");
    del.arg(keys);
    runner.run(&del).await.map(|_| ())
}

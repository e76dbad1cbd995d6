//! `MULTI`/`EXEC` execution of a plan.
//!
//! The whole plan plus the trailing `DEL` is queued in one transaction, which
//! the store runs without interleaving. A command that fails at run time does
//! not stop the queued commands after it, so the `DEL` always runs. The
//! client surfaces the first failed reply as the call's error.

use redis::aio::MultiplexedConnection;
use redis::{Pipeline, Value};
use setsolve_expr::Plan;
use tracing::debug;

use crate::error::{SolveError, SolveResult};

/// Build the atomic pipeline for a multi-command plan.
///
/// Replies are returned for plan commands only; the cleanup reply is ignored.
#[must_use]
pub fn pipeline(plan: &Plan) -> Pipeline {
    let last = plan.len() - 1;
    let mut pipe = redis::pipe();
    pipe.atomic();

    for (i, command) in plan.commands().iter().enumerate() {
        if i == last {
            pipe.add_command(command.direct_cmd());
        } else {
            pipe.add_command(command.stored_cmd());
        }
    }

    pipe.cmd("DEL").arg(plan.temp_keys()).ignore();
    pipe
}

/// Run a multi-command plan as one transaction.
pub async fn run(conn: &mut MultiplexedConnection, plan: &Plan) -> SolveResult<Value> {
    debug!(commands = plan.len(), "submitting plan as transaction");
    let replies: Vec<Value> = pipeline(plan)
        .query_async(conn)
        .await
        .map_err(SolveError::Execute)?;
    Ok(pick_result(plan, replies))
}

/// Select the reply of the last real command.
fn pick_result(plan: &Plan, replies: Vec<Value>) -> Value {
    plan.result_index()
        .and_then(|i| replies.into_iter().nth(i))
        .unwrap_or(Value::Nil)
}

//! Server-side driver script.
//!
//! The compiled plan is shipped as JSON in `ARGV[1]` and the temporary keys as
//! `KEYS`. The script runs every step in order, keeps the reply of the last
//! tracked step, deletes all temporary keys, and returns the kept reply. The
//! store runs a script without interleaving other clients' commands.
//!
//! Store errors raised by a step are caught so that the cleanup still runs;
//! the error is then returned to the caller unchanged.

use redis::aio::MultiplexedConnection;
use redis::{Script, Value};
use setsolve_expr::Plan;
use tracing::debug;

use crate::error::{SolveError, SolveResult};

const DRIVER_LUA: &str = r#"
local steps = cjson.decode(ARGV[1])

if redis.replicate_commands then
  redis.replicate_commands()
  redis.set_repl(redis.REPL_NONE)
end

local function cleanup()
  if #KEYS > 0 then
    redis.call("DEL", unpack(KEYS))
  end
end

local result = nil

for _, step in ipairs(steps) do
  local reply = redis.pcall(unpack(step.argv))
  if type(reply) == "table" and reply.err then
    cleanup()
    return reply
  end
  if step.track then
    result = reply
  end
end

cleanup()

return result
"#;

/// One command as sent to the driver script.
#[derive(Debug, serde::Serialize)]
struct Step {
    argv: Vec<String>,
    track: bool,
}

/// Build the driver script. Its SHA1 is computed once here.
#[must_use]
pub fn driver_script() -> Script {
    Script::new(DRIVER_LUA)
}

/// Encode a multi-command plan as the script's `ARGV[1]`.
///
/// Non-root commands use their stored form; the root uses its direct form.
pub fn encode(plan: &Plan) -> SolveResult<String> {
    let last = plan.len() - 1;
    let steps: Vec<Step> = plan
        .commands()
        .iter()
        .enumerate()
        .map(|(i, command)| Step {
            argv: if i == last {
                command.direct_args()
            } else {
                command.stored_args()
            },
            track: command.is_real(),
        })
        .collect();
    serde_json::to_string(&steps).map_err(SolveError::Encode)
}

/// Load the script into the store's script cache, returning its SHA1.
pub async fn load(conn: &mut MultiplexedConnection, script: &Script) -> SolveResult<String> {
    script
        .prepare_invoke()
        .load_async(conn)
        .await
        .map_err(SolveError::Load)
}

/// Run a multi-command plan inside the driver script.
///
/// Invocation goes by SHA1 and falls back to loading the body when the store
/// has dropped it from its cache.
pub async fn run(conn: &mut MultiplexedConnection, script: &Script, plan: &Plan) -> SolveResult<Value> {
    let encoded = encode(plan)?;
    debug!(
        sha = script.get_hash(),
        commands = plan.len(),
        "invoking driver script"
    );
    script
        .key(plan.temp_keys())
        .arg(encoded)
        .invoke_async(conn)
        .await
        .map_err(SolveError::Execute)
}

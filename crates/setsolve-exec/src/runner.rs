//! One-command-at-a-time access to the store.

use redis::aio::MultiplexedConnection;
use redis::{Cmd, RedisResult, Value};

/// Issues single commands against the store and returns the raw reply.
///
/// This is the seam the sequential driver is written against, so that its
/// ordering and cleanup behavior can be exercised without a live store.
#[async_trait::async_trait]
pub trait CommandRunner: Send {
    /// Run one command and return its reply.
    async fn run(&mut self, cmd: &Cmd) -> RedisResult<Value>;
}

#[async_trait::async_trait]
impl CommandRunner for MultiplexedConnection {
    async fn run(&mut self, cmd: &Cmd) -> RedisResult<Value> {
        cmd.query_async(self).await
    }
}

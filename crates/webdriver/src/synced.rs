use async_trait::async_trait;
use lockstep_gate::SyncGate;
use serde_json::Value;

use crate::{CommandTransport, Result, WireCommand};

/// Decorator that stalls each completed command until no request is in
/// flight, then hands the untouched result back to the test.
///
/// Order per command: delegate to the inner transport; yield once so a
/// request task kicked off by the command gets a chance to reach the gate;
/// wait until the gate is free; return the captured result. A command that
/// fails propagates its error immediately, without the yield or the wait.
///
/// No retries and no timeout: a request handler that never finishes blocks
/// the command path indefinitely.
pub struct SyncedTransport<T> {
    inner: T,
    gate: SyncGate,
}

impl<T> SyncedTransport<T> {
    pub fn new(inner: T, gate: SyncGate) -> Self {
        Self { inner, gate }
    }

    /// The wrapped transport.
    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[async_trait]
impl<T: CommandTransport> CommandTransport for SyncedTransport<T> {
    async fn execute(&mut self, command: WireCommand) -> Result<Value> {
        let method = command.method.clone();
        let value = self.inner.execute(command).await?;
        tokio::task::yield_now().await;
        self.gate.wait_until_free().await;
        log::trace!("command '{method}' returned after gate wait");
        Ok(value)
    }
}

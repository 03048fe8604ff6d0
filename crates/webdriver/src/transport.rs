use async_trait::async_trait;
use serde_json::Value;

use crate::{Result, WireCommand};

/// The seam between the sync machinery and a concrete automation protocol.
///
/// Implement this once per underlying driver client; everything in this
/// crate is agnostic to which protocol sits underneath.
#[async_trait]
pub trait CommandTransport: Send {
    /// Issues one remote command and returns its decoded result.
    async fn execute(&mut self, command: WireCommand) -> Result<Value>;
}

#[async_trait]
impl CommandTransport for Box<dyn CommandTransport> {
    async fn execute(&mut self, command: WireCommand) -> Result<Value> {
        (**self).execute(command).await
    }
}

// Trait objects cannot derive `Debug`; an opaque impl lets callers unwrap
// `Result<Box<dyn CommandTransport>, _>` values.
impl std::fmt::Debug for dyn CommandTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn CommandTransport")
    }
}

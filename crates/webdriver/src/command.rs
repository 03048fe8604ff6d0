use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One remote browser-automation command: a method and positional arguments.
///
/// The shape is protocol-neutral; whatever wire format the underlying
/// driver speaks, its commands reduce to a method name plus ordered JSON
/// arguments and a decoded JSON result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireCommand {
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl WireCommand {
    pub fn new(method: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }

    /// Command with no arguments.
    pub fn bare(method: impl Into<String>) -> Self {
        Self::new(method, Vec::new())
    }
}

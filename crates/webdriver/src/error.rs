use thiserror::Error;

/// Result type for driver operations
pub type Result<T> = std::result::Result<T, DriverError>;

/// Errors raised while registering, building, or driving a transport
#[derive(Error, Debug)]
pub enum DriverError {
    /// No driver registered under the requested name
    #[error("Unknown driver: {0}")]
    UnknownDriver(String),

    /// A driver is already registered under this name
    #[error("Driver already registered: {0}")]
    DuplicateDriver(String),

    /// The remote end rejected or failed a command
    #[error("Command '{method}' failed: {message}")]
    Command { method: String, message: String },

    /// Invalid driver configuration
    #[error("Invalid driver config: {0}")]
    InvalidConfig(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DriverError {
    /// Create a command failure for `method`
    pub fn command(method: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command {
            method: method.into(),
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

use thiserror::Error;

/// Result type for gate operations
pub type Result<T> = std::result::Result<T, GateError>;

/// Usage-invariant violations of the gate
///
/// Both variants indicate a bug in the calling code, not a recoverable
/// runtime condition: callers are expected to surface them, never to retry
/// or swallow them.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateError {
    /// The gate already has a holder
    ///
    /// A second request path reached the gate while one was still in
    /// flight, which the one-request-at-a-time topology rules out.
    #[error("Gate already held: another request is still in flight")]
    AlreadyHeld,

    /// The gate has no holder to release
    #[error("Gate not held: release without a matching acquire")]
    NotHeld,
}

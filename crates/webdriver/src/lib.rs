//! # Lockstep WebDriver
//!
//! The driver side of lockstep: a driver-implementation-agnostic command
//! seam ([`CommandTransport`]), a decorator that stalls each completed
//! command until the server has no request in flight
//! ([`SyncedTransport`]), and a registry that exposes synchronized driver
//! variants under their own opt-in names alongside the unsynchronized
//! originals ([`DriverRegistry`]).
//!
//! The wrapper is applied uniformly to every command a driver issues, so
//! test code never needs to sprinkle manual waits:
//!
//! ```text
//! test ── execute(cmd) ──> SyncedTransport ── execute(cmd) ──> browser
//!                              │ yield once
//!                              │ wait_until_free(gate)   ← blocks while a
//!                              └──> result to the test     request is live
//! ```

mod command;
mod config;
mod error;
mod registry;
mod synced;
mod transport;

pub use command::WireCommand;
pub use config::DriverConfig;
pub use error::{DriverError, Result};
pub use registry::{synced_name_for, BoxedTransport, DriverRegistry, TransportFactory};
pub use synced::SyncedTransport;
pub use transport::CommandTransport;

//! # Lockstep Gate
//!
//! The synchronization core shared by an in-process application server and a
//! browser-automation driver. The server side claims the gate for the
//! duration of each request; the driver side, after every remote command,
//! waits until no request is in flight before handing control back to the
//! test.
//!
//! ## Model
//!
//! ```text
//! request path                     command path
//!     │                                │
//!     ├─ acquire() ── holder ──┐       ├─ remote call completes
//!     │   (handler runs)       │       ├─ wait_until_free() ── blocks ──┐
//!     ├─ release() ────────────┘       │                                │
//!     │                                ├────────────── resumes ─────────┘
//! ```
//!
//! The gate is a single-slot primitive, not a counting semaphore: the
//! surrounding deployment serializes requests, so at most one holder exists
//! at any time and contention on `acquire` is a programming error, surfaced
//! loudly rather than waited out.
//!
//! A [`SyncGate`] is constructed once and cloned into everything that needs
//! it; clones observe the same gate.

mod error;
mod gate;

pub use error::{GateError, Result};
pub use gate::{GateGuard, GateStats, SyncGate};

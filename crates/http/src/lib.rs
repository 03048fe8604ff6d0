//! # Lockstep HTTP
//!
//! Tower middleware that claims the shared [`SyncGate`](lockstep_gate::SyncGate)
//! on the way into each request and releases it on the way out, so a
//! browser-driven test can tell when the server has finished the last
//! request it triggered.
//!
//! Static-asset requests are exempt (the browser fetches them in parallel
//! with the page request that is still holding the gate); which paths count
//! as assets is configured through [`BypassRules`].
//!
//! ## Wiring
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use lockstep_gate::SyncGate;
//! use lockstep_http::GateLayer;
//!
//! let gate = SyncGate::new();
//! let app: Router = Router::new()
//!     .route("/", get(|| async { "hello" }))
//!     .layer(GateLayer::new(gate.clone()));
//! // hand `gate` clones to the synced driver side
//! ```

mod bypass;
mod layer;

pub use bypass::BypassRules;
pub use layer::{GateLayer, GateService};

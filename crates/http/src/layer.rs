use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use http::Request;
use lockstep_gate::SyncGate;
use tower::{Layer, Service};

use crate::BypassRules;

/// Layers [`GateService`] onto an inner service.
#[derive(Clone, Debug)]
pub struct GateLayer {
    gate: SyncGate,
    bypass: BypassRules,
}

impl GateLayer {
    /// Gates every request except the default bypass set (`/assets`).
    pub fn new(gate: SyncGate) -> Self {
        Self {
            gate,
            bypass: BypassRules::default(),
        }
    }

    /// Gates every request except those matching `bypass`.
    pub fn with_bypass(gate: SyncGate, bypass: BypassRules) -> Self {
        Self { gate, bypass }
    }
}

impl<S> Layer<S> for GateLayer {
    type Service = GateService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GateService {
            inner,
            gate: self.gate.clone(),
            bypass: self.bypass.clone(),
        }
    }
}

/// Middleware holding the gate for the duration of each non-bypassed request.
///
/// Exactly one acquire/release pair per non-bypassed request, on every exit
/// path: normal response, inner error, or a response future dropped before
/// completion. Bypassed requests are delegated untouched with zero gate
/// operations. Responses, headers, and errors pass through unchanged.
///
/// # Panics
///
/// Panics if the gate is already held when a non-bypassed request arrives.
/// That means two requests were live at once, which the serialized topology
/// this middleware is built for rules out; a loud stop beats a silently
/// queued request that would mask the broken invariant.
#[derive(Clone, Debug)]
pub struct GateService<S> {
    inner: S,
    gate: SyncGate,
    bypass: BypassRules,
}

type ResponseFuture<R, E> = Pin<Box<dyn Future<Output = std::result::Result<R, E>> + Send>>;

impl<S, B> Service<Request<B>> for GateService<S>
where
    S: Service<Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = ResponseFuture<S::Response, S::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        if self.bypass.matches(req.uri().path()) {
            log::trace!("bypassing gate for {}", req.uri().path());
            return Box::pin(self.inner.call(req));
        }

        // Move the readied service into the future; keep a fresh clone for
        // the next call.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let gate = self.gate.clone();

        Box::pin(async move {
            let held = match gate.hold() {
                Ok(guard) => guard,
                Err(err) => panic!("request gate invariant violated: {err}"),
            };
            let result = inner.call(req).await;
            drop(held);
            result
        })
    }
}

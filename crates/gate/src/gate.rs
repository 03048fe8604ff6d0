use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::{GateError, Result};

/// The shared gate coordinating the request path and the command path.
///
/// Internally a one-permit semaphore: the request path parks the permit via
/// [`acquire`](SyncGate::acquire) and returns it via
/// [`release`](SyncGate::release); the command path observes the permit
/// count via [`wait_until_free`](SyncGate::wait_until_free) without ever
/// becoming a holder itself.
///
/// Clones are cheap handles onto the same gate. Construct one per process
/// and hand clones to the middleware and the driver wrapper.
#[derive(Clone)]
pub struct SyncGate {
    inner: Arc<GateInner>,
}

struct GateInner {
    permits: Arc<Semaphore>,
    holder: Mutex<Option<OwnedSemaphorePermit>>,
    acquires: AtomicU64,
    releases: AtomicU64,
    blocked_waits: AtomicU64,
    last_wait_ms: AtomicU64,
    max_wait_ms: AtomicU64,
}

impl GateInner {
    fn holder_slot(&self) -> MutexGuard<'_, Option<OwnedSemaphorePermit>> {
        // The slot always holds a coherent Option, even if a holder
        // panicked mid-request, so a poisoned lock is safe to reclaim.
        self.holder
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SyncGate {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(GateInner {
                permits: Arc::new(Semaphore::new(1)),
                holder: Mutex::new(None),
                acquires: AtomicU64::new(0),
                releases: AtomicU64::new(0),
                blocked_waits: AtomicU64::new(0),
                last_wait_ms: AtomicU64::new(0),
                max_wait_ms: AtomicU64::new(0),
            }),
        }
    }

    /// Claims the gate for the request path.
    ///
    /// Never blocks: if the gate already has a holder, this fails fast with
    /// [`GateError::AlreadyHeld`]. Contention here means two requests were
    /// live at once, a violation of the serialized topology the gate exists
    /// to enforce, so it must surface instead of quietly queueing.
    pub fn acquire(&self) -> Result<()> {
        let permit = self
            .inner
            .permits
            .clone()
            .try_acquire_owned()
            .map_err(|_| GateError::AlreadyHeld)?;
        *self.inner.holder_slot() = Some(permit);
        self.inner.acquires.fetch_add(1, Ordering::Relaxed);
        log::trace!("gate acquired");
        Ok(())
    }

    /// Returns the gate to the free state.
    ///
    /// Must be called exactly once per successful [`acquire`](Self::acquire).
    /// Releasing a free gate fails with [`GateError::NotHeld`].
    pub fn release(&self) -> Result<()> {
        let permit = self.inner.holder_slot().take().ok_or(GateError::NotHeld)?;
        drop(permit);
        self.inner.releases.fetch_add(1, Ordering::Relaxed);
        log::trace!("gate released");
        Ok(())
    }

    /// Acquires the gate and returns a guard that releases it on drop.
    ///
    /// The guard releases on every exit path of the scope holding it,
    /// including early `?` returns and dropped futures.
    pub fn hold(&self) -> Result<GateGuard> {
        self.acquire()?;
        Ok(GateGuard { gate: self.clone() })
    }

    /// Whether the gate currently has a holder.
    pub fn is_held(&self) -> bool {
        self.inner.permits.available_permits() == 0
    }

    /// Blocks the calling task until no request is in flight, then returns.
    ///
    /// If the gate is free this returns immediately. The check and the wait
    /// are deliberately not atomic: the gate may be re-taken the instant
    /// after it is observed free. The contract is "no request is in flight
    /// right now", nothing stronger, and callers rely on that timing.
    ///
    /// While unblocking, the waiter takes and immediately returns the
    /// permit; an `acquire` racing that instant fails loudly, the same as it
    /// would against a real holder. A holder that never releases blocks this
    /// call forever: there is no timeout and no cancellation hook.
    pub async fn wait_until_free(&self) {
        if !self.is_held() {
            return;
        }

        let started = Instant::now();
        self.inner.blocked_waits.fetch_add(1, Ordering::Relaxed);
        log::debug!("gate held, waiting for the in-flight request");
        let permit = self
            .inner
            .permits
            .acquire()
            .await
            .expect("gate semaphore is never closed");
        drop(permit);
        let waited_ms = started.elapsed().as_millis() as u64;
        self.record_wait_ms(waited_ms);
        log::debug!("gate free after {waited_ms}ms");
    }

    /// Snapshot of the gate's counters.
    pub fn stats(&self) -> GateStats {
        GateStats {
            acquires: self.inner.acquires.load(Ordering::Relaxed),
            releases: self.inner.releases.load(Ordering::Relaxed),
            blocked_waits: self.inner.blocked_waits.load(Ordering::Relaxed),
            last_wait_ms: self.inner.last_wait_ms.load(Ordering::Relaxed),
            max_wait_ms: self.inner.max_wait_ms.load(Ordering::Relaxed),
        }
    }

    fn record_wait_ms(&self, wait_ms: u64) {
        self.inner.last_wait_ms.store(wait_ms, Ordering::Relaxed);
        let mut current = self.inner.max_wait_ms.load(Ordering::Relaxed);
        while wait_ms > current {
            match self.inner.max_wait_ms.compare_exchange(
                current,
                wait_ms,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(next) => current = next,
            }
        }
    }
}

impl Default for SyncGate {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SyncGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncGate")
            .field("held", &self.is_held())
            .finish()
    }
}

/// RAII holder of the gate; releases on drop.
///
/// Obtained via [`SyncGate::hold`]. Mixing a manual
/// [`release`](SyncGate::release) with an outstanding guard breaks the
/// exactly-once pairing; the guard surfaces that at drop time through an
/// error-level log, since a `Drop` impl has nowhere to propagate to.
#[must_use = "dropping the guard releases the gate immediately"]
pub struct GateGuard {
    gate: SyncGate,
}

impl Drop for GateGuard {
    fn drop(&mut self) {
        if let Err(err) = self.gate.release() {
            log::error!("gate guard release failed: {err}");
        }
    }
}

impl fmt::Debug for GateGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateGuard").finish()
    }
}

/// Counters describing gate activity since construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateStats {
    /// Successful `acquire` calls.
    pub acquires: u64,
    /// Successful `release` calls.
    pub releases: u64,
    /// `wait_until_free` calls that actually blocked.
    pub blocked_waits: u64,
    /// Duration of the most recent blocked wait, in milliseconds.
    pub last_wait_ms: u64,
    /// Longest blocked wait seen, in milliseconds.
    pub max_wait_ms: u64,
}

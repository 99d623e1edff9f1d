//! Session Tracking
//!
//! Single source of truth for "which logical session are we in" and "are we
//! allowed to create or access anything right now". The host may tear down
//! and re-initialize large parts of its managed state without restarting the
//! process, so caches cannot key on "has this run yet"; they compare against
//! the session epoch held here instead.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::Mutex;

use crate::diagnostics::Diagnostics;
use crate::host::{ShutdownSignal, SubscriptionId};
use crate::types::{CallerContext, SessionEpoch, Tick};

/// Sentinel: no session start observed yet.
const TICK_NONE: u64 = u64::MAX;

/// Session epoch, shutdown flag, and owner-thread identity.
///
/// Hosts typically hold one tracker in an `Arc` and hand references to every
/// registry call. Everything the cross-thread rejection check reads is
/// atomic; the owner identity and subscription id sit behind a mutex. None
/// of this serializes registry operations, which remain owner-thread-only by
/// contract.
pub struct SessionTracker {
    epoch: AtomicU64,
    /// Shared with the shutdown observer registered on the host signal.
    shutting_down: Arc<AtomicBool>,
    session_active: AtomicBool,
    last_begin_tick: AtomicU64,
    owner: Mutex<Option<ThreadId>>,
    subscription: Mutex<Option<SubscriptionId>>,
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTracker {
    pub fn new() -> Self {
        SessionTracker {
            epoch: AtomicU64::new(0),
            shutting_down: Arc::new(AtomicBool::new(false)),
            session_active: AtomicBool::new(false),
            last_begin_tick: AtomicU64::new(TICK_NONE),
            owner: Mutex::new(None),
            subscription: Mutex::new(None),
        }
    }

    /// Open a new logical session.
    ///
    /// Idempotent per tick: a second call within the same scheduling step is
    /// a no-op, so hosts that dispatch the session-start event through more
    /// than one path do not double-increment the epoch. The shutdown
    /// subscription is re-established here and de-duplicated against one
    /// still registered from a prior session.
    ///
    /// Returns whether a new session was actually opened. `tick` must be
    /// below `u64::MAX`.
    pub fn begin_session(&self, tick: Tick, signal: &mut dyn ShutdownSignal) -> bool {
        if self.last_begin_tick.swap(tick, Ordering::SeqCst) == tick {
            return false;
        }

        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.shutting_down.store(false, Ordering::SeqCst);
        self.session_active.store(true, Ordering::SeqCst);

        let mut subscription = self.subscription.lock();
        if subscription.is_none() {
            let flag = Arc::clone(&self.shutting_down);
            let id = signal.subscribe(Arc::new(move || {
                flag.store(true, Ordering::SeqCst);
            }));
            *subscription = Some(id);
        }
        true
    }

    pub fn current_epoch(&self) -> SessionEpoch {
        self.epoch.load(Ordering::SeqCst)
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    /// False in the inert state: before the first session, and after
    /// [`end_session`](Self::end_session).
    pub fn is_session_active(&self) -> bool {
        self.session_active.load(Ordering::SeqCst)
    }

    /// Idempotent; equivalent to the shutdown subscription firing.
    pub fn notify_shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
    }

    /// Return to the inert state. The epoch is untouched; the tick marker is
    /// cleared so a restart within the same tick still opens a session.
    pub fn end_session(&self) {
        self.session_active.store(false, Ordering::SeqCst);
        self.last_begin_tick.store(TICK_NONE, Ordering::SeqCst);
    }

    /// Explicitly record the current thread as the owner. Host adapters that
    /// can call this from their main loop during startup should prefer it
    /// over the lazy capture below.
    pub fn capture_owner_thread(&self) {
        let mut owner = self.owner.lock();
        if owner.is_none() {
            *owner = Some(thread::current().id());
        }
    }

    pub fn owner_thread(&self) -> Option<ThreadId> {
        *self.owner.lock()
    }

    /// Check the caller against the owner thread. Never panics; the caller
    /// decides whether `false` is a hard error or a soft empty result.
    ///
    /// When no owner has been captured, a lazy capture is attempted, but
    /// only while a session is active and the caller context claims
    /// main-loop provenance; anything less fails closed. The provenance
    /// claim is an assertion by the adapting layer, not a proof.
    pub fn validate_owner_thread(&self, caller: &CallerContext, diag: &dyn Diagnostics) -> bool {
        let mut owner = self.owner.lock();
        match *owner {
            Some(expected) if expected == caller.thread() => true,
            Some(expected) => {
                diag.error(&format!(
                    "call from thread {:?} rejected; owner thread is {:?}",
                    caller.thread(),
                    expected
                ));
                false
            }
            None => {
                if self.is_session_active() && caller.claims_main_loop() {
                    *owner = Some(caller.thread());
                    true
                } else {
                    diag.warn("owner thread not captured yet; rejecting caller");
                    false
                }
            }
        }
    }
}

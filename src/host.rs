//! Host-side collaborator contracts: lifecycle hooks, the shutdown signal,
//! and the per-call dependency bundle assembled by the adapting layer.

use std::sync::Arc;

use crate::diagnostics::Diagnostics;
use crate::graph::ObjectGraph;
use crate::session::SessionTracker;
use crate::types::{CallerContext, SessionEpoch};

pub type SubscriptionId = u64;

/// Callback registered with a [`ShutdownSignal`].
pub type ShutdownObserver = Arc<dyn Fn() + Send + Sync>;

/// One-shot teardown notification source.
///
/// De-duplication of repeated subscriptions is the subscriber's job; the
/// signal may hold several observers and fires each at most once.
pub trait ShutdownSignal {
    fn subscribe(&mut self, observer: ShutdownObserver) -> SubscriptionId;
    fn unsubscribe(&mut self, id: SubscriptionId);
}

/// Per-instance lifecycle notifications delivered by the controller.
pub trait LifecycleHooks<H> {
    /// Runs once per (instance, epoch), after persistence is established.
    fn on_session_start(&mut self, instance: H, epoch: SessionEpoch);

    /// Runs when the instance actually held as the singleton is destroyed.
    /// Rejected duplicates never receive it.
    fn on_singleton_destroyed(&mut self, instance: H);
}

/// Dependencies for one registry call, assembled by the host adapter.
pub struct HostContext<'a, G: ObjectGraph> {
    pub graph: &'a mut G,
    pub hooks: &'a mut dyn LifecycleHooks<G::Handle>,
    pub diagnostics: &'a dyn Diagnostics,
    pub sessions: &'a SessionTracker,
    pub caller: CallerContext,
}

/// Shutdown signal driven by explicit [`fire`](ManualShutdownSignal::fire)
/// calls. Suits hosts that surface teardown as a plain callback, and every
/// test in this crate.
#[derive(Default)]
pub struct ManualShutdownSignal {
    observers: Vec<(SubscriptionId, ShutdownObserver)>,
    next_id: SubscriptionId,
    fired: bool,
}

impl ManualShutdownSignal {
    pub fn new() -> Self {
        ManualShutdownSignal::default()
    }

    /// Notify observers. One-shot: repeated calls are ignored until
    /// [`reset`](Self::reset).
    pub fn fire(&mut self) {
        if self.fired {
            return;
        }
        self.fired = true;
        for (_, observer) in &self.observers {
            observer();
        }
    }

    /// Re-arm after a completed teardown/restart cycle.
    pub fn reset(&mut self) {
        self.fired = false;
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

impl ShutdownSignal for ManualShutdownSignal {
    fn subscribe(&mut self, observer: ShutdownObserver) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.observers.retain(|(sub_id, _)| *sub_id != id);
    }
}

//! Lifecycle Controller
//!
//! Translates host-dispatched construct/attach/detach notifications into
//! registry operations and drives per-session reinitialization exactly once
//! per (instance, epoch). Hosts that dispatch lifecycle callbacks by name
//! rather than through an enforced override chain wire those callbacks to
//! [`LifecycleController::on_attach`] and
//! [`LifecycleController::on_detach`] in their adapting layer.

use std::collections::HashMap;
use std::marker::PhantomData;

use crate::diagnostics::Diagnostics;
use crate::error::RejectReason;
use crate::graph::ObjectGraph;
use crate::host::LifecycleHooks;
use crate::policy::RegistryPolicy;
use crate::registry::{Established, InstanceRegistry};
use crate::session::SessionTracker;
use crate::types::SessionEpoch;

/// What became of a candidate handed to [`LifecycleController::on_attach`].
///
/// Rejections are informational; they never surface as errors on the
/// winning instance's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    Established,
    AlreadyEstablished,
    RejectedDuplicate,
    RejectedTypeMismatch,
    DestroyedDuringShutdown,
}

/// Attach/detach glue for one (component type, policy) pair.
///
/// Keeps the per-*instance* "last initialized epoch" records; the underlying
/// instances are host-owned, so the records live here, keyed by handle and
/// pruned on detach.
pub struct LifecycleController<T, P, G>
where
    T: 'static,
    P: RegistryPolicy,
    G: ObjectGraph,
{
    init_epochs: HashMap<G::Handle, SessionEpoch>,
    _marker: PhantomData<(fn() -> T, fn() -> P)>,
}

impl<T, P, G> Default for LifecycleController<T, P, G>
where
    T: 'static,
    P: RegistryPolicy,
    G: ObjectGraph,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P, G> LifecycleController<T, P, G>
where
    T: 'static,
    P: RegistryPolicy,
    G: ObjectGraph,
{
    pub fn new() -> Self {
        LifecycleController {
            init_epochs: HashMap::new(),
            _marker: PhantomData,
        }
    }

    /// Host constructed/attached `candidate`. Establishes it (or tears it
    /// down) and, on acceptance, runs the per-session initialization step.
    ///
    /// A candidate arriving while shutdown is in progress is destroyed
    /// outright; nothing may establish itself into a session being torn
    /// down.
    pub fn on_attach(
        &mut self,
        candidate: G::Handle,
        registry: &mut InstanceRegistry<T, P, G>,
        graph: &mut G,
        hooks: &mut dyn LifecycleHooks<G::Handle>,
        sessions: &SessionTracker,
        diag: &dyn Diagnostics,
    ) -> AttachOutcome {
        if sessions.is_shutting_down() {
            graph.destroy(candidate);
            return AttachOutcome::DestroyedDuringShutdown;
        }

        match registry.try_establish(candidate, graph, sessions, diag) {
            Ok(established) => {
                self.ensure_session_init(candidate, graph, hooks, sessions);
                match established {
                    Established::Fresh => AttachOutcome::Established,
                    Established::AlreadyHeld => AttachOutcome::AlreadyEstablished,
                }
            }
            Err(RejectReason::DuplicateExists { .. }) => AttachOutcome::RejectedDuplicate,
            Err(RejectReason::TypeMismatch { .. }) => AttachOutcome::RejectedTypeMismatch,
        }
    }

    /// Host is destroying `instance`. Clears the slot and fires the destroy
    /// hook only when the departing instance is the one actually held;
    /// detach of a rejected duplicate is a no-op.
    pub fn on_detach(
        &mut self,
        instance: G::Handle,
        registry: &mut InstanceRegistry<T, P, G>,
        hooks: &mut dyn LifecycleHooks<G::Handle>,
    ) {
        self.init_epochs.remove(&instance);
        if registry.cached_handle() == Some(instance) {
            registry.clear_if_matches(instance);
            hooks.on_singleton_destroyed(instance);
        }
    }

    /// Run the per-session start hook for `instance` if it has not yet run
    /// in the current epoch. Persistence is established first, so the hook
    /// may assume the instance already survives context switches. Returns
    /// whether the hook ran.
    ///
    /// The epoch record is written before the hook fires; a hook that
    /// re-enters the attach path cannot run itself twice.
    pub fn ensure_session_init(
        &mut self,
        instance: G::Handle,
        graph: &mut G,
        hooks: &mut dyn LifecycleHooks<G::Handle>,
        sessions: &SessionTracker,
    ) -> bool {
        if sessions.is_shutting_down() {
            return false;
        }
        let epoch = sessions.current_epoch();
        if self.init_epochs.get(&instance) == Some(&epoch) {
            return false;
        }
        self.init_epochs.insert(instance, epoch);

        if P::PERSIST_ACROSS_RESETS {
            graph.reparent_to_root(instance);
            graph.mark_persistent(instance);
        }
        hooks.on_session_start(instance, epoch);
        true
    }

    /// Epoch in which `instance` last ran its session-start hook.
    pub fn last_initialized_epoch(&self, instance: G::Handle) -> Option<SessionEpoch> {
        self.init_epochs.get(&instance).copied()
    }
}

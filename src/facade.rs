//! Access facade: the two public lookup operations for one singleton.
//!
//! Bundles the registry and lifecycle controller for a (component type,
//! policy) pair behind `get_required` (creating lookup) and `try_get`
//! (non-creating lookup), and degrades both to side-effect-free searches
//! when the host is inert.

use crate::diagnostics::strict;
use crate::error::AccessError;
use crate::graph::ObjectGraph;
use crate::host::HostContext;
use crate::lifecycle::{AttachOutcome, LifecycleController};
use crate::policy::RegistryPolicy;
use crate::registry::InstanceRegistry;

/// Public access surface for one (component type `T`, policy `P`) pair.
pub struct SingletonAccess<T, P, G>
where
    T: 'static,
    P: RegistryPolicy,
    G: ObjectGraph,
{
    registry: InstanceRegistry<T, P, G>,
    controller: LifecycleController<T, P, G>,
}

impl<T, P, G> Default for SingletonAccess<T, P, G>
where
    T: 'static,
    P: RegistryPolicy,
    G: ObjectGraph,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P, G> SingletonAccess<T, P, G>
where
    T: 'static,
    P: RegistryPolicy,
    G: ObjectGraph,
{
    pub fn new() -> Self {
        SingletonAccess {
            registry: InstanceRegistry::new(),
            controller: LifecycleController::new(),
        }
    }

    pub fn registry(&self) -> &InstanceRegistry<T, P, G> {
        &self.registry
    }

    /// Wire point for the host's construct/attach dispatch.
    pub fn on_attach(&mut self, candidate: G::Handle, ctx: &mut HostContext<'_, G>) -> AttachOutcome {
        self.controller.on_attach(
            candidate,
            &mut self.registry,
            &mut *ctx.graph,
            &mut *ctx.hooks,
            ctx.sessions,
            ctx.diagnostics,
        )
    }

    /// Wire point for the host's detach/destroy dispatch.
    pub fn on_detach(&mut self, instance: G::Handle, ctx: &mut HostContext<'_, G>) {
        self.controller
            .on_detach(instance, &mut self.registry, &mut *ctx.hooks);
    }

    /// Creating lookup.
    ///
    /// In diagnostics builds a thread violation, a blocking inactive
    /// instance, or a missing required instance is a hard error; with
    /// diagnostics stripped all three degrade to `Ok(None)`. Access during
    /// shutdown is `Ok(None)` in every build mode.
    pub fn get_required(
        &mut self,
        ctx: &mut HostContext<'_, G>,
    ) -> Result<Option<G::Handle>, AccessError> {
        let key = InstanceRegistry::<T, P, G>::type_key();

        // Inert host (e.g. editor inspection): observe without perturbing.
        // No cache writes, no fabrication, no thread demands.
        if !ctx.sessions.is_session_active() {
            return Ok(ctx.graph.find_exact(key));
        }

        if !ctx.sessions.validate_owner_thread(&ctx.caller, ctx.diagnostics) {
            self.registry.telemetry().record_thread_violation();
            let err = AccessError::ThreadOwnershipViolation {
                type_name: key.name(),
                owner: ctx.sessions.owner_thread(),
                caller: ctx.caller.thread(),
            };
            return if strict() { Err(err) } else { Ok(None) };
        }

        let found =
            self.registry
                .lookup(true, &mut *ctx.graph, ctx.sessions, ctx.diagnostics)?;
        if let Some(instance) = found {
            self.controller.ensure_session_init(
                instance,
                &mut *ctx.graph,
                &mut *ctx.hooks,
                ctx.sessions,
            );
        }
        Ok(found)
    }

    /// Non-creating lookup. Never fabricates, regardless of policy; every
    /// failure degrades to `None`.
    pub fn try_get(&mut self, ctx: &mut HostContext<'_, G>) -> Option<G::Handle> {
        let key = InstanceRegistry::<T, P, G>::type_key();

        if !ctx.sessions.is_session_active() {
            return ctx.graph.find_exact(key);
        }

        if !ctx.sessions.validate_owner_thread(&ctx.caller, ctx.diagnostics) {
            self.registry.telemetry().record_thread_violation();
            return None;
        }

        let found = self
            .registry
            .lookup(false, &mut *ctx.graph, ctx.sessions, ctx.diagnostics)
            .ok()
            .flatten();
        if let Some(instance) = found {
            self.controller.ensure_session_init(
                instance,
                &mut *ctx.graph,
                &mut *ctx.hooks,
                ctx.sessions,
            );
        }
        found
    }
}

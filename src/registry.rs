//! Instance Registry
//!
//! One registry value exists per (component type, policy) pair and owns that
//! pair's cached handle. The cache is trusted only while its validation
//! epoch equals the current session epoch; anything older is treated as cold
//! and must be rediscovered in the object graph before reuse. The registry
//! also enforces exact-type identity and first-wins duplicate resolution.

use std::marker::PhantomData;

use tracing::debug;

use crate::diagnostics::{self, Diagnostics};
use crate::error::{AccessError, RejectReason};
use crate::graph::ObjectGraph;
use crate::policy::RegistryPolicy;
use crate::session::SessionTracker;
use crate::telemetry::Telemetry;
use crate::types::{SessionEpoch, TypeKey};

/// How an accepted candidate relates to the slot it now occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Established {
    /// The slot was empty (or stale) and now holds the candidate.
    Fresh,
    /// The candidate already held the slot for the current epoch.
    AlreadyHeld,
}

#[derive(Debug, Clone, Copy)]
struct Slot<H> {
    handle: H,
    validated_epoch: SessionEpoch,
}

/// Cached singleton handle for one (component type `T`, policy `P`) pair
/// over object graph `G`.
///
/// The graph owns the underlying object; this holds a non-owning handle and
/// re-validates epoch and liveness before every trust decision.
pub struct InstanceRegistry<T, P, G>
where
    T: 'static,
    P: RegistryPolicy,
    G: ObjectGraph,
{
    slot: Option<Slot<G::Handle>>,
    telemetry: Telemetry,
    _marker: PhantomData<(fn() -> T, fn() -> P)>,
}

impl<T, P, G> Default for InstanceRegistry<T, P, G>
where
    T: 'static,
    P: RegistryPolicy,
    G: ObjectGraph,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P, G> InstanceRegistry<T, P, G>
where
    T: 'static,
    P: RegistryPolicy,
    G: ObjectGraph,
{
    pub fn new() -> Self {
        InstanceRegistry {
            slot: None,
            telemetry: Telemetry::default(),
            _marker: PhantomData,
        }
    }

    /// Exact-type key this registry enforces.
    pub fn type_key() -> TypeKey {
        TypeKey::of::<T>()
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Handle currently held, without re-validation.
    pub fn cached_handle(&self) -> Option<G::Handle> {
        self.slot.map(|slot| slot.handle)
    }

    /// Epoch at which the held handle was last validated.
    pub fn validated_epoch(&self) -> Option<SessionEpoch> {
        self.slot.map(|slot| slot.validated_epoch)
    }

    /// Drop the slot if its epoch is stale or its object is gone. The
    /// underlying object may well still exist after an epoch change; it must
    /// be rediscovered before the handle is trusted again.
    fn drop_invalid_slot(&mut self, graph: &G, sessions: &SessionTracker) {
        if let Some(slot) = self.slot {
            if slot.validated_epoch != sessions.current_epoch() || !graph.is_alive(slot.handle) {
                debug!(
                    target: "tether",
                    "invalidating cached {} handle (epoch {} vs {})",
                    Self::type_key().name(),
                    slot.validated_epoch,
                    sessions.current_epoch()
                );
                self.slot = None;
            }
        }
    }

    /// Offer a candidate for the slot. First wins: an incumbent established
    /// in the current epoch keeps the slot and the newcomer is torn down.
    ///
    /// A candidate whose concrete type is not exactly `T` is rejected; it is
    /// destroyed while a session is active, but only flagged in an inert
    /// context so inspection tooling never mutates the graph.
    pub fn try_establish(
        &mut self,
        candidate: G::Handle,
        graph: &mut G,
        sessions: &SessionTracker,
        diag: &dyn Diagnostics,
    ) -> Result<Established, RejectReason> {
        let key = Self::type_key();
        self.drop_invalid_slot(graph, sessions);

        let actual = graph.concrete_type(candidate);
        if actual != Some(key) {
            let reason = RejectReason::TypeMismatch {
                expected: key.name(),
                actual: actual.map(|key| key.name()).unwrap_or("<dead object>"),
            };
            diag.error(&reason.to_string());
            self.telemetry.record_type_mismatch();
            if sessions.is_session_active() {
                graph.destroy(candidate);
            }
            return Err(reason);
        }

        if let Some(slot) = self.slot {
            if slot.handle == candidate {
                return Ok(Established::AlreadyHeld);
            }
            let reason = RejectReason::DuplicateExists {
                type_name: key.name(),
            };
            diag.warn(&reason.to_string());
            self.telemetry.record_duplicate();
            graph.destroy(candidate);
            return Err(reason);
        }

        self.slot = Some(Slot {
            handle: candidate,
            validated_epoch: sessions.current_epoch(),
        });
        self.telemetry.record_establishment();
        debug!(
            target: "tether",
            "established {} (epoch {})",
            key.name(),
            sessions.current_epoch()
        );
        Ok(Established::Fresh)
    }

    /// Resolve the singleton handle.
    ///
    /// `allow_create` marks the creating-lookup path; fabrication itself
    /// additionally requires `P::AUTO_CREATE_IF_MISSING`. Order of checks:
    /// shutdown gate, epoch-valid cache, fresh graph search, inactive-
    /// candidate block, fabrication, missing-required.
    pub fn lookup(
        &mut self,
        allow_create: bool,
        graph: &mut G,
        sessions: &SessionTracker,
        diag: &dyn Diagnostics,
    ) -> Result<Option<G::Handle>, AccessError> {
        let key = Self::type_key();
        self.telemetry.record_lookup();

        // Nothing is handed out during teardown, in any build mode; a cached
        // handle resurrected here could outlive the session it belongs to.
        if sessions.is_shutting_down() {
            self.telemetry.record_shutdown_denial();
            return Ok(None);
        }

        if let Some(slot) = self.slot {
            if slot.validated_epoch == sessions.current_epoch() && graph.is_alive(slot.handle) {
                self.telemetry.record_cache_hit();
                return Ok(Some(slot.handle));
            }
        }
        self.slot = None;

        self.telemetry.record_graph_search();
        if let Some(found) = graph.find_exact(key) {
            self.slot = Some(Slot {
                handle: found,
                validated_epoch: sessions.current_epoch(),
            });
            self.telemetry.record_establishment();
            debug!(
                target: "tether",
                "re-validated {} from graph search (epoch {})",
                key.name(),
                sessions.current_epoch()
            );
            return Ok(Some(found));
        }

        // A disabled instance must not read as "absent": auto-create would
        // fabricate a hidden second instance beside it.
        if let Some(idle) = graph.find_exact_including_inactive(key) {
            if graph.is_alive(idle) {
                self.telemetry.record_inactive_block();
                let err = AccessError::InactiveCandidateBlocked {
                    type_name: key.name(),
                };
                if allow_create {
                    return diagnostics::fail(diag, err);
                }
                diag.warn(&err.to_string());
                return Ok(None);
            }
        }

        if allow_create && P::AUTO_CREATE_IF_MISSING {
            let created = graph.create(key);
            self.slot = Some(Slot {
                handle: created,
                validated_epoch: sessions.current_epoch(),
            });
            self.telemetry.record_fabrication();
            self.telemetry.record_establishment();
            debug!(target: "tether", "fabricated {}", key.name());
            return Ok(Some(created));
        }

        if allow_create {
            return diagnostics::fail(
                diag,
                AccessError::MissingRequiredInstance {
                    type_name: key.name(),
                },
            );
        }
        Ok(None)
    }

    /// Host notification that the referenced object was destroyed. No-op if
    /// a different instance has since taken the slot.
    pub fn clear_if_matches(&mut self, handle: G::Handle) {
        if let Some(slot) = self.slot {
            if slot.handle == handle {
                self.slot = None;
            }
        }
    }
}

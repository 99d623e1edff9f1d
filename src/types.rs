//! Core identifiers shared across the registry: session epochs, scheduler
//! ticks, exact-type keys, and caller contexts.

use std::any::TypeId;
use std::thread::{self, ThreadId};

/// Monotonically increasing counter marking a logical restart boundary.
///
/// An epoch advances once per session start; it does not reset when the
/// process survives a host-level teardown, which is exactly why it can be
/// used to invalidate cached references that a "has this run yet" flag
/// would keep alive.
pub type SessionEpoch = u64;

/// Host scheduler step counter, used to make session starts idempotent
/// within a single indivisible scheduling step.
pub type Tick = u64;

/// Exact identity of a concrete component type.
///
/// Two keys are equal only when they name the very same Rust type; there is
/// no subtype relation. The human-readable name rides along for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for the concrete type `T`.
    pub fn of<T: 'static>() -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Human-readable type name, for diagnostics output only.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Identity of the thread issuing a registry call, plus whether the adapting
/// layer vouches that the call originates from the host's main loop dispatch.
///
/// The main-loop claim is an assertion by the caller, not something this
/// crate can prove; it only matters for the lazy owner-thread capture
/// fallback in [`crate::session::SessionTracker::validate_owner_thread`].
#[derive(Debug, Clone)]
pub struct CallerContext {
    thread: ThreadId,
    main_loop: bool,
}

impl CallerContext {
    /// Context for the current thread, with no main-loop claim.
    pub fn current() -> Self {
        CallerContext {
            thread: thread::current().id(),
            main_loop: false,
        }
    }

    /// Context for the current thread, asserting main-loop provenance.
    pub fn main_loop() -> Self {
        CallerContext {
            thread: thread::current().id(),
            main_loop: true,
        }
    }

    pub fn thread(&self) -> ThreadId {
        self.thread
    }

    pub fn claims_main_loop(&self) -> bool {
        self.main_loop
    }
}

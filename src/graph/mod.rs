//! Host Object Graph
//!
//! The registry never owns component instances; the host's object graph
//! does. This module defines the call-level contract the registry consumes,
//! and a reference in-memory implementation used by tests and benchmarks.

pub mod memory;

pub use memory::{MemoryGraph, ObjectId};

use std::fmt::Debug;
use std::hash::Hash;

use crate::types::TypeKey;

/// Object graph interface: search, lifecycle, and candidate validation.
///
/// Handles are non-owning references; every trust decision made on one must
/// be preceded by a liveness re-check, because the host may destroy the
/// underlying object at any point between calls.
pub trait ObjectGraph {
    type Handle: Copy + Eq + Hash + Debug;

    /// Find an active object of exactly the given type.
    ///
    /// When several candidates exist there is no guarantee the same one is
    /// returned across repeated calls.
    fn find_exact(&self, key: TypeKey) -> Option<Self::Handle>;

    /// Like [`find_exact`](Self::find_exact), but inactive/disabled objects
    /// are also considered.
    fn find_exact_including_inactive(&self, key: TypeKey) -> Option<Self::Handle>;

    /// Synchronously fabricate a new object of the given type.
    fn create(&mut self, key: TypeKey) -> Self::Handle;

    /// Request destruction of an object.
    ///
    /// Destruction may be deferred to a later point in the current
    /// scheduling step; callers must not assume the object disappears from
    /// subsequent searches within the same step.
    fn destroy(&mut self, handle: Self::Handle);

    /// Exempt an object from host-level context teardown.
    fn mark_persistent(&mut self, handle: Self::Handle);

    /// Move an object to the graph root (a precondition some hosts place on
    /// persistence marking).
    fn reparent_to_root(&mut self, handle: Self::Handle);

    fn is_alive(&self, handle: Self::Handle) -> bool;

    fn is_active(&self, handle: Self::Handle) -> bool;

    /// Concrete runtime type of the referenced object, or `None` when the
    /// handle is dangling.
    fn concrete_type(&self, handle: Self::Handle) -> Option<TypeKey>;
}

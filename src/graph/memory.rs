//! In-memory object graph.
//!
//! Reference [`ObjectGraph`] implementation backing the integration tests,
//! property tests, and benchmarks, and a starting point for host adapters.
//! Supports both immediate and host-style deferred destruction.

use std::collections::HashMap;

use super::ObjectGraph;
use crate::types::TypeKey;

/// Non-owning handle into a [`MemoryGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

#[derive(Debug, Clone)]
struct ObjectRecord {
    key: TypeKey,
    active: bool,
    persistent: bool,
    at_root: bool,
    /// Destruction requested but not yet flushed (deferred mode only).
    doomed: bool,
}

/// In-memory [`ObjectGraph`] implementation.
#[derive(Debug, Default)]
pub struct MemoryGraph {
    objects: HashMap<ObjectId, ObjectRecord>,
    next_id: u64,
    defer_destruction: bool,
}

impl MemoryGraph {
    pub fn new() -> Self {
        MemoryGraph::default()
    }

    /// Graph in which `destroy` only marks objects doomed; they stay visible
    /// to the inactive-inclusive search until [`end_step`](Self::end_step).
    pub fn with_deferred_destruction() -> Self {
        MemoryGraph {
            defer_destruction: true,
            ..MemoryGraph::default()
        }
    }

    /// Host-side creation of an active object (e.g. placed in a scene).
    pub fn spawn(&mut self, key: TypeKey) -> ObjectId {
        self.insert(key, true)
    }

    /// Host-side creation of a disabled object.
    pub fn spawn_inactive(&mut self, key: TypeKey) -> ObjectId {
        self.insert(key, false)
    }

    fn insert(&mut self, key: TypeKey, active: bool) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(
            id,
            ObjectRecord {
                key,
                active,
                persistent: false,
                at_root: false,
                doomed: false,
            },
        );
        id
    }

    pub fn set_active(&mut self, handle: ObjectId, active: bool) {
        if let Some(record) = self.objects.get_mut(&handle) {
            record.active = active;
        }
    }

    /// Flush deferred destructions; the host calls this at the end of a
    /// scheduling step.
    pub fn end_step(&mut self) {
        self.objects.retain(|_, record| !record.doomed);
    }

    /// Host context switch: every non-persistent object is torn down.
    pub fn clear_non_persistent(&mut self) {
        self.objects.retain(|_, record| record.persistent);
    }

    pub fn is_persistent(&self, handle: ObjectId) -> bool {
        self.objects.get(&handle).is_some_and(|r| r.persistent)
    }

    pub fn is_at_root(&self, handle: ObjectId) -> bool {
        self.objects.get(&handle).is_some_and(|r| r.at_root)
    }

    /// Number of live (non-doomed) objects of exactly the given type.
    pub fn live_count(&self, key: TypeKey) -> usize {
        self.objects
            .values()
            .filter(|r| r.key == key && !r.doomed)
            .count()
    }
}

impl ObjectGraph for MemoryGraph {
    type Handle = ObjectId;

    fn find_exact(&self, key: TypeKey) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, r)| r.key == key && r.active && !r.doomed)
            .map(|(id, _)| *id)
    }

    fn find_exact_including_inactive(&self, key: TypeKey) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, r)| r.key == key)
            .map(|(id, _)| *id)
    }

    fn create(&mut self, key: TypeKey) -> ObjectId {
        self.spawn(key)
    }

    fn destroy(&mut self, handle: ObjectId) {
        if self.defer_destruction {
            if let Some(record) = self.objects.get_mut(&handle) {
                record.doomed = true;
                record.active = false;
            }
        } else {
            self.objects.remove(&handle);
        }
    }

    fn mark_persistent(&mut self, handle: ObjectId) {
        if let Some(record) = self.objects.get_mut(&handle) {
            record.persistent = true;
        }
    }

    fn reparent_to_root(&mut self, handle: ObjectId) {
        if let Some(record) = self.objects.get_mut(&handle) {
            record.at_root = true;
        }
    }

    fn is_alive(&self, handle: ObjectId) -> bool {
        self.objects.get(&handle).is_some_and(|r| !r.doomed)
    }

    fn is_active(&self, handle: ObjectId) -> bool {
        self.objects.get(&handle).is_some_and(|r| r.active && !r.doomed)
    }

    fn concrete_type(&self, handle: ObjectId) -> Option<TypeKey> {
        self.objects
            .get(&handle)
            .filter(|r| !r.doomed)
            .map(|r| r.key)
    }
}

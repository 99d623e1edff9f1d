//! End-to-end facade scenarios, including the policy-dependent
//! creating-lookup behavior and the inert-context degrade.

use super::test_utils::Harness;
use tether::error::AccessError;
use tether::facade::SingletonAccess;
use tether::graph::{MemoryGraph, ObjectGraph};
use tether::policy::{Global, Scoped};
use tether::types::TypeKey;

struct AudioManager;
struct LevelDirector;

type AudioAccess = SingletonAccess<AudioManager, Global, MemoryGraph>;
type DirectorAccess = SingletonAccess<LevelDirector, Scoped, MemoryGraph>;

/// The worked global-policy scenario: attach, epoch advance, duplicate.
#[test]
fn test_global_policy_scenario() {
    let mut harness = Harness::new();
    harness.begin_session(1);
    let mut access = AudioAccess::new();
    let key = TypeKey::of::<AudioManager>();

    let a = harness.graph.spawn(key);
    access.on_attach(a, &mut harness.ctx());
    assert_eq!(harness.hooks.starts_for(a), 1);
    assert_eq!(access.try_get(&mut harness.ctx()), Some(a));

    harness.begin_session(2);
    assert_eq!(access.try_get(&mut harness.ctx()), Some(a));
    assert_eq!(harness.hooks.starts_for(a), 2);

    let b = harness.graph.spawn(key);
    access.on_attach(b, &mut harness.ctx());
    assert!(!harness.graph.is_alive(b));
    assert_eq!(access.try_get(&mut harness.ctx()), Some(a));
}

/// The worked scoped-policy scenario: nothing placed, creating lookup fails.
#[test]
fn test_scoped_policy_scenario() {
    let mut harness = Harness::new();
    harness.begin_session(1);
    let mut access = DirectorAccess::new();

    #[cfg(feature = "diagnostics")]
    assert_eq!(
        access.get_required(&mut harness.ctx()),
        Err(AccessError::MissingRequiredInstance {
            type_name: TypeKey::of::<LevelDirector>().name()
        })
    );
    #[cfg(not(feature = "diagnostics"))]
    assert_eq!(access.get_required(&mut harness.ctx()), Ok(None));

    // The non-creating lookup is empty in both build modes.
    assert_eq!(access.try_get(&mut harness.ctx()), None);
    assert_eq!(harness.graph.live_count(TypeKey::of::<LevelDirector>()), 0);
}

#[test]
fn test_scoped_policy_finds_placed_instance() {
    let mut harness = Harness::new();
    harness.begin_session(1);
    let mut access = DirectorAccess::new();

    let director = harness.graph.spawn(TypeKey::of::<LevelDirector>());
    assert_eq!(
        access.get_required(&mut harness.ctx()),
        Ok(Some(director))
    );
}

#[test]
fn test_inactive_instance_blocks_creating_lookup() {
    let mut harness = Harness::new();
    harness.begin_session(1);
    let mut access = AudioAccess::new();
    let key = TypeKey::of::<AudioManager>();

    harness.graph.spawn_inactive(key);

    let result = access.get_required(&mut harness.ctx());
    #[cfg(feature = "diagnostics")]
    assert_eq!(
        result,
        Err(AccessError::InactiveCandidateBlocked {
            type_name: key.name()
        })
    );
    #[cfg(not(feature = "diagnostics"))]
    assert_eq!(result, Ok(None));

    // Fabrication never happened in either mode; re-enabling the instance
    // makes it reachable again.
    assert_eq!(harness.graph.live_count(key), 1);
    let existing = harness
        .graph
        .find_exact_including_inactive(key)
        .expect("instance present");
    harness.graph.set_active(existing, true);
    assert_eq!(access.try_get(&mut harness.ctx()), Some(existing));
}

#[test]
fn test_inert_context_observes_without_side_effects() {
    let mut harness = Harness::new();
    // No session begun: the host is inert.
    let mut access = AudioAccess::new();
    let key = TypeKey::of::<AudioManager>();

    assert_eq!(access.get_required(&mut harness.ctx()), Ok(None));
    assert_eq!(harness.graph.live_count(key), 0);

    let existing = harness.graph.spawn(key);
    assert_eq!(access.try_get(&mut harness.ctx()), Some(existing));
    assert_eq!(access.get_required(&mut harness.ctx()), Ok(Some(existing)));

    // Read-only: no cache entry, no hook, no persistence marking.
    assert_eq!(access.registry().cached_handle(), None);
    assert!(harness.hooks.session_starts.is_empty());
    assert!(!harness.graph.is_persistent(existing));
}

#[test]
fn test_end_session_restores_inert_behavior() {
    let mut harness = Harness::new();
    harness.begin_session(1);
    let mut access = AudioAccess::new();

    let instance = access
        .get_required(&mut harness.ctx())
        .expect("creating lookup")
        .expect("fabricated");

    harness.sessions.end_session();

    // Back to read-only observation; the established instance is still
    // visible but the cache is no longer consulted or refreshed.
    assert_eq!(access.try_get(&mut harness.ctx()), Some(instance));
    let hook_runs = harness.hooks.starts_for(instance);
    assert_eq!(hook_runs, 1);
}

#[test]
fn test_telemetry_reflects_traffic() {
    let mut harness = Harness::new();
    harness.begin_session(1);
    let mut access = AudioAccess::new();

    access.get_required(&mut harness.ctx()).expect("fabricate");
    access.try_get(&mut harness.ctx());
    access.try_get(&mut harness.ctx());

    let snapshot = access.registry().telemetry().snapshot();
    assert_eq!(snapshot.lookups, 3);
    assert_eq!(snapshot.fabrications, 1);
    assert_eq!(snapshot.cache_hits, 2);

    let json = serde_json::to_value(snapshot).expect("serializable");
    assert_eq!(json["fabrications"], 1);
}

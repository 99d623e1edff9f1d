//! No resurrection during shutdown: once the teardown signal fires, every
//! lookup comes back empty, in every build mode, even while a perfectly
//! healthy instance still sits in the object graph.

use super::test_utils::Harness;
use tether::facade::SingletonAccess;
use tether::graph::{MemoryGraph, ObjectGraph};
use tether::lifecycle::AttachOutcome;
use tether::policy::Global;
use tether::types::TypeKey;

struct NetDriver;

type NetAccess = SingletonAccess<NetDriver, Global, MemoryGraph>;

#[test]
fn test_lookups_return_nothing_after_shutdown_signal() {
    let mut harness = Harness::new();
    harness.begin_session(1);
    let mut access = NetAccess::new();

    let driver = harness.graph.spawn(TypeKey::of::<NetDriver>());
    access.on_attach(driver, &mut harness.ctx());
    assert_eq!(access.try_get(&mut harness.ctx()), Some(driver));

    // Teardown arrives through the subscription the tracker registered.
    harness.signal.fire();
    assert!(harness.sessions.is_shutting_down());

    // The object still exists; the registry nevertheless yields nothing.
    assert!(harness.graph.is_alive(driver));
    assert_eq!(access.try_get(&mut harness.ctx()), None);
    assert_eq!(access.get_required(&mut harness.ctx()), Ok(None));
}

#[test]
fn test_no_fabrication_during_shutdown() {
    let mut harness = Harness::new();
    harness.begin_session(1);
    let mut access = NetAccess::new();

    harness.sessions.notify_shutdown();
    assert_eq!(access.get_required(&mut harness.ctx()), Ok(None));
    assert_eq!(harness.graph.live_count(TypeKey::of::<NetDriver>()), 0);
}

#[test]
fn test_late_attach_during_shutdown_is_destroyed() {
    let mut harness = Harness::new();
    harness.begin_session(1);
    let mut access = NetAccess::new();

    harness.sessions.notify_shutdown();
    let late = harness.graph.spawn(TypeKey::of::<NetDriver>());
    assert_eq!(
        access.on_attach(late, &mut harness.ctx()),
        AttachOutcome::DestroyedDuringShutdown
    );
    assert!(!harness.graph.is_alive(late));
    assert!(harness.hooks.session_starts.is_empty());
}

#[test]
fn test_next_session_clears_shutdown_and_restores_access() {
    let mut harness = Harness::new();
    harness.begin_session(1);
    let mut access = NetAccess::new();

    let driver = harness.graph.spawn(TypeKey::of::<NetDriver>());
    access.on_attach(driver, &mut harness.ctx());

    harness.signal.fire();
    assert_eq!(access.try_get(&mut harness.ctx()), None);

    // Restart: the flag clears, the epoch advances, the instance carried
    // over and is rediscovered.
    harness.signal.reset();
    harness.begin_session(2);
    assert!(!harness.sessions.is_shutting_down());
    assert_eq!(access.try_get(&mut harness.ctx()), Some(driver));
    assert_eq!(harness.hooks.starts_for(driver), 2);
}

#[test]
fn test_shutdown_subscription_not_duplicated_across_restarts() {
    let mut harness = Harness::new();
    for tick in 1..=4 {
        harness.begin_session(tick);
    }
    assert_eq!(harness.signal.observer_count(), 1);
}

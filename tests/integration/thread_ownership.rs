//! Owner-thread enforcement: calls from any other thread never return a
//! usable instance and never mutate the registry slot.

use std::thread;

use super::test_utils::Harness;
use tether::diagnostics::strict;
use tether::error::AccessError;
use tether::facade::SingletonAccess;
use tether::graph::MemoryGraph;
use tether::policy::Global;
use tether::types::{CallerContext, TypeKey};

struct JobScheduler;

type JobAccess = SingletonAccess<JobScheduler, Global, MemoryGraph>;

#[test]
fn test_foreign_thread_gets_nothing_and_mutates_nothing() {
    let mut harness = Harness::new();
    harness.begin_session(1);
    let mut access = JobAccess::new();

    let scheduler = harness.graph.spawn(TypeKey::of::<JobScheduler>());
    access.on_attach(scheduler, &mut harness.ctx());
    // Owner thread captured by the main-loop call above.
    assert!(harness.sessions.owner_thread().is_some());
    let baseline = access.registry().telemetry().snapshot();

    thread::scope(|scope| {
        scope
            .spawn(|| {
                // Even a (false) main-loop claim does not help once the
                // owner is captured.
                let caller = CallerContext::main_loop();
                let mut ctx = harness.ctx_from(caller);
                assert_eq!(access.try_get(&mut ctx), None);

                let result = access.get_required(&mut ctx);
                if strict() {
                    assert!(matches!(
                        result,
                        Err(AccessError::ThreadOwnershipViolation { .. })
                    ));
                } else {
                    assert_eq!(result, Ok(None));
                }
            })
            .join()
            .expect("worker thread panicked");
    });

    // Slot untouched, both violations counted, no hidden lookups ran.
    assert_eq!(access.registry().cached_handle(), Some(scheduler));
    let after = access.registry().telemetry().snapshot();
    assert_eq!(after.thread_violations, baseline.thread_violations + 2);
    assert_eq!(after.lookups, baseline.lookups);

    // The owner thread still gets its instance.
    assert_eq!(access.try_get(&mut harness.ctx()), Some(scheduler));
}

#[test]
fn test_uncaptured_owner_fails_closed_without_provenance() {
    let mut harness = Harness::new();
    harness.begin_session(1);
    let mut access = JobAccess::new();

    harness.graph.spawn(TypeKey::of::<JobScheduler>());

    // Session active, but the caller cannot vouch for main-loop provenance
    // and no owner was ever captured: fail closed, no capture, no result.
    let caller = CallerContext::current();
    let mut ctx = harness.ctx_from(caller);
    assert_eq!(access.try_get(&mut ctx), None);
    assert!(harness.sessions.owner_thread().is_none());
}

#[test]
fn test_explicit_capture_beats_lazy_heuristic() {
    let mut harness = Harness::new();
    harness.begin_session(1);
    harness.sessions.capture_owner_thread();
    let mut access = JobAccess::new();

    harness.graph.spawn(TypeKey::of::<JobScheduler>());

    // With the owner explicitly captured, a plain caller context on the
    // owner thread is sufficient.
    let caller = CallerContext::current();
    let mut ctx = harness.ctx_from(caller);
    assert!(access.try_get(&mut ctx).is_some());
}

//! Error types for the singleton registry.

use std::thread::ThreadId;
use thiserror::Error;

/// Why a candidate instance failed to establish itself in a registry slot.
///
/// Both variants are resolved locally: the losing candidate is torn down and
/// the incumbent (if any) keeps the slot. They reach callers only through
/// diagnostics, never as errors on the winning instance's path.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    #[error("a different {type_name} instance is already established; candidate rejected")]
    DuplicateExists { type_name: &'static str },

    #[error("singleton slot expects exactly {expected}, candidate is {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
}

/// Caller-visible failures on the lookup paths.
///
/// With the `diagnostics` feature enabled the first three are returned as
/// hard errors from the creating lookup; with it stripped they degrade to
/// empty results. `ShutdownInProgress` never surfaces as an error in any
/// build mode: access during teardown always yields nothing.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    #[error("no {type_name} instance exists and the active policy does not fabricate one")]
    MissingRequiredInstance { type_name: &'static str },

    #[error("an inactive {type_name} instance exists; refusing to fabricate a duplicate beside it")]
    InactiveCandidateBlocked { type_name: &'static str },

    #[error("{type_name} accessed from thread {caller:?}; owner thread is {owner:?}")]
    ThreadOwnershipViolation {
        type_name: &'static str,
        owner: Option<ThreadId>,
        caller: ThreadId,
    },

    #[error("registry access during shutdown")]
    ShutdownInProgress,
}

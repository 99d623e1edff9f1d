//! Registry policies.
//!
//! A policy is selected at compile time and carries no per-instance data.
//! It answers two questions: does an established instance survive a
//! host-level context switch, and may the creating lookup fabricate an
//! instance when none exists.

/// Compile-time behavior of one registry.
///
/// Implementors are zero-sized markers; the registry is monomorphized per
/// (component type, policy) pair so policies never exist as runtime values.
pub trait RegistryPolicy: 'static {
    /// Whether an established instance is marked persistent so it survives
    /// a host scene/context switch.
    const PERSIST_ACROSS_RESETS: bool;

    /// Whether the creating lookup may fabricate an instance when the
    /// object graph holds none.
    const AUTO_CREATE_IF_MISSING: bool;

    /// Short policy name for diagnostics output.
    const NAME: &'static str;
}

/// Process-lifetime singletons: persisted across context switches and
/// fabricated on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Global;

impl RegistryPolicy for Global {
    const PERSIST_ACROSS_RESETS: bool = true;
    const AUTO_CREATE_IF_MISSING: bool = true;
    const NAME: &'static str = "global";
}

/// Context-scoped singletons: torn down with their context by the host and
/// never fabricated; something must have placed one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoped;

impl RegistryPolicy for Scoped {
    const PERSIST_ACROSS_RESETS: bool = false;
    const AUTO_CREATE_IF_MISSING: bool = false;
    const NAME: &'static str = "scoped";
}

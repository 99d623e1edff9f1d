//! Diagnostics sink and build-mode failure policy.
//!
//! Misuse reports flow through the [`Diagnostics`] trait so hosts can route
//! them wherever they like; [`TracingDiagnostics`] is the default and feeds
//! the `tracing` ecosystem. Whether a reported misuse *also* becomes a hard
//! error is decided once, here, by the `diagnostics` cargo feature, so the
//! two build modes differ only in error propagation, never in results.

use tracing::{error, warn};

use crate::error::AccessError;

/// Host-facing diagnostics sink.
pub trait Diagnostics {
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Routes diagnostics to `tracing` under the `tether` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warn(&self, message: &str) {
        warn!(target: "tether", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "tether", "{message}");
    }
}

/// Swallows everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDiagnostics;

impl Diagnostics for NullDiagnostics {
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// True when misuse raises typed errors instead of degrading to empty
/// results.
pub const fn strict() -> bool {
    cfg!(feature = "diagnostics")
}

/// Report a misuse and resolve it per build mode: a typed error under the
/// `diagnostics` feature, an empty result without it. Callers must treat the
/// `Ok(None)` outcome as reachable in every configuration.
pub(crate) fn fail<T>(diag: &dyn Diagnostics, err: AccessError) -> Result<Option<T>, AccessError> {
    diag.error(&err.to_string());
    if strict() {
        Err(err)
    } else {
        Ok(None)
    }
}

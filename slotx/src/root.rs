//! Identification metadata for slot arrays that act as collector roots.

use strum::Display;

/// Which part of a runtime owns a table whose slots are roots.
///
/// Purely diagnostic: collectors group and report their roots by
/// source when accounting for what keeps objects alive. Supplied at
/// table construction together with a human-readable label.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Display)]
#[non_exhaustive]
pub enum RootSource {
    /// Registered by embedder code outside the runtime.
    #[default]
    External,
    /// Static fields and other whole-program state.
    Static,
    /// Explicitly pinned handles.
    GcHandle,
    /// Compiled-code metadata kept by the JIT.
    Jit,
    /// Per-thread runtime structures.
    Threading,
    /// Per-domain runtime structures.
    Domain,
    /// Reflection caches.
    Reflection,
    /// State owned by an attached debugger.
    Debugger,
}

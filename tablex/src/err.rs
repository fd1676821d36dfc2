//! Error types for the `tablex` crate

/// Errors applicable to storing entries in a table
#[derive(Copy, Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller passed a key using one of the reserved slot markers.
    ///
    /// The all-zeros and all-ones words encode the empty and tombstone
    /// slot states in-band, so neither can be stored as a key. Values
    /// carry no slot state and accept any bit pattern.
    #[error("key collides with a reserved slot marker (null or tombstone)")]
    ReservedKey,
}

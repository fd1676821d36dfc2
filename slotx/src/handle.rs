//! The two word types a slot can be built from: opaque handles and
//! collector-visible references.
//!
//! Both are a single pointer-sized word with no niche and no padding,
//! so any slot shape assembled from them is exactly two words. The
//! difference between them is entirely about what a tracing pass is
//! allowed to do: it must skip every [`Handle`] and follow every live
//! [`TracedRef`].

use bytemuck::{Pod, Zeroable};
use std::fmt;

/// An opaque fixed-width word stored in a table slot.
///
/// A handle carries a raw address or integer that the collector does
/// not manage. It is never interpreted as a reference by a tracing
/// pass, and any bit pattern written into one reads back unchanged.
///
/// Two patterns are reserved for slot bookkeeping and cannot be used
/// as table keys: [`Handle::NULL`] marks a slot that has never held an
/// entry, and [`Handle::TOMBSTONE`] marks a slot whose entry was
/// removed. Runtime keys are object addresses or tagged integers, so
/// neither pattern occurs in practice.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Handle(usize);

impl Handle {
    /// The all-zeros word marking a never-used slot.
    pub const NULL: Handle = Handle(0);

    /// The all-ones word marking a removed entry.
    pub const TOMBSTONE: Handle = Handle(usize::MAX);

    /// Wrap a raw word in a handle, preserving its exact bit pattern.
    #[inline(always)]
    pub const fn from_raw(raw: usize) -> Self {
        Handle(raw)
    }

    /// The exact bit pattern this handle carries.
    #[inline(always)]
    pub const fn into_raw(self) -> usize {
        self.0
    }

    /// Whether this is the [`Handle::NULL`] marker.
    #[inline(always)]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Whether this is the [`Handle::TOMBSTONE`] marker.
    #[inline(always)]
    pub const fn is_tombstone(self) -> bool {
        self.0 == usize::MAX
    }

    /// Whether this is one of the two reserved slot markers.
    #[inline(always)]
    pub const fn is_reserved(self) -> bool {
        self.is_null() || self.is_tombstone()
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "Handle(NULL)")
        } else if self.is_tombstone() {
            write!(f, "Handle(TOMBSTONE)")
        } else {
            write!(f, "Handle({:#x})", self.0)
        }
    }
}

/// A collector-visible reference word stored in a table slot.
///
/// A tracing pass must follow every traced reference it is shown, and
/// may rewrite it in place when the collector moves the referent. The
/// reserved [`Handle`] patterns keep their marker meaning here: a
/// traced word holding one of them denotes no reference, and
/// [`crate::trace_slot`] never hands it to a tracer.
///
/// `TracedRef` is `repr(transparent)` over [`Handle`], so swapping one
/// word of a slot shape between traced and opaque never disturbs the
/// offset of the other word.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct TracedRef(Handle);

impl TracedRef {
    /// A traced word holding no reference.
    pub const NULL: TracedRef = TracedRef(Handle::NULL);

    /// Reinterpret a handle's bit pattern as a traced reference.
    #[inline(always)]
    pub const fn from_handle(handle: Handle) -> Self {
        TracedRef(handle)
    }

    /// The same word viewed as an opaque handle.
    #[inline(always)]
    pub const fn into_handle(self) -> Handle {
        self.0
    }

    /// Whether this word denotes no reference at all: either of the
    /// reserved marker patterns.
    #[inline(always)]
    pub const fn is_reserved(self) -> bool {
        self.0.is_reserved()
    }
}

impl fmt::Debug for TracedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_reserved() {
            write!(f, "TracedRef(-)")
        } else {
            write!(f, "TracedRef({:#x})", self.0.into_raw())
        }
    }
}

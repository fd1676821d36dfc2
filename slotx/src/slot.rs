//! The four slot shapes, the uniform raw view, and the shape selector.
//!
//! A slot is two words: key then value. Each word is either an opaque
//! [`Handle`] or a collector-visible [`TracedRef`], giving four shapes.
//! Table code never branches on the shape: both word types are a bare
//! `usize` under `repr(transparent)`, and every shape is `repr(C)`, so
//! the key word sits at [`KEY_OFFSET`] and the value word at
//! [`VALUE_OFFSET`] no matter which shape a table selected. Generic
//! slot access goes through [`RawSlot`]; only a tracing pass consults
//! the [`Tracking`] tag, which lives in the table, never in the slot.
//!
//! The offset and size equalities the whole scheme rests on are
//! asserted at compile time at the bottom of this module.

use crate::handle::{Handle, TracedRef};
use bytemuck::{Pod, Zeroable};
use std::mem::{align_of, offset_of, size_of};
use strum::{Display, EnumIter};

/// Slot shape for tables where the collector manages neither word.
///
/// Keys and values are raw addresses or integers; a tracing pass walks
/// straight past slots of this shape.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SlotNoGc {
    /// Opaque key word.
    pub key: Handle,
    /// Opaque value word.
    pub value: Handle,
}

/// Slot shape for tables whose keys are collector-visible.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SlotKeyGc {
    /// Collector-visible key word.
    pub key: TracedRef,
    /// Opaque value word.
    pub value: Handle,
}

/// Slot shape for tables whose values are collector-visible.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SlotValueGc {
    /// Opaque key word.
    pub key: Handle,
    /// Collector-visible value word.
    pub value: TracedRef,
}

/// Slot shape for tables where both words are collector-visible.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SlotKeyValueGc {
    /// Collector-visible key word.
    pub key: TracedRef,
    /// Collector-visible value word.
    pub value: TracedRef,
}

/// The uniform two-word view table code reads and writes.
///
/// Layout-identical to all four shapes, with both words typed as
/// opaque. Code that moves entries around uses this view and performs
/// traced stores through a [`crate::Barrier`] when the table's
/// [`Tracking`] says a word is collector-visible.
///
/// The key word doubles as the slot state: [`Handle::NULL`] means the
/// slot has never been used, [`Handle::TOMBSTONE`] means its entry was
/// removed and the slot awaits reclamation at the next rehash.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct RawSlot {
    /// Key word, also carrying the empty/tombstone slot state.
    pub key: Handle,
    /// Value word.
    pub value: Handle,
}

impl RawSlot {
    /// A slot that has never held an entry.
    pub const EMPTY: RawSlot = RawSlot {
        key: Handle::NULL,
        value: Handle::NULL,
    };

    /// Whether this slot has never held an entry.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.key.is_null()
    }

    /// Whether this slot held an entry that was removed.
    #[inline(always)]
    pub const fn is_tombstone(&self) -> bool {
        self.key.is_tombstone()
    }

    /// Whether this slot currently holds an entry.
    #[inline(always)]
    pub const fn is_live(&self) -> bool {
        !self.key.is_reserved()
    }
}

/// Byte offset of the key word within every slot shape.
pub const KEY_OFFSET: usize = 0;

/// Byte offset of the value word within every slot shape.
pub const VALUE_OFFSET: usize = size_of::<usize>();

/// Size in bytes of a slot in every shape: exactly two pointer words.
pub const SLOT_SIZE: usize = 2 * size_of::<usize>();

// The layout contract. Table code reads words by position and the
// tracing contract quotes offsets, so a shape that strays from the
// common layout is a compile error, not a runtime surprise.
const _: () = {
    assert!(offset_of!(SlotNoGc, key) == KEY_OFFSET);
    assert!(offset_of!(SlotKeyGc, key) == KEY_OFFSET);
    assert!(offset_of!(SlotValueGc, key) == KEY_OFFSET);
    assert!(offset_of!(SlotKeyValueGc, key) == KEY_OFFSET);
    assert!(offset_of!(RawSlot, key) == KEY_OFFSET);

    assert!(offset_of!(SlotNoGc, value) == VALUE_OFFSET);
    assert!(offset_of!(SlotKeyGc, value) == VALUE_OFFSET);
    assert!(offset_of!(SlotValueGc, value) == VALUE_OFFSET);
    assert!(offset_of!(SlotKeyValueGc, value) == VALUE_OFFSET);
    assert!(offset_of!(RawSlot, value) == VALUE_OFFSET);

    assert!(size_of::<SlotNoGc>() == SLOT_SIZE);
    assert!(size_of::<SlotKeyGc>() == SLOT_SIZE);
    assert!(size_of::<SlotValueGc>() == SLOT_SIZE);
    assert!(size_of::<SlotKeyValueGc>() == SLOT_SIZE);
    assert!(size_of::<RawSlot>() == SLOT_SIZE);

    assert!(align_of::<RawSlot>() == align_of::<usize>());
};

/// Ref-offset table for shapes with no collector-visible word.
const REFS_NONE: &[usize] = &[];
/// Ref-offset table for shapes tracing the key word only.
const REFS_KEY: &[usize] = &[KEY_OFFSET];
/// Ref-offset table for shapes tracing the value word only.
const REFS_VALUE: &[usize] = &[VALUE_OFFSET];
/// Ref-offset table for shapes tracing both words.
const REFS_BOTH: &[usize] = &[KEY_OFFSET, VALUE_OFFSET];

/// Which words of a slot a tracing pass must follow.
///
/// Selected once when a table is constructed and stored alongside the
/// slot array. Each case corresponds to one slot shape; the closed set
/// of four cases is the whole reason four shapes exist instead of one
/// polymorphic record.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Display, EnumIter)]
pub enum Tracking {
    /// Neither word is collector-visible ([`SlotNoGc`]).
    #[default]
    None,
    /// Only the key word is collector-visible ([`SlotKeyGc`]).
    Key,
    /// Only the value word is collector-visible ([`SlotValueGc`]).
    Value,
    /// Both words are collector-visible ([`SlotKeyValueGc`]).
    KeyValue,
}

impl Tracking {
    /// Select the tracking mode from per-word flags.
    #[inline]
    pub const fn from_flags(key_traced: bool, value_traced: bool) -> Self {
        match (key_traced, value_traced) {
            (false, false) => Tracking::None,
            (true, false) => Tracking::Key,
            (false, true) => Tracking::Value,
            (true, true) => Tracking::KeyValue,
        }
    }

    /// Whether a tracing pass must follow the key word.
    #[inline(always)]
    pub const fn key_traced(self) -> bool {
        matches!(self, Tracking::Key | Tracking::KeyValue)
    }

    /// Whether a tracing pass must follow the value word.
    #[inline(always)]
    pub const fn value_traced(self) -> bool {
        matches!(self, Tracking::Value | Tracking::KeyValue)
    }

    /// Byte offsets within a slot that hold collector-visible words.
    ///
    /// This is the tracing contract in its externally consumable form:
    /// a collector handed a slot address and the table's tracking tag
    /// follows exactly these offsets and skips every other byte. The
    /// offsets are identical across shapes that trace the same word,
    /// so a collector needs the tag and nothing else.
    #[inline]
    pub const fn ref_offsets(self) -> &'static [usize] {
        match self {
            Tracking::None => REFS_NONE,
            Tracking::Key => REFS_KEY,
            Tracking::Value => REFS_VALUE,
            Tracking::KeyValue => REFS_BOTH,
        }
    }
}

//! Construction-time configuration for [`RootTable`].
//!
//! Everything about a table that can vary is fixed before the first
//! entry goes in: the slot layout, how keys hash and compare, what
//! happens to words leaving the table, the root bookkeeping metadata,
//! and the write barrier. There is deliberately no way to change any
//! of it afterwards; a table's slots must mean the same thing for the
//! table's whole life.

use crate::table::{DropFn, EqFn, HashFn, RootTable};
use slotx::{Barrier, Handle, NoBarrier, RootSource, Tracking};

/// Default key hash: the handle's own bit pattern.
fn direct_hash(key: Handle) -> u64 {
    key.into_raw() as u64
}

/// Default key equality: bit-pattern identity.
fn direct_eq(a: Handle, b: Handle) -> bool {
    a == b
}

/// Builder for creating [`RootTable`] instances with custom settings
///
/// Immediately calling [`RootTableBuilder::build`] on a fresh builder
/// is equivalent to [`RootTable::new`] with [`Tracking::None`].
#[derive(Clone)]
pub struct RootTableBuilder<B: Barrier = NoBarrier> {
    /// Which slot words the collector must follow.
    pub(crate) tracking: Tracking,
    /// Key hash function.
    pub(crate) hash_fn: HashFn,
    /// Key equality function.
    pub(crate) eq_fn: EqFn,
    /// Notifier for keys leaving the table.
    pub(crate) key_drop: Option<DropFn>,
    /// Notifier for values leaving the table.
    pub(crate) value_drop: Option<DropFn>,
    /// Why the table's slots are collector roots.
    pub(crate) source: RootSource,
    /// Human-readable root description for diagnostics.
    pub(crate) label: &'static str,
    /// Store hook for collector-visible words.
    pub(crate) barrier: B,
}

impl RootTableBuilder<NoBarrier> {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        RootTableBuilder {
            tracking: Tracking::None,
            hash_fn: direct_hash,
            eq_fn: direct_eq,
            key_drop: None,
            value_drop: None,
            source: RootSource::External,
            label: "",
            barrier: NoBarrier,
        }
    }
}

impl Default for RootTableBuilder<NoBarrier> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Barrier> RootTableBuilder<B> {
    /// Select which slot words the collector must follow.
    pub fn tracking(mut self, tracking: Tracking) -> Self {
        self.tracking = tracking;
        self
    }

    /// Select the key hash function.
    pub fn hash_fn(mut self, hash_fn: HashFn) -> Self {
        self.hash_fn = hash_fn;
        self
    }

    /// Select the key equality function.
    ///
    /// Must agree with the hash function: keys that compare equal must
    /// hash alike.
    pub fn eq_fn(mut self, eq_fn: EqFn) -> Self {
        self.eq_fn = eq_fn;
        self
    }

    /// Have every key leaving the table passed to `notify`.
    pub fn key_drop(mut self, notify: DropFn) -> Self {
        self.key_drop = Some(notify);
        self
    }

    /// Have every value leaving the table passed to `notify`.
    pub fn value_drop(mut self, notify: DropFn) -> Self {
        self.value_drop = Some(notify);
        self
    }

    /// Record why this table's slots are collector roots.
    ///
    /// The label shows up in root accounting; keep it short and
    /// specific, like `"jit info table"`.
    pub fn root(mut self, source: RootSource, label: &'static str) -> Self {
        self.source = source;
        self.label = label;
        self
    }

    /// Attach a write barrier for collector-visible stores.
    ///
    /// Changes the builder's barrier type, so call it before the other
    /// setters or bind the result.
    pub fn barrier<B2: Barrier>(self, barrier: B2) -> RootTableBuilder<B2> {
        RootTableBuilder {
            tracking: self.tracking,
            hash_fn: self.hash_fn,
            eq_fn: self.eq_fn,
            key_drop: self.key_drop,
            value_drop: self.value_drop,
            source: self.source,
            label: self.label,
            barrier,
        }
    }

    /// Build the table with the selected options.
    pub fn build(self) -> RootTable<B> {
        RootTable::from_builder(self)
    }
}

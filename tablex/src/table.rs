//! The table itself: open addressing over uniform two-word slots.
//!
//! Every operation reads and writes slots through [`RawSlot`], never
//! through a shape-specific type; the [`Tracking`] tag chosen at
//! construction only matters when a word is stored (write barrier) or
//! when the collector walks the table ([`RootTable::mark`]). Probing
//! is linear, deletion tombstones the slot, and tombstones are
//! reclaimed wholesale by the next rehash.

use crate::builder::RootTableBuilder;
use crate::err::Error;
use crate::primes;
use crate::stats::TableStats;
use slotx::{
    trace_slot, Barrier, Handle, NoBarrier, RawSlot, RootSource, TracedRef, Tracer, Tracking,
};

/// Hash function over table keys.
///
/// Keys are opaque words, so hashing is the caller's business; the
/// default is the handle's own bit pattern, which is the right choice
/// for address and small-integer keys.
pub type HashFn = fn(Handle) -> u64;

/// Key equality function paired with [`HashFn`].
pub type EqFn = fn(Handle, Handle) -> bool;

/// Notifier invoked with each key or value word as it leaves a table.
///
/// "Leaves" means removal, replacement, and table drop. The table
/// itself never interprets the words it stores, so reclaiming whatever
/// a word designates is delegated to these hooks.
pub type DropFn = fn(Handle);

/// Occupancy (live plus tombstones) above which an insert grows the table.
const MAX_LOAD: f32 = 0.7;

/// Live fraction below which a bulk removal compacts the table.
const MIN_LOAD: f32 = 0.05;

/// Outcome of probing for one key.
enum Probe {
    /// The key is present at this slot index.
    Found(usize),
    /// The key is absent; an insert of it should use this slot index.
    Vacant(usize),
}

/// A hash table whose slots the garbage collector may need to scan.
///
/// Keys and values are single words ([`Handle`]). Whether the
/// collector traces the key word, the value word, both, or neither is
/// fixed per table by its [`Tracking`] tag; all slots of one table
/// share that layout for their whole life. Tables whose tag traces
/// anything are collector roots: the owning runtime must call
/// [`RootTable::mark`] from its marking pass, and should construct the
/// table with a [`RootSource`] and label so root accounting stays
/// legible.
///
/// All mutation, including `mark`, takes `&mut self`; wrap the table
/// in a lock before sharing it across threads.
pub struct RootTable<B: Barrier = NoBarrier> {
    /// Slot storage. Freshly allocated arrays are all zeros, which is
    /// exactly the all-empty state.
    slots: Box<[RawSlot]>,
    /// Which slot words the collector must follow.
    tracking: Tracking,
    /// Key hash function.
    hash_fn: HashFn,
    /// Key equality function.
    eq_fn: EqFn,
    /// Notifier for keys leaving the table.
    key_drop: Option<DropFn>,
    /// Notifier for values leaving the table.
    value_drop: Option<DropFn>,
    /// Live entries.
    len: usize,
    /// Live entries plus tombstones. Only this count can exhaust
    /// capacity, so it drives growth.
    occupied: usize,
    /// Why this table's slots are collector roots.
    source: RootSource,
    /// Human-readable root description for diagnostics.
    label: &'static str,
    /// Store hook for collector-visible words.
    barrier: B,
}

impl RootTable<NoBarrier> {
    /// Make a new table with the given tracking tag and defaults for
    /// everything else: bit-pattern hashing and equality, no drop
    /// notifiers, no write barrier.
    pub fn new(tracking: Tracking) -> Self {
        RootTableBuilder::new().tracking(tracking).build()
    }

    /// Start configuring a table.
    pub fn builder() -> RootTableBuilder<NoBarrier> {
        RootTableBuilder::new()
    }
}

impl<B: Barrier> RootTable<B> {
    /// Assemble a table from a finished builder.
    pub(crate) fn from_builder(builder: RootTableBuilder<B>) -> Self {
        RootTable {
            slots: bytemuck::zeroed_slice_box(primes::closest_spaced_prime(1)),
            tracking: builder.tracking,
            hash_fn: builder.hash_fn,
            eq_fn: builder.eq_fn,
            key_drop: builder.key_drop,
            value_drop: builder.value_drop,
            len: 0,
            occupied: 0,
            source: builder.source,
            label: builder.label,
            barrier: builder.barrier,
        }
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the table holds no live entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total slots currently allocated.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// The slot layout this table was constructed with.
    #[inline]
    pub fn tracking(&self) -> Tracking {
        self.tracking
    }

    /// The root source recorded at construction.
    #[inline]
    pub fn source(&self) -> RootSource {
        self.source
    }

    /// The root description recorded at construction.
    #[inline]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Add an entry, or update the value of an existing one.
    ///
    /// When the key is already present, the stored key is kept, the
    /// old value is passed to the value notifier, and only the value
    /// word is rewritten. Fails only for the reserved key patterns.
    pub fn insert(&mut self, key: Handle, value: Handle) -> Result<(), Error> {
        self.insert_impl(key, value, false)
    }

    /// Add an entry, or update both words of an existing one.
    ///
    /// Like [`RootTable::insert`], except that on update the stored
    /// key is also replaced with the caller's key (the old key goes to
    /// the key notifier). The two differ only when equality is coarser
    /// than bit identity.
    pub fn replace(&mut self, key: Handle, value: Handle) -> Result<(), Error> {
        self.insert_impl(key, value, true)
    }

    /// Look up the value stored for a key.
    pub fn lookup(&self, key: Handle) -> Option<Handle> {
        self.lookup_entry(key).map(|(_, value)| value)
    }

    /// Look up an entry, returning the stored key along with the value.
    ///
    /// The stored key matters to callers whose equality is coarser
    /// than bit identity and who need the exact word the table holds.
    pub fn lookup_entry(&self, key: Handle) -> Option<(Handle, Handle)> {
        if key.is_reserved() {
            return None;
        }
        match self.probe(key) {
            Probe::Found(index) => {
                let slot = &self.slots[index];
                Some((slot.key, slot.value))
            }
            Probe::Vacant(_) => None,
        }
    }

    /// Remove an entry, if present.
    ///
    /// The key and value words pass through their notifiers and the
    /// slot becomes a tombstone. The slot itself is reclaimed at the
    /// next rehash, not here. Returns whether an entry was removed.
    pub fn remove(&mut self, key: Handle) -> bool {
        if key.is_reserved() {
            return false;
        }
        match self.probe(key) {
            Probe::Found(index) => {
                self.clear_slot(index);
                true
            }
            Probe::Vacant(_) => false,
        }
    }

    /// Keep only the entries for which the predicate returns true.
    ///
    /// Returns the number of entries removed. If the survivors fall
    /// below the minimum load factor the table is compacted, which is
    /// also when accumulated tombstones are reclaimed.
    pub fn retain<F: FnMut(Handle, Handle) -> bool>(&mut self, mut predicate: F) -> usize {
        let mut removed = 0;
        for index in 0..self.slots.len() {
            let slot = &self.slots[index];
            if slot.is_live() && !predicate(slot.key, slot.value) {
                self.clear_slot(index);
                removed += 1;
            }
        }
        if (self.len as f32) < self.slots.len() as f32 * MIN_LOAD {
            self.rehash();
        }
        removed
    }

    /// Return the first value (in slot order) whose entry satisfies
    /// the predicate.
    pub fn find<F: FnMut(Handle, Handle) -> bool>(&self, mut predicate: F) -> Option<Handle> {
        self.iter()
            .find(|&(key, value)| predicate(key, value))
            .map(|(_, value)| value)
    }

    /// Iterate over live entries as `(key, value)` pairs.
    ///
    /// The order is slot order and carries no meaning; it changes
    /// whenever the table rehashes.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            slots: self.slots.iter(),
        }
    }

    /// Show the collector every live traced word in the table.
    ///
    /// This is the table's half of the root contract: the owning
    /// runtime calls it from the marking pass with whatever [`Tracer`]
    /// the collector provides. Tracers may rewrite the words they are
    /// shown; nothing is re-probed here, so a tracer must preserve
    /// hash/equality of the keys it rewrites (true for any collector
    /// whose moves preserve object identity).
    pub fn mark(&mut self, tracer: &mut dyn Tracer) {
        let tracking = self.tracking;
        for slot in self.slots.iter_mut() {
            trace_slot(slot, tracking, tracer);
        }
    }

    /// Take an occupancy snapshot.
    pub fn stats(&self) -> TableStats {
        TableStats {
            len: self.len,
            capacity: self.slots.len(),
            tombstones: self.occupied - self.len,
            longest_probe_run: self.longest_probe_run(),
        }
    }

    /// Position of the key, or of the slot an insert of it should use.
    ///
    /// Probing steps over tombstones (remembering the first one for
    /// insertion) and stops at the first never-used slot. Termination
    /// relies on the growth policy keeping at least one empty slot in
    /// the array at all times.
    fn probe(&self, key: Handle) -> Probe {
        let capacity = self.slots.len();
        let mut index = (self.hash_fn)(key) as usize % capacity;
        let mut first_tombstone = None;
        loop {
            let slot = &self.slots[index];
            if slot.is_empty() {
                return Probe::Vacant(first_tombstone.unwrap_or(index));
            }
            if slot.is_tombstone() {
                if first_tombstone.is_none() {
                    first_tombstone = Some(index);
                }
            } else if (self.eq_fn)(slot.key, key) {
                return Probe::Found(index);
            }
            index = (index + 1) % capacity;
        }
    }

    /// Store a key word, through the barrier when keys are traced.
    #[inline(always)]
    fn store_key(&mut self, index: usize, key: Handle) {
        if self.tracking.key_traced() {
            let field = bytemuck::cast_mut::<Handle, TracedRef>(&mut self.slots[index].key);
            self.barrier.store(field, TracedRef::from_handle(key));
        } else {
            self.slots[index].key = key;
        }
    }

    /// Store a value word, through the barrier when values are traced.
    #[inline(always)]
    fn store_value(&mut self, index: usize, value: Handle) {
        if self.tracking.value_traced() {
            let field = bytemuck::cast_mut::<Handle, TracedRef>(&mut self.slots[index].value);
            self.barrier.store(field, TracedRef::from_handle(value));
        } else {
            self.slots[index].value = value;
        }
    }

    /// Shared implementation of [`RootTable::insert`] and
    /// [`RootTable::replace`].
    fn insert_impl(&mut self, key: Handle, value: Handle, replace: bool) -> Result<(), Error> {
        if key.is_reserved() {
            return Err(Error::ReservedKey);
        }
        if self.occupied as f32 > self.slots.len() as f32 * MAX_LOAD + 1.0 {
            self.rehash();
        }
        match self.probe(key) {
            Probe::Found(index) => {
                if replace {
                    if let Some(notify) = self.key_drop {
                        notify(self.slots[index].key);
                    }
                    self.store_key(index, key);
                }
                if let Some(notify) = self.value_drop {
                    notify(self.slots[index].value);
                }
                self.store_value(index, value);
            }
            Probe::Vacant(index) => {
                let reused_tombstone = self.slots[index].is_tombstone();
                self.store_key(index, key);
                self.store_value(index, value);
                self.len += 1;
                if !reused_tombstone {
                    self.occupied += 1;
                }
            }
        }
        Ok(())
    }

    /// Logically clear one live slot: notify, tombstone the key, null
    /// the value.
    fn clear_slot(&mut self, index: usize) {
        if let Some(notify) = self.key_drop {
            notify(self.slots[index].key);
        }
        if let Some(notify) = self.value_drop {
            notify(self.slots[index].value);
        }
        self.store_key(index, Handle::TOMBSTONE);
        self.store_value(index, Handle::NULL);
        self.len -= 1;
    }

    /// Reallocate the slot array sized for the current live count and
    /// reinsert every live entry, dropping tombstones.
    fn rehash(&mut self) {
        let wanted = (self.len as f32 / MAX_LOAD) as usize;
        let new_capacity = primes::closest_spaced_prime(wanted);
        let old_slots = std::mem::replace(
            &mut self.slots,
            bytemuck::zeroed_slice_box(new_capacity),
        );
        self.occupied = self.len;
        let capacity = self.slots.len();
        for slot in old_slots.iter() {
            if !slot.is_live() {
                continue;
            }
            // The fresh array has no tombstones and no duplicate of
            // this key, so the first empty slot on the probe path is
            // the right home.
            let mut index = (self.hash_fn)(slot.key) as usize % capacity;
            while !self.slots[index].is_empty() {
                index = (index + 1) % capacity;
            }
            self.store_key(index, slot.key);
            self.store_value(index, slot.value);
        }
    }

    /// Longest run of consecutively occupied slots, wrapping around
    /// the array end.
    fn longest_probe_run(&self) -> usize {
        // Starting the scan at an empty slot makes the wrap-around run
        // come out as one run instead of two; the growth policy
        // guarantees one exists.
        let capacity = self.slots.len();
        let start = self
            .slots
            .iter()
            .position(|slot| slot.is_empty())
            .unwrap_or(0);
        let mut longest = 0;
        let mut run = 0;
        for offset in 0..capacity {
            if self.slots[(start + offset) % capacity].is_empty() {
                longest = longest.max(run);
                run = 0;
            } else {
                run += 1;
            }
        }
        longest.max(run)
    }
}

impl<B: Barrier> Drop for RootTable<B> {
    fn drop(&mut self) {
        if self.key_drop.is_none() && self.value_drop.is_none() {
            return;
        }
        for slot in self.slots.iter() {
            if !slot.is_live() {
                continue;
            }
            if let Some(notify) = self.key_drop {
                notify(slot.key);
            }
            if let Some(notify) = self.value_drop {
                notify(slot.value);
            }
        }
    }
}

impl<B: Barrier> std::fmt::Debug for RootTable<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RootTable")
            .field("tracking", &self.tracking)
            .field("len", &self.len)
            .field("capacity", &self.slots.len())
            .field("source", &self.source)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Iterator over a table's live entries in slot order.
pub struct Iter<'a> {
    /// Remaining slots to scan.
    slots: std::slice::Iter<'a, RawSlot>,
}

impl Iterator for Iter<'_> {
    type Item = (Handle, Handle);

    fn next(&mut self) -> Option<(Handle, Handle)> {
        self.slots
            .find(|slot| slot.is_live())
            .map(|slot| (slot.key, slot.value))
    }
}

impl<'a, B: Barrier> IntoIterator for &'a RootTable<B> {
    type Item = (Handle, Handle);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

//! The seams between a table and its collector: tracing and barriers.
//!
//! A table never talks to a concrete collector. At marking time the
//! collector walks the table's slots with [`trace_slot`], supplying a
//! [`Tracer`] that receives every live collector-visible word; at
//! mutation time the table routes every store into a collector-visible
//! word through a [`Barrier`], so generational collectors can record
//! cross-generation pointers. Runtimes without either need plug in
//! [`NoBarrier`] and whatever trivial tracer suits their tests.

use crate::handle::TracedRef;
use crate::slot::{RawSlot, Tracking};

/// Collector callback that follows one collector-visible word.
pub trait Tracer {
    /// Follow one live reference found in a slot.
    ///
    /// The word is handed out by mutable reference: a moving collector
    /// rewrites it in place after relocating the referent, and the
    /// table will keep serving the updated word afterwards.
    fn visit(&mut self, reference: &mut TracedRef);
}

/// Store hook for collector-visible words.
///
/// Every store into a traced word goes through this trait, including
/// stores of the reserved marker patterns when an entry is cleared.
/// Opaque words are stored directly and never pass through.
pub trait Barrier {
    /// Store `value` into `field`, recording whatever bookkeeping the
    /// collector requires for a pointer store.
    fn store(&self, field: &mut TracedRef, value: TracedRef);
}

/// Barrier for collectors with no store bookkeeping: a plain store.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct NoBarrier;

impl Barrier for NoBarrier {
    #[inline(always)]
    fn store(&self, field: &mut TracedRef, value: TracedRef) {
        *field = value;
    }
}

/// Show a tracer every live collector-visible word of one slot.
///
/// The shape tag is supplied externally, per the contract: slots carry
/// no self-description. Words whose offset is not in
/// [`Tracking::ref_offsets`] are skipped no matter what bit pattern
/// they hold, and traced words holding a reserved marker pattern
/// (empty or tombstone state, or a cleared value) denote no reference
/// and are skipped as well. A tracer therefore only ever sees words it
/// is safe to follow: a [`Tracking::None`] slot yields zero visits, a
/// fully live [`Tracking::KeyValue`] slot exactly two.
#[inline]
pub fn trace_slot(slot: &mut RawSlot, tracking: Tracking, tracer: &mut dyn Tracer) {
    if tracking.key_traced() && !slot.key.is_reserved() {
        tracer.visit(bytemuck::cast_mut(&mut slot.key));
    }
    if tracking.value_traced() && !slot.value.is_reserved() {
        tracer.visit(bytemuck::cast_mut(&mut slot.value));
    }
}

#![warn(missing_docs)]
#![warn(noop_method_call)]
#![warn(unreachable_pub)]
#![warn(clippy::all)]
#![deny(clippy::cast_lossless)]
#![deny(clippy::checked_conversions)]
#![deny(clippy::debug_assert_with_mut_call)]
#![deny(clippy::implicit_clone)]
#![warn(clippy::manual_ok_or)]
#![deny(clippy::missing_docs_in_private_items)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::option_option)]
#![deny(clippy::print_stderr)]
#![deny(clippy::print_stdout)]
#![warn(clippy::rc_buffer)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![deny(clippy::unnecessary_wraps)]
#![warn(clippy::unseparated_literal_suffix)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::mod_module_files)]

//! Fixed key/value slot layouts for collector-aware tables
//!
//! A runtime hash table stores each entry in a two-word slot: one key
//! word and one value word. Depending on what the table holds, either
//! word may be a reference the garbage collector has to scan, or an
//! opaque quantity (an address the collector does not manage, or a
//! plain integer) it must never follow.
//!
//! This crate defines the four possible slot shapes ([`SlotNoGc`],
//! [`SlotKeyGc`], [`SlotValueGc`], [`SlotKeyValueGc`]), the two word
//! types they are built from ([`Handle`] and [`TracedRef`]), and the
//! [`Tracking`] selector that picks a shape at table construction time.
//! All four shapes keep the key word at offset zero and the value word
//! one pointer behind it, so table code reads slots through the uniform
//! [`RawSlot`] view and only the collector ever consults the shape.
//!
//! The collector side of the contract is [`Tracking::ref_offsets`],
//! which enumerates the collector-visible offsets of a slot, and
//! [`trace_slot`], which walks one slot and shows each live reference
//! to a [`Tracer`]. Mutators attach through [`Barrier`], invoked for
//! every store into a collector-visible word.

mod handle;
mod root;
mod slot;
mod trace;

pub use handle::{Handle, TracedRef};
pub use root::RootSource;
pub use slot::{
    RawSlot, SlotKeyGc, SlotKeyValueGc, SlotNoGc, SlotValueGc, Tracking, KEY_OFFSET, SLOT_SIZE,
    VALUE_OFFSET,
};
pub use trace::{trace_slot, Barrier, NoBarrier, Tracer};

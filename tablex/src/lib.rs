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

//! Collector-aware open-addressing hash table with fixed slot layouts
//!
//! A [`RootTable`] maps word-sized keys to word-sized values in a flat
//! array of two-word slots. What makes it different from an ordinary
//! hash table is that either word of a slot may be a reference the
//! garbage collector has to scan: which words are collector-visible is
//! chosen per table at construction, via [`Tracking`], and the
//! collector walks the table through [`RootTable::mark`] without any
//! per-entry metadata. The slot shapes themselves, and the
//! [`Tracer`]/[`Barrier`] seams a collector attaches through, live in
//! the [`slotx`] crate and are re-exported here.
//!
//! ```
//! use tablex::{Handle, RootTable, Tracking};
//!
//! let mut table = RootTable::new(Tracking::KeyValue);
//! let key = Handle::from_raw(0x7f00_1000);
//! let value = Handle::from_raw(0x7f00_2000);
//! table.insert(key, value)?;
//! assert_eq!(table.lookup(key), Some(value));
//! assert!(table.remove(key));
//! # Ok::<(), tablex::Error>(())
//! ```
//!
//! Everything that can vary per table is fixed up front with
//! [`RootTableBuilder`]: hash and equality over the opaque key words,
//! notifiers for words leaving the table, root accounting metadata,
//! and the write barrier. Deletion tombstones the slot and reclaims it
//! at the next rehash; capacities follow a spaced-prime schedule.

mod builder;
mod err;
mod primes;
mod stats;
mod table;

pub use slotx;

pub use builder::RootTableBuilder;
pub use err::Error;
pub use slotx::{
    Barrier, Handle, NoBarrier, RootSource, TracedRef, Tracer, Tracking,
};
pub use stats::TableStats;
pub use table::{DropFn, EqFn, HashFn, Iter, RootTable};

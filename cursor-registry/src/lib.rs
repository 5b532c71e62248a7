#![no_std]
#![forbid(
    clippy::missing_safety_doc,
    clippy::undocumented_unsafe_blocks,
    unsafe_op_in_unsafe_fn,
    missing_docs,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]

//! # cursor-registry
//!
//! The bookkeeping half of a tracked vector: a [`CursorRegistry`] remembers where every
//! live cursor into one contiguous array points, and moves those positions around whenever
//! the array changes size.
//!
//! Cursors are tracked by position, never by address. Each one is a [`CursorState`], either
//! [`AtItem(index)`](CursorState::AtItem) or [`AtEnd`](CursorState::AtEnd), stored in a slot
//! of the registry and named by a [`CursorKey`].
//!
//! ```
//! use cursor_registry::{CursorRegistry, CursorState, OwnerId};
//!
//! // an array of 5 elements, with a cursor on the element at index 2
//! let mut registry = CursorRegistry::<6>::new(OwnerId::new(), 5);
//! let key = registry.register(CursorState::AtItem(2));
//!
//! // two elements were inserted before index 1
//! registry.set_len(7);
//! registry.broadcast_shift(1, 5, 2);
//! assert_eq!(registry.state(key), CursorState::AtItem(4));
//!
//! // and then the element the cursor was on was removed
//! registry.set_len(6);
//! registry.broadcast_invalidate(4, 4);
//! registry.broadcast_shift(5, 7, -1);
//! assert_eq!(registry.state(key), CursorState::AtEnd);
//! ```
//!
//! ## Storage tiers
//!
//! While at most `INLINE` cursors are live, slots live in a small inline array and are found
//! by a linear scan. The first time one more cursor is registered, every slot is moved into a
//! hash map, and the registry stays in the map tier for the rest of its life, even if the
//! number of live cursors drops again.

extern crate std;

mod error;
mod key;
pub mod owner;
pub mod registry;
mod state;
mod tier;

pub use error::{CursorError, ResultExt};
pub use key::CursorKey;
pub use owner::OwnerId;
pub use registry::CursorRegistry;
pub use state::CursorState;

/// The number of cursors a registry keeps inline before moving to a hash map
pub const DEFAULT_INLINE_CURSORS: usize = 6;

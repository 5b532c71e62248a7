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

//! # tracked-vec
//!
//! [`TrackedVec`] is a growable contiguous array whose [`Cursor`]s keep denoting the same
//! element while the array is mutated.
//!
//! ```
//! use tracked_vec::TrackedVec;
//!
//! let mut vec: TrackedVec<i32> = TrackedVec::from(vec![10, 20, 30, 40, 50]);
//! let cursor = vec.cursor_at(2);
//! assert_eq!(*cursor.item(&vec), 30);
//!
//! // inserting before the cursor moves it along with its element
//! vec.insert_from_slice(1, &[11, 12]);
//! assert_eq!(cursor.index(), 4);
//! assert_eq!(*cursor.item(&vec), 30);
//!
//! // removing its element moves it to the end marker
//! vec.erase(3..5);
//! assert!(cursor.points_to_end_marker());
//! assert_eq!(cursor.index(), vec.len());
//! ```
//!
//! ## Tracked and untracked cursors
//!
//! A [`Cursor`] owns a slot in the array's [`CursorRegistry`](cursor_registry::CursorRegistry).
//! Every size-changing method of [`TrackedVec`] first mutates the elements, then updates every
//! registered cursor:
//! * cursors after an insertion point move forward with their element
//! * cursors after a removed range move back with their element
//! * cursors on a removed element move to the end marker
//! * cursors at the end marker stay at the end marker
//!
//! Changing only the capacity ([`TrackedVec::reserve`], [`TrackedVec::shrink_to_fit`], ...)
//! doesn't affect any cursor, since cursors hold positions, not addresses.
//!
//! An [`IndexCursor`] is the cheap alternative: a plain position plus the array's
//! [`OwnerId`]. It isn't registered, so the array never updates it, and the holder has to
//! recompute it after every mutation.
//!
//! ## Ownership checks
//!
//! Cursors remember which array they came from. Comparing cursors from different arrays, or
//! using a cursor with an array other than its own, is an error
//! ([`CursorError::NotOwned`]). Every fallible operation comes in a `try_*` form that returns
//! the [`CursorError`], and a plain form that panics with it.
//!
//! ## Dropping the array first
//!
//! If a [`TrackedVec`] is dropped (or turned back into a [`Vec`](alloc::vec::Vec)) while
//! cursors into it are still alive, those cursors are all moved to the end marker of an empty
//! array. They can still be queried and dropped, but every access through them fails.

extern crate alloc;

mod cursor;
mod index_cursor;
mod vec;

pub use cursor::Cursor;
pub use cursor_registry::{
    CursorError, CursorKey, CursorState, OwnerId, ResultExt, DEFAULT_INLINE_CURSORS,
};
pub use index_cursor::IndexCursor;
pub use vec::TrackedVec;

/// Convert a count of elements into a signed offset
#[inline]
pub(crate) fn signed(count: usize) -> isize {
    match isize::try_from(count) {
        Ok(count) => count,
        Err(_) => length_overflow(count),
    }
}

#[cold]
#[inline(never)]
fn length_overflow(count: usize) -> ! {
    panic!("Tried to move a cursor by more than isize::MAX positions, count: {count}")
}

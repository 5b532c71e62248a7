//! Identities for backing stores
//!
//! Every cursor remembers the [`OwnerId`] of the array it was created from, so that using
//! it with any other array can be detected and rejected.

use core::{
    num::NonZeroU64,
    sync::atomic::{AtomicU64, Ordering},
};

static NEXT_OWNER: AtomicU64 = AtomicU64::new(0);

/// The identity of one backing store
///
/// Every value yielded by [`OwnerId::new`] is distinct from all values yielded before it,
/// ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OwnerId(NonZeroU64);

impl OwnerId {
    /// Create a new [`OwnerId`]
    ///
    /// # Panics
    ///
    /// If all `u64` ids have been handed out
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self::new_from(&NEXT_OWNER)
    }

    /// Try to create a new [`OwnerId`], returns [`None`] if all ids have been handed out
    pub fn try_new() -> Option<Self> {
        Self::next_from(&NEXT_OWNER)
    }

    fn new_from(counter: &AtomicU64) -> Self {
        match Self::next_from(counter) {
            Some(id) => id,
            None => owners_exhausted(),
        }
    }

    fn next_from(counter: &AtomicU64) -> Option<Self> {
        let prev = counter
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |x| x.checked_add(1))
            .ok()?;
        NonZeroU64::new(prev + 1).map(Self)
    }

    /// Get the raw value of this id
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

#[cold]
#[inline(never)]
fn owners_exhausted() -> ! {
    panic!("Tried to create a new OwnerId from an exhausted counter")
}

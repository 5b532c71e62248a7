use core::cmp::Ordering;

use cursor_registry::{CursorError, CursorState, OwnerId, ResultExt};

use crate::TrackedVec;

/// An untracked position in a [`TrackedVec`]
///
/// This is just an index paired with the array's [`OwnerId`]. It isn't registered with the
/// array, so it costs nothing to create or copy, but mutations of the array don't update it.
/// After any size-changing mutation the holder must recompute it, a stale index is only
/// caught if it ends up out of bounds.
///
/// Every method that needs the array's length takes the array, and fails with
/// [`CursorError::NotOwned`] if it's the wrong one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexCursor {
    owner: OwnerId,
    index: usize,
}

impl IndexCursor {
    pub(crate) const fn new(owner: OwnerId, index: usize) -> Self {
        Self { owner, index }
    }

    /// A cursor at the first element of `vec`, or its end marker if it's empty
    pub fn front<T, const INLINE: usize>(vec: &TrackedVec<T, INLINE>) -> Self {
        Self::new(vec.owner(), 0)
    }

    /// A cursor at the end marker of `vec`
    pub fn end<T, const INLINE: usize>(vec: &TrackedVec<T, INLINE>) -> Self {
        Self::new(vec.owner(), vec.len())
    }

    /// A cursor at `index` in `vec`, `vec.len()` gives the end marker
    pub fn try_at<T, const INLINE: usize>(
        vec: &TrackedVec<T, INLINE>,
        index: usize,
    ) -> Result<Self, CursorError> {
        let len = vec.len();
        if index > len {
            return Err(CursorError::InvalidRange {
                start: index,
                end: index,
                len,
            });
        }
        Ok(Self::new(vec.owner(), index))
    }

    /// A cursor at `index` in `vec`, `vec.len()` gives the end marker
    ///
    /// # Panics
    ///
    /// If `index > vec.len()`
    #[track_caller]
    pub fn at<T, const INLINE: usize>(vec: &TrackedVec<T, INLINE>, index: usize) -> Self {
        Self::try_at(vec, index).or_handle()
    }

    /// The identity of the array this cursor was created for
    #[inline]
    pub const fn owner(self) -> OwnerId {
        self.owner
    }

    /// The stored position, which may be stale
    #[inline]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Check this cursor against `vec`, yielding its state
    fn state_in<T, const INLINE: usize>(
        self,
        vec: &TrackedVec<T, INLINE>,
    ) -> Result<CursorState, CursorError> {
        vec.check_owner(self.owner)?;
        let len = vec.len();
        if self.index > len {
            return Err(CursorError::OutOfRange {
                index: self.index,
                offset: 0,
                len,
            });
        }
        Ok(CursorState::at(self.index, len))
    }

    /// Returns true if this cursor denotes an element of `vec`
    pub fn try_points_to_an_item<T, const INLINE: usize>(
        self,
        vec: &TrackedVec<T, INLINE>,
    ) -> Result<bool, CursorError> {
        vec.check_owner(self.owner)?;
        Ok(self.index < vec.len())
    }

    /// Returns true if this cursor denotes an element of `vec`
    ///
    /// # Panics
    ///
    /// If `vec` isn't the array this cursor was created for
    #[track_caller]
    pub fn points_to_an_item<T, const INLINE: usize>(self, vec: &TrackedVec<T, INLINE>) -> bool {
        self.try_points_to_an_item(vec).or_handle()
    }

    /// Returns true if this cursor is exactly at the end marker of `vec`
    ///
    /// # Panics
    ///
    /// If `vec` isn't the array this cursor was created for
    #[track_caller]
    pub fn points_to_end_marker<T, const INLINE: usize>(self, vec: &TrackedVec<T, INLINE>) -> bool {
        vec.check_owner(self.owner).or_handle();
        self.index == vec.len()
    }

    /// Move forward by `offset` positions (backward if negative) in `vec`
    pub fn try_advance_by<T, const INLINE: usize>(
        &mut self,
        vec: &TrackedVec<T, INLINE>,
        offset: isize,
    ) -> Result<(), CursorError> {
        let len = vec.len();
        let state = self.state_in(vec)?.advance_by(offset, len)?;
        self.index = state.index(len);
        Ok(())
    }

    /// Move backward by `offset` positions (forward if negative) in `vec`
    pub fn try_regress_by<T, const INLINE: usize>(
        &mut self,
        vec: &TrackedVec<T, INLINE>,
        offset: isize,
    ) -> Result<(), CursorError> {
        let len = vec.len();
        let state = self.state_in(vec)?.regress_by(offset, len)?;
        self.index = state.index(len);
        Ok(())
    }

    /// Move forward by `offset` positions (backward if negative) in `vec`
    ///
    /// # Panics
    ///
    /// If `vec` isn't the array this cursor was created for, or the target is out of range
    #[track_caller]
    pub fn advance_by<T, const INLINE: usize>(&mut self, vec: &TrackedVec<T, INLINE>, offset: isize) {
        self.try_advance_by(vec, offset).or_handle()
    }

    /// Move backward by `offset` positions (forward if negative) in `vec`
    ///
    /// # Panics
    ///
    /// If `vec` isn't the array this cursor was created for, or the target is out of range
    #[track_caller]
    pub fn regress_by<T, const INLINE: usize>(&mut self, vec: &TrackedVec<T, INLINE>, offset: isize) {
        self.try_regress_by(vec, offset).or_handle()
    }

    /// Move to the next position in `vec`
    #[track_caller]
    pub fn advance<T, const INLINE: usize>(&mut self, vec: &TrackedVec<T, INLINE>) {
        self.advance_by(vec, 1)
    }

    /// Move to the previous position in `vec`
    #[track_caller]
    pub fn regress<T, const INLINE: usize>(&mut self, vec: &TrackedVec<T, INLINE>) {
        self.regress_by(vec, 1)
    }

    /// Move to the first position
    pub fn set_to_beginning(&mut self) {
        self.index = 0;
    }

    /// Move to the end marker of `vec`
    ///
    /// # Panics
    ///
    /// If `vec` isn't the array this cursor was created for
    #[track_caller]
    pub fn set_to_end<T, const INLINE: usize>(&mut self, vec: &TrackedVec<T, INLINE>) {
        vec.check_owner(self.owner).or_handle();
        self.index = vec.len();
    }

    /// Get the element this cursor points to in `vec`
    pub fn try_item<T, const INLINE: usize>(self, vec: &TrackedVec<T, INLINE>) -> Result<&T, CursorError> {
        vec.check_owner(self.owner)?;
        vec.get(self.index)
            .ok_or(CursorError::NotAnItem { len: vec.len() })
    }

    /// Get the element this cursor points to in `vec`
    ///
    /// # Panics
    ///
    /// If `vec` isn't the array this cursor was created for, or the index isn't in bounds
    #[track_caller]
    pub fn item<T, const INLINE: usize>(self, vec: &TrackedVec<T, INLINE>) -> &T {
        self.try_item(vec).or_handle()
    }

    /// Get a mutable reference to the element this cursor points to in `vec`
    pub fn try_item_mut<T, const INLINE: usize>(
        self,
        vec: &mut TrackedVec<T, INLINE>,
    ) -> Result<&mut T, CursorError> {
        vec.check_owner(self.owner)?;
        let len = vec.len();
        vec.get_mut(self.index)
            .ok_or(CursorError::NotAnItem { len })
    }

    /// Get a mutable reference to the element this cursor points to in `vec`
    ///
    /// # Panics
    ///
    /// If `vec` isn't the array this cursor was created for, or the index isn't in bounds
    #[track_caller]
    pub fn item_mut<T, const INLINE: usize>(self, vec: &mut TrackedVec<T, INLINE>) -> &mut T {
        self.try_item_mut(vec).or_handle()
    }

    /// Compare the positions of two cursors created for the same array
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, CursorError> {
        if self.owner != other.owner {
            return Err(CursorError::NotOwned);
        }

        Ok(self.index.cmp(&other.index))
    }
}

impl PartialOrd for IndexCursor {
    /// Cursors into different arrays are unordered
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

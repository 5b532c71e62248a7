use core::{cell::RefCell, cmp::Ordering};

use alloc::rc::Rc;

use cursor_registry::{
    CursorError, CursorKey, CursorRegistry, CursorState, OwnerId, ResultExt,
    DEFAULT_INLINE_CURSORS,
};

use crate::{signed, IndexCursor, TrackedVec};

/// A position in a [`TrackedVec`] that follows its element through mutations
///
/// Created by [`TrackedVec::cursor_front`], [`TrackedVec::cursor_end`],
/// [`TrackedVec::cursor_at`] or [`TrackedVec::track`].
///
/// Each cursor owns one slot in its array's registry. Cloning a cursor registers a new slot
/// with the same position, so the clone moves independently of the original. Dropping a
/// cursor releases its slot.
///
/// Cursors are ordered by position, the end marker is after every item. Comparing cursors
/// from two different arrays panics, use [`Cursor::try_cmp`] to get an error instead.
pub struct Cursor<const INLINE: usize = DEFAULT_INLINE_CURSORS> {
    registry: Rc<RefCell<CursorRegistry<INLINE>>>,
    owner: OwnerId,
    key: CursorKey,
}

impl<const INLINE: usize> Cursor<INLINE> {
    #[track_caller]
    pub(crate) fn register(
        registry: &Rc<RefCell<CursorRegistry<INLINE>>>,
        owner: OwnerId,
        state: CursorState,
    ) -> Self {
        let key = registry.borrow_mut().register(state);
        Self {
            registry: Rc::clone(registry),
            owner,
            key,
        }
    }

    /// The identity of the array this cursor points into
    #[inline]
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// The registry slot this cursor owns
    #[inline]
    pub fn key(&self) -> CursorKey {
        self.key
    }

    /// Where this cursor points
    pub fn state(&self) -> CursorState {
        self.registry.borrow().state(self.key)
    }

    /// The position of this cursor, the end marker is at the array's length
    pub fn index(&self) -> usize {
        self.registry.borrow().index(self.key)
    }

    /// Returns true if this cursor denotes an element
    pub fn points_to_an_item(&self) -> bool {
        self.state().points_to_an_item()
    }

    /// Returns true if this cursor is at the end marker
    pub fn points_to_end_marker(&self) -> bool {
        self.state().points_to_end_marker()
    }

    /// Move forward by `offset` positions (backward if negative)
    ///
    /// The cursor is left where it was if the target is out of range
    pub fn try_advance_by(&mut self, offset: isize) -> Result<(), CursorError> {
        self.registry
            .borrow_mut()
            .try_advance_by(self.key, offset)
            .map(drop)
    }

    /// Move backward by `offset` positions (forward if negative)
    pub fn try_regress_by(&mut self, offset: isize) -> Result<(), CursorError> {
        let mut registry = self.registry.borrow_mut();
        let len = registry.len();
        let state = registry.state(self.key).regress_by(offset, len)?;
        registry.set_state(self.key, state);
        Ok(())
    }

    /// Move forward by `offset` positions (backward if negative)
    ///
    /// # Panics
    ///
    /// If the target is before the first element or after the end marker
    #[track_caller]
    pub fn advance_by(&mut self, offset: isize) {
        self.try_advance_by(offset).or_handle()
    }

    /// Move backward by `offset` positions (forward if negative)
    ///
    /// # Panics
    ///
    /// If the target is before the first element or after the end marker
    #[track_caller]
    pub fn regress_by(&mut self, offset: isize) {
        self.try_regress_by(offset).or_handle()
    }

    /// Move to the next position, from the last element this is the end marker
    pub fn try_advance(&mut self) -> Result<(), CursorError> {
        self.try_advance_by(1)
    }

    /// Move to the previous position, from the end marker this is the last element
    pub fn try_regress(&mut self) -> Result<(), CursorError> {
        self.try_regress_by(1)
    }

    /// Move to the next position, from the last element this is the end marker
    ///
    /// # Panics
    ///
    /// If the cursor is at the end marker
    #[track_caller]
    pub fn advance(&mut self) {
        self.advance_by(1)
    }

    /// Move to the previous position, from the end marker this is the last element
    ///
    /// # Panics
    ///
    /// If the cursor is at the first element, or at the end marker of an empty array
    #[track_caller]
    pub fn regress(&mut self) {
        self.regress_by(1)
    }

    /// see [`Cursor::advance`]
    #[allow(clippy::should_implement_trait)]
    #[track_caller]
    pub fn next(&mut self) {
        self.advance()
    }

    /// see [`Cursor::regress`]
    #[track_caller]
    pub fn previous(&mut self) {
        self.regress()
    }

    /// Move to the first element, or the end marker if the array is empty
    pub fn set_to_beginning(&mut self) {
        let mut registry = self.registry.borrow_mut();
        let state = CursorState::beginning(registry.len());
        registry.set_state(self.key, state);
    }

    /// Move to the end marker
    pub fn set_to_end(&mut self) {
        self.registry
            .borrow_mut()
            .set_state(self.key, CursorState::AtEnd);
    }

    /// Get the element this cursor points to
    pub fn try_item<'a, T>(&self, vec: &'a TrackedVec<T, INLINE>) -> Result<&'a T, CursorError> {
        vec.try_item(self)
    }

    /// Get the element this cursor points to
    ///
    /// # Panics
    ///
    /// If `vec` isn't the array this cursor points into, or the cursor is at the end marker
    #[track_caller]
    pub fn item<'a, T>(&self, vec: &'a TrackedVec<T, INLINE>) -> &'a T {
        vec.item(self)
    }

    /// Get a mutable reference to the element this cursor points to
    pub fn try_item_mut<'a, T>(
        &self,
        vec: &'a mut TrackedVec<T, INLINE>,
    ) -> Result<&'a mut T, CursorError> {
        vec.try_item_mut(self)
    }

    /// Get a mutable reference to the element this cursor points to
    ///
    /// # Panics
    ///
    /// If `vec` isn't the array this cursor points into, or the cursor is at the end marker
    #[track_caller]
    pub fn item_mut<'a, T>(&self, vec: &'a mut TrackedVec<T, INLINE>) -> &'a mut T {
        vec.item_mut(self)
    }

    /// Compare the positions of two cursors into the same array
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, CursorError> {
        if self.owner != other.owner {
            return Err(CursorError::NotOwned);
        }

        Ok(self.index().cmp(&other.index()))
    }

    /// The number of positions from `other` to `self`
    pub fn try_offset_from(&self, other: &Self) -> Result<isize, CursorError> {
        if self.owner != other.owner {
            return Err(CursorError::NotOwned);
        }

        Ok(signed(self.index()) - signed(other.index()))
    }

    /// The number of positions from `other` to `self`
    ///
    /// # Panics
    ///
    /// If the cursors point into different arrays
    #[track_caller]
    pub fn offset_from(&self, other: &Self) -> isize {
        self.try_offset_from(other).or_handle()
    }

    /// A snapshot of this cursor's position which won't be updated by mutations
    pub fn untracked(&self) -> IndexCursor {
        IndexCursor::new(self.owner, self.index())
    }
}

impl<const INLINE: usize> Clone for Cursor<INLINE> {
    /// Registers a new slot at the same position
    fn clone(&self) -> Self {
        let state = self.state();
        Self::register(&self.registry, self.owner, state)
    }
}

impl<const INLINE: usize> Drop for Cursor<INLINE> {
    fn drop(&mut self) {
        match self.registry.try_borrow_mut() {
            Ok(mut registry) => {
                let released = registry.try_unregister(self.key);
                debug_assert!(released.is_ok(), "{:?} was released twice", self.key);
            }
            Err(_) => {
                if cfg!(debug_assertions) {
                    panic!("{:?} was dropped while its registry was borrowed", self.key)
                }
            }
        }
    }
}

impl<const INLINE: usize> PartialEq for Cursor<INLINE> {
    #[track_caller]
    fn eq(&self, other: &Self) -> bool {
        self.try_cmp(other).or_handle() == Ordering::Equal
    }
}

impl<const INLINE: usize> Eq for Cursor<INLINE> {}

impl<const INLINE: usize> PartialOrd for Cursor<INLINE> {
    #[track_caller]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const INLINE: usize> Ord for Cursor<INLINE> {
    #[track_caller]
    fn cmp(&self, other: &Self) -> Ordering {
        self.try_cmp(other).or_handle()
    }
}

impl<const INLINE: usize> core::fmt::Debug for Cursor<INLINE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut debug = f.debug_struct("Cursor");
        debug.field("owner", &self.owner).field("key", &self.key);
        match self.registry.try_borrow() {
            Ok(registry) => debug.field("state", &registry.try_state(self.key)),
            Err(_) => debug.field("state", &"<borrowed>"),
        };
        debug.finish()
    }
}

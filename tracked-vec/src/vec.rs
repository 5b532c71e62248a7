use core::{
    cell::RefCell,
    ops::{self, Bound, Range, RangeBounds},
};

use alloc::{collections::TryReserveError, rc::Rc, vec::Vec};

use cursor_registry::{
    CursorError, CursorRegistry, CursorState, OwnerId, ResultExt, DEFAULT_INLINE_CURSORS,
};

use crate::{signed, Cursor, IndexCursor};

/// A growable array that keeps its [`Cursor`]s pointing at the same elements
///
/// see the [crate docs](crate) for how cursors are updated
pub struct TrackedVec<T, const INLINE: usize = DEFAULT_INLINE_CURSORS> {
    data: Vec<T>,
    owner: OwnerId,
    registry: Rc<RefCell<CursorRegistry<INLINE>>>,
}

impl<T> TrackedVec<T> {
    /// Create an empty [`TrackedVec`]
    #[inline]
    pub fn new() -> Self {
        Self::from_vec(Vec::new())
    }

    /// Create an empty [`TrackedVec`] with space for at least `capacity` elements
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_vec(Vec::with_capacity(capacity))
    }
}

impl<T, const INLINE: usize> TrackedVec<T, INLINE> {
    /// Create a [`TrackedVec`] from the elements of `data`
    pub fn from_vec(data: Vec<T>) -> Self {
        let owner = OwnerId::new();
        let registry = CursorRegistry::new(owner, data.len());
        Self {
            data,
            owner,
            registry: Rc::new(RefCell::new(registry)),
        }
    }

    /// Extract the elements, moving all live cursors to the end marker
    pub fn into_vec(mut self) -> Vec<T> {
        core::mem::take(&mut self.data)
    }

    /// The identity of this array, shared by all of its cursors
    #[inline]
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// The number of live tracked cursors into this array
    pub fn live_cursors(&self) -> usize {
        self.registry.borrow().live()
    }

    /// Returns true once more than `INLINE` cursors have been alive at the same time
    pub fn cursors_promoted(&self) -> bool {
        self.registry.borrow().is_promoted()
    }

    /// see [`Vec::as_slice`]
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// see [`Vec::as_mut_slice`]
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// see [`Vec::len`]
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// see [`Vec::is_empty`]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// see [`Vec::capacity`]
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// see [`Vec::reserve`]
    pub fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional)
    }

    /// see [`Vec::reserve_exact`]
    pub fn reserve_exact(&mut self, additional: usize) {
        self.data.reserve_exact(additional)
    }

    /// see [`Vec::try_reserve`]
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.data.try_reserve(additional)
    }

    /// see [`Vec::try_reserve_exact`]
    pub fn try_reserve_exact(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.data.try_reserve_exact(additional)
    }

    /// see [`Vec::shrink_to_fit`]
    pub fn shrink_to_fit(&mut self) {
        self.data.shrink_to_fit()
    }

    /// see [`Vec::shrink_to`]
    pub fn shrink_to(&mut self, min_capacity: usize) {
        self.data.shrink_to(min_capacity)
    }

    pub(crate) fn check_owner(&self, owner: OwnerId) -> Result<(), CursorError> {
        if self.owner == owner {
            Ok(())
        } else {
            Err(CursorError::NotOwned)
        }
    }

    fn check_position(&self, index: usize) -> Result<(), CursorError> {
        let len = self.len();
        if index <= len {
            Ok(())
        } else {
            Err(CursorError::InvalidRange {
                start: index,
                end: index,
                len,
            })
        }
    }

    fn check_element(&self, index: usize) -> Result<(), CursorError> {
        let len = self.len();
        if index < len {
            Ok(())
        } else {
            Err(CursorError::InvalidRange {
                start: index,
                end: index.saturating_add(1),
                len,
            })
        }
    }

    fn resolve_range(&self, range: impl RangeBounds<usize>) -> Result<Range<usize>, CursorError> {
        let len = self.len();
        let start = match range.start_bound() {
            Bound::Included(&start) => start,
            Bound::Excluded(&start) => start.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.saturating_add(1),
            Bound::Excluded(&end) => end,
            Bound::Unbounded => len,
        };

        if start > end || end > len {
            Err(CursorError::InvalidRange { start, end, len })
        } else {
            Ok(start..end)
        }
    }

    fn notify_inserted(&self, at: usize, count: usize, old_len: usize) {
        settle_inserted(&self.registry, at, count, old_len)
    }

    fn notify_removed(&self, at: usize, count: usize, old_len: usize) {
        settle_removed(&self.registry, at, count, old_len)
    }

    /// Run `grow`, which may only add elements at `at`
    ///
    /// The cursors are shifted by however many elements were added, even if `grow` panics
    /// partway through.
    fn grow_at<R>(&mut self, at: usize, grow: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let old_len = self.data.len();
        let registry = &self.registry;
        let mut data = scopeguard::guard(&mut self.data, |data| {
            settle_inserted(registry, at, data.len() - old_len, old_len)
        });
        grow(&mut data)
    }

    /// Run `shrink`, which may only remove elements starting at `at`
    ///
    /// The cursors are updated for however many elements were removed, even if `shrink` panics
    /// partway through (for example in the destructor of an element).
    fn shrink_at<R>(&mut self, at: usize, shrink: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let old_len = self.data.len();
        let registry = &self.registry;
        let mut data = scopeguard::guard(&mut self.data, |data| {
            settle_removed(registry, at, old_len - data.len(), old_len)
        });
        shrink(&mut data)
    }

    /// see [`Vec::push`]
    pub fn push(&mut self, value: T) {
        let old_len = self.len();
        self.data.push(value);
        self.notify_inserted(old_len, 1, old_len);
    }

    /// see [`Vec::pop`]
    ///
    /// Cursors at the last element move to the end marker
    pub fn pop(&mut self) -> Option<T> {
        let value = self.data.pop()?;
        let old_len = self.len() + 1;
        self.notify_removed(old_len - 1, 1, old_len);
        Some(value)
    }

    /// Insert `value` before the element at `index`
    pub fn try_insert(&mut self, index: usize, value: T) -> Result<(), CursorError> {
        self.check_position(index)?;
        let old_len = self.len();
        self.data.insert(index, value);
        self.notify_inserted(index, 1, old_len);
        Ok(())
    }

    /// Insert `value` before the element at `index`
    ///
    /// # Panics
    ///
    /// If `index > len`
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: T) {
        self.try_insert(index, value).or_handle()
    }

    /// Insert all elements of `iter` before the element at `index`
    pub fn try_insert_iter<I: IntoIterator<Item = T>>(
        &mut self,
        index: usize,
        iter: I,
    ) -> Result<(), CursorError> {
        self.check_position(index)?;
        // the splice inserts as it is dropped
        self.grow_at(index, |data| drop(data.splice(index..index, iter)));
        Ok(())
    }

    /// Insert all elements of `iter` before the element at `index`
    ///
    /// # Panics
    ///
    /// If `index > len`
    #[track_caller]
    pub fn insert_iter<I: IntoIterator<Item = T>>(&mut self, index: usize, iter: I) {
        self.try_insert_iter(index, iter).or_handle()
    }

    /// Insert clones of all elements of `slice` before the element at `index`
    ///
    /// # Panics
    ///
    /// If `index > len`
    #[track_caller]
    pub fn insert_from_slice(&mut self, index: usize, slice: &[T])
    where
        T: Clone,
    {
        self.try_insert_iter(index, slice.iter().cloned())
            .or_handle()
    }

    /// Remove the element at `index`
    ///
    /// Cursors at that element move to the end marker
    pub fn try_remove(&mut self, index: usize) -> Result<T, CursorError> {
        self.check_element(index)?;
        let old_len = self.len();
        let value = self.data.remove(index);
        self.notify_removed(index, 1, old_len);
        Ok(value)
    }

    /// Remove the element at `index`
    ///
    /// Cursors at that element move to the end marker
    ///
    /// # Panics
    ///
    /// If `index >= len`
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        self.try_remove(index).or_handle()
    }

    /// Remove the element at `index` by moving the last element into its place
    ///
    /// Cursors at the removed element move to the end marker, cursors at the last element
    /// follow it to `index`
    pub fn try_swap_remove(&mut self, index: usize) -> Result<T, CursorError> {
        self.check_element(index)?;
        let old_len = self.len();
        let last = old_len - 1;
        let value = self.data.swap_remove(index);

        let mut registry = self.registry.borrow_mut();
        registry.set_len(last);
        registry.broadcast_invalidate(index, index);
        registry.broadcast_shift(last, last, signed(index) - signed(last));
        registry.debug_assert_settled();

        Ok(value)
    }

    /// Remove the element at `index` by moving the last element into its place
    ///
    /// # Panics
    ///
    /// If `index >= len`
    #[track_caller]
    pub fn swap_remove(&mut self, index: usize) -> T {
        self.try_swap_remove(index).or_handle()
    }

    /// Remove and drop the elements in `range`
    ///
    /// Cursors at those elements move to the end marker
    pub fn try_erase(&mut self, range: impl RangeBounds<usize>) -> Result<(), CursorError> {
        let Range { start, end } = self.resolve_range(range)?;
        self.shrink_at(start, |data| drop(data.drain(start..end)));
        Ok(())
    }

    /// Remove and drop the elements in `range`
    ///
    /// Cursors at those elements move to the end marker
    ///
    /// # Panics
    ///
    /// If the range is out of order or out of bounds
    #[track_caller]
    pub fn erase(&mut self, range: impl RangeBounds<usize>) {
        self.try_erase(range).or_handle()
    }

    /// Remove the elements in `range` and return them
    ///
    /// Cursors at those elements move to the end marker
    pub fn try_drain(&mut self, range: impl RangeBounds<usize>) -> Result<Vec<T>, CursorError> {
        let Range { start, end } = self.resolve_range(range)?;
        Ok(self.shrink_at(start, |data| data.drain(start..end).collect()))
    }

    /// Remove the elements in `range` and return them
    ///
    /// # Panics
    ///
    /// If the range is out of order or out of bounds
    #[track_caller]
    pub fn drain(&mut self, range: impl RangeBounds<usize>) -> Vec<T> {
        self.try_drain(range).or_handle()
    }

    /// see [`Vec::truncate`]
    ///
    /// Cursors at removed elements move to the end marker
    pub fn truncate(&mut self, len: usize) {
        if len < self.len() {
            self.shrink_at(len, |data| data.truncate(len));
        }
    }

    /// see [`Vec::clear`]
    ///
    /// All cursors move to the end marker
    pub fn clear(&mut self) {
        self.truncate(0)
    }

    /// see [`Vec::resize`]
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        let old_len = self.len();
        if new_len <= old_len {
            self.truncate(new_len);
        } else {
            self.grow_at(old_len, |data| data.resize(new_len, value));
        }
    }

    /// see [`Vec::resize_with`]
    pub fn resize_with(&mut self, new_len: usize, make_value: impl FnMut() -> T) {
        let old_len = self.len();
        if new_len <= old_len {
            self.truncate(new_len);
        } else {
            self.grow_at(old_len, |data| data.resize_with(new_len, make_value));
        }
    }

    /// see [`Vec::extend_from_slice`]
    pub fn extend_from_slice(&mut self, slice: &[T])
    where
        T: Clone,
    {
        self.grow_at(self.len(), |data| data.extend_from_slice(slice));
    }

    /// see [`Vec::append`]
    pub fn append(&mut self, other: &mut Vec<T>) {
        let old_len = self.len();
        let count = other.len();
        self.data.append(other);
        self.notify_inserted(old_len, count, old_len);
    }

    /// see [`Vec::retain`]
    ///
    /// Cursors at removed elements move to the end marker
    pub fn retain(&mut self, mut keep: impl FnMut(&T) -> bool) {
        self.retain_mut(|value| keep(value))
    }

    /// see [`Vec::retain_mut`]
    ///
    /// Cursors at removed elements move to the end marker
    pub fn retain_mut(&mut self, mut keep: impl FnMut(&mut T) -> bool) {
        let old_len = self.len();
        let registry = &self.registry;

        // runs of removed elements as (start, count), in increasing order
        let mut runs = scopeguard::guard(Vec::<(usize, usize)>::new(), |runs| {
            settle_removed_runs(registry, &runs, old_len)
        });
        let mut index = 0;
        self.data.retain_mut(|value| {
            let kept = keep(value);
            if !kept {
                match runs.last_mut() {
                    Some((start, count)) if *start + *count == index => *count += 1,
                    _ => runs.push((index, 1)),
                }
            }
            index += 1;
            kept
        });
    }

    /// Create a cursor at the first element, or at the end marker if the array is empty
    pub fn cursor_front(&self) -> Cursor<INLINE> {
        Cursor::register(&self.registry, self.owner, CursorState::beginning(self.len()))
    }

    /// Create a cursor at the end marker
    pub fn cursor_end(&self) -> Cursor<INLINE> {
        Cursor::register(&self.registry, self.owner, CursorState::AtEnd)
    }

    /// Create a cursor at `index`, `len` gives the end marker
    pub fn try_cursor_at(&self, index: usize) -> Result<Cursor<INLINE>, CursorError> {
        self.check_position(index)?;
        Ok(Cursor::register(
            &self.registry,
            self.owner,
            CursorState::at(index, self.len()),
        ))
    }

    /// Create a cursor at `index`, `len` gives the end marker
    ///
    /// # Panics
    ///
    /// If `index > len`
    #[track_caller]
    pub fn cursor_at(&self, index: usize) -> Cursor<INLINE> {
        self.try_cursor_at(index).or_handle()
    }

    /// Start tracking the position of an untracked cursor
    pub fn try_track(&self, cursor: IndexCursor) -> Result<Cursor<INLINE>, CursorError> {
        self.check_owner(cursor.owner())?;
        self.try_cursor_at(cursor.index())
    }

    /// Start tracking the position of an untracked cursor
    ///
    /// # Panics
    ///
    /// If the cursor belongs to another array, or its index is past the end
    #[track_caller]
    pub fn track(&self, cursor: IndexCursor) -> Cursor<INLINE> {
        self.try_track(cursor).or_handle()
    }

    /// Get the element the cursor points to
    pub fn try_item(&self, cursor: &Cursor<INLINE>) -> Result<&T, CursorError> {
        self.check_owner(cursor.owner())?;
        let len = self.len();
        let item = match cursor.state() {
            CursorState::AtItem(index) => self.data.get(index),
            CursorState::AtEnd => None,
        };
        item.ok_or(CursorError::NotAnItem { len })
    }

    /// Get the element the cursor points to
    ///
    /// # Panics
    ///
    /// If the cursor belongs to another array, or is at the end marker
    #[track_caller]
    pub fn item(&self, cursor: &Cursor<INLINE>) -> &T {
        self.try_item(cursor).or_handle()
    }

    /// Get a mutable reference to the element the cursor points to
    pub fn try_item_mut(&mut self, cursor: &Cursor<INLINE>) -> Result<&mut T, CursorError> {
        self.check_owner(cursor.owner())?;
        let len = self.len();
        let item = match cursor.state() {
            CursorState::AtItem(index) => self.data.get_mut(index),
            CursorState::AtEnd => None,
        };
        item.ok_or(CursorError::NotAnItem { len })
    }

    /// Get a mutable reference to the element the cursor points to
    ///
    /// # Panics
    ///
    /// If the cursor belongs to another array, or is at the end marker
    #[track_caller]
    pub fn item_mut(&mut self, cursor: &Cursor<INLINE>) -> &mut T {
        self.try_item_mut(cursor).or_handle()
    }

    /// Insert `value` before the element the cursor points to (or at the end)
    ///
    /// The cursor keeps pointing at its element, which is now one further along.
    pub fn try_insert_at_cursor(
        &mut self,
        cursor: &Cursor<INLINE>,
        value: T,
    ) -> Result<(), CursorError> {
        self.check_owner(cursor.owner())?;
        self.try_insert(cursor.index(), value)
    }

    /// Insert `value` before the element the cursor points to (or at the end)
    ///
    /// # Panics
    ///
    /// If the cursor belongs to another array
    #[track_caller]
    pub fn insert_at_cursor(&mut self, cursor: &Cursor<INLINE>, value: T) {
        self.try_insert_at_cursor(cursor, value).or_handle()
    }

    /// Remove the element the cursor points to, which moves the cursor to the end marker
    pub fn try_erase_at_cursor(&mut self, cursor: &Cursor<INLINE>) -> Result<T, CursorError> {
        self.check_owner(cursor.owner())?;
        match cursor.state() {
            CursorState::AtItem(index) => self.try_remove(index),
            CursorState::AtEnd => Err(CursorError::NotAnItem { len: self.len() }),
        }
    }

    /// Remove the element the cursor points to, which moves the cursor to the end marker
    ///
    /// # Panics
    ///
    /// If the cursor belongs to another array, or is at the end marker
    #[track_caller]
    pub fn erase_at_cursor(&mut self, cursor: &Cursor<INLINE>) -> T {
        self.try_erase_at_cursor(cursor).or_handle()
    }

    /// Remove the elements from `start` up to (not including) `end`
    pub fn try_erase_between(
        &mut self,
        start: &Cursor<INLINE>,
        end: &Cursor<INLINE>,
    ) -> Result<(), CursorError> {
        self.check_owner(start.owner())?;
        self.check_owner(end.owner())?;
        self.try_erase(start.index()..end.index())
    }

    /// Remove the elements from `start` up to (not including) `end`
    ///
    /// # Panics
    ///
    /// If either cursor belongs to another array, or `start` is after `end`
    #[track_caller]
    pub fn erase_between(&mut self, start: &Cursor<INLINE>, end: &Cursor<INLINE>) {
        self.try_erase_between(start, end).or_handle()
    }
}

/// Record that `count` elements were inserted at `at` into an array of `old_len` elements
fn settle_inserted<const INLINE: usize>(
    registry: &RefCell<CursorRegistry<INLINE>>,
    at: usize,
    count: usize,
    old_len: usize,
) {
    let mut registry = registry.borrow_mut();
    registry.set_len(old_len + count);
    registry.broadcast_shift(at, old_len, signed(count));
    registry.debug_assert_settled();
}

/// Record that the elements `at..at + count` were removed from an array of `old_len` elements
fn settle_removed<const INLINE: usize>(
    registry: &RefCell<CursorRegistry<INLINE>>,
    at: usize,
    count: usize,
    old_len: usize,
) {
    let mut registry = registry.borrow_mut();
    registry.set_len(old_len - count);
    if count != 0 {
        registry.broadcast_invalidate(at, at + count - 1);
    }
    registry.broadcast_shift(at + count, old_len, -signed(count));
    registry.debug_assert_settled();
}

/// Record that every run of `(start, count)` in `runs` was removed from an array of `old_len`
/// elements, `runs` is sorted and the positions are from before any removal
fn settle_removed_runs<const INLINE: usize>(
    registry: &RefCell<CursorRegistry<INLINE>>,
    runs: &[(usize, usize)],
    old_len: usize,
) {
    if runs.is_empty() {
        return;
    }

    let removed: usize = runs.iter().map(|&(_, count)| count).sum();
    let mut registry = registry.borrow_mut();
    registry.set_len(old_len - removed);

    // going back to front keeps the positions of earlier runs valid
    let mut len = old_len;
    for &(start, count) in runs.iter().rev() {
        registry.broadcast_invalidate(start, start + count - 1);
        registry.broadcast_shift(start + count, len, -signed(count));
        len -= count;
    }
    registry.debug_assert_settled();
}

impl<T, const INLINE: usize> Drop for TrackedVec<T, INLINE> {
    fn drop(&mut self) {
        match self.registry.try_borrow_mut() {
            Ok(mut registry) => registry.detach(),
            Err(_) => {
                if cfg!(debug_assertions) {
                    panic!(
                        "{:?} was dropped while its cursor registry was borrowed",
                        self.owner
                    )
                }
            }
        }
    }
}

impl<T, const INLINE: usize> Default for TrackedVec<T, INLINE> {
    fn default() -> Self {
        Self::from_vec(Vec::new())
    }
}

impl<T: Clone, const INLINE: usize> Clone for TrackedVec<T, INLINE> {
    /// The clone is a new array with no cursors
    fn clone(&self) -> Self {
        Self::from_vec(self.data.clone())
    }
}

impl<T: core::fmt::Debug, const INLINE: usize> core::fmt::Debug for TrackedVec<T, INLINE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TrackedVec")
            .field("owner", &self.owner)
            .field("data", &self.data)
            .field("registry", &self.registry.borrow())
            .finish()
    }
}

impl<T: PartialEq, const INLINE: usize> PartialEq for TrackedVec<T, INLINE> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl<T: Eq, const INLINE: usize> Eq for TrackedVec<T, INLINE> {}

impl<T, const INLINE: usize> From<Vec<T>> for TrackedVec<T, INLINE> {
    fn from(data: Vec<T>) -> Self {
        Self::from_vec(data)
    }
}

impl<T, const INLINE: usize> From<TrackedVec<T, INLINE>> for Vec<T> {
    fn from(vec: TrackedVec<T, INLINE>) -> Self {
        vec.into_vec()
    }
}

impl<T, const INLINE: usize> FromIterator<T> for TrackedVec<T, INLINE> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T, const INLINE: usize> Extend<T> for TrackedVec<T, INLINE> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.grow_at(self.len(), |data| data.extend(iter));
    }
}

impl<T, const INLINE: usize> ops::Deref for TrackedVec<T, INLINE> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T, const INLINE: usize> ops::DerefMut for TrackedVec<T, INLINE> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

impl<'a, T, const INLINE: usize> IntoIterator for &'a TrackedVec<T, INLINE> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<'a, T, const INLINE: usize> IntoIterator for &'a mut TrackedVec<T, INLINE> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter_mut()
    }
}

impl<T, const INLINE: usize> IntoIterator for TrackedVec<T, INLINE> {
    type Item = T;
    type IntoIter = alloc::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_vec().into_iter()
    }
}

//! see [`CursorRegistry`]

use crate::{
    tier::{InlineTier, Tier},
    CursorError, CursorKey, CursorState, OwnerId, ResultExt, DEFAULT_INLINE_CURSORS,
};

pub use crate::tier::Iter;

/// The set of live cursors into one array
///
/// A registry is paired with exactly one array, named by [`CursorRegistry::owner`]. It records
/// the array's length as of the last mutation, and a [`CursorState`] for every registered
/// cursor.
///
/// Whoever mutates the array must, after each size-changing mutation:
/// 1. call [`CursorRegistry::set_len`] with the new length
/// 2. call [`CursorRegistry::broadcast_invalidate`] for the positions that were removed, if any
/// 3. call [`CursorRegistry::broadcast_shift`] for the positions that moved
///
/// Invalidated cursors are at the end marker by the time the shift runs, so a cursor on a
/// removed element is never shifted onto a neighbouring element.
pub struct CursorRegistry<const INLINE: usize = DEFAULT_INLINE_CURSORS> {
    owner: OwnerId,
    len: usize,
    next_key: u64,
    tier: Tier<INLINE>,
}

impl<const INLINE: usize> CursorRegistry<INLINE> {
    /// Create an empty registry for the array identified by `owner` with length `len`
    pub const fn new(owner: OwnerId, len: usize) -> Self {
        Self {
            owner,
            len,
            next_key: 0,
            tier: Tier::Inline(InlineTier::new()),
        }
    }

    /// The array this registry tracks cursors for
    #[inline]
    pub const fn owner(&self) -> OwnerId {
        self.owner
    }

    /// The length of the array as of the last mutation
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the array was empty as of the last mutation
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Record the length of the array after a mutation
    #[inline]
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
    }

    /// The number of registered cursors
    #[inline]
    pub fn live(&self) -> usize {
        self.tier.len()
    }

    /// Returns true once the registry has moved its slots into a hash map
    ///
    /// This never goes back to false.
    #[inline]
    pub fn is_promoted(&self) -> bool {
        self.tier.is_promoted()
    }

    /// An item position must be in bounds of [`Self::len`]
    fn check_state(&self, state: CursorState) -> Result<(), CursorError> {
        match state {
            CursorState::AtItem(index) if index >= self.len => Err(CursorError::InvalidRange {
                start: index,
                end: index.saturating_add(1),
                len: self.len,
            }),
            _ => Ok(()),
        }
    }

    /// Register a new cursor with the given initial state
    ///
    /// # Panics
    ///
    /// If `state` is [`CursorState::AtItem`] with an index that is not less than [`Self::len`],
    /// or if the registry ran out of keys
    #[track_caller]
    pub fn register(&mut self, state: CursorState) -> CursorKey {
        self.check_state(state).or_handle();

        let key = CursorKey::new(self.next_key);
        self.next_key = match self.next_key.checked_add(1) {
            Some(next) => next,
            None => keys_exhausted(),
        };
        self.tier.insert(key, state);
        key
    }

    /// Release the slot of `key`, returning the state it was in
    pub fn try_unregister(&mut self, key: CursorKey) -> Result<CursorState, CursorError> {
        self.tier.remove(key).ok_or(CursorError::StaleKey { key })
    }

    /// Release the slot of `key`, returning the state it was in
    ///
    /// # Panics
    ///
    /// If the key is not registered
    #[track_caller]
    pub fn unregister(&mut self, key: CursorKey) -> CursorState {
        self.try_unregister(key).or_handle()
    }

    /// Get the state of the cursor registered under `key`
    pub fn try_state(&self, key: CursorKey) -> Result<CursorState, CursorError> {
        self.tier
            .get(key)
            .copied()
            .ok_or(CursorError::StaleKey { key })
    }

    /// Get the state of the cursor registered under `key`
    ///
    /// # Panics
    ///
    /// If the key is not registered
    #[track_caller]
    pub fn state(&self, key: CursorKey) -> CursorState {
        self.try_state(key).or_handle()
    }

    /// Get the position of the cursor registered under `key`, the end marker is at [`Self::len`]
    ///
    /// # Panics
    ///
    /// If the key is not registered
    #[track_caller]
    pub fn index(&self, key: CursorKey) -> usize {
        self.state(key).index(self.len)
    }

    /// Overwrite the state of the cursor registered under `key`
    pub fn try_set_state(&mut self, key: CursorKey, state: CursorState) -> Result<(), CursorError> {
        self.check_state(state)?;

        let slot = self
            .tier
            .get_mut(key)
            .ok_or(CursorError::StaleKey { key })?;
        *slot = state;
        Ok(())
    }

    /// Overwrite the state of the cursor registered under `key`
    ///
    /// # Panics
    ///
    /// If the key is not registered, or if `state` points to an item past the end of the array
    #[track_caller]
    pub fn set_state(&mut self, key: CursorKey, state: CursorState) {
        self.try_set_state(key, state).or_handle()
    }

    /// Move the cursor registered under `key` by `offset` positions
    pub fn try_advance_by(&mut self, key: CursorKey, offset: isize) -> Result<CursorState, CursorError> {
        let len = self.len;
        let slot = self
            .tier
            .get_mut(key)
            .ok_or(CursorError::StaleKey { key })?;
        *slot = slot.advance_by(offset, len)?;
        Ok(*slot)
    }

    /// Add `delta` to the index of every cursor at an item in `lo..=hi`
    ///
    /// Cursors at the end marker are not touched, they already follow the length.
    /// An empty range (`lo > hi`) does nothing.
    pub fn broadcast_shift(&mut self, lo: usize, hi: usize, delta: isize) {
        if lo > hi || delta == 0 {
            return;
        }

        self.tier
            .for_each_mut(|state| *state = state.shifted(lo, hi, delta));
    }

    /// Move every cursor at an item in `lo..=hi` to the end marker
    ///
    /// An empty range (`lo > hi`) does nothing.
    pub fn broadcast_invalidate(&mut self, lo: usize, hi: usize) {
        if lo > hi {
            return;
        }

        self.tier
            .for_each_mut(|state| *state = state.invalidated(lo, hi));
    }

    /// Move every cursor to the end marker of an empty array
    ///
    /// This is called when the array is destroyed while cursors into it are still alive.
    pub fn detach(&mut self) {
        self.len = 0;
        self.tier.for_each_mut(|state| *state = CursorState::AtEnd);
    }

    /// Check that every cursor at an item is in bounds of [`Self::len`]
    ///
    /// This only does something when debug assertions are enabled.
    #[inline]
    pub fn debug_assert_settled(&self) {
        if cfg!(debug_assertions) {
            for (key, state) in self.iter() {
                if let CursorState::AtItem(index) = state {
                    assert!(
                        index < self.len,
                        "cursor {key:?} left at {index} in an array of length {}",
                        self.len
                    );
                }
            }
        }
    }

    /// Iterate over every registered cursor and its state, in no particular order
    pub fn iter(&self) -> Iter<'_> {
        self.tier.iter()
    }

    /// Iterate over the keys of every registered cursor, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = CursorKey> + '_ {
        self.iter().map(|(key, _)| key)
    }
}

#[cold]
#[inline(never)]
fn keys_exhausted() -> ! {
    panic!("Tried to register a cursor in an exhausted registry")
}

impl<const INLINE: usize> core::fmt::Debug for CursorRegistry<INLINE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CursorRegistry")
            .field("owner", &self.owner)
            .field("len", &self.len)
            .field("promoted", &self.is_promoted())
            .field("cursors", &DebugCursors(self))
            .finish()
    }
}

struct DebugCursors<'a, const INLINE: usize>(&'a CursorRegistry<INLINE>);

impl<const INLINE: usize> core::fmt::Debug for DebugCursors<'_, INLINE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.0.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(len: usize) -> CursorRegistry<2> {
        CursorRegistry::new(OwnerId::new(), len)
    }

    #[test]
    fn keys_are_never_reissued() {
        let mut r = registry(3);
        let a = r.register(CursorState::AtItem(0));
        r.unregister(a);
        let b = r.register(CursorState::AtItem(0));
        assert_ne!(a, b);
        assert_eq!(r.try_state(a), Err(CursorError::StaleKey { key: a }));
    }

    #[test]
    fn double_unregister_is_stale() {
        let mut r = registry(3);
        let a = r.register(CursorState::AtEnd);
        assert_eq!(r.try_unregister(a), Ok(CursorState::AtEnd));
        assert_eq!(r.try_unregister(a), Err(CursorError::StaleKey { key: a }));
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn unregister_unknown_key_panics() {
        let mut r = registry(3);
        let a = r.register(CursorState::AtEnd);
        r.unregister(a);
        r.unregister(a);
    }

    #[test]
    #[should_panic(expected = "Range out of bounds")]
    fn register_past_len_panics() {
        let mut r = registry(3);
        r.register(CursorState::AtItem(3));
    }

    #[test]
    fn set_state_past_len_is_out_of_bounds() {
        let mut r = registry(3);
        let a = r.register(CursorState::AtEnd);
        assert_eq!(
            r.try_set_state(a, CursorState::AtItem(3)),
            Err(CursorError::InvalidRange {
                start: 3,
                end: 4,
                len: 3
            })
        );
        assert_eq!(r.state(a), CursorState::AtEnd);
    }

    #[test]
    #[should_panic(expected = "exhausted registry")]
    fn exhausted_keys_panic() {
        let mut r = registry(3);
        r.next_key = u64::MAX;
        r.register(CursorState::AtEnd);
    }

    #[test]
    fn invalidate_then_shift() {
        // erase [1, 3) from an array of length 5
        let mut r = registry(5);
        let before = r.register(CursorState::AtItem(0));
        let removed = r.register(CursorState::AtItem(2));
        let after = r.register(CursorState::AtItem(4));
        let end = r.register(CursorState::AtEnd);

        r.set_len(3);
        r.broadcast_invalidate(1, 2);
        r.broadcast_shift(3, 5, -2);
        r.debug_assert_settled();

        assert_eq!(r.state(before), CursorState::AtItem(0));
        assert_eq!(r.state(removed), CursorState::AtEnd);
        assert_eq!(r.state(after), CursorState::AtItem(2));
        assert_eq!(r.state(end), CursorState::AtEnd);
        assert_eq!(r.index(end), 3);
        assert!(r.is_promoted());
    }

    #[test]
    fn detach_moves_everything_to_the_end() {
        let mut r = registry(4);
        let keys = [
            r.register(CursorState::AtItem(0)),
            r.register(CursorState::AtItem(3)),
            r.register(CursorState::AtEnd),
        ];
        r.detach();
        assert_eq!(r.len(), 0);
        for key in keys {
            assert_eq!(r.state(key), CursorState::AtEnd);
            assert_eq!(r.index(key), 0);
        }
    }

    #[test]
    fn advance_updates_the_slot() {
        let mut r = registry(2);
        let a = r.register(CursorState::AtItem(0));
        assert_eq!(r.try_advance_by(a, 1), Ok(CursorState::AtItem(1)));
        assert_eq!(r.try_advance_by(a, 1), Ok(CursorState::AtEnd));
        assert!(r.try_advance_by(a, 1).is_err());
        assert_eq!(r.state(a), CursorState::AtEnd);
    }
}

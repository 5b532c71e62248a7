//! The two storage tiers of a [`CursorRegistry`](crate::CursorRegistry)

use rustc_hash::FxHashMap;
use std::collections::hash_map;

use crate::{CursorKey, CursorState};

#[derive(Clone, Copy)]
pub(crate) struct Entry {
    pub key: CursorKey,
    pub state: CursorState,
}

impl Entry {
    const VACANT: Self = Self {
        key: CursorKey::new(0),
        state: CursorState::AtEnd,
    };
}

/// Up to `N` entries, found by linear scan
///
/// Only `entries[..len]` are live, removal swaps the last live entry into the hole.
pub(crate) struct InlineTier<const N: usize> {
    len: usize,
    entries: [Entry; N],
}

impl<const N: usize> InlineTier<N> {
    pub const fn new() -> Self {
        Self {
            len: 0,
            entries: [Entry::VACANT; N],
        }
    }

    pub fn live(&self) -> &[Entry] {
        &self.entries[..self.len]
    }

    pub fn live_mut(&mut self) -> &mut [Entry] {
        &mut self.entries[..self.len]
    }

    fn position(&self, key: CursorKey) -> Option<usize> {
        self.live().iter().position(|entry| entry.key == key)
    }

    pub fn get(&self, key: CursorKey) -> Option<&CursorState> {
        let i = self.position(key)?;
        Some(&self.entries[i].state)
    }

    pub fn get_mut(&mut self, key: CursorKey) -> Option<&mut CursorState> {
        let i = self.position(key)?;
        Some(&mut self.entries[i].state)
    }

    /// Returns the entry back if there is no room left
    pub fn insert(&mut self, entry: Entry) -> Result<(), Entry> {
        match self.entries.get_mut(self.len) {
            Some(slot) => {
                *slot = entry;
                self.len += 1;
                Ok(())
            }
            None => Err(entry),
        }
    }

    pub fn remove(&mut self, key: CursorKey) -> Option<CursorState> {
        let i = self.position(key)?;
        self.len -= 1;
        self.entries.swap(i, self.len);
        Some(self.entries[self.len].state)
    }
}

pub(crate) enum Tier<const N: usize> {
    Inline(InlineTier<N>),
    Map(FxHashMap<CursorKey, CursorState>),
}

impl<const N: usize> Tier<N> {
    /// Move every inline entry into a map
    ///
    /// This is the only transition between the two tiers, and it only goes one way.
    #[cold]
    #[inline(never)]
    pub fn promote(&mut self) {
        if let Tier::Inline(inline) = self {
            let mut map =
                FxHashMap::with_capacity_and_hasher(2 * N.max(1), Default::default());
            map.extend(inline.live().iter().map(|entry| (entry.key, entry.state)));
            *self = Tier::Map(map);
        }
    }

    pub fn is_promoted(&self) -> bool {
        matches!(self, Tier::Map(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Tier::Inline(inline) => inline.live().len(),
            Tier::Map(map) => map.len(),
        }
    }

    pub fn get(&self, key: CursorKey) -> Option<&CursorState> {
        match self {
            Tier::Inline(inline) => inline.get(key),
            Tier::Map(map) => map.get(&key),
        }
    }

    pub fn get_mut(&mut self, key: CursorKey) -> Option<&mut CursorState> {
        match self {
            Tier::Inline(inline) => inline.get_mut(key),
            Tier::Map(map) => map.get_mut(&key),
        }
    }

    pub fn insert(&mut self, key: CursorKey, state: CursorState) {
        if let Tier::Inline(inline) = self {
            match inline.insert(Entry { key, state }) {
                Ok(()) => return,
                Err(_) => self.promote(),
            }
        }

        if let Tier::Map(map) = self {
            let old = map.insert(key, state);
            debug_assert!(old.is_none(), "{key:?} was registered twice");
        }
    }

    pub fn remove(&mut self, key: CursorKey) -> Option<CursorState> {
        match self {
            Tier::Inline(inline) => inline.remove(key),
            Tier::Map(map) => map.remove(&key),
        }
    }

    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut CursorState)) {
        match self {
            Tier::Inline(inline) => inline
                .live_mut()
                .iter_mut()
                .for_each(|entry| f(&mut entry.state)),
            Tier::Map(map) => map.values_mut().for_each(f),
        }
    }

    pub fn iter(&self) -> Iter<'_> {
        match self {
            Tier::Inline(inline) => Iter {
                inner: IterInner::Inline(inline.live().iter()),
            },
            Tier::Map(map) => Iter {
                inner: IterInner::Map(map.iter()),
            },
        }
    }
}

/// An iterator over the slots of a [`CursorRegistry`](crate::CursorRegistry), created by
/// [`CursorRegistry::iter`](crate::CursorRegistry::iter)
pub struct Iter<'a> {
    inner: IterInner<'a>,
}

enum IterInner<'a> {
    Inline(core::slice::Iter<'a, Entry>),
    Map(hash_map::Iter<'a, CursorKey, CursorState>),
}

impl Iterator for Iter<'_> {
    type Item = (CursorKey, CursorState);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.inner {
            IterInner::Inline(iter) => iter.next().map(|entry| (entry.key, entry.state)),
            IterInner::Map(iter) => iter.next().map(|(&key, &state)| (key, state)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.inner {
            IterInner::Inline(iter) => iter.size_hint(),
            IterInner::Map(iter) => iter.size_hint(),
        }
    }
}

impl ExactSizeIterator for Iter<'_> {}

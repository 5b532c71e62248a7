use crate::CursorError;

/// Where a tracked cursor points
///
/// There is no separate invalid state, invalidating a cursor moves it to [`CursorState::AtEnd`].
/// The end marker has no stored index, it always denotes the current length of the array, so
/// it keeps tracking the end as the array grows or shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorState {
    /// The cursor denotes the item at this index, which is less than the array's length
    AtItem(usize),
    /// The cursor is one past the last item
    AtEnd,
}

impl CursorState {
    /// The state for `index` in an array of length `len`
    ///
    /// `index >= len` yields the end marker.
    #[inline]
    pub const fn at(index: usize, len: usize) -> Self {
        if index < len {
            Self::AtItem(index)
        } else {
            Self::AtEnd
        }
    }

    /// The state at the start of an array of length `len`
    #[inline]
    pub const fn beginning(len: usize) -> Self {
        Self::at(0, len)
    }

    /// The position of this cursor in an array of length `len`
    #[inline]
    pub const fn index(self, len: usize) -> usize {
        match self {
            Self::AtItem(index) => index,
            Self::AtEnd => len,
        }
    }

    /// Returns true if this cursor denotes an item
    #[inline]
    pub const fn points_to_an_item(self) -> bool {
        matches!(self, Self::AtItem(_))
    }

    /// Returns true if this cursor is at the end marker
    #[inline]
    pub const fn points_to_end_marker(self) -> bool {
        matches!(self, Self::AtEnd)
    }

    /// Move by `offset` positions in an array of length `len`
    ///
    /// The target must lie in `0..=len`, it is never clamped.
    pub fn advance_by(self, offset: isize, len: usize) -> Result<Self, CursorError> {
        let index = self.index(len);
        match index.checked_add_signed(offset) {
            Some(target) if target <= len => Ok(Self::at(target, len)),
            _ => Err(CursorError::OutOfRange { index, offset, len }),
        }
    }

    /// Move back by `offset` positions in an array of length `len`
    pub fn regress_by(self, offset: isize, len: usize) -> Result<Self, CursorError> {
        match offset.checked_neg() {
            Some(neg) => self.advance_by(neg, len),
            None => Err(CursorError::OutOfRange {
                index: self.index(len),
                offset,
                len,
            }),
        }
    }

    #[inline]
    pub(crate) fn shifted(self, lo: usize, hi: usize, delta: isize) -> Self {
        match self {
            Self::AtItem(index) if lo <= index && index <= hi => match index.checked_add_signed(delta) {
                Some(index) => Self::AtItem(index),
                None => shift_underflow(index, delta),
            },
            state => state,
        }
    }

    #[inline]
    pub(crate) fn invalidated(self, lo: usize, hi: usize) -> Self {
        match self {
            Self::AtItem(index) if lo <= index && index <= hi => Self::AtEnd,
            state => state,
        }
    }
}

#[cold]
#[inline(never)]
fn shift_underflow(index: usize, delta: isize) -> ! {
    panic!("Cursor shifted before the start of the array, index: {index}, delta: {delta}")
}

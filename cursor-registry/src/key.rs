/// Names one slot of a [`CursorRegistry`](crate::CursorRegistry)
///
/// Keys are handed out in increasing order and are never reissued by the same registry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CursorKey(u64);

impl CursorKey {
    #[inline]
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw value of this key
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl core::fmt::Debug for CursorKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "CursorKey({})", self.0)
    }
}

impl core::fmt::Display for CursorKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

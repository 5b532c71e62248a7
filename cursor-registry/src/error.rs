use crate::CursorKey;

/// Misuse of a cursor or of the array it points into
///
/// These are all programming errors. Every fallible operation has a `try_*` form which
/// returns this error, and a plain form which panics with it via [`CursorError::handle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorError {
    /// Navigation would move the cursor before the first element or past the end marker
    OutOfRange {
        /// The position the cursor started from
        index: usize,
        /// The requested offset
        offset: isize,
        /// The length of the array
        len: usize,
    },
    /// A range of positions was out of order or extends past the end of the array
    InvalidRange {
        /// The start of the range
        start: usize,
        /// The end of the range (exclusive)
        end: usize,
        /// The length of the array
        len: usize,
    },
    /// The cursor belongs to a different array
    NotOwned,
    /// The key is not registered (it was never issued, or was already released)
    StaleKey {
        /// The key that was used
        key: CursorKey,
    },
    /// The cursor is at the end marker, so there is no item to access
    NotAnItem {
        /// The length of the array
        len: usize,
    },
}

impl CursorError {
    /// Panic with a message describing this error
    #[cold]
    #[inline(never)]
    #[track_caller]
    pub fn handle(self) -> ! {
        panic!("{self}")
    }
}

impl core::fmt::Display for CursorError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match *self {
            CursorError::OutOfRange { index, offset, len } => write!(
                f,
                "Cursor moved out of range (0 <= index + offset <= length), index: {index}, offset: {offset}, length: {len}"
            ),
            CursorError::InvalidRange { start, end, len } if start > end => write!(
                f,
                "Range bounds out of order (start > end), start: {start}, end: {end}, length: {len}"
            ),
            CursorError::InvalidRange { start, end, len } => write!(
                f,
                "Range out of bounds (end > length), start: {start}, end: {end}, length: {len}"
            ),
            CursorError::NotOwned => f.write_str("Cursor not owned by this array"),
            CursorError::StaleKey { key } => write!(f, "Cursor key {key} is not registered"),
            CursorError::NotAnItem { len } => write!(
                f,
                "Cursor points to the end marker and not to an item, length: {len}"
            ),
        }
    }
}

impl core::error::Error for CursorError {}

/// Turns a `Result<T, CursorError>` into a `T`, panicking on error at the caller's location
pub trait ResultExt<T> {
    /// Unwrap the value, or panic with [`CursorError::handle`]
    fn or_handle(self) -> T;
}

impl<T> ResultExt<T> for Result<T, CursorError> {
    #[inline]
    #[track_caller]
    fn or_handle(self) -> T {
        match self {
            Ok(value) => value,
            Err(err) => err.handle(),
        }
    }
}

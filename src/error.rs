use thiserror::Error;

/// Why a [`Cursor`](crate::Cursor) could not be read or moved.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum CursorError {
    /// The map was structurally modified (insert of a new key, remove, clear)
    /// after the cursor was created.
    #[error("cursor invalidated: created at modification {created}, map is now at {current}")]
    Invalidated {
        /// Modification count of the map when the cursor was created.
        created: u64,
        /// Modification count of the map now.
        current: u64,
    },
    /// The cursor is already past the last entry.
    #[error("cursor advanced past the end of the map")]
    Exhausted,
}

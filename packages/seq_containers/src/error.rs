use thiserror::Error;

/// Errors that can occur when operating on a sequence container.
///
/// Every fallible operation either succeeds fully or returns one of these errors and leaves
/// the container exactly as it was before the call.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// An indexed operation was given an index that is not valid for the current length.
    ///
    /// For element access and removal the index must be less than the length. For insertion
    /// the index may also be equal to the length (which appends).
    #[error("index {index} is out of range for a container of length {len}")]
    IndexOutOfRange {
        /// The index the caller provided.
        index: usize,

        /// The number of elements in the container at the time of the call.
        len: usize,
    },

    /// The operation requires at least one element but the container is empty.
    #[error("the operation requires at least one element but the container is empty")]
    EmptyContainer,
}

/// A specialized `Result` type for container operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

/// Checks that `index` refers to an existing element of a container holding `len` elements.
pub(crate) fn check_element_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(Error::IndexOutOfRange { index, len })
    }
}

/// Checks that `index` is a valid insertion position in a container holding `len` elements.
pub(crate) fn check_insert_index(index: usize, len: usize) -> Result<()> {
    if index <= len {
        Ok(())
    } else {
        Err(Error::IndexOutOfRange { index, len })
    }
}

/// Determines what happens to the allocated buffer of an [`ArrayContainer`][1] when it is
/// cleared.
///
/// By default, clearing releases the buffer and resets the capacity to zero.
///
/// # Examples
///
/// ```
/// use seq_containers::{ArrayContainer, ClearPolicy};
///
/// let mut array = ArrayContainer::<u32>::builder()
///     .clear_policy(ClearPolicy::RetainCapacity)
///     .build();
///
/// array.push_back(1);
/// array.push_back(2);
/// array.clear();
///
/// assert!(array.is_empty());
/// assert_eq!(array.capacity(), 2);
/// ```
///
/// [1]: crate::ArrayContainer
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum ClearPolicy {
    /// Clearing drops all items and releases the buffer, leaving a capacity of zero.
    /// This is the default.
    #[default]
    ReleaseCapacity,

    /// Clearing drops all items but keeps the buffer allocated, so the capacity is unchanged.
    ///
    /// This may be valuable when the container is refilled to a similar size over and over,
    /// as it avoids repeating the growth sequence after every clear.
    RetainCapacity,
}

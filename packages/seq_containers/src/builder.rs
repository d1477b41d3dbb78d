use std::marker::PhantomData;

use crate::{ArrayContainer, ClearPolicy};

/// Builder for creating an instance of [`ArrayContainer`].
///
/// You only need to use this builder if you want to customize the container configuration.
/// The default configuration used by [`ArrayContainer::new()`][1] is sufficient for most use
/// cases.
///
/// # Examples
///
/// ```
/// use seq_containers::{ArrayContainer, ClearPolicy};
///
/// let array = ArrayContainer::<u32>::builder()
///     .capacity(16)
///     .clear_policy(ClearPolicy::RetainCapacity)
///     .build();
///
/// assert_eq!(array.capacity(), 16);
/// assert!(array.is_empty());
/// ```
///
/// [1]: ArrayContainer::new
#[must_use]
pub struct ArrayContainerBuilder<T> {
    capacity: usize,
    clear_policy: ClearPolicy,

    _item: PhantomData<T>,
}

impl<T> std::fmt::Debug for ArrayContainerBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayContainerBuilder")
            .field(
                "item_type",
                &std::format_args!("{}", std::any::type_name::<T>()),
            )
            .field("capacity", &self.capacity)
            .field("clear_policy", &self.clear_policy)
            .finish()
    }
}

impl<T> ArrayContainerBuilder<T> {
    pub(crate) fn new() -> Self {
        Self {
            capacity: 0,
            clear_policy: ClearPolicy::default(),
            _item: PhantomData,
        }
    }

    /// Sets the number of slots to allocate when the container is built.
    ///
    /// By default no memory is allocated until the first element is inserted.
    ///
    /// # Examples
    ///
    /// ```
    /// use seq_containers::ArrayContainer;
    ///
    /// let array = ArrayContainer::<u32>::builder().capacity(10).build();
    ///
    /// assert_eq!(array.capacity(), 10);
    /// ```
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the [clear policy][ClearPolicy] for the container. This governs whether
    /// [`clear()`][1] keeps the allocated buffer around for reuse.
    ///
    /// # Examples
    ///
    /// ```
    /// use seq_containers::{ArrayContainer, ClearPolicy};
    ///
    /// let array = ArrayContainer::<u32>::builder()
    ///     .clear_policy(ClearPolicy::RetainCapacity)
    ///     .build();
    ///
    /// assert_eq!(array.clear_policy(), ClearPolicy::RetainCapacity);
    /// ```
    ///
    /// [1]: ArrayContainer::clear
    pub fn clear_policy(mut self, policy: ClearPolicy) -> Self {
        self.clear_policy = policy;
        self
    }

    /// Builds the array container with the specified configuration.
    ///
    /// # Panics
    ///
    /// Panics if the requested capacity exceeds the maximum size of an allocation.
    ///
    /// # Examples
    ///
    /// ```
    /// use seq_containers::ArrayContainer;
    ///
    /// let array = ArrayContainer::<u32>::builder().build();
    ///
    /// assert_eq!(array.capacity(), 0);
    /// ```
    #[must_use]
    pub fn build(self) -> ArrayContainer<T> {
        ArrayContainer::new_inner(self.capacity, self.clear_policy)
    }
}

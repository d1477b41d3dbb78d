use crate::{ArrayContainer, ListContainer, Result};

/// The operation surface shared by [`ArrayContainer`] and [`ListContainer`].
///
/// Both containers behave identically through this trait and only differ in performance:
/// the array has O(1) indexed access and amortized O(1) appends, while the list has O(1)
/// operations at both ends but O(n) indexed access.
///
/// Code that only needs sequence semantics can be written once against this trait and
/// used with either container.
///
/// # Example
///
/// ```rust
/// use seq_containers::{ArrayContainer, ListContainer, Sequence};
///
/// fn fill<S: Sequence<u32>>(sequence: &mut S) {
///     for value in 0..5 {
///         sequence.push_back(value);
///     }
///     sequence.erase(1).unwrap();
///     sequence.insert(0, 100).unwrap();
/// }
///
/// let mut array = ArrayContainer::new();
/// let mut list = ListContainer::new();
///
/// fill(&mut array);
/// fill(&mut list);
///
/// assert!(array.iter().eq(list.iter()));
/// ```
pub trait Sequence<T> {
    /// The number of elements in the sequence.
    #[must_use]
    fn len(&self) -> usize;

    /// Whether the sequence has no elements.
    #[must_use]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends an element to the end of the sequence.
    fn push_back(&mut self, value: T);

    /// Removes the last element and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`][crate::Error::EmptyContainer] if the sequence is empty.
    fn pop_back(&mut self) -> Result<T>;

    /// Inserts an element so that it ends up at position `index`, which may be equal to
    /// [`len()`][Self::len].
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`][crate::Error::IndexOutOfRange] if `index > len()`.
    fn insert(&mut self, index: usize, value: T) -> Result<()>;

    /// Removes the element at `index` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`][crate::Error::IndexOutOfRange] if `index >= len()`.
    fn erase(&mut self, index: usize) -> Result<T>;

    /// Returns a shared reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`][crate::Error::IndexOutOfRange] if `index >= len()`.
    fn at(&self, index: usize) -> Result<&T>;

    /// Returns an exclusive reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`][crate::Error::IndexOutOfRange] if `index >= len()`.
    fn at_mut(&mut self, index: usize) -> Result<&mut T>;

    /// Removes all elements.
    fn clear(&mut self);
}

impl<T> Sequence<T> for ArrayContainer<T> {
    fn len(&self) -> usize {
        Self::len(self)
    }

    fn is_empty(&self) -> bool {
        Self::is_empty(self)
    }

    fn push_back(&mut self, value: T) {
        Self::push_back(self, value);
    }

    fn pop_back(&mut self) -> Result<T> {
        Self::pop_back(self)
    }

    fn insert(&mut self, index: usize, value: T) -> Result<()> {
        Self::insert(self, index, value)
    }

    fn erase(&mut self, index: usize) -> Result<T> {
        Self::erase(self, index)
    }

    fn at(&self, index: usize) -> Result<&T> {
        Self::at(self, index)
    }

    fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        Self::at_mut(self, index)
    }

    fn clear(&mut self) {
        Self::clear(self);
    }
}

impl<T> Sequence<T> for ListContainer<T> {
    fn len(&self) -> usize {
        Self::len(self)
    }

    fn is_empty(&self) -> bool {
        Self::is_empty(self)
    }

    fn push_back(&mut self, value: T) {
        Self::push_back(self, value);
    }

    fn pop_back(&mut self) -> Result<T> {
        Self::pop_back(self)
    }

    fn insert(&mut self, index: usize, value: T) -> Result<()> {
        Self::insert(self, index, value)
    }

    fn erase(&mut self, index: usize) -> Result<T> {
        Self::erase(self, index)
    }

    fn at(&self, index: usize) -> Result<&T> {
        Self::at(self, index)
    }

    fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        Self::at_mut(self, index)
    }

    fn clear(&mut self) {
        Self::clear(self);
    }
}

use std::alloc::{self, Layout};
use std::any::type_name;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::mem::{self, ManuallyDrop};
use std::ptr::{self, NonNull};
use std::{fmt, slice};

use scopeguard::ScopeGuard;
use tracing::trace;

use crate::{
    ArrayContainerBuilder, ClearPolicy, Error, Result, check_element_index, check_insert_index,
};

/// A growable array that stores its elements in one contiguous heap buffer.
///
/// Elements are addressed by index. Appending is amortized O(1): whenever the buffer is full,
/// the capacity doubles (starting from 1). Inserting or erasing anywhere else shifts the
/// elements after the affected index, which is O(n).
///
/// The buffer is only allocated once there is something to store in it (unless a capacity is
/// requested up front via [`with_capacity()`][1] or the [builder][2]) and is never shrunk
/// implicitly. Use [`shrink_to_fit()`][3] to release spare capacity.
///
/// # Failure behavior
///
/// Every operation that validates its input returns an [`Error`] on invalid input and leaves the
/// container exactly as it was. Cloning a container whose element `Clone` panics part-way
/// releases everything that was cloned so far and leaves both containers untouched.
///
/// # Ownership transfer
///
/// Moving a container moves its buffer. To move the contents out of a container while keeping
/// the container itself usable, use [`std::mem::take()`], which leaves an empty container with
/// zero capacity behind.
///
/// # Example
///
/// ```rust
/// use seq_containers::ArrayContainer;
///
/// let mut array = ArrayContainer::new();
///
/// array.push_back(1);
/// array.push_back(3);
/// array.insert(1, 2).unwrap();
///
/// assert_eq!(array.as_slice(), &[1, 2, 3]);
/// assert_eq!(array.capacity(), 4);
///
/// assert_eq!(array.erase(0), Ok(1));
/// assert_eq!(*array.at(0).unwrap(), 2);
/// assert!(array.at(5).is_err());
/// ```
///
/// [1]: Self::with_capacity
/// [2]: Self::builder
/// [3]: Self::shrink_to_fit
pub struct ArrayContainer<T> {
    /// Start of the buffer. Dangling (but aligned) when no memory is allocated, which is the
    /// case whenever the buffer layout is zero-sized (zero capacity or zero-sized `T`).
    buffer: NonNull<T>,

    /// Number of live elements. The first `count` slots of the buffer are initialized,
    /// the rest are not.
    count: usize,

    capacity: usize,

    clear_policy: ClearPolicy,

    // We own values of type `T` and will drop them.
    _owns: PhantomData<T>,
}

impl<T> ArrayContainer<T> {
    #[must_use]
    pub(crate) fn new_inner(capacity: usize, clear_policy: ClearPolicy) -> Self {
        Self {
            buffer: allocate_buffer(capacity),
            count: 0,
            capacity,
            clear_policy,
            _owns: PhantomData,
        }
    }

    /// Creates a new empty container with the default configuration.
    ///
    /// No memory is allocated until the first element is inserted.
    ///
    /// # Example
    ///
    /// ```rust
    /// use seq_containers::ArrayContainer;
    ///
    /// let array = ArrayContainer::<String>::new();
    ///
    /// assert!(array.is_empty());
    /// assert_eq!(array.capacity(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a new empty container with room for exactly `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if the requested capacity exceeds the maximum size of an allocation.
    ///
    /// # Example
    ///
    /// ```rust
    /// use seq_containers::ArrayContainer;
    ///
    /// let array = ArrayContainer::<u8>::with_capacity(100);
    ///
    /// assert!(array.is_empty());
    /// assert_eq!(array.capacity(), 100);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::builder().capacity(capacity).build()
    }

    /// Starts building a new [`ArrayContainer`].
    ///
    /// Use this when you want to customize the container configuration beyond the defaults.
    pub fn builder() -> ArrayContainerBuilder<T> {
        ArrayContainerBuilder::new()
    }

    /// The number of elements in the container.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the container has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The number of elements the container can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The policy applied to the buffer by [`clear()`][Self::clear].
    #[must_use]
    pub fn clear_policy(&self) -> ClearPolicy {
        self.clear_policy
    }

    /// Appends an element to the end of the container.
    ///
    /// If the container is full, the capacity is doubled first (or set to 1 if it was 0).
    ///
    /// # Panics
    ///
    /// Panics if the new capacity would exceed the maximum size of an allocation.
    pub fn push_back(&mut self, value: T) {
        self.grow_if_full();

        // SAFETY: `grow_if_full()` ensures `count < capacity`, so the slot is within the
        // buffer and does not hold a live element that we would overwrite.
        unsafe {
            self.slot_ptr(self.count).write(value);
        }

        self.count = self
            .count
            .checked_add(1)
            .expect("guarded by count < capacity after growth");
    }

    /// Removes the last element and returns it.
    ///
    /// The capacity is not reduced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the container is empty.
    pub fn pop_back(&mut self) -> Result<T> {
        let last = self.count.checked_sub(1).ok_or(Error::EmptyContainer)?;

        // The slot is no longer considered live from this point on, so it is read exactly once.
        self.count = last;

        // SAFETY: `last < count` before the decrement, so the slot holds an initialized element.
        Ok(unsafe { self.slot_ptr(last).read() })
    }

    /// Inserts an element at `index`, shifting all elements after it one position to the right.
    ///
    /// `index` may be equal to [`len()`][Self::len], in which case this is the same as
    /// [`push_back()`][Self::push_back].
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index > len()`. The container is not modified
    /// and no memory is allocated in that case.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity would exceed the maximum size of an allocation.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        check_insert_index(index, self.count)?;

        self.grow_if_full();

        let shifted = self
            .count
            .checked_sub(index)
            .expect("guarded by index <= count above");

        let target = self.slot_ptr(index);
        let after_target = self.slot_ptr(index.checked_add(1).expect("guarded by index <= count"));

        // SAFETY: The source range `[index, count)` holds live elements and the destination
        // range `[index + 1, count + 1)` is within the buffer because `count < capacity` after
        // growth. The ranges overlap, which `ptr::copy` permits (it behaves like memmove).
        unsafe {
            ptr::copy(target, after_target, shifted);
        }

        // SAFETY: The element that was at `index` has been moved one slot to the right,
        // so writing here does not overwrite anything live.
        unsafe {
            target.write(value);
        }

        self.count = self
            .count
            .checked_add(1)
            .expect("guarded by count < capacity after growth");

        Ok(())
    }

    /// Removes the element at `index` and returns it, shifting all elements after it one
    /// position to the left.
    ///
    /// The capacity is not reduced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len()`.
    pub fn erase(&mut self, index: usize) -> Result<T> {
        check_element_index(index, self.count)?;

        let new_count = self
            .count
            .checked_sub(1)
            .expect("guarded by index < count above");
        let shifted = new_count
            .checked_sub(index)
            .expect("guarded by index < count above");

        let target = self.slot_ptr(index);
        let after_target = self.slot_ptr(index.checked_add(1).expect("guarded by index < count"));

        // SAFETY: `index < count`, so the slot holds an initialized element. We take ownership
        // of it here and close the gap right after, so it is never read again.
        let value = unsafe { target.read() };

        // SAFETY: The source range `[index + 1, count)` holds live elements and the destination
        // range `[index, count - 1)` is within the buffer. Overlap is permitted by `ptr::copy`.
        unsafe {
            ptr::copy(after_target, target, shifted);
        }

        self.count = new_count;

        Ok(value)
    }

    /// Returns a shared reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len()`.
    pub fn at(&self, index: usize) -> Result<&T> {
        self.as_slice().get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.count,
        })
    }

    /// Returns an exclusive reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len()`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.count;

        self.as_mut_slice()
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    /// Returns a shared reference to the first element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the container is empty.
    pub fn front(&self) -> Result<&T> {
        self.as_slice().first().ok_or(Error::EmptyContainer)
    }

    /// Returns an exclusive reference to the first element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the container is empty.
    pub fn front_mut(&mut self) -> Result<&mut T> {
        self.as_mut_slice().first_mut().ok_or(Error::EmptyContainer)
    }

    /// Returns a shared reference to the last element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the container is empty.
    pub fn back(&self) -> Result<&T> {
        self.as_slice().last().ok_or(Error::EmptyContainer)
    }

    /// Returns an exclusive reference to the last element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the container is empty.
    pub fn back_mut(&mut self) -> Result<&mut T> {
        self.as_mut_slice().last_mut().ok_or(Error::EmptyContainer)
    }

    /// Removes all elements.
    ///
    /// Whether the buffer is released depends on the container's [`ClearPolicy`]. With the
    /// default [`ClearPolicy::ReleaseCapacity`], the capacity becomes zero.
    pub fn clear(&mut self) {
        self.drop_elements();

        if self.clear_policy == ClearPolicy::ReleaseCapacity {
            self.reallocate(0);
        }
    }

    /// Ensures the container can hold at least `capacity` elements without reallocating.
    ///
    /// If `capacity` is greater than the current capacity, the buffer is reallocated to hold
    /// exactly `capacity` elements. Otherwise, this does nothing.
    ///
    /// # Panics
    ///
    /// Panics if the requested capacity exceeds the maximum size of an allocation.
    pub fn reserve(&mut self, capacity: usize) {
        if capacity > self.capacity {
            self.reallocate(capacity);
        }
    }

    /// Reduces the capacity to exactly the number of elements in the container.
    ///
    /// If the container is empty, the buffer is released entirely.
    pub fn shrink_to_fit(&mut self) {
        if self.count < self.capacity {
            self.reallocate(self.count);
        }
    }

    /// The elements of the container as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: The buffer is non-null and aligned even when dangling, and the first `count`
        // slots hold initialized elements that we own.
        unsafe { slice::from_raw_parts(self.buffer.as_ptr(), self.count) }
    }

    /// The elements of the container as an exclusive slice.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: See `as_slice()`. We hold an exclusive reference to the container,
        // so handing out an exclusive slice cannot alias anything.
        unsafe { slice::from_raw_parts_mut(self.buffer.as_ptr(), self.count) }
    }

    /// Iterates over shared references to the elements, in order.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Iterates over exclusive references to the elements, in order.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    fn grow_if_full(&mut self) {
        if self.count == self.capacity {
            let new_capacity = if self.capacity == 0 {
                1
            } else {
                self.capacity.checked_mul(2).unwrap_or_else(|| {
                    panic!(
                        "capacity overflow when growing array container of {}",
                        type_name::<T>()
                    )
                })
            };

            self.reallocate(new_capacity);
        }
    }

    /// Moves the live elements into a new buffer of exactly `new_capacity` slots and
    /// releases the old buffer.
    ///
    /// The new buffer is fully prepared before the old one is touched, so if allocation
    /// fails the container is still intact.
    fn reallocate(&mut self, new_capacity: usize) {
        assert!(
            new_capacity >= self.count,
            "cannot reallocate array container of {} below its length",
            type_name::<T>()
        );

        let new_buffer = allocate_buffer::<T>(new_capacity);

        // SAFETY: The first `count` slots of the old buffer are initialized and the new buffer
        // has room for at least `count` elements. The two are separate allocations (or both
        // zero-sized), so they do not overlap.
        unsafe {
            ptr::copy_nonoverlapping(self.buffer.as_ptr(), new_buffer.as_ptr(), self.count);
        }

        let old_buffer = mem::replace(&mut self.buffer, new_buffer);
        let old_capacity = mem::replace(&mut self.capacity, new_capacity);

        // SAFETY: The old buffer was allocated with `old_capacity` and every element in it has
        // been moved out above, so nothing will be dropped twice.
        unsafe {
            release_buffer(old_buffer, old_capacity);
        }

        trace!(
            item_type = type_name::<T>(),
            old_capacity,
            new_capacity,
            len = self.count,
            "reallocated array container buffer"
        );
    }

    /// Drops every live element, leaving the buffer allocated.
    fn drop_elements(&mut self) {
        let live = ptr::slice_from_raw_parts_mut(self.buffer.as_ptr(), self.count);

        // We forget the elements before dropping them so a panicking `Drop` cannot lead to
        // a double drop. The remaining elements are still dropped during unwinding.
        self.count = 0;

        // SAFETY: The slice covers exactly the elements that were live, which we own and which
        // the container no longer considers live.
        unsafe {
            ptr::drop_in_place(live);
        }
    }

    /// # Panics
    ///
    /// Panics if `index` is beyond one-past-the-end of the buffer.
    fn slot_ptr(&self, index: usize) -> *mut T {
        assert!(
            index <= self.capacity,
            "slot {index} is out of bounds of array container of {} with capacity {}",
            type_name::<T>(),
            self.capacity
        );

        // SAFETY: Guarded by the bounds check above, so the pointer stays within the buffer
        // or one past its end.
        unsafe { self.buffer.as_ptr().add(index) }
    }
}

fn buffer_layout<T>(capacity: usize) -> Layout {
    Layout::array::<T>(capacity).unwrap_or_else(|_| {
        panic!(
            "capacity overflow: {capacity} items of {} exceed the maximum allocation size",
            type_name::<T>()
        )
    })
}

/// Allocates an uninitialized buffer for `capacity` items of `T`.
///
/// Zero-sized layouts are not allocated; a dangling aligned pointer is returned instead.
fn allocate_buffer<T>(capacity: usize) -> NonNull<T> {
    let layout = buffer_layout::<T>(capacity);

    if layout.size() == 0 {
        return NonNull::dangling();
    }

    // SAFETY: The layout is not zero-sized (checked above).
    let ptr = unsafe { alloc::alloc(layout) };

    NonNull::new(ptr.cast::<T>()).unwrap_or_else(|| alloc::handle_alloc_error(layout))
}

/// # Safety
///
/// The buffer must have been returned by `allocate_buffer::<T>(capacity)` with the same
/// `capacity` and must not have been released yet. Any elements it contained must already have
/// been dropped or moved out.
unsafe fn release_buffer<T>(buffer: NonNull<T>, capacity: usize) {
    let layout = buffer_layout::<T>(capacity);

    if layout.size() == 0 {
        return;
    }

    // SAFETY: Forwarding the caller's guarantee that the pointer came from `alloc()`
    // with this exact layout.
    unsafe {
        alloc::dealloc(buffer.as_ptr().cast(), layout);
    }
}

impl<T> Default for ArrayContainer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for ArrayContainer<T> {
    fn drop(&mut self) {
        // Guarantees the buffer is released even if dropping an element panics.
        let _release = scopeguard::guard((self.buffer, self.capacity), |(buffer, capacity)| {
            // SAFETY: The buffer was allocated with our current capacity. By the time this runs,
            // every element has been dropped.
            unsafe {
                release_buffer(buffer, capacity);
            }

            if capacity != 0 {
                trace!(
                    item_type = type_name::<T>(),
                    capacity,
                    "released array container buffer"
                );
            }
        });

        self.drop_elements();
    }
}

impl<T: Clone> Clone for ArrayContainer<T> {
    /// Deep-copies the live elements into a new buffer with the same capacity.
    ///
    /// If cloning an element panics, the elements cloned so far are dropped and the new
    /// buffer is released before the panic continues.
    fn clone(&self) -> Self {
        let capacity = self.capacity;

        // Tracks (buffer, number of initialized slots) so cleanup knows what to undo.
        let mut partial = scopeguard::guard(
            (allocate_buffer::<T>(capacity), 0_usize),
            |(buffer, cloned)| {
                // SAFETY: Exactly the first `cloned` slots were initialized below.
                unsafe {
                    ptr::drop_in_place(ptr::slice_from_raw_parts_mut(buffer.as_ptr(), cloned));
                }

                // SAFETY: The buffer was allocated above with `capacity` and its elements
                // have just been dropped.
                unsafe {
                    release_buffer(buffer, capacity);
                }
            },
        );

        for item in self {
            let value = item.clone();
            let (buffer, cloned) = &mut *partial;

            // SAFETY: `cloned < count <= capacity`, so the slot is within the new buffer
            // and not yet initialized.
            unsafe {
                buffer.as_ptr().add(*cloned).write(value);
            }

            *cloned = cloned
                .checked_add(1)
                .expect("guarded by cloned < count <= capacity");
        }

        let (buffer, cloned) = ScopeGuard::into_inner(partial);

        Self {
            buffer,
            count: cloned,
            capacity,
            clear_policy: self.clear_policy,
            _owns: PhantomData,
        }
    }

    /// Replaces the contents of `self` with a deep copy of `source`.
    ///
    /// The copy is fully built before `self` is touched, so if cloning an element panics,
    /// `self` keeps its previous contents.
    fn clone_from(&mut self, source: &Self) {
        let copy = source.clone();
        *self = copy;
    }
}

impl<T: fmt::Debug> fmt::Debug for ArrayContainer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for ArrayContainer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for ArrayContainer<T> {}

impl<T> FromIterator<T> for ArrayContainer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Self::new();
        array.extend(iter);
        array
    }
}

impl<T> Extend<T> for ArrayContainer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();

        let (lower_bound, _) = iter.size_hint();
        self.reserve(self.count.saturating_add(lower_bound));

        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T, const N: usize> From<[T; N]> for ArrayContainer<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a ArrayContainer<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut ArrayContainer<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for ArrayContainer<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        // The iterator takes over the buffer, so the container must not release it.
        let array = ManuallyDrop::new(self);

        IntoIter {
            buffer: array.buffer,
            capacity: array.capacity,
            front: 0,
            back: array.count,
            _owns: PhantomData,
        }
    }
}

// SAFETY: Yes, there are raw pointers involved here but nothing inherently non-thread-mobile
// about it, so as long as T itself can move between threads, the container can do so, too.
unsafe impl<T: Send> Send for ArrayContainer<T> {}

// SAFETY: Shared references to the container only ever hand out shared references to the
// elements, so sharing the container is as safe as sharing the elements.
unsafe impl<T: Sync> Sync for ArrayContainer<T> {}

/// An iterator that moves the elements out of an [`ArrayContainer`], in order.
///
/// Elements that are not consumed are dropped together with the iterator.
pub struct IntoIter<T> {
    buffer: NonNull<T>,
    capacity: usize,

    /// The slots `[front, back)` still hold live elements.
    front: usize,
    back: usize,

    _owns: PhantomData<T>,
}

impl<T> IntoIter<T> {
    fn remaining(&self) -> usize {
        self.back
            .checked_sub(self.front)
            .expect("front never passes back")
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        let index = self.front;
        self.front = index.checked_add(1).expect("guarded by front < back");

        // SAFETY: `index < back <= capacity` so the slot is in bounds and holds a live element,
        // which is no longer considered live after advancing `front` above.
        let slot = unsafe { self.buffer.as_ptr().add(index) };

        // SAFETY: See above.
        Some(unsafe { slot.read() })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        self.back = self.back.checked_sub(1).expect("guarded by front < back");

        // SAFETY: `front <= back < capacity` so the slot is in bounds and holds a live element,
        // which is no longer considered live after moving `back` above.
        let slot = unsafe { self.buffer.as_ptr().add(self.back) };

        // SAFETY: See above.
        Some(unsafe { slot.read() })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // SAFETY: `front <= capacity`, so the pointer stays within the buffer or one past its end.
        let first_remaining = unsafe { self.buffer.as_ptr().add(self.front) };
        let remaining = ptr::slice_from_raw_parts_mut(first_remaining, self.remaining());

        // Guarantees the buffer is released even if dropping an element panics.
        let _release = scopeguard::guard((self.buffer, self.capacity), |(buffer, capacity)| {
            // SAFETY: The buffer came from the container, which allocated it with this capacity.
            // By the time this runs, every remaining element has been dropped.
            unsafe {
                release_buffer(buffer, capacity);
            }
        });

        // SAFETY: The slots `[front, back)` hold the elements that were not yet consumed.
        unsafe {
            ptr::drop_in_place(remaining);
        }
    }
}

impl<T> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("remaining", &self.remaining())
            .finish_non_exhaustive()
    }
}

// SAFETY: Same reasoning as for the container itself; the iterator owns the remaining elements.
unsafe impl<T: Send> Send for IntoIter<T> {}

// SAFETY: The iterator exposes no shared access to its elements at all.
unsafe impl<T: Sync> Sync for IntoIter<T> {}

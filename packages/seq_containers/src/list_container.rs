use std::any::type_name;
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use tracing::trace;

use crate::{Error, Result, check_element_index, check_insert_index};

/// A doubly-linked list where every element lives in its own heap-allocated node.
///
/// Pushing and popping at either end is O(1). Indexed access, insertion and removal walk the
/// chain from whichever end is closer to the index, so they are O(n).
///
/// A node is allocated exactly when an element is inserted and released exactly when that
/// element is removed, so the list never holds spare memory.
///
/// # Failure behavior
///
/// Every operation that validates its input returns an [`Error`] on invalid input and leaves the
/// list exactly as it was. Cloning a list whose element `Clone` panics part-way releases the
/// partially built copy and leaves the source untouched.
///
/// # Ownership transfer
///
/// Moving a list is O(1) regardless of its length. Use [`std::mem::take()`] to move the
/// elements out while leaving an empty list behind.
///
/// # Example
///
/// ```rust
/// use seq_containers::ListContainer;
///
/// let mut list = ListContainer::new();
///
/// list.push_back(2);
/// list.push_front(1);
/// list.push_back(4);
/// list.insert(2, 3).unwrap();
///
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
///
/// assert_eq!(list.pop_front(), Ok(1));
/// assert_eq!(list.erase(1), Ok(3));
/// assert_eq!(*list.at(1).unwrap(), 4);
/// ```
pub struct ListContainer<T> {
    /// First node of the chain. The list owns every node reachable from here.
    head: Option<NonNull<Node<T>>>,

    /// Last node of the chain. Purely navigational.
    tail: Option<NonNull<Node<T>>>,

    count: usize,

    // We own boxed nodes and will drop them.
    _owns: PhantomData<Box<Node<T>>>,
}

struct Node<T> {
    value: T,

    // Neither link owns the node it points to; ownership belongs to the list as a whole.
    prev: Option<NonNull<Node<T>>>,
    next: Option<NonNull<Node<T>>>,
}

impl<T> Node<T> {
    /// Allocates a new node. The caller becomes responsible for eventually releasing it via
    /// `Box::from_raw()`.
    fn allocate(
        value: T,
        prev: Option<NonNull<Self>>,
        next: Option<NonNull<Self>>,
    ) -> NonNull<Self> {
        NonNull::from(Box::leak(Box::new(Self { value, prev, next })))
    }
}

impl<T> ListContainer<T> {
    /// Creates a new empty list. No memory is allocated until the first element is inserted.
    ///
    /// # Example
    ///
    /// ```rust
    /// use seq_containers::ListContainer;
    ///
    /// let list = ListContainer::<String>::new();
    ///
    /// assert!(list.is_empty());
    /// assert_eq!(list.len(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self {
            head: None,
            tail: None,
            count: 0,
            _owns: PhantomData,
        }
    }

    /// The number of elements in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the list has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Appends an element to the end of the list.
    pub fn push_back(&mut self, value: T) {
        let node = Node::allocate(value, self.tail, None);

        match self.tail {
            // SAFETY: The tail is a live node owned by this list and we hold `&mut self`,
            // so no other reference to it exists.
            Some(mut old_tail) => unsafe { old_tail.as_mut().next = Some(node) },
            None => self.head = Some(node),
        }

        self.tail = Some(node);
        self.increment_count();
    }

    /// Prepends an element to the start of the list.
    pub fn push_front(&mut self, value: T) {
        let node = Node::allocate(value, None, self.head);

        match self.head {
            // SAFETY: The head is a live node owned by this list and we hold `&mut self`,
            // so no other reference to it exists.
            Some(mut old_head) => unsafe { old_head.as_mut().prev = Some(node) },
            None => self.tail = Some(node),
        }

        self.head = Some(node);
        self.increment_count();
    }

    /// Removes the last element and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the list is empty.
    pub fn pop_back(&mut self) -> Result<T> {
        let old_tail = self.tail.ok_or(Error::EmptyContainer)?;

        // SAFETY: The tail is a live node owned by this list.
        let new_tail = unsafe { old_tail.as_ref() }.prev;

        match new_tail {
            // SAFETY: The node before the tail is live and owned by this list.
            Some(mut new_tail) => unsafe { new_tail.as_mut().next = None },
            None => self.head = None,
        }

        self.tail = new_tail;
        self.decrement_count();

        // SAFETY: The node came from `Node::allocate()` and is no longer reachable from the
        // list, so we are the only owner and release it exactly once.
        let node = unsafe { Box::from_raw(old_tail.as_ptr()) };

        Ok(node.value)
    }

    /// Removes the first element and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the list is empty.
    pub fn pop_front(&mut self) -> Result<T> {
        let old_head = self.head.ok_or(Error::EmptyContainer)?;

        // SAFETY: The head is a live node owned by this list.
        let new_head = unsafe { old_head.as_ref() }.next;

        match new_head {
            // SAFETY: The node after the head is live and owned by this list.
            Some(mut new_head) => unsafe { new_head.as_mut().prev = None },
            None => self.tail = None,
        }

        self.head = new_head;
        self.decrement_count();

        // SAFETY: The node came from `Node::allocate()` and is no longer reachable from the
        // list, so we are the only owner and release it exactly once.
        let node = unsafe { Box::from_raw(old_head.as_ptr()) };

        Ok(node.value)
    }

    /// Inserts an element so that it ends up at position `index`.
    ///
    /// `index == 0` is the same as [`push_front()`][Self::push_front] and `index == len()`
    /// is the same as [`push_back()`][Self::push_back].
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index > len()`. The list is not modified in
    /// that case.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        check_insert_index(index, self.count)?;

        if index == 0 {
            self.push_front(value);
            return Ok(());
        }

        if index == self.count {
            self.push_back(value);
            return Ok(());
        }

        let mut successor = self.node_at(index);

        // SAFETY: `node_at()` returns a live node owned by this list.
        let mut predecessor = unsafe { successor.as_ref() }
            .prev
            .expect("a node at a non-zero index always has a predecessor");

        let node = Node::allocate(value, Some(predecessor), Some(successor));

        // SAFETY: The predecessor is a live node owned by this list and distinct from
        // the successor, so the two exclusive references do not alias.
        unsafe {
            predecessor.as_mut().next = Some(node);
        }

        // SAFETY: See above.
        unsafe {
            successor.as_mut().prev = Some(node);
        }

        self.increment_count();

        trace!(
            item_type = type_name::<T>(),
            index,
            len = self.count,
            "spliced node into list container"
        );

        #[cfg(debug_assertions)]
        self.integrity_check();

        Ok(())
    }

    /// Removes the element at `index` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len()`.
    pub fn erase(&mut self, index: usize) -> Result<T> {
        check_element_index(index, self.count)?;

        if index == 0 {
            return self.pop_front();
        }

        let last_index = self
            .count
            .checked_sub(1)
            .expect("guarded by index < count above");

        if index == last_index {
            return self.pop_back();
        }

        let node = self.node_at(index);

        // SAFETY: `node_at()` returns a live node owned by this list.
        let node_ref = unsafe { node.as_ref() };

        let mut predecessor = node_ref
            .prev
            .expect("an interior node always has a predecessor");
        let mut successor = node_ref
            .next
            .expect("an interior node always has a successor");

        // SAFETY: The neighbors are live nodes owned by this list and distinct from each other,
        // so the two exclusive references do not alias.
        unsafe {
            predecessor.as_mut().next = Some(successor);
        }

        // SAFETY: See above.
        unsafe {
            successor.as_mut().prev = Some(predecessor);
        }

        self.decrement_count();

        // SAFETY: The node came from `Node::allocate()` and both neighbors have been relinked
        // past it, so it is unreachable and we release it exactly once.
        let node = unsafe { Box::from_raw(node.as_ptr()) };

        trace!(
            item_type = type_name::<T>(),
            index,
            len = self.count,
            "unlinked node from list container"
        );

        #[cfg(debug_assertions)]
        self.integrity_check();

        Ok(node.value)
    }

    /// Returns a shared reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len()`.
    pub fn at(&self, index: usize) -> Result<&T> {
        check_element_index(index, self.count)?;

        let node = self.node_at(index);

        // SAFETY: The node is live and owned by this list. The returned reference borrows
        // `self`, so the node cannot be released while the reference exists.
        Ok(unsafe { &node.as_ref().value })
    }

    /// Returns an exclusive reference to the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len()`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        check_element_index(index, self.count)?;

        let mut node = self.node_at(index);

        // SAFETY: The node is live and owned by this list. The returned reference exclusively
        // borrows `self`, so no other reference to the node can be created meanwhile.
        Ok(unsafe { &mut node.as_mut().value })
    }

    /// Returns a shared reference to the first element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the list is empty.
    pub fn front(&self) -> Result<&T> {
        let head = self.head.ok_or(Error::EmptyContainer)?;

        // SAFETY: The head is live and owned by this list; the reference borrows `self`.
        Ok(unsafe { &head.as_ref().value })
    }

    /// Returns an exclusive reference to the first element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the list is empty.
    pub fn front_mut(&mut self) -> Result<&mut T> {
        let mut head = self.head.ok_or(Error::EmptyContainer)?;

        // SAFETY: The head is live and owned by this list; the reference exclusively
        // borrows `self`.
        Ok(unsafe { &mut head.as_mut().value })
    }

    /// Returns a shared reference to the last element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the list is empty.
    pub fn back(&self) -> Result<&T> {
        let tail = self.tail.ok_or(Error::EmptyContainer)?;

        // SAFETY: The tail is live and owned by this list; the reference borrows `self`.
        Ok(unsafe { &tail.as_ref().value })
    }

    /// Returns an exclusive reference to the last element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the list is empty.
    pub fn back_mut(&mut self) -> Result<&mut T> {
        let mut tail = self.tail.ok_or(Error::EmptyContainer)?;

        // SAFETY: The tail is live and owned by this list; the reference exclusively
        // borrows `self`.
        Ok(unsafe { &mut tail.as_mut().value })
    }

    /// Removes all elements, releasing every node.
    pub fn clear(&mut self) {
        // Popping one at a time keeps the list consistent even if dropping an element panics.
        while self.pop_front().is_ok() {}
    }

    /// Iterates over shared references to the elements, from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            head: self.head,
            tail: self.tail,
            remaining: self.count,
            _list: PhantomData,
        }
    }

    /// Iterates over exclusive references to the elements, from front to back.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut {
            head: self.head,
            tail: self.tail,
            remaining: self.count,
            _list: PhantomData,
        }
    }

    /// # Panics
    ///
    /// Panics if `index` does not refer to an element.
    fn node_at(&self, index: usize) -> NonNull<Node<T>> {
        assert!(
            index < self.count,
            "node {index} is out of bounds of list container of {} with length {}",
            type_name::<T>(),
            self.count
        );

        let from_back = self
            .count
            .checked_sub(1)
            .and_then(|last| last.checked_sub(index))
            .expect("guarded by index < count above");

        if index <= from_back {
            let mut node = self.head.expect("a non-empty list has a head");

            for _ in 0..index {
                // SAFETY: Every node reachable from the head is live and owned by this list.
                node = unsafe { node.as_ref() }
                    .next
                    .expect("guarded by index < count");
            }

            node
        } else {
            let mut node = self.tail.expect("a non-empty list has a tail");

            for _ in 0..from_back {
                // SAFETY: Every node reachable from the tail is live and owned by this list.
                node = unsafe { node.as_ref() }
                    .prev
                    .expect("guarded by index < count");
            }

            node
        }
    }

    fn increment_count(&mut self) {
        self.count = self
            .count
            .checked_add(1)
            .expect("cannot have more nodes than addressable memory");
    }

    fn decrement_count(&mut self) {
        self.count = self
            .count
            .checked_sub(1)
            .expect("only called after removing a node that was counted");
    }

    #[cfg_attr(test, mutants::skip)] // This is essentially test logic, mutation is meaningless.
    #[cfg(any(test, debug_assertions))]
    pub(crate) fn integrity_check(&self) {
        assert!(
            self.head.is_none() == self.tail.is_none(),
            "head and tail disagree on emptiness in list container of {}",
            type_name::<T>()
        );
        assert!(
            self.head.is_none() == (self.count == 0),
            "head presence does not match count {} in list container of {}",
            self.count,
            type_name::<T>()
        );

        let mut observed_count: usize = 0;
        let mut expected_prev: Option<NonNull<Node<T>>> = None;
        let mut cursor = self.head;

        while let Some(node) = cursor {
            // SAFETY: Every node reachable from the head is live and owned by this list.
            let node_ref = unsafe { node.as_ref() };

            assert!(
                node_ref.prev == expected_prev,
                "node {observed_count} has a prev link that does not point at its predecessor in list container of {}",
                type_name::<T>()
            );

            observed_count = observed_count
                .checked_add(1)
                .expect("cannot have more nodes than addressable memory");

            assert!(
                observed_count <= self.count,
                "chain is longer than count {} in list container of {}",
                self.count,
                type_name::<T>()
            );

            expected_prev = Some(node);
            cursor = node_ref.next;
        }

        assert!(
            expected_prev == self.tail,
            "last node of the chain is not the tail in list container of {}",
            type_name::<T>()
        );
        assert!(
            observed_count == self.count,
            "self.count {} does not match the observed node count {} in list container of {}",
            self.count,
            observed_count,
            type_name::<T>()
        );
    }
}

impl<T> Default for ListContainer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for ListContainer<T> {
    fn drop(&mut self) {
        // If dropping an element panics, the guard keeps releasing the remaining nodes
        // while unwinding.
        let mut remaining = scopeguard::guard(self, |list| list.clear());

        remaining.clear();
    }
}

impl<T: Clone> Clone for ListContainer<T> {
    /// Deep-copies the list by appending a clone of every element, front to back,
    /// into a new list.
    ///
    /// If cloning an element panics, the partially built copy is dropped and the source
    /// is unaffected.
    fn clone(&self) -> Self {
        let mut copy = Self::new();

        for value in self {
            copy.push_back(value.clone());
        }

        copy
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

impl<T: fmt::Debug> fmt::Debug for ListContainer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for ListContainer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for ListContainer<T> {}

impl<T> FromIterator<T> for ListContainer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl<T> Extend<T> for ListContainer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T, const N: usize> From<[T; N]> for ListContainer<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<'a, T> IntoIterator for &'a ListContainer<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut ListContainer<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T> IntoIterator for ListContainer<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { list: self }
    }
}

// SAFETY: Yes, there are raw pointers involved here but nothing inherently non-thread-mobile
// about it, so as long as T itself can move between threads, the list can do so, too.
unsafe impl<T: Send> Send for ListContainer<T> {}

// SAFETY: Shared references to the list only ever hand out shared references to the elements,
// so sharing the list is as safe as sharing the elements.
unsafe impl<T: Sync> Sync for ListContainer<T> {}

/// An iterator over shared references to the elements of a [`ListContainer`].
pub struct Iter<'a, T> {
    head: Option<NonNull<Node<T>>>,
    tail: Option<NonNull<Node<T>>>,

    /// Guards against the two ends crossing over each other.
    remaining: usize,

    _list: PhantomData<&'a Node<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.head?;

        // SAFETY: The node is live for as long as the list is borrowed, which is `'a`.
        let node = unsafe { node.as_ref() };

        self.head = node.next;
        self.remaining = self.remaining.checked_sub(1).expect("guarded above");

        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let node = self.tail?;

        // SAFETY: The node is live for as long as the list is borrowed.
        let node = unsafe { node.as_ref() };

        self.tail = node.prev;
        self.remaining = self.remaining.checked_sub(1).expect("guarded above");

        Some(&node.value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head,
            tail: self.tail,
            remaining: self.remaining,
            _list: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

// SAFETY: The iterator only hands out shared references, equivalent to `&ListContainer<T>`.
unsafe impl<T: Sync> Send for Iter<'_, T> {}

// SAFETY: The iterator only hands out shared references, equivalent to `&ListContainer<T>`.
unsafe impl<T: Sync> Sync for Iter<'_, T> {}

/// An iterator over exclusive references to the elements of a [`ListContainer`].
pub struct IterMut<'a, T> {
    head: Option<NonNull<Node<T>>>,
    tail: Option<NonNull<Node<T>>>,

    /// Guards against the two ends crossing over each other, which would hand out
    /// two exclusive references to the same element.
    remaining: usize,

    _list: PhantomData<&'a mut Node<T>>,
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let mut node = self.head?;

        // SAFETY: The list is exclusively borrowed for `'a` and every node is yielded at most
        // once (guarded by `remaining`), so the exclusive references never alias.
        let node = unsafe { node.as_mut() };

        self.head = node.next;
        self.remaining = self.remaining.checked_sub(1).expect("guarded above");

        Some(&mut node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for IterMut<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let mut node = self.tail?;

        // SAFETY: See `next()`.
        let node = unsafe { node.as_mut() };

        self.tail = node.prev;
        self.remaining = self.remaining.checked_sub(1).expect("guarded above");

        Some(&mut node.value)
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}

impl<T> fmt::Debug for IterMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

// SAFETY: The iterator is equivalent to `&mut ListContainer<T>`.
unsafe impl<T: Send> Send for IterMut<'_, T> {}

// SAFETY: The iterator is equivalent to `&mut ListContainer<T>`.
unsafe impl<T: Sync> Sync for IterMut<'_, T> {}

/// An iterator that moves the elements out of a [`ListContainer`], from front to back.
///
/// Elements that are not consumed are dropped together with the iterator.
pub struct IntoIter<T> {
    list: ListContainer<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.list.pop_front().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.list.len(), Some(self.list.len()))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.list.pop_back().ok()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntoIter")
            .field("item_type", &format_args!("{}", type_name::<T>()))
            .field("remaining", &self.list.len())
            .finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::mem;
    use std::panic::{self, AssertUnwindSafe};
    use std::rc::Rc;

    use static_assertions::{assert_impl_all, assert_not_impl_any};
    use testing::{CloneFuse, DropTracker, PanicOnDrop};

    use super::*;

    assert_impl_all!(ListContainer<u32>: Send, Sync, Default, Clone);
    assert_not_impl_any!(ListContainer<Rc<u32>>: Send, Sync);
    assert_impl_all!(Iter<'static, u32>: Send, Sync, ExactSizeIterator, DoubleEndedIterator);
    assert_impl_all!(IntoIter<u32>: Send, Sync, ExactSizeIterator, DoubleEndedIterator);

    fn contents<T: Copy>(list: &ListContainer<T>) -> Vec<T> {
        list.iter().copied().collect()
    }

    #[test]
    fn smoke_test() {
        let mut list = ListContainer::new();
        assert!(list.is_empty());

        list.push_back(10);
        list.push_back(20);

        assert_eq!(list.len(), 2);
        assert_eq!(*list.at(0).unwrap(), 10);
        assert_eq!(*list.at(1).unwrap(), 20);

        assert_eq!(list.pop_back(), Ok(20));
        assert_eq!(list.len(), 1);
        assert_eq!(*list.at(0).unwrap(), 10);

        list.integrity_check();
    }

    #[test]
    fn push_front_and_back() {
        let mut list = ListContainer::new();

        list.push_front(10);
        list.push_back(20);
        list.push_front(5);

        assert_eq!(list.front(), Ok(&5));
        assert_eq!(list.back(), Ok(&20));
        assert_eq!(contents(&list), vec![5, 10, 20]);

        list.integrity_check();
    }

    #[test]
    fn node_links_are_mutual() {
        let mut list = ListContainer::new();
        list.push_back(10);
        list.push_back(20);

        let head = list.head.unwrap();
        let tail = list.tail.unwrap();

        // SAFETY: Both nodes are live and owned by the list, which we do not mutate here.
        let head_ref = unsafe { head.as_ref() };
        // SAFETY: See above.
        let tail_ref = unsafe { tail.as_ref() };

        assert_eq!(head_ref.next, Some(tail));
        assert_eq!(tail_ref.prev, Some(head));
        assert_eq!(head_ref.prev, None);
        assert_eq!(tail_ref.next, None);
    }

    #[test]
    fn pop_front_and_back() {
        let mut list = ListContainer::from([5, 10, 15]);

        assert_eq!(list.pop_front(), Ok(5));
        assert_eq!(list.front(), Ok(&10));
        assert_eq!(list.len(), 2);

        assert_eq!(list.pop_back(), Ok(15));
        assert_eq!(list.pop_back(), Ok(10));

        assert!(list.is_empty());
        assert!(list.head.is_none());
        assert!(list.tail.is_none());
        list.integrity_check();
    }

    #[test]
    fn pop_on_empty_is_error() {
        let mut list = ListContainer::<u32>::new();

        assert_eq!(list.pop_front(), Err(Error::EmptyContainer));
        assert_eq!(list.pop_back(), Err(Error::EmptyContainer));
        assert!(list.is_empty());
        list.integrity_check();
    }

    #[test]
    fn ends_access_on_empty_is_error() {
        let mut list = ListContainer::<u32>::new();

        assert_eq!(list.front(), Err(Error::EmptyContainer));
        assert_eq!(list.back(), Err(Error::EmptyContainer));
        assert_eq!(list.front_mut(), Err(Error::EmptyContainer));
        assert_eq!(list.back_mut(), Err(Error::EmptyContainer));
    }

    #[test]
    fn ends_access_mut() {
        let mut list = ListContainer::from([1, 2, 3]);

        *list.front_mut().unwrap() = 10;
        *list.back_mut().unwrap() = 30;

        assert_eq!(contents(&list), vec![10, 2, 30]);
    }

    #[test]
    fn insert_in_middle() {
        let mut list = ListContainer::from([10, 30]);

        list.insert(1, 20).unwrap();

        assert_eq!(list.len(), 3);
        assert_eq!(contents(&list), vec![10, 20, 30]);
    }

    #[test]
    fn insert_at_boundaries() {
        let mut list = ListContainer::new();

        list.insert(0, 2).unwrap();
        list.insert(0, 1).unwrap();
        list.insert(2, 4).unwrap();
        list.insert(2, 3).unwrap();

        assert_eq!(contents(&list), vec![1, 2, 3, 4]);
        list.integrity_check();
    }

    #[test]
    fn insert_out_of_range_changes_nothing() {
        let mut list = ListContainer::from([0, 1, 2]);

        assert_eq!(
            list.insert(4, 99),
            Err(Error::IndexOutOfRange { index: 4, len: 3 })
        );
        assert_eq!(contents(&list), vec![0, 1, 2]);
        list.integrity_check();
    }

    #[test]
    fn erase_in_middle_and_at_boundaries() {
        let mut list = ListContainer::from([10, 20, 30, 40, 50]);

        assert_eq!(list.erase(2), Ok(30));
        assert_eq!(contents(&list), vec![10, 20, 40, 50]);

        assert_eq!(list.erase(0), Ok(10));
        assert_eq!(list.erase(2), Ok(50));
        assert_eq!(contents(&list), vec![20, 40]);

        assert_eq!(list.erase(1), Ok(40));
        assert_eq!(list.erase(0), Ok(20));
        assert!(list.is_empty());
        list.integrity_check();
    }

    #[test]
    fn erase_out_of_range_changes_nothing() {
        let mut list = ListContainer::from([0, 1, 2]);

        assert_eq!(
            list.erase(3),
            Err(Error::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(contents(&list), vec![0, 1, 2]);

        let mut empty = ListContainer::<u32>::new();
        assert_eq!(
            empty.erase(0),
            Err(Error::IndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn insert_then_erase_round_trips() {
        let original: ListContainer<u32> = (0..7).collect();

        for index in 0..=original.len() {
            let mut list = original.clone();

            list.insert(index, 1234).unwrap();
            assert_eq!(*list.at(index).unwrap(), 1234);
            assert_eq!(list.erase(index), Ok(1234));

            assert_eq!(list, original);
            list.integrity_check();
        }
    }

    #[test]
    fn at_walks_from_either_end() {
        let mut list: ListContainer<usize> = (0..9).collect();

        for index in 0..9 {
            assert_eq!(*list.at(index).unwrap(), index);
        }

        *list.at_mut(7).unwrap() = 70;
        *list.at_mut(1).unwrap() = 10;

        assert_eq!(contents(&list), vec![0, 10, 2, 3, 4, 5, 6, 70, 8]);
    }

    #[test]
    fn at_out_of_range_is_error() {
        let mut list = ListContainer::<u32>::new();

        assert_eq!(
            list.at(0),
            Err(Error::IndexOutOfRange { index: 0, len: 0 })
        );

        list.push_back(1);

        assert_eq!(
            list.at_mut(1),
            Err(Error::IndexOutOfRange { index: 1, len: 1 })
        );
    }

    #[test]
    fn clear_empties_list() {
        let mut list = ListContainer::from([10, 20]);

        list.clear();

        assert_eq!(list.len(), 0);
        assert!(list.is_empty());
        list.integrity_check();

        // Still usable afterwards.
        list.push_back(30);
        assert_eq!(contents(&list), vec![30]);
    }

    #[test]
    fn clone_is_independent() {
        let mut original = ListContainer::from([100]);
        let mut copy = original.clone();

        copy.push_back(200);
        assert_eq!(original.len(), 1);
        assert_eq!(copy.len(), 2);

        original.push_front(50);
        copy.erase(0).unwrap();

        assert_eq!(contents(&original), vec![50, 100]);
        assert_eq!(contents(&copy), vec![200]);

        original.integrity_check();
        copy.integrity_check();
    }

    #[test]
    fn clone_from_replaces_contents() {
        let source = ListContainer::from([1, 2, 3]);
        let mut target = ListContainer::from([9, 9]);

        target.clone_from(&source);

        assert_eq!(target, source);
    }

    #[test]
    fn panicking_clone_leaks_nothing() {
        let tracker = DropTracker::new();
        let fuse = CloneFuse::new(2);

        let list: ListContainer<_> = (0..4).map(|i| tracker.track(fuse.arm(i))).collect();

        let result = panic::catch_unwind(AssertUnwindSafe(|| list.clone()));
        assert!(result.is_err());

        assert_eq!(tracker.live(), 4);
        assert_eq!(list.len(), 4);
        list.integrity_check();
    }

    #[test]
    fn panicking_clone_from_keeps_target() {
        let tracker = DropTracker::new();
        let fuse = CloneFuse::new(1);

        let source: ListContainer<_> = (0..3).map(|i| tracker.track(fuse.arm(i))).collect();
        let mut target = ListContainer::new();
        target.push_back(tracker.track(fuse.arm(42)));

        let result = panic::catch_unwind(AssertUnwindSafe(|| target.clone_from(&source)));
        assert!(result.is_err());

        assert_eq!(target.len(), 1);
        assert_eq!(target.front().unwrap().value(), 42);
        assert_eq!(source.len(), 3);
        assert_eq!(tracker.live(), 4);
        target.integrity_check();
        source.integrity_check();
    }

    #[test]
    fn panicking_element_drop_still_drops_the_rest() {
        let tracker = DropTracker::new();

        let mut list = ListContainer::new();
        list.push_back(tracker.track(PanicOnDrop::defused()));
        list.push_back(tracker.track(PanicOnDrop::armed()));
        list.push_back(tracker.track(PanicOnDrop::defused()));
        list.push_back(tracker.track(PanicOnDrop::defused()));

        let result = panic::catch_unwind(AssertUnwindSafe(move || drop(list)));
        assert!(result.is_err());

        assert_eq!(tracker.live(), 0);
        assert_eq!(tracker.dropped(), 4);
    }

    #[test]
    fn panicking_element_drop_during_clear_keeps_list_consistent() {
        let tracker = DropTracker::new();

        let mut list = ListContainer::new();
        list.push_back(tracker.track(PanicOnDrop::defused()));
        list.push_back(tracker.track(PanicOnDrop::armed()));
        list.push_back(tracker.track(PanicOnDrop::defused()));

        let result = panic::catch_unwind(AssertUnwindSafe(|| list.clear()));
        assert!(result.is_err());

        // The node was unlinked before its element was dropped, so only the tail is left.
        assert_eq!(list.len(), 1);
        list.integrity_check();

        drop(list);
        assert_eq!(tracker.live(), 0);
    }

    #[test]
    fn take_leaves_empty_source() {
        let mut source = ListContainer::from([42]);

        let destination = mem::take(&mut source);

        assert!(source.is_empty());
        assert_eq!(source.len(), 0);
        assert!(source.head.is_none());
        assert!(source.tail.is_none());
        assert_eq!(destination.front(), Ok(&42));
    }

    #[test]
    fn every_element_dropped_exactly_once() {
        let tracker = DropTracker::new();

        {
            let mut list = ListContainer::new();

            list.push_back(tracker.track(()));
            list.push_back(tracker.track(()));
            assert_eq!(tracker.live(), 2);

            list.push_front(tracker.track(()));
            list.insert(1, tracker.track(())).unwrap();
            drop(list.erase(2).unwrap());
            drop(list.pop_front().unwrap());
            assert_eq!(tracker.live(), 2);

            let copy = list.clone();
            assert_eq!(tracker.live(), 4);
            drop(copy);
        }

        assert_eq!(tracker.live(), 0);
        assert_eq!(tracker.dropped(), 6);
    }

    #[test]
    fn iteration_in_both_directions() {
        let list = ListContainer::from([1, 2, 3]);

        let sum: i32 = list.iter().sum();
        assert_eq!(sum, 6);

        let reversed: Vec<i32> = list.iter().rev().copied().collect();
        assert_eq!(reversed, vec![3, 2, 1]);

        let mut iter = list.iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&3));
        assert_eq!(iter.next(), Some(&2));
        assert_eq!(iter.next_back(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn iter_mut_modifies_in_place() {
        let mut list = ListContainer::from([1, 2, 3]);

        for value in &mut list {
            *value *= 2;
        }

        assert_eq!(contents(&list), vec![2, 4, 6]);
    }

    #[test]
    fn into_iter_drops_rest() {
        let tracker = DropTracker::new();
        let list: ListContainer<_> = (0..5).map(|i| tracker.track(i)).collect();

        let mut iter = list.into_iter();
        assert_eq!(*iter.next().unwrap(), 0);
        assert_eq!(*iter.next_back().unwrap(), 4);
        assert_eq!(iter.len(), 3);

        drop(iter);
        assert_eq!(tracker.live(), 0);
    }

    #[test]
    fn debug_formats_as_list() {
        let list = ListContainer::from(["a", "b"]);

        assert_eq!(format!("{list:?}"), r#"["a", "b"]"#);
    }
}

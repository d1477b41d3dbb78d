#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(coverage_nightly, coverage(off))] // This is all test code, no need to test it.

//! Private helpers for testing and examples in the container packages.
//!
//! The element types here make the resource behavior of a container observable: how many
//! values are alive at any point, and what happens when cloning fails half-way.

use std::cell::Cell;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::rc::Rc;

#[derive(Debug, Default)]
struct Counters {
    live: Cell<usize>,
    dropped: Cell<usize>,
}

/// Counts how many [`Tracked`] values created through it are alive and how many were dropped.
///
/// Clones of a tracked value are counted, too, which makes it easy to detect both leaks
/// (live count stays above zero) and double drops (dropped count too high).
///
/// # Example
///
/// ```rust
/// use testing::DropTracker;
///
/// let tracker = DropTracker::new();
///
/// let a = tracker.track("a");
/// let b = a.clone();
/// assert_eq!(tracker.live(), 2);
///
/// drop(a);
/// drop(b);
/// assert_eq!(tracker.live(), 0);
/// assert_eq!(tracker.dropped(), 2);
/// ```
#[derive(Debug, Default)]
pub struct DropTracker {
    counters: Rc<Counters>,
}

impl DropTracker {
    /// Creates a tracker with no live values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a value so that its lifetime is counted by this tracker.
    #[must_use]
    pub fn track<T>(&self, value: T) -> Tracked<T> {
        increment(&self.counters.live);

        Tracked {
            value,
            counters: Rc::clone(&self.counters),
        }
    }

    /// The number of tracked values that are currently alive.
    #[must_use]
    pub fn live(&self) -> usize {
        self.counters.live.get()
    }

    /// The number of tracked values that have been dropped so far.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.counters.dropped.get()
    }
}

/// A value whose creation, cloning and dropping is counted by a [`DropTracker`].
///
/// Dereferences to the wrapped value.
pub struct Tracked<T> {
    value: T,
    counters: Rc<Counters>,
}

impl<T> Deref for Tracked<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> DerefMut for Tracked<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}

impl<T: Clone> Clone for Tracked<T> {
    fn clone(&self) -> Self {
        // Clone first, so a panicking clone is not counted as a live value.
        let value = self.value.clone();

        increment(&self.counters.live);

        Self {
            value,
            counters: Rc::clone(&self.counters),
        }
    }
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        decrement(&self.counters.live);
        increment(&self.counters.dropped);
    }
}

impl<T: fmt::Debug> fmt::Debug for Tracked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tracked").field(&self.value).finish()
    }
}

impl<T: PartialEq> PartialEq for Tracked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// A shared budget of successful clones for the [`CloneBomb`] values armed from it.
///
/// Once the budget is used up, the next clone of any of its bombs panics. This simulates an
/// element type whose copy operation can fail part-way through copying a container.
///
/// # Example
///
/// ```rust
/// use std::panic::{self, AssertUnwindSafe};
///
/// use testing::CloneFuse;
///
/// let fuse = CloneFuse::new(1);
/// let bomb = fuse.arm(7);
///
/// let copy = bomb.clone();
/// assert_eq!(copy.value(), 7);
///
/// assert!(panic::catch_unwind(AssertUnwindSafe(|| bomb.clone())).is_err());
/// ```
#[derive(Debug)]
pub struct CloneFuse {
    remaining: Rc<Cell<usize>>,
}

impl CloneFuse {
    /// Creates a fuse that allows `clones_allowed` clones before the next one panics.
    #[must_use]
    pub fn new(clones_allowed: usize) -> Self {
        Self {
            remaining: Rc::new(Cell::new(clones_allowed)),
        }
    }

    /// Creates a value that draws from this fuse whenever it is cloned.
    #[must_use]
    pub fn arm(&self, value: u32) -> CloneBomb {
        CloneBomb {
            value,
            remaining: Rc::clone(&self.remaining),
        }
    }

    /// How many more clones will succeed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining.get()
    }
}

/// A value whose `Clone` implementation panics once its [`CloneFuse`] is exhausted.
pub struct CloneBomb {
    value: u32,
    remaining: Rc<Cell<usize>>,
}

impl CloneBomb {
    /// The payload of this value, used to tell values apart in assertions.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.value
    }
}

impl Clone for CloneBomb {
    fn clone(&self) -> Self {
        let remaining = self.remaining.get();

        assert!(remaining > 0, "clone budget exhausted for value {}", self.value);

        self.remaining.set(remaining.wrapping_sub(1));

        Self {
            value: self.value,
            remaining: Rc::clone(&self.remaining),
        }
    }
}

impl fmt::Debug for CloneBomb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloneBomb")
            .field("value", &self.value)
            .field("remaining", &self.remaining.get())
            .finish()
    }
}

impl PartialEq for CloneBomb {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// A value whose `Drop` implementation panics if it was created armed.
///
/// Simulates an element type whose destructor fails part-way through destroying a container.
/// At most one armed value may be dropped per unwind, as a second panic during unwinding aborts.
///
/// # Example
///
/// ```rust
/// use std::panic;
///
/// use testing::PanicOnDrop;
///
/// drop(PanicOnDrop::defused());
///
/// assert!(panic::catch_unwind(|| drop(PanicOnDrop::armed())).is_err());
/// ```
#[derive(Debug)]
pub struct PanicOnDrop {
    armed: bool,
}

impl PanicOnDrop {
    /// Creates a value that panics when dropped.
    #[must_use]
    pub fn armed() -> Self {
        Self { armed: true }
    }

    /// Creates a value that is dropped normally.
    #[must_use]
    pub fn defused() -> Self {
        Self { armed: false }
    }
}

impl Drop for PanicOnDrop {
    fn drop(&mut self) {
        assert!(!self.armed, "dropped an armed PanicOnDrop");
    }
}

fn increment(counter: &Cell<usize>) {
    counter.set(
        counter
            .get()
            .checked_add(1)
            .expect("cannot have more values than addressable memory"),
    );
}

fn decrement(counter: &Cell<usize>) {
    counter.set(
        counter
            .get()
            .checked_sub(1)
            .expect("more values dropped than were created - this is a double drop"),
    );
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::panic::{self, AssertUnwindSafe};

    use super::*;

    #[test]
    fn tracker_counts_clones_and_drops() {
        let tracker = DropTracker::new();

        let a = tracker.track(vec![1, 2, 3]);
        let b = a.clone();

        assert_eq!(tracker.live(), 2);
        assert_eq!(*b, vec![1, 2, 3]);

        drop(a);
        assert_eq!(tracker.live(), 1);
        assert_eq!(tracker.dropped(), 1);

        drop(b);
        assert_eq!(tracker.live(), 0);
        assert_eq!(tracker.dropped(), 2);
    }

    #[test]
    fn fuse_allows_exactly_budget() {
        let fuse = CloneFuse::new(2);
        let bomb = fuse.arm(1);

        let first = bomb.clone();
        let second = first.clone();
        assert_eq!(fuse.remaining(), 0);
        assert_eq!(second.value(), 1);

        let result = panic::catch_unwind(AssertUnwindSafe(|| bomb.clone()));
        assert!(result.is_err());
    }

    #[test]
    fn failed_clone_is_not_counted_as_live() {
        let tracker = DropTracker::new();
        let fuse = CloneFuse::new(0);

        let tracked = tracker.track(fuse.arm(5));

        let result = panic::catch_unwind(AssertUnwindSafe(|| tracked.clone()));
        assert!(result.is_err());

        assert_eq!(tracker.live(), 1);
    }

    #[test]
    fn tracked_panic_on_drop_is_still_counted() {
        let tracker = DropTracker::new();

        let tracked = tracker.track(PanicOnDrop::armed());

        let result = panic::catch_unwind(AssertUnwindSafe(move || drop(tracked)));
        assert!(result.is_err());

        assert_eq!(tracker.live(), 0);
        assert_eq!(tracker.dropped(), 1);
    }
}

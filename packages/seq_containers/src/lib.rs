#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Two generic sequence containers that manage their own memory: a growable contiguous array
//! ([`ArrayContainer`]) and a doubly-linked list ([`ListContainer`]).
//!
//! Both expose the same operation surface, captured by the [`Sequence`] trait, so callers can
//! pick whichever performance trade-off suits them:
//!
//! | Operation                  | [`ArrayContainer`] | [`ListContainer`] |
//! |----------------------------|--------------------|-------------------|
//! | `push_back()`              | amortized O(1)     | O(1)              |
//! | `push_front()`             | -                  | O(1)              |
//! | `pop_back()`               | O(1)               | O(1)              |
//! | `pop_front()`              | -                  | O(1)              |
//! | `insert()` / `erase()`     | O(n)               | O(n)              |
//! | `at()`                     | O(1)               | O(n)              |
//!
//! # Resource management
//!
//! The array keeps its elements in a single heap buffer whose capacity doubles whenever it
//! runs out of room. The list allocates one node per element at the moment of insertion and
//! releases it at the moment of removal.
//!
//! Both containers are exclusively owned. Cloning deep-copies every element, moving transfers
//! ownership of the storage without touching the elements, and [`std::mem::take()`] leaves an
//! empty container behind.
//!
//! # Errors
//!
//! Invalid indexes and operations on empty containers are reported via [`Error`] and never
//! modify the container. There is no silent clamping of indexes.
//!
//! # Example
//!
//! ```rust
//! use seq_containers::{ArrayContainer, Error, ListContainer};
//!
//! let mut array: ArrayContainer<i32> = (0..10).collect();
//! let mut list: ListContainer<i32> = (0..10).collect();
//!
//! for index in [2, 3, 4] {
//!     array.erase(index)?;
//!     list.erase(index)?;
//! }
//!
//! assert_eq!(array.as_slice(), &[0, 1, 3, 5, 7, 8, 9]);
//! assert!(array.iter().eq(list.iter()));
//!
//! assert_eq!(
//!     array.at(100),
//!     Err(Error::IndexOutOfRange { index: 100, len: 7 })
//! );
//! # Ok::<(), Error>(())
//! ```

mod array_container;
mod builder;
mod clear_policy;
mod error;
mod list_container;
mod sequence;

pub use array_container::ArrayContainer;
pub use builder::*;
pub use clear_policy::*;
pub use error::Error;
pub(crate) use error::{Result, check_element_index, check_insert_index};
pub use list_container::ListContainer;
pub use sequence::*;

/// Iterator types for the containers in this crate.
pub mod iter {
    pub use crate::array_container::IntoIter as ArrayIntoIter;
    pub use crate::list_container::{
        IntoIter as ListIntoIter, Iter as ListIter, IterMut as ListIterMut,
    };
}

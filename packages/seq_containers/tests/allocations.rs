//! Verifies the allocation behavior of the containers with a tracking global allocator.

#![cfg(not(miri))] // Miri replaces the global allocator, so cannot be used here.

use std::hint::black_box;

use alloc_tracker::{Allocator, Session};
use seq_containers::{ArrayContainer, ListContainer};

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

/// Runs every code path once outside of any measurement, so one-time setup (such as the
/// registration of log callsites) does not show up in the measured spans.
fn warm_up() {
    let mut array = ArrayContainer::<u64>::new();
    for value in 0..8 {
        array.push_back(value);
    }
    array.insert(1, 0).unwrap();
    array.erase(1).unwrap();
    array.clear();
    drop(ArrayContainer::from([1_u64]));

    let mut list: ListContainer<u64> = (0..3).collect();
    list.insert(1, 0).unwrap();
    list.erase(1).unwrap();
    list.clear();
}

#[test]
fn empty_containers_do_not_allocate() {
    let session = Session::new();
    let mut op = session.operation("empty_containers");

    {
        let _span = op.measure_thread();

        drop(black_box(ArrayContainer::<u64>::new()));
        drop(black_box(ListContainer::<u64>::new()));
    }

    assert_eq!(op.total_bytes_allocated(), 0);
}

#[test]
fn pushes_within_reserved_capacity_do_not_allocate() {
    warm_up();

    let mut array = ArrayContainer::<u64>::with_capacity(64);

    let session = Session::new();
    let mut op = session.operation("push_within_capacity");

    {
        let _span = op.measure_thread();

        for value in 0..64 {
            array.push_back(black_box(value));
        }
    }

    assert_eq!(op.total_bytes_allocated(), 0);
    assert_eq!(array.capacity(), 64);
}

#[test]
fn growth_allocates_each_doubled_buffer() {
    warm_up();

    let session = Session::new();
    let mut op = session.operation("grow_to_8");

    {
        let _span = op.measure_thread();

        let mut array = ArrayContainer::<u64>::new();
        for value in 0..8 {
            array.push_back(black_box(value));
        }
        black_box(&array);
    }

    // Buffers of 1, 2, 4 and 8 slots.
    let expected_bytes = (1 + 2 + 4 + 8) * size_of::<u64>() as u64;
    assert_eq!(op.total_bytes_allocated(), expected_bytes);
}

#[test]
fn list_allocates_one_node_per_push() {
    warm_up();

    let mut list = ListContainer::<u64>::new();

    let session = Session::new();
    let mut op = session.operation("list_push");

    {
        let _span = op.measure_thread();

        list.push_back(black_box(1));
    }

    let one_node = op.total_bytes_allocated();
    assert!(one_node >= size_of::<u64>() as u64);

    {
        let _span = op.measure_thread();

        list.push_front(black_box(2));
        list.insert(1, black_box(3)).unwrap();
    }

    assert_eq!(op.total_bytes_allocated(), one_node * 3);
}

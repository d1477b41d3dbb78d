//! Runs the same sequence of edits against both containers and prints the contents after
//! every step.
//!
//! Set `RUST_LOG=trace` to see buffer reallocations and node splicing on stderr.

use std::fmt::Display;
use std::io;

use seq_containers::{ArrayContainer, Error, ListContainer, Sequence};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    println!("Testing ArrayContainer:");
    run_scenario(&mut ArrayContainer::new(), "ArrayContainer")?;

    println!();

    println!("Testing ListContainer:");
    run_scenario(&mut ListContainer::new(), "ListContainer")?;

    Ok(())
}

fn run_scenario<S: Sequence<i32>>(sequence: &mut S, name: &str) -> Result<(), Error> {
    for value in 0..10 {
        sequence.push_back(value);
    }

    print!("Initial {name}: ");
    print_sequence(sequence)?;

    // Each index applies to the container as it is after the previous removal.
    sequence.erase(2)?;
    sequence.erase(3)?;
    sequence.erase(4)?;

    print!("After removing elements: ");
    print_sequence(sequence)?;

    sequence.insert(0, 10)?;
    sequence.insert(sequence.len() / 2, 20)?;
    sequence.push_back(30);

    print!("Final {name}: ");
    print_sequence(sequence)?;

    Ok(())
}

fn print_sequence<S: Sequence<T>, T: Display>(sequence: &S) -> Result<(), Error> {
    for index in 0..sequence.len() {
        print!("{} ", sequence.at(index)?);
    }

    println!();

    Ok(())
}

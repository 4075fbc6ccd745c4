//! Error types returned by the table and its shared handle.

use thiserror::Error;

/// Rejected table configuration.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("initial capacity must not be negative, got: {0}")]
    NegativeCapacity(isize),
    #[error("load factor must be a positive finite number, got: {0}")]
    InvalidLoadFactor(f64),
    #[error("maximum capacity must be a power of two in 1..={max}, got: {got}")]
    InvalidMaxCapacity { got: usize, max: usize },
}

/// The table was structurally modified while `for_each` was walking it.
///
/// The walk is abandoned at the point of detection; the table itself stays
/// consistent and usable.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("table modified during iteration (modification count {expected} -> {observed})")]
pub struct ConcurrentModificationError {
    pub expected: u64,
    pub observed: u64,
}

/// An insert could not be placed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityError {
    /// Every slot is occupied and the capacity ceiling forbids growing.
    #[error("table is full at its maximum capacity of {capacity} slots")]
    TableFull { capacity: usize },
}

//! long-hashmap: an open-addressing hash table from `i64` keys to values,
//! sized for hot-path registries (numeric type ids to descriptors).
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small table whose collision behavior cannot be steered by
//!   whoever chooses the keys, with each layer independently testable.
//! - Layers:
//!   - HashFamily: multiply-shift hashing `(mul * k + add) >> shift` with a
//!     random odd multiplier and a random addend drawn per family.
//!   - ProbeSequence: double hashing `idx(i) = (h1 + i * h2) mod C` over a
//!     power-of-two capacity `C`, `h2` forced odd so all `C` slots are
//!     visited exactly once.
//!   - SlotTable: contiguous `Empty | Occupied { key, handle }` slots.
//!   - LongHashMap<V>: put/get/resize over the slot table; values live in
//!     a slotmap arena addressed by the slot handles.
//!   - SharedLongHashMap<V>: `Rc<RefCell<..>>` handle that lets a
//!     `for_each` visitor reach the table it is walking.
//!
//! Constraints
//! - Single-threaded, no internal locking. Mutations need an external
//!   exclusive lock if several threads can reach a table.
//! - No removal. An empty slot met while probing proves absence; adding
//!   removal would require tombstones.
//! - Seeds are drawn once per table and survive resizes; only geometry
//!   changes on growth.
//!
//! Growth and saturation
//! - After inserting a new key the table doubles while `len > threshold`,
//!   where `threshold = min(floor(C * load_factor), C - 1)`.
//! - Growth stops at the configured ceiling (at most `MAXIMUM_CAPACITY`).
//!   From then on inserts are counted in `TableStats::saturated_inserts`;
//!   once every slot is taken, `try_put` of a new key fails with
//!   `CapacityError::TableFull`.
//!
//! Iteration
//! - `for_each` captures the modification count and rechecks it; a change
//!   yields `ConcurrentModificationError`. This is fail-fast detection
//!   after the fact, not prevention, and says nothing about other threads.

pub mod config;
pub mod error;
pub mod fail_fast;
pub mod hash_family;
pub mod iter;
mod long_hash_map;
mod long_hash_map_proptest;
pub mod probe;
mod shared;
mod slots;

// Public surface
pub use config::{TableConfig, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR, MAXIMUM_CAPACITY};
pub use error::{CapacityError, ConcurrentModificationError, ConfigError};
pub use long_hash_map::{LongHashMap, TableStats};
pub use shared::SharedLongHashMap;

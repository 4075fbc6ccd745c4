//! Construction-time configuration.

use crate::error::ConfigError;
use crate::probe::Geometry;

/// Largest slot count a table grows to.
pub const MAXIMUM_CAPACITY: usize = 1 << 30;
pub const DEFAULT_CAPACITY: usize = 16;
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// Requested table shape. Checked by `validate` when a table is built.
///
/// `initial_capacity` is signed so a negative request is reported as
/// `ConfigError::NegativeCapacity` instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableConfig {
    pub initial_capacity: isize,
    pub load_factor: f64,
    pub max_capacity: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY as isize,
            load_factor: DEFAULT_LOAD_FACTOR,
            max_capacity: MAXIMUM_CAPACITY,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initial_capacity(mut self, capacity: isize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn load_factor(mut self, load_factor: f64) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Caps growth. Must be a power of two no larger than `MAXIMUM_CAPACITY`.
    pub fn max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = max_capacity;
        self
    }

    /// Checks the request and resolves the starting geometry.
    pub(crate) fn validate(&self) -> Result<Validated, ConfigError> {
        if self.initial_capacity < 0 {
            return Err(ConfigError::NegativeCapacity(self.initial_capacity));
        }
        if !self.load_factor.is_finite() || self.load_factor <= 0.0 {
            return Err(ConfigError::InvalidLoadFactor(self.load_factor));
        }
        if self.max_capacity == 0
            || !self.max_capacity.is_power_of_two()
            || self.max_capacity > MAXIMUM_CAPACITY
        {
            return Err(ConfigError::InvalidMaxCapacity {
                got: self.max_capacity,
                max: MAXIMUM_CAPACITY,
            });
        }
        let requested = (self.initial_capacity as usize).min(self.max_capacity);
        Ok(Validated {
            geometry: Geometry::for_capacity(requested),
            load_factor: self.load_factor,
            max_capacity: self.max_capacity,
        })
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Validated {
    pub(crate) geometry: Geometry,
    pub(crate) load_factor: f64,
    pub(crate) max_capacity: usize,
}

/// Resize trigger for `capacity`: `floor(capacity * load_factor)`, kept
/// below `capacity` so at least one slot stays empty while growth is possible.
pub(crate) fn threshold(capacity: usize, load_factor: f64) -> usize {
    let raw = (capacity as f64 * load_factor).floor();
    let limit = capacity - 1;
    if raw >= limit as f64 {
        limit
    } else {
        raw as usize
    }
}

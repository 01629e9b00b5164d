// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::{Error, Result, Table, Value};

/// Number of slots of a table created with [`Table::new`]
pub const DEFAULT_SLOT_COUNT: usize = 64;

/// Average number of records per slot before the table grows
pub const DEFAULT_MAX_LOAD_FACTOR: f32 = 8.0;

/// Smallest accepted load factor, so the growth threshold is never below the slot count
pub const MIN_MAX_LOAD_FACTOR: f32 = 1.0;

/// Table configuration builder
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Initial number of slots
    pub(crate) slot_count: usize,

    /// Records per slot at which the slot count is doubled
    pub(crate) max_load_factor: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            slot_count: DEFAULT_SLOT_COUNT,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
        }
    }
}

impl Config {
    /// Initializes a new config
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial number of slots.
    ///
    /// Must be at least 1.
    ///
    /// Default = 64
    #[must_use]
    pub fn slot_count(mut self, n: usize) -> Self {
        self.slot_count = n;
        self
    }

    /// Sets the average number of records per slot that triggers growth.
    ///
    /// Must be a finite number of at least 1.0.
    ///
    /// Lower values keep slot scans short, higher values save memory
    /// on the slot array.
    ///
    /// Default = 8.0
    #[must_use]
    pub fn max_load_factor(mut self, factor: f32) -> Self {
        self.max_load_factor = factor;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.slot_count == 0 {
            return Err(Error::InvalidArgument("slot count must be at least 1"));
        }

        // NOTE: Below 1.0, the threshold would stop scaling with the slot count
        if !self.max_load_factor.is_finite() || self.max_load_factor < MIN_MAX_LOAD_FACTOR {
            return Err(Error::InvalidArgument(
                "max load factor must be a finite number of at least 1.0",
            ));
        }

        Ok(())
    }

    /// Creates an empty table.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the config is invalid, or the slot array
    /// cannot be allocated.
    pub fn build<V: Value>(&self) -> Result<Table<V>> {
        Table::from_config(self)
    }
}

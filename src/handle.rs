// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::record::ParsedRecord;
use crate::table::ValueMut;
use crate::{Error, Result, Table, Value};

/// An opaque position of a value inside a table.
///
/// Unlike a [`ValueMut`], a handle does not borrow the table. It is tied to
/// the table's generation instead: any insert, removal, clear or growth
/// makes it stale, and resolving a stale handle fails with
/// [`Error::StaleHandle`].
///
/// A handle only resolves against the table that issued it; resolving it
/// against any other table, including a [`Table::dup`] of it, fails with
/// [`Error::StaleHandle`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle {
    table_id: u64,
    slot: usize,
    record: ParsedRecord,
    generation: u64,
}

impl Handle {
    /// Returns the generation the handle was issued in.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl<V: Value> Table<V> {
    /// Returns the current generation.
    ///
    /// The generation changes whenever records may have moved.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns a handle to the value of `key` if it exists.
    #[must_use]
    pub fn locate<K: AsRef<[u8]>>(&self, key: K) -> Option<Handle> {
        let (slot, record) = self.find(key.as_ref())?;

        Some(Handle {
            table_id: self.id,
            slot,
            record,
            generation: self.generation,
        })
    }

    fn check_handle(&self, handle: &Handle) -> Result<()> {
        if handle.table_id != self.id || handle.generation != self.generation {
            return Err(Error::StaleHandle);
        }

        match self.slots.get(handle.slot) {
            Some(slot) if handle.record.end <= slot.as_bytes().len() => Ok(()),
            _ => Err(Error::StaleHandle),
        }
    }

    /// Reads the value a handle points to.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the table was modified since the handle was issued.
    pub fn resolve(&self, handle: &Handle) -> Result<V> {
        self.check_handle(handle)?;
        Ok(self.slot(handle.slot).value(&handle.record))
    }

    /// Returns a mutable reference to the value a handle points to.
    ///
    /// Writing through the reference does not change the generation.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the table was modified since the handle was issued.
    pub fn resolve_mut(&mut self, handle: &Handle) -> Result<ValueMut<'_, V>> {
        self.check_handle(handle)?;
        Ok(self.value_mut_at(handle.slot, &handle.record))
    }
}

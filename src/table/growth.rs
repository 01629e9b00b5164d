// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use super::{alloc_slots, threshold_for, Table};
use crate::hash::slot_position;
use crate::{Error, Result, Value};

#[cfg(test)]
thread_local! {
    /// Makes every growth attempt on this thread fail with `OutOfMemory`
    pub(crate) static FAIL_GROWTH: std::cell::Cell<bool> = const { std::cell::Cell::new(false) };
}

impl<V: Value> Table<V> {
    /// Doubles the slot count and redistributes every record.
    ///
    /// Records keep their relative order inside each new slot. On error,
    /// the table is left exactly as it was.
    pub(crate) fn grow(&mut self) -> Result<()> {
        #[cfg(test)]
        if FAIL_GROWTH.get() {
            return Err(Error::OutOfMemory);
        }

        let old_slot_count = self.slots.len();
        let new_slot_count = old_slot_count
            .checked_mul(2)
            .ok_or(Error::OutOfMemory)?;

        // NOTE: First pass sizes every new slot, so each buffer is allocated once
        let mut sizes = Vec::new();
        sizes.try_reserve_exact(new_slot_count)?;
        sizes.resize(new_slot_count, 0usize);

        for slot in &self.slots {
            for record in slot.records::<V>() {
                let pos = slot_position(slot.key(&record), new_slot_count);

                if let Some(size) = sizes.get_mut(pos) {
                    *size += record.len();
                }
            }
        }

        let mut new_slots = alloc_slots(new_slot_count)?;

        for (slot, size) in new_slots.iter_mut().zip(&sizes) {
            if *size > 0 {
                slot.reserve_exact(*size)?;
            }
        }

        for slot in &self.slots {
            for record in slot.records::<V>() {
                let pos = slot_position(slot.key(&record), new_slot_count);

                if let Some(target) = new_slots.get_mut(pos) {
                    target.append_raw(slot.record_bytes(&record))?;
                }
            }
        }

        log::debug!(
            "Grew table from {old_slot_count} to {new_slot_count} slots, moved {} pairs",
            self.pair_count,
        );

        self.slots = new_slots;
        self.growth_threshold = threshold_for(new_slot_count, self.max_load_factor);
        self.generation += 1;

        Ok(())
    }

    /// Grows the table, treating failure as non-fatal.
    ///
    /// A table that could not grow is still correct, only slower; growth is
    /// retried on the next insert.
    pub(crate) fn try_grow(&mut self) {
        if let Err(e) = self.grow() {
            log::warn!(
                "Could not grow table with {} pairs in {} slots: {e:?}",
                self.pair_count,
                self.slots.len(),
            );
        }
    }

    /// Grows the table ahead of time, so `additional` more keys can be
    /// inserted without triggering growth.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the new slot array cannot be allocated.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let target = self
            .pair_count
            .checked_add(additional)
            .ok_or(Error::OutOfMemory)?;

        while self.growth_threshold <= target {
            self.grow()?;
        }

        Ok(())
    }
}

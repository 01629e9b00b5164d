// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

mod growth;
pub mod iter;
mod value_ref;


pub use value_ref::ValueMut;

use crate::hash::slot_position;
use crate::record::{self, ParsedRecord};
use crate::slot::Slot;
use crate::{Config, Result, Value};
use iter::{Cursor, Iter, IterMut, Keys, Values};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

/// A cache-conscious array hash table.
///
/// Colliding keys are not chained through linked nodes. Instead, every
/// slot is a single byte buffer holding its records back to back, so a
/// lookup hashes the key once and then scans one contiguous run of memory.
///
/// Keys are arbitrary byte strings of up to 65535 bytes; values are small
/// fixed-size payloads (see [`Value`]).
pub struct Table<V: Value = u64> {
    /// Reserved for the owning trie; never read by the table itself
    pub(crate) flag: u8,

    /// Reserved tag byte, e.g. the first byte of the key range this table covers
    pub(crate) c0: u8,

    /// Reserved tag byte, e.g. the last byte of the key range this table covers
    pub(crate) c1: u8,

    /// Process-unique identity, so handles cannot cross tables
    pub(crate) id: u64,

    pub(crate) slots: Vec<Slot>,

    /// Number of stored key/value pairs
    pub(crate) pair_count: usize,

    /// Pair count at which the next insert grows the table
    pub(crate) growth_threshold: usize,

    pub(crate) max_load_factor: f32,

    /// Bumped whenever records may have moved
    pub(crate) generation: u64,

    pub(crate) _value: PhantomData<V>,
}

pub(crate) fn threshold_for(slot_count: usize, max_load_factor: f32) -> usize {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "threshold is an approximate bound"
    )]
    let threshold = (slot_count as f64 * f64::from(max_load_factor)).ceil() as usize;

    threshold.max(1)
}

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(0);

fn next_table_id() -> u64 {
    NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed)
}

pub(crate) fn alloc_slots(slot_count: usize) -> Result<Vec<Slot>> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(slot_count)?;
    slots.resize_with(slot_count, Slot::default);
    Ok(slots)
}

impl<V: Value> Default for Table<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Value> Table<V> {
    /// Creates an empty table with the default slot count.
    ///
    /// # Panics
    ///
    /// Panics if the slot array cannot be allocated, like any other
    /// collection constructor. Use [`Table::try_new`] to handle that case.
    #[must_use]
    pub fn new() -> Self {
        Self::try_new().expect("should allocate slot array")
    }

    /// Creates an empty table with the default slot count.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the slot array cannot be allocated.
    pub fn try_new() -> Result<Self> {
        Self::from_config(&Config::default())
    }

    /// Creates an empty table with `n` slots.
    ///
    /// # Errors
    ///
    /// Will return `Err` if `n` is 0, or the slot array cannot be allocated.
    pub fn with_slot_count(n: usize) -> Result<Self> {
        Self::from_config(&Config::new().slot_count(n))
    }

    pub(crate) fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;

        let slots = alloc_slots(config.slot_count)?;

        log::trace!("Creating table with {} slots", config.slot_count);

        Ok(Self {
            flag: 0,
            c0: 0,
            c1: 0,
            id: next_table_id(),
            slots,
            pair_count: 0,
            growth_threshold: threshold_for(config.slot_count, config.max_load_factor),
            max_load_factor: config.max_load_factor,
            generation: 0,
            _value: PhantomData,
        })
    }

    /// Creates an independent deep copy of the table, including its tag bytes.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the copy cannot be allocated. The source table
    /// is never modified.
    pub fn dup(&self) -> Result<Self> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(self.slots.len())?;

        for slot in &self.slots {
            slots.push(slot.try_clone()?);
        }

        log::trace!(
            "Duplicated table with {} pairs in {} slots",
            self.pair_count,
            self.slots.len(),
        );

        Ok(Self {
            flag: self.flag,
            c0: self.c0,
            c1: self.c1,
            id: next_table_id(),
            slots,
            pair_count: self.pair_count,
            growth_threshold: self.growth_threshold,
            max_load_factor: self.max_load_factor,
            generation: self.generation,
            _value: PhantomData,
        })
    }

    /// Removes all entries, releasing their storage.
    ///
    /// The slot count and tag bytes are kept.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = Slot::default();
        }

        self.pair_count = 0;
        self.generation += 1;

        log::trace!("Cleared table");
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pair_count
    }

    /// Returns `true` if the table holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pair_count == 0
    }

    /// Returns the number of slots.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns the pair count at which the next insert grows the table.
    #[must_use]
    pub fn growth_threshold(&self) -> usize {
        self.growth_threshold
    }

    /// Returns the number of heap bytes held by the table.
    #[must_use]
    pub fn heap_size(&self) -> usize {
        self.slots.capacity() * std::mem::size_of::<Slot>()
            + self.slots.iter().map(Slot::capacity).sum::<usize>()
    }

    /// Reserved byte for the owning trie.
    #[must_use]
    pub fn flag(&self) -> u8 {
        self.flag
    }

    /// Sets the reserved flag byte.
    pub fn set_flag(&mut self, flag: u8) {
        self.flag = flag;
    }

    /// Reserved byte for the owning trie.
    #[must_use]
    pub fn c0(&self) -> u8 {
        self.c0
    }

    /// Sets the first reserved tag byte.
    pub fn set_c0(&mut self, c0: u8) {
        self.c0 = c0;
    }

    /// Reserved byte for the owning trie.
    #[must_use]
    pub fn c1(&self) -> u8 {
        self.c1
    }

    /// Sets the second reserved tag byte.
    pub fn set_c1(&mut self, c1: u8) {
        self.c1 = c1;
    }

    /// Returns the `(flag, c0, c1)` tag bytes.
    #[must_use]
    pub fn tags(&self) -> (u8, u8, u8) {
        (self.flag, self.c0, self.c1)
    }

    #[expect(
        clippy::indexing_slicing,
        reason = "slot positions are reduced modulo the slot count"
    )]
    pub(crate) fn slot(&self, pos: usize) -> &Slot {
        &self.slots[pos]
    }

    #[expect(
        clippy::indexing_slicing,
        reason = "slot positions are reduced modulo the slot count"
    )]
    pub(crate) fn slot_mut(&mut self, pos: usize) -> &mut Slot {
        &mut self.slots[pos]
    }

    /// Finds the slot index and record position of a key.
    pub(crate) fn find(&self, key: &[u8]) -> Option<(usize, ParsedRecord)> {
        let pos = slot_position(key, self.slots.len());
        self.slot(pos).find::<V>(key).map(|record| (pos, record))
    }

    pub(crate) fn value_mut_at(&mut self, pos: usize, record: &ParsedRecord) -> ValueMut<'_, V> {
        ValueMut::new(self.slot_mut(pos).value_bytes_mut(record))
    }

    /// Returns a reference to the value of `key`, inserting a default value
    /// if the key does not exist yet.
    ///
    /// The reference borrows the table, so it cannot outlive the next call
    /// that may move records around.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the key is longer than 65535 bytes, or the
    /// record cannot be allocated. The table is unchanged in that case.
    pub fn get<K: AsRef<[u8]>>(&mut self, key: K) -> Result<ValueMut<'_, V>> {
        self.get_or_insert(key.as_ref()).map(|(value, _)| value)
    }

    /// Like [`Table::get`], but also reports whether the key was inserted.
    pub(crate) fn get_or_insert(&mut self, key: &[u8]) -> Result<(ValueMut<'_, V>, bool)> {
        record::check_key(key)?;

        if let Some((pos, record)) = self.find(key) {
            return Ok((self.value_mut_at(pos, &record), false));
        }

        let pos = slot_position(key, self.slots.len());
        let record = self.slot_mut(pos).append(key, &V::default())?;

        self.pair_count += 1;
        self.generation += 1;

        if self.pair_count >= self.growth_threshold {
            self.try_grow();

            // NOTE: Growth moves every record, so look the new one up again
            let (new_pos, new_record) = self.find(key).expect("inserted key should exist");
            return Ok((self.value_mut_at(new_pos, &new_record), true));
        }

        Ok((self.value_mut_at(pos, &record), true))
    }

    /// Inserts or overwrites a value, returning the previous value if the key
    /// already existed.
    ///
    /// # Errors
    ///
    /// See [`Table::get`].
    pub fn insert<K: AsRef<[u8]>>(&mut self, key: K, value: V) -> Result<Option<V>> {
        let (mut slot_value, inserted) = self.get_or_insert(key.as_ref())?;

        let prev = if inserted {
            None
        } else {
            Some(slot_value.get())
        };
        slot_value.set(value);

        Ok(prev)
    }

    /// Returns the value of `key` if it exists.
    ///
    /// Never inserts and never grows the table.
    #[must_use]
    pub fn try_get<K: AsRef<[u8]>>(&self, key: K) -> Option<V> {
        let (pos, record) = self.find(key.as_ref())?;
        Some(self.slot(pos).value(&record))
    }

    /// Returns a mutable reference to the value of `key` if it exists.
    ///
    /// Never inserts and never grows the table.
    pub fn try_get_mut<K: AsRef<[u8]>>(&mut self, key: K) -> Option<ValueMut<'_, V>> {
        let (pos, record) = self.find(key.as_ref())?;
        Some(self.value_mut_at(pos, &record))
    }

    /// Returns `true` if the table contains `key`.
    #[must_use]
    pub fn contains_key<K: AsRef<[u8]>>(&self, key: K) -> bool {
        self.find(key.as_ref()).is_some()
    }

    /// Removes a key, returning `true` if it existed.
    ///
    /// The slot is compacted, so no gap is left behind. The table never
    /// shrinks.
    pub fn remove<K: AsRef<[u8]>>(&mut self, key: K) -> bool {
        self.remove_entry(key).is_some()
    }

    /// Removes a key, returning its value if it existed.
    pub fn remove_entry<K: AsRef<[u8]>>(&mut self, key: K) -> Option<V> {
        let (pos, record) = self.find(key.as_ref())?;

        let slot = self.slot_mut(pos);
        let value = slot.value(&record);
        slot.remove(&record);

        self.pair_count -= 1;
        self.generation += 1;

        Some(value)
    }

    /// Returns a cursor positioned at the first entry.
    #[must_use]
    pub fn cursor(&self) -> Cursor<'_, V> {
        Cursor::new(&self.slots)
    }

    /// Iterates over all entries in storage order.
    ///
    /// The order is not sorted and changes when the table grows.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self.cursor(), self.pair_count)
    }

    /// Iterates over all entries in storage order, allowing values to be
    /// modified.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut::new(&mut self.slots, self.pair_count)
    }

    /// Iterates over all keys in storage order.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, V> {
        Keys(self.iter())
    }

    /// Iterates over all values in storage order.
    #[must_use]
    pub fn values(&self) -> Values<'_, V> {
        Values(self.iter())
    }
}

impl<'a, V: Value> IntoIterator for &'a Table<V> {
    type Item = (&'a [u8], V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V: Value> IntoIterator for &'a mut Table<V> {
    type Item = (&'a [u8], ValueMut<'a, V>);
    type IntoIter = IterMut<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K: AsRef<[u8]>, V: Value> Extend<(K, V)> for Table<V> {
    /// # Panics
    ///
    /// Panics if a key is too long or memory runs out.
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value).expect("should insert");
        }
    }
}

impl<V: Value + PartialEq> PartialEq for Table<V> {
    /// Two tables are equal if they hold the same key/value pairs,
    /// regardless of slot layout or tag bytes.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.try_get(key) == Some(value))
    }
}

impl<V: Value> std::fmt::Debug for Table<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("flag", &self.flag)
            .field("c0", &self.c0)
            .field("c1", &self.c1)
            .field("slot_count", &self.slots.len())
            .field("pair_count", &self.pair_count)
            .field("growth_threshold", &self.growth_threshold)
            .finish_non_exhaustive()
    }
}

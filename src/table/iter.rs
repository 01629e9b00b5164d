// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use super::ValueMut;
use crate::record::{self, ParsedRecord};
use crate::slot::Slot;
use crate::Value;
use std::marker::PhantomData;

/// A cursor over the entries of a table
///
/// Visits slots in ascending order, and records in storage order inside each
/// slot. The cursor borrows the table, so the table cannot be modified while
/// the cursor is alive.
pub struct Cursor<'a, V: Value> {
    slots: &'a [Slot],
    slot_idx: usize,
    record: Option<ParsedRecord>,
    _value: PhantomData<V>,
}

impl<'a, V: Value> Cursor<'a, V> {
    pub(crate) fn new(slots: &'a [Slot]) -> Self {
        let mut cursor = Self {
            slots,
            slot_idx: 0,
            record: None,
            _value: PhantomData,
        };
        cursor.seek_slot(0);
        cursor
    }

    /// Moves to the first record of the first non-empty slot at or after `idx`.
    fn seek_slot(&mut self, idx: usize) {
        self.record = None;

        let Some(rest) = self.slots.get(idx..) else {
            self.slot_idx = self.slots.len();
            return;
        };

        for (offset, slot) in rest.iter().enumerate() {
            if let Some(record) = record::parse::<V>(slot.as_bytes(), 0) {
                self.slot_idx = idx + offset;
                self.record = Some(record);
                return;
            }
        }

        self.slot_idx = self.slots.len();
    }

    fn current_slot(&self) -> Option<&'a Slot> {
        self.slots.get(self.slot_idx)
    }

    /// Returns `true` once all entries have been visited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.record.is_none()
    }

    /// Moves to the next entry.
    ///
    /// Does nothing if the cursor is finished.
    pub fn advance(&mut self) {
        let Some(record) = self.record else {
            return;
        };

        let next = self
            .current_slot()
            .and_then(|slot| record::parse::<V>(slot.as_bytes(), record.end));

        match next {
            Some(next) => self.record = Some(next),
            None => self.seek_slot(self.slot_idx + 1),
        }
    }

    /// Returns the key of the current entry.
    #[must_use]
    pub fn key(&self) -> Option<&'a [u8]> {
        let record = self.record?;
        Some(self.current_slot()?.key(&record))
    }

    /// Returns the value of the current entry.
    #[must_use]
    pub fn value(&self) -> Option<V> {
        let record = self.record?;
        Some(self.current_slot()?.value(&record))
    }

    /// Returns the key and value of the current entry.
    #[must_use]
    pub fn entry(&self) -> Option<(&'a [u8], V)> {
        let record = self.record?;
        let slot = self.current_slot()?;
        Some((slot.key(&record), slot.value(&record)))
    }
}

/// Iterator over the entries of a table, see [`crate::Table::iter`]
pub struct Iter<'a, V: Value> {
    cursor: Cursor<'a, V>,
    remaining: usize,
}

impl<'a, V: Value> Iter<'a, V> {
    pub(crate) fn new(cursor: Cursor<'a, V>, remaining: usize) -> Self {
        Self { cursor, remaining }
    }
}

impl<'a, V: Value> Iterator for Iter<'a, V> {
    type Item = (&'a [u8], V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.cursor.entry()?;
        self.cursor.advance();
        self.remaining = self.remaining.saturating_sub(1);
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V: Value> ExactSizeIterator for Iter<'_, V> {}

impl<V: Value> std::iter::FusedIterator for Iter<'_, V> {}

/// Mutable iterator over the entries of a table, see [`crate::Table::iter_mut`]
pub struct IterMut<'a, V: Value> {
    slots: std::slice::IterMut<'a, Slot>,
    current: &'a mut [u8],
    remaining: usize,
    _value: PhantomData<V>,
}

impl<'a, V: Value> IterMut<'a, V> {
    pub(crate) fn new(slots: &'a mut [Slot], remaining: usize) -> Self {
        Self {
            slots: slots.iter_mut(),
            current: Default::default(),
            remaining,
            _value: PhantomData,
        }
    }
}

impl<'a, V: Value> Iterator for IterMut<'a, V> {
    type Item = (&'a [u8], ValueMut<'a, V>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = record::parse::<V>(self.current, 0) {
                let buf = std::mem::take(&mut self.current);

                let (head, tail) = buf.split_at_mut(record.end);
                self.current = tail;

                let (key, value) = head.split_at_mut(record.value_start);
                let key: &'a [u8] = key;

                self.remaining = self.remaining.saturating_sub(1);

                return Some((
                    key.get(record.key_start..).unwrap_or_default(),
                    ValueMut::new(value),
                ));
            }

            self.current = self.slots.next()?.as_bytes_mut();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V: Value> ExactSizeIterator for IterMut<'_, V> {}

/// Iterator over the keys of a table
pub struct Keys<'a, V: Value>(pub(crate) Iter<'a, V>);

impl<'a, V: Value> Iterator for Keys<'a, V> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

/// Iterator over the values of a table
pub struct Values<'a, V: Value>(pub(crate) Iter<'a, V>);

impl<V: Value> Iterator for Values<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::record::{self, ParsedRecord};
use crate::{Result, Value};
use std::marker::PhantomData;

/// A growable byte buffer holding packed records back to back
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Slot(Vec<u8>);

impl Slot {
    /// Returns the raw record bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// Returns `true` if the slot holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the allocated size of the buffer in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.0.capacity()
    }

    /// Iterates over the positions of all records in storage order.
    #[must_use]
    pub fn records<V: Value>(&self) -> Records<'_, V> {
        Records {
            buf: &self.0,
            offset: 0,
            _value: PhantomData,
        }
    }

    /// Returns the key bytes of a record.
    #[must_use]
    pub fn key(&self, record: &ParsedRecord) -> &[u8] {
        self.0
            .get(record.key_start..record.value_start)
            .unwrap_or_default()
    }

    /// Returns the full encoded bytes of a record.
    #[must_use]
    pub fn record_bytes(&self, record: &ParsedRecord) -> &[u8] {
        self.0.get(record.start..record.end).unwrap_or_default()
    }

    /// Decodes the value of a record.
    #[must_use]
    pub fn value<V: Value>(&self, record: &ParsedRecord) -> V {
        record::decode_value(&self.0, record)
    }

    pub(crate) fn value_bytes_mut(&mut self, record: &ParsedRecord) -> &mut [u8] {
        self.0
            .get_mut(record.value_start..record.end)
            .unwrap_or_default()
    }

    /// Scans the slot for a key.
    #[must_use]
    pub fn find<V: Value>(&self, key: &[u8]) -> Option<ParsedRecord> {
        self.records::<V>()
            .find(|record| record.key_len() == key.len() && self.key(record) == key)
    }

    /// Appends a new record, returning its position.
    ///
    /// Nothing is written if the buffer cannot grow.
    pub fn append<V: Value>(&mut self, key: &[u8], value: &V) -> Result<ParsedRecord> {
        record::check_key(key)?;

        self.0.try_reserve(record::encoded_len::<V>(key.len()))?;

        let start = self.0.len();

        record::encode_into(&mut self.0, key, value).expect("cannot fail");

        Ok(record::parse::<V>(&self.0, start).expect("record was just written"))
    }

    /// Appends an already encoded record.
    pub(crate) fn append_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.0.try_reserve(bytes.len())?;
        self.0.extend_from_slice(bytes);
        Ok(())
    }

    pub(crate) fn reserve_exact(&mut self, additional: usize) -> Result<()> {
        self.0.try_reserve_exact(additional)?;
        Ok(())
    }

    /// Removes a record, shifting all records after it to the left.
    pub fn remove(&mut self, record: &ParsedRecord) {
        let new_len = self.0.len() - record.len();
        self.0.copy_within(record.end.., record.start);
        self.0.truncate(new_len);
    }

    /// Copies the slot into a new, independent buffer.
    pub fn try_clone(&self) -> Result<Self> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(self.0.len())?;
        buf.extend_from_slice(&self.0);
        Ok(Self(buf))
    }
}

/// Iterator over the record positions of a slot
pub struct Records<'a, V: Value> {
    buf: &'a [u8],
    offset: usize,
    _value: PhantomData<V>,
}

impl<V: Value> Iterator for Records<'_, V> {
    type Item = ParsedRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let record = record::parse::<V>(self.buf, self.offset)?;
        self.offset = record.end;
        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn slot_append_find() -> crate::Result<()> {
        let mut slot = Slot::default();
        assert!(slot.is_empty());

        let a = slot.append(b"a", &1u64)?;
        let ab = slot.append(b"ab", &2u64)?;

        assert_eq!(0, a.start);
        assert_eq!(a.end, ab.start);

        assert_eq!(Some(ab), slot.find::<u64>(b"ab"));
        assert_eq!(Some(a), slot.find::<u64>(b"a"));
        assert_eq!(None, slot.find::<u64>(b"b"));
        assert_eq!(None, slot.find::<u64>(b""));

        assert_eq!(2, slot.value::<u64>(&ab));
        assert_eq!(b"ab", slot.key(&ab));

        Ok(())
    }

    #[test]
    fn slot_find_is_exact() -> crate::Result<()> {
        let mut slot = Slot::default();
        slot.append(b"abc", &1u32)?;

        assert!(slot.find::<u32>(b"ab").is_none());
        assert!(slot.find::<u32>(b"abcd").is_none());
        assert!(slot.find::<u32>(b"ABC").is_none());
        assert!(slot.find::<u32>(b"abc").is_some());

        Ok(())
    }

    #[test]
    fn slot_remove_compacts() -> crate::Result<()> {
        let mut slot = Slot::default();
        slot.append(b"first", &1u32)?;
        let middle = slot.append(b"second", &2u32)?;
        slot.append(b"third", &3u32)?;

        let before = slot.as_bytes().len();
        slot.remove(&middle);

        assert_eq!(before - middle.len(), slot.as_bytes().len());

        let keys = slot
            .records::<u32>()
            .map(|r| slot.key(&r).to_vec())
            .collect::<Vec<_>>();
        assert_eq!(vec![b"first".to_vec(), b"third".to_vec()], keys);

        let third = slot.find::<u32>(b"third").expect("should exist");
        assert_eq!(3, slot.value::<u32>(&third));

        Ok(())
    }

    #[test]
    fn slot_try_clone_independent() -> crate::Result<()> {
        let mut slot = Slot::default();
        slot.append(b"a", &1u8)?;

        let copy = slot.try_clone()?;
        slot.append(b"b", &2u8)?;

        assert_eq!(1, copy.records::<u8>().count());
        assert_eq!(2, slot.records::<u8>().count());

        Ok(())
    }

    #[test]
    fn slot_zero_sized_values() -> crate::Result<()> {
        let mut slot = Slot::default();
        slot.append(b"x", &())?;
        slot.append(b"", &())?;

        assert_eq!(3, slot.as_bytes().len());
        assert_eq!(2, slot.records::<()>().count());
        assert!(slot.find::<()>(b"").is_some());

        Ok(())
    }
}

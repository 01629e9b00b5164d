// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::Value;
use std::marker::PhantomData;

/// A mutable reference to a value stored inside a slot.
///
/// Values are packed without alignment, so this is a view over the value's
/// encoded bytes rather than a `&mut V`. It borrows the table, which keeps
/// it from being used after any call that may relocate records.
pub struct ValueMut<'a, V: Value> {
    bytes: &'a mut [u8],
    _value: PhantomData<V>,
}

impl<'a, V: Value> ValueMut<'a, V> {
    pub(crate) fn new(bytes: &'a mut [u8]) -> Self {
        debug_assert_eq!(V::SIZE, bytes.len());

        Self {
            bytes,
            _value: PhantomData,
        }
    }

    /// Reads the value.
    ///
    /// # Panics
    ///
    /// Panics if the [`Value`] impl cannot decode a value from `V::SIZE` bytes.
    #[must_use]
    pub fn get(&self) -> V {
        V::decode_from(&mut &*self.bytes).expect("value should decode")
    }

    /// Overwrites the value.
    ///
    /// # Panics
    ///
    /// Panics if the [`Value`] impl writes more than `V::SIZE` bytes.
    pub fn set(&mut self, value: V) {
        let mut writer = &mut *self.bytes;
        value
            .encode_into(&mut writer)
            .expect("value should fit its slot");
    }

    /// Modifies the value in place, returning the new value.
    ///
    /// # Panics
    ///
    /// See [`ValueMut::get`] and [`ValueMut::set`].
    pub fn update<F: FnOnce(&mut V)>(&mut self, f: F) -> V {
        let mut value = self.get();
        f(&mut value);
        self.set(value);
        value
    }

    /// Replaces the value, returning the old one.
    ///
    /// # Panics
    ///
    /// See [`ValueMut::get`] and [`ValueMut::set`].
    pub fn replace(&mut self, value: V) -> V {
        let prev = self.get();
        self.set(value);
        prev
    }
}

impl<V: Value + std::fmt::Debug> std::fmt::Debug for ValueMut<'_, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ValueMut").field(&self.get()).finish()
    }
}

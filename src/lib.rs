// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! A cache-conscious array hash table for byte-string keys.
//!
//! ##### About
//!
//! This crate exports a `Table` that maps byte-string keys to small,
//! fixed-size values. It is meant to be used as the bucket type of a
//! burst trie (e.g. a HAT-trie), which splits a large key space into many
//! small tables.
//!
//! Instead of chaining colliding keys through linked nodes, every slot of
//! the table is one contiguous byte buffer, into which records are packed
//! back to back:
//!
//! ```text
//! [key length (varint)][key bytes][value bytes][key length (varint)]...
//! ```
//!
//! A lookup hashes the key once, then scans a single run of memory, which
//! keeps cache misses and per-key allocations down. When the average
//! number of records per slot exceeds the configured load factor, the slot
//! count is doubled and every record is redistributed.
//!
//! Keys are limited to 65535 bytes. Values implement [`Value`], which is
//! provided for the primitive number types, `bool`, `()` and byte arrays.
//!
//! # Example usage
//!
//! ```
//! use ahtable::Table;
//!
//! let mut table = Table::<u64>::new();
//!
//! // `get` inserts a default value for unknown keys
//! table.get("hello")?.set(5);
//! table.get("hello")?.update(|v| *v += 1);
//!
//! assert_eq!(Some(6), table.try_get("hello"));
//! assert_eq!(None, table.try_get("world"));
//! assert_eq!(1, table.len());
//!
//! for (key, value) in &table {
//!     assert_eq!(b"hello", key);
//!     assert_eq!(6, value);
//! }
//!
//! assert!(table.remove("hello"));
//! assert!(table.is_empty());
//! #
//! # Ok::<(), ahtable::Error>(())
//! ```

#![deny(clippy::all, missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]
#![allow(clippy::option_if_let_else)]
#![warn(clippy::redundant_feature_names)]

mod config;
mod error;
mod handle;
mod hash;

#[doc(hidden)]
pub mod record;

#[doc(hidden)]
pub mod slot;

mod table;
mod value;

pub use {
    config::{Config, DEFAULT_MAX_LOAD_FACTOR, DEFAULT_SLOT_COUNT, MIN_MAX_LOAD_FACTOR},
    error::{Error, Result},
    handle::Handle,
    record::MAX_KEY_LEN,
    table::{
        iter::{Cursor, Iter, IterMut, Keys, Values},
        Table, ValueMut,
    },
    value::Value,
};

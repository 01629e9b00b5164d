// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Packed record format
//!
//! Every record is laid out as
//!
//! ```text
//! [key length, u16 varint][key bytes][value, V::SIZE bytes]
//! ```
//!
//! with no padding, so a slot is just records back to back.

use crate::{Error, Result, Value};
use std::io::{Cursor, Write};
use varint_rs::{VarintReader, VarintWriter};

/// Keys are limited to 65535 bytes
pub const MAX_KEY_LEN: usize = u16::MAX as usize;

/// Byte positions of one record inside a slot buffer
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ParsedRecord {
    /// Offset of the length prefix
    pub start: usize,

    /// Offset of the first key byte
    pub key_start: usize,

    /// Offset of the first value byte (= end of key)
    pub value_start: usize,

    /// Offset one past the last value byte
    pub end: usize,
}

impl ParsedRecord {
    /// Full encoded length of the record
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Length of the key
    #[must_use]
    pub fn key_len(&self) -> usize {
        self.value_start - self.key_start
    }
}

/// Returns the number of bytes the varint length prefix takes up.
#[must_use]
pub fn prefix_len(key_len: usize) -> usize {
    match key_len {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        _ => 3,
    }
}

/// Returns the encoded size of a record.
#[must_use]
pub fn encoded_len<V: Value>(key_len: usize) -> usize {
    prefix_len(key_len) + key_len + V::SIZE
}

/// Rejects keys whose length cannot be encoded.
///
/// # Errors
///
/// Will return `Err` if the key is longer than [`MAX_KEY_LEN`].
pub fn check_key(key: &[u8]) -> Result<u16> {
    u16::try_from(key.len()).map_err(|_| Error::InvalidArgument("key is longer than 65535 bytes"))
}

/// Serializes a record into the writer.
///
/// The caller is expected to have checked the key length with [`check_key`].
pub fn encode_into<V: Value, W: Write>(writer: &mut W, key: &[u8], value: &V) -> std::io::Result<()> {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "key length is checked before encoding"
    )]
    let key_len = key.len() as u16;

    writer.write_u16_varint(key_len)?;
    writer.write_all(key)?;
    value.encode_into(writer)
}

/// Parses the record starting at `offset`.
///
/// Returns `None` at the end of the buffer.
#[must_use]
pub fn parse<V: Value>(buf: &[u8], offset: usize) -> Option<ParsedRecord> {
    let rest = buf.get(offset..).filter(|rest| !rest.is_empty())?;

    let mut reader = Cursor::new(rest);
    let key_len = usize::from(reader.read_u16_varint().ok()?);

    #[expect(
        clippy::cast_possible_truncation,
        reason = "the cursor position is bounded by the slot length"
    )]
    let key_start = offset + reader.position() as usize;
    let value_start = key_start + key_len;
    let end = value_start + V::SIZE;

    debug_assert!(end <= buf.len(), "record overflows its slot");

    if end > buf.len() {
        return None;
    }

    Some(ParsedRecord {
        start: offset,
        key_start,
        value_start,
        end,
    })
}

/// Decodes the value of a parsed record.
#[must_use]
pub fn decode_value<V: Value>(buf: &[u8], record: &ParsedRecord) -> V {
    let mut bytes = buf.get(record.value_start..record.end).unwrap_or_default();
    V::decode_from(&mut bytes).expect("value should decode")
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn encode<V: Value>(key: &[u8], value: V) -> Vec<u8> {
        let mut v = vec![];
        encode_into(&mut v, key, &value).expect("cannot fail");
        v
    }

    #[test]
    fn record_short_key_layout() {
        let bytes = encode(b"abc", 0x0102u16);
        assert_eq!([3, b'a', b'b', b'c', 0x02, 0x01], *bytes);
        assert_eq!(bytes.len(), encoded_len::<u16>(3));
    }

    #[test]
    fn record_prefix_len_boundaries() {
        for key_len in [0, 1, 127, 128, 16_383, 16_384, MAX_KEY_LEN] {
            let key = vec![b'x'; key_len];
            let bytes = encode(&key, 9u64);
            assert_eq!(bytes.len(), encoded_len::<u64>(key_len), "key_len={key_len}");
            assert_eq!(1 + usize::from(key_len >= 128) + usize::from(key_len >= 16_384), prefix_len(key_len));
        }
    }

    #[test]
    fn record_empty_key() {
        let bytes = encode(b"", 5u32);
        let record = parse::<u32>(&bytes, 0).expect("should parse");

        assert_eq!(0, record.key_len());
        assert_eq!(1, record.value_start);
        assert_eq!(5, decode_value::<u32>(&bytes, &record));
    }

    #[test]
    fn record_parse_sequence() {
        let mut buf = encode(b"a", 1u64);
        buf.extend(encode(&[b'k'; 200], 2u64));
        buf.extend(encode(b"", 3u64));

        let first = parse::<u64>(&buf, 0).expect("should parse");
        let second = parse::<u64>(&buf, first.end).expect("should parse");
        let third = parse::<u64>(&buf, second.end).expect("should parse");

        assert_eq!(Some(&b"a"[..]), buf.get(first.key_start..first.value_start));
        assert_eq!(200, second.key_len());
        assert_eq!(2, second.key_start - second.start);
        assert_eq!(3, decode_value::<u64>(&buf, &third));
        assert_eq!(buf.len(), third.end);
        assert_eq!(None, parse::<u64>(&buf, third.end));
    }

    #[test]
    fn record_check_key_too_long() {
        assert_eq!(Ok(u16::MAX), check_key(&vec![0; MAX_KEY_LEN]));
        assert!(matches!(
            check_key(&vec![0; MAX_KEY_LEN + 1]),
            Err(Error::InvalidArgument(_)),
        ));
    }
}

// Copyright (c) 2024-present, fjall-rs
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use std::io::{Read, Write};

/// A fixed-size payload stored inline after each key.
///
/// The table never looks at a value; it only copies its `SIZE` encoded bytes
/// around. Encoding must write exactly `SIZE` bytes, and decoding must read
/// exactly `SIZE` bytes.
pub trait Value: Copy + Default {
    /// Encoded size in bytes
    const SIZE: usize;

    /// Serializes into writer.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the writer fails.
    fn encode_into<W: Write>(&self, writer: &mut W) -> std::io::Result<()>;

    /// Deserializes from reader.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the reader fails or the bytes are not a valid value.
    fn decode_from<R: Read>(reader: &mut R) -> std::io::Result<Self>;
}

macro_rules! impl_value_le {
    ($($ty:ty => $read:ident, $write:ident;)*) => {
        $(
            impl Value for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn encode_into<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
                    writer.$write::<LE>(*self)
                }

                fn decode_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
                    reader.$read::<LE>()
                }
            }
        )*
    };
}

impl_value_le! {
    u16 => read_u16, write_u16;
    u32 => read_u32, write_u32;
    u64 => read_u64, write_u64;
    u128 => read_u128, write_u128;
    i16 => read_i16, write_i16;
    i32 => read_i32, write_i32;
    i64 => read_i64, write_i64;
    i128 => read_i128, write_i128;
}

impl Value for u8 {
    const SIZE: usize = 1;

    fn encode_into<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u8(*self)
    }

    fn decode_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        reader.read_u8()
    }
}

impl Value for i8 {
    const SIZE: usize = 1;

    fn encode_into<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_i8(*self)
    }

    fn decode_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        reader.read_i8()
    }
}

// NOTE: usize is always stored as 8 bytes so tables look the same on every target
impl Value for usize {
    const SIZE: usize = 8;

    fn encode_into<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u64::<LE>(*self as u64)
    }

    fn decode_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let n = reader.read_u64::<LE>()?;

        Self::try_from(n).map_err(|_| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, "usize value out of range")
        })
    }
}

impl Value for bool {
    const SIZE: usize = 1;

    fn encode_into<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u8(u8::from(*self))
    }

    fn decode_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        Ok(reader.read_u8()? != 0)
    }
}

impl Value for f32 {
    const SIZE: usize = 4;

    fn encode_into<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u32::<LE>(self.to_bits())
    }

    fn decode_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        reader.read_u32::<LE>().map(Self::from_bits)
    }
}

impl Value for f64 {
    const SIZE: usize = 8;

    fn encode_into<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u64::<LE>(self.to_bits())
    }

    fn decode_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        reader.read_u64::<LE>().map(Self::from_bits)
    }
}

/// Zero-sized values turn the table into a set
impl Value for () {
    const SIZE: usize = 0;

    fn encode_into<W: Write>(&self, _: &mut W) -> std::io::Result<()> {
        Ok(())
    }

    fn decode_from<R: Read>(_: &mut R) -> std::io::Result<Self> {
        Ok(())
    }
}

macro_rules! impl_value_array {
    ($($n:literal)*) => {
        $(
            impl Value for [u8; $n] {
                const SIZE: usize = $n;

                fn encode_into<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
                    writer.write_all(self)
                }

                fn decode_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
                    let mut buf = [0; $n];
                    reader.read_exact(&mut buf)?;
                    Ok(buf)
                }
            }
        )*
    };
}

// NOTE: std only implements Default for arrays of up to 32 elements
impl_value_array! {
    1 2 3 4 5 6 7 8 9 10 11 12 13 14 15 16
    17 18 19 20 21 22 23 24 25 26 27 28 29 30 31 32
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn encode<V: Value>(value: V) -> Vec<u8> {
        let mut v = vec![];
        value.encode_into(&mut v).expect("cannot fail");
        v
    }

    #[test]
    fn value_encoded_len_matches_size() {
        assert_eq!(u8::SIZE, encode(7u8).len());
        assert_eq!(u32::SIZE, encode(7u32).len());
        assert_eq!(u64::SIZE, encode(7u64).len());
        assert_eq!(usize::SIZE, encode(7usize).len());
        assert_eq!(f64::SIZE, encode(1.5f64).len());
        assert_eq!(0, encode(()).len());
        assert_eq!(5, encode([1u8, 2, 3, 4, 5]).len());
    }

    #[test]
    fn value_little_endian() {
        assert_eq!([0x04, 0x03, 0x02, 0x01], *encode(0x0102_0304u32));
    }

    #[test]
    fn value_decode_float_bits() -> std::io::Result<()> {
        let bytes = encode(-0.25f32);
        assert_eq!(-0.25, f32::decode_from(&mut bytes.as_slice())?);
        Ok(())
    }

    #[test]
    fn value_decode_bool_nonzero() -> std::io::Result<()> {
        assert!(bool::decode_from(&mut [2u8].as_slice())?);
        assert!(!bool::decode_from(&mut [0u8].as_slice())?);
        Ok(())
    }

    #[test]
    fn value_byte_arrays() -> std::io::Result<()> {
        assert_eq!(1, <[u8; 1]>::SIZE);
        assert_eq!(32, <[u8; 32]>::SIZE);
        assert_eq!([0u8; 16], <[u8; 16]>::default());

        let bytes = encode([7u8; 32]);
        assert_eq!(32, bytes.len());
        assert_eq!([7u8; 32], <[u8; 32]>::decode_from(&mut bytes.as_slice())?);

        Ok(())
    }

    #[test]
    fn value_decode_truncated() {
        assert!(u64::decode_from(&mut [1u8, 2, 3].as_slice()).is_err());
    }
}

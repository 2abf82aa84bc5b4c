//! Variable-length unsigned integers as stored in NIBArchive files.
//!
//! Seven value bits per byte, least significant group first. Unlike LEB128 the
//! high bit marks the *last* byte of a value rather than a continuation, so `0`
//! is stored as `0x80` and `127` as `0xff`.

use std::io::{Read, Write};

use byteorder::ReadBytesExt;

use crate::{NibError, Result};

const PAYLOAD_MASK: u8 = 0b0111_1111;
const TERMINATOR_BIT: u8 = 0b1000_0000;

/// Longest encoding of a `usize`.
pub const MAX_VARINT_LEN: usize = (usize::BITS as usize + 6) / 7;

/// Append the encoding of `value` to `buf`.
pub fn encode_varint(mut value: usize, buf: &mut Vec<u8>) {
    loop {
        let byte = value as u8 & PAYLOAD_MASK;
        value >>= 7;
        if value == 0 {
            buf.push(byte | TERMINATOR_BIT);
            return;
        }
        buf.push(byte);
    }
}

/// Number of bytes `encode_varint` produces for `value`.
pub fn varint_len(value: usize) -> usize {
    let bits = usize::BITS - value.leading_zeros();
    std::cmp::max(1, ((bits + 6) / 7) as usize)
}

pub trait ReadVarintExt: Read {
    /// Read one varint, failing with [`NibError::VarintTooLarge`] rather than
    /// dropping bits that do not fit a `usize`.
    fn read_varint(&mut self) -> Result<usize> {
        let mut value = 0usize;

        for index in 0..MAX_VARINT_LEN {
            let byte = self.read_u8().map_err(NibError::read)?;
            let payload = (byte & PAYLOAD_MASK) as usize;
            let shift = 7 * index as u32;

            if (payload << shift) >> shift != payload {
                return Err(NibError::VarintTooLarge);
            }
            value |= payload << shift;

            if byte & TERMINATOR_BIT != 0 {
                return Ok(value);
            }
        }

        Err(NibError::VarintTooLarge)
    }
}

impl<R: Read + ?Sized> ReadVarintExt for R {}

pub trait WriteVarintExt: Write {
    /// Write one varint, returning the number of bytes written.
    fn write_varint(&mut self, value: usize) -> Result<usize> {
        let mut buf = Vec::with_capacity(MAX_VARINT_LEN);
        encode_varint(value, &mut buf);
        self.write_all(&buf).map_err(NibError::write)?;
        Ok(buf.len())
    }
}

impl<W: Write + ?Sized> WriteVarintExt for W {}

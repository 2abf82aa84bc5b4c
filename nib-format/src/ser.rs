use std::io::Write;

use byteorder::{LittleEndian, WriteBytesExt};

use crate::header::{NibHeader, Section, TableOfContents, Version, HEADER_SIZE};
use crate::varint::{varint_len, WriteVarintExt};
use crate::{ClassName, Entry, NibError, Object, Result, Value};

fn write_i32_le<W: Write>(writer: &mut W, value: i32) -> Result<()> {
    writer
        .write_i32::<LittleEndian>(value)
        .map_err(NibError::write)
}

pub(crate) trait Serialize {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()>;

    /// Number of bytes `write` produces.
    fn encoded_len(&self) -> usize;
}

/// Write the records of one section back to back. Counts live in the table of
/// contents, so nothing else is written.
pub(crate) fn serialize_section<T: Serialize, W: Write>(
    writer: &mut W,
    records: &[T],
) -> Result<()> {
    for record in records.iter() {
        record.write(writer)?;
    }
    Ok(())
}

pub(crate) fn section_len<T: Serialize>(records: &[T]) -> usize {
    records.iter().map(Serialize::encoded_len).sum()
}

impl Serialize for Version {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_i32_le(writer, self.major)?;
        write_i32_le(writer, self.minor)
    }

    fn encoded_len(&self) -> usize {
        8
    }
}

impl Serialize for TableOfContents {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        for (_, info) in self.iter() {
            write_i32_le(writer, info.count)?;
            write_i32_le(writer, info.offset)?;
        }
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        Section::ALL.len() * 8
    }
}

impl Serialize for NibHeader {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer
            .write_all(&self.magic_bytes)
            .map_err(NibError::write)?;
        self.version.write(writer)?;
        self.toc.write(writer)
    }

    fn encoded_len(&self) -> usize {
        HEADER_SIZE
    }
}

impl Serialize for Object {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_varint(self.class_name_index)?;
        writer.write_varint(self.values_start_index)?;
        writer.write_varint(self.values_count)?;
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        varint_len(self.class_name_index)
            + varint_len(self.values_start_index)
            + varint_len(self.values_count)
    }
}

impl Serialize for String {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_varint(self.len())?;
        writer.write_all(self.as_bytes()).map_err(NibError::write)
    }

    fn encoded_len(&self) -> usize {
        varint_len(self.len()) + self.len()
    }
}

impl Serialize for Entry {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_varint(self.key_index)?;
        self.value.write(writer)
    }

    fn encoded_len(&self) -> usize {
        varint_len(self.key_index) + self.value.encoded_len()
    }
}

impl Serialize for Value {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u8(self.tag()).map_err(NibError::write)?;

        match self {
            Value::Int8(v) => writer.write_i8(*v),
            Value::Int16(v) => writer.write_i16::<LittleEndian>(*v),
            Value::Int32(v) => writer.write_i32::<LittleEndian>(*v),
            Value::Int64(v) => writer.write_i64::<LittleEndian>(*v),
            Value::True | Value::False | Value::Nil => Ok(()),
            Value::Float(v) => writer.write_f32::<LittleEndian>(*v),
            Value::Double(v) => writer.write_f64::<LittleEndian>(*v),
            Value::Data(data) => {
                writer.write_varint(data.len())?;
                writer.write_all(data)
            }
            Value::Object(index) => writer.write_i32::<LittleEndian>(*index),
        }
        .map_err(NibError::write)
    }

    fn encoded_len(&self) -> usize {
        let payload = match self {
            Value::Int8(_) => 1,
            Value::Int16(_) => 2,
            Value::Int32(_) | Value::Float(_) | Value::Object(_) => 4,
            Value::Int64(_) | Value::Double(_) => 8,
            Value::True | Value::False | Value::Nil => 0,
            Value::Data(data) => varint_len(data.len()) + data.len(),
        };
        1 + payload
    }
}

impl Serialize for ClassName {
    fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        // Length includes the terminator
        writer.write_varint(self.class_name.len() + 1)?;
        writer.write_varint(self.extra_values.len())?;
        for value in self.extra_values.iter() {
            write_i32_le(writer, *value)?;
        }
        writer
            .write_all(self.class_name.as_bytes())
            .map_err(NibError::write)?;
        writer.write_u8(0).map_err(NibError::write)
    }

    fn encoded_len(&self) -> usize {
        let len = self.class_name.len() + 1;
        varint_len(len) + varint_len(self.extra_values.len()) + self.extra_values.len() * 4 + len
    }
}

/// Table of contents counts are 32-bit.
pub(crate) fn section_count(section: Section, len: usize) -> Result<i32> {
    i32::try_from(len).map_err(|_| NibError::SectionTooLarge { section, len })
}

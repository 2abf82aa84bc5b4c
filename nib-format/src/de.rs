use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::counting::CountingReader;
use crate::header::{NibHeader, Section, SectionInfo, TableOfContents, Version, MAGIC_BYTES};
use crate::value::constants::*;
use crate::varint::ReadVarintExt;
use crate::{ClassName, DecodeOptions, Entry, NibError, Object, Result, Value};

/// Upper bound on up-front allocations driven by counts read from the file.
const PREALLOC_LIMIT: usize = 4096;

/// Read exactly `len` bytes without trusting `len` for the allocation.
fn read_bytes<R: Read>(reader: &mut R, len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(len.min(PREALLOC_LIMIT));
    reader
        .take(len as u64)
        .read_to_end(&mut buf)
        .map_err(NibError::read)?;

    if buf.len() != len {
        return Err(NibError::read(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("expected {} bytes, found {}", len, buf.len()),
        )));
    }

    Ok(buf)
}

fn read_i32_le<R: Read>(reader: &mut R) -> Result<i32> {
    reader.read_i32::<LittleEndian>().map_err(NibError::read)
}

pub(crate) trait DeserializeOwned {
    fn deserialize_owned<R: Read>(reader: &mut CountingReader<R>) -> Result<Self>
    where
        Self: Sized;
}

/// Decode `count` consecutive records of one section.
pub(crate) fn deserialize_section<T: DeserializeOwned, R: Read>(
    reader: &mut CountingReader<R>,
    section: Section,
    count: usize,
) -> Result<Vec<T>> {
    let start = reader.position();
    let mut buf = Vec::with_capacity(count.min(PREALLOC_LIMIT));
    for _ in 0..count {
        buf.push(T::deserialize_owned(reader)?);
    }
    let end = reader.position();
    tracing::debug!(
        start = format_args!("{:#x}", start),
        end = format_args!("{:#x}", end),
        bytes = end - start,
        count,
        %section,
        "deserialized section"
    );
    Ok(buf)
}

/// Read the magic bytes, version and table of contents.
///
/// The magic bytes are checked before anything else is read, and the version
/// before the table of contents.
pub(crate) fn deserialize_header<R: Read>(
    reader: &mut CountingReader<R>,
    options: &DecodeOptions,
) -> Result<NibHeader> {
    let start = reader.position();

    let mut magic_bytes = [0u8; 10];
    reader
        .read_exact(&mut magic_bytes)
        .map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => NibError::InvalidHeader,
            _ => NibError::read(e),
        })?;
    if &magic_bytes != MAGIC_BYTES {
        return Err(NibError::InvalidHeader);
    }

    let version = Version::deserialize_owned(reader)?;
    if options.check_version && !version.is_supported() {
        return Err(NibError::UnsupportedVersion {
            major: version.major,
            minor: version.minor,
        });
    }

    let toc = TableOfContents::deserialize_owned(reader)?;

    let end = reader.position();
    tracing::debug!(
        start = format_args!("{:#x}", start),
        end = format_args!("{:#x}", end),
        bytes = end - start,
        %version,
        "deserialized NibHeader"
    );

    Ok(NibHeader {
        magic_bytes,
        version,
        toc,
    })
}

impl DeserializeOwned for Version {
    fn deserialize_owned<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
        let major = read_i32_le(reader)?;
        let minor = read_i32_le(reader)?;
        Ok(Version { major, minor })
    }
}

impl DeserializeOwned for TableOfContents {
    fn deserialize_owned<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
        let mut toc = TableOfContents::default();
        for section in Section::ALL.iter() {
            let count = read_i32_le(reader)?;
            let offset = read_i32_le(reader)?;
            tracing::debug!(%section, count, offset = format_args!("{:#x}", offset), "table of contents");
            toc[*section] = SectionInfo { count, offset };
        }
        Ok(toc)
    }
}

impl DeserializeOwned for Object {
    fn deserialize_owned<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
        let start = reader.position();
        let class_name_index = reader.read_varint()?;
        let values_start_index = reader.read_varint()?;
        let values_count = reader.read_varint()?;
        tracing::trace!(
            start = format_args!("{:#x}", start),
            class_name_index,
            values_start_index,
            values_count,
            "deserialized Object"
        );
        Ok(Object {
            class_name_index,
            values_start_index,
            values_count,
        })
    }
}

/// Keys: varint byte length, then UTF-8 without a terminator.
impl DeserializeOwned for String {
    fn deserialize_owned<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
        let start = reader.position();
        let len = reader.read_varint()?;
        let buf = read_bytes(reader, len)?;
        let key =
            String::from_utf8(buf).map_err(|e| NibError::InvalidUtf8String(e.into_bytes()))?;
        tracing::trace!(start = format_args!("{:#x}", start), len, %key, "deserialized key");
        Ok(key)
    }
}

impl DeserializeOwned for Entry {
    fn deserialize_owned<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
        let start = reader.position();
        let key_index = reader.read_varint()?;
        let value = Value::deserialize_owned(reader)?;
        let end = reader.position();
        tracing::trace!(
            start = format_args!("{:#x}", start),
            bytes = end - start,
            key_index,
            ty = value.type_name(),
            "deserialized Entry"
        );
        Ok(Entry { key_index, value })
    }
}

impl DeserializeOwned for Value {
    fn deserialize_owned<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
        let tag = reader.read_u8().map_err(NibError::read)?;

        let value = match tag {
            VALUE_INT8 => Value::Int8(reader.read_i8().map_err(NibError::read)?),
            VALUE_INT16 => {
                Value::Int16(reader.read_i16::<LittleEndian>().map_err(NibError::read)?)
            }
            VALUE_INT32 => Value::Int32(read_i32_le(reader)?),
            VALUE_INT64 => {
                Value::Int64(reader.read_i64::<LittleEndian>().map_err(NibError::read)?)
            }
            VALUE_TRUE => Value::True,
            VALUE_FALSE => Value::False,
            VALUE_FLOAT => {
                Value::Float(reader.read_f32::<LittleEndian>().map_err(NibError::read)?)
            }
            VALUE_DOUBLE => {
                Value::Double(reader.read_f64::<LittleEndian>().map_err(NibError::read)?)
            }
            VALUE_DATA => {
                let len = reader.read_varint()?;
                Value::Data(read_bytes(reader, len)?)
            }
            VALUE_NIL => Value::Nil,
            VALUE_OBJECT => Value::Object(read_i32_le(reader)?),
            tag => return Err(NibError::UnknownValueType(tag)),
        };

        Ok(value)
    }
}

/// Class names: varint length (terminator included), varint count of extra
/// values, the extra values, then the NUL-terminated name.
impl DeserializeOwned for ClassName {
    fn deserialize_owned<R: Read>(reader: &mut CountingReader<R>) -> Result<Self> {
        let start = reader.position();
        let len = reader.read_varint()?;
        let extra_values_count = reader.read_varint()?;

        let mut extra_values = Vec::with_capacity(extra_values_count.min(PREALLOC_LIMIT));
        for _ in 0..extra_values_count {
            extra_values.push(read_i32_le(reader)?);
        }

        let mut buf = read_bytes(reader, len)?;
        if buf.last() != Some(&0) {
            return Err(NibError::UnterminatedString(buf));
        }
        buf.pop();

        let class_name =
            String::from_utf8(buf).map_err(|e| NibError::InvalidUtf8String(e.into_bytes()))?;

        tracing::trace!(
            start = format_args!("{:#x}", start),
            len,
            extra_values = extra_values.len(),
            %class_name,
            "deserialized ClassName"
        );

        Ok(ClassName {
            extra_values,
            class_name,
        })
    }
}

use std::io::{Cursor, Read, Write};

use byteorder::{ByteOrder, LittleEndian};

use crate::counting::CountingReader;
use crate::de::{deserialize_header, deserialize_section};
use crate::header::{
    NibHeader, Section, TableOfContents, Version, HEADER_SIZE, MAX_SUPPORTED_VERSION,
};
use crate::ser::{section_count, section_len, serialize_section, Serialize};
use crate::{ClassName, Entry, NibError, Object, Result, Value};

#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Reject archives newer than [`MAX_SUPPORTED_VERSION`].
    pub check_version: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            check_version: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeOptions {
    /// Leave every section offset as zero. The output cannot be decoded again;
    /// this only exists for inspecting the section layout.
    pub skip_offset_patch: bool,
}

/// A decoded NIBArchive.
///
/// Cross references between sections are kept as plain indices and are not
/// checked when decoding; the lookup helpers return `None` for indices that
/// point nowhere.
#[derive(Debug, Clone, PartialEq)]
pub struct Archive {
    pub version: Version,
    pub objects: Vec<Object>,
    pub keys: Vec<String>,
    pub entries: Vec<Entry>,
    pub class_names: Vec<ClassName>,
}

impl Default for Archive {
    fn default() -> Self {
        Archive::new(MAX_SUPPORTED_VERSION)
    }
}

impl Archive {
    pub fn new(version: Version) -> Archive {
        Archive {
            version,
            objects: vec![],
            keys: vec![],
            entries: vec![],
            class_names: vec![],
        }
    }

    pub fn decode<R: Read>(reader: R) -> Result<Archive> {
        Archive::decode_with_options(reader, &DecodeOptions::default())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Archive> {
        Archive::decode(bytes)
    }

    /// Decode an archive from `reader`. Offsets in the table of contents are
    /// measured from wherever `reader` is positioned when this is called.
    pub fn decode_with_options<R: Read>(reader: R, options: &DecodeOptions) -> Result<Archive> {
        let mut reader = CountingReader::new(reader);
        let header = deserialize_header(&mut reader, options)?;
        let mut archive = Archive::new(header.version);

        // Sections may be stored in any order, but must be contiguous.
        for (section, info) in header.toc.by_offset().iter() {
            let position = reader.position();
            if i64::from(info.offset) != position as i64 {
                tracing::debug!(
                    %section,
                    expected = format_args!("{:#x}", info.offset),
                    actual = format_args!("{:#x}", position),
                    "section offset mismatch"
                );
                return Err(NibError::UnexpectedData { offset: position });
            }

            let count = usize::try_from(info.count).map_err(|_| NibError::InvalidSectionCount {
                section: *section,
                count: info.count,
            })?;

            match section {
                Section::Objects => {
                    archive.objects = deserialize_section(&mut reader, *section, count)?
                }
                Section::Keys => archive.keys = deserialize_section(&mut reader, *section, count)?,
                Section::Entries => {
                    archive.entries = deserialize_section(&mut reader, *section, count)?
                }
                Section::ClassNames => {
                    archive.class_names = deserialize_section(&mut reader, *section, count)?
                }
            }
        }

        tracing::debug!(
            version = %archive.version,
            objects = archive.objects.len(),
            keys = archive.keys.len(),
            entries = archive.entries.len(),
            class_names = archive.class_names.len(),
            bytes = reader.position(),
            "decoded archive"
        );

        Ok(archive)
    }

    /// Read only the header and table of contents.
    pub fn read_header<R: Read>(reader: R, options: &DecodeOptions) -> Result<NibHeader> {
        let mut reader = CountingReader::new(reader);
        deserialize_header(&mut reader, options)
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        self.encode_with_options(&EncodeOptions::default())
    }

    pub fn encode_with_options(&self, options: &EncodeOptions) -> Result<Vec<u8>> {
        let (mut buf, toc) = self.encode_inner()?;

        if !options.skip_offset_patch {
            patch_offsets(&mut buf, &toc)?;
        }

        Ok(buf)
    }

    /// Encode and write the whole archive to `writer`, returning the number of
    /// bytes written.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<usize> {
        let buf = self.encode()?;
        writer.write_all(&buf).map_err(NibError::write)?;
        writer.flush().map_err(NibError::write)?;
        Ok(buf.len())
    }

    /// The table of contents this archive is written with, computed from the
    /// encoded record sizes without encoding anything.
    pub fn table_of_contents(&self) -> Result<TableOfContents> {
        let mut toc = self.section_counts()?;
        let mut offset = HEADER_SIZE;

        for section in Section::ALL.iter() {
            toc[*section].offset = section_offset(*section, offset as u64)?;
            offset += match section {
                Section::Objects => section_len(&self.objects),
                Section::Keys => section_len(&self.keys),
                Section::Entries => section_len(&self.entries),
                Section::ClassNames => section_len(&self.class_names),
            };
        }

        Ok(toc)
    }

    fn section_counts(&self) -> Result<TableOfContents> {
        let mut toc = TableOfContents::default();
        toc[Section::Objects].count = section_count(Section::Objects, self.objects.len())?;
        toc[Section::Keys].count = section_count(Section::Keys, self.keys.len())?;
        toc[Section::Entries].count = section_count(Section::Entries, self.entries.len())?;
        toc[Section::ClassNames].count =
            section_count(Section::ClassNames, self.class_names.len())?;
        Ok(toc)
    }

    /// Writes the header with zeroed offsets, then every section in table
    /// order, noting where each one starts.
    fn encode_inner(&self) -> Result<(Vec<u8>, TableOfContents)> {
        let mut toc = self.section_counts()?;

        let mut cursor = Cursor::new(Vec::new());
        NibHeader::new(self.version, toc).write(&mut cursor)?;

        for section in Section::ALL.iter() {
            let start = cursor.position();
            toc[*section].offset = section_offset(*section, start)?;

            match section {
                Section::Objects => serialize_section(&mut cursor, &self.objects)?,
                Section::Keys => serialize_section(&mut cursor, &self.keys)?,
                Section::Entries => serialize_section(&mut cursor, &self.entries)?,
                Section::ClassNames => serialize_section(&mut cursor, &self.class_names)?,
            }

            let end = cursor.position();
            tracing::debug!(
                %section,
                start = format_args!("{:#x}", start),
                end = format_args!("{:#x}", end),
                bytes = end - start,
                "serialized section"
            );
        }

        Ok((cursor.into_inner(), toc))
    }

    /// The class name of `object`.
    #[inline(always)]
    pub fn class_name(&self, object: &Object) -> Option<&ClassName> {
        self.class_names.get(object.class_name_index)
    }

    /// The entries belonging to `object`.
    #[inline(always)]
    pub fn object_entries(&self, object: &Object) -> Option<&[Entry]> {
        self.entries.get(object.values_range()?)
    }

    #[inline(always)]
    pub fn key(&self, entry: &Entry) -> Option<&str> {
        self.keys.get(entry.key_index).map(|k| k.as_str())
    }

    /// The object an [`Value::Object`] points at.
    #[inline(always)]
    pub fn referenced_object(&self, value: &Value) -> Option<&Object> {
        let index = usize::try_from(value.as_object()?).ok()?;
        self.objects.get(index)
    }
}

/// Table of contents offsets are 32-bit.
fn section_offset(section: Section, start: u64) -> Result<i32> {
    i32::try_from(start).map_err(|_| NibError::SectionTooLarge {
        section,
        len: start as usize,
    })
}

/// Overwrite the placeholder offsets of an already encoded header.
fn patch_offsets(buf: &mut [u8], toc: &TableOfContents) -> Result<()> {
    for (section, info) in toc.iter() {
        let start = NibHeader::offset_field_position(section);
        let field = buf
            .get_mut(start..start + 4)
            .ok_or(NibError::InternalError)?;
        LittleEndian::write_i32(field, info.offset);
    }
    Ok(())
}

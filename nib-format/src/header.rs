use std::fmt;
use std::ops::{Index, IndexMut};

pub const MAGIC_BYTES: &[u8; 10] = b"NIBArchive";

/// Newest version this crate has been checked against.
pub const MAX_SUPPORTED_VERSION: Version = Version {
    major: 1,
    minor: 10,
};

/// Magic, version and table of contents.
pub const HEADER_SIZE: usize = MAGIC_BYTES.len() + 2 * 4 + Section::ALL.len() * 8;

/// Byte offset of the first table of contents entry.
pub(crate) const TOC_START: usize = MAGIC_BYTES.len() + 2 * 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: i32,
    pub minor: i32,
}

impl Version {
    pub const fn new(major: i32, minor: i32) -> Version {
        Version { major, minor }
    }

    #[inline(always)]
    pub fn is_supported(self) -> bool {
        self <= MAX_SUPPORTED_VERSION
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// The four sections of an archive body, in table of contents order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Objects,
    Keys,
    Entries,
    ClassNames,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Objects,
        Section::Keys,
        Section::Entries,
        Section::ClassNames,
    ];

    #[inline(always)]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Section::Objects => "objects",
            Section::Keys => "keys",
            Section::Entries => "entries",
            Section::ClassNames => "class names",
        };

        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionInfo {
    pub count: i32,
    pub offset: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableOfContents(pub [SectionInfo; 4]);

impl TableOfContents {
    pub fn iter(&self) -> impl Iterator<Item = (Section, SectionInfo)> + '_ {
        Section::ALL.iter().map(move |s| (*s, self[*s]))
    }

    /// Sections ordered by the offset they claim to start at. Ties keep table
    /// order, which is how empty sections sharing an offset are laid out.
    pub fn by_offset(&self) -> [(Section, SectionInfo); 4] {
        let mut sections = [
            (Section::Objects, self[Section::Objects]),
            (Section::Keys, self[Section::Keys]),
            (Section::Entries, self[Section::Entries]),
            (Section::ClassNames, self[Section::ClassNames]),
        ];
        sections.sort_by_key(|(_, info)| info.offset);
        sections
    }
}

impl Index<Section> for TableOfContents {
    type Output = SectionInfo;

    fn index(&self, section: Section) -> &SectionInfo {
        &self.0[section.index()]
    }
}

impl IndexMut<Section> for TableOfContents {
    fn index_mut(&mut self, section: Section) -> &mut SectionInfo {
        &mut self.0[section.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NibHeader {
    pub magic_bytes: [u8; 10],
    pub version: Version,
    pub toc: TableOfContents,
}

impl NibHeader {
    pub fn new(version: Version, toc: TableOfContents) -> NibHeader {
        NibHeader {
            magic_bytes: *MAGIC_BYTES,
            version,
            toc,
        }
    }

    /// Position of the `offset` field of `section` inside an encoded header.
    #[inline(always)]
    pub(crate) fn offset_field_position(section: Section) -> usize {
        TOC_START + section.index() * 8 + 4
    }
}

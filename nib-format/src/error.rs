use crate::header::Section;

pub type Result<T> = std::result::Result<T, NibError>;

#[derive(Debug, thiserror::Error)]
pub enum NibError {
    #[error("Invalid header (the file does not start with `NIBArchive`).")]
    InvalidHeader,

    #[error("Unsupported archive version {major}.{minor}.")]
    UnsupportedVersion { major: i32, minor: i32 },

    /// Every byte of an archive is expected to belong to a section, so a section
    /// not starting exactly where the table of contents says it does is fatal.
    #[error("Unexpected data at offset {offset:#x}.")]
    UnexpectedData { offset: u64 },

    #[error("Unknown value type: {0}")]
    UnknownValueType(u8),

    #[error("Varint does not fit in a machine word.")]
    VarintTooLarge,

    #[error("Invalid UTF-8 string: {0:02x?}")]
    InvalidUtf8String(Vec<u8>),

    #[error("String is not NUL-terminated: {0:02x?}")]
    UnterminatedString(Vec<u8>),

    #[error("Negative record count for {section}: {count}")]
    InvalidSectionCount { section: Section, count: i32 },

    #[error("{section} is too large to encode ({len} bytes or records).")]
    SectionTooLarge { section: Section, len: usize },

    #[error("Failed to read archive data.")]
    ReadFailure(#[source] std::io::Error),

    #[error("Failed to write archive data.")]
    WriteFailure(#[source] std::io::Error),

    #[error("Internal error.")]
    InternalError,
}

impl NibError {
    pub(crate) fn read(err: std::io::Error) -> NibError {
        NibError::ReadFailure(err)
    }

    pub(crate) fn write(err: std::io::Error) -> NibError {
        NibError::WriteFailure(err)
    }
}

//! Reading and writing of compiled `NIBArchive` interface files.
//!
//! Use [Archive::decode][Archive::decode] or [Archive::open][Archive::open] to
//! read an archive, and [Archive::encode][Archive::encode] to get its bytes
//! back. Encoding a decoded archive reproduces the original file exactly.

mod archive;
pub mod counting;
mod de;
mod error;
mod fs;
pub mod header;
mod inspect;
mod record;
mod ser;
pub mod value;
pub mod varint;

pub use archive::{Archive, DecodeOptions, EncodeOptions};
pub use error::{NibError, Result};
pub use header::{NibHeader, Section, SectionInfo, TableOfContents, Version};
pub use record::{ClassName, Entry, Object};
pub use value::Value;

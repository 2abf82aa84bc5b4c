use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use memmap2::MmapOptions;

use crate::{Archive, DecodeOptions, NibError, Result};

impl Archive {
    /// Decode the `.nib` file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Archive> {
        Archive::open_with_options(path, &DecodeOptions::default())
    }

    pub fn open_with_options<P: AsRef<Path>>(path: P, options: &DecodeOptions) -> Result<Archive> {
        let file = File::open(path.as_ref()).map_err(NibError::read)?;
        let len = file.metadata().map_err(NibError::read)?.len();

        // Zero-length mappings are an error on some platforms.
        if len == 0 {
            return Archive::decode_with_options(&[][..], options);
        }

        let mmap = unsafe { MmapOptions::new().map(&file) }.map_err(NibError::read)?;
        tracing::debug!(path = %path.as_ref().display(), bytes = len, "mapped archive");
        Archive::decode_with_options(&mmap[..], options)
    }

    /// Encode the archive and write it to `path`, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<u64> {
        let buf = self.encode()?;

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path.as_ref())
            .map_err(NibError::write)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&buf).map_err(NibError::write)?;
        writer.flush().map_err(NibError::write)?;

        tracing::debug!(path = %path.as_ref().display(), bytes = buf.len(), "saved archive");
        Ok(buf.len() as u64)
    }
}

//! Counting reader wrapper for tracking the position inside an archive.

use std::io::{Read, Result};

/// A reader wrapper that counts bytes read through it.
///
/// Positions are relative to where the wrapped reader was when the wrapper was
/// created, which is what table-of-contents offsets are measured against.
pub struct CountingReader<R> {
    inner: R,
    bytes_read: u64,
}

impl<R> CountingReader<R> {
    /// Create a new counting reader wrapping the given reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bytes_read: 0,
        }
    }

    /// Number of bytes consumed since construction.
    pub fn position(&self) -> u64 {
        self.bytes_read
    }

    /// Consume this wrapper and return the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = self.inner.read(buf)?;
        self.bytes_read += n as u64;
        Ok(n)
    }
}

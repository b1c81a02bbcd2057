//! Byte source abstraction for decode input
//!
//! A [`ByteSource`] is the capability the decoder needs from its input:
//! sequential forward reads. File, memory, and network backends all fit
//! behind the same trait; the decoder never seeks.

use crate::error::Result;
use bytes::{Buf, Bytes};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Capability trait for decode input
///
/// Implementations provide sequential forward reads only. `read` may return
/// fewer bytes than the buffer holds; zero means end of source.
pub trait ByteSource {
    /// Read up to `buf.len()` bytes, returning how many were read
    ///
    /// Returns `Ok(0)` at end of source. Short reads are allowed at any
    /// point; callers that need a full buffer use [`read_full`].
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Hint of how many bytes remain, if the backend knows
    fn available(&self) -> Option<u64> {
        None
    }
}

/// Read until `buf` is full or the source is exhausted
///
/// Returns the number of bytes actually read, which is less than
/// `buf.len()` only at end of source.
pub fn read_full(source: &mut dyn ByteSource, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = source.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// File-backed byte source
pub struct FileSource {
    reader: BufReader<File>,
    remaining: Option<u64>,
}

impl FileSource {
    /// Open a file for decoding
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let remaining = file.metadata().ok().map(|m| m.len());
        Ok(FileSource {
            reader: BufReader::new(file),
            remaining,
        })
    }
}

impl ByteSource for FileSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = self.reader.read(buf)?;
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining = remaining.saturating_sub(n as u64);
        }
        Ok(n)
    }

    fn available(&self) -> Option<u64> {
        self.remaining
    }
}

/// In-memory byte source
///
/// Backed by [`Bytes`], so constructing one from an existing buffer is
/// reference counted rather than copied.
pub struct MemorySource {
    data: Bytes,
}

impl MemorySource {
    /// Create a source over an in-memory buffer
    pub fn new(data: impl Into<Bytes>) -> Self {
        MemorySource { data: data.into() }
    }
}

impl ByteSource for MemorySource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = self.data.remaining().min(buf.len());
        self.data.copy_to_slice(&mut buf[..n]);
        Ok(n)
    }

    fn available(&self) -> Option<u64> {
        Some(self.data.remaining() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_reads_sequentially() {
        let mut source = MemorySource::new(vec![1u8, 2, 3, 4, 5]);
        assert_eq!(source.available(), Some(5));

        let mut buf = [0u8; 3];
        assert_eq!(source.read(&mut buf).unwrap(), 3);
        assert_eq!(buf, [1, 2, 3]);

        assert_eq!(source.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[4, 5]);
        assert_eq!(source.read(&mut buf).unwrap(), 0);
        assert_eq!(source.available(), Some(0));
    }

    #[test]
    fn test_read_full_stops_at_eof() {
        let mut source = MemorySource::new(vec![9u8; 4]);
        let mut buf = [0u8; 8];
        assert_eq!(read_full(&mut source, &mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], &[9, 9, 9, 9]);
    }
}

//! Chunk-level RIFF parsing over a forward-only byte source
//!
//! The reader never seeks: skipping a chunk discards its payload through a
//! bounded scratch buffer, so network and pipe sources work the same as
//! files.

use super::{RIFF_MAGIC, WAVE_MAGIC};
use crate::error::{Error, Result};
use crate::source::{read_full, ByteSource};

/// Scratch size used when discarding skipped chunk payloads
const SKIP_BUF_SIZE: usize = 512;

/// The outer RIFF container header
///
/// Immutable once read; `riff_size` is the byte length the container claims
/// for everything after the size field itself.
#[derive(Debug, Clone, Copy)]
pub struct ContainerHeader {
    pub riff_size: u32,
}

/// Chunk header (4 byte ID + 4 byte little-endian size)
#[derive(Debug, Clone, Copy)]
pub struct ChunkHeader {
    pub id: [u8; 4],
    pub size: u32,
}

impl ChunkHeader {
    /// Read a chunk header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 8 {
            return None;
        }

        let mut id = [0u8; 4];
        id.copy_from_slice(&bytes[0..4]);

        let size = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);

        Some(ChunkHeader { id, size })
    }

    /// Payload size including the RIFF pad byte
    ///
    /// Chunks with an odd length are padded to even length; the pad byte is
    /// not part of the payload but must be consumed before the next header.
    pub fn padded_size(&self) -> u64 {
        self.size as u64 + (self.size % 2) as u64
    }

    /// Chunk ID as text, for log and error messages
    pub fn id_display(&self) -> String {
        self.id
            .iter()
            .map(|&b| {
                if b.is_ascii_graphic() || b == b' ' {
                    b as char
                } else {
                    '?'
                }
            })
            .collect()
    }
}

/// Read and verify the outer `RIFF` + size + `WAVE` preamble
///
/// The first chunk of the stream must be the RIFF container header; any
/// mismatch is a fatal parse error.
pub fn read_container_header(source: &mut dyn ByteSource) -> Result<ContainerHeader> {
    let mut preamble = [0u8; 12];
    if read_full(source, &mut preamble)? < preamble.len() {
        return Err(Error::container("source too short for a RIFF header"));
    }

    if &preamble[0..4] != RIFF_MAGIC {
        return Err(Error::container("not a RIFF stream"));
    }
    if &preamble[8..12] != WAVE_MAGIC {
        return Err(Error::container("RIFF form is not WAVE"));
    }

    let riff_size = u32::from_le_bytes([preamble[4], preamble[5], preamble[6], preamble[7]]);
    Ok(ContainerHeader { riff_size })
}

/// Read the next chunk header, or `None` at end of container
///
/// Fewer than 8 bytes remaining means the container is over; a truncated
/// trailing header is treated the same as a clean end, not an error.
pub fn next_chunk(source: &mut dyn ByteSource) -> Result<Option<ChunkHeader>> {
    let mut raw = [0u8; 8];
    if read_full(source, &mut raw)? < raw.len() {
        return Ok(None);
    }
    Ok(ChunkHeader::from_bytes(&raw))
}

/// Discard up to `count` bytes, returning how many were consumed
///
/// Stops short only at end of source.
pub fn discard(source: &mut dyn ByteSource, count: u64) -> Result<u64> {
    let mut left = count;
    let mut scratch = [0u8; SKIP_BUF_SIZE];
    while left > 0 {
        let want = left.min(scratch.len() as u64) as usize;
        let got = read_full(source, &mut scratch[..want])?;
        if got == 0 {
            break;
        }
        left -= got as u64;
    }
    Ok(count - left)
}

/// Discard a chunk's payload, pad byte included
///
/// End of source mid-skip is tolerated; the container simply ended inside a
/// chunk nobody cared about.
pub fn skip_chunk(source: &mut dyn ByteSource, header: &ChunkHeader) -> Result<()> {
    discard(source, header.padded_size())?;
    Ok(())
}

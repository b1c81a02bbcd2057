//! RIFF/WAVE container support
//!
//! A WAV file is an outer `RIFF` header with a `WAVE` form tag followed by
//! any number of tagged, length-prefixed chunks. Only `fmt ` and `data` are
//! interpreted; everything else is skip-parsed, never rejected.

pub mod chunk;
pub mod header;

pub use chunk::{next_chunk, read_container_header, skip_chunk, ChunkHeader, ContainerHeader};
pub use header::{FormatTag, WavFormat};

/// WAV format magic numbers
pub const RIFF_MAGIC: &[u8; 4] = b"RIFF";
pub const WAVE_MAGIC: &[u8; 4] = b"WAVE";
pub const FMT_CHUNK: &[u8; 4] = b"fmt ";
pub const DATA_CHUNK: &[u8; 4] = b"data";

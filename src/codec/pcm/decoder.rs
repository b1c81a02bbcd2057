//! PCM normalizer: raw sample words to canonical signed 16-bit
//!
//! Conversion is pure and stateless; identical input bytes always produce
//! identical output regardless of stream position. Channel interleaving is
//! preserved exactly as encoded.

use super::{PcmConfig, SampleDepth};

/// Stateless PCM decoder for one stream configuration
pub struct PcmDecoder {
    config: PcmConfig,
}

impl PcmDecoder {
    /// Create a decoder for the given configuration
    pub fn new(config: PcmConfig) -> Self {
        PcmDecoder { config }
    }

    /// Stream configuration this decoder was built for
    pub fn config(&self) -> &PcmConfig {
        &self.config
    }

    /// Decode whole frames from `data`, appending interleaved samples to `out`
    ///
    /// Only complete frames are consumed; the return value is the number of
    /// bytes decoded, always a multiple of the frame size. A trailing
    /// partial frame is left untouched for the caller to treat as it sees
    /// fit (the decode session drops it as a truncated tail).
    pub fn decode(&self, data: &[u8], out: &mut Vec<i16>) -> usize {
        let frame_bytes = self.config.bytes_per_frame();
        let frames = self.config.frames_in(data.len());
        let consumed = frames * frame_bytes;

        let word = self.config.bytes_per_sample();
        out.reserve(frames * self.config.channels as usize);
        for chunk in data[..consumed].chunks_exact(word) {
            out.push(normalize(self.config.depth, chunk));
        }
        consumed
    }
}

/// Normalize one raw sample word to signed 16-bit
///
/// `word` must be exactly the depth's byte width.
fn normalize(depth: SampleDepth, word: &[u8]) -> i16 {
    match depth {
        // Unsigned with a 128 midpoint; the x256 scale leaves the low byte
        // zero, so the maximum positive output is 32512, not 32767.
        SampleDepth::U8 => (word[0] as i16 - 128) * 256,
        SampleDepth::I16 => i16::from_le_bytes([word[0], word[1]]),
        // Top two of the three little-endian bytes: an arithmetic shift
        // right by 8 that keeps the sign.
        SampleDepth::I24 => i16::from_le_bytes([word[1], word[2]]),
        SampleDepth::I32 => i16::from_le_bytes([word[2], word[3]]),
    }
}

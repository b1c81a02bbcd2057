//! PCM (Pulse Code Modulation) handling
//!
//! Raw WAV sample words come in several widths; this module knows their
//! geometry and normalizes every supported width to interleaved signed
//! 16-bit output.

pub mod decoder;

pub use decoder::PcmDecoder;

use crate::error::{Error, Result};
use crate::format::WavFormat;

/// Storage width of one raw sample word
///
/// 8-bit WAV samples are unsigned by convention; every wider depth is
/// little-endian two's-complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleDepth {
    /// Unsigned 8-bit
    U8,
    /// Signed 16-bit
    I16,
    /// Signed 24-bit, packed in 3 bytes
    I24,
    /// Signed 32-bit
    I32,
}

impl SampleDepth {
    /// Map a declared bit depth to a supported width
    pub fn from_bits(bits: u16) -> Result<Self> {
        match bits {
            8 => Ok(SampleDepth::U8),
            16 => Ok(SampleDepth::I16),
            24 => Ok(SampleDepth::I24),
            32 => Ok(SampleDepth::I32),
            other => Err(Error::format(format!(
                "unsupported bits per sample: {}",
                other
            ))),
        }
    }

    /// Size in bytes of one sample word
    pub fn sample_size(&self) -> usize {
        match self {
            SampleDepth::U8 => 1,
            SampleDepth::I16 => 2,
            SampleDepth::I24 => 3,
            SampleDepth::I32 => 4,
        }
    }
}

/// PCM stream configuration
#[derive(Debug, Clone)]
pub struct PcmConfig {
    /// Sample depth
    pub depth: SampleDepth,
    /// Number of channels
    pub channels: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl PcmConfig {
    /// Create a new PCM configuration
    pub fn new(depth: SampleDepth, channels: u16, sample_rate: u32) -> Self {
        PcmConfig {
            depth,
            channels,
            sample_rate,
        }
    }

    /// Build a configuration from a validated `fmt ` descriptor
    pub fn from_format(format: &WavFormat) -> Result<Self> {
        Ok(PcmConfig::new(
            SampleDepth::from_bits(format.bits_per_sample)?,
            format.channels,
            format.sample_rate,
        ))
    }

    /// Bytes per sample for a single channel
    pub fn bytes_per_sample(&self) -> usize {
        self.depth.sample_size()
    }

    /// Bytes per frame (all channels)
    pub fn bytes_per_frame(&self) -> usize {
        self.bytes_per_sample() * self.channels as usize
    }

    /// Whole frames contained in a byte count
    pub fn frames_in(&self, bytes: usize) -> usize {
        bytes / self.bytes_per_frame()
    }
}

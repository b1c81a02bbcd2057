//! `fmt ` chunk parsing and validation

use crate::error::{Error, Result};

/// Bit depths the PCM normalizer supports
pub const SUPPORTED_BIT_DEPTHS: [u16; 4] = [8, 16, 24, 32];

/// WAV format tag identifying the codec
///
/// Only [`FormatTag::Pcm`] decodes; the other known tags exist so a
/// rejection can name what the file actually contained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatTag {
    /// PCM (uncompressed)
    Pcm,
    /// IEEE Float
    IeeeFloat,
    /// A-Law
    ALaw,
    /// Mu-Law
    MuLaw,
    /// Extensible format
    Extensible,
    /// Unknown format
    Unknown(u16),
}

impl From<u16> for FormatTag {
    fn from(val: u16) -> Self {
        match val {
            0x0001 => FormatTag::Pcm,
            0x0003 => FormatTag::IeeeFloat,
            0x0006 => FormatTag::ALaw,
            0x0007 => FormatTag::MuLaw,
            0xFFFE => FormatTag::Extensible,
            other => FormatTag::Unknown(other),
        }
    }
}

impl From<FormatTag> for u16 {
    fn from(tag: FormatTag) -> Self {
        match tag {
            FormatTag::Pcm => 0x0001,
            FormatTag::IeeeFloat => 0x0003,
            FormatTag::ALaw => 0x0006,
            FormatTag::MuLaw => 0x0007,
            FormatTag::Extensible => 0xFFFE,
            FormatTag::Unknown(val) => val,
        }
    }
}

/// Parsed `fmt ` chunk data
///
/// Immutable for the lifetime of a decode session once validated.
#[derive(Debug, Clone)]
pub struct WavFormat {
    /// Format tag (codec ID)
    pub format_tag: FormatTag,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Average bytes per second
    pub byte_rate: u32,
    /// Byte size of one interleaved frame
    pub block_align: u16,
    /// Bits per sample
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// Parse the standard 16-byte PCM format block
    ///
    /// Extension bytes beyond 16 (extensible formats append them) are the
    /// caller's to discard; they are never interpreted here.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < 16 {
            return Err(Error::format(format!(
                "fmt chunk too small: {} bytes, need 16",
                data.len()
            )));
        }

        Ok(WavFormat {
            format_tag: u16::from_le_bytes([data[0], data[1]]).into(),
            channels: u16::from_le_bytes([data[2], data[3]]),
            sample_rate: u32::from_le_bytes([data[4], data[5], data[6], data[7]]),
            byte_rate: u32::from_le_bytes([data[8], data[9], data[10], data[11]]),
            block_align: u16::from_le_bytes([data[12], data[13]]),
            bits_per_sample: u16::from_le_bytes([data[14], data[15]]),
        })
    }

    /// Expected block alignment for the declared geometry
    ///
    /// Computed in u32: a hostile header can declare a channel count and
    /// depth whose product does not fit a u16, and that must read as a
    /// mismatch, not an overflow.
    pub fn calculate_block_align(&self) -> u32 {
        self.channels as u32 * (self.bits_per_sample as u32 / 8)
    }

    /// Validate the format for PCM decoding
    ///
    /// No partial or best-effort decode: any violation aborts the session.
    pub fn validate(&self) -> Result<()> {
        if self.format_tag != FormatTag::Pcm {
            return Err(Error::format(format!(
                "unsupported format tag {:?} (0x{:04x}), only linear PCM decodes",
                self.format_tag,
                u16::from(self.format_tag)
            )));
        }

        if self.channels == 0 {
            return Err(Error::format("invalid channel count: 0"));
        }

        if self.sample_rate == 0 {
            return Err(Error::format("invalid sample rate: 0"));
        }

        if !SUPPORTED_BIT_DEPTHS.contains(&self.bits_per_sample) {
            return Err(Error::format(format!(
                "unsupported bits per sample: {}",
                self.bits_per_sample
            )));
        }

        let expected_block_align = self.calculate_block_align();
        if self.block_align as u32 != expected_block_align {
            return Err(Error::format(format!(
                "block align mismatch: expected {}, got {}",
                expected_block_align, self.block_align
            )));
        }

        // byte_rate is advisory; encoders get it wrong often enough that a
        // mismatch is only worth a log line.
        let expected_byte_rate = self.sample_rate as u64 * self.block_align as u64;
        if self.byte_rate as u64 != expected_byte_rate {
            tracing::debug!(
                "byte rate {} disagrees with computed {}",
                self.byte_rate,
                expected_byte_rate
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt_bytes(tag: u16, channels: u16, rate: u32, bits: u16) -> Vec<u8> {
        let block_align = channels * (bits / 8);
        let byte_rate = rate * block_align as u32;
        let mut data = Vec::new();
        data.extend_from_slice(&tag.to_le_bytes());
        data.extend_from_slice(&channels.to_le_bytes());
        data.extend_from_slice(&rate.to_le_bytes());
        data.extend_from_slice(&byte_rate.to_le_bytes());
        data.extend_from_slice(&block_align.to_le_bytes());
        data.extend_from_slice(&bits.to_le_bytes());
        data
    }

    #[test]
    fn test_format_tag_conversion() {
        assert_eq!(u16::from(FormatTag::Pcm), 0x0001);
        assert_eq!(FormatTag::from(0x0001), FormatTag::Pcm);
        assert_eq!(FormatTag::from(0x0011), FormatTag::Unknown(0x0011));
        assert_eq!(u16::from(FormatTag::Unknown(0x0011)), 0x0011);
    }

    #[test]
    fn test_parse_standard_pcm_block() {
        let format = WavFormat::from_bytes(&fmt_bytes(1, 2, 44100, 16)).unwrap();
        assert_eq!(format.format_tag, FormatTag::Pcm);
        assert_eq!(format.channels, 2);
        assert_eq!(format.sample_rate, 44100);
        assert_eq!(format.byte_rate, 176400);
        assert_eq!(format.block_align, 4);
        assert_eq!(format.bits_per_sample, 16);
        assert!(format.validate().is_ok());
    }

    #[test]
    fn test_parse_ignores_extension_bytes() {
        let mut data = fmt_bytes(1, 1, 8000, 8);
        data.extend_from_slice(&[0xEE; 6]); // cbSize + junk extension
        let format = WavFormat::from_bytes(&data).unwrap();
        assert_eq!(format.bits_per_sample, 8);
        assert!(format.validate().is_ok());
    }

    #[test]
    fn test_parse_rejects_undersized_chunk() {
        assert!(matches!(
            WavFormat::from_bytes(&[0u8; 12]),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_pcm_tags() {
        for tag in [0x0003u16, 0x0006, 0x0007, 0xFFFE, 0x0011] {
            let format = WavFormat::from_bytes(&fmt_bytes(tag, 1, 8000, 16)).unwrap();
            assert!(
                matches!(format.validate(), Err(Error::Format(_))),
                "tag 0x{:04x} should not validate",
                tag
            );
        }
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let format = WavFormat::from_bytes(&fmt_bytes(1, 0, 8000, 16)).unwrap();
        assert!(format.validate().is_err());

        let format = WavFormat::from_bytes(&fmt_bytes(1, 1, 8000, 12)).unwrap();
        assert!(format.validate().is_err());

        let mut format = WavFormat::from_bytes(&fmt_bytes(1, 2, 44100, 16)).unwrap();
        format.block_align = 3;
        assert!(format.validate().is_err());
    }

    #[test]
    fn test_validate_tolerates_wrong_byte_rate() {
        let mut format = WavFormat::from_bytes(&fmt_bytes(1, 1, 44100, 16)).unwrap();
        format.byte_rate = 12345;
        assert!(format.validate().is_ok());
    }
}

//! Output sink abstraction for decoded PCM
//!
//! A [`PcmSink`] receives the canonical decoder output: interleaved signed
//! 16-bit samples at the source's channel count and sample rate. The sink
//! performs no resampling; a backend that cannot match the stream rate must
//! adapt on its own side.

use crate::error::Result;
use std::io::Write;

/// Capability trait for decode output
///
/// `write` is offered interleaved samples whose length is always a whole
/// number of frames (a multiple of the channel count announced by `start`).
/// It returns how many samples it accepted; the decoder re-offers the
/// remainder on its next step, so a slow sink throttles decoding naturally.
pub trait PcmSink {
    /// Announce stream parameters before the first `write`
    fn start(&mut self, channels: u16, sample_rate: u32) -> Result<()> {
        let _ = (channels, sample_rate);
        Ok(())
    }

    /// Offer interleaved 16-bit samples, returning how many were accepted
    fn write(&mut self, samples: &[i16]) -> Result<usize>;

    /// Signal end of stream
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Sink that collects samples into memory
#[derive(Debug, Default)]
pub struct MemorySink {
    samples: Vec<i16>,
    channels: u16,
    sample_rate: u32,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All samples received so far, interleaved
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    /// Channel count announced by the decoder
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Sample rate announced by the decoder
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Consume the sink, returning the collected samples
    pub fn into_samples(self) -> Vec<i16> {
        self.samples
    }
}

impl PcmSink for MemorySink {
    fn start(&mut self, channels: u16, sample_rate: u32) -> Result<()> {
        self.channels = channels;
        self.sample_rate = sample_rate;
        Ok(())
    }

    fn write(&mut self, samples: &[i16]) -> Result<usize> {
        self.samples.extend_from_slice(samples);
        Ok(samples.len())
    }
}

/// Sink that writes raw little-endian 16-bit PCM to any [`Write`]
///
/// This is the interchange form the CLI emits; pipe it to a player that
/// accepts headerless s16le input or post-process it elsewhere.
pub struct WriteSink<W: Write> {
    writer: W,
    samples_written: u64,
}

impl<W: Write> WriteSink<W> {
    /// Wrap a writer
    pub fn new(writer: W) -> Self {
        WriteSink {
            writer,
            samples_written: 0,
        }
    }

    /// Samples written so far
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Consume the sink, returning the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PcmSink for WriteSink<W> {
    fn write(&mut self, samples: &[i16]) -> Result<usize> {
        for sample in samples {
            self.writer.write_all(&sample.to_le_bytes())?;
        }
        self.samples_written += samples.len() as u64;
        Ok(samples.len())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Sink that counts and discards samples
#[derive(Debug, Default)]
pub struct NullSink {
    samples_seen: u64,
}

impl NullSink {
    /// Create a discarding sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Samples discarded so far
    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }
}

impl PcmSink for NullSink {
    fn write(&mut self, samples: &[i16]) -> Result<usize> {
        self.samples_seen += samples.len() as u64;
        Ok(samples.len())
    }
}

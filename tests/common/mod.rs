//! Common test utilities for wavstream integration tests
//!
//! Builds WAV containers byte by byte, including deliberately malformed
//! ones, so tests control the exact wire image the decoder sees.

use wavstream::{MemorySink, MemorySource, WavSession};

// ============================================================================
// Little-endian writers
// ============================================================================

pub fn le16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

pub fn le32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

// ============================================================================
// Chunk builders
// ============================================================================

/// One tagged chunk: id + length + payload + pad byte when the length is odd
pub fn chunk(id: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + payload.len() + 1);
    out.extend_from_slice(id);
    le32(&mut out, payload.len() as u32);
    out.extend_from_slice(payload);
    if payload.len() % 2 == 1 {
        out.push(0);
    }
    out
}

/// A standard 16-byte PCM `fmt ` chunk with a consistent geometry
pub fn fmt_chunk(format_tag: u16, channels: u16, sample_rate: u32, bits: u16) -> Vec<u8> {
    let block_align = channels * (bits / 8);
    let byte_rate = sample_rate * block_align as u32;

    let mut payload = Vec::with_capacity(16);
    le16(&mut payload, format_tag);
    le16(&mut payload, channels);
    le32(&mut payload, sample_rate);
    le32(&mut payload, byte_rate);
    le16(&mut payload, block_align);
    le16(&mut payload, bits);
    chunk(b"fmt ", &payload)
}

pub fn data_chunk(payload: &[u8]) -> Vec<u8> {
    chunk(b"data", payload)
}

pub fn junk_chunk(len: usize) -> Vec<u8> {
    chunk(b"JUNK", &vec![0u8; len])
}

/// Assemble a RIFF/WAVE container from pre-built chunks
pub fn riff(chunks: &[Vec<u8>]) -> Vec<u8> {
    let body_len: usize = chunks.iter().map(|c| c.len()).sum();
    let mut out = Vec::with_capacity(12 + body_len);
    out.extend_from_slice(b"RIFF");
    le32(&mut out, (4 + body_len) as u32);
    out.extend_from_slice(b"WAVE");
    for c in chunks {
        out.extend_from_slice(c);
    }
    out
}

/// A well-formed mono/stereo PCM file in one call
pub fn simple_wav(channels: u16, sample_rate: u32, bits: u16, data: &[u8]) -> Vec<u8> {
    riff(&[fmt_chunk(1, channels, sample_rate, bits), data_chunk(data)])
}

// ============================================================================
// Decode driver
// ============================================================================

/// Run a full decode session over in-memory bytes
///
/// Returns the session outcome (frames emitted on success) alongside every
/// sample the sink received, so error cases can still assert on output.
pub fn decode_collect(bytes: Vec<u8>) -> (wavstream::Result<u64>, Vec<i16>) {
    let mut source = MemorySource::new(bytes);
    let mut sink = MemorySink::new();
    let result: wavstream::Result<u64> = (|| {
        let mut session = WavSession::new();
        session.begin(&mut source, &mut sink)?;
        let frames = session.run()?;
        session.stop();
        Ok(frames)
    })();
    (result, sink.into_samples())
}

/// Decode and unwrap, for tests that expect success
pub fn decode_samples(bytes: Vec<u8>) -> Vec<i16> {
    let (result, samples) = decode_collect(bytes);
    result.expect("decode should succeed");
    samples
}

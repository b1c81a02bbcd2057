//! Codec implementations
//!
//! Uncompressed linear PCM is the only codec in scope; compressed WAV
//! payloads are rejected at format validation.

pub mod pcm;

pub use pcm::{PcmConfig, PcmDecoder, SampleDepth};

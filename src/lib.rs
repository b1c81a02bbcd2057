//! wavstream - a streaming RIFF/WAVE decoder producing canonical 16-bit PCM
//!
//! wavstream reads uncompressed PCM audio out of WAV containers of any
//! supported bit depth (8, 16, 24, 32) and channel count and delivers it as
//! interleaved signed 16-bit samples, incrementally, to a caller-supplied
//! sink. The whole pipeline is pull-driven and single-threaded: the caller
//! repeatedly steps a [`WavSession`] and every step performs a bounded
//! amount of work, so the decoder suits memory-constrained and cooperative
//! environments.
//!
//! # Architecture
//!
//! - `format`: RIFF/WAVE container parsing (chunk walking, `fmt ` chunk)
//! - `codec`: PCM sample normalization to signed 16-bit
//! - `source`: byte source capability trait and backends
//! - `sink`: PCM sink capability trait and backends
//! - `session`: the decode state machine tying the above together
//!
//! # Example
//!
//! ```
//! use wavstream::{MemorySink, MemorySource, WavSession};
//!
//! # fn demo(wav_bytes: Vec<u8>) -> wavstream::Result<Vec<i16>> {
//! let mut source = MemorySource::new(wav_bytes);
//! let mut sink = MemorySink::new();
//! let mut session = WavSession::new();
//! session.begin(&mut source, &mut sink)?;
//! session.run()?;
//! session.stop();
//! # Ok(sink.into_samples())
//! # }
//! ```

pub mod codec;
pub mod error;
pub mod format;
pub mod session;
pub mod sink;
pub mod source;

pub use codec::pcm::{PcmConfig, PcmDecoder, SampleDepth};
pub use error::{Error, Result};
pub use format::wav::{FormatTag, WavFormat};
pub use session::{State, Step, WavSession};
pub use sink::{MemorySink, NullSink, PcmSink, WriteSink};
pub use source::{ByteSource, FileSource, MemorySource};

/// wavstream version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

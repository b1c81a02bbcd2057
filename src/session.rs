//! Decode session state machine
//!
//! A [`WavSession`] binds a byte source to a PCM sink and streams the
//! container through the normalizer one bounded step at a time. The caller
//! drives it: `begin` parses the header, then `step` is called repeatedly
//! until it reports [`Step::Finished`], and `stop` releases the bindings.
//! Each step does at most one batch of frames, so the calling thread can
//! interleave other work between steps.

use crate::codec::pcm::{PcmConfig, PcmDecoder};
use crate::error::{Error, Result};
use crate::format::wav::{
    self, next_chunk, read_container_header, skip_chunk, ChunkHeader, WavFormat,
};
use crate::sink::PcmSink;
use crate::source::{read_full, ByteSource};
use bytes::{Buf, Bytes};

/// Upper bound on frames decoded per `step` call
const FRAMES_PER_STEP: u64 = 128;

/// Decode session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No source bound
    Idle,
    /// Walking chunks looking for `fmt ` and `data`
    HeaderScan,
    /// Header parsed, no data consumed yet
    Ready,
    /// Consuming `data` chunk bytes
    Streaming,
    /// Data chunk exhausted, all frames delivered
    Finished,
    /// A fatal error ended the session
    Failed,
}

/// Outcome of one iteration step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// More data remains; call `step` again
    Continue,
    /// The stream is fully decoded
    Finished,
}

/// A single decode session over caller-owned source and sink
///
/// The source and sink are borrowed for the session lifetime, mirroring the
/// loop-driven decoder this design comes from: the caller keeps ownership
/// and the session holds only the bindings, released by [`stop`].
///
/// [`stop`]: WavSession::stop
///
/// ```no_run
/// use wavstream::{FileSource, MemorySink, Step, WavSession};
///
/// # fn main() -> wavstream::Result<()> {
/// let mut source = FileSource::open("tone.wav")?;
/// let mut sink = MemorySink::new();
/// let mut session = WavSession::new();
/// session.begin(&mut source, &mut sink)?;
/// while session.step()? == Step::Continue {}
/// session.stop();
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct WavSession<'a> {
    state: State,
    source: Option<&'a mut dyn ByteSource>,
    sink: Option<&'a mut dyn PcmSink>,
    format: Option<WavFormat>,
    decoder: Option<PcmDecoder>,
    /// Bytes left in the active `data` chunk
    data_remaining: u64,
    /// Data payload buffered during the header scan when `data` preceded
    /// `fmt ` in the container; drained before the source is read again
    spool: Bytes,
    /// Normalized samples not yet accepted by the sink
    pending: Vec<i16>,
    pending_pos: usize,
    scratch: Vec<u8>,
    samples_emitted: u64,
}

impl Default for State {
    fn default() -> Self {
        State::Idle
    }
}

impl<'a> WavSession<'a> {
    /// Create an idle session
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state
    pub fn state(&self) -> State {
        self.state
    }

    /// The parsed format descriptor, available from `Ready` onward
    pub fn format(&self) -> Option<&WavFormat> {
        self.format.as_ref()
    }

    /// Frames delivered to the sink so far
    pub fn frames_emitted(&self) -> u64 {
        match &self.format {
            Some(format) => self.samples_emitted / format.channels as u64,
            None => 0,
        }
    }

    /// Bind a source and sink and scan the container header
    ///
    /// Walks chunks until both a valid `fmt ` chunk has been parsed and a
    /// `data` chunk has been located; all other chunks are skipped in any
    /// order. Container, format, and missing-chunk errors surface here,
    /// before any frame is emitted. On success the sink has been told the
    /// stream parameters and the session is `Ready`.
    pub fn begin(
        &mut self,
        source: &'a mut dyn ByteSource,
        sink: &'a mut dyn PcmSink,
    ) -> Result<()> {
        if self.state != State::Idle {
            return Err(Error::invalid_state(format!(
                "begin called in {:?}",
                self.state
            )));
        }

        self.state = State::HeaderScan;
        self.source = Some(source);
        self.sink = Some(sink);

        match self.scan_header() {
            Ok(()) => {
                self.state = State::Ready;
                Ok(())
            }
            Err(e) => {
                self.state = State::Failed;
                Err(e)
            }
        }
    }

    /// Perform one bounded unit of decode work
    ///
    /// Reads at most one batch of block-aligned frames, normalizes them,
    /// and offers them to the sink. Returns [`Step::Finished`] once the
    /// data chunk is exhausted (and keeps returning it). A source read
    /// failure moves the session to `Failed` and surfaces the error; the
    /// caller owns any retry policy.
    pub fn step(&mut self) -> Result<Step> {
        match self.state {
            State::Ready => self.state = State::Streaming,
            State::Streaming => {}
            State::Finished => return Ok(Step::Finished),
            State::Idle | State::HeaderScan => {
                return Err(Error::invalid_state("step called before begin"))
            }
            State::Failed => return Err(Error::invalid_state("session has failed")),
        }

        match self.stream_once() {
            Ok(Step::Finished) => {
                self.state = State::Finished;
                tracing::debug!("decode finished: {} frames", self.frames_emitted());
                Ok(Step::Finished)
            }
            Ok(Step::Continue) => Ok(Step::Continue),
            Err(e) => {
                self.state = State::Failed;
                Err(e)
            }
        }
    }

    /// Release the source and sink bindings and return to `Idle`
    ///
    /// Safe to call from any state, including before `begin` and after a
    /// failure; calling it twice is a no-op.
    pub fn stop(&mut self) {
        self.source = None;
        self.sink = None;
        self.format = None;
        self.decoder = None;
        self.data_remaining = 0;
        self.spool = Bytes::new();
        self.pending.clear();
        self.pending_pos = 0;
        self.scratch.clear();
        self.samples_emitted = 0;
        self.state = State::Idle;
    }

    /// Drive `step` until the stream finishes, returning frames emitted
    pub fn run(&mut self) -> Result<u64> {
        while self.step()? == Step::Continue {}
        Ok(self.frames_emitted())
    }

    fn scan_header(&mut self) -> Result<()> {
        let source = self
            .source
            .as_deref_mut()
            .ok_or_else(|| Error::invalid_state("no source bound"))?;

        read_container_header(source)?;

        let mut format: Option<WavFormat> = None;
        let mut data_remaining: Option<u64> = None;
        let mut spool = Bytes::new();

        while format.is_none() || data_remaining.is_none() {
            let Some(chunk) = next_chunk(source)? else {
                break;
            };

            if &chunk.id == wav::FMT_CHUNK && format.is_none() {
                format = Some(read_format_chunk(source, &chunk)?);
            } else if &chunk.id == wav::DATA_CHUNK && data_remaining.is_none() {
                if format.is_some() {
                    // Normal layout: leave the payload in the source and
                    // stream it out step by step.
                    data_remaining = Some(chunk.size as u64);
                } else {
                    // `data` arrived before `fmt ` and the source cannot
                    // seek back, so buffer the payload while the scan goes
                    // on looking for the format chunk.
                    spool = spool_data_chunk(source, &chunk)?;
                    data_remaining = Some(spool.len() as u64);
                }
            } else {
                tracing::trace!(
                    "skipping chunk {} ({} bytes)",
                    chunk.id_display(),
                    chunk.size
                );
                skip_chunk(source, &chunk)?;
            }
        }

        let format = format
            .ok_or_else(|| Error::missing_chunk("no fmt chunk before end of source"))?;
        let data_remaining = data_remaining
            .ok_or_else(|| Error::missing_chunk("no data chunk before end of source"))?;

        let decoder = PcmDecoder::new(PcmConfig::from_format(&format)?);

        let sink = self
            .sink
            .as_deref_mut()
            .ok_or_else(|| Error::invalid_state("no sink bound"))?;
        sink.start(format.channels, format.sample_rate)?;

        tracing::debug!(
            "wav stream ready: {} channel(s), {} Hz, {} bits, {} data bytes",
            format.channels,
            format.sample_rate,
            format.bits_per_sample,
            data_remaining
        );

        self.format = Some(format);
        self.decoder = Some(decoder);
        self.data_remaining = data_remaining;
        self.spool = spool;
        Ok(())
    }

    fn stream_once(&mut self) -> Result<Step> {
        let sink = self
            .sink
            .as_deref_mut()
            .ok_or_else(|| Error::invalid_state("no sink bound"))?;

        // Re-offer whatever the sink declined last step before decoding
        // anything new; a slow sink throttles the whole pipeline here.
        if self.pending_pos < self.pending.len() {
            let accepted = sink.write(&self.pending[self.pending_pos..])?;
            self.pending_pos += accepted;
            self.samples_emitted += accepted as u64;
            if self.pending_pos < self.pending.len() {
                return Ok(Step::Continue);
            }
        }
        self.pending.clear();
        self.pending_pos = 0;

        let decoder = self
            .decoder
            .as_ref()
            .ok_or_else(|| Error::invalid_state("no decoder configured"))?;
        let frame_bytes = decoder.config().bytes_per_frame() as u64;

        // Fewer bytes than one block-aligned group left in the chunk: the
        // tail cannot form a frame, so this is end of stream. The leftover
        // bytes stay unread; nothing past the chunk boundary is touched.
        let want_frames = (self.data_remaining / frame_bytes).min(FRAMES_PER_STEP);
        if want_frames == 0 {
            sink.finish()?;
            return Ok(Step::Finished);
        }

        let want_bytes = (want_frames * frame_bytes) as usize;
        self.scratch.resize(want_bytes, 0);

        let mut got = 0;
        if self.spool.has_remaining() {
            let n = self.spool.remaining().min(want_bytes);
            self.spool.copy_to_slice(&mut self.scratch[..n]);
            got = n;
        }
        if got < want_bytes {
            let source = self
                .source
                .as_deref_mut()
                .ok_or_else(|| Error::invalid_state("no source bound"))?;
            got += read_full(source, &mut self.scratch[got..])?;
        }

        let truncated = got < want_bytes;
        self.data_remaining -= got as u64;
        if truncated {
            // Source ended inside the data chunk; whatever whole frames we
            // got still decode, the partial tail is dropped silently.
            self.data_remaining = 0;
        }

        decoder.decode(&self.scratch[..got], &mut self.pending);
        if self.pending.is_empty() {
            sink.finish()?;
            return Ok(Step::Finished);
        }

        let accepted = sink.write(&self.pending)?;
        self.pending_pos = accepted;
        self.samples_emitted += accepted as u64;
        Ok(Step::Continue)
    }
}

/// Parse a `fmt ` chunk in place, discarding any extension bytes
fn read_format_chunk(source: &mut dyn ByteSource, chunk: &ChunkHeader) -> Result<WavFormat> {
    if chunk.size < 16 {
        return Err(Error::format(format!(
            "fmt chunk too small: {} bytes, need 16",
            chunk.size
        )));
    }

    let mut block = [0u8; 16];
    if read_full(source, &mut block)? < block.len() {
        return Err(Error::format("source ended inside fmt chunk"));
    }

    let format = WavFormat::from_bytes(&block)?;
    format.validate()?;

    // Extension bytes plus the pad byte, if any, are not interpreted.
    let extra = (chunk.size as u64 - 16) + (chunk.size % 2) as u64;
    wav::chunk::discard(source, extra)?;

    Ok(format)
}

/// Buffer a whole `data` payload found ahead of `fmt `
fn spool_data_chunk(source: &mut dyn ByteSource, chunk: &ChunkHeader) -> Result<Bytes> {
    // A lying chunk size must not drive the allocation past what the
    // source can actually deliver, when the source knows.
    let mut cap = chunk.size as u64;
    if let Some(available) = source.available() {
        cap = cap.min(available);
    }
    let mut buf = vec![0u8; cap as usize];
    let got = read_full(source, &mut buf)?;
    buf.truncate(got);
    if got as u64 == chunk.size as u64 && chunk.size % 2 == 1 {
        wav::chunk::discard(source, 1)?;
    }
    Ok(Bytes::from(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use crate::source::MemorySource;

    fn minimal_wav() -> Vec<u8> {
        // 8-bit mono 8 kHz, two samples
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(4 + 8 + 16 + 8 + 2u32).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&8000u32.to_le_bytes());
        bytes.extend_from_slice(&8000u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&8u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&2u32.to_le_bytes());
        bytes.push(0x00);
        bytes.push(0xFF);
        bytes
    }

    #[test]
    fn test_lifecycle_states() {
        let mut source = MemorySource::new(minimal_wav());
        let mut sink = MemorySink::new();
        let mut session = WavSession::new();
        assert_eq!(session.state(), State::Idle);

        session.begin(&mut source, &mut sink).unwrap();
        assert_eq!(session.state(), State::Ready);
        assert_eq!(session.format().unwrap().sample_rate, 8000);

        assert_eq!(session.step().unwrap(), Step::Continue);
        assert_eq!(session.state(), State::Streaming);

        assert_eq!(session.step().unwrap(), Step::Finished);
        assert_eq!(session.state(), State::Finished);
        assert_eq!(session.frames_emitted(), 2);

        // Finished sessions keep reporting Finished
        assert_eq!(session.step().unwrap(), Step::Finished);

        session.stop();
        assert_eq!(session.state(), State::Idle);
    }

    #[test]
    fn test_step_before_begin_is_invalid_state() {
        let mut session = WavSession::new();
        assert!(matches!(session.step(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_begin_twice_is_invalid_state() {
        let mut source = MemorySource::new(minimal_wav());
        let mut sink = MemorySink::new();
        let mut session = WavSession::new();
        session.begin(&mut source, &mut sink).unwrap();

        let mut source2 = MemorySource::new(minimal_wav());
        let mut sink2 = MemorySink::new();
        assert!(matches!(
            session.begin(&mut source2, &mut sink2),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn test_stop_is_idempotent_from_any_state() {
        let mut session = WavSession::new();
        session.stop();
        session.stop();
        assert_eq!(session.state(), State::Idle);

        let mut source = MemorySource::new(minimal_wav());
        let mut sink = MemorySink::new();
        session.begin(&mut source, &mut sink).unwrap();
        session.stop();
        session.stop();
        assert_eq!(session.state(), State::Idle);
    }
}

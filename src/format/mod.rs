//! Container format handling
//!
//! This module provides parsing for the RIFF/WAVE container carrying the
//! PCM payload. Other RIFF forms (AVI and friends) are out of scope.

pub mod wav;

pub use wav::{ChunkHeader, ContainerHeader, FormatTag, WavFormat};

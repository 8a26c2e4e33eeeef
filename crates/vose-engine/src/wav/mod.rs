//! Deterministic WAV output.
//!
//! Renders are written as 16-bit PCM mono RIFF/WAVE with no timestamps or
//! optional chunks, so equal sample buffers always produce equal files. The
//! BLAKE3 hash of the PCM payload is what render reports carry.

mod atomic;
mod format;
mod pcm;
mod result;
mod writer;

#[cfg(test)]
mod tests;

pub use atomic::write_wav_atomic;
pub use format::WavFormat;
pub use pcm::{compute_pcm_hash, extract_pcm_data, pcm16_hash};
pub use result::WavResult;
pub use writer::{samples_to_pcm16, write_wav, write_wav_to_vec};

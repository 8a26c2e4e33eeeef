//! WAV file format parameters.

/// Bits per sample of every file the engine writes.
pub const BITS_PER_SAMPLE: u16 = 16;

/// WAV file format parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Number of channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample.
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// Creates the mono 16-bit format renders are written in.
    pub fn mono(sample_rate: u32) -> Self {
        Self {
            channels: 1,
            sample_rate,
            bits_per_sample: BITS_PER_SAMPLE,
        }
    }

    pub(crate) fn block_align(&self) -> u16 {
        self.channels * (self.bits_per_sample / 8)
    }

    pub(crate) fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }
}

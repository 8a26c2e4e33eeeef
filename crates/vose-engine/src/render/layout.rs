//! Output buffer layout: where each note's segment lands.

use vose_spec::{EngineConfig, NoteRenderRequest, Placement};

use crate::synthesis::segment_length;

/// Write region of one note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentSlot {
    /// First output sample.
    pub offset: usize,
    /// Full segment length from the synthesis formula.
    pub length: usize,
}

impl SegmentSlot {
    /// One past the last sample the segment would write.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// How a slot fits the allocated buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotFit {
    /// The whole segment fits.
    Full,
    /// Only the first `kept` samples fit.
    Truncated {
        /// Samples that are written.
        kept: usize,
    },
    /// The segment starts at or past the end of the buffer.
    Outside,
}

/// Slots for every note plus the buffer length that holds them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferLayout {
    /// One slot per note, in request order.
    pub slots: Vec<SegmentSlot>,
    /// Allocated buffer length in samples.
    pub total_samples: usize,
}

impl BufferLayout {
    /// Computes the layout for `notes` under `config`.
    ///
    /// Sequential placement lays segments end to end and allocates exactly
    /// their sum. Start-time placement puts each segment at its effective
    /// start and adds one second of pad past the latest end. A configured
    /// maximum duration caps either result.
    pub fn plan(notes: &[NoteRenderRequest], config: &EngineConfig) -> Self {
        let lengths = notes.iter().map(|note| {
            segment_length(note.frame_count(), config.frame_period_ms, config.sample_rate)
        });

        let slots: Vec<SegmentSlot> = match config.placement {
            Placement::Sequential => {
                let mut offset = 0;
                lengths
                    .map(|length| {
                        let slot = SegmentSlot { offset, length };
                        offset += length;
                        slot
                    })
                    .collect()
            }
            Placement::StartTime => notes
                .iter()
                .zip(lengths)
                .map(|(note, length)| SegmentSlot {
                    offset: seconds_to_samples(note.effective_start_time(), config.sample_rate),
                    length,
                })
                .collect(),
        };

        let natural = match config.placement {
            Placement::Sequential => slots.iter().map(|s| s.length).sum(),
            Placement::StartTime if slots.is_empty() => 0,
            Placement::StartTime => {
                slots.iter().map(SegmentSlot::end).max().unwrap_or(0)
                    + config.sample_rate as usize
            }
        };

        let total_samples = match config.max_duration_seconds {
            Some(max) => natural.min(seconds_to_samples(max, config.sample_rate)),
            None => natural,
        };

        Self {
            slots,
            total_samples,
        }
    }

    /// Classifies a slot against the allocated length.
    pub fn fit(&self, slot: &SegmentSlot) -> SlotFit {
        if slot.end() <= self.total_samples {
            SlotFit::Full
        } else if slot.offset >= self.total_samples {
            SlotFit::Outside
        } else {
            SlotFit::Truncated {
                kept: self.total_samples - slot.offset,
            }
        }
    }
}

/// Rounds a non-negative time to a sample index. Negative or non-finite
/// times map to 0.
fn seconds_to_samples(seconds: f64, sample_rate: u32) -> usize {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * sample_rate as f64).round() as usize
}

/// Adds `segment` into `buffer` at `offset`, clipped to the buffer.
///
/// Returns the number of samples written. Never writes out of bounds.
pub fn mix_into(buffer: &mut [f64], offset: usize, segment: &[f64]) -> usize {
    let Some(window) = buffer.get_mut(offset..) else {
        return 0;
    };
    let written = window.len().min(segment.len());
    for (out, s) in window[..written].iter_mut().zip(segment) {
        *out += s;
    }
    written
}

//! Analysis time axes.
//!
//! A note is analyzed at the source's own timeline when the source is long
//! enough to cover it; otherwise the frames are spread evenly over the whole
//! recording.

/// `t[j] = j * frame_period`, in seconds.
pub fn native_time_axis(frames: usize, frame_period_ms: f64) -> Vec<f64> {
    (0..frames)
        .map(|j| j as f64 * frame_period_ms / 1000.0)
        .collect()
}

/// `t[j] = j / (frames - 1) * source_duration`, in seconds.
pub fn stretched_time_axis(frames: usize, source_duration: f64) -> Vec<f64> {
    if frames <= 1 {
        return vec![0.0; frames];
    }
    let last = (frames - 1) as f64;
    (0..frames)
        .map(|j| j as f64 / last * source_duration)
        .collect()
}

/// Picks the native axis when the note fits inside the source, else the
/// stretched one.
pub fn time_axis_for(frames: usize, frame_period_ms: f64, source_duration: f64) -> Vec<f64> {
    let note_duration = frames.saturating_sub(1) as f64 * frame_period_ms / 1000.0;
    if note_duration <= source_duration {
        native_time_axis(frames, frame_period_ms)
    } else {
        stretched_time_axis(frames, source_duration)
    }
}

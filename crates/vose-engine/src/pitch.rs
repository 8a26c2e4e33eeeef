//! Pitch-curve helpers for building note requests.

/// Default vibrato rate (radians per unit of the `[0, 10]` curve axis).
pub const DEFAULT_VIBRATO_RATE: f64 = 5.0;

/// Default vibrato depth in Hz.
pub const DEFAULT_VIBRATO_DEPTH_HZ: f64 = 2.0;

/// Converts a MIDI note number to Hz (A4 = 69 = 440 Hz).
pub fn midi_to_hz(note: f64) -> f64 {
    440.0 * 2f64.powf((note - 69.0) / 12.0)
}

/// Number of frames covering `seconds` at the given frame period.
///
/// Inverse of the segment-length formula: the returned frame count spans at
/// least `seconds`. Non-positive or non-finite durations give a single frame.
pub fn frames_for_duration(seconds: f64, frame_period_ms: f64) -> usize {
    if !seconds.is_finite() || seconds <= 0.0 || frame_period_ms <= 0.0 {
        return 1;
    }
    (seconds * 1000.0 / frame_period_ms).ceil() as usize + 1
}

/// A curve holding `value` for `frames` frames.
pub fn constant_curve(value: f64, frames: usize) -> Vec<f64> {
    vec![value; frames]
}

/// Adds a sinusoidal vibrato to a pitch curve.
///
/// The sine runs over an axis spaced linearly from 0 to 10 across the whole
/// curve, so the number of cycles is independent of the note length.
/// Unvoiced frames (pitch <= 0) are left alone.
pub fn apply_vibrato(curve: &[f64], rate: f64, depth_hz: f64) -> Vec<f64> {
    let n = curve.len();
    curve
        .iter()
        .enumerate()
        .map(|(i, &f0)| {
            if f0 <= 0.0 {
                return f0;
            }
            let x = if n > 1 {
                10.0 * i as f64 / (n - 1) as f64
            } else {
                0.0
            };
            f0 + (x * rate).sin() * depth_hz
        })
        .collect()
}

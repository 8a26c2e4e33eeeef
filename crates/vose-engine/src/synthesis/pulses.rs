//! Excitation pulse placement from a frame-rate pitch contour.

/// Pulse spacing used for unvoiced stretches, in Hz.
pub const UNVOICED_PULSE_RATE_HZ: f64 = 500.0;

/// One excitation instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Pulse {
    /// Output sample index.
    pub index: usize,
    /// Whether the periodic component sounds at this pulse.
    pub voiced: bool,
}

fn is_voiced(f0: f64) -> bool {
    f0.is_finite() && f0 > 0.0
}

/// F0 at a fractional frame position; 0 means unvoiced.
///
/// Two voiced neighbours interpolate linearly. Otherwise the nearer frame
/// decides, so voicing boundaries fall halfway between frames.
pub(crate) fn f0_at(pitch: &[f64], position: f64) -> f64 {
    if pitch.is_empty() {
        return 0.0;
    }
    let last = pitch.len() - 1;
    let j0 = (position.max(0.0).floor() as usize).min(last);
    let j1 = (j0 + 1).min(last);
    let frac = (position - j0 as f64).clamp(0.0, 1.0);
    let (a, b) = (pitch[j0], pitch[j1]);

    if is_voiced(a) && is_voiced(b) {
        return a + (b - a) * frac;
    }
    let nearest = if frac < 0.5 { a } else { b };
    if is_voiced(nearest) {
        nearest
    } else {
        0.0
    }
}

/// Places pulses by accumulating phase sample by sample.
///
/// The first pulse sits at sample 0. Voiced samples advance the phase by
/// `f0 / fs`, unvoiced ones at the fixed unvoiced rate.
pub(crate) fn pulse_locations(
    pitch: &[f64],
    length: usize,
    samples_per_frame: f64,
    sample_rate: f64,
) -> Vec<Pulse> {
    let mut pulses = Vec::new();
    let mut phase = 1.0_f64;

    for n in 0..length {
        let f0 = f0_at(pitch, n as f64 / samples_per_frame);
        let voiced = f0 > 0.0;
        if phase >= 1.0 {
            phase -= phase.floor();
            pulses.push(Pulse { index: n, voiced });
        }
        let rate = if voiced { f0 } else { UNVOICED_PULSE_RATE_HZ };
        phase += rate / sample_rate;
    }

    pulses
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f0_interpolates_between_voiced_frames() {
        let pitch = [100.0, 200.0];
        assert_eq!(f0_at(&pitch, 0.0), 100.0);
        assert_eq!(f0_at(&pitch, 0.5), 150.0);
        assert_eq!(f0_at(&pitch, 1.0), 200.0);
        assert_eq!(f0_at(&pitch, 7.0), 200.0);
    }

    #[test]
    fn test_f0_voicing_boundary() {
        let pitch = [200.0, 0.0];
        assert_eq!(f0_at(&pitch, 0.25), 200.0);
        assert_eq!(f0_at(&pitch, 0.75), 0.0);
        assert_eq!(f0_at(&[f64::NAN], 0.0), 0.0);
        assert_eq!(f0_at(&[-5.0], 0.0), 0.0);
    }

    #[test]
    fn test_pulse_spacing_follows_f0() {
        // 441 Hz at 44.1 kHz is a pulse every 100 samples
        let pitch = [441.0; 3];
        let pulses = pulse_locations(&pitch, 1000, 220.5, 44100.0);
        let indices: Vec<usize> = pulses.iter().map(|p| p.index).collect();
        assert_eq!(indices[0], 0);
        assert!(indices.windows(2).all(|w| (99..=101).contains(&(w[1] - w[0]))));
        assert!(pulses.iter().all(|p| p.voiced));
    }

    #[test]
    fn test_unvoiced_pulses_use_fixed_rate() {
        let pulses = pulse_locations(&[0.0; 2], 882, 220.5, 44100.0);
        assert!(pulses.iter().all(|p| !p.voiced));
        // 500 Hz -> every 88.2 samples
        assert!((10..=11).contains(&pulses.len()));
    }
}

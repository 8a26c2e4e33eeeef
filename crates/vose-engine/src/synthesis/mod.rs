//! Frame synthesis: pitch contour + spectral analysis to PCM.
//!
//! Pulses are placed along the target pitch. Each pulse contributes a
//! periodic part (minimum-phase response of `sqrt(env * (1 - ap^2))`) and an
//! aperiodic part (white noise shaped by `sqrt(env) * ap`), overlap-added
//! from the pulse position onward. Unvoiced pulses carry only noise, using
//! the full envelope.
//!
//! The periodic part is scaled by the square root of the pulse spacing and
//! the noise has unit variance, so both carry the analyzed power per second.

mod pulses;


use rand::Rng;
use rand_pcg::Pcg32;
use vose_spec::EngineConfig;

use crate::error::{EngineError, EngineResult};
use crate::fft::FftPair;
use crate::spectrum::{spec_bins, SpectralAnalysis, SpectralMatrix};

pub use pulses::UNVOICED_PULSE_RATE_HZ;

/// Output sample count for a note of `frames` frames.
///
/// `floor((frames - 1) * frame_period_ms * sample_rate / 1000) + 1`, and 0
/// for an empty note. Every buffer-sizing computation uses this function.
pub fn segment_length(frames: usize, frame_period_ms: f64, sample_rate: u32) -> usize {
    if frames == 0 {
        return 0;
    }
    let samples = (frames - 1) as f64 * frame_period_ms * sample_rate as f64 / 1000.0;
    samples.floor().max(0.0) as usize + 1
}

/// Resynthesizes notes at a fixed sample rate and frame period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSynthesizer {
    sample_rate: u32,
    frame_period_ms: f64,
}

impl FrameSynthesizer {
    /// Creates a synthesizer.
    pub fn new(sample_rate: u32, frame_period_ms: f64) -> Self {
        Self {
            sample_rate,
            frame_period_ms,
        }
    }

    /// Creates a synthesizer for an engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.sample_rate, config.frame_period_ms)
    }

    /// Output sample count for `frames` frames.
    pub fn segment_length(&self, frames: usize) -> usize {
        segment_length(frames, self.frame_period_ms, self.sample_rate)
    }

    /// Synthesizes one note.
    ///
    /// Returns exactly [`segment_length`] samples. Frames with a pitch that
    /// is not a positive finite number are rendered unvoiced.
    ///
    /// # Errors
    /// `InvalidParameter` if the pitch curve and analysis disagree in frame
    /// count, `Analysis` if the bin count does not match the FFT size.
    pub fn synthesize(
        &self,
        pitch_curve: &[f64],
        analysis: &SpectralAnalysis,
        rng: &mut Pcg32,
    ) -> EngineResult<Vec<f64>> {
        let frames = pitch_curve.len();
        if frames != analysis.frames() {
            return Err(EngineError::invalid_param(
                "pitch_curve",
                format!(
                    "{} frames, analysis has {}",
                    frames,
                    analysis.frames()
                ),
            ));
        }
        if analysis.bins() != spec_bins(analysis.fft_size) {
            return Err(EngineError::analysis(format!(
                "{} bins do not match fft size {}",
                analysis.bins(),
                analysis.fft_size
            )));
        }

        let length = self.segment_length(frames);
        let mut output = vec![0.0; length];
        if length == 0 {
            return Ok(output);
        }

        let fs = self.sample_rate as f64;
        let samples_per_frame = self.frame_period_ms * fs / 1000.0;
        let fft = FftPair::new(analysis.fft_size);
        let bins = analysis.bins();

        let pulses = pulses::pulse_locations(pitch_curve, length, samples_per_frame, fs);
        let mut envelope = vec![0.0; bins];
        let mut aperiodicity = vec![0.0; bins];
        let mut periodic_amp = vec![0.0; bins];
        let mut aperiodic_amp = vec![0.0; bins];

        for (i, pulse) in pulses.iter().enumerate() {
            let next = pulses.get(i + 1).map_or(length, |p| p.index);
            let spacing = (next - pulse.index).max(1);

            let position = pulse.index as f64 / samples_per_frame;
            interpolate_row(&analysis.envelope, position, &mut envelope);
            interpolate_row(&analysis.aperiodicity, position, &mut aperiodicity);

            for k in 0..bins {
                let env = envelope[k].max(0.0);
                let ap = if pulse.voiced {
                    aperiodicity[k].clamp(0.0, 1.0)
                } else {
                    1.0
                };
                periodic_amp[k] = (env * (1.0 - ap * ap)).sqrt();
                aperiodic_amp[k] = env.sqrt() * ap;
            }

            let mut response = aperiodic_response(&fft, &aperiodic_amp, spacing, rng);
            if pulse.voiced {
                let periodic = fft.minimum_phase_response(&periodic_amp);
                let gain = (spacing as f64).sqrt();
                for (r, p) in response.iter_mut().zip(&periodic) {
                    *r += p * gain;
                }
            }

            // bounded overlap-add
            let end = (pulse.index + response.len()).min(length);
            for (out, r) in output[pulse.index..end].iter_mut().zip(&response) {
                *out += r;
            }
        }

        Ok(output)
    }
}

/// Linear interpolation between the two frames around `position`.
fn interpolate_row(matrix: &SpectralMatrix, position: f64, out: &mut [f64]) {
    let last = matrix.frames() - 1;
    let j0 = (position.max(0.0).floor() as usize).min(last);
    let j1 = (j0 + 1).min(last);
    let frac = (position - j0 as f64).clamp(0.0, 1.0);
    let (a, b) = (matrix.row(j0), matrix.row(j1));
    for ((o, &x), &y) in out.iter_mut().zip(a).zip(b) {
        *o = x + (y - x) * frac;
    }
}

/// Zero-mean, unit-variance noise of one pulse spacing (capped at the FFT
/// size), filtered by the minimum-phase aperiodic spectrum.
fn aperiodic_response(fft: &FftPair, amplitude: &[f64], spacing: usize, rng: &mut Pcg32) -> Vec<f64> {
    let count = spacing.min(fft.size());
    let scale = 12f64.sqrt();
    let mut noise: Vec<f64> = (0..count)
        .map(|_| (rng.gen::<f64>() - 0.5) * scale)
        .collect();
    let mean = noise.iter().sum::<f64>() / count as f64;
    for n in noise.iter_mut() {
        *n -= mean;
    }

    let spectrum = fft.minimum_phase_spectrum(amplitude);
    fft.filter(&noise, &spectrum)
}

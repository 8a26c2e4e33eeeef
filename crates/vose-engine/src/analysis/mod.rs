//! Spectral analysis: waveform + time axis to envelope and aperiodicity.
//!
//! The analyzer never estimates the recording's own pitch. Every frame is
//! windowed for a fixed surrogate F0, which is enough to capture spectral
//! shape; the output pitch is supplied separately at synthesis time.

mod aperiodicity;
mod envelope;
mod time_axis;

#[cfg(test)]
mod tests;

use std::f64::consts::PI;

use vose_spec::EngineConfig;

use crate::error::{EngineError, EngineResult};
use crate::fft::FftPair;
use crate::spectrum::{fft_size_for, SpectralAnalysis, SpectralMatrix};
use crate::store::Waveform;

pub use aperiodicity::{BAND_WIDTH_HZ, MIN_APERIODICITY, MIN_APERIODICITY_DB};
pub use time_axis::{native_time_axis, stretched_time_axis, time_axis_for};

/// Produces spectral envelope and aperiodicity matrices for a time axis.
///
/// Implementations must be deterministic: the analysis cache relies on equal
/// inputs giving equal outputs.
pub trait SpectralAnalyzer: Send + Sync {
    /// Analyzes `waveform` at each time in `time_axis` (seconds).
    ///
    /// # Errors
    /// `Analysis` for an empty waveform or an empty time axis.
    fn analyze(&self, waveform: &Waveform, time_axis: &[f64]) -> EngineResult<SpectralAnalysis>;

    /// FFT size of the produced bins.
    fn fft_size(&self) -> usize;
}

/// CheapTrick-style envelope and D4C-style band aperiodicity.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldAnalyzer {
    sample_rate: u32,
    f0_hz: f64,
    fft_size: usize,
}

impl WorldAnalyzer {
    /// Creates an analyzer.
    ///
    /// # Arguments
    /// * `sample_rate` - Rate of the waveforms it will see
    /// * `f0_hz` - Surrogate analysis pitch
    /// * `f0_floor_hz` - Lowest F0 the FFT size must cover
    pub fn new(sample_rate: u32, f0_hz: f64, f0_floor_hz: f64) -> Self {
        Self {
            sample_rate,
            f0_hz,
            fft_size: fft_size_for(sample_rate, f0_floor_hz),
        }
    }

    /// Creates an analyzer for an engine configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.sample_rate, config.analysis_f0_hz, config.f0_floor_hz)
    }

    /// Surrogate analysis pitch in Hz.
    pub fn f0_hz(&self) -> f64 {
        self.f0_hz
    }
}

impl Default for WorldAnalyzer {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl SpectralAnalyzer for WorldAnalyzer {
    fn analyze(&self, waveform: &Waveform, time_axis: &[f64]) -> EngineResult<SpectralAnalysis> {
        if waveform.is_empty() {
            return Err(EngineError::analysis("waveform is empty"));
        }
        if time_axis.is_empty() {
            return Err(EngineError::analysis("time axis has no frames"));
        }
        if waveform.sample_rate() != self.sample_rate {
            return Err(EngineError::analysis(format!(
                "waveform is {} Hz, analyzer expects {} Hz",
                waveform.sample_rate(),
                self.sample_rate
            )));
        }
        if let Some(t) = time_axis.iter().find(|t| !t.is_finite()) {
            return Err(EngineError::analysis(format!("time axis contains {}", t)));
        }

        let fs = self.sample_rate as f64;
        let fft = FftPair::new(self.fft_size);
        let mut envelope = SpectralMatrix::filled(time_axis.len(), fft.bins(), 0.0);
        let mut aperiodicity = SpectralMatrix::filled(time_axis.len(), fft.bins(), 1.0);

        for (j, &t) in time_axis.iter().enumerate() {
            let frame = windowed_frame(waveform.samples(), fs, self.f0_hz, t);
            envelope
                .row_mut(j)
                .copy_from_slice(&envelope::envelope_row(&fft, &frame, fs, self.f0_hz));
            aperiodicity
                .row_mut(j)
                .copy_from_slice(&aperiodicity::aperiodicity_row(&fft, &frame, fs));
        }

        SpectralAnalysis::new(envelope, aperiodicity, self.fft_size)
    }

    fn fft_size(&self) -> usize {
        self.fft_size
    }
}

/// Three-period Hann-windowed excerpt centered on `t`, normalized to unit
/// energy with its weighted mean removed. Indices past either end of the
/// recording repeat the edge sample.
fn windowed_frame(samples: &[f64], sample_rate: f64, f0: f64, t: f64) -> Vec<f64> {
    let half_period = 1.5 * sample_rate / f0;
    let half = half_period.round() as isize;
    let center = (t * sample_rate).round() as isize;
    let last = samples.len() as isize - 1;

    let window: Vec<f64> = (-half..=half)
        .map(|i| 0.5 * (PI * i as f64 / half_period).cos() + 0.5)
        .collect();
    let excerpt: Vec<f64> = (-half..=half)
        .map(|i| samples[(center + i).clamp(0, last) as usize])
        .collect();

    let norm = window.iter().map(|w| w * w).sum::<f64>().sqrt();
    let window_sum: f64 = window.iter().sum();
    let weighted_mean = excerpt.iter().zip(&window).map(|(x, w)| x * w).sum::<f64>() / window_sum;

    excerpt
        .iter()
        .zip(&window)
        .map(|(x, w)| (x - weighted_mean) * w / norm)
        .collect()
}

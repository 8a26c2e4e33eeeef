//! Planned FFT pair and the real-cepstrum transforms built on it.

use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

/// Forward and inverse plans for one FFT size.
pub(crate) struct FftPair {
    size: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl FftPair {
    pub(crate) fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            size,
            forward: planner.plan_fft_forward(size),
            inverse: planner.plan_fft_inverse(size),
        }
    }

    pub(crate) fn size(&self) -> usize {
        self.size
    }

    pub(crate) fn bins(&self) -> usize {
        self.size / 2 + 1
    }

    pub(crate) fn forward(&self, buffer: &mut [Complex<f64>]) {
        self.forward.process(buffer);
    }

    /// Inverse transform scaled by `1/N`.
    pub(crate) fn inverse(&self, buffer: &mut [Complex<f64>]) {
        self.inverse.process(buffer);
        let scale = 1.0 / self.size as f64;
        for value in buffer.iter_mut() {
            *value *= scale;
        }
    }

    /// Zero-pads `frame` to the FFT size and returns `|X[k]|^2` for the
    /// non-negative bins.
    pub(crate) fn power_spectrum(&self, frame: &[f64]) -> Vec<f64> {
        let mut buffer = vec![Complex::new(0.0, 0.0); self.size];
        for (slot, &sample) in buffer.iter_mut().zip(frame) {
            slot.re = sample;
        }
        self.forward(&mut buffer);
        buffer[..self.bins()].iter().map(|c| c.norm_sqr()).collect()
    }

    /// Real cepstrum of a half spectrum given as natural-log values.
    pub(crate) fn cepstrum(&self, log_half: &[f64]) -> Vec<f64> {
        let mut buffer = self.mirrored(log_half);
        self.inverse(&mut buffer);
        buffer.into_iter().map(|c| c.re).collect()
    }

    /// Half spectrum (real part) of a full-length cepstrum.
    pub(crate) fn log_spectrum(&self, cepstrum: &[f64]) -> Vec<f64> {
        let mut buffer: Vec<Complex<f64>> =
            cepstrum.iter().map(|&c| Complex::new(c, 0.0)).collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));
        self.forward(&mut buffer);
        buffer[..self.bins()].iter().map(|c| c.re).collect()
    }

    /// Full-length minimum-phase spectrum whose magnitude is `amplitude`.
    ///
    /// The DC bin is zeroed so filters built from it carry no offset.
    pub(crate) fn minimum_phase_spectrum(&self, amplitude: &[f64]) -> Vec<Complex<f64>> {
        let log_half: Vec<f64> = amplitude
            .iter()
            .map(|&a| a.max(AMPLITUDE_FLOOR).ln())
            .collect();
        let cepstrum = self.cepstrum(&log_half);

        // fold the cepstrum onto positive quefrencies
        let half = self.size / 2;
        let mut folded = vec![Complex::new(0.0, 0.0); self.size];
        folded[0].re = cepstrum[0];
        for q in 1..half {
            folded[q].re = 2.0 * cepstrum[q];
        }
        folded[half].re = cepstrum[half];

        self.forward(&mut folded);
        for value in folded.iter_mut() {
            *value = value.exp();
        }
        folded[0] = Complex::new(0.0, 0.0);
        folded
    }

    /// Minimum-phase impulse response whose magnitude response is `amplitude`.
    pub(crate) fn minimum_phase_response(&self, amplitude: &[f64]) -> Vec<f64> {
        let mut spectrum = self.minimum_phase_spectrum(amplitude);
        self.inverse(&mut spectrum);
        spectrum.into_iter().map(|c| c.re).collect()
    }

    /// Circularly filters `signal` (zero-padded to the FFT size) by `spectrum`.
    pub(crate) fn filter(&self, signal: &[f64], spectrum: &[Complex<f64>]) -> Vec<f64> {
        let mut buffer = vec![Complex::new(0.0, 0.0); self.size];
        for (slot, &sample) in buffer.iter_mut().zip(signal) {
            slot.re = sample;
        }
        self.forward(&mut buffer);
        for (value, gain) in buffer.iter_mut().zip(spectrum) {
            *value *= *gain;
        }
        self.inverse(&mut buffer);
        buffer.into_iter().map(|c| c.re).collect()
    }

    fn mirrored(&self, half: &[f64]) -> Vec<Complex<f64>> {
        (0..self.size)
            .map(|k| {
                let idx = if k <= self.size / 2 { k } else { self.size - k };
                Complex::new(half.get(idx).copied().unwrap_or(0.0), 0.0)
            })
            .collect()
    }
}

/// Smallest amplitude fed to a logarithm.
pub(crate) const AMPLITUDE_FLOOR: f64 = 1e-12;

//! Pitch-adaptive spectral envelope estimation.
//!
//! One windowed frame spanning three surrogate pitch periods is turned into a
//! smooth power envelope: DC correction folds the sub-F0 region back up,
//! a boxcar of 2/3 F0 smooths harmonics away, and cepstral liftering removes
//! the remaining ripple.

use std::f64::consts::PI;

use crate::fft::FftPair;

/// Compensation lifter coefficient.
const Q1: f64 = -0.15;

/// Power added before taking logarithms.
const POWER_FLOOR: f64 = 1e-12;

/// Estimates one envelope row from a windowed frame.
pub(crate) fn envelope_row(fft: &FftPair, frame: &[f64], sample_rate: f64, f0: f64) -> Vec<f64> {
    let bins_per_hz = fft.size() as f64 / sample_rate;

    let mut power = fft.power_spectrum(frame);
    dc_correction(&mut power, f0 * bins_per_hz);
    let smoothed = linear_smoothing(&power, f0 * 2.0 / 3.0 * bins_per_hz);

    let log_half: Vec<f64> = smoothed.iter().map(|&p| (p + POWER_FLOOR).ln()).collect();
    let mut cepstrum = fft.cepstrum(&log_half);
    lifter(&mut cepstrum, sample_rate, f0);

    fft.log_spectrum(&cepstrum)
        .into_iter()
        .map(f64::exp)
        .collect()
}

/// Adds the mirror image around F0 to every bin below F0.
fn dc_correction(power: &mut [f64], f0_bins: f64) {
    let original = power.to_vec();
    for (k, value) in power.iter_mut().enumerate() {
        let k = k as f64;
        if k >= f0_bins {
            break;
        }
        *value += interpolate(&original, f0_bins - k);
    }
}

fn interpolate(values: &[f64], position: f64) -> f64 {
    let last = values.len() - 1;
    let i = (position.floor().max(0.0) as usize).min(last);
    let next = (i + 1).min(last);
    let frac = position - i as f64;
    values[i] + (values[next] - values[i]) * frac.clamp(0.0, 1.0)
}

/// Moving average of `width` bins, with the spectrum reflected at both ends.
fn linear_smoothing(power: &[f64], width: f64) -> Vec<f64> {
    if width <= 1e-9 || power.len() < 2 {
        return power.to_vec();
    }

    let bins = power.len() as isize;
    let margin = width.ceil() as isize + 2;
    let reflect = |j: isize| -> f64 {
        let mut j = j.abs();
        if j > bins - 1 {
            j = 2 * (bins - 1) - j;
        }
        power[j.clamp(0, bins - 1) as usize]
    };

    // cumulative[i] is the integral up to the left edge of extended bin i
    let mut cumulative = Vec::with_capacity((bins + 2 * margin + 1) as usize);
    cumulative.push(0.0);
    let mut acc = 0.0;
    for j in -margin..bins + margin {
        acc += reflect(j);
        cumulative.push(acc);
    }

    let integral = |position: f64| -> f64 {
        let x = position + 0.5;
        let i = x.floor() as usize;
        let frac = x - i as f64;
        cumulative[i] + frac * (cumulative[i + 1] - cumulative[i])
    };

    (0..bins)
        .map(|k| {
            let center = (k + margin) as f64;
            (integral(center + width / 2.0) - integral(center - width / 2.0)) / width
        })
        .collect()
}

/// Smoothing lifter times compensation lifter, applied in place.
fn lifter(cepstrum: &mut [f64], sample_rate: f64, f0: f64) {
    let n = cepstrum.len();
    for (q, value) in cepstrum.iter_mut().enumerate() {
        let quefrency = q.min(n - q) as f64 / sample_rate;
        let x = PI * f0 * quefrency;
        let smoothing = if q == 0 { 1.0 } else { x.sin() / x };
        let compensation = (1.0 - 2.0 * Q1) + 2.0 * Q1 * (2.0 * x).cos();
        *value *= smoothing * compensation;
    }
}

//! Band-wise aperiodicity estimation.
//!
//! Each 3 kHz band gets a noisiness score from its spectral flatness (the
//! ratio of geometric to arithmetic mean power). Scores are placed on a
//! coarse frequency grid anchored at -60 dB for DC and 0 dB for Nyquist and
//! interpolated in dB onto every bin.

use crate::fft::FftPair;

/// Width of one aperiodicity band in Hz.
pub const BAND_WIDTH_HZ: f64 = 3000.0;

/// Lowest aperiodicity, in dB.
pub const MIN_APERIODICITY_DB: f64 = -60.0;

/// Lower clamp in linear terms (-60 dB).
pub const MIN_APERIODICITY: f64 = 0.001;

const SILENCE_POWER: f64 = 1e-20;
const FLATNESS_FLOOR: f64 = 1e-30;

/// Estimates one aperiodicity row from a windowed frame.
pub(crate) fn aperiodicity_row(fft: &FftPair, frame: &[f64], sample_rate: f64) -> Vec<f64> {
    let power = fft.power_spectrum(frame);
    let bins = power.len();

    let mean_power = power.iter().sum::<f64>() / bins as f64;
    if mean_power < SILENCE_POWER {
        return vec![1.0; bins];
    }

    let hz_per_bin = sample_rate / fft.size() as f64;
    let nyquist = sample_rate / 2.0;

    let mut grid_hz = vec![0.0];
    let mut grid_db = vec![MIN_APERIODICITY_DB];
    let mut center = BAND_WIDTH_HZ;
    while center < nyquist {
        let lo = ((center - BAND_WIDTH_HZ / 2.0) / hz_per_bin).ceil() as usize;
        let hi = (((center + BAND_WIDTH_HZ / 2.0) / hz_per_bin).floor() as usize).min(bins - 1);
        grid_hz.push(center);
        grid_db.push(flatness_db(&power[lo.min(hi)..=hi]));
        center += BAND_WIDTH_HZ;
    }
    grid_hz.push(nyquist);
    grid_db.push(0.0);

    (0..bins)
        .map(|k| {
            let db = interpolate_grid(&grid_hz, &grid_db, k as f64 * hz_per_bin);
            10f64.powf(db / 20.0).clamp(MIN_APERIODICITY, 1.0)
        })
        .collect()
}

/// Spectral flatness of a band in dB, clamped to [-60, 0].
fn flatness_db(band: &[f64]) -> f64 {
    if band.is_empty() {
        return 0.0;
    }
    let n = band.len() as f64;
    let arithmetic = band.iter().sum::<f64>() / n;
    if arithmetic < SILENCE_POWER {
        return 0.0;
    }
    let geometric = (band.iter().map(|&p| (p + FLATNESS_FLOOR).ln()).sum::<f64>() / n).exp();
    (10.0 * (geometric / arithmetic).log10()).clamp(MIN_APERIODICITY_DB, 0.0)
}

fn interpolate_grid(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let upper = xs.partition_point(|&g| g <= x);
    if upper == 0 {
        return ys[0];
    }
    if upper >= xs.len() {
        return ys[ys.len() - 1];
    }
    let (x0, x1) = (xs[upper - 1], xs[upper]);
    let (y0, y1) = (ys[upper - 1], ys[upper]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatness_of_flat_band_is_zero_db() {
        assert!(flatness_db(&[2.0; 16]).abs() < 1e-9);
    }

    #[test]
    fn test_flatness_of_peaky_band_is_low() {
        let mut band = vec![1e-8; 32];
        band[4] = 1.0;
        band[12] = 1.0;
        assert!(flatness_db(&band) < -30.0);
    }

    #[test]
    fn test_interpolate_grid() {
        let xs = [0.0, 10.0, 20.0];
        let ys = [-60.0, -20.0, 0.0];
        assert_eq!(interpolate_grid(&xs, &ys, 0.0), -60.0);
        assert_eq!(interpolate_grid(&xs, &ys, 5.0), -40.0);
        assert_eq!(interpolate_grid(&xs, &ys, 15.0), -10.0);
        assert_eq!(interpolate_grid(&xs, &ys, 25.0), 0.0);
    }

    #[test]
    fn test_silent_frame_is_fully_aperiodic() {
        let fft = FftPair::new(256);
        let row = aperiodicity_row(&fft, &[0.0; 100], 44100.0);
        assert_eq!(row.len(), 129);
        assert!(row.iter().all(|&a| a == 1.0));
    }
}

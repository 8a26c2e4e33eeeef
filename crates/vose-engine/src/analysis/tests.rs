//! Tests for spectral analysis.

use rand::Rng;

use super::*;
use crate::rng::create_rng;

fn harmonic_wave(f0: f64, seconds: f64) -> Waveform {
    let fs = 44100.0;
    let samples = (0..(seconds * fs) as usize)
        .map(|n| {
            let t = n as f64 / fs;
            (1..=20)
                .map(|h| (2.0 * PI * f0 * h as f64 * t).sin() / h as f64)
                .sum::<f64>()
                * 0.3
        })
        .collect();
    Waveform::new(samples, 44100)
}

fn noise_wave(seconds: f64) -> Waveform {
    let mut rng = create_rng(7);
    let samples = (0..(seconds * 44100.0) as usize)
        .map(|_| rng.gen::<f64>() - 0.5)
        .collect();
    Waveform::new(samples, 44100)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

// =========================================================================
// Time axis
// =========================================================================

#[test]
fn test_native_time_axis() {
    assert_eq!(native_time_axis(3, 5.0), vec![0.0, 0.005, 0.01]);
}

#[test]
fn test_stretched_time_axis() {
    assert_eq!(stretched_time_axis(3, 1.0), vec![0.0, 0.5, 1.0]);
    assert_eq!(stretched_time_axis(1, 1.0), vec![0.0]);
    assert!(stretched_time_axis(0, 1.0).is_empty());
}

#[test]
fn test_time_axis_choice() {
    // 100 frames is 0.495 s, fits in a 1 s source
    let axis = time_axis_for(100, 5.0, 1.0);
    assert!((axis[99] - 0.495).abs() < 1e-12);

    // 401 frames is 2 s, longer than the source
    let axis = time_axis_for(401, 5.0, 1.0);
    assert!((axis[400] - 1.0).abs() < 1e-12);
    assert!((axis[200] - 0.5).abs() < 1e-12);
}

// =========================================================================
// Analyzer contract
// =========================================================================

#[test]
fn test_analyzer_shape() {
    let analyzer = WorldAnalyzer::default();
    assert_eq!(analyzer.fft_size(), 2048);

    let wave = harmonic_wave(220.0, 0.2);
    let analysis = analyzer
        .analyze(&wave, &native_time_axis(10, 5.0))
        .unwrap();
    assert_eq!(analysis.frames(), 10);
    assert_eq!(analysis.bins(), 1025);
    assert_eq!(analysis.fft_size, 2048);
}

#[test]
fn test_analyzer_is_deterministic() {
    let analyzer = WorldAnalyzer::default();
    let wave = noise_wave(0.1);
    let axis = native_time_axis(8, 5.0);
    let a = analyzer.analyze(&wave, &axis).unwrap();
    let b = analyzer.analyze(&wave, &axis).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_analyzer_rejects_degenerate_input() {
    let analyzer = WorldAnalyzer::default();
    let empty = Waveform::new(Vec::new(), 44100);
    let err = analyzer.analyze(&empty, &[0.0]).unwrap_err();
    assert!(matches!(err, EngineError::Analysis { .. }));

    let wave = harmonic_wave(220.0, 0.05);
    let err = analyzer.analyze(&wave, &[]).unwrap_err();
    assert!(matches!(err, EngineError::Analysis { .. }));

    let err = analyzer.analyze(&wave, &[0.0, f64::NAN]).unwrap_err();
    assert!(matches!(err, EngineError::Analysis { .. }));
}

#[test]
fn test_analyzer_rejects_wrong_rate() {
    let analyzer = WorldAnalyzer::default();
    let wave = Waveform::new(vec![0.1; 1000], 22050);
    assert!(analyzer.analyze(&wave, &[0.0]).is_err());
}

// =========================================================================
// Envelope
// =========================================================================

#[test]
fn test_envelope_positive_and_finite() {
    let analyzer = WorldAnalyzer::default();
    let analysis = analyzer
        .analyze(&harmonic_wave(220.0, 0.2), &native_time_axis(5, 5.0))
        .unwrap();
    assert!(analysis
        .envelope
        .rows()
        .flatten()
        .all(|&v| v.is_finite() && v > 0.0));
}

#[test]
fn test_envelope_scales_with_power() {
    let analyzer = WorldAnalyzer::default();
    let wave = harmonic_wave(220.0, 0.1);
    let louder = Waveform::new(wave.samples().iter().map(|s| s * 2.0).collect(), 44100);
    let axis = [0.05];

    let quiet = analyzer.analyze(&wave, &axis).unwrap();
    let loud = analyzer.analyze(&louder, &axis).unwrap();

    // doubling amplitude quadruples power wherever the envelope is well above the floor
    for k in (10..180).step_by(13) {
        let ratio = loud.envelope.get(0, k) / quiet.envelope.get(0, k);
        assert!((ratio - 4.0).abs() < 1e-3, "bin {} ratio {}", k, ratio);
    }
}

#[test]
fn test_envelope_follows_spectral_tilt() {
    let analyzer = WorldAnalyzer::default();
    let analysis = analyzer
        .analyze(&harmonic_wave(220.0, 0.1), &[0.05])
        .unwrap();
    // harmonics fall off as 1/h, so low bins carry more power than high bins
    let low = mean(&analysis.envelope.row(0)[5..50]);
    let high = mean(&analysis.envelope.row(0)[150..200]);
    assert!(low > high * 4.0);
}

// =========================================================================
// Aperiodicity
// =========================================================================

#[test]
fn test_aperiodicity_bounds() {
    let analyzer = WorldAnalyzer::default();
    for wave in [harmonic_wave(220.0, 0.1), noise_wave(0.1)] {
        let analysis = analyzer.analyze(&wave, &native_time_axis(4, 5.0)).unwrap();
        assert!(analysis
            .aperiodicity
            .rows()
            .flatten()
            .all(|&a| (MIN_APERIODICITY..=1.0).contains(&a)));
        // anchored at -60 dB for DC and 0 dB at Nyquist
        assert!((analysis.aperiodicity.get(0, 0) - MIN_APERIODICITY).abs() < 1e-12);
        assert!((analysis.aperiodicity.get(0, 1024) - 1.0).abs() < 1e-12);
    }
}

#[test]
fn test_noise_is_more_aperiodic_than_harmonics() {
    let analyzer = WorldAnalyzer::default();
    let axis = [0.05];
    let tonal = analyzer.analyze(&harmonic_wave(220.0, 0.1), &axis).unwrap();
    let noisy = analyzer.analyze(&noise_wave(0.1), &axis).unwrap();

    // bins around 3 kHz
    let band = 120..160;
    let tonal_ap = mean(&tonal.aperiodicity.row(0)[band.clone()]);
    let noisy_ap = mean(&noisy.aperiodicity.row(0)[band]);
    assert!(noisy_ap > tonal_ap * 1.5, "noise {} vs tonal {}", noisy_ap, tonal_ap);
}

#[test]
fn test_silent_source_is_fully_aperiodic() {
    let analyzer = WorldAnalyzer::default();
    let silent = Waveform::new(vec![0.0; 4410], 44100);
    let analysis = analyzer.analyze(&silent, &[0.0, 0.05]).unwrap();
    assert!(analysis.aperiodicity.rows().flatten().all(|&a| a == 1.0));
}

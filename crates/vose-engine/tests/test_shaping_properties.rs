//! Expression shaping properties on a real analysis.

use std::f64::consts::PI;

use vose_engine::analysis::native_time_axis;
use vose_engine::{
    shape, EngineError, ExpressionCurves, SpectralAnalysis, SpectralAnalyzer, Waveform,
    WorldAnalyzer,
};

fn analysis(frames: usize) -> SpectralAnalysis {
    let samples = (0..22050)
        .map(|i| {
            let t = i as f64 / 44100.0;
            (2.0 * PI * 180.0 * t).sin() * 0.4 + (2.0 * PI * 540.0 * t).sin() * 0.1
        })
        .collect();
    let wave = Waveform::new(samples, 44100);
    WorldAnalyzer::default()
        .analyze(&wave, &native_time_axis(frames, 5.0))
        .unwrap()
}

fn curves<'a>(gender: &'a [f64], tension: &'a [f64], breath: &'a [f64]) -> ExpressionCurves<'a> {
    ExpressionCurves {
        gender,
        tension,
        breath,
    }
}

#[test]
fn test_neutral_gender_keeps_envelope() {
    let input = analysis(6);
    let out = shape(&input, curves(&[0.5; 6], &[0.5; 6], &[0.3; 6])).unwrap();
    assert_eq!(out.envelope, input.envelope);
}

#[test]
fn test_gender_changes_only_frames_it_is_set_on() {
    let input = analysis(3);
    let out = shape(&input, curves(&[0.5, 0.9, 0.5], &[0.5; 3], &[0.0; 3])).unwrap();
    assert_eq!(out.envelope.row(0), input.envelope.row(0));
    assert_ne!(out.envelope.row(1), input.envelope.row(1));
    assert_eq!(out.envelope.row(2), input.envelope.row(2));
}

#[test]
fn test_breath_is_monotonic_and_bounded() {
    let input = analysis(4);
    let mut previous = input.aperiodicity.clone();

    for step in 0..=10 {
        let breath = [step as f64 / 10.0; 4];
        let out = shape(&input, curves(&[0.5; 4], &[0.5; 4], &breath)).unwrap();
        for j in 0..4 {
            for (now, before) in out.aperiodicity.row(j).iter().zip(previous.row(j)) {
                assert!(now >= before, "breath step {} lowered aperiodicity", step);
                assert!(*now <= 1.0);
            }
        }
        previous = out.aperiodicity;
    }
}

#[test]
fn test_short_curve_never_reads_past_end() {
    let input = analysis(5);
    for (g, t, b) in [(4, 5, 5), (5, 0, 5), (5, 5, 1)] {
        let gender = vec![0.5; g];
        let tension = vec![0.5; t];
        let breath = vec![0.0; b];
        let err = shape(&input, curves(&gender, &tension, &breath)).unwrap_err();
        assert!(matches!(err, EngineError::CurveLengthMismatch { expected: 5, .. }));
    }
}

#[test]
fn test_long_curve_is_rejected_too() {
    let input = analysis(2);
    let err = shape(&input, curves(&[0.5; 3], &[0.5; 2], &[0.0; 2])).unwrap_err();
    assert!(matches!(
        err,
        EngineError::CurveLengthMismatch {
            curve: "gender_curve",
            found: 3,
            ..
        }
    ));
}

//! Render output: determinism, bounds, and file writing.

use std::f64::consts::PI;

use vose_engine::pitch::{apply_vibrato, constant_curve, midi_to_hz};
use vose_engine::{Engine, EngineError};
use vose_spec::{BackendError, EngineConfig, NoteRenderRequest, Placement};

fn vowel() -> Vec<f64> {
    (0..44100)
        .map(|i| {
            let t = i as f64 / 44100.0;
            (1..=6)
                .map(|h| (2.0 * PI * 160.0 * h as f64 * t).sin() * 0.3 / h as f64)
                .sum()
        })
        .collect()
}

fn engine_with(config: EngineConfig) -> Engine {
    let mut engine = Engine::new(config).unwrap();
    engine.preload("a", vowel(), 44100).unwrap();
    engine.preload("i", vowel().into_iter().rev().collect(), 44100).unwrap();
    engine
}

fn phrase() -> Vec<NoteRenderRequest> {
    let frames = 60;
    let vibrato = apply_vibrato(&constant_curve(midi_to_hz(60.0), frames), 5.0, 2.0);
    vec![
        NoteRenderRequest::builder("a")
            .pitch_curve(vibrato)
            .breath_curve(vec![0.4; frames])
            .build(),
        NoteRenderRequest::builder("i")
            .constant_pitch(midi_to_hz(64.0), frames)
            .gender_curve(vec![0.8; frames])
            .tension_curve(vec![0.2; frames])
            .velocity(90)
            .build(),
        NoteRenderRequest::builder("a")
            .constant_pitch(midi_to_hz(67.0), frames)
            .build(),
    ]
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_render_is_deterministic() {
    let a = engine_with(EngineConfig::default()).render(&phrase()).unwrap();
    let b = engine_with(EngineConfig::default()).render(&phrase()).unwrap();

    assert_eq!(a.samples, b.samples);
    assert_eq!(a.report.pcm_hash, b.report.pcm_hash);
    assert_eq!(a.report.request_hash, b.report.request_hash);
}

#[test]
fn test_seed_changes_noise() {
    let a = engine_with(EngineConfig::default()).render(&phrase()).unwrap();
    let b = engine_with(EngineConfig::default().with_seed(1))
        .render(&phrase())
        .unwrap();
    assert_ne!(a.samples, b.samples);
    assert_eq!(a.samples.len(), b.samples.len());
}

// ============================================================================
// Bounds
// ============================================================================

#[test]
fn test_overlapping_start_times_never_overrun() {
    let config = EngineConfig::default()
        .with_placement(Placement::StartTime)
        .with_max_duration(0.3);
    let engine = engine_with(config);

    let notes: Vec<NoteRenderRequest> = (0..8)
        .map(|i| {
            NoteRenderRequest::builder(if i % 2 == 0 { "a" } else { "i" })
                .constant_pitch(220.0, 40)
                .start_time(i as f64 * 0.07)
                .pre_utterance(0.02)
                .build()
        })
        .collect();

    let out = engine.render(&notes).unwrap();
    assert_eq!(out.samples.len(), 13230);
    assert!(out.samples.iter().all(|s| s.is_finite()));

    let dropped = out.report.skipped_with_code("W004").count();
    let truncated = out.report.warnings_with_code("W004").count();
    assert!(dropped > 0);
    assert!(truncated > 0);
    assert_eq!(out.report.rendered_notes + dropped, notes.len());
}

// ============================================================================
// File output
// ============================================================================

#[test]
fn test_render_to_file_writes_wav() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("phrase.wav");
    let engine = engine_with(EngineConfig::default());

    let file = engine.render_to_file(&phrase(), &path).unwrap();
    assert_eq!(Some(file.wav.pcm_hash.clone()), file.output.report.pcm_hash);

    let reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(reader.len() as usize, file.output.samples.len());

    let on_disk = std::fs::read(&path).unwrap();
    assert_eq!(on_disk, file.wav.wav_data);
}

#[test]
fn test_nothing_rendered_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("silence.wav");
    let engine = engine_with(EngineConfig::default());
    let note = NoteRenderRequest::builder("missing")
        .constant_pitch(200.0, 10)
        .build();

    let err = engine.render_to_file(&[note], &path).unwrap_err();
    assert!(matches!(err, EngineError::NothingRendered { note_count: 1 }));
    assert!(!path.exists());
}

#[test]
fn test_unwritable_destination_is_render_io() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("out.wav");
    let engine = engine_with(EngineConfig::default());

    let err = engine.render_to_file(&phrase(), &path).unwrap_err();
    assert_eq!(err.code(), "VOSE_005");
    assert!(!path.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_wav_sources_round_trip_through_engine() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("a.wav");
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 22050,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&source, spec).unwrap();
    for i in 0..22050 {
        let t = i as f64 / 22050.0;
        let value = (2.0 * PI * 200.0 * t).sin() * 0.5;
        writer.write_sample((value * 32767.0) as i16).unwrap();
    }
    writer.finalize().unwrap();

    let mut engine = Engine::new(EngineConfig::default()).unwrap();
    let wave = engine.load_wav("a", &source).unwrap();
    assert_eq!(wave.sample_rate(), 44100);

    let err = engine
        .load_wav("b", dir.path().join("b.wav"))
        .unwrap_err();
    assert!(matches!(err, EngineError::SourceNotFound { .. }));

    let out = engine.render(&phrase()[..1]).unwrap();
    assert!(out.report.ok);
    assert!(out.samples.iter().any(|&s| s != 0.0));
}

#[test]
fn test_config_from_json_drives_engine() {
    let config = EngineConfig::from_json(r#"{"output_gain": 0.5, "seed": 3}"#).unwrap();
    let engine = engine_with(config);
    let dir = tempfile::tempdir().unwrap();
    let file = engine
        .render_to_file(&phrase(), dir.path().join("out.wav"))
        .unwrap();

    let peak_in = file.output.samples.iter().fold(0.0f64, |m, s| m.max(s.abs()));
    let reader = hound::WavReader::open(dir.path().join("out.wav")).unwrap();
    let peak_out = reader
        .into_samples::<i16>()
        .map(|s| (s.unwrap() as f64 / 32767.0).abs())
        .fold(0.0f64, f64::max);
    assert!((peak_out - (peak_in * 0.5).min(1.0)).abs() < 1e-3);
}

//! End-to-end render scenarios: single note, missing source, cache reuse
//! and cache clearing.

use std::f64::consts::PI;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use vose_engine::{
    Engine, EngineResult, SpectralAnalysis, SpectralAnalyzer, Waveform, WorldAnalyzer,
};
use vose_spec::{EngineConfig, NoteRenderRequest};

/// Wraps the default analyzer and counts invocations.
struct CountingAnalyzer {
    inner: WorldAnalyzer,
    calls: Arc<AtomicUsize>,
}

impl CountingAnalyzer {
    fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let analyzer = Self {
            inner: WorldAnalyzer::default(),
            calls: Arc::clone(&calls),
        };
        (analyzer, calls)
    }
}

impl SpectralAnalyzer for CountingAnalyzer {
    fn analyze(&self, waveform: &Waveform, time_axis: &[f64]) -> EngineResult<SpectralAnalysis> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.analyze(waveform, time_axis)
    }

    fn fft_size(&self) -> usize {
        self.inner.fft_size()
    }
}

fn vowel(seconds: f64) -> Vec<f64> {
    let n = (seconds * 44100.0) as usize;
    (0..n)
        .map(|i| {
            let t = i as f64 / 44100.0;
            (1..=10)
                .map(|h| (2.0 * PI * 130.0 * h as f64 * t).sin() * 0.25 / h as f64)
                .sum()
        })
        .collect()
}

fn note(source: &str) -> NoteRenderRequest {
    NoteRenderRequest::builder(source)
        .constant_pitch(200.0, 100)
        .neutral_expression()
        .build()
}

fn counting_engine() -> (Engine, Arc<AtomicUsize>) {
    let (analyzer, calls) = CountingAnalyzer::new();
    let mut engine = Engine::new(EngineConfig::default())
        .unwrap()
        .with_analyzer(analyzer);
    engine.preload("a", vowel(1.0), 44100).unwrap();
    (engine, calls)
}

// ============================================================================
// Scenario A: one note
// ============================================================================

#[test]
fn test_single_note_length_and_content() {
    let (engine, _) = counting_engine();
    let out = engine.render(&[note("a")]).unwrap();

    assert_eq!(out.samples.len(), 21830);
    assert_eq!(out.sample_rate, 44100);
    assert!(out.report.ok);
    assert_eq!(out.report.rendered_notes, 1);

    let energy: f64 = out.samples.iter().map(|s| s * s).sum();
    assert!(energy > 0.0);
    assert!(out.samples.iter().all(|s| s.is_finite()));
}

// ============================================================================
// Scenario B: missing source
// ============================================================================

#[test]
fn test_missing_source_renders_silence() {
    let (engine, calls) = counting_engine();
    let out = engine.render(&[note("nowhere")]).unwrap();

    assert_eq!(out.samples.len(), 21830);
    assert!(out.samples.iter().all(|&s| s == 0.0));
    assert!(!out.report.ok);
    assert_eq!(out.report.skipped.len(), 1);
    assert_eq!(out.report.skipped[0].code, "VOSE_001");
    assert_eq!(out.report.skipped[0].source_ref, "nowhere");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

// ============================================================================
// Scenario C: two notes, one analysis
// ============================================================================

#[test]
fn test_shared_source_is_analyzed_once() {
    let (engine, calls) = counting_engine();
    let out = engine.render(&[note("a"), note("a")]).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(out.report.cache_misses, 1);
    assert_eq!(out.report.cache_hits, 1);
    assert_eq!(out.samples.len(), 2 * 21830);
    assert!(out.report.warnings.is_empty());
}

#[test]
fn test_cache_persists_across_renders() {
    let (engine, calls) = counting_engine();
    engine.render(&[note("a")]).unwrap();
    engine.render(&[note("a")]).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Scenario D: clearing between renders
// ============================================================================

#[test]
fn test_clear_between_renders_reanalyzes() {
    let (engine, calls) = counting_engine();
    let first = engine.render(&[note("a")]).unwrap();
    engine.clear_cache();
    let second = engine.render(&[note("a")]).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(first.samples, second.samples);
    assert_eq!(engine.cache_stats().misses, 2);
}

#[test]
fn test_cached_render_matches_uncached_render() {
    let (warm, _) = counting_engine();
    warm.render(&[note("a")]).unwrap();
    let cached = warm.render(&[note("a")]).unwrap();

    let (cold, _) = counting_engine();
    let fresh = cold.render(&[note("a")]).unwrap();

    assert_eq!(cached.samples, fresh.samples);
    assert_eq!(cached.report.pcm_hash, fresh.report.pcm_hash);
}

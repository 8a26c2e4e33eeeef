//! Renders a short synthetic phrase to `phrase.wav`.

use std::f64::consts::PI;

use vose_engine::pitch::{apply_vibrato, constant_curve, frames_for_duration, midi_to_hz};
use vose_engine::Engine;
use vose_spec::{EngineConfig, NoteRenderRequest};

fn main() {
    println!("Rendering phrase...");

    let mut engine = match Engine::new(EngineConfig::default()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("config rejected: {}", e);
            std::process::exit(1);
        }
    };

    // A buzzy stand-in for a recorded vowel: 120 Hz with falling harmonics
    let vowel: Vec<f64> = (0..44100)
        .map(|i| {
            let t = i as f64 / 44100.0;
            (1..=20)
                .map(|h| (2.0 * PI * 120.0 * h as f64 * t).sin() * 0.2 / h as f64)
                .sum()
        })
        .collect();
    if let Err(e) = engine.preload("a", vowel, 44100) {
        eprintln!("preload failed: {}", e);
        std::process::exit(1);
    }

    let frames = frames_for_duration(0.4, engine.config().frame_period_ms);
    let notes: Vec<NoteRenderRequest> = [60.0, 62.0, 64.0, 67.0]
        .iter()
        .enumerate()
        .map(|(i, &midi)| {
            let pitch = apply_vibrato(&constant_curve(midi_to_hz(midi), frames), 5.0, 2.0);
            NoteRenderRequest::builder("a")
                .pitch_curve(pitch)
                .gender_curve(vec![0.4 + 0.1 * i as f64; frames])
                .breath_curve(vec![0.1; frames])
                .build()
        })
        .collect();

    match engine.render_to_file(&notes, "phrase.wav") {
        Ok(file) => {
            println!("  samples: {}", file.output.samples.len());
            println!("  rendered notes: {}", file.output.report.rendered_notes);
            println!("  cache hits/misses: {}/{}", file.output.report.cache_hits, file.output.report.cache_misses);
            println!("  PCM hash: {}", file.wav.pcm_hash);
            println!("SUCCESS: wrote phrase.wav");
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}

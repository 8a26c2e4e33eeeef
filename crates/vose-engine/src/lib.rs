//! VO-SE Resynthesis Engine
//!
//! This crate turns an ordered list of note requests into one rendered
//! waveform by analysis, reshaping and resynthesis of recorded samples.
//!
//! # Overview
//!
//! Each note passes through the same pipeline:
//!
//! - **Sample Store** - decoded source recordings keyed by source reference
//! - **Spectral Analyzer** - CheapTrick-style envelope and D4C-style
//!   aperiodicity on a fixed frame grid
//! - **Analysis Cache** - one analysis per source, shared across notes
//! - **Expression Shaper** - gender (formant), tension and breath curves
//! - **Frame Synthesizer** - pulse/noise excitation driven by the target pitch
//!
//! The [`Engine`] session owns the store, cache and analyzer and places each
//! synthesized segment into the output buffer.
//!
//! # Determinism
//!
//! Analysis is a pure function of its input, and all noise comes from PCG32
//! streams seeded per note via BLAKE3. Rendering the same notes with the same
//! sources and config twice gives byte-identical output.
//!
//! # Example
//!
//! ```ignore
//! use vose_engine::Engine;
//! use vose_spec::{EngineConfig, NoteRenderRequest};
//!
//! let mut engine = Engine::new(EngineConfig::default())?;
//! engine.load_wav("a", "voicebank/a.wav")?;
//!
//! let note = NoteRenderRequest::builder("a").constant_pitch(220.0, 100).build();
//! let file = engine.render_to_file(&[note], "out.wav")?;
//! println!("PCM hash: {}", file.wav.pcm_hash);
//! ```
//!
//! # Crate Structure
//!
//! - [`render`] - Session object, buffer layout and the per-note pipeline
//! - [`store`] - Sample store and resampling
//! - [`analysis`] - Spectral analyzer trait and the default analyzer
//! - [`cache`] - Analysis cache
//! - [`shaper`] - Expression shaping
//! - [`synthesis`] - Frame synthesizer
//! - [`pitch`] - Pitch-curve helpers
//! - [`rng`] - Deterministic RNG with seed derivation
//! - [`wav`] - Deterministic WAV file writer

pub mod analysis;
pub mod cache;
pub mod error;
mod fft;
pub mod pitch;
pub mod render;
pub mod rng;
pub mod shaper;
pub mod spectrum;
pub mod store;
pub mod synthesis;
pub mod wav;

// Re-export main types at crate root
pub use analysis::{SpectralAnalyzer, WorldAnalyzer};
pub use cache::{AnalysisCache, CacheLookup, CacheStats};
pub use error::{EngineError, EngineResult};
pub use render::{Engine, RenderFile, RenderOutput, ENGINE_VERSION};
pub use shaper::{shape, ExpressionCurves};
pub use spectrum::{SpectralAnalysis, SpectralMatrix};
pub use store::{SampleStore, Waveform};
pub use synthesis::{segment_length, FrameSynthesizer};
pub use wav::{write_wav_atomic, WavResult};

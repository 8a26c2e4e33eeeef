//! Render orchestration.
//!
//! An [`Engine`] is one render session. It owns the sample store, the
//! analysis cache and the analyzer, and turns an ordered note list into a
//! single buffer:
//!
//! 1. [`BufferLayout::plan`] sizes the buffer and assigns each note a slot.
//! 2. Each note is validated, looked up, analyzed (through the cache),
//!    shaped and synthesized.
//! 3. The segment is mixed into its slot, clipped to the buffer.
//!
//! Problems with a single note never abort the render. They end up in the
//! [`RenderReport`] as skipped notes or warnings.

mod layout;
mod pipeline;


use std::fmt;
use std::ops::Range;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use vose_spec::{
    canonical_request_hash, EngineConfig, NoteIssue, NoteRenderRequest, RenderReport, WarningCode,
};

use crate::analysis::{SpectralAnalyzer, WorldAnalyzer};
use crate::cache::{AnalysisCache, CacheStats};
use crate::error::{EngineError, EngineResult};
use crate::store::{SampleStore, Waveform};
use crate::synthesis::FrameSynthesizer;
use crate::wav::{pcm16_hash, samples_to_pcm16, write_wav_atomic, WavResult};

pub use layout::{mix_into, BufferLayout, SegmentSlot, SlotFit};

use pipeline::StageClock;

/// Engine name and crate version, as recorded in render reports.
pub const ENGINE_VERSION: &str = concat!("vose-engine ", env!("CARGO_PKG_VERSION"));

/// Rendered buffer plus its report.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Mixed samples before the output gain.
    pub samples: Vec<f64>,
    /// Sample rate of `samples`.
    pub sample_rate: u32,
    /// What was rendered, skipped or altered.
    pub report: RenderReport,
}

impl RenderOutput {
    /// Samples with the configured output gain applied, as written to disk.
    pub fn with_gain(&self, gain: f64) -> Vec<f64> {
        self.samples.iter().map(|s| s * gain).collect()
    }
}

/// Result of [`Engine::render_to_file`].
#[derive(Debug, Clone)]
pub struct RenderFile {
    /// The in-memory render.
    pub output: RenderOutput,
    /// The encoded file contents and PCM hash.
    pub wav: WavResult,
}

/// A render session.
pub struct Engine {
    config: EngineConfig,
    store: SampleStore,
    cache: AnalysisCache,
    analyzer: Box<dyn SpectralAnalyzer>,
    synthesizer: FrameSynthesizer,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("sources", &self.store.len())
            .field("cache", &self.cache.stats())
            .field("fft_size", &self.analyzer.fft_size())
            .finish()
    }
}

impl Engine {
    /// Creates a session with the default analyzer.
    ///
    /// # Errors
    /// `InvalidParameter` if the configuration does not validate.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config
            .validate()
            .map_err(|e| EngineError::invalid_param("config", e.to_string()))?;

        Ok(Self {
            store: SampleStore::new(config.sample_rate),
            cache: AnalysisCache::new(),
            analyzer: Box::new(WorldAnalyzer::from_config(&config)),
            synthesizer: FrameSynthesizer::from_config(&config),
            config,
        })
    }

    /// Replaces the analyzer. Cached analyses from the previous one are
    /// dropped.
    pub fn with_analyzer(mut self, analyzer: impl SpectralAnalyzer + 'static) -> Self {
        self.analyzer = Box::new(analyzer);
        self.cache.clear();
        self
    }

    /// Session configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read access to the loaded sources.
    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    /// Registers decoded samples and drops any stale analysis of that source.
    pub fn preload(
        &mut self,
        source_ref: impl Into<String>,
        samples: Vec<f64>,
        sample_rate: u32,
    ) -> EngineResult<Arc<Waveform>> {
        let source_ref = source_ref.into();
        let waveform = self.store.preload(source_ref.clone(), samples, sample_rate)?;
        self.cache.invalidate(&source_ref);
        Ok(waveform)
    }

    /// Registers 16-bit PCM and drops any stale analysis of that source.
    pub fn preload_pcm16(
        &mut self,
        source_ref: impl Into<String>,
        samples: &[i16],
        sample_rate: u32,
    ) -> EngineResult<Arc<Waveform>> {
        let source_ref = source_ref.into();
        let waveform = self
            .store
            .preload_pcm16(source_ref.clone(), samples, sample_rate)?;
        self.cache.invalidate(&source_ref);
        Ok(waveform)
    }

    /// Loads a WAV file and drops any stale analysis of that source.
    ///
    /// # Errors
    /// `SourceNotFound` for a missing or empty file, `Wav` for a file that
    /// does not decode. Callers usually log these and carry on: notes that
    /// reference the source will be skipped at render time.
    pub fn load_wav(
        &mut self,
        source_ref: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> EngineResult<Arc<Waveform>> {
        let source_ref = source_ref.into();
        let waveform = self.store.load_wav(source_ref.clone(), path)?;
        self.cache.invalidate(&source_ref);
        Ok(waveform)
    }

    /// Removes a source and its analysis. Returns true if the source existed.
    pub fn remove_source(&mut self, source_ref: &str) -> bool {
        self.cache.invalidate(source_ref);
        self.store.remove(source_ref).is_some()
    }

    /// Empties the analysis cache. Sources stay loaded.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Empties both the analysis cache and the sample store.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.store.clear();
    }

    /// Cache counters since the session started.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Renders every note.
    ///
    /// Succeeds even when every note is skipped; the buffer is then silent
    /// and the report lists why.
    ///
    /// # Errors
    /// Only when the request cannot be hashed for the report.
    pub fn render(&self, notes: &[NoteRenderRequest]) -> EngineResult<RenderOutput> {
        self.render_range(notes, 0..notes.len())
    }

    /// Renders only the notes whose indices fall in `range`.
    ///
    /// The buffer layout still covers every note, so a partial render lines
    /// up sample-for-sample with a full one. Notes outside the range are
    /// left silent and are not reported.
    pub fn render_range(
        &self,
        notes: &[NoteRenderRequest],
        range: Range<usize>,
    ) -> EngineResult<RenderOutput> {
        let started = Instant::now();
        let request_hash = canonical_request_hash(notes)
            .map_err(|e| EngineError::invalid_param("notes", e.to_string()))?;

        let layout = BufferLayout::plan(notes, &self.config);
        let mut buffer = vec![0.0; layout.total_samples];
        let cache_before = self.cache.stats();
        let mut clock = StageClock::default();

        let mut skipped = Vec::new();
        let mut warnings = Vec::new();
        let mut rendered = 0;

        let end = range.end.min(notes.len());
        let start = range.start.min(end);

        for index in start..end {
            let note = &notes[index];
            let slot = layout.slots[index];

            let mut note_warnings = match self.admit_note(index, note) {
                Ok(w) => w,
                Err(issue) => {
                    log::warn!("skipping {}", issue);
                    skipped.push(issue);
                    continue;
                }
            };

            let kept = match layout.fit(&slot) {
                SlotFit::Full => slot.length,
                SlotFit::Truncated { kept } => kept,
                SlotFit::Outside => {
                    let issue = overrun_issue(index, note, slot, layout.total_samples);
                    log::warn!("skipping {}", issue);
                    skipped.push(issue);
                    continue;
                }
            };

            let segment = match self.synthesize_note(index, note, &mut clock) {
                Ok(segment) => segment,
                Err(issue) => {
                    log::warn!("skipping {}", issue);
                    skipped.push(issue);
                    continue;
                }
            };
            note_warnings.extend(segment.warnings);

            if kept < segment.samples.len() {
                let issue = overrun_issue(index, note, slot, layout.total_samples);
                log::warn!("truncating {}", issue);
                note_warnings.push(issue);
            }

            let kept = kept.min(segment.samples.len());
            let written = mix_into(&mut buffer, slot.offset, &segment.samples[..kept]);
            log::debug!(
                "note {} ('{}'): {} samples at offset {}",
                index,
                note.source_ref,
                written,
                slot.offset
            );

            warnings.extend(note_warnings);
            rendered += 1;
        }

        let cache_after = self.cache.stats();
        let gained: Vec<f64> = buffer.iter().map(|s| s * self.config.output_gain).collect();
        let pcm = samples_to_pcm16(&gained);

        let mut builder = RenderReport::builder(request_hash, ENGINE_VERSION.to_string())
            .pcm_hash(pcm16_hash(&pcm))
            .output(self.config.sample_rate, layout.total_samples)
            .note_count(notes.len())
            .rendered_notes(rendered)
            .skipped_notes(skipped)
            .warnings(warnings)
            .cache_stats(
                cache_after.hits - cache_before.hits,
                cache_after.misses - cache_before.misses,
            )
            .duration_ms(started.elapsed().as_millis() as u64);
        for timing in clock.timings() {
            builder = builder.stage(timing);
        }
        let report = builder.build();

        log::info!(
            "rendered {}/{} notes into {} samples ({} skipped, {} warnings, cache {}/{} hit/miss)",
            report.rendered_notes,
            report.note_count,
            report.total_samples,
            report.skipped.len(),
            report.warnings.len(),
            report.cache_hits,
            report.cache_misses
        );

        Ok(RenderOutput {
            samples: buffer,
            sample_rate: self.config.sample_rate,
            report,
        })
    }

    /// Renders every note and writes a 16-bit mono WAV to `destination`.
    ///
    /// The file is written to a temporary sibling and renamed into place,
    /// so a failure leaves no partial file behind.
    ///
    /// # Errors
    /// `NothingRendered` if notes were supplied but none rendered,
    /// `RenderIo` if the file cannot be written.
    pub fn render_to_file(
        &self,
        notes: &[NoteRenderRequest],
        destination: impl AsRef<Path>,
    ) -> EngineResult<RenderFile> {
        let output = self.render(notes)?;
        if !notes.is_empty() && output.report.rendered_notes == 0 {
            return Err(EngineError::NothingRendered {
                note_count: notes.len(),
            });
        }

        let samples = output.with_gain(self.config.output_gain);
        let wav = write_wav_atomic(destination, &samples, output.sample_rate)?;
        Ok(RenderFile { output, wav })
    }
}

fn overrun_issue(
    index: usize,
    note: &NoteRenderRequest,
    slot: SegmentSlot,
    capacity: usize,
) -> NoteIssue {
    let err = EngineError::BufferOverrunPrevented {
        offset: slot.offset,
        requested: slot.length,
        capacity,
    };
    NoteIssue::new(
        index,
        &note.source_ref,
        WarningCode::BufferOverrunPrevented.code(),
        err.to_string(),
    )
}

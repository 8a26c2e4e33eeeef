//! Builder pattern for creating render reports.

use super::{NoteIssue, RenderReport, StageTiming, REPORT_VERSION};

/// Builder for creating render reports ergonomically.
pub struct RenderReportBuilder {
    request_hash: String,
    pcm_hash: Option<String>,
    sample_rate: u32,
    total_samples: usize,
    note_count: usize,
    rendered_notes: usize,
    skipped: Vec<NoteIssue>,
    warnings: Vec<NoteIssue>,
    cache_hits: u64,
    cache_misses: u64,
    stages: Vec<StageTiming>,
    duration_ms: u64,
    engine_version: String,
}

impl RenderReportBuilder {
    /// Creates a new report builder.
    ///
    /// # Arguments
    ///
    /// * `request_hash` - Hex-encoded BLAKE3 hash of the note list
    /// * `engine_version` - Engine identifier and version
    ///
    /// # Example
    ///
    /// ```
    /// use vose_spec::report::RenderReportBuilder;
    ///
    /// let report = RenderReportBuilder::new(
    ///     "a1b2c3d4...".to_string(),
    ///     "vose-engine v0.1.0".to_string()
    /// )
    /// .note_count(2)
    /// .rendered_notes(2)
    /// .build();
    /// assert!(report.ok);
    /// ```
    pub fn new(request_hash: String, engine_version: String) -> Self {
        Self {
            request_hash,
            pcm_hash: None,
            sample_rate: 0,
            total_samples: 0,
            note_count: 0,
            rendered_notes: 0,
            skipped: Vec::new(),
            warnings: Vec::new(),
            cache_hits: 0,
            cache_misses: 0,
            stages: Vec::new(),
            duration_ms: 0,
            engine_version,
        }
    }

    /// Sets the PCM hash.
    pub fn pcm_hash(mut self, hash: impl Into<String>) -> Self {
        self.pcm_hash = Some(hash.into());
        self
    }

    /// Sets the output format (sample rate and length).
    pub fn output(mut self, sample_rate: u32, total_samples: usize) -> Self {
        self.sample_rate = sample_rate;
        self.total_samples = total_samples;
        self
    }

    /// Sets the number of notes in the request.
    pub fn note_count(mut self, count: usize) -> Self {
        self.note_count = count;
        self
    }

    /// Sets the number of notes that were synthesized.
    pub fn rendered_notes(mut self, count: usize) -> Self {
        self.rendered_notes = count;
        self
    }

    /// Adds a skipped note.
    pub fn skipped(mut self, issue: NoteIssue) -> Self {
        self.skipped.push(issue);
        self
    }

    /// Adds multiple skipped notes.
    pub fn skipped_notes(mut self, issues: Vec<NoteIssue>) -> Self {
        self.skipped.extend(issues);
        self
    }

    /// Adds a warning.
    pub fn warning(mut self, issue: NoteIssue) -> Self {
        self.warnings.push(issue);
        self
    }

    /// Adds multiple warnings.
    pub fn warnings(mut self, issues: Vec<NoteIssue>) -> Self {
        self.warnings.extend(issues);
        self
    }

    /// Sets analysis cache counters for this render.
    pub fn cache_stats(mut self, hits: u64, misses: u64) -> Self {
        self.cache_hits = hits;
        self.cache_misses = misses;
        self
    }

    /// Adds a stage timing entry.
    pub fn stage(mut self, timing: StageTiming) -> Self {
        self.stages.push(timing);
        self
    }

    /// Sets the total duration.
    pub fn duration_ms(mut self, ms: u64) -> Self {
        self.duration_ms = ms;
        self
    }

    /// Builds the final report.
    pub fn build(self) -> RenderReport {
        RenderReport {
            report_version: REPORT_VERSION,
            request_hash: self.request_hash,
            pcm_hash: self.pcm_hash,
            ok: self.skipped.is_empty(),
            sample_rate: self.sample_rate,
            total_samples: self.total_samples,
            note_count: self.note_count,
            rendered_notes: self.rendered_notes,
            skipped: self.skipped,
            warnings: self.warnings,
            cache_hits: self.cache_hits,
            cache_misses: self.cache_misses,
            stages: if self.stages.is_empty() {
                None
            } else {
                Some(self.stages)
            },
            duration_ms: self.duration_ms,
            engine_version: self.engine_version,
        }
    }
}

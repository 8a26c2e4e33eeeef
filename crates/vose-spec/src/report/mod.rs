//! Report types for render results.
//!
//! A render never aborts on a per-note problem. Instead every skipped or
//! altered note is listed here next to the output hash, so hosts can show the
//! user what was dropped.

mod builder;
mod issue;


pub use builder::RenderReportBuilder;
pub use issue::NoteIssue;

use serde::{Deserialize, Serialize};

/// Report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Wall-clock time spent in one pipeline stage, summed over every note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTiming {
    /// `analysis`, `shaping` or `synthesis`.
    pub stage: String,
    pub duration_ms: u64,
}

impl StageTiming {
    pub fn new(stage: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            stage: stage.into(),
            duration_ms,
        }
    }
}

/// Summary of a single render call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderReport {
    /// Report schema version.
    pub report_version: u32,
    /// Hex-encoded BLAKE3 hash of the canonicalized note list.
    pub request_hash: String,
    /// Hex-encoded BLAKE3 hash of the rendered 16-bit PCM.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pcm_hash: Option<String>,
    /// Whether every note rendered without being skipped.
    pub ok: bool,
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Output buffer length in samples.
    pub total_samples: usize,
    /// Number of notes in the request.
    pub note_count: usize,
    /// Number of notes that were synthesized.
    pub rendered_notes: usize,
    /// Notes that contributed silence, with the reason.
    pub skipped: Vec<NoteIssue>,
    /// Notes that rendered with a caveat.
    pub warnings: Vec<NoteIssue>,
    /// Analysis cache hits during this render.
    pub cache_hits: u64,
    /// Analysis cache misses during this render.
    pub cache_misses: u64,
    /// Per-stage timing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stages: Option<Vec<StageTiming>>,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
    /// Engine identifier and version.
    pub engine_version: String,
}

impl RenderReport {
    /// Creates a new report builder.
    pub fn builder(request_hash: String, engine_version: String) -> RenderReportBuilder {
        RenderReportBuilder::new(request_hash, engine_version)
    }

    /// Serializes the report to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the report to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a report from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Returns true if the note at `index` was skipped.
    pub fn was_skipped(&self, index: usize) -> bool {
        self.skipped.iter().any(|issue| issue.note_index == index)
    }

    /// Returns the skip entries carrying the given code.
    pub fn skipped_with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a NoteIssue> {
        self.skipped.iter().filter(move |issue| issue.code == code)
    }

    /// Returns the warnings carrying the given code.
    pub fn warnings_with_code<'a>(
        &'a self,
        code: &'a str,
    ) -> impl Iterator<Item = &'a NoteIssue> {
        self.warnings.iter().filter(move |issue| issue.code == code)
    }

    /// Output duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.total_samples as f64 / self.sample_rate as f64
    }
}

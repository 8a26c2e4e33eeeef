//! Note render request type and builder.

use serde::{Deserialize, Serialize};

/// Neutral gender value: no formant shift.
pub const NEUTRAL_GENDER: f64 = 0.5;

/// Neutral tension value: no spectral tilt.
pub const NEUTRAL_TENSION: f64 = 0.5;

/// Neutral breath value: no added aperiodicity.
pub const NEUTRAL_BREATH: f64 = 0.0;

/// Maximum MIDI-style velocity.
pub const MAX_VELOCITY: u8 = 127;

fn default_velocity() -> u8 {
    MAX_VELOCITY
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

fn is_max_velocity(value: &u8) -> bool {
    *value == MAX_VELOCITY
}

/// One unit of singing to render.
///
/// All four curves are index-aligned with the analysis frames: the value at
/// index `j` drives spectral frame `j`. The pitch curve length defines the
/// note's frame count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoteRenderRequest {
    /// Identifier of the source recording in the sample store.
    pub source_ref: String,
    /// Target fundamental frequency per frame, in Hz. Values <= 0 are unvoiced.
    pub pitch_curve: Vec<f64>,
    /// Formant shift control per frame, in [0, 1]. 0.5 is neutral.
    pub gender_curve: Vec<f64>,
    /// High-frequency emphasis per frame, in [0, 1]. 0.5 is neutral.
    pub tension_curve: Vec<f64>,
    /// Added breathiness per frame, in [0, 1]. 0.0 is neutral.
    pub breath_curve: Vec<f64>,
    /// Offset into the final mix, in seconds.
    pub start_time: f64,
    /// Seconds the note is pulled ahead of `start_time` so the consonant
    /// lands before the beat.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub pre_utterance: f64,
    /// Amplitude scale, 0..=127.
    #[serde(default = "default_velocity", skip_serializing_if = "is_max_velocity")]
    pub velocity: u8,
}

impl NoteRenderRequest {
    /// Creates a new note builder for the given source.
    pub fn builder(source_ref: impl Into<String>) -> NoteRenderRequestBuilder {
        NoteRenderRequestBuilder::new(source_ref)
    }

    /// Number of analysis frames (the pitch curve length).
    pub fn frame_count(&self) -> usize {
        self.pitch_curve.len()
    }

    /// Note duration implied by the frame count.
    pub fn duration_seconds(&self, frame_period_ms: f64) -> f64 {
        if self.pitch_curve.is_empty() {
            return 0.0;
        }
        (self.frame_count() - 1) as f64 * frame_period_ms / 1000.0
    }

    /// Start time after pulling the note ahead by its pre-utterance, never negative.
    pub fn effective_start_time(&self) -> f64 {
        (self.start_time - self.pre_utterance).max(0.0)
    }

    /// Linear amplitude derived from velocity.
    pub fn amplitude(&self) -> f64 {
        self.velocity.min(MAX_VELOCITY) as f64 / MAX_VELOCITY as f64
    }

    /// Returns true if all expression curves match the pitch curve length.
    pub fn curves_aligned(&self) -> bool {
        let n = self.frame_count();
        self.gender_curve.len() == n && self.tension_curve.len() == n && self.breath_curve.len() == n
    }

    /// Parses a list of notes from JSON.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Builder for [`NoteRenderRequest`].
#[derive(Debug, Clone)]
pub struct NoteRenderRequestBuilder {
    source_ref: String,
    pitch_curve: Vec<f64>,
    gender_curve: Option<Vec<f64>>,
    tension_curve: Option<Vec<f64>>,
    breath_curve: Option<Vec<f64>>,
    start_time: f64,
    pre_utterance: f64,
    velocity: u8,
}

impl NoteRenderRequestBuilder {
    /// Creates a new builder.
    pub fn new(source_ref: impl Into<String>) -> Self {
        Self {
            source_ref: source_ref.into(),
            pitch_curve: Vec::new(),
            gender_curve: None,
            tension_curve: None,
            breath_curve: None,
            start_time: 0.0,
            pre_utterance: 0.0,
            velocity: MAX_VELOCITY,
        }
    }

    /// Sets the pitch curve.
    pub fn pitch_curve(mut self, curve: Vec<f64>) -> Self {
        self.pitch_curve = curve;
        self
    }

    /// Sets a constant pitch over `frames` frames.
    pub fn constant_pitch(mut self, hz: f64, frames: usize) -> Self {
        self.pitch_curve = vec![hz; frames];
        self
    }

    /// Sets the gender curve.
    pub fn gender_curve(mut self, curve: Vec<f64>) -> Self {
        self.gender_curve = Some(curve);
        self
    }

    /// Sets the tension curve.
    pub fn tension_curve(mut self, curve: Vec<f64>) -> Self {
        self.tension_curve = Some(curve);
        self
    }

    /// Sets the breath curve.
    pub fn breath_curve(mut self, curve: Vec<f64>) -> Self {
        self.breath_curve = Some(curve);
        self
    }

    /// Resets every expression curve to its neutral value.
    pub fn neutral_expression(mut self) -> Self {
        self.gender_curve = None;
        self.tension_curve = None;
        self.breath_curve = None;
        self
    }

    /// Sets the start time in seconds.
    pub fn start_time(mut self, seconds: f64) -> Self {
        self.start_time = seconds;
        self
    }

    /// Sets the pre-utterance in seconds.
    pub fn pre_utterance(mut self, seconds: f64) -> Self {
        self.pre_utterance = seconds;
        self
    }

    /// Sets the velocity.
    pub fn velocity(mut self, velocity: u8) -> Self {
        self.velocity = velocity;
        self
    }

    /// Builds the request. Unset expression curves are filled with neutral
    /// values matching the pitch curve length.
    pub fn build(self) -> NoteRenderRequest {
        let n = self.pitch_curve.len();
        NoteRenderRequest {
            source_ref: self.source_ref,
            gender_curve: self
                .gender_curve
                .unwrap_or_else(|| vec![NEUTRAL_GENDER; n]),
            tension_curve: self
                .tension_curve
                .unwrap_or_else(|| vec![NEUTRAL_TENSION; n]),
            breath_curve: self
                .breath_curve
                .unwrap_or_else(|| vec![NEUTRAL_BREATH; n]),
            pitch_curve: self.pitch_curve,
            start_time: self.start_time,
            pre_utterance: self.pre_utterance,
            velocity: self.velocity,
        }
    }
}

//! Engine configuration.
//!
//! The engine's operating point is 44.1 kHz with a 5 ms frame period. Both are
//! exposed here so hosts can read them from one place, but only the defaults
//! are a tested target.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;
use crate::validation::common::{validate_non_negative, validate_positive, validate_range};

/// Default output sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Default analysis/synthesis frame period in milliseconds.
pub const DEFAULT_FRAME_PERIOD_MS: f64 = 5.0;

/// Default surrogate pitch used for spectral analysis, in Hz.
pub const DEFAULT_ANALYSIS_F0_HZ: f64 = 150.0;

/// Default lowest supported F0 in Hz; drives the FFT size.
pub const DEFAULT_F0_FLOOR_HZ: f64 = 71.0;

/// Default master gain.
pub const DEFAULT_OUTPUT_GAIN: f64 = 0.8;

/// Default fade length at segment edges, in milliseconds.
pub const DEFAULT_EDGE_FADE_MS: f64 = 5.0;

/// Maximum accepted master gain.
pub const MAX_OUTPUT_GAIN: f64 = 4.0;

/// How note segments are positioned in the output buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Notes are laid end to end by cumulative segment length; `start_time`
    /// is ignored.
    #[default]
    Sequential,
    /// Notes are placed at their (pre-utterance adjusted) start time and mixed
    /// additively where they overlap.
    StartTime,
}

/// Render engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Frame period in milliseconds.
    pub frame_period_ms: f64,
    /// Surrogate pitch for spectral envelope analysis, in Hz.
    pub analysis_f0_hz: f64,
    /// Lowest F0 the FFT size must accommodate, in Hz.
    pub f0_floor_hz: f64,
    /// Master gain applied to the mix before writing.
    pub output_gain: f64,
    /// Linear fade-in/out length at both ends of every segment, in milliseconds.
    pub edge_fade_ms: f64,
    /// Segment placement mode.
    pub placement: Placement,
    /// Hard cap on output length in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_duration_seconds: Option<f64>,
    /// Base seed for aperiodic excitation noise.
    pub seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            frame_period_ms: DEFAULT_FRAME_PERIOD_MS,
            analysis_f0_hz: DEFAULT_ANALYSIS_F0_HZ,
            f0_floor_hz: DEFAULT_F0_FLOOR_HZ,
            output_gain: DEFAULT_OUTPUT_GAIN,
            edge_fade_ms: DEFAULT_EDGE_FADE_MS,
            placement: Placement::Sequential,
            max_duration_seconds: None,
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SpecError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a config file, falling back to defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpecError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serializes the config to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, SpecError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Sets the placement mode.
    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Sets the output length cap.
    pub fn with_max_duration(mut self, seconds: f64) -> Self {
        self.max_duration_seconds = Some(seconds);
        self
    }

    /// Sets the master gain.
    pub fn with_output_gain(mut self, gain: f64) -> Self {
        self.output_gain = gain;
        self
    }

    /// Sets the edge fade length.
    pub fn with_edge_fade_ms(mut self, fade_ms: f64) -> Self {
        self.edge_fade_ms = fade_ms;
        self
    }

    /// Sets the noise seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Checks every field for a usable value.
    pub fn validate(&self) -> Result<(), SpecError> {
        let invalid = |e: crate::validation::common::CommonValidationError| {
            SpecError::InvalidConfig(e.message)
        };

        if self.sample_rate == 0 {
            return Err(SpecError::InvalidConfig(
                "sample_rate must be positive, got 0".to_string(),
            ));
        }
        validate_positive("frame_period_ms", self.frame_period_ms).map_err(invalid)?;
        validate_positive("analysis_f0_hz", self.analysis_f0_hz).map_err(invalid)?;
        validate_positive("f0_floor_hz", self.f0_floor_hz).map_err(invalid)?;
        // The analysis window spans three periods of analysis_f0_hz and must
        // fit in the FFT sized from f0_floor_hz.
        if self.analysis_f0_hz < self.f0_floor_hz {
            return Err(SpecError::InvalidConfig(format!(
                "analysis_f0_hz ({}) must not be below f0_floor_hz ({})",
                self.analysis_f0_hz, self.f0_floor_hz
            )));
        }
        validate_range("output_gain", self.output_gain, 0.0, MAX_OUTPUT_GAIN).map_err(invalid)?;
        validate_non_negative("edge_fade_ms", self.edge_fade_ms).map_err(invalid)?;
        if let Some(max) = self.max_duration_seconds {
            validate_non_negative("max_duration_seconds", max).map_err(invalid)?;
        }
        Ok(())
    }

    /// Number of output samples per frame period (fractional).
    pub fn samples_per_frame(&self) -> f64 {
        self.frame_period_ms / 1000.0 * self.sample_rate as f64
    }
}

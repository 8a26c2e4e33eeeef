//! Error types for the render engine.

use std::path::PathBuf;

use thiserror::Error;
use vose_spec::BackendError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while loading, analyzing or rendering.
///
/// Per-note variants (`SourceNotFound`, `Analysis`, `CurveLengthMismatch`,
/// `BufferOverrunPrevented`) never abort a render; the orchestrator records
/// them in the report and moves on.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A note's source has no waveform in the sample store.
    #[error("source not found: '{source_ref}'")]
    SourceNotFound {
        /// The unresolved source reference.
        source_ref: String,
    },

    /// Degenerate waveform or frame count for spectral analysis.
    #[error("analysis failed: {message}")]
    Analysis {
        /// Error message.
        message: String,
    },

    /// A note's curves disagree in length.
    #[error("{curve} has {found} frames, pitch_curve has {expected}")]
    CurveLengthMismatch {
        /// Name of the offending curve.
        curve: &'static str,
        /// Pitch curve length.
        expected: usize,
        /// Offending curve length.
        found: usize,
    },

    /// A write range would exceed the output buffer.
    #[error("segment of {requested} samples at offset {offset} exceeds buffer of {capacity}")]
    BufferOverrunPrevented {
        /// Write offset in samples.
        offset: usize,
        /// Requested segment length.
        requested: usize,
        /// Buffer length.
        capacity: usize,
    },

    /// The final output write failed.
    #[error("failed to write '{}': {message}", path.display())]
    RenderIo {
        /// Destination path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Notes were supplied but none of them rendered.
    #[error("none of the {note_count} notes rendered")]
    NothingRendered {
        /// Number of notes in the request.
        note_count: usize,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// WAV decode error.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

impl EngineError {
    /// Creates a source-not-found error.
    pub fn source_not_found(source_ref: impl Into<String>) -> Self {
        Self::SourceNotFound {
            source_ref: source_ref.into(),
        }
    }

    /// Creates an analysis error.
    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis {
            message: message.into(),
        }
    }

    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a render I/O error for the given destination.
    pub fn render_io(path: impl Into<PathBuf>, message: impl std::fmt::Display) -> Self {
        Self::RenderIo {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Returns true if this error only affects one note.
    pub fn is_per_note(&self) -> bool {
        matches!(
            self,
            EngineError::SourceNotFound { .. }
                | EngineError::Analysis { .. }
                | EngineError::CurveLengthMismatch { .. }
                | EngineError::BufferOverrunPrevented { .. }
        )
    }
}

impl BackendError for EngineError {
    fn code(&self) -> &'static str {
        match self {
            EngineError::SourceNotFound { .. } => "VOSE_001",
            EngineError::Analysis { .. } => "VOSE_002",
            EngineError::CurveLengthMismatch { .. } => "VOSE_003",
            EngineError::BufferOverrunPrevented { .. } => "VOSE_004",
            EngineError::RenderIo { .. } => "VOSE_005",
            EngineError::InvalidParameter { .. } => "VOSE_006",
            EngineError::NothingRendered { .. } => "VOSE_007",
            EngineError::Io(_) => "VOSE_008",
            EngineError::Wav(_) => "VOSE_009",
        }
    }

    fn category(&self) -> &'static str {
        match self {
            EngineError::SourceNotFound { .. } | EngineError::Wav(_) => "store",
            EngineError::Analysis { .. } => "analysis",
            EngineError::CurveLengthMismatch { .. } | EngineError::InvalidParameter { .. } => {
                "request"
            }
            EngineError::BufferOverrunPrevented { .. } | EngineError::NothingRendered { .. } => {
                "render"
            }
            EngineError::RenderIo { .. } | EngineError::Io(_) => "io",
        }
    }
}

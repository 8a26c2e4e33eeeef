//! Per-note issue entries for render reports.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationWarning};

/// A problem attached to one note of a render request.
///
/// Used both for skipped notes (the note contributed silence) and for
/// warnings (the note rendered, possibly altered).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoteIssue {
    /// Index of the note in the request.
    pub note_index: usize,
    /// Source reference of the note.
    pub source_ref: String,
    /// Error or warning code (e.g., "E003", "W004", "VOSE_001").
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Path to the problematic field, when one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl NoteIssue {
    /// Creates a new issue.
    pub fn new(
        note_index: usize,
        source_ref: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            note_index,
            source_ref: source_ref.into(),
            code: code.into(),
            message: message.into(),
            path: None,
        }
    }

    /// Converts a ValidationError into an issue for the given note.
    pub fn from_validation_error(
        note_index: usize,
        source_ref: impl Into<String>,
        err: &ValidationError,
    ) -> Self {
        Self {
            note_index,
            source_ref: source_ref.into(),
            code: err.code.code().to_string(),
            message: err.message.clone(),
            path: err.path.clone(),
        }
    }

    /// Converts a ValidationWarning into an issue for the given note.
    pub fn from_validation_warning(
        note_index: usize,
        source_ref: impl Into<String>,
        warn: &ValidationWarning,
    ) -> Self {
        Self {
            note_index,
            source_ref: source_ref.into(),
            code: warn.code.code().to_string(),
            message: warn.message.clone(),
            path: warn.path.clone(),
        }
    }
}

impl std::fmt::Display for NoteIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "note {} ({}): {}: {}",
            self.note_index, self.source_ref, self.code, self.message
        )
    }
}

//! Render request validation.
//!
//! Validation never mutates a request. Errors mark a note as unrenderable;
//! warnings flag values the engine will coerce (clamped expression values,
//! unvoiced frames).

pub mod common;


use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use crate::note::{NoteRenderRequest, MAX_VELOCITY};

/// Validates a single note.
///
/// # Arguments
/// * `note` - The note to validate
///
/// # Returns
/// * `ValidationResult` with `ok=false` if the note cannot be rendered
///
/// # Example
/// ```
/// use vose_spec::NoteRenderRequest;
/// use vose_spec::validation::validate_note;
///
/// let note = NoteRenderRequest::builder("a").constant_pitch(220.0, 10).build();
/// assert!(validate_note(&note).is_ok());
/// ```
pub fn validate_note(note: &NoteRenderRequest) -> ValidationResult {
    validate_note_at(note, None)
}

/// Validates an ordered list of notes, prefixing field paths with `notes[i]`.
pub fn validate_notes(notes: &[NoteRenderRequest]) -> ValidationResult {
    let mut result = ValidationResult::success();
    for (index, note) in notes.iter().enumerate() {
        result.merge(validate_note_at(note, Some(index)));
    }
    result
}

/// Checks the fields that decide where a note lands on the timeline.
///
/// Only meaningful under start-time placement; sequential placement ignores
/// `start_time` and `pre_utterance` entirely, so the engine skips this check
/// there.
pub fn validate_note_timing(note: &NoteRenderRequest) -> ValidationResult {
    let mut result = ValidationResult::success();
    for (name, value) in [
        ("start_time", note.start_time),
        ("pre_utterance", note.pre_utterance),
    ] {
        if let Err(e) = common::validate_non_negative(name, value) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidTiming,
                e.message,
                name,
            ));
        }
    }
    result
}

/// Checks only the curve-length contract.
///
/// Returns the name and length of the first curve that disagrees with the
/// pitch curve.
pub fn first_misaligned_curve(note: &NoteRenderRequest) -> Option<(&'static str, usize)> {
    let expected = note.frame_count();
    [
        ("gender_curve", note.gender_curve.len()),
        ("tension_curve", note.tension_curve.len()),
        ("breath_curve", note.breath_curve.len()),
    ]
    .into_iter()
    .find(|&(_, len)| len != expected)
}

fn field_path(index: Option<usize>, field: &str) -> String {
    match index {
        Some(i) => format!("notes[{}].{}", i, field),
        None => field.to_string(),
    }
}

fn validate_note_at(note: &NoteRenderRequest, index: Option<usize>) -> ValidationResult {
    let mut result = ValidationResult::success();

    if note.source_ref.trim().is_empty() {
        result.add_error(ValidationError::with_path(
            ErrorCode::MissingSourceRef,
            "source_ref must not be empty",
            field_path(index, "source_ref"),
        ));
    }

    if note.frame_count() == 0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::EmptyNote,
            "pitch_curve must contain at least one frame",
            field_path(index, "pitch_curve"),
        ));
    }

    if let Some((name, len)) = first_misaligned_curve(note) {
        result.add_error(ValidationError::with_path(
            ErrorCode::CurveLengthMismatch,
            format!(
                "{} has {} frames, pitch_curve has {}",
                name,
                len,
                note.frame_count()
            ),
            field_path(index, name),
        ));
    }

    validate_pitch(note, index, &mut result);
    validate_expression(note, index, &mut result);
    validate_velocity(note, index, &mut result);

    result
}

fn validate_pitch(note: &NoteRenderRequest, index: Option<usize>, result: &mut ValidationResult) {
    if let Some(frame) = note.pitch_curve.iter().position(|f0| !f0.is_finite()) {
        result.add_error(ValidationError::with_path(
            ErrorCode::NonFinitePitch,
            format!("pitch at frame {} is not finite", frame),
            field_path(index, "pitch_curve"),
        ));
        return;
    }

    let unvoiced = note.pitch_curve.iter().filter(|&&f0| f0 <= 0.0).count();
    if unvoiced > 0 {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::UnvoicedFrames,
            format!("{} frame(s) with pitch <= 0 will be unvoiced", unvoiced),
            field_path(index, "pitch_curve"),
        ));
    }
}

fn validate_expression(
    note: &NoteRenderRequest,
    index: Option<usize>,
    result: &mut ValidationResult,
) {
    let curves = [
        ("gender_curve", &note.gender_curve),
        ("tension_curve", &note.tension_curve),
        ("breath_curve", &note.breath_curve),
    ];

    for (name, curve) in curves {
        let out_of_range = curve
            .iter()
            .filter(|&&v| common::validate_unit_interval(name, v).is_err())
            .count();
        if out_of_range > 0 {
            result.add_warning(ValidationWarning::with_path(
                WarningCode::CurveOutOfRange,
                format!(
                    "{} value(s) outside [0, 1] will be clamped",
                    out_of_range
                ),
                field_path(index, name),
            ));
        }
    }
}

fn validate_velocity(
    note: &NoteRenderRequest,
    index: Option<usize>,
    result: &mut ValidationResult,
) {
    if note.velocity > MAX_VELOCITY {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidVelocity,
            format!("velocity must be <= {}, got {}", MAX_VELOCITY, note.velocity),
            field_path(index, "velocity"),
        ));
    }
}

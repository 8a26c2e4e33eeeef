//! Per-note pipeline: validate, look up, analyze, shape, synthesize.
//!
//! Every failure here is local to one note and comes back as a
//! [`NoteIssue`] for the report instead of an error.

use std::time::{Duration, Instant};

use vose_spec::{
    validate_note, validate_note_timing, BackendError, NoteIssue, NoteRenderRequest, Placement,
    StageTiming, WarningCode,
};

use super::Engine;
use crate::analysis::time_axis_for;
use crate::error::EngineError;
use crate::rng::create_note_rng;
use crate::shaper::{shape, ExpressionCurves};

/// A synthesized, level-adjusted note segment.
#[derive(Debug)]
pub(super) struct NoteSegment {
    pub samples: Vec<f64>,
    pub warnings: Vec<NoteIssue>,
}

/// Accumulated wall-clock time per pipeline stage.
#[derive(Debug, Default)]
pub(super) struct StageClock {
    analysis: Duration,
    shaping: Duration,
    synthesis: Duration,
}

impl StageClock {
    pub fn timings(&self) -> Vec<StageTiming> {
        [
            ("analysis", self.analysis),
            ("shaping", self.shaping),
            ("synthesis", self.synthesis),
        ]
        .into_iter()
        .map(|(stage, elapsed)| StageTiming::new(stage, elapsed.as_millis() as u64))
        .collect()
    }
}

fn issue(index: usize, note: &NoteRenderRequest, err: &EngineError) -> NoteIssue {
    NoteIssue::new(index, &note.source_ref, err.code(), err.to_string())
}

impl Engine {
    /// Validates a note. Returns its warnings, or the first error as the
    /// reason to skip it.
    pub(super) fn admit_note(
        &self,
        index: usize,
        note: &NoteRenderRequest,
    ) -> Result<Vec<NoteIssue>, NoteIssue> {
        let mut result = validate_note(note);
        if self.config.placement == Placement::StartTime {
            result.merge(validate_note_timing(note));
        }
        if let Some(err) = result.errors.first() {
            return Err(NoteIssue::from_validation_error(index, &note.source_ref, err));
        }
        Ok(result
            .warnings
            .iter()
            .map(|w| NoteIssue::from_validation_warning(index, &note.source_ref, w))
            .collect())
    }

    /// Runs the pipeline for one admitted note.
    pub(super) fn synthesize_note(
        &self,
        index: usize,
        note: &NoteRenderRequest,
        clock: &mut StageClock,
    ) -> Result<NoteSegment, NoteIssue> {
        let frames = note.frame_count();
        let mut warnings = Vec::new();

        let waveform = self
            .store
            .get(&note.source_ref)
            .ok_or_else(|| issue(index, note, &EngineError::source_not_found(&note.source_ref)))?;

        let started = Instant::now();
        let time_axis = time_axis_for(frames, self.config.frame_period_ms, waveform.duration_seconds());
        let lookup = self
            .cache
            .get_or_compute(&note.source_ref, &waveform, &time_axis, self.analyzer.as_ref())
            .map_err(|e| issue(index, note, &e))?;
        clock.analysis += started.elapsed();

        let conformed;
        let analysis = if lookup.analysis.frames() == frames {
            lookup.analysis.as_ref()
        } else {
            warnings.push(NoteIssue::new(
                index,
                &note.source_ref,
                WarningCode::AnalysisFrameMismatch.code(),
                format!(
                    "cached analysis has {} frames, note has {}; frames were remapped",
                    lookup.analysis.frames(),
                    frames
                ),
            ));
            conformed = lookup.analysis.conform_frames(frames);
            &conformed
        };

        let started = Instant::now();
        let shaped = shape(analysis, ExpressionCurves::from_note(note))
            .map_err(|e| issue(index, note, &e))?;
        clock.shaping += started.elapsed();

        let started = Instant::now();
        let mut rng = create_note_rng(self.config.seed, index);
        let mut samples = self
            .synthesizer
            .synthesize(&note.pitch_curve, &shaped, &mut rng)
            .map_err(|e| issue(index, note, &e))?;
        clock.synthesis += started.elapsed();

        let amplitude = note.amplitude();
        for s in samples.iter_mut() {
            *s *= amplitude;
        }
        let fade = (self.config.edge_fade_ms * self.config.sample_rate as f64 / 1000.0).round() as usize;
        apply_edge_fade(&mut samples, fade);

        Ok(NoteSegment { samples, warnings })
    }
}

/// Linear fade-in and fade-out of `fade` samples each, shortened to half
/// the segment when it is too short.
pub(crate) fn apply_edge_fade(samples: &mut [f64], fade: usize) {
    let fade = fade.min(samples.len() / 2);
    if fade == 0 {
        return;
    }
    let len = samples.len();
    for i in 0..fade {
        let gain = i as f64 / fade as f64;
        samples[i] *= gain;
        samples[len - 1 - i] *= gain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_fade_ramps_both_ends() {
        let mut samples = vec![1.0; 10];
        apply_edge_fade(&mut samples, 4);
        assert_eq!(samples, vec![0.0, 0.25, 0.5, 0.75, 1.0, 1.0, 0.75, 0.5, 0.25, 0.0]);
    }

    #[test]
    fn test_edge_fade_is_limited_to_half() {
        let mut samples = vec![1.0; 4];
        apply_edge_fade(&mut samples, 100);
        assert_eq!(samples, vec![0.0, 0.5, 0.5, 0.0]);

        let mut single = vec![1.0];
        apply_edge_fade(&mut single, 100);
        assert_eq!(single, vec![1.0]);
    }

    #[test]
    fn test_zero_fade_is_identity() {
        let mut samples = vec![0.3, -0.2];
        apply_edge_fade(&mut samples, 0);
        assert_eq!(samples, vec![0.3, -0.2]);
    }
}

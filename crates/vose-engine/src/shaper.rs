//! Expression shaping of a spectral analysis.
//!
//! Per frame `j` and bin `k >= 1`, with `B` bins:
//!
//! 1. gender warps the frequency axis: `shift = (g - 0.5) * 0.4`, the new
//!    value is read from the unshifted row at `k * (1 + shift)` by linear
//!    interpolation. Bins whose read position lies past `B - 1` keep their
//!    value.
//! 2. tension tilts the warped envelope by `1 + (t - 0.5) * k / B`.
//! 3. breath raises aperiodicity to `min(1, ap + b * k / B)`.
//!
//! Bin 0 is never touched. The input analysis is not modified.

use vose_spec::note::{NEUTRAL_BREATH, NEUTRAL_GENDER, NEUTRAL_TENSION};

use crate::error::{EngineError, EngineResult};
use crate::spectrum::SpectralAnalysis;

/// Maximum formant scaling either way (±20%).
pub const MAX_FORMANT_SHIFT: f64 = 0.2;

/// Per-frame expression curves, index-aligned with the analysis frames.
#[derive(Debug, Clone, Copy)]
pub struct ExpressionCurves<'a> {
    /// Formant control, 0.5 neutral.
    pub gender: &'a [f64],
    /// High-frequency tilt, 0.5 neutral.
    pub tension: &'a [f64],
    /// Added aperiodicity, 0.0 neutral.
    pub breath: &'a [f64],
}

impl<'a> ExpressionCurves<'a> {
    /// Borrows the curves of a note.
    pub fn from_note(note: &'a vose_spec::NoteRenderRequest) -> Self {
        Self {
            gender: &note.gender_curve,
            tension: &note.tension_curve,
            breath: &note.breath_curve,
        }
    }

    fn check_len(&self, frames: usize) -> EngineResult<()> {
        for (curve, values) in [
            ("gender_curve", self.gender),
            ("tension_curve", self.tension),
            ("breath_curve", self.breath),
        ] {
            if values.len() != frames {
                return Err(EngineError::CurveLengthMismatch {
                    curve,
                    expected: frames,
                    found: values.len(),
                });
            }
        }
        Ok(())
    }
}

/// Clamps a curve value to [0, 1]; non-finite values fall back to `neutral`.
fn unit(value: f64, neutral: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        neutral
    }
}

/// Applies gender, tension and breath curves, returning a new analysis.
///
/// # Errors
/// `CurveLengthMismatch` if any curve length differs from the frame count.
/// Nothing is read out of bounds in that case.
pub fn shape(analysis: &SpectralAnalysis, curves: ExpressionCurves<'_>) -> EngineResult<SpectralAnalysis> {
    let frames = analysis.frames();
    curves.check_len(frames)?;

    let bins = analysis.bins();
    let mut shaped = analysis.clone();
    if bins < 2 {
        return Ok(shaped);
    }
    let last = (bins - 1) as f64;

    for j in 0..frames {
        let gender = unit(curves.gender[j], NEUTRAL_GENDER);
        let tension = unit(curves.tension[j], NEUTRAL_TENSION);
        let breath = unit(curves.breath[j], NEUTRAL_BREATH);

        let scale = 1.0 + (gender - 0.5) * 2.0 * MAX_FORMANT_SHIFT;
        let source = analysis.envelope.row(j);
        let envelope = shaped.envelope.row_mut(j);

        for k in 1..bins {
            let position = k as f64 * scale;
            let mut value = if position <= last {
                let i0 = position.floor() as usize;
                let i1 = (i0 + 1).min(bins - 1);
                let frac = position - i0 as f64;
                source[i0] + (source[i1] - source[i0]) * frac
            } else {
                source[k]
            };
            value *= 1.0 + (tension - 0.5) * (k as f64 / bins as f64);
            envelope[k] = value;
        }

        let aperiodicity = shaped.aperiodicity.row_mut(j);
        for (k, ap) in aperiodicity.iter_mut().enumerate().skip(1) {
            *ap = (*ap + breath * (k as f64 / bins as f64)).min(1.0);
        }
    }

    Ok(shaped)
}

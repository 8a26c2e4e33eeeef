//! Frame-by-bin spectral matrices shared by analysis, shaping and synthesis.

use crate::error::{EngineError, EngineResult};

/// FFT size for a sample rate and lowest expected F0.
///
/// `2^(1 + floor(log2(3 * sample_rate / f0_floor)))`, which is 2048 at the
/// 44.1 kHz / 71 Hz operating point. Analyzer and synthesizer both call this,
/// so their bin layouts always agree.
pub fn fft_size_for(sample_rate: u32, f0_floor_hz: f64) -> usize {
    let periods = 3.0 * sample_rate as f64 / f0_floor_hz;
    1usize << (1 + periods.log2().floor().max(0.0) as u32)
}

/// Number of non-negative frequency bins for an FFT size.
pub fn spec_bins(fft_size: usize) -> usize {
    fft_size / 2 + 1
}

/// Owned row-major matrix: one row per frame, one column per frequency bin.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralMatrix {
    data: Vec<f64>,
    frames: usize,
    bins: usize,
}

impl SpectralMatrix {
    /// Creates a matrix with every cell set to `value`.
    pub fn filled(frames: usize, bins: usize, value: f64) -> Self {
        Self {
            data: vec![value; frames * bins],
            frames,
            bins,
        }
    }

    /// Builds a matrix from equal-length rows.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> EngineResult<Self> {
        let bins = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != bins) {
            return Err(EngineError::invalid_param(
                "rows",
                "all spectral rows must have the same length",
            ));
        }
        let frames = rows.len();
        Ok(Self {
            data: rows.into_iter().flatten().collect(),
            frames,
            bins,
        })
    }

    /// Number of frames (rows).
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Number of bins (columns).
    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Borrows one frame.
    pub fn row(&self, frame: usize) -> &[f64] {
        &self.data[frame * self.bins..(frame + 1) * self.bins]
    }

    /// Mutably borrows one frame.
    pub fn row_mut(&mut self, frame: usize) -> &mut [f64] {
        &mut self.data[frame * self.bins..(frame + 1) * self.bins]
    }

    /// Iterates over frames.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on 0
        self.data.chunks_exact(self.bins.max(1))
    }

    /// Reads one cell.
    pub fn get(&self, frame: usize, bin: usize) -> f64 {
        self.data[frame * self.bins + bin]
    }

    /// Returns a matrix with `frames` rows, taking each row from the nearest
    /// source frame by proportional position.
    pub fn conform_frames(&self, frames: usize) -> Self {
        if frames == self.frames || self.frames == 0 {
            return self.clone();
        }
        let mut data = Vec::with_capacity(frames * self.bins);
        for j in 0..frames {
            data.extend_from_slice(self.row(nearest_frame(j, frames, self.frames)));
        }
        Self {
            data,
            frames,
            bins: self.bins,
        }
    }
}

fn nearest_frame(j: usize, target: usize, source: usize) -> usize {
    if target <= 1 {
        return 0;
    }
    let pos = j as f64 * (source - 1) as f64 / (target - 1) as f64;
    (pos.round() as usize).min(source - 1)
}

/// Spectral envelope and aperiodicity for one analysis, with matching shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralAnalysis {
    /// Power spectral envelope per frame.
    pub envelope: SpectralMatrix,
    /// Aperiodicity per frame, in (0, 1]; 1 is pure noise.
    pub aperiodicity: SpectralMatrix,
    /// FFT size the bins were computed for.
    pub fft_size: usize,
}

impl SpectralAnalysis {
    /// Pairs the two matrices, checking they line up.
    pub fn new(
        envelope: SpectralMatrix,
        aperiodicity: SpectralMatrix,
        fft_size: usize,
    ) -> EngineResult<Self> {
        if envelope.frames() != aperiodicity.frames() || envelope.bins() != aperiodicity.bins() {
            return Err(EngineError::analysis(format!(
                "envelope is {}x{} but aperiodicity is {}x{}",
                envelope.frames(),
                envelope.bins(),
                aperiodicity.frames(),
                aperiodicity.bins()
            )));
        }
        if envelope.bins() != spec_bins(fft_size) {
            return Err(EngineError::analysis(format!(
                "{} bins do not match fft size {}",
                envelope.bins(),
                fft_size
            )));
        }
        Ok(Self {
            envelope,
            aperiodicity,
            fft_size,
        })
    }

    /// Number of frames.
    pub fn frames(&self) -> usize {
        self.envelope.frames()
    }

    /// Number of bins per frame.
    pub fn bins(&self) -> usize {
        self.envelope.bins()
    }

    /// Resizes both matrices to `frames` by nearest-frame mapping.
    pub fn conform_frames(&self, frames: usize) -> Self {
        Self {
            envelope: self.envelope.conform_frames(frames),
            aperiodicity: self.aperiodicity.conform_frames(frames),
            fft_size: self.fft_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fft_size_at_operating_point() {
        assert_eq!(fft_size_for(44100, 71.0), 2048);
        assert_eq!(spec_bins(2048), 1025);
        // lower floor needs a longer window
        assert_eq!(fft_size_for(44100, 40.0), 4096);
    }

    #[test]
    fn test_from_rows_and_access() {
        let m = SpectralMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.frames(), 2);
        assert_eq!(m.bins(), 2);
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert_eq!(m.get(0, 1), 2.0);
        assert_eq!(m.rows().count(), 2);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        assert!(SpectralMatrix::from_rows(vec![vec![1.0], vec![1.0, 2.0]]).is_err());
    }

    #[test]
    fn test_conform_frames_nearest() {
        let m = SpectralMatrix::from_rows(vec![vec![0.0], vec![1.0], vec![2.0]]).unwrap();
        let stretched = m.conform_frames(5);
        let values: Vec<f64> = stretched.rows().map(|r| r[0]).collect();
        assert_eq!(values, vec![0.0, 1.0, 1.0, 2.0, 2.0]);

        let squeezed = m.conform_frames(2);
        let values: Vec<f64> = squeezed.rows().map(|r| r[0]).collect();
        assert_eq!(values, vec![0.0, 2.0]);
    }

    #[test]
    fn test_analysis_shape_checks() {
        let env = SpectralMatrix::filled(2, 5, 1.0);
        let ap = SpectralMatrix::filled(3, 5, 0.5);
        assert!(SpectralAnalysis::new(env.clone(), ap, 8).is_err());

        let ap = SpectralMatrix::filled(2, 5, 0.5);
        assert!(SpectralAnalysis::new(env.clone(), ap.clone(), 16).is_err());
        assert!(SpectralAnalysis::new(env, ap, 8).is_ok());
    }
}

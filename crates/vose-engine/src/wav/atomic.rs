//! Crash-safe file output.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::result::WavResult;
use crate::error::{EngineError, EngineResult};

/// Encodes `samples` and writes them to `path` atomically.
///
/// The file is written to a temporary sibling in the destination directory
/// and renamed into place only after a successful flush, so a failed write
/// never leaves a truncated file at `path`. Every failure maps to
/// [`EngineError::RenderIo`].
pub fn write_wav_atomic(
    path: impl AsRef<Path>,
    samples: &[f64],
    sample_rate: u32,
) -> EngineResult<WavResult> {
    let path = path.as_ref();
    let result = WavResult::from_mono(samples, sample_rate);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| EngineError::render_io(path, e))?;
    tmp.write_all(&result.wav_data)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| EngineError::render_io(path, e))?;
    tmp.persist(path)
        .map_err(|e| EngineError::render_io(path, e.error))?;

    log::debug!(
        "wrote {} samples to {} (pcm {})",
        result.num_samples,
        path.display(),
        &result.pcm_hash[..16]
    );
    Ok(result)
}

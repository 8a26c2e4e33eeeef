//! Sample store: decoded source recordings keyed by source reference.
//!
//! Every waveform is normalized to f64 in [-1, 1] at the engine sample rate
//! when it enters the store, so the analyzer never sees file formats.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::{EngineError, EngineResult};

/// Decoded mono PCM at a fixed sample rate. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl Waveform {
    /// Wraps already-normalized samples.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// The samples, normalized to [-1, 1].
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Returns true if the waveform holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Linearly resamples `samples` from `from_rate` to `to_rate`.
pub fn resample_linear(samples: &[f64], from_rate: u32, to_rate: u32) -> Vec<f64> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = ((samples.len() as f64) / ratio).round().max(1.0) as usize;
    let last = samples.len() - 1;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * ratio;
            let idx = (pos.floor() as usize).min(last);
            let next = (idx + 1).min(last);
            let frac = pos - idx as f64;
            samples[idx] * (1.0 - frac) + samples[next] * frac
        })
        .collect()
}

/// Owns every decoded source waveform for one engine session.
///
/// Mutation goes through `&mut self`; a store shared across threads must be
/// wrapped in a lock by its owner.
#[derive(Debug, Clone)]
pub struct SampleStore {
    sample_rate: u32,
    sources: HashMap<String, Arc<Waveform>>,
}

impl Default for SampleStore {
    fn default() -> Self {
        Self::new(vose_spec::DEFAULT_SAMPLE_RATE)
    }
}

impl SampleStore {
    /// Creates an empty store that normalizes everything to `sample_rate`.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            sources: HashMap::new(),
        }
    }

    /// Sample rate every stored waveform is converted to.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Decodes a WAV file and registers it under `source_ref`.
    ///
    /// Integer PCM of any depth is divided by `2^(bits-1)`, float data passes
    /// through, and only the first channel of multichannel files is kept.
    ///
    /// # Errors
    /// `SourceNotFound` when the file is missing or empty; `Wav` when it
    /// cannot be decoded.
    pub fn load_wav(
        &mut self,
        source_ref: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> EngineResult<Arc<Waveform>> {
        let source_ref = source_ref.into();
        let path = path.as_ref();

        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > 0 => {}
            _ => return Err(EngineError::source_not_found(source_ref)),
        }

        let reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let channels = spec.channels.max(1) as usize;

        let interleaved: Vec<f64> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f64;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f64 / scale))
                    .collect::<Result<_, _>>()?
            }
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .map(|s| s.map(f64::from))
                .collect::<Result<_, _>>()?,
        };

        let mono: Vec<f64> = interleaved.into_iter().step_by(channels).collect();
        log::debug!(
            "loaded '{}' from {} ({} samples at {} Hz)",
            source_ref,
            path.display(),
            mono.len(),
            spec.sample_rate
        );
        self.preload(source_ref, mono, spec.sample_rate)
    }

    /// Registers already-decoded float samples under `source_ref`.
    ///
    /// Samples at a different rate are resampled to the store rate. An
    /// existing entry with the same key is replaced.
    pub fn preload(
        &mut self,
        source_ref: impl Into<String>,
        samples: Vec<f64>,
        sample_rate: u32,
    ) -> EngineResult<Arc<Waveform>> {
        let source_ref = source_ref.into();
        if source_ref.is_empty() {
            return Err(EngineError::invalid_param("source_ref", "must not be empty"));
        }
        if sample_rate == 0 {
            return Err(EngineError::invalid_param("sample_rate", "must be positive"));
        }

        let samples = if sample_rate == self.sample_rate {
            samples
        } else {
            resample_linear(&samples, sample_rate, self.sample_rate)
        };

        let waveform = Arc::new(Waveform::new(samples, self.sample_rate));
        self.sources.insert(source_ref, Arc::clone(&waveform));
        Ok(waveform)
    }

    /// Registers 16-bit PCM samples, scaled by 1/32768.
    pub fn preload_pcm16(
        &mut self,
        source_ref: impl Into<String>,
        samples: &[i16],
        sample_rate: u32,
    ) -> EngineResult<Arc<Waveform>> {
        let normalized = samples.iter().map(|&s| s as f64 / 32768.0).collect();
        self.preload(source_ref, normalized, sample_rate)
    }

    /// Looks up a source. Absent means the note renders as silence.
    pub fn get(&self, source_ref: &str) -> Option<Arc<Waveform>> {
        self.sources.get(source_ref).cloned()
    }

    /// Returns true if `source_ref` is registered.
    pub fn contains(&self, source_ref: &str) -> bool {
        self.sources.contains_key(source_ref)
    }

    /// Removes a source, returning it if present.
    pub fn remove(&mut self, source_ref: &str) -> Option<Arc<Waveform>> {
        self.sources.remove(source_ref)
    }

    /// Removes every source.
    pub fn clear(&mut self) {
        self.sources.clear();
    }

    /// Number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if no sources are registered.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Registered source references, sorted.
    pub fn source_refs(&self) -> Vec<&str> {
        let mut refs: Vec<&str> = self.sources.keys().map(String::as_str).collect();
        refs.sort_unstable();
        refs
    }
}

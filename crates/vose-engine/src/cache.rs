//! Analysis cache keyed by source reference.
//!
//! The key is the source reference alone: a second note on the same source
//! reuses the first note's analysis even if its frame count differs. The
//! orchestrator reports that case (W003) and conforms the frames.
//!
//! Entries are handed out as `Arc`s and never mutated, so `clear()` while a
//! render holds an entry only drops the cache's own reference.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::analysis::SpectralAnalyzer;
use crate::error::EngineResult;
use crate::spectrum::SpectralAnalysis;
use crate::store::Waveform;

/// Hit/miss counters since the cache was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that ran the analyzer.
    pub misses: u64,
    /// Entries currently held.
    pub entries: usize,
}

/// Result of a cache lookup.
#[derive(Debug, Clone)]
pub struct CacheLookup {
    /// The cached or freshly computed analysis.
    pub analysis: Arc<SpectralAnalysis>,
    /// Whether the analysis came from the cache.
    pub hit: bool,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Arc<SpectralAnalysis>>,
    hits: u64,
    misses: u64,
}

/// Memoizes analyzer output per source reference.
#[derive(Debug, Default)]
pub struct AnalysisCache {
    inner: Mutex<Inner>,
}

impl AnalysisCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    // a panic mid-analysis never leaves a half-written entry, so a poisoned
    // map is still consistent
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached analysis for `source_ref`, or runs `analyzer` and
    /// stores the result.
    ///
    /// The lock is held across the analysis, so concurrent requesters for
    /// the same uncached source wait for the first computation.
    ///
    /// # Errors
    /// Propagates analyzer errors; nothing is cached on failure.
    pub fn get_or_compute(
        &self,
        source_ref: &str,
        waveform: &Waveform,
        time_axis: &[f64],
        analyzer: &dyn SpectralAnalyzer,
    ) -> EngineResult<CacheLookup> {
        let mut inner = self.lock();

        if let Some(analysis) = inner.entries.get(source_ref).cloned() {
            inner.hits += 1;
            log::debug!("analysis cache hit for '{}'", source_ref);
            return Ok(CacheLookup {
                analysis,
                hit: true,
            });
        }

        inner.misses += 1;
        log::debug!(
            "analysis cache miss for '{}', analyzing {} frames",
            source_ref,
            time_axis.len()
        );
        let analysis = Arc::new(analyzer.analyze(waveform, time_axis)?);
        inner
            .entries
            .insert(source_ref.to_string(), Arc::clone(&analysis));

        Ok(CacheLookup {
            analysis,
            hit: false,
        })
    }

    /// Returns the cached analysis for `source_ref` without computing.
    pub fn get(&self, source_ref: &str) -> Option<Arc<SpectralAnalysis>> {
        self.lock().entries.get(source_ref).cloned()
    }

    /// Drops the entry for one source. Returns true if it existed.
    pub fn invalidate(&self, source_ref: &str) -> bool {
        self.lock().entries.remove(source_ref).is_some()
    }

    /// Drops every entry. Counters are kept.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Number of cached sources.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Current counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            entries: inner.entries.len(),
        }
    }
}

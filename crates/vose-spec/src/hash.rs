//! Canonical hashing of render requests.
//!
//! Requests are hashed as `hex(BLAKE3(canonical_json))`. `serde_json` maps are
//! key-sorted, so serializing through `serde_json::Value` gives a stable
//! byte sequence for equal requests.

use crate::config::EngineConfig;
use crate::error::SpecError;
use crate::note::NoteRenderRequest;

/// Computes the canonical BLAKE3 hash of an ordered note list.
///
/// # Arguments
/// * `notes` - The notes to hash, in render order
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
///
/// # Example
/// ```
/// use vose_spec::NoteRenderRequest;
/// use vose_spec::hash::canonical_request_hash;
///
/// let notes = vec![NoteRenderRequest::builder("a").constant_pitch(220.0, 4).build()];
/// let hash = canonical_request_hash(&notes).unwrap();
/// assert_eq!(hash.len(), 64);
/// ```
pub fn canonical_request_hash(notes: &[NoteRenderRequest]) -> Result<String, SpecError> {
    let value = serde_json::to_value(notes)?;
    canonical_value_hash(&value)
}

/// Computes the canonical BLAKE3 hash of an engine config.
pub fn canonical_config_hash(config: &EngineConfig) -> Result<String, SpecError> {
    let value = serde_json::to_value(config)?;
    canonical_value_hash(&value)
}

/// Computes the canonical BLAKE3 hash of a JSON value.
pub fn canonical_value_hash(value: &serde_json::Value) -> Result<String, SpecError> {
    let canonical = serde_json::to_string(value)?;
    Ok(blake3_hash(canonical.as_bytes()))
}

/// Computes a BLAKE3 hash of arbitrary data.
///
/// # Returns
/// * A 64-character lowercase hexadecimal string
pub fn blake3_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

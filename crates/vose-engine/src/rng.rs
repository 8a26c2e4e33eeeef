//! Deterministic RNG for aperiodic excitation.
//!
//! Every noise sample the synthesizer draws comes from a PCG32 stream seeded
//! from `(config.seed, note_index)` through BLAKE3, so renders are
//! byte-reproducible and notes never share a stream.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The seed is mirrored into both halves of the 64-bit PCG state.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Derives the noise seed for one note.
///
/// # Arguments
/// * `base_seed` - The config's base seed
/// * `note_index` - Position of the note in the request
pub fn derive_note_seed(base_seed: u32, note_index: usize) -> u32 {
    let mut input = Vec::with_capacity(12);
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(&(note_index as u64).to_le_bytes());

    let hash = blake3::hash(&input);
    let bytes = hash.as_bytes();
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Creates the noise RNG for one note.
pub fn create_note_rng(base_seed: u32, note_index: usize) -> Pcg32 {
    create_rng(derive_note_seed(base_seed, note_index))
}

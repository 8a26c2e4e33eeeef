//! Tests for the WAV output module.

use super::*;

// =========================================================================
// Format
// =========================================================================

#[test]
fn test_mono_format_rates() {
    let format = WavFormat::mono(44100);
    assert_eq!(format.channels, 1);
    assert_eq!(format.bits_per_sample, 16);
    assert_eq!(format.block_align(), 2);
    assert_eq!(format.byte_rate(), 88200);
}

// =========================================================================
// PCM conversion
// =========================================================================

#[test]
fn test_samples_to_pcm16_scaling() {
    let pcm = samples_to_pcm16(&[0.0, 0.5, -0.5, 1.0, -1.0]);
    let values: Vec<i16> = pcm
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect();
    assert_eq!(values, vec![0, 16384, -16384, 32767, -32767]);
}

#[test]
fn test_samples_to_pcm16_clips() {
    let pcm = samples_to_pcm16(&[3.0, -3.0, f64::MAX]);
    assert_eq!(i16::from_le_bytes([pcm[0], pcm[1]]), 32767);
    assert_eq!(i16::from_le_bytes([pcm[2], pcm[3]]), -32767);
    assert_eq!(i16::from_le_bytes([pcm[4], pcm[5]]), 32767);
}

// =========================================================================
// Header
// =========================================================================

#[test]
fn test_header_layout() {
    let pcm = samples_to_pcm16(&[0.0; 100]);
    let wav = write_wav_to_vec(&WavFormat::mono(44100), &pcm);

    assert_eq!(wav.len(), 244);
    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(u32::from_le_bytes([wav[4], wav[5], wav[6], wav[7]]), 236);
    assert_eq!(&wav[8..12], b"WAVE");
    assert_eq!(&wav[12..16], b"fmt ");
    assert_eq!(u16::from_le_bytes([wav[22], wav[23]]), 1);
    assert_eq!(u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]), 44100);
    assert_eq!(u16::from_le_bytes([wav[34], wav[35]]), 16);
    assert_eq!(&wav[36..40], b"data");
    assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 200);
}

#[test]
fn test_streaming_writer_matches_vec_writer() {
    let pcm = samples_to_pcm16(&[0.1, -0.2, 0.3]);
    let format = WavFormat::mono(44100);
    let mut streamed = Vec::new();
    write_wav(&mut streamed, &format, &pcm).unwrap();
    assert_eq!(streamed, write_wav_to_vec(&format, &pcm));
}

// =========================================================================
// Hashing
// =========================================================================

#[test]
fn test_pcm_hash_matches_extracted_payload() {
    let result = WavResult::from_mono(&[0.5, -0.5, 0.3, -0.3, 0.0], 44100);
    assert_eq!(result.pcm_hash.len(), 64);
    assert_eq!(compute_pcm_hash(&result.wav_data), Some(result.pcm_hash.clone()));
    assert_eq!(extract_pcm_data(&result.wav_data).map(|d| d.len()), Some(10));
}

#[test]
fn test_pcm_hash_tracks_content() {
    let a = WavResult::from_mono(&[0.5, -0.5, 0.3], 44100);
    let b = WavResult::from_mono(&[0.5, -0.5, 0.31], 44100);
    assert_ne!(a.pcm_hash, b.pcm_hash);
}

#[test]
fn test_extract_rejects_garbage() {
    assert!(extract_pcm_data(b"not a wav file at all").is_none());
    assert!(extract_pcm_data(&[]).is_none());
}

#[test]
fn test_duration_seconds() {
    let result = WavResult::from_mono(&[0.0; 22050], 44100);
    assert!((result.duration_seconds() - 0.5).abs() < 1e-12);
}

// =========================================================================
// Atomic file write
// =========================================================================

#[test]
fn test_write_wav_atomic_creates_readable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.wav");
    let samples: Vec<f64> = (0..441).map(|i| (i as f64 * 0.05).sin() * 0.5).collect();

    let result = write_wav_atomic(&path, &samples, 44100).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes, result.wav_data);

    let reader = hound::WavReader::open(&path).unwrap();
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.spec().bits_per_sample, 16);
    assert_eq!(reader.len(), 441);

    // only the destination remains, no temp siblings
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_write_wav_atomic_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.wav");
    let err = write_wav_atomic(&path, &[0.0; 4], 44100).unwrap_err();
    assert!(matches!(err, crate::error::EngineError::RenderIo { .. }));
    assert!(!path.exists());
}

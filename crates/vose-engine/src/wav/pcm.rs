//! PCM payload extraction and hashing.

/// Returns the `data` chunk of a WAV file, or None if the bytes are not RIFF/WAVE.
pub fn extract_pcm_data(wav_data: &[u8]) -> Option<&[u8]> {
    if wav_data.len() < 12 || &wav_data[0..4] != b"RIFF" || &wav_data[8..12] != b"WAVE" {
        return None;
    }

    let mut pos = 12;
    while pos + 8 <= wav_data.len() {
        let id = &wav_data[pos..pos + 4];
        let size = u32::from_le_bytes([
            wav_data[pos + 4],
            wav_data[pos + 5],
            wav_data[pos + 6],
            wav_data[pos + 7],
        ]) as usize;
        let start = pos + 8;

        if id == b"data" {
            return wav_data.get(start..start.checked_add(size)?);
        }

        // chunks are word aligned
        pos = start + size + (size & 1);
    }

    None
}

/// BLAKE3 hash of a raw PCM payload.
pub fn pcm16_hash(pcm: &[u8]) -> String {
    blake3::hash(pcm).to_hex().to_string()
}

/// BLAKE3 hash of the PCM payload of a WAV file.
pub fn compute_pcm_hash(wav_data: &[u8]) -> Option<String> {
    extract_pcm_data(wav_data).map(pcm16_hash)
}

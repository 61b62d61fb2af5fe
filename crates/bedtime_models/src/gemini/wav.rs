//! RIFF/WAVE wrapping for raw PCM returned by speech models.

/// Sample rate assumed when the MIME type does not carry one.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// Whether a MIME type denotes raw linear PCM (`audio/L16`, `audio/pcm`).
pub fn is_raw_pcm(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case("audio/L16") || essence.eq_ignore_ascii_case("audio/pcm")
}

/// Sample rate from a `rate=` MIME parameter, e.g. `audio/L16;codec=pcm;rate=24000`.
pub fn sample_rate(mime: &str) -> u32 {
    mime.split(';')
        .skip(1)
        .filter_map(|param| param.trim().split_once('='))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("rate"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(DEFAULT_SAMPLE_RATE)
}

/// Prefix 16-bit mono little-endian PCM samples with a 44-byte WAV header.
pub fn wrap_pcm(pcm: &[u8], sample_rate: u32) -> Vec<u8> {
    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = sample_rate * u32::from(block_align);
    let data_len = pcm.len() as u32;

    let mut wav = Vec::with_capacity(44 + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&CHANNELS.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend_from_slice(pcm);
    wav
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_raw_pcm() {
        assert!(is_raw_pcm("audio/L16;codec=pcm;rate=24000"));
        assert!(is_raw_pcm("audio/pcm"));
        assert!(!is_raw_pcm("audio/wav"));
        assert!(!is_raw_pcm("audio/mpeg"));
    }

    #[test]
    fn reads_rate_parameter() {
        assert_eq!(sample_rate("audio/L16;codec=pcm;rate=16000"), 16_000);
        assert_eq!(sample_rate("audio/L16"), DEFAULT_SAMPLE_RATE);
        assert_eq!(sample_rate("audio/L16; rate=abc"), DEFAULT_SAMPLE_RATE);
    }

    #[test]
    fn header_describes_payload() {
        let pcm = vec![0u8; 480];
        let wav = wrap_pcm(&pcm, 24_000);

        assert_eq!(wav.len(), 44 + 480);
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes([wav[4], wav[5], wav[6], wav[7]]), 36 + 480);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]), 24_000);
        // byte rate = rate * channels * 2
        assert_eq!(u32::from_le_bytes([wav[28], wav[29], wav[30], wav[31]]), 48_000);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 480);
    }
}

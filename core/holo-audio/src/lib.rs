//! Audio pipeline (component C4): a linearly-interpolated downsampled
//! coarse track plus a 16-bit signed residual, sharing the golden
//! interleaver and chunk container with the image and binary pipelines.

mod decode;
mod encode;
mod error;
mod header;
mod ingest;
mod resample;

pub use decode::{decode, DecodedAudio};
pub use encode::{encode, DEFAULT_COARSE_FRAMES, DEFAULT_TARGET_KB};
pub use error::{AudioCodecError, Result};
pub use header::AudioHeader;
pub use ingest::narrow_24_to_16;

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(frames: u32, channels: u16, freq_hz: f64, sample_rate: u32) -> Vec<i16> {
        let mut out = Vec::with_capacity(frames as usize * channels as usize);
        for f in 0..frames {
            let t = f as f64 / sample_rate as f64;
            let v = (2.0 * std::f64::consts::PI * freq_hz * t).sin();
            let sample = (v * i16::MAX as f64 * 0.8).round() as i16;
            for _ in 0..channels {
                out.push(sample);
            }
        }
        out
    }

    #[test]
    fn full_set_roundtrip_is_exact() {
        let sample_rate = 48_000;
        let samples = sine(sample_rate, 2, 440.0, sample_rate);
        let chunks = encode(&samples, 2, sample_rate, 4, DEFAULT_COARSE_FRAMES).unwrap();
        let decoded = decode(chunks).unwrap();
        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.sample_rate, sample_rate);
        assert_eq!(decoded.samples, samples);
    }

    #[test]
    fn partial_subset_preserves_frame_count() {
        let sample_rate = 8_000;
        let samples = sine(sample_rate / 4, 1, 220.0, sample_rate);
        let mut chunks = encode(&samples, 1, sample_rate, 1, 256).unwrap();
        assert!(chunks.len() > 2);
        chunks.truncate(chunks.len() - 1);
        let decoded = decode(chunks).unwrap();
        assert_eq!(decoded.samples.len(), samples.len());
    }

    #[test]
    fn empty_chunk_set_is_no_chunks_error() {
        let err = decode(Vec::new()).unwrap_err();
        assert!(matches!(err, AudioCodecError::NoChunks));
    }
}

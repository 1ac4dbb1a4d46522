//! Binary pipeline (component C5): a raw byte-prefix coarse model plus the
//! permuted remainder of the input, sharing the golden interleaver and
//! chunk container with the image and audio pipelines.

mod decode;
mod encode;
mod error;
mod header;

pub use decode::decode;
pub use encode::{encode, DEFAULT_COARSE_BUDGET, DEFAULT_TARGET_KB};
pub use error::{BinaryCodecError, Result};
pub use header::BinaryHeader;

#[cfg(test)]
mod tests {
    use super::*;

    fn pseudo_random_bytes(len: usize, seed: u64) -> Vec<u8> {
        let mut state = seed ^ 0x9E3779B97F4A7C15;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                (state & 0xFF) as u8
            })
            .collect()
    }

    #[test]
    fn full_set_roundtrip_is_byte_identical() {
        let data = pseudo_random_bytes(100 * 1024, 1);
        let chunks = encode(&data, 2, DEFAULT_COARSE_BUDGET).unwrap();
        let decoded = decode(chunks).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn small_input_below_coarse_budget_roundtrips() {
        let data = pseudo_random_bytes(10, 2);
        let chunks = encode(&data, 2, DEFAULT_COARSE_BUDGET).unwrap();
        assert_eq!(chunks.len(), 1);
        let decoded = decode(chunks).unwrap();
        assert_eq!(decoded, data);
    }

    #[test]
    fn partial_subset_has_correct_length() {
        let data = pseudo_random_bytes(64 * 1024, 3);
        let mut chunks = encode(&data, 2, DEFAULT_COARSE_BUDGET).unwrap();
        assert!(chunks.len() > 2);
        chunks.truncate(chunks.len() - 1);
        let decoded = decode(chunks).unwrap();
        assert_eq!(decoded.len(), data.len());
    }

    #[test]
    fn empty_chunk_set_is_no_chunks_error() {
        let err = decode(Vec::new()).unwrap_err();
        assert!(matches!(err, BinaryCodecError::NoChunks));
    }
}

use crate::error::{BinaryCodecError, Result};
use crate::header::BinaryHeader;
use holo_container::{inflate, Chunk, Mode};
use holo_interleave::Interleaver;
use std::collections::HashMap;

#[derive(Hash, Eq, PartialEq, Clone, Copy)]
struct ConsistencyKey {
    total_len: u64,
    coarse_len: u32,
    block_count: u32,
    n_total: u64,
}

/// Reassembles the original byte sequence from any non-empty subset of its
/// chunks. There is no perceptual degradation for missing chunks — gaps are
/// zero-filled — but the output is always the correct length, per spec.md §4.5.
pub fn decode(chunks: Vec<Chunk>) -> Result<Vec<u8>> {
    let mut groups: HashMap<ConsistencyKey, Vec<Chunk>> = HashMap::new();
    for chunk in chunks {
        if chunk.mode != Mode::Binary {
            continue;
        }
        let header = match BinaryHeader::from_bytes(&chunk.mode_header) {
            Ok(h) => h,
            Err(_) => {
                log::warn!("dropping binary chunk {} with malformed header", chunk.block_index);
                continue;
            }
        };
        let key = ConsistencyKey {
            total_len: header.total_len,
            coarse_len: header.coarse_len,
            block_count: chunk.block_count,
            n_total: chunk.n_total,
        };
        groups.entry(key).or_default().push(chunk);
    }

    let (key, mut survivors) = groups
        .into_iter()
        .max_by_key(|(_, v)| v.len())
        .ok_or(BinaryCodecError::NoChunks)?;

    survivors.sort_by_key(|c| c.block_index);
    survivors.dedup_by_key(|c| c.block_index);

    let first = &survivors[0];
    let prefix = inflate(&first.coarse)?;

    let n = key.n_total;
    let mut r_flat = vec![0u8; n as usize];

    if n < 2 {
        if let Some(chunk) = survivors.first() {
            let raw = inflate(&chunk.slice)?;
            r_flat[..raw.len().min(r_flat.len())]
                .copy_from_slice(&raw[..raw.len().min(r_flat.len())]);
        }
    } else {
        let interleaver = Interleaver::new(n)?;
        for chunk in &survivors {
            let indices =
                interleaver.block_indices(chunk.block_index as u64, key.block_count as u64)?;
            let raw = match inflate(&chunk.slice) {
                Ok(raw) => raw,
                Err(_) => {
                    log::warn!("dropping binary chunk {} with bad deflate stream", chunk.block_index);
                    continue;
                }
            };
            if raw.len() != indices.len() {
                log::warn!(
                    "dropping binary chunk {} with mismatched slice length",
                    chunk.block_index
                );
                continue;
            }
            for (k, &idx) in indices.iter().enumerate() {
                r_flat[idx as usize] = raw[k];
            }
        }
    }

    let mut out = Vec::with_capacity(prefix.len() + r_flat.len());
    out.extend_from_slice(&prefix);
    out.extend_from_slice(&r_flat);
    Ok(out)
}

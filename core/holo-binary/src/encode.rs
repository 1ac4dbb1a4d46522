use crate::error::Result;
use crate::header::BinaryHeader;
use holo_container::{deflate, Chunk, Mode, SUPPORTED_VERSION};
use holo_interleave::Interleaver;

pub const DEFAULT_COARSE_BUDGET: usize = 4096;
pub const DEFAULT_TARGET_KB: u32 = 32;

/// Splits `data` into `B` chunks: the leading `P` bytes as coarse, the
/// remainder permuted across chunks, per spec.md §4.5.
pub fn encode(data: &[u8], target_kb: u32, coarse_budget: usize) -> Result<Vec<Chunk>> {
    let total_len = data.len() as u64;
    let p = coarse_budget.min(data.len());
    let coarse = deflate(&data[..p])?;
    let n = total_len - p as u64;

    let header = BinaryHeader {
        total_len,
        coarse_len: p as u32,
    };
    let header_bytes = header.to_bytes()?;
    let residual = &data[p..];

    // Fewer than two residual bytes admit no permutation; a single chunk
    // carries the (possibly empty) remainder verbatim.
    if n < 2 {
        let slice = deflate(residual)?;
        return Ok(vec![Chunk {
            mode: Mode::Binary,
            version: SUPPORTED_VERSION,
            mode_header: header_bytes,
            coarse,
            slice,
            block_index: 0,
            block_count: 1,
            n_total: n,
        }]);
    }

    let block_count = choose_block_count(n, target_kb);
    let interleaver = Interleaver::new(n)?;
    let mut chunks = Vec::with_capacity(block_count as usize);
    for b in 0..block_count {
        let indices = interleaver.block_indices(b, block_count)?;
        let slice_bytes: Vec<u8> = indices.iter().map(|&idx| residual[idx as usize]).collect();
        let slice = deflate(&slice_bytes)?;
        chunks.push(Chunk {
            mode: Mode::Binary,
            version: SUPPORTED_VERSION,
            mode_header: header_bytes.clone(),
            coarse: coarse.clone(),
            slice,
            block_index: b as u32,
            block_count: block_count as u32,
            n_total: n,
        });
    }
    log::info!("encoded {total_len} bytes (P={p}) into {block_count} chunks (N={n})");
    Ok(chunks)
}

fn choose_block_count(n: u64, target_kb: u32) -> u64 {
    let target_bytes = (target_kb.max(1) as u64) * 1024;
    let raw = (n as f64 / target_bytes as f64).round() as u64;
    raw.max(4).min(n.max(1))
}

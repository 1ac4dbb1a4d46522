use crate::header::AudioHeader;
use crate::resample::{interpolate_channel, sample_positions};
use crate::error::Result;
use holo_container::{deflate, Chunk, Mode, SUPPORTED_VERSION};
use holo_interleave::Interleaver;

pub const DEFAULT_COARSE_FRAMES: u32 = 2048;
pub const DEFAULT_TARGET_KB: u32 = 32;

/// `samples` is frame-major interleaved PCM (`frame*channels + ch`), already
/// narrowed to 16-bit (spec.md's 24-bit ingest narrowing happens before this
/// call, at the CLI/ingest boundary).
pub fn encode(
    samples: &[i16],
    channels: u16,
    sample_rate: u32,
    target_kb: u32,
    coarse_frames: u32,
) -> Result<Vec<Chunk>> {
    let frames = (samples.len() / channels as usize) as u32;
    let t = coarse_frames.min(frames).max(1);
    let positions = sample_positions(frames, t);

    // extract the coarse track: T frames, each `channels` samples, in
    // frame-major order, identical across every chunk.
    let mut coarse_track = Vec::with_capacity(positions.len() * channels as usize);
    for &p in &positions {
        let base = p as usize * channels as usize;
        coarse_track.extend_from_slice(&samples[base..base + channels as usize]);
    }
    let coarse_le: Vec<u8> = coarse_track.iter().flat_map(|s| s.to_le_bytes()).collect();
    let coarse_payload = deflate(&coarse_le)?;

    // interpolate the coarse track back to F frames per channel to form coarse_up.
    let mut coarse_up = vec![0i16; frames as usize * channels as usize];
    for ch in 0..channels as usize {
        let anchors: Vec<i16> = (0..positions.len())
            .map(|k| coarse_track[k * channels as usize + ch])
            .collect();
        let up = interpolate_channel(&positions, &anchors, frames);
        for (f, &v) in up.iter().enumerate() {
            coarse_up[f * channels as usize + ch] = v;
        }
    }

    let n = frames as u64 * channels as u64;
    let mut residual = vec![0i16; n as usize];
    for i in 0..n as usize {
        let diff = samples[i] as i32 - coarse_up[i] as i32;
        residual[i] = diff.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
    }

    let estimated_residual_bytes = n * 2;
    let block_count = choose_block_count(estimated_residual_bytes, target_kb, n);

    let header = AudioHeader {
        frames,
        channels,
        sample_rate,
        coarse_frames: t,
    };
    let header_bytes = header.to_bytes()?;

    let interleaver = Interleaver::new(n)?;
    let mut chunks = Vec::with_capacity(block_count as usize);
    for b in 0..block_count {
        let indices = interleaver.block_indices(b, block_count)?;
        let mut slice_bytes = Vec::with_capacity(indices.len() * 2);
        for &idx in &indices {
            slice_bytes.extend_from_slice(&residual[idx as usize].to_le_bytes());
        }
        let slice = deflate(&slice_bytes)?;
        chunks.push(Chunk {
            mode: Mode::Audio,
            version: SUPPORTED_VERSION,
            mode_header: header_bytes.clone(),
            coarse: coarse_payload.clone(),
            slice,
            block_index: b as u32,
            block_count: block_count as u32,
            n_total: n,
        });
    }
    log::info!(
        "encoded {frames} frames x {channels}ch @ {sample_rate}Hz into {block_count} chunks (N={n})"
    );
    Ok(chunks)
}

fn choose_block_count(estimated_residual_bytes: u64, target_kb: u32, n: u64) -> u64 {
    let target_bytes = (target_kb.max(1) as u64) * 1024;
    let raw = (estimated_residual_bytes as f64 / target_bytes as f64).round() as u64;
    raw.max(4).min(n.max(1))
}

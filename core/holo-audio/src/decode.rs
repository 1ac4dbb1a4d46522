use crate::error::{AudioCodecError, Result};
use crate::header::AudioHeader;
use crate::resample::{interpolate_channel, sample_positions};
use holo_container::{inflate, Chunk, Mode};
use holo_interleave::Interleaver;
use std::collections::HashMap;

#[derive(Hash, Eq, PartialEq, Clone, Copy)]
struct ConsistencyKey {
    frames: u32,
    channels: u16,
    sample_rate: u32,
    coarse_frames: u32,
    block_count: u32,
    n_total: u64,
}

pub struct DecodedAudio {
    pub samples: Vec<i16>,
    pub channels: u16,
    pub sample_rate: u32,
}

/// Reassembles a waveform from any non-empty subset of its chunks, per
/// spec.md §4.4.
pub fn decode(chunks: Vec<Chunk>) -> Result<DecodedAudio> {
    let mut groups: HashMap<ConsistencyKey, Vec<Chunk>> = HashMap::new();
    for chunk in chunks {
        if chunk.mode != Mode::Audio {
            continue;
        }
        let header = match AudioHeader::from_bytes(&chunk.mode_header) {
            Ok(h) => h,
            Err(_) => {
                log::warn!("dropping audio chunk {} with malformed header", chunk.block_index);
                continue;
            }
        };
        let key = ConsistencyKey {
            frames: header.frames,
            channels: header.channels,
            sample_rate: header.sample_rate,
            coarse_frames: header.coarse_frames,
            block_count: chunk.block_count,
            n_total: chunk.n_total,
        };
        groups.entry(key).or_default().push(chunk);
    }

    let (key, mut survivors) = groups
        .into_iter()
        .max_by_key(|(_, v)| v.len())
        .ok_or(AudioCodecError::NoChunks)?;

    survivors.sort_by_key(|c| c.block_index);
    survivors.dedup_by_key(|c| c.block_index);

    let first = &survivors[0];
    let coarse_le = inflate(&first.coarse)?;
    let coarse_track: Vec<i16> = coarse_le
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]))
        .collect();

    let positions = sample_positions(key.frames, key.coarse_frames);
    let mut coarse_up = vec![0i16; key.frames as usize * key.channels as usize];
    for ch in 0..key.channels as usize {
        let anchors: Vec<i16> = (0..positions.len())
            .map(|k| coarse_track[k * key.channels as usize + ch])
            .collect();
        let up = interpolate_channel(&positions, &anchors, key.frames);
        for (f, &v) in up.iter().enumerate() {
            coarse_up[f * key.channels as usize + ch] = v;
        }
    }

    let n = key.n_total;
    let mut r_flat = vec![0i16; n as usize];
    let interleaver = Interleaver::new(n)?;

    for chunk in &survivors {
        let indices =
            interleaver.block_indices(chunk.block_index as u64, key.block_count as u64)?;
        let raw = match inflate(&chunk.slice) {
            Ok(raw) => raw,
            Err(_) => {
                log::warn!("dropping audio chunk {} with bad deflate stream", chunk.block_index);
                continue;
            }
        };
        if raw.len() != indices.len() * 2 {
            log::warn!(
                "dropping audio chunk {} with mismatched slice length",
                chunk.block_index
            );
            continue;
        }
        for (k, &idx) in indices.iter().enumerate() {
            r_flat[idx as usize] = i16::from_le_bytes([raw[k * 2], raw[k * 2 + 1]]);
        }
    }

    let mut samples = vec![0i16; n as usize];
    for i in 0..n as usize {
        let v = coarse_up[i] as i32 + r_flat[i] as i32;
        samples[i] = v.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
    }

    Ok(DecodedAudio {
        samples,
        channels: key.channels,
        sample_rate: key.sample_rate,
    })
}

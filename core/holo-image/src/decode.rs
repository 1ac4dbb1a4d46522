use crate::error::{ImageCodecError, Result};
use crate::header::ImageHeader;
use holo_container::{inflate, Chunk, Mode};
use holo_interleave::Interleaver;
use image::{imageops::FilterType, RgbImage};
use std::collections::HashMap;

#[derive(Hash, Eq, PartialEq, Clone, Copy)]
struct ConsistencyKey {
    width: u32,
    height: u32,
    channels: u8,
    thumb_side: u16,
    block_count: u32,
    n_total: u64,
}

/// Reassembles an image from any non-empty subset of its chunks, per
/// spec.md §4.3. Chunks whose header disagrees with the majority are
/// dropped (`InconsistentChunk`); an empty usable set is `NoChunks`.
pub fn decode(chunks: Vec<Chunk>) -> Result<RgbImage> {
    let mut groups: HashMap<ConsistencyKey, Vec<Chunk>> = HashMap::new();
    for chunk in chunks {
        if chunk.mode != Mode::Image {
            continue;
        }
        let header = match ImageHeader::from_bytes(&chunk.mode_header) {
            Ok(h) => h,
            Err(_) => {
                log::warn!("dropping image chunk {} with malformed header", chunk.block_index);
                continue;
            }
        };
        let key = ConsistencyKey {
            width: header.width,
            height: header.height,
            channels: header.channels,
            thumb_side: header.thumb_side,
            block_count: chunk.block_count,
            n_total: chunk.n_total,
        };
        groups.entry(key).or_default().push(chunk);
    }

    let (key, mut survivors) = groups
        .into_iter()
        .max_by_key(|(_, v)| v.len())
        .ok_or(ImageCodecError::NoChunks)?;

    survivors.sort_by_key(|c| c.block_index);
    survivors.dedup_by_key(|c| c.block_index);

    let total_groups_dropped = survivors.len();
    log::debug!("decoding image from {total_groups_dropped} consistent chunk(s)");

    let first = &survivors[0];
    let thumbnail = image::load_from_memory(&first.coarse)
        .map_err(ImageCodecError::Image)?
        .into_rgb8();
    let coarse_up =
        image::imageops::resize(&thumbnail, key.width, key.height, FilterType::CatmullRom);

    let n = key.n_total;
    let mut r_flat = vec![0i16; n as usize];
    let interleaver = Interleaver::new(n)?;

    for chunk in &survivors {
        let indices =
            interleaver.block_indices(chunk.block_index as u64, key.block_count as u64)?;
        let raw = match inflate(&chunk.slice) {
            Ok(raw) => raw,
            Err(_) => {
                log::warn!("dropping image chunk {} with bad deflate stream", chunk.block_index);
                continue;
            }
        };
        if raw.len() != indices.len() * 2 {
            log::warn!(
                "dropping image chunk {} with mismatched slice length",
                chunk.block_index
            );
            continue;
        }
        for (k, &idx) in indices.iter().enumerate() {
            r_flat[idx as usize] = i16::from_le_bytes([raw[k * 2], raw[k * 2 + 1]]);
        }
    }

    let mut out = RgbImage::new(key.width, key.height);
    for (i, (coarse_px, out_px)) in coarse_up.pixels().zip(out.pixels_mut()).enumerate() {
        for c in 0..3 {
            let v = coarse_px[c] as i32 + r_flat[i * 3 + c] as i32;
            out_px[c] = v.clamp(0, 255) as u8;
        }
    }

    Ok(out)
}

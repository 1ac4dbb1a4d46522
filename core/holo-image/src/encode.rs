use crate::error::{ImageCodecError, Result};
use crate::header::ImageHeader;
use holo_container::{deflate, Chunk, Mode, SUPPORTED_VERSION};
use holo_interleave::Interleaver;
use image::{imageops::FilterType, RgbImage};
use std::io::Cursor;

pub const DEFAULT_THUMB_SIDE: u16 = 64;
pub const DEFAULT_TARGET_KB: u32 = 32;

/// Builds the `B` self-similar image chunks for `image`, per spec.md §4.3.
pub fn encode(image: &RgbImage, target_kb: u32, thumb_side: u16) -> Result<Vec<Chunk>> {
    let (width, height) = image.dimensions();
    let t = thumb_side.min(width.min(height) as u16).max(1);

    let thumbnail = image::imageops::resize(image, t as u32, t as u32, FilterType::CatmullRom);
    let coarse_up = image::imageops::resize(&thumbnail, width, height, FilterType::CatmullRom);

    let mut thumb_png = Vec::new();
    thumbnail
        .write_to(&mut Cursor::new(&mut thumb_png), image::ImageFormat::Png)
        .map_err(ImageCodecError::Image)?;

    let n = width as u64 * height as u64 * 3;
    let mut residual = vec![0i16; n as usize];
    for (i, (orig_px, coarse_px)) in image.pixels().zip(coarse_up.pixels()).enumerate() {
        for c in 0..3 {
            let diff = orig_px[c] as i32 - coarse_px[c] as i32;
            residual[i * 3 + c] = diff as i16;
        }
    }

    let estimated_residual_bytes = n * 2;
    let block_count = choose_block_count(estimated_residual_bytes, target_kb, n);

    let header = ImageHeader {
        width,
        height,
        channels: 3,
        thumb_side: t,
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
            mode: Mode::Image,
            version: SUPPORTED_VERSION,
            mode_header: header_bytes.clone(),
            coarse: thumb_png.clone(),
            slice,
            block_index: b as u32,
            block_count: block_count as u32,
            n_total: n,
        });
    }
    log::info!(
        "encoded {width}x{height} image into {block_count} chunks (N={n}, thumb={t})"
    );
    Ok(chunks)
}

/// `B = clamp(round(estimated_bytes / target_bytes), 4, N)`.
fn choose_block_count(estimated_residual_bytes: u64, target_kb: u32, n: u64) -> u64 {
    let target_bytes = (target_kb.max(1) as u64) * 1024;
    let raw = (estimated_residual_bytes as f64 / target_bytes as f64).round() as u64;
    raw.max(4).min(n.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_count_is_clamped() {
        assert_eq!(choose_block_count(100, 1024 * 1024, 1000), 4);
        assert_eq!(choose_block_count(1_000_000, 1, 10), 10);
    }
}

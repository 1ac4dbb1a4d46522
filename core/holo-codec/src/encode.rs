use crate::error::{CodecError, Result};
use holo_container::{Chunk, Mode};
use std::path::Path;

/// Tunables for a single encode pass, each defaulted the way spec.md names
/// them (§3–§4).
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    pub target_kb: u32,
    pub thumb_side: u16,
    pub coarse_frames: u32,
    pub coarse_budget: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            target_kb: holo_image::DEFAULT_TARGET_KB,
            thumb_side: holo_image::DEFAULT_THUMB_SIDE,
            coarse_frames: holo_audio::DEFAULT_COARSE_FRAMES,
            coarse_budget: holo_binary::DEFAULT_COARSE_BUDGET,
        }
    }
}

/// Detects the mode from `path`'s extension, ingests the object, and
/// produces its `B` chunks (component C6 encode path).
pub fn encode_file(path: &Path, options: &EncodeOptions) -> Result<(Mode, Vec<Chunk>)> {
    let mode = crate::dispatch::mode_from_path(path);
    let chunks = match mode {
        Mode::Image => {
            let image = image::open(path)?.into_rgb8();
            holo_image::encode(&image, options.target_kb, options.thumb_side)?
        }
        Mode::Audio => {
            let (samples, channels, sample_rate) = read_wav(path)?;
            holo_audio::encode(
                &samples,
                channels,
                sample_rate,
                options.target_kb,
                options.coarse_frames,
            )?
        }
        Mode::Binary => {
            let data = std::fs::read(path)?;
            holo_binary::encode(&data, options.target_kb, options.coarse_budget)?
        }
    };
    log::info!("dispatched {path:?} to {mode} mode, {} chunks", chunks.len());
    Ok((mode, chunks))
}

fn read_wav(path: &Path) -> Result<(Vec<i16>, u16, u32)> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let channels = spec.channels;
    let sample_rate = spec.sample_rate;

    let samples: std::result::Result<Vec<i16>, _> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => reader.samples::<i16>().collect(),
        (hound::SampleFormat::Int, 24) => reader
            .samples::<i32>()
            .map(|s| s.map(holo_audio::narrow_24_to_16))
            .collect(),
        _ => return Err(CodecError::UnsupportedInput),
    };
    Ok((samples?, channels, sample_rate))
}

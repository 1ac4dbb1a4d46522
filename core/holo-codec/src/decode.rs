use crate::error::{CodecError, Result};
use holo_audio::DecodedAudio;
use holo_container::{Chunk, Mode};
use image::RgbImage;
use std::path::Path;

pub enum DecodedObject {
    Image(RgbImage),
    Audio(DecodedAudio),
    Binary(Vec<u8>),
}

/// Scans `dir`, rejects directories mixing chunk magics, and routes the
/// survivors to the matching pipeline's decoder (component C6 decode path).
pub fn decode_dir(dir: &Path) -> Result<DecodedObject> {
    let chunks = crate::dir_io::read_chunks(dir)?;
    decode_chunks(chunks)
}

pub fn decode_chunks(chunks: Vec<Chunk>) -> Result<DecodedObject> {
    if chunks.is_empty() {
        return Err(CodecError::NoChunks);
    }

    let mode = chunks[0].mode;
    if chunks.iter().any(|c| c.mode != mode) {
        return Err(CodecError::MixedModes);
    }

    log::debug!("decoding {} chunk(s) in {mode} mode", chunks.len());
    match mode {
        Mode::Image => Ok(DecodedObject::Image(holo_image::decode(chunks)?)),
        Mode::Audio => Ok(DecodedObject::Audio(holo_audio::decode(chunks)?)),
        Mode::Binary => Ok(DecodedObject::Binary(holo_binary::decode(chunks)?)),
    }
}

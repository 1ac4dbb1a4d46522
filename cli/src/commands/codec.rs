use anyhow::{Context, Result};
use clap::Args;
use holo_codec::{decode_dir, encode_file, write_chunks, DecodedObject, EncodeOptions};
use std::path::Path;
use std::path::PathBuf;

/// `<tool> <path> [chunk_kb]`: encodes a file, or decodes a `.holo` directory.
#[derive(Args)]
pub struct CodecArgs {
    /// File to encode, or a `.holo` directory to decode.
    pub path: PathBuf,
    /// Target chunk size in KiB, only meaningful when encoding.
    pub chunk_kb: Option<u32>,
}

pub fn handle(args: CodecArgs) -> Result<()> {
    if args.path.is_dir() {
        decode(&args.path)
    } else {
        encode(&args.path, args.chunk_kb)
    }
}

fn encode(path: &Path, chunk_kb: Option<u32>) -> Result<()> {
    let mut options = EncodeOptions::default();
    if let Some(kb) = chunk_kb {
        options.target_kb = kb;
    }
    let (mode, chunks) = encode_file(path, &options).with_context(|| format!("encoding {path:?}"))?;
    let stem = path
        .file_stem()
        .context("path has no file stem")?
        .to_string_lossy();
    let dir = path.with_file_name(holo_container::holo_dir_name(&stem));
    write_chunks(&dir, &chunks)?;
    log::info!("encoded {path:?} as {mode} into {dir:?} ({} chunks)", chunks.len());
    Ok(())
}

fn decode(dir: &Path) -> Result<()> {
    let decoded = decode_dir(dir).with_context(|| format!("decoding {dir:?}"))?;
    let dir_name = dir
        .file_name()
        .context("directory has no name")?
        .to_string_lossy();
    let stem = holo_container::decoded_stem(&dir_name);
    let out_dir = dir.parent().unwrap_or_else(|| Path::new("."));

    let out_path = match decoded {
        DecodedObject::Image(image) => {
            let out = out_dir.join(format!("{stem}.png"));
            image.save(&out)?;
            out
        }
        DecodedObject::Audio(audio) => {
            let out = out_dir.join(format!("{stem}.wav"));
            let spec = hound::WavSpec {
                channels: audio.channels,
                sample_rate: audio.sample_rate,
                bits_per_sample: 16,
                sample_format: hound::SampleFormat::Int,
            };
            let mut writer = hound::WavWriter::create(&out, spec)?;
            for sample in audio.samples {
                writer.write_sample(sample)?;
            }
            writer.finalize()?;
            out
        }
        DecodedObject::Binary(bytes) => {
            let out = out_dir.join(&*stem);
            std::fs::write(&out, bytes)?;
            out
        }
    };
    log::info!("decoded {dir:?} -> {out_path:?}");
    Ok(())
}

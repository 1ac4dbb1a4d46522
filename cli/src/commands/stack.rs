use anyhow::{ensure, Context, Result};
use clap::Args;
use holo_codec::{encode_file, write_chunks, EncodeOptions};
use image::{ImageBuffer, Rgb, RgbImage};
use std::path::PathBuf;

/// `<tool> --stack <chunk_kb> <frame>…`: averages frames pixel-wise and
/// encodes the result.
#[derive(Args)]
pub struct StackArgs {
    pub chunk_kb: u32,
    #[arg(required = true, num_args = 1..)]
    pub frames: Vec<PathBuf>,
}

pub fn handle(args: StackArgs) -> Result<()> {
    let first = args.frames.first().context("at least one frame is required")?;
    let images: Vec<RgbImage> = args
        .frames
        .iter()
        .map(|p| -> Result<RgbImage> { Ok(image::open(p).with_context(|| format!("opening {p:?}"))?.into_rgb8()) })
        .collect::<Result<_>>()?;

    let (width, height) = images[0].dimensions();
    for (path, image) in args.frames.iter().zip(&images) {
        ensure!(
            image.dimensions() == (width, height),
            "{path:?} is {:?}, expected {:?} to match the first frame",
            image.dimensions(),
            (width, height)
        );
    }

    let mut stacked: RgbImage = ImageBuffer::new(width, height);
    let n = images.len() as f32;
    for y in 0..height {
        for x in 0..width {
            let mut sums = [0f32; 3];
            for image in &images {
                let pixel = image.get_pixel(x, y);
                for c in 0..3 {
                    sums[c] += pixel[c] as f32;
                }
            }
            let averaged = sums.map(|s| (s / n).round().clamp(0.0, 255.0) as u8);
            stacked.put_pixel(x, y, Rgb(averaged));
        }
    }

    let stem = first.file_stem().context("frame has no file stem")?.to_string_lossy();
    let stack_stem = format!("{stem}_stack");
    let stack_path = first.with_file_name(format!("{stack_stem}.png"));
    stacked.save(&stack_path)?;
    log::info!("stacked {} frames -> {stack_path:?}", images.len());

    let options = EncodeOptions {
        target_kb: args.chunk_kb,
        ..EncodeOptions::default()
    };
    let (mode, chunks) = encode_file(&stack_path, &options)?;
    let dir = stack_path.with_file_name(holo_container::holo_dir_name(&stack_stem));
    write_chunks(&dir, &chunks)?;
    log::info!("encoded {stack_path:?} as {mode} into {dir:?} ({} chunks)", chunks.len());
    Ok(())
}

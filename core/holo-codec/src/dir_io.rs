use crate::error::Result;
use holo_container::{chunk_file_name, Chunk};
use rayon::prelude::*;
use std::fs;
use std::path::Path;

/// Serializes and writes every chunk to its own file in `dir`, in parallel —
/// each chunk's container bytes are independent, so there is no shared
/// mutable state to synchronize (spec.md §5).
pub fn write_chunks(dir: &Path, chunks: &[Chunk]) -> Result<()> {
    fs::create_dir_all(dir)?;
    chunks
        .par_iter()
        .map(|chunk| -> Result<()> {
            let mut buf = Vec::new();
            holo_container::write(&mut buf, chunk)?;
            let path = dir.join(chunk_file_name(chunk.block_index, chunk.block_count));
            fs::write(path, buf)?;
            Ok(())
        })
        .collect::<Result<Vec<()>>>()?;
    Ok(())
}

/// Scans `dir` for chunk files, parsing each in parallel. Files with a bad
/// magic, unsupported version, or truncated container are skipped (per
/// spec.md §7's local-recovery policy); only I/O errors opening the
/// directory itself propagate.
pub fn read_chunks(dir: &Path) -> Result<Vec<Chunk>> {
    let paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();

    let chunks: Vec<Chunk> = paths
        .par_iter()
        .filter_map(|path| match fs::read(path) {
            Ok(bytes) => match holo_container::read(&mut std::io::Cursor::new(bytes)) {
                Ok(chunk) => Some(chunk),
                Err(err) => {
                    log::warn!("skipping chunk file {path:?}: {err}");
                    None
                }
            },
            Err(err) => {
                log::warn!("skipping unreadable file {path:?}: {err}");
                None
            }
        })
        .collect();

    Ok(chunks)
}

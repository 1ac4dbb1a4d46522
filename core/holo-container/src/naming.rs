/// `chunk_XXXX.holo`, width `max(4, ceil(log10(B)))`, per spec.md §6.
pub fn chunk_file_name(block_index: u32, block_count: u32) -> String {
    let width = digit_width(block_count).max(4);
    format!("chunk_{block_index:0width$}.holo", width = width)
}

fn digit_width(block_count: u32) -> usize {
    if block_count <= 1 {
        1
    } else {
        ((block_count - 1) as f64).log10().floor() as usize + 1
    }
}

/// `<name>.holo/` for an encode target directory.
pub fn holo_dir_name(object_name: &str) -> String {
    format!("{object_name}.holo")
}

/// The reconstructed object's file stem when decoding `<dir>`: strips a
/// `.holo` suffix, or appends `_dec` when the directory carries no such
/// suffix.
pub fn decoded_stem(dir_name: &str) -> String {
    match dir_name.strip_suffix(".holo") {
        Some(stem) => stem.to_string(),
        None => format!("{dir_name}_dec"),
    }
}

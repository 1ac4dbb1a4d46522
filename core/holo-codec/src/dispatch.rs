use holo_container::Mode;
use std::path::Path;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tif", "tiff"];
const AUDIO_EXTENSIONS: &[&str] = &["wav"];

/// Encode-side mode detection: extension-based, per spec.md §4.6. Anything
/// not recognized as image or audio is treated as opaque binary.
pub fn mode_from_path(path: &Path) -> Mode {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some(e) if IMAGE_EXTENSIONS.contains(&e) => Mode::Image,
        Some(e) if AUDIO_EXTENSIONS.contains(&e) => Mode::Audio,
        _ => Mode::Binary,
    }
}

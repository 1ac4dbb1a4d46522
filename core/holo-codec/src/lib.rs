//! Mode dispatcher (component C6): detects image/audio/binary by extension
//! on encode and by chunk magic on decode, and ties the three pipelines to
//! shared, parallel chunk-directory I/O.

mod decode;
mod dir_io;
mod dispatch;
mod encode;
mod error;

pub use decode::{decode_chunks, decode_dir, DecodedObject};
pub use dir_io::{read_chunks, write_chunks};
pub use dispatch::mode_from_path;
pub use encode::{encode_file, EncodeOptions};
pub use error::{CodecError, Result};
pub use holo_container::Mode;

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gradient(w: u32, h: u32) -> RgbImage {
        RgbImage::from_fn(w, h, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 0]))
    }

    #[test]
    fn encode_file_dispatches_png_to_image_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let png_path = tmp.path().join("photo.png");
        gradient(40, 40).save(&png_path).unwrap();

        let (mode, chunks) = encode_file(&png_path, &EncodeOptions::default()).unwrap();
        assert_eq!(mode, Mode::Image);
        assert!(!chunks.is_empty());

        let dir = tmp.path().join("photo.holo");
        write_chunks(&dir, &chunks).unwrap();
        match decode_dir(&dir).unwrap() {
            DecodedObject::Image(img) => assert_eq!(img.dimensions(), (40, 40)),
            _ => panic!("expected image mode"),
        }
    }

    #[test]
    fn encode_file_dispatches_unknown_extension_to_binary_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let bin_path = tmp.path().join("blob.dat");
        std::fs::write(&bin_path, b"some opaque bytes, more than a couple").unwrap();

        let (mode, chunks) = encode_file(&bin_path, &EncodeOptions::default()).unwrap();
        assert_eq!(mode, Mode::Binary);

        match decode_chunks(chunks).unwrap() {
            DecodedObject::Binary(bytes) => {
                assert_eq!(bytes, b"some opaque bytes, more than a couple")
            }
            _ => panic!("expected binary mode"),
        }
    }

    #[test]
    fn mixed_modes_in_one_directory_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let png_path = tmp.path().join("a.png");
        gradient(16, 16).save(&png_path).unwrap();
        let bin_path = tmp.path().join("b.dat");
        std::fs::write(&bin_path, b"binary payload over ten bytes").unwrap();

        let (_, mut image_chunks) = encode_file(&png_path, &EncodeOptions::default()).unwrap();
        let (_, binary_chunks) = encode_file(&bin_path, &EncodeOptions::default()).unwrap();
        image_chunks.extend(binary_chunks);

        assert!(matches!(decode_chunks(image_chunks), Err(CodecError::MixedModes)));
    }
}

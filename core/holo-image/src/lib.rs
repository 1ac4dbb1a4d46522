//! Image pipeline (component C3): bicubic (Catmull-Rom) thumbnail coarse
//! model plus a 16-bit signed residual, sharing the golden interleaver and
//! chunk container with the audio and binary pipelines.

mod decode;
mod encode;
mod error;
mod header;

pub use decode::decode;
pub use encode::{encode, DEFAULT_TARGET_KB, DEFAULT_THUMB_SIDE};
pub use error::{ImageCodecError, Result};
pub use header::ImageHeader;

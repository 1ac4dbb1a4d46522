use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("container error: {0}")]
    Container(#[from] holo_container::ContainerError),
    #[error("image pipeline error: {0}")]
    Image(#[from] holo_image::ImageCodecError),
    #[error("audio pipeline error: {0}")]
    Audio(#[from] holo_audio::AudioCodecError),
    #[error("binary pipeline error: {0}")]
    Binary(#[from] holo_binary::BinaryCodecError),
    #[error("decoding image file: {0}")]
    ImageDecode(#[from] image::ImageError),
    #[error("decoding WAV file: {0}")]
    WavDecode(#[from] hound::Error),
    #[error("directory contains chunks of more than one mode")]
    MixedModes,
    #[error("no usable chunk was found in the directory")]
    NoChunks,
    #[error("input is not 16- or 24-bit PCM audio")]
    UnsupportedInput,
}

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImageCodecError>;

#[derive(Error, Debug)]
pub enum ImageCodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("container error: {0}")]
    Container(#[from] holo_container::ContainerError),
    #[error("interleaver error: {0}")]
    Interleave(#[from] holo_interleave::InterleaveError),
    #[error("image decode/encode error: {0}")]
    Image(#[from] image::ImageError),
    #[error("input could not be decoded as an image")]
    UnsupportedInput,
    #[error("no usable chunk was found in the input set")]
    NoChunks,
    #[error("mode header truncated or malformed")]
    BadHeader,
}

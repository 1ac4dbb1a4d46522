use thiserror::Error;

pub type Result<T> = std::result::Result<T, AudioCodecError>;

#[derive(Error, Debug)]
pub enum AudioCodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("container error: {0}")]
    Container(#[from] holo_container::ContainerError),
    #[error("interleaver error: {0}")]
    Interleave(#[from] holo_interleave::InterleaveError),
    #[error("input is not 16- or 24-bit PCM audio")]
    UnsupportedInput,
    #[error("no usable chunk was found in the input set")]
    NoChunks,
    #[error("mode header truncated or malformed")]
    BadHeader,
}

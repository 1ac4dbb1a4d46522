use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContainerError>;

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("unrecognized chunk magic: {0:?}")]
    BadMagic([u8; 4]),
    #[error("chunk version {found} exceeds supported version {max} for mode {mode:?}")]
    BadVersion { mode: crate::Mode, found: u16, max: u16 },
    #[error("chunk container ended before its declared sections were read")]
    Truncated,
    #[error("zlib decompression failed")]
    DeflateError,
}

/// Maps an I/O error that signals end-of-file mid-read to `Truncated`,
/// matching spec.md's "container ends before declared sections" kind.
pub(crate) fn truncate_on_eof(err: io::Error) -> ContainerError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        ContainerError::Truncated
    } else {
        ContainerError::Io(err)
    }
}

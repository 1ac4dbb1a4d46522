//! Chunk container format (component C2): a fixed-order binary envelope
//! carrying a mode-tagged coarse payload and one compressed residual slice.

mod chunk;
mod deflate;
mod error;
mod mode;
mod naming;

pub use chunk::{read, write, Chunk, SUPPORTED_VERSION};
pub use deflate::{deflate, inflate};
pub use error::{ContainerError, Result};
pub use mode::Mode;
pub use naming::{chunk_file_name, decoded_stem, holo_dir_name};

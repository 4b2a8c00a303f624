use ddsplus_api::{LoadError, MemoryChannelError, SaveError};
use ddsplus_dds::HeaderError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Failed to map file: {0}")]
    Mmap(String),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Save(#[from] SaveError<io::Error>),
    #[error(transparent)]
    Load(#[from] LoadError<MemoryChannelError>),
    #[error("Malformed DDS file: {0}")]
    Header(#[from] HeaderError),
    #[error("{path}: image of {width}x{height} is too large")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
    },
    #[error("{0}: save was cancelled")]
    Cancelled(PathBuf),
    #[error("{failed} of {total} files failed to convert")]
    BatchFailed { failed: usize, total: usize },
}

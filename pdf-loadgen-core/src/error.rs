use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadgenError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid size range: minimum {min} MB is greater than maximum {max} MB")]
    InvalidSizeRange { min: u64, max: u64 },

    #[error("Size of {0} MB does not fit in memory on this platform")]
    SizeOverflow(u64),

    #[error("Could not create output directory {}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not write {}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: Box<LoadgenError>,
    },

    #[error("Compression error: {0}")]
    CompressionError(String),

    #[error("Invalid PDF structure: {0}")]
    InvalidStructure(String),
}

pub type Result<T> = std::result::Result<T, LoadgenError>;

impl LoadgenError {
    /// True for errors raised while validating the request, before any
    /// file system work happens.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LoadgenError::InvalidSizeRange { .. } | LoadgenError::SizeOverflow(_)
        )
    }
}

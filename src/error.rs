//! Error types for digit-mlp.
//!
//! Shape mismatches inside the matrix engine are programming errors and
//! panic; everything a user can cause (bad files, bad config, failed
//! downloads) is reported through [`Error`].

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to download {url}: server answered {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("{file}: magic number {found:#010x} does not match expected {expected:#010x}")]
    BadMagic { file: String, expected: u32, found: u32 },

    #[error("{file}: bad header, {detail}")]
    BadHeader { file: String, detail: String },

    #[error("{file}: corrupt gzip stream: {source}")]
    Gzip {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{file}: truncated, needed {needed} bytes but only {actual} available")]
    Truncated { file: String, needed: usize, actual: usize },

    #[error("label at index {index} is {label}, outside [0, 9]")]
    LabelOutOfRange { index: usize, label: u8 },

    #[error("image file holds {images} items but label file holds {labels}")]
    CountMismatch { images: usize, labels: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("cannot derive a cache file name from {0}")]
    BadCachePath(PathBuf),
}

impl Error {
    /// True for errors caused by malformed dataset contents rather than I/O.
    pub fn is_data_format(&self) -> bool {
        matches!(
            self,
            Error::BadMagic { .. }
                | Error::BadHeader { .. }
                | Error::Gzip { .. }
                | Error::Truncated { .. }
                | Error::LabelOutOfRange { .. }
                | Error::CountMismatch { .. }
        )
    }
}

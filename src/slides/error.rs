//! Slide store error types

use std::io;
use std::path::PathBuf;

/// Failures raised while loading, deriving or persisting slides.
///
/// Every variant is fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum SlideError {
    #[error("failed to read {path}: {source}")]
    ReadPersisted {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    ParsePersisted {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to create images directory {path}: {source}")]
    CreateImagesDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read images directory {path}: {source}")]
    ReadImagesDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create placeholder file {path}: {source}")]
    WritePlaceholder {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to marshal slides: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write {path}: {source}")]
    WritePersisted {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, SlideError>;

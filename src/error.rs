//! Error types for every stage of a binding run
//!
//! Only `PipelineError` aborts a run. Prompt errors are absorbed by the
//! namer and assemble errors are recorded per group.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A photo could not be turned into luminance samples
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to decode RAW file {path}: {message}")]
    Raw { path: PathBuf, message: String },
}

/// The naming prompt gave no usable answer
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("naming prompt was cancelled")]
    Cancelled,

    #[error("naming prompt failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read photo {path}: {source}")]
    ReadPhoto {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to get a preview of RAW photo: {0}")]
    RawPreview(#[source] DecodeError),

    #[error("failed to read dimensions of {path}: {source}")]
    Dimensions {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to create document {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to pack document {path}: {message}")]
    Pack { path: PathBuf, message: String },
}

/// One photo that stayed behind while its group was being moved
#[derive(Debug, Error)]
#[error("failed to move {photo} into {target}: {source}")]
pub struct MoveFailure {
    pub photo: PathBuf,
    pub target: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Failure while assembling a single group
#[derive(Debug, Error)]
pub enum AssembleError {
    #[error("document for group could not be written: {0}")]
    Document(#[from] DocumentError),

    #[error("failed to create group folder {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        document: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} of {} photos could not be moved into {folder}", .failures.len(), .failures.len() + .moved)]
    PartialMove {
        folder: PathBuf,
        document: PathBuf,
        moved: usize,
        failures: Vec<MoveFailure>,
    },
}

/// Errors that abort the whole run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to list photos in {path}: {source}")]
    Discover {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("cannot trust grouping: {0}")]
    Decode(#[from] DecodeError),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

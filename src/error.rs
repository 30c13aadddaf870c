//! Error types for download and extraction operations.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::checksum::HashAlgorithm;

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Which file a checksum mismatch was detected on.
///
/// A mismatch on a pre-existing file means the destination was corrupt
/// before this call; a mismatch on a downloaded file means the transfer
/// itself produced bad bytes. Callers diagnose these differently, so the
/// error carries the distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashOrigin {
    /// A file that was already present at the destination path.
    Existing,
    /// A file produced by a download in the current call.
    Downloaded,
    /// An archive checked before extraction.
    Archive,
}

impl fmt::Display for HashOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Existing => write!(f, "existing file"),
            Self::Downloaded => write!(f, "downloaded file"),
            Self::Archive => write!(f, "compressed file"),
        }
    }
}

/// Errors that can occur while fetching or extracting an asset.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Unknown hash algorithm name requested.
    #[error("unsupported hash algorithm '{name}', expected one of: md5, sha1")]
    UnsupportedAlgorithm { name: String },

    /// Computed digest differs from the expected value.
    #[error(
        "{algorithm} check of {origin} failed: path={}, expected {algorithm}={expected}",
        .path.display()
    )]
    HashMismatch {
        path: PathBuf,
        algorithm: HashAlgorithm,
        expected: String,
        origin: HashOrigin,
    },

    /// The server did not report a total size for a ranged download.
    #[error("error getting content length from server: {url}")]
    ContentLengthUnavailable { url: String },

    /// A provider-host URL was requested but no provider client is configured.
    #[error("no provider client configured for downloading {url}")]
    CapabilityUnavailable { url: String },

    /// Network or transport failure while downloading.
    #[error("failed to download {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// Archive suffix not recognized.
    #[error(
        "unsupported archive format: {}, available options are zip, tar.gz and tar",
        .path.display()
    )]
    UnsupportedArchiveFormat { path: PathBuf },

    /// Archive could not be decoded or unpacked.
    #[error("failed to extract {}: {reason}", .path.display())]
    ExtractionFailed { path: PathBuf, reason: String },

    /// Failed to read a file.
    #[error("failed to read {}: {source}", .path.display())]
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file.
    #[error("failed to write {}: {source}", .path.display())]
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to create a directory.
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDirFailed { path: PathBuf, source: io::Error },

    /// HTTP client construction failed.
    #[error("HTTP error: {0}")]
    HttpError(String),
}

//! Immutable request descriptions for downloads and extractions.

use std::path::{Path, PathBuf};

use crate::checksum::HashAlgorithm;

/// A single-file download request.
///
/// Constructed once per call and consumed synchronously; the fields are
/// fixed at construction time.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    url: String,
    destination: PathBuf,
    expected_hash: Option<String>,
    algorithm: HashAlgorithm,
}

impl DownloadRequest {
    /// Request to download `url` to the local `destination` path.
    ///
    /// Without an expected hash the download is not verified; use
    /// [`with_hash`](Self::with_hash) to gate it on a catalog digest.
    pub fn new(url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            destination: destination.into(),
            expected_hash: None,
            algorithm: HashAlgorithm::default(),
        }
    }

    /// Attach the expected digest the downloaded file must match.
    pub fn with_hash(mut self, value: impl Into<String>, algorithm: HashAlgorithm) -> Self {
        self.expected_hash = Some(value.into());
        self.algorithm = algorithm;
        self
    }

    /// Source URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Local path the file is downloaded to.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Expected digest value, if verification was requested.
    pub fn expected_hash(&self) -> Option<&str> {
        self.expected_hash.as_deref()
    }

    /// Digest algorithm for verification.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}

/// A request to unpack a downloaded archive.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    archive: PathBuf,
    output_dir: PathBuf,
    expected_hash: Option<String>,
    algorithm: HashAlgorithm,
}

impl ExtractionRequest {
    /// Request to extract `archive` into `output_dir`.
    pub fn new(archive: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            archive: archive.into(),
            output_dir: output_dir.into(),
            expected_hash: None,
            algorithm: HashAlgorithm::default(),
        }
    }

    /// Attach the expected digest the archive must match before extraction.
    pub fn with_hash(mut self, value: impl Into<String>, algorithm: HashAlgorithm) -> Self {
        self.expected_hash = Some(value.into());
        self.algorithm = algorithm;
        self
    }

    /// Path of the archive to unpack.
    pub fn archive(&self) -> &Path {
        &self.archive
    }

    /// Directory archive members are written into.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Expected digest value, if verification was requested.
    pub fn expected_hash(&self) -> Option<&str> {
        self.expected_hash.as_deref()
    }

    /// Digest algorithm for verification.
    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}

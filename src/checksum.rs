//! File checksum computation and verification.
//!
//! Dataset and model catalogs publish MD5 or SHA-1 digests alongside their
//! download links; this module streams files through the selected digest and
//! compares the result against the catalog value.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use md5::{Digest, Md5};
use sha1::Sha1;
use tracing::{debug, info, warn};

use crate::error::{FetchError, FetchResult, HashOrigin};

/// Buffer size for reading files during checksum calculation (1 MiB).
const BUFFER_SIZE: usize = 1024 * 1024;

/// Digest algorithms supported for file verification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// MD5, the historical default in dataset catalogs.
    #[default]
    Md5,
    /// SHA-1.
    Sha1,
}

impl HashAlgorithm {
    /// Algorithm name as it appears in catalogs and log output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = FetchError;

    /// Parse an algorithm selector, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            _ => Err(FetchError::UnsupportedAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

/// Streaming hasher dispatched over the supported digest types.
enum FileHasher {
    Md5(Md5),
    Sha1(Sha1),
}

impl FileHasher {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Md5 => Self::Md5(Md5::new()),
            HashAlgorithm::Sha1 => Self::Sha1(Sha1::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Md5(hasher) => hasher.update(data),
            Self::Sha1(hasher) => hasher.update(data),
        }
    }

    fn finalize_hex(self) -> String {
        match self {
            Self::Md5(hasher) => format!("{:x}", hasher.finalize()),
            Self::Sha1(hasher) => format!("{:x}", hasher.finalize()),
        }
    }
}

/// Calculate the digest of a file.
///
/// Reads the file in 1 MiB chunks so memory use stays bounded regardless of
/// file size. Returns the lowercase hexadecimal rendering of the digest.
///
/// # Errors
///
/// Returns [`FetchError::ReadFailed`] if the file cannot be read.
pub fn compute_file_hash(path: &Path, algorithm: HashAlgorithm) -> FetchResult<String> {
    let mut file = File::open(path).map_err(|e| FetchError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = FileHasher::new(algorithm);
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(|e| FetchError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize_hex())
}

/// Verify a file against an expected digest value.
///
/// With no expected value the check trivially passes without reading the
/// file: catalog entries without a published digest opt out of
/// verification. Read failures (missing file, permission denied) are
/// reported as `false`, not propagated: callers treat unreadable and
/// mismatched files identically.
///
/// The comparison is exact against the lowercase hex rendering of the
/// digest.
pub fn check_file_hash(path: &Path, expected: Option<&str>, algorithm: HashAlgorithm) -> bool {
    let Some(expected) = expected else {
        debug!(
            path = %path.display(),
            algorithm = %algorithm,
            "Expected hash is absent, skipping check"
        );
        return true;
    };

    let actual = match compute_file_hash(path, algorithm) {
        Ok(actual) => actual,
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Hash check could not read file");
            return false;
        }
    };

    if actual != expected {
        warn!(
            path = %path.display(),
            algorithm = %algorithm,
            expected,
            actual = %actual,
            "Hash check failed"
        );
        return false;
    }

    info!(
        file = %path.file_name().unwrap_or_default().to_string_lossy(),
        algorithm = %algorithm,
        value = expected,
        "Hash verified"
    );
    true
}

/// Run the hash gate for a file, turning a failed check into
/// [`FetchError::HashMismatch`] tagged with where the file came from.
pub(crate) fn require_file_hash(
    path: &Path,
    expected: Option<&str>,
    algorithm: HashAlgorithm,
    origin: HashOrigin,
) -> FetchResult<()> {
    if check_file_hash(path, expected, algorithm) {
        return Ok(());
    }

    Err(FetchError::HashMismatch {
        path: path.to_path_buf(),
        algorithm,
        expected: expected.unwrap_or_default().to_string(),
        origin,
    })
}

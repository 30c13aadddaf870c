//! Archive extraction for downloaded assets.
//!
//! Handles the three formats dataset catalogs publish: zip, tar and
//! tar.gz. Extraction is gated on the archive's hash and skipped entirely
//! when a previous run already produced the expected output directory.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tracing::{debug, info, warn};

use crate::checksum::require_file_hash;
use crate::error::{FetchError, FetchResult, HashOrigin};
use crate::request::ExtractionRequest;

/// Unpack an archive into the request's output directory.
///
/// If `output_dir` already contains an entry named like the archive's base
/// name up to its first `.`, the whole call is skipped. This is a presence
/// check only, not a correctness check: a half-extracted previous run is
/// treated as complete.
///
/// # Errors
///
/// Returns [`FetchError::HashMismatch`] when the archive fails its hash
/// gate, [`FetchError::UnsupportedArchiveFormat`] for suffixes other than
/// `.zip`, `.tar` and `.tar.gz`, and [`FetchError::ExtractionFailed`] when
/// the archive cannot be decoded.
pub fn extract(request: &ExtractionRequest) -> FetchResult<()> {
    let archive = request.archive();
    let output_dir = request.output_dir();

    if let Some(marker) = extraction_marker(archive, output_dir) {
        if marker.exists() {
            info!(path = %marker.display(), "Extracted output exists, skipping extraction");
            return Ok(());
        }
    }

    require_file_hash(
        archive,
        request.expected_hash(),
        request.algorithm(),
        HashOrigin::Archive,
    )?;

    fs::create_dir_all(output_dir).map_err(|e| FetchError::CreateDirFailed {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if name.ends_with(".zip") {
        extract_zip(archive, output_dir)
    } else if name.ends_with(".tar.gz") {
        extract_tar(archive, output_dir, true)
    } else if name.ends_with(".tar") {
        extract_tar(archive, output_dir, false)
    } else {
        Err(FetchError::UnsupportedArchiveFormat {
            path: archive.to_path_buf(),
        })
    }
}

/// Path whose presence under `output_dir` marks the archive as already
/// extracted: the archive's base name truncated at the first `.`.
fn extraction_marker(archive: &Path, output_dir: &Path) -> Option<PathBuf> {
    let name = archive.file_name()?.to_string_lossy();
    let stem = name.split('.').next().unwrap_or_default();
    if stem.is_empty() {
        return None;
    }
    Some(output_dir.join(stem))
}

fn extract_zip(archive_path: &Path, output_dir: &Path) -> FetchResult<()> {
    let file = File::open(archive_path).map_err(|e| FetchError::ReadFailed {
        path: archive_path.to_path_buf(),
        source: e,
    })?;

    let mut archive = zip::ZipArchive::new(file).map_err(|e| FetchError::ExtractionFailed {
        path: archive_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| FetchError::ExtractionFailed {
                path: archive_path.to_path_buf(),
                reason: e.to_string(),
            })?;

        // Entries whose name escapes the output directory are dropped, not
        // written relative to wherever they point.
        let Some(entry_path) = entry.enclosed_name() else {
            warn!(entry = entry.name(), "Skipping zip entry with unsafe path");
            continue;
        };
        let dest_path = output_dir.join(entry_path);

        if entry.is_dir() {
            fs::create_dir_all(&dest_path).map_err(|e| FetchError::CreateDirFailed {
                path: dest_path.clone(),
                source: e,
            })?;
            continue;
        }

        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent).map_err(|e| FetchError::CreateDirFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut outfile = File::create(&dest_path).map_err(|e| FetchError::WriteFailed {
            path: dest_path.clone(),
            source: e,
        })?;

        io::copy(&mut entry, &mut outfile).map_err(|e| FetchError::ExtractionFailed {
            path: archive_path.to_path_buf(),
            reason: format!("entry {}: {e}", dest_path.display()),
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            if let Some(mode) = entry.unix_mode() {
                if mode != 0 {
                    fs::set_permissions(&dest_path, fs::Permissions::from_mode(mode)).map_err(
                        |e| FetchError::WriteFailed {
                            path: dest_path.clone(),
                            source: e,
                        },
                    )?;
                }
            }
        }
    }

    debug!(path = %archive_path.display(), "Zip extraction complete");
    Ok(())
}

fn extract_tar(archive_path: &Path, output_dir: &Path, gzipped: bool) -> FetchResult<()> {
    let file = File::open(archive_path).map_err(|e| FetchError::ReadFailed {
        path: archive_path.to_path_buf(),
        source: e,
    })?;
    let reader = BufReader::new(file);

    // tar's unpack rejects entries that would land outside the output
    // directory, so no per-entry sanitization loop is needed here.
    let result = if gzipped {
        tar::Archive::new(GzDecoder::new(reader)).unpack(output_dir)
    } else {
        tar::Archive::new(reader).unpack(output_dir)
    };

    result.map_err(|e| FetchError::ExtractionFailed {
        path: archive_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    debug!(path = %archive_path.display(), "Tar extraction complete");
    Ok(())
}

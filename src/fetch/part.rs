//! Partial-download checkpoint files.
//!
//! Ranged downloads accumulate bytes in a sibling `.part` file next to the
//! destination. The length of that file is the resume offset, so a rerun
//! after a crash or a dropped connection continues where the last one
//! stopped instead of starting over.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{FetchError, FetchResult};

/// Checkpoint file holding the bytes fetched so far for one destination.
pub struct PartFile {
    path: PathBuf,
    destination: PathBuf,
}

impl PartFile {
    /// Checkpoint for `destination`, stored at `<destination>.part`.
    pub fn for_destination(destination: impl Into<PathBuf>) -> Self {
        let destination = destination.into();
        let mut name = destination.as_os_str().to_os_string();
        name.push(".part");
        Self {
            path: PathBuf::from(name),
            destination,
        }
    }

    /// Location of the checkpoint file itself.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes checkpointed so far, which is also the resume offset.
    ///
    /// A checkpoint that does not exist yet counts as zero.
    pub fn len(&self) -> u64 {
        fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
    }

    /// True when nothing has been checkpointed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append one chunk to the checkpoint.
    ///
    /// The file is opened and closed per chunk so every appended chunk is
    /// durable on its own. The extra open is noise next to the network
    /// round-trip that produced the chunk.
    pub fn append(&self, chunk: &[u8]) -> FetchResult<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| FetchError::WriteFailed {
                path: self.path.clone(),
                source: e,
            })?;

        file.write_all(chunk).map_err(|e| FetchError::WriteFailed {
            path: self.path.clone(),
            source: e,
        })?;

        Ok(())
    }

    /// Rename the completed checkpoint onto the destination.
    pub fn promote(self) -> FetchResult<()> {
        fs::rename(&self.path, &self.destination).map_err(|e| FetchError::WriteFailed {
            path: self.destination.clone(),
            source: e,
        })?;

        Ok(())
    }
}

//! Single-shot streaming downloads for generic URLs.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};

use tracing::{info, warn};

use crate::error::{FetchError, FetchResult};
use crate::fetch::transport::HttpTransport;
use crate::fetch::FetchOutcome;
use crate::progress::{report, ProgressCallback};
use crate::request::DownloadRequest;

/// Copy buffer for streaming the response body to disk (64 KiB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Default downloader for URLs with no special host handling.
///
/// Streams one GET response straight to the destination path. There is no
/// checkpointing here: a failed transfer may leave a truncated file behind,
/// which the next call's existing-file hash gate catches.
pub struct SimpleFetcher<'a> {
    transport: &'a dyn HttpTransport,
}

impl<'a> SimpleFetcher<'a> {
    pub fn new(transport: &'a dyn HttpTransport) -> Self {
        Self { transport }
    }

    /// Download `request.url()` to its destination in one request.
    ///
    /// Transport and write failures propagate unchanged after a failure
    /// notice is logged. The caller owns hash verification of the result.
    pub fn fetch(
        &self,
        request: &DownloadRequest,
        progress: Option<&ProgressCallback>,
    ) -> FetchResult<FetchOutcome> {
        if let Some(parent) = request.destination().parent() {
            fs::create_dir_all(parent).map_err(|e| FetchError::CreateDirFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        match self.stream_to_destination(request, progress) {
            Ok(()) => {
                info!(path = %request.destination().display(), "Downloaded file");
                Ok(FetchOutcome::Fetched)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    url = request.url(),
                    path = %request.destination().display(),
                    "Download failed"
                );
                Err(e)
            }
        }
    }

    fn stream_to_destination(
        &self,
        request: &DownloadRequest,
        progress: Option<&ProgressCallback>,
    ) -> FetchResult<()> {
        let url = request.url();
        let destination = request.destination();

        let body = self.transport.get(url)?;
        let total = body.content_length.unwrap_or(0);

        let label = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| url.to_string());

        let file = File::create(destination).map_err(|e| FetchError::WriteFailed {
            path: destination.to_path_buf(),
            source: e,
        })?;
        let mut writer = BufWriter::new(file);

        let mut reader = body.reader;
        let mut buffer = vec![0u8; BUFFER_SIZE];
        let mut received: u64 = 0;

        loop {
            let bytes_read = reader
                .read(&mut buffer)
                .map_err(|e| FetchError::DownloadFailed {
                    url: url.to_string(),
                    reason: format!("read error: {e}"),
                })?;

            if bytes_read == 0 {
                break;
            }

            writer
                .write_all(&buffer[..bytes_read])
                .map_err(|e| FetchError::WriteFailed {
                    path: destination.to_path_buf(),
                    source: e,
                })?;

            received += bytes_read as u64;
            report(progress, received, total, &label);
        }

        writer.flush().map_err(|e| FetchError::WriteFailed {
            path: destination.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }
}

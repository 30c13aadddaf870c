//! Resumable chunked downloads over HTTP byte ranges.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::checksum::require_file_hash;
use crate::config::FetchConfig;
use crate::error::{FetchError, FetchResult, HashOrigin};
use crate::fetch::part::PartFile;
use crate::fetch::transport::HttpTransport;
use crate::fetch::FetchOutcome;
use crate::progress::{report, ProgressCallback};
use crate::request::DownloadRequest;

/// Chunked downloader for bulk hosts that honor byte-range requests.
///
/// Bytes accumulate in a [`PartFile`] checkpoint; an interrupted transfer
/// resumes from the checkpoint length on the next call. The fetcher runs
/// its own hash gate before promoting the checkpoint, so a success here is
/// already [`FetchOutcome::Verified`].
pub struct RangeFetcher<'a> {
    transport: &'a dyn HttpTransport,
    block_size: u64,
    chunk_timeout: Duration,
}

impl<'a> RangeFetcher<'a> {
    pub fn new(transport: &'a dyn HttpTransport, config: &FetchConfig) -> Self {
        Self {
            transport,
            block_size: config.block_size,
            chunk_timeout: config.chunk_timeout,
        }
    }

    /// Download `request.url()` to its destination in resumable chunks.
    ///
    /// A chunk that fails stops the transfer without failing the call: the
    /// checkpoint stays on disk and the outcome is
    /// [`FetchOutcome::Incomplete`]. Only an unobtainable total size or a
    /// failed hash gate on the completed checkpoint turn into errors.
    pub fn fetch(
        &self,
        request: &DownloadRequest,
        progress: Option<&ProgressCallback>,
    ) -> FetchResult<FetchOutcome> {
        let url = request.url();
        let part = PartFile::for_destination(request.destination());
        let mut offset = part.len();

        let label = request
            .destination()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| url.to_string());

        // A failed probe is handled like a missing header: the loop is
        // skipped and finalize raises the error, leaving any checkpoint
        // untouched.
        let total = match self.transport.content_length(url) {
            Ok(total) => total,
            Err(e) => {
                warn!(error = %e, url, "Content length probe failed");
                None
            }
        };

        if let Some(total) = total {
            if offset > 0 {
                info!(url, resume_offset = offset, total, "Resuming partial download");
            }
            report(progress, offset, total, &label);

            while offset < total {
                let end = (offset + self.block_size).min(total - 1);

                let chunk = match self.transport.get_range(url, offset, end, self.chunk_timeout) {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        warn!(error = %e, url, offset, "Chunk request failed, stopping");
                        break;
                    }
                };

                if let Err(e) = part.append(&chunk) {
                    warn!(error = %e, url, offset, "Chunk write failed, stopping");
                    break;
                }

                offset = end + 1;
                report(progress, offset, total, &label);
            }
        }

        self.finalize(request, part, total)
    }

    /// Compare the checkpoint against the declared total and promote it
    /// when the transfer is complete.
    fn finalize(
        &self,
        request: &DownloadRequest,
        part: PartFile,
        total: Option<u64>,
    ) -> FetchResult<FetchOutcome> {
        match total {
            Some(total) if part.len() == total => {
                // Gate on the checkpoint itself; a mismatch must not leave
                // a bad file at the destination path.
                require_file_hash(
                    part.path(),
                    request.expected_hash(),
                    request.algorithm(),
                    HashOrigin::Downloaded,
                )?;
                part.promote()?;
                info!(path = %request.destination().display(), "Download complete");
                Ok(FetchOutcome::Verified)
            }
            Some(total) => {
                debug!(
                    url = request.url(),
                    have = part.len(),
                    total,
                    "Download incomplete, checkpoint retained"
                );
                Ok(FetchOutcome::Incomplete)
            }
            None => Err(FetchError::ContentLengthUnavailable {
                url: request.url().to_string(),
            }),
        }
    }
}

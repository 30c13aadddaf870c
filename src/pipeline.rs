//! Combined download-then-unpack operation.

use std::path::Path;

use crate::error::FetchResult;
use crate::extractor::extract;
use crate::orchestrator::Downloader;
use crate::request::{DownloadRequest, ExtractionRequest};

/// Fetches an archive and unpacks it in one call.
///
/// The request's expected hash gates both stages, so a rerun after a crash
/// anywhere in the sequence converges: a verified archive skips the
/// transfer, an existing output directory skips the unpack.
///
/// # Examples
///
/// ```no_run
/// use assetfetch::{DownloadRequest, Downloader, FetchConfig, HashAlgorithm, Pipeline};
///
/// let pipeline = Pipeline::new(Downloader::new(FetchConfig::default())?);
/// let request = DownloadRequest::new(
///     "https://example.org/datasets/Task04_Hippocampus.tar",
///     "/data/archives/Task04_Hippocampus.tar",
/// )
/// .with_hash("9d24dba78e72977dbd1d2e110310f31b", HashAlgorithm::Md5);
/// pipeline.fetch_and_extract(&request, "/data/sets".as_ref())?;
/// # Ok::<(), assetfetch::FetchError>(())
/// ```
pub struct Pipeline {
    downloader: Downloader,
}

impl Pipeline {
    pub fn new(downloader: Downloader) -> Self {
        Self { downloader }
    }

    /// The downloader, for plain fetches alongside the pipeline.
    pub fn downloader(&self) -> &Downloader {
        &self.downloader
    }

    /// Download `request` and unpack the archive into `output_dir`.
    ///
    /// There is no rollback: if extraction fails, the downloaded archive
    /// stays on disk and a rerun retries only the unpack.
    pub fn fetch_and_extract(
        &self,
        request: &DownloadRequest,
        output_dir: &Path,
    ) -> FetchResult<()> {
        self.downloader.fetch(request)?;

        let mut extraction = ExtractionRequest::new(request.destination(), output_dir);
        if let Some(hash) = request.expected_hash() {
            extraction = extraction.with_hash(hash, request.algorithm());
        }

        extract(&extraction)
    }
}

//! Download orchestration: existing-file short-circuit, strategy dispatch,
//! and the final hash gate.

use std::sync::Arc;

use tracing::{debug, info};

use crate::checksum::require_file_hash;
use crate::config::FetchConfig;
use crate::error::{FetchError, FetchResult, HashOrigin};
use crate::fetch::{
    FetchOutcome, FetchStrategy, HttpTransport, ProviderClient, ProviderFetcher, RangeFetcher,
    ReqwestTransport, SimpleFetcher,
};
use crate::progress::ProgressCallback;
use crate::request::DownloadRequest;

/// Verified file downloader.
///
/// Owns the HTTP transport, the optional provider client, and the optional
/// progress callback; dispatches each request to the strategy its URL
/// calls for and guarantees that a successful return means a destination
/// file that passed its hash gate (when a hash was supplied).
///
/// # Examples
///
/// ```no_run
/// use assetfetch::{DownloadRequest, Downloader, FetchConfig, HashAlgorithm};
///
/// let downloader = Downloader::new(FetchConfig::default())?;
/// let request = DownloadRequest::new(
///     "https://example.org/datasets/Task04_Hippocampus.tar",
///     "/data/archives/Task04_Hippocampus.tar",
/// )
/// .with_hash("9d24dba78e72977dbd1d2e110310f31b", HashAlgorithm::Md5);
/// downloader.fetch(&request)?;
/// # Ok::<(), assetfetch::FetchError>(())
/// ```
pub struct Downloader {
    config: FetchConfig,
    transport: Arc<dyn HttpTransport>,
    provider: Option<Arc<dyn ProviderClient>>,
    progress: Option<ProgressCallback>,
}

impl Downloader {
    /// Downloader backed by the real HTTP transport.
    pub fn new(config: FetchConfig) -> FetchResult<Self> {
        Ok(Self {
            config,
            transport: Arc::new(ReqwestTransport::new()?),
            provider: None,
            progress: None,
        })
    }

    /// Substitute the HTTP transport.
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = transport;
        self
    }

    /// Attach the client that serves provider-host URLs.
    ///
    /// Without one, a URL matching a configured provider prefix fails with
    /// [`FetchError::CapabilityUnavailable`].
    pub fn with_provider(mut self, provider: Arc<dyn ProviderClient>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Attach a progress callback for the HTTP strategies.
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Fetch one file, verifying it against the request's expected hash.
    ///
    /// An existing destination that passes the gate short-circuits the
    /// call with no network traffic; one that fails it is reported as
    /// [`HashOrigin::Existing`] so callers can tell stale local state from
    /// a bad transfer.
    pub fn fetch(&self, request: &DownloadRequest) -> FetchResult<()> {
        let destination = request.destination();

        if destination.exists() {
            require_file_hash(
                destination,
                request.expected_hash(),
                request.algorithm(),
                HashOrigin::Existing,
            )?;
            info!(path = %destination.display(), "File exists, skipping download");
            return Ok(());
        }

        let strategy = FetchStrategy::for_url(request.url(), &self.config);
        debug!(url = request.url(), ?strategy, "Dispatching download");

        let outcome = match strategy {
            FetchStrategy::Provider => {
                let client =
                    self.provider
                        .as_deref()
                        .ok_or_else(|| FetchError::CapabilityUnavailable {
                            url: request.url().to_string(),
                        })?;
                ProviderFetcher::new(client).fetch(request)?
            }
            FetchStrategy::Ranged => RangeFetcher::new(self.transport.as_ref(), &self.config)
                .fetch(request, self.progress.as_ref())?,
            FetchStrategy::Simple => {
                SimpleFetcher::new(self.transport.as_ref()).fetch(request, self.progress.as_ref())?
            }
        };

        match outcome {
            // The range fetcher already gated the checkpoint before
            // promoting it; a second check would reread the whole file.
            FetchOutcome::Verified => Ok(()),
            FetchOutcome::Fetched | FetchOutcome::Incomplete => require_file_hash(
                destination,
                request.expected_hash(),
                request.algorithm(),
                HashOrigin::Downloaded,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::HashAlgorithm;
    use crate::fetch::MockTransport;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const BULK_URL: &str = "https://bulk.example.org/sets/payload.bin";
    const PLAIN_URL: &str = "https://example.org/files/payload.bin";
    const PROVIDER_URL: &str = "https://drive.example.com/uc?id=abc123";

    /// MD5 of the ASCII string "hello world".
    const HELLO_MD5: &str = "5eb63bbbe01eeed093cb22bb8f5acdc3";
    const WRONG_MD5: &str = "00000000000000000000000000000000";

    struct WritingProvider;

    impl ProviderClient for WritingProvider {
        fn download(&self, _url: &str, destination: &Path) -> FetchResult<()> {
            fs::write(destination, b"hello world").map_err(|e| FetchError::WriteFailed {
                path: destination.to_path_buf(),
                source: e,
            })
        }
    }

    fn downloader_with(config: FetchConfig, mock: &Arc<MockTransport>) -> Downloader {
        Downloader::new(config)
            .unwrap()
            .with_transport(Arc::clone(mock) as Arc<dyn HttpTransport>)
    }

    #[test]
    fn test_existing_file_with_matching_hash_short_circuits() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("payload.bin");
        fs::write(&dest, b"hello world").unwrap();

        let mock = Arc::new(MockTransport::serving(b"never served".to_vec()));
        let downloader = downloader_with(FetchConfig::default(), &mock);

        let request =
            DownloadRequest::new(PLAIN_URL, &dest).with_hash(HELLO_MD5, HashAlgorithm::Md5);
        downloader.fetch(&request).unwrap();

        assert_eq!(mock.request_count(), 0);
        assert_eq!(fs::read(&dest).unwrap(), b"hello world");
    }

    #[test]
    fn test_existing_file_without_hash_short_circuits() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("payload.bin");
        fs::write(&dest, b"anything").unwrap();

        let mock = Arc::new(MockTransport::serving(b"never served".to_vec()));
        let downloader = downloader_with(FetchConfig::default(), &mock);

        downloader.fetch(&DownloadRequest::new(PLAIN_URL, &dest)).unwrap();

        assert_eq!(mock.request_count(), 0);
    }

    #[test]
    fn test_existing_file_with_wrong_hash_is_existing_mismatch() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("payload.bin");
        fs::write(&dest, b"corrupt bytes").unwrap();

        let mock = Arc::new(MockTransport::serving(b"never served".to_vec()));
        let downloader = downloader_with(FetchConfig::default(), &mock);

        let request =
            DownloadRequest::new(PLAIN_URL, &dest).with_hash(HELLO_MD5, HashAlgorithm::Md5);
        let err = downloader.fetch(&request).unwrap_err();

        match err {
            FetchError::HashMismatch { origin, .. } => assert_eq!(origin, HashOrigin::Existing),
            other => panic!("expected HashMismatch, got {other:?}"),
        }
        assert_eq!(mock.request_count(), 0);
    }

    #[test]
    fn test_simple_download_passes_final_gate() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("payload.bin");

        let mock = Arc::new(MockTransport::serving(b"hello world".to_vec()));
        let downloader = downloader_with(FetchConfig::default(), &mock);

        let request =
            DownloadRequest::new(PLAIN_URL, &dest).with_hash(HELLO_MD5, HashAlgorithm::Md5);
        downloader.fetch(&request).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"hello world");
    }

    #[test]
    fn test_simple_download_mismatch_is_downloaded_origin() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("payload.bin");

        let mock = Arc::new(MockTransport::serving(b"tampered body".to_vec()));
        let downloader = downloader_with(FetchConfig::default(), &mock);

        let request =
            DownloadRequest::new(PLAIN_URL, &dest).with_hash(HELLO_MD5, HashAlgorithm::Md5);
        let err = downloader.fetch(&request).unwrap_err();

        match err {
            FetchError::HashMismatch { origin, .. } => assert_eq!(origin, HashOrigin::Downloaded),
            other => panic!("expected HashMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_ranged_prefix_dispatches_to_range_fetcher() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("payload.bin");

        let mock = Arc::new(MockTransport::serving(b"hello world".to_vec()));
        let config = FetchConfig::new()
            .with_ranged_prefix("https://bulk.example.org")
            .with_block_size(4);
        let downloader = downloader_with(config, &mock);

        downloader.fetch(&DownloadRequest::new(BULK_URL, &dest)).unwrap();

        assert!(mock.range_count() > 1);
        assert_eq!(fs::read(&dest).unwrap(), b"hello world");
    }

    #[test]
    fn test_provider_url_without_client_fails_before_any_request() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("payload.bin");

        let mock = Arc::new(MockTransport::serving(b"never served".to_vec()));
        let config = FetchConfig::new().with_provider_prefix("https://drive.example.com");
        let downloader = downloader_with(config, &mock);

        let err = downloader
            .fetch(&DownloadRequest::new(PROVIDER_URL, &dest))
            .unwrap_err();

        match err {
            FetchError::CapabilityUnavailable { url } => assert_eq!(url, PROVIDER_URL),
            other => panic!("expected CapabilityUnavailable, got {other:?}"),
        }
        assert_eq!(mock.request_count(), 0);
    }

    #[test]
    fn test_provider_download_passes_final_gate() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("payload.bin");

        let mock = Arc::new(MockTransport::serving(b"never served".to_vec()));
        let config = FetchConfig::new().with_provider_prefix("https://drive.example.com");
        let downloader =
            downloader_with(config, &mock).with_provider(Arc::new(WritingProvider));

        let request =
            DownloadRequest::new(PROVIDER_URL, &dest).with_hash(HELLO_MD5, HashAlgorithm::Md5);
        downloader.fetch(&request).unwrap();

        assert_eq!(mock.request_count(), 0);
        assert_eq!(fs::read(&dest).unwrap(), b"hello world");
    }

    #[test]
    fn test_incomplete_ranged_download_without_hash_returns_ok() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("payload.bin");

        let mock = Arc::new(
            MockTransport::serving(b"hello world".to_vec()).failing_ranges_after(1),
        );
        let config = FetchConfig::new()
            .with_ranged_prefix("https://bulk.example.org")
            .with_block_size(4);
        let downloader = downloader_with(config, &mock);

        // No expected hash, so the stalled transfer is not detected here.
        // The retained checkpoint makes the next call resume instead.
        downloader.fetch(&DownloadRequest::new(BULK_URL, &dest)).unwrap();

        assert!(!dest.exists());
        assert!(dir.path().join("payload.bin.part").exists());
    }

    #[test]
    fn test_incomplete_ranged_download_with_hash_fails_gate() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("payload.bin");

        let mock = Arc::new(
            MockTransport::serving(b"hello world".to_vec()).failing_ranges_after(1),
        );
        let config = FetchConfig::new()
            .with_ranged_prefix("https://bulk.example.org")
            .with_block_size(4);
        let downloader = downloader_with(config, &mock);

        let request =
            DownloadRequest::new(BULK_URL, &dest).with_hash(WRONG_MD5, HashAlgorithm::Md5);
        let err = downloader.fetch(&request).unwrap_err();

        assert!(matches!(
            err,
            FetchError::HashMismatch {
                origin: HashOrigin::Downloaded,
                ..
            }
        ));
    }
}

//! Delegated downloads through an injected provider client.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{FetchError, FetchResult};
use crate::fetch::FetchOutcome;
use crate::request::DownloadRequest;

/// Client for hosts whose download needs an auth or consent flow a plain
/// GET cannot drive.
///
/// The crate never implements such flows itself. The embedding application
/// injects a client and routes the matching hosts to it through
/// [`FetchConfig::with_provider_prefix`](crate::FetchConfig::with_provider_prefix).
pub trait ProviderClient: Send + Sync {
    /// Download `url` to `destination`, creating the file on success.
    fn download(&self, url: &str, destination: &Path) -> FetchResult<()>;
}

/// Strategy wrapper handing the whole transfer to a [`ProviderClient`].
pub struct ProviderFetcher<'a> {
    client: &'a dyn ProviderClient,
}

impl<'a> ProviderFetcher<'a> {
    pub fn new(client: &'a dyn ProviderClient) -> Self {
        Self { client }
    }

    /// Delegate the download, then confirm the client produced a file.
    ///
    /// Some provider clients report success on a denied or quota-limited
    /// transfer, so a missing destination after a clean return is still
    /// [`FetchError::DownloadFailed`].
    pub fn fetch(&self, request: &DownloadRequest) -> FetchResult<FetchOutcome> {
        let destination = request.destination();

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| FetchError::CreateDirFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        self.client.download(request.url(), destination)?;

        if !destination.exists() {
            return Err(FetchError::DownloadFailed {
                url: request.url().to_string(),
                reason: format!("provider client left no file at {}", destination.display()),
            });
        }

        debug!(path = %destination.display(), "Provider download complete");
        Ok(FetchOutcome::Fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const URL: &str = "https://drive.example.com/uc?id=abc123";

    /// Provider that writes a fixed payload to the destination.
    struct WritingProvider;

    impl ProviderClient for WritingProvider {
        fn download(&self, _url: &str, destination: &Path) -> FetchResult<()> {
            fs::write(destination, b"provider payload").map_err(|e| FetchError::WriteFailed {
                path: destination.to_path_buf(),
                source: e,
            })
        }
    }

    /// Provider that claims success without producing a file.
    struct SilentProvider;

    impl ProviderClient for SilentProvider {
        fn download(&self, _url: &str, _destination: &Path) -> FetchResult<()> {
            Ok(())
        }
    }

    /// Provider that fails outright.
    struct FailingProvider;

    impl ProviderClient for FailingProvider {
        fn download(&self, url: &str, _destination: &Path) -> FetchResult<()> {
            Err(FetchError::DownloadFailed {
                url: url.to_string(),
                reason: "quota exceeded".to_string(),
            })
        }
    }

    #[test]
    fn test_delegates_and_reports_fetched() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("asset.bin");

        let outcome = ProviderFetcher::new(&WritingProvider)
            .fetch(&DownloadRequest::new(URL, &dest))
            .unwrap();

        assert_eq!(outcome, FetchOutcome::Fetched);
        assert_eq!(fs::read(&dest).unwrap(), b"provider payload");
    }

    #[test]
    fn test_creates_parent_directory_before_delegating() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("nested").join("asset.bin");

        ProviderFetcher::new(&WritingProvider)
            .fetch(&DownloadRequest::new(URL, &dest))
            .unwrap();

        assert!(dest.exists());
    }

    #[test]
    fn test_missing_output_is_download_failed() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("asset.bin");

        let err = ProviderFetcher::new(&SilentProvider)
            .fetch(&DownloadRequest::new(URL, &dest))
            .unwrap_err();

        match err {
            FetchError::DownloadFailed { reason, .. } => {
                assert!(reason.contains("left no file"));
            }
            other => panic!("expected DownloadFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_provider_error_propagates() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("asset.bin");

        let err = ProviderFetcher::new(&FailingProvider)
            .fetch(&DownloadRequest::new(URL, &dest))
            .unwrap_err();

        assert!(matches!(err, FetchError::DownloadFailed { .. }));
        assert!(!dest.exists());
    }
}

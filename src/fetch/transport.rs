//! HTTP transport abstraction for the download strategies.
//!
//! The strategies talk to the network through the [`HttpTransport`] trait
//! so tests can substitute a scripted transport and the embedding
//! application can inject an instrumented client.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{FetchError, FetchResult};

/// A streaming response body plus the length the server declared, if any.
pub struct HttpBody {
    /// Value of the `Content-Length` header, when the server sent one.
    pub content_length: Option<u64>,
    /// Blocking reader over the response body.
    pub reader: Box<dyn Read + Send>,
}

/// Blocking HTTP operations the download strategies need.
pub trait HttpTransport: Send + Sync {
    /// Total size of the resource, via a metadata request.
    ///
    /// `Ok(None)` means the server answered but did not report a length.
    fn content_length(&self, url: &str) -> FetchResult<Option<u64>>;

    /// Fetch the inclusive byte range `[start, end]`, failing once `timeout`
    /// elapses.
    fn get_range(&self, url: &str, start: u64, end: u64, timeout: Duration)
        -> FetchResult<Vec<u8>>;

    /// Open a full-body GET as a streaming response.
    fn get(&self, url: &str) -> FetchResult<HttpBody>;
}

/// Real transport implementation using reqwest's blocking client.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport with no client-wide timeout.
    ///
    /// Ranged downloads pass their own per-request deadline; single-shot
    /// downloads block until the server closes the stream.
    pub fn new() -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(None)
            .build()
            .map_err(|e| FetchError::HttpError(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn content_length(&self, url: &str) -> FetchResult<Option<u64>> {
        let response = self
            .client
            .head(url)
            .send()
            .map_err(|e| FetchError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(FetchError::DownloadFailed {
                url: url.to_string(),
                reason: format!("HEAD request failed with status {}", response.status()),
            });
        }

        Ok(response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok()))
    }

    fn get_range(
        &self,
        url: &str,
        start: u64,
        end: u64,
        timeout: Duration,
    ) -> FetchResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .header("Range", format!("bytes={}-{}", start, end))
            .timeout(timeout)
            .send()
            .map_err(|e| FetchError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        // 206 Partial Content is the expected answer to a Range request.
        let status = response.status();
        if !status.is_success() && status.as_u16() != 206 {
            return Err(FetchError::DownloadFailed {
                url: url.to_string(),
                reason: format!("range request failed with status {}", status),
            });
        }

        let body = response.bytes().map_err(|e| FetchError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(body.to_vec())
    }

    fn get(&self, url: &str) -> FetchResult<HttpBody> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| FetchError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::DownloadFailed {
                url: url.to_string(),
                reason: format!("GET request failed with status {}", status),
            });
        }

        Ok(HttpBody {
            content_length: response.content_length(),
            reader: Box::new(response),
        })
    }
}

//! Configuration for the download pipeline.

use std::time::Duration;

/// Default size of each range-request chunk (1 MiB).
///
/// Balances HTTP request overhead against memory footprint and resume
/// granularity: an interrupted download loses at most one chunk of
/// progress.
pub const DEFAULT_BLOCK_SIZE: u64 = 1024 * 1024;

/// Default deadline for each individual chunk request.
pub const DEFAULT_CHUNK_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the [`Downloader`](crate::Downloader).
///
/// The host prefix lists drive strategy selection and default to empty:
/// which hosts need the provider client or support byte ranges is catalog
/// knowledge that belongs to the embedding application.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// URL prefixes routed to the injected provider client.
    pub provider_prefixes: Vec<String>,

    /// URL prefixes of bulk hosts known to honor byte-range requests.
    pub ranged_prefixes: Vec<String>,

    /// Bytes requested per range chunk.
    pub block_size: u64,

    /// Deadline applied to each chunk request of a ranged download.
    ///
    /// This is the only bounded-wait contract in the pipeline; single-shot
    /// and provider downloads block without a timeout.
    pub chunk_timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            provider_prefixes: Vec::new(),
            ranged_prefixes: Vec::new(),
            block_size: DEFAULT_BLOCK_SIZE,
            chunk_timeout: DEFAULT_CHUNK_TIMEOUT,
        }
    }
}

impl FetchConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Route URLs starting with `prefix` to the provider client.
    pub fn with_provider_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.provider_prefixes.push(prefix.into());
        self
    }

    /// Route URLs starting with `prefix` to the resumable range fetcher.
    pub fn with_ranged_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ranged_prefixes.push(prefix.into());
        self
    }

    /// Set the range-request chunk size.
    pub fn with_block_size(mut self, bytes: u64) -> Self {
        self.block_size = bytes;
        self
    }

    /// Set the per-chunk request deadline.
    pub fn with_chunk_timeout(mut self, timeout: Duration) -> Self {
        self.chunk_timeout = timeout;
        self
    }
}

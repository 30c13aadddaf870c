//! AssetFetch - verified download and extraction for published assets
//!
//! This library fetches dataset and model archives over HTTP, verifies them
//! against catalog checksums, and unpacks zip, tar and tar.gz archives.
//! Downloads from bulk hosts that honor byte-range requests are chunked and
//! resumable: bytes accumulate in a durable `.part` checkpoint that survives
//! crashes and dropped connections, and a rerun continues where the last
//! attempt stopped.
//!
//! Every operation is idempotent from the caller's side. A destination file
//! that already passes its hash gate skips the download; an output directory
//! that already holds the extracted entry skips the unpack. Retrying a
//! failed pipeline therefore converges instead of redoing work.
//!
//! All I/O is synchronous and blocking; callers own any threading. The
//! crate emits structured `tracing` events but never installs a subscriber.
//!
//! # Quick start
//!
//! ```no_run
//! use assetfetch::{DownloadRequest, Downloader, FetchConfig, HashAlgorithm, Pipeline};
//!
//! let config = FetchConfig::default().with_ranged_prefix("https://bulk-sets.example.org");
//! let pipeline = Pipeline::new(Downloader::new(config)?);
//!
//! let request = DownloadRequest::new(
//!     "https://bulk-sets.example.org/Task04_Hippocampus.tar",
//!     "/data/archives/Task04_Hippocampus.tar",
//! )
//! .with_hash("9d24dba78e72977dbd1d2e110310f31b", HashAlgorithm::Md5);
//!
//! pipeline.fetch_and_extract(&request, "/data/sets".as_ref())?;
//! # Ok::<(), assetfetch::FetchError>(())
//! ```

pub mod checksum;
pub mod config;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod orchestrator;
pub mod pipeline;
pub mod progress;
pub mod request;

pub use checksum::{check_file_hash, compute_file_hash, HashAlgorithm};
pub use config::{FetchConfig, DEFAULT_BLOCK_SIZE, DEFAULT_CHUNK_TIMEOUT};
pub use error::{FetchError, FetchResult, HashOrigin};
pub use extractor::extract;
pub use fetch::{
    FetchOutcome, FetchStrategy, HttpBody, HttpTransport, ProviderClient, ReqwestTransport,
};
pub use orchestrator::Downloader;
pub use pipeline::Pipeline;
pub use progress::ProgressCallback;
pub use request::{DownloadRequest, ExtractionRequest};

//! Core downloader implementation.
//!
//! The [`Downloader`] wires the configuration to the engine: it builds the
//! HTTP transport, probes and fetches the resource range by range, drives the
//! progress bar and callbacks, and optionally saves the result to disk.
//!
//! # Examples
//!
//! ```rust,no_run
//! use rangeload::downloader::DownloaderBuilder;
//! use rangeload::download::Download;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = DownloaderBuilder::new().max_parallel_requests(4).build();
//! let download = Download::try_from("https://example.com/disk.img")?;
//!
//! let bytes = downloader.download(&download).await?;
//! println!("Downloaded {} bytes", bytes.len());
//! # Ok(())
//! # }
//! ```

use super::config::DownloaderConfig;
use crate::download::{Download, Status, Summary};
use crate::engine::{fetch_resource, ChunkScheduler, DownloadReport};
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, HttpTransport, Transport};
use crate::progress::display::ProgressDisplay;

use reqwest::header::HeaderMap;
use std::fmt;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Represents the download controller.
///
/// A downloader can be created via its builder:
///
/// ```rust
/// # fn main()  {
/// use rangeload::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().build();
/// # }
/// ```
#[derive(Clone)]
pub struct Downloader {
    config: DownloaderConfig,
}

impl Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("config", &self.config)
            .finish()
    }
}

impl Downloader {
    /// Creates a new Downloader with the given configuration.
    pub(crate) fn new(config: DownloaderConfig) -> Self {
        Self { config }
    }

    /// Gets the directory where files will be saved.
    pub fn directory(&self) -> &PathBuf {
        &self.config.directory
    }

    /// Gets the size of one range.
    pub fn chunk_size(&self) -> u64 {
        self.config.chunk_size
    }

    /// Gets the maximum number of ranges in flight.
    pub fn max_parallel_requests(&self) -> usize {
        self.config.max_parallel_requests
    }

    /// Gets the number of transport-level retries.
    pub fn retries(&self) -> u32 {
        self.config.retries
    }

    /// Gets the per-range timeout.
    pub fn chunk_timeout(&self) -> Option<Duration> {
        self.config.chunk_timeout
    }

    /// Gets the custom headers.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.config.headers.as_ref()
    }

    /// Gets whether to use range requests for content length.
    pub fn use_range_for_content_length(&self) -> bool {
        self.config.use_range_for_content_length
    }

    /// Gets whether to overwrite existing files.
    pub fn overwrite(&self) -> bool {
        self.config.overwrite
    }

    /// Gets the configured cancellation token.
    pub fn cancellation_token(&self) -> Option<&CancellationToken> {
        self.config.cancellation_token.as_ref()
    }

    /// Build the HTTP transport described by the configuration.
    pub fn transport(&self) -> Result<HttpTransport> {
        let config = HttpClientConfig {
            retries: self.config.retries,
            proxy: self.config.proxy.clone(),
            headers: self.config.headers.clone(),
        };
        HttpTransport::from_config(config, self.config.use_range_for_content_length)
    }

    /// Download `download` into memory.
    ///
    /// Uses the configured cancellation token, if any.
    pub async fn download(&self, download: &Download) -> Result<Vec<u8>> {
        let token = self.token();
        self.download_with_token(download, &token).await
    }

    /// Download `download` into memory, cancelled through `token`.
    pub async fn download_with_token(
        &self,
        download: &Download,
        token: &CancellationToken,
    ) -> Result<Vec<u8>> {
        let transport = self.transport()?;
        self.download_with(&transport, download, token)
            .await
            .map(DownloadReport::into_bytes)
    }

    /// Download `download` through an arbitrary transport.
    pub async fn download_with<T>(
        &self,
        transport: &T,
        download: &Download,
        token: &CancellationToken,
    ) -> Result<DownloadReport>
    where
        T: Transport + ?Sized,
    {
        let result = self.fetch(transport, download, token).await;
        self.complete(
            download,
            result
                .as_ref()
                .map(|report| (report.bytes.len() as u64, report.chunks)),
        );
        result
    }

    /// Download `download` and save it to `directory/filename`.
    ///
    /// When the file exists and `overwrite` is off, nothing is downloaded and
    /// the existing path is returned.
    pub async fn download_to_disk(&self, download: &Download) -> Result<PathBuf> {
        let transport = self.transport()?;
        let token = self.token();
        self.download_to_disk_with(&transport, download, &token)
            .await
    }

    /// [`download_to_disk`](Self::download_to_disk) through an arbitrary transport.
    pub async fn download_to_disk_with<T>(
        &self,
        transport: &T,
        download: &Download,
        token: &CancellationToken,
    ) -> Result<PathBuf>
    where
        T: Transport + ?Sized,
    {
        let output = self.config.directory.join(&download.filename);

        if !self.config.overwrite && output.exists() {
            debug!("{:?} already exists, skipping", output);
            let size = fs::metadata(&output).await.map(|m| m.len()).unwrap_or(0);
            let summary = Summary::new(download.clone(), size, 0).skip("the file already exists");
            self.notify(&summary);
            return Ok(output);
        }

        let result = async {
            let report = self.fetch(transport, download, token).await?;
            write_output(&output, &report.bytes).await?;
            Ok::<_, Error>((report.bytes.len() as u64, report.chunks))
        }
        .await;

        self.complete(download, result.as_ref().copied());
        result.map(|_| output)
    }

    fn token(&self) -> CancellationToken {
        self.config
            .cancellation_token
            .clone()
            .unwrap_or_default()
    }

    async fn fetch<T>(
        &self,
        transport: &T,
        download: &Download,
        token: &CancellationToken,
    ) -> Result<DownloadReport>
    where
        T: Transport + ?Sized,
    {
        let scheduler =
            ChunkScheduler::new(self.config.chunk_size, self.config.max_parallel_requests)?;
        let display = ProgressDisplay::new(&self.config.progress)?;
        let on_progress = self.config.on_progress.as_deref();
        let sink = |downloaded: u64, total: u64| {
            display.update(downloaded, total);
            if let Some(callback) = on_progress {
                callback(downloaded, total);
            }
        };

        debug!("Fetching {}", &download.url);
        let result = fetch_resource(
            transport,
            &download.url,
            &scheduler,
            self.config.chunk_timeout,
            Some(&sink),
            token,
        )
        .await;

        match &result {
            Ok(_) => display.finish(),
            Err(e) => display.abandon(e.to_string()),
        }
        result
    }

    fn complete(&self, download: &Download, outcome: std::result::Result<(u64, usize), &Error>) {
        let summary = match outcome {
            Ok((size, chunks)) => {
                Summary::new(download.clone(), size, chunks).with_status(Status::Success)
            }
            Err(e) if e.is_cancelled() => {
                Summary::new(download.clone(), 0, 0).with_status(Status::Cancelled)
            }
            Err(e) => Summary::new(download.clone(), 0, 0).fail(e),
        };
        self.notify(&summary);
    }

    fn notify(&self, summary: &Summary) {
        if let Some(ref callback) = self.config.on_complete {
            callback(summary);
        }
    }
}

async fn write_output(output: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(output_dir) = output.parent() {
        debug!("Creating destination directory {:?}", output_dir);
        fs::create_dir_all(output_dir).await?;
    }
    debug!("Writing {} bytes to {:?}", bytes.len(), output);
    fs::write(output, bytes).await?;
    Ok(())
}

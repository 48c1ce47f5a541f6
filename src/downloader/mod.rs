//! Downloader module: the configured entry point of the crate.
//!
//! - `downloader` - [`Downloader`], which runs downloads through the engine
//! - `builder` - [`DownloaderBuilder`] for flexible configuration
//! - `config` - [`DownloaderConfig`] and callback types
//!
//! # Examples
//!
//! ```rust,no_run
//! use rangeload::downloader::DownloaderBuilder;
//! use rangeload::download::Download;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let token = CancellationToken::new();
//! let downloader = DownloaderBuilder::hidden()
//!     .directory("./downloads".into())
//!     .cancellation_token(token.clone())
//!     .build();
//!
//! let download = Download::try_from("https://example.com/disk.img")?;
//! let path = downloader.download_to_disk(&download).await?;
//! println!("Saved to {:?}", path);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod downloader;

pub use builder::DownloaderBuilder;
pub use config::{DownloadCallback, DownloaderConfig};
pub use downloader::Downloader;

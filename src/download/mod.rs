//! Download module describing what is downloaded and how it ended.
//!
//! - [`download`] - The [`Download`] struct: URL and target file name
//! - [`summary`] - [`Summary`] and [`Status`] reported on completion
//!
//! # Examples
//!
//! ```rust
//! use rangeload::download::{Download, Status, Summary};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let download = Download::try_from("https://example.com/disk.img")?;
//! let summary = Summary::new(download, 1024, 1).with_status(Status::Success);
//!
//! match summary.status() {
//!     Status::Success => println!("Download completed successfully"),
//!     Status::Cancelled => println!("Download cancelled"),
//!     Status::Fail(msg) => println!("Download failed: {}", msg),
//!     _ => println!("Download skipped or not started"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod download;
pub mod summary;

pub use download::Download;
pub use summary::{Status, Summary};

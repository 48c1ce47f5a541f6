//! Example downloading one large file as concurrent byte ranges.
//!
//! Press Ctrl-C to cancel every range in flight.

use color_eyre::Result;
use rangeload::download::{Download, Status};
use rangeload::downloader::DownloaderBuilder;
use rangeload::CancellationToken;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Pass a URL as the first argument, or fetch 100 KiB from a range-aware endpoint.
    let download = match std::env::args().nth(1) {
        Some(url) => Download::try_from(url.as_str())?,
        None => Download::new(
            &reqwest::Url::parse("https://httpbin.org/range/102400")?,
            "range.bin",
        ),
    };

    let token = CancellationToken::new();
    let ctrl_c = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let downloader = DownloaderBuilder::new()
        .directory(PathBuf::from("downloads"))
        .chunk_size(16 * 1024)
        .max_parallel_requests(4)
        .overwrite(true)
        .cancellation_token(token)
        .on_complete(|summary| match summary.status() {
            Status::Success => println!(
                "{}: {} bytes in {} ranges",
                summary.download().filename,
                summary.size(),
                summary.chunks()
            ),
            Status::Cancelled => println!("{}: cancelled", summary.download().filename),
            Status::Fail(message) => println!("{}: {}", summary.download().filename, message),
            _ => {}
        })
        .build();

    let path = downloader.download_to_disk(&download).await?;
    println!("Saved to {}", path.display());

    Ok(())
}

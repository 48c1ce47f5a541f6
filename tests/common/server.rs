#![allow(dead_code)]

//! A loopback HTTP/1.1 server answering with canned responses.
//!
//! Routes, for a resource of `N` bytes:
//!
//! - `/data.bin`: `HEAD` advertises `N`; `GET` honors `Range` with a `206`
//!   and `Content-Range`, or sends the whole body with a `200`.
//! - `/no-length`: neither `HEAD` nor `GET` advertise a length.
//! - `/ignores-ranges`: `GET` always answers `200` with the whole body.
//! - `/forbidden-ranges`: `HEAD` advertises `N`; `GET` answers `403`.
//! - anything else: `404`.

use rangeload::http::HttpTransport;
use reqwest::Url;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// What the server saw of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub range: Option<String>,
}

pub struct TestServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start(data: Vec<u8>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind the test server");
        let addr = listener.local_addr().expect("Test server has no address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let data = Arc::new(data);

        let seen = requests.clone();
        let handle = tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                let seen = seen.clone();
                let data = data.clone();
                tokio::spawn(async move {
                    let _ = serve(socket, &data, &seen).await;
                });
            }
        });

        Self {
            addr,
            requests,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> Url {
        Url::parse(&format!("http://{}{}", self.addr, path)).expect("Invalid test server URL")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// `Range` headers of the `GET` requests, sorted.
    pub fn ranges_requested(&self) -> Vec<String> {
        let mut ranges: Vec<_> = self
            .requests()
            .into_iter()
            .filter(|request| request.method == "GET")
            .filter_map(|request| request.range)
            .collect();
        ranges.sort();
        ranges
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// An `HttpTransport` that never goes through a system proxy.
pub fn loopback_transport(use_range_for_content_length: bool) -> HttpTransport {
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("Failed to build the test client");
    let client = reqwest_middleware::ClientBuilder::new(client).build();
    HttpTransport::new(client, use_range_for_content_length)
}

async fn serve(
    mut socket: TcpStream,
    data: &[u8],
    seen: &Mutex<Vec<RecordedRequest>>,
) -> std::io::Result<()> {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        head.extend_from_slice(&buf[..n]);
    }

    let head = String::from_utf8_lossy(&head);
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let range = lines
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("range"))
        .map(|(_, value)| value.trim().to_string());

    seen.lock().unwrap().push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        range: range.clone(),
    });

    let response = respond(&method, &path, range.as_deref(), data);
    socket.write_all(&response).await?;
    socket.shutdown().await
}

fn respond(method: &str, path: &str, range: Option<&str>, data: &[u8]) -> Vec<u8> {
    let total = data.len() as u64;
    let head_only = method == "HEAD";

    match (path, head_only) {
        ("/data.bin", true) | ("/ignores-ranges", true) | ("/forbidden-ranges", true) => {
            response("200 OK", &[("Content-Length", total.to_string())], &[])
        }
        ("/data.bin", false) => match range.and_then(parse_range) {
            Some((start, _)) if start >= total => response(
                "416 Range Not Satisfiable",
                &[
                    ("Content-Range", format!("bytes */{}", total)),
                    ("Content-Length", "0".into()),
                ],
                &[],
            ),
            Some((start, end)) => {
                let end = end.min(total - 1);
                let body = &data[start as usize..=end as usize];
                response(
                    "206 Partial Content",
                    &[
                        ("Content-Range", format!("bytes {}-{}/{}", start, end, total)),
                        ("Content-Length", body.len().to_string()),
                    ],
                    body,
                )
            }
            None => response("200 OK", &[("Content-Length", total.to_string())], data),
        },
        ("/no-length", true) => response("200 OK", &[], &[]),
        ("/no-length", false) => response("200 OK", &[], data),
        ("/ignores-ranges", false) => {
            response("200 OK", &[("Content-Length", total.to_string())], data)
        }
        ("/forbidden-ranges", false) => {
            response("403 Forbidden", &[("Content-Length", "0".into())], &[])
        }
        _ => response("404 Not Found", &[("Content-Length", "0".into())], &[]),
    }
}

fn response(status: &str, headers: &[(&str, String)], body: &[u8]) -> Vec<u8> {
    let mut out = format!("HTTP/1.1 {}\r\nConnection: close\r\n", status);
    for (name, value) in headers {
        out.push_str(&format!("{}: {}\r\n", name, value));
    }
    out.push_str("\r\n");
    let mut out = out.into_bytes();
    out.extend_from_slice(body);
    out
}

/// Parse `bytes=start-end`.
fn parse_range(value: &str) -> Option<(u64, u64)> {
    let (start, end) = value.strip_prefix("bytes=")?.split_once('-')?;
    Some((start.trim().parse().ok()?, end.trim().parse().ok()?))
}

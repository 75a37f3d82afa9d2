//! Seisrelay Test Utilities
//!
//! An in-process HTTP sink that records every request it receives and
//! answers from a scripted status sequence. Publisher and pipeline tests
//! point their endpoint at [`MockSink::endpoint`] instead of a real
//! Fluent Bit input.
//!
//! # Usage
//!
//! ```rust,ignore
//! let sink = MockSink::start(vec![503, 200]).await?;
//! publisher.publish(payload, Classification::Quake).await?;
//! assert_eq!(sink.hits(), 2);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// One request as the sink saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Minimal scripted HTTP sink bound to an ephemeral localhost port.
pub struct MockSink {
    endpoint: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockSink {
    /// Start a sink answering with `statuses` in order; the last entry
    /// repeats for every request beyond the script.
    pub async fn start(statuses: Vec<u16>) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind mock sink")?;
        let addr = listener.local_addr().context("mock sink local addr")?;
        let requests = Arc::new(Mutex::new(Vec::new()));
        let served = Arc::new(AtomicUsize::new(0));

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let recorded = Arc::clone(&recorded);
                let statuses = statuses.clone();
                let served = Arc::clone(&served);
                tokio::spawn(async move {
                    let _ = serve_connection(stream, &statuses, &served, &recorded).await;
                });
            }
        });

        Ok(Self {
            endpoint: format!("http://{addr}/"),
            requests,
        })
    }

    /// Sink that answers every request with 200.
    pub async fn ok() -> Result<Self> {
        Self::start(vec![200]).await
    }

    /// Endpoint with trailing slash, ready for the publisher config.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Number of requests fully received so far.
    pub fn hits(&self) -> usize {
        self.requests.lock().expect("mock sink lock").len()
    }

    /// Snapshot of every recorded request.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("mock sink lock").clone()
    }
}

async fn serve_connection(
    mut stream: TcpStream,
    statuses: &[u16],
    served: &AtomicUsize,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> Result<()> {
    let request = read_request(&mut stream).await?;
    let index = served.fetch_add(1, Ordering::SeqCst);
    let status = statuses
        .get(index)
        .or_else(|| statuses.last())
        .copied()
        .unwrap_or(200);
    recorded.lock().expect("mock sink lock").push(request);

    let reason = match status {
        200 => "OK",
        204 => "No Content",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Response",
    };
    let response =
        format!("HTTP/1.1 {status} {reason}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n");
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

async fn read_request(stream: &mut TcpStream) -> Result<RecordedRequest> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = find_header_end(&buffer) {
            break pos;
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            bail!("connection closed before headers were complete");
        }
        buffer.extend_from_slice(&chunk[..n]);
    };

    let header_text = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = header_text.lines();
    let request_line = lines.next().unwrap_or_default();
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    let mut content_type = None;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();
        match name.to_ascii_lowercase().as_str() {
            "content-length" => content_length = value.parse().unwrap_or(0),
            "content-type" => content_type = Some(value.to_string()),
            _ => {}
        }
    }

    let mut body = buffer[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    body.truncate(content_length);

    Ok(RecordedRequest {
        method,
        path,
        content_type,
        body,
    })
}

fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

//! Helpers shared by the HTTP backed sources.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use crate::outcome::{FailureKind, Outcome};

const USER_AGENT: &str = concat!("scout/", env!("CARGO_PKG_VERSION"));

/// Client with a hard per-request timeout; a source never waits unbounded.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .user_agent(USER_AGENT)
        .build()
}

/// Maps a transport level error onto the failure taxonomy.
pub fn classify(source: &str, err: reqwest::Error) -> Outcome {
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else if err.is_decode() {
        FailureKind::MalformedResponse
    } else {
        FailureKind::TransportError
    };
    Outcome::failure(kind, format!("{source} request failed: {err}"))
}

/// Reads the whole body, keeping the status next to it.
pub async fn read_body(source: &str, response: Response) -> Result<(StatusCode, String), Outcome> {
    let status = response.status();
    match response.text().await {
        Ok(body) => Ok((status, body)),
        Err(e) => Err(classify(source, e)),
    }
}

/// First characters of a body, for error messages.
pub fn excerpt(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

pub fn bad_status(source: &str, status: StatusCode, body: &str) -> Outcome {
    let detail = excerpt(body);
    let message = if detail.is_empty() {
        format!("{source} answered {status}")
    } else {
        format!("{source} answered {status}: {detail}")
    };
    Outcome::failure(FailureKind::BadStatus, message)
}

/// A one-connection HTTP server for exercising the sources without network access.
#[cfg(test)]
pub(crate) mod stub {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serves a single canned response and hands back the raw request.
    pub async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status} STUB\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request
        });

        (base, handle)
    }

    /// Accepts a connection and never answers.
    pub async fn serve_silence() -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            std::future::pending::<()>().await;
        });

        (base, handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut buf: Vec<u8> = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                return String::from_utf8_lossy(&buf).into_owned();
            }
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find(&buf, b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length: usize = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }

        String::from_utf8_lossy(&buf).into_owned()
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }
}

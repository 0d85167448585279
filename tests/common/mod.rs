//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use httpstat_probe::config::{ClientConfig, TimeoutConfig};
use httpstat_probe::transport::{HyperTransport, ReqwestTransport, Transport};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// A raw-TCP HTTP backend that records request lines.
pub struct MockBackend {
    pub addr: SocketAddr,
    request_lines: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockBackend {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Request lines seen so far, e.g. "GET /200 HTTP/1.1".
    pub fn request_lines(&self) -> Vec<String> {
        self.request_lines.lock().unwrap().clone()
    }
}

fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        404 => "404 Not Found",
        418 => "418 I'm a teapot",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "500 Internal Server Error",
    }
}

/// Start a programmable backend; `respond` maps the request path to a status.
pub async fn start_programmable_backend<F>(respond: F) -> MockBackend
where
    F: Fn(&str) -> u16 + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let request_lines = Arc::new(Mutex::new(Vec::new()));
    let respond = Arc::new(respond);

    let lines = request_lines.clone();
    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let lines = lines.clone();
                    let respond = respond.clone();
                    tokio::spawn(async move {
                        let (read_half, mut write_half) = socket.into_split();
                        let mut reader = BufReader::new(read_half);

                        let mut request_line = String::new();
                        if reader.read_line(&mut request_line).await.is_err() {
                            return;
                        }
                        // Drain headers up to the blank line
                        loop {
                            let mut header = String::new();
                            match reader.read_line(&mut header).await {
                                Ok(0) | Err(_) => break,
                                Ok(_) if header == "\r\n" => break,
                                Ok(_) => {}
                            }
                        }

                        let request_line = request_line.trim_end().to_string();
                        let path = request_line.split(' ').nth(1).unwrap_or("").to_string();
                        lines.lock().unwrap().push(request_line);

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                            status_line(respond(&path)),
                        );
                        let _ = write_half.write_all(response.as_bytes()).await;
                        let _ = write_half.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    MockBackend {
        addr,
        request_lines,
    }
}

/// httpstat-style backend: `/NNN` answers with status NNN.
#[allow(dead_code)]
pub async fn start_status_backend() -> MockBackend {
    start_programmable_backend(|path| {
        path.trim_start_matches('/').parse().unwrap_or(404)
    })
    .await
}

/// A base URL on a local port nothing is listening on.
#[allow(dead_code)]
pub fn refused_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Both collaborators, bound to `base_url`.
#[allow(dead_code)]
pub fn transports(base_url: &str) -> Vec<(&'static str, Arc<dyn Transport>)> {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    vec![
        (
            "reqwest",
            Arc::new(ReqwestTransport::with_client(base_url, client)) as Arc<dyn Transport>,
        ),
        (
            "hyper",
            Arc::new(
                HyperTransport::new(base_url, &ClientConfig::default(), &TimeoutConfig::default())
                    .unwrap(),
            ) as Arc<dyn Transport>,
        ),
    ]
}

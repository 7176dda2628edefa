//! HTTP transport for smoke checks.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

/// Status and raw body of a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one request and returns whatever came back.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Errors only when no response was received at all; non-2xx statuses
    /// are returned as responses.
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<TransportResponse, String>;
}

/// `reqwest`-backed transport with a fixed per-request timeout.
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<TransportResponse, String> {
        let mut request = self.client.request(method, url).timeout(self.timeout);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                format!("timed out after {}s", self.timeout.as_secs())
            } else {
                e.to_string()
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| e.to_string())?;
        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// One-shot local server: records the raw request, sends a canned reply.
    async fn serve_once(status: u16, body: &'static str) -> (String, Arc<Mutex<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let captured = Arc::new(Mutex::new(String::new()));
        let seen = captured.clone();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).into_owned();
                if let Some((head, rest)) = text.split_once("\r\n\r\n") {
                    let length = head
                        .lines()
                        .filter_map(|line| line.split_once(':'))
                        .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if rest.len() >= length {
                        *seen.lock().unwrap() = text;
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {} Canned\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        (format!("http://{}", addr), captured)
    }

    #[tokio::test]
    async fn test_returns_status_and_body_for_error_status() {
        let (base, captured) = serve_once(422, r#"{"detail":"query too short"}"#).await;
        let transport = ReqwestTransport::new(Duration::from_secs(5));
        let body = json!({"query": "x", "n_results": 3});

        let response = transport
            .send(Method::POST, &format!("{}/query", base), Some(&body))
            .await
            .unwrap();

        assert_eq!(
            response,
            TransportResponse {
                status: 422,
                body: r#"{"detail":"query too short"}"#.to_string(),
            }
        );
        let request = captured.lock().unwrap().clone();
        assert!(request.starts_with("POST /query "));
        let (_, sent) = request.split_once("\r\n\r\n").unwrap();
        assert_eq!(serde_json::from_str::<Value>(sent).unwrap(), body);
    }

    #[tokio::test]
    async fn test_post_without_body() {
        let (base, captured) = serve_once(200, r#"{"seeded":false,"count":7}"#).await;
        let transport = ReqwestTransport::new(Duration::from_secs(5));

        let response = transport
            .send(Method::POST, &format!("{}/seed", base), None)
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"seeded":false,"count":7}"#);
        assert!(captured.lock().unwrap().starts_with("POST /seed "));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_error() {
        let transport = ReqwestTransport::new(Duration::from_secs(2));
        let result = transport
            .send(Method::POST, "http://127.0.0.1:9/seed", None)
            .await;
        assert!(result.is_err());
    }
}

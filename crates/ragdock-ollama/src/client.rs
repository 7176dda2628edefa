//! HTTP client for the Ollama runtime API.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::OllamaError;
use crate::host::normalize_base_url;
use crate::modelfile::Modelfile;
use crate::pull::{LineBuffer, PullProgress, PullStatus};
use crate::DEFAULT_OLLAMA_URL;

/// Per-request timeout for readiness checks.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

/// Ollama API client.
#[derive(Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
}

/// Request to Ollama pull API.
#[derive(Debug, Serialize)]
struct PullRequest<'a> {
    model: &'a str,
    stream: bool,
}

/// Request to Ollama create API.
#[derive(Debug, Serialize)]
struct CreateRequest<'a> {
    model: &'a str,
    #[serde(flatten)]
    modelfile: &'a Modelfile,
    stream: bool,
}

/// Response from Ollama create API (non-streaming).
#[derive(Debug, Deserialize)]
struct CreateResponse {
    #[serde(default)]
    error: Option<String>,
}

/// Response from Ollama tags API (list models).
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    name: String,
}

impl OllamaClient {
    /// Create a new client against the default local server.
    pub fn new() -> Self {
        Self::with_url(DEFAULT_OLLAMA_URL)
    }

    /// Create a new client with a custom URL or `host:port`.
    pub fn with_url(base_url: impl AsRef<str>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: normalize_base_url(base_url.as_ref()),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> OllamaError {
        if e.is_connect() || e.is_timeout() {
            OllamaError::ServerNotRunning(self.base_url.clone())
        } else {
            OllamaError::Http(e)
        }
    }

    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, OllamaError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(OllamaError::Api {
            status: status.as_u16(),
            body,
        })
    }

    /// Check whether the server answers `/api/tags` with a 2xx status.
    pub async fn check_health(&self) -> Result<(), OllamaError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(OllamaError::ServerNotRunning(self.base_url.clone()))
        }
    }

    /// List installed model names.
    pub async fn list_models(&self) -> Result<Vec<String>, OllamaError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::ensure_success(response).await?;

        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Pull a model from the registry, following the streamed status lines.
    ///
    /// Pulling a model that is already present is cheap: the server checks
    /// the manifest and reports success.
    pub async fn pull_model(&self, model: &str, show_progress: bool) -> Result<(), OllamaError> {
        let url = format!("{}/api/pull", self.base_url);
        info!("Pulling model '{}' from {}", model, self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&PullRequest {
                model,
                stream: true,
            })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::ensure_success(response).await?;

        let mut progress = PullProgress::new(show_progress);
        let mut buffer = LineBuffer::new();
        let mut stream = response.bytes_stream();
        let mut succeeded = false;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            for line in buffer.push(&chunk) {
                succeeded |= apply_status(model, &line, &mut progress)?;
            }
        }
        if let Some(line) = buffer.finish() {
            succeeded |= apply_status(model, &line, &mut progress)?;
        }

        if !succeeded {
            progress.finish("pull incomplete");
            return Err(OllamaError::PullIncomplete(model.to_string()));
        }

        progress.finish("pull complete");
        info!("Model '{}' is present", model);
        Ok(())
    }

    /// Create a model from a Modelfile on disk.
    ///
    /// The file is parsed locally and sent as structured fields.
    pub async fn create_model(&self, name: &str, modelfile: &Path) -> Result<(), OllamaError> {
        let contents =
            tokio::fs::read_to_string(modelfile)
                .await
                .map_err(|source| OllamaError::Modelfile {
                    path: modelfile.to_path_buf(),
                    source,
                })?;
        let parsed = Modelfile::parse(&contents)?;

        let url = format!("{}/api/create", self.base_url);
        info!("Creating model '{}' from {}", name, modelfile.display());

        let response = self
            .client
            .post(&url)
            .json(&CreateRequest {
                model: name,
                modelfile: &parsed,
                stream: false,
            })
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let response = Self::ensure_success(response).await?;

        let status = response.status().as_u16();
        let created: CreateResponse = response.json().await?;
        if let Some(error) = created.error {
            return Err(OllamaError::Api {
                status,
                body: error,
            });
        }

        Ok(())
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply one pull status line. Returns `true` on the success marker.
fn apply_status(model: &str, line: &str, progress: &mut PullProgress) -> Result<bool, OllamaError> {
    let status: PullStatus = serde_json::from_str(line)?;

    if let Some(message) = status.error {
        progress.finish("pull failed");
        return Err(OllamaError::PullFailed {
            model: model.to_string(),
            message,
        });
    }

    debug!("pull {}: {:?}", model, status.status);
    progress.update(&status);
    Ok(status.is_success())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    type Requests = Arc<Mutex<Vec<String>>>;

    /// Local HTTP server answering every request with the same response.
    async fn serve(status: u16, body: &'static str) -> (String, Requests) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests: Requests = Arc::default();
        let seen = requests.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let request = read_request(&mut socket).await;
                seen.lock().unwrap().push(request);
                let response = format!(
                    "HTTP/1.1 {} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), requests)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap_or(0);
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let length = text[..head_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn request_body(requests: &Requests, index: usize) -> Value {
        let requests = requests.lock().unwrap();
        let (_, body) = requests[index].split_once("\r\n\r\n").unwrap();
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_default_url() {
        let client = OllamaClient::new();
        assert_eq!(client.base_url(), DEFAULT_OLLAMA_URL);
    }

    #[test]
    fn test_custom_url() {
        let client = OllamaClient::with_url("ollama:11434/");
        assert_eq!(client.base_url(), "http://ollama:11434");
    }

    #[test]
    fn test_apply_status_lines() {
        let mut progress = PullProgress::new(false);
        assert!(!apply_status("m", r#"{"status":"pulling manifest"}"#, &mut progress).unwrap());
        assert!(apply_status("m", r#"{"status":"success"}"#, &mut progress).unwrap());

        let err = apply_status("m", r#"{"error":"file does not exist"}"#, &mut progress);
        assert!(matches!(
            err,
            Err(OllamaError::PullFailed { ref message, .. }) if message == "file does not exist"
        ));
    }

    #[tokio::test]
    async fn test_create_reports_missing_modelfile() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("Modelfile");
        // Unroutable port: the Modelfile read fails before any request is made.
        let client = OllamaClient::with_url("http://127.0.0.1:9");

        let result = client.create_model("derived", &missing).await;
        assert!(matches!(result, Err(OllamaError::Modelfile { .. })));
    }

    #[tokio::test]
    async fn test_health_follows_status() {
        let (up, requests) = serve(200, r#"{"models":[]}"#).await;
        OllamaClient::with_url(&up).check_health().await.unwrap();
        assert!(requests.lock().unwrap()[0].starts_with("GET /api/tags "));

        let (down, _) = serve(503, "starting").await;
        let err = OllamaClient::with_url(&down).check_health().await.unwrap_err();
        assert!(matches!(err, OllamaError::ServerNotRunning(ref url) if *url == down));
    }

    #[tokio::test]
    async fn test_list_models() {
        let (url, _) = serve(
            200,
            r#"{"models":[{"name":"qwen2.5-coder:1.5b"},{"name":"qwen2.5-fastapi-python:latest"}]}"#,
        )
        .await;

        let models = OllamaClient::with_url(&url).list_models().await.unwrap();
        assert_eq!(
            models,
            vec!["qwen2.5-coder:1.5b", "qwen2.5-fastapi-python:latest"]
        );
    }

    #[tokio::test]
    async fn test_error_status_maps_to_api_error() {
        let (url, _) = serve(500, "boom").await;

        let err = OllamaClient::with_url(&url).list_models().await.unwrap_err();
        assert!(matches!(
            err,
            OllamaError::Api { status: 500, ref body } if body == "boom"
        ));
    }

    #[tokio::test]
    async fn test_pull_success() {
        let (url, requests) = serve(
            200,
            "{\"status\":\"pulling manifest\"}\n{\"status\":\"verifying sha256 digest\"}\n{\"status\":\"success\"}\n",
        )
        .await;

        OllamaClient::with_url(&url)
            .pull_model("base:1b", false)
            .await
            .unwrap();
        assert_eq!(
            request_body(&requests, 0),
            json!({"model": "base:1b", "stream": true})
        );
    }

    #[tokio::test]
    async fn test_pull_without_success_is_incomplete() {
        let (url, _) = serve(200, "{\"status\":\"pulling manifest\"}\n").await;

        let err = OllamaClient::with_url(&url)
            .pull_model("base:1b", false)
            .await
            .unwrap_err();
        assert!(matches!(err, OllamaError::PullIncomplete(ref model) if model == "base:1b"));
    }

    #[tokio::test]
    async fn test_pull_error_line_fails() {
        let (url, _) = serve(
            200,
            "{\"status\":\"pulling manifest\"}\n{\"error\":\"pull model manifest: file does not exist\"}\n",
        )
        .await;

        let err = OllamaClient::with_url(&url)
            .pull_model("missing:1b", false)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OllamaError::PullFailed { ref model, ref message }
                if model == "missing:1b" && message.contains("file does not exist")
        ));
    }

    #[tokio::test]
    async fn test_create_sends_structured_modelfile() {
        let (url, requests) = serve(200, r#"{"status":"success"}"#).await;
        let modelfile = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../Modelfile");

        OllamaClient::with_url(&url)
            .create_model("qwen2.5-fastapi-python", &modelfile)
            .await
            .unwrap();

        let body = request_body(&requests, 0);
        assert_eq!(body["model"], "qwen2.5-fastapi-python");
        assert_eq!(body["from"], "qwen2.5-coder:1.5b");
        assert_eq!(body["stream"], false);
        assert_eq!(body["parameters"], json!({"temperature": 0.2, "num_ctx": 8192}));
        assert!(body["system"]
            .as_str()
            .unwrap()
            .starts_with("You write production-quality FastAPI"));
        assert!(body.get("modelfile").is_none());
    }

    #[tokio::test]
    async fn test_create_error_body_on_200() {
        let (url, _) = serve(200, r#"{"error":"model 'derived' already exists"}"#).await;
        let dir = tempfile::tempdir().unwrap();
        let modelfile = dir.path().join("Modelfile");
        std::fs::write(&modelfile, "FROM base:1b\n").unwrap();

        let err = OllamaClient::with_url(&url)
            .create_model("derived", &modelfile)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OllamaError::Api { status: 200, ref body } if body.contains("already exists")
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_modelfile_before_sending() {
        let (url, requests) = serve(200, r#"{"status":"success"}"#).await;
        let dir = tempfile::tempdir().unwrap();
        let modelfile = dir.path().join("Modelfile");
        std::fs::write(&modelfile, "SYSTEM no base model\n").unwrap();

        let err = OllamaClient::with_url(&url)
            .create_model("derived", &modelfile)
            .await
            .unwrap_err();
        assert!(matches!(err, OllamaError::InvalidModelfile(_)));
        assert!(requests.lock().unwrap().is_empty());
    }
}

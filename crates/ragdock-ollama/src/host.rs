//! Base URL handling for `OLLAMA_HOST`-style values.

/// Normalize a host value into a base URL.
///
/// Ollama accepts bare `host:port` in `OLLAMA_HOST`, so a missing scheme
/// gets `http://` prepended. Trailing slashes are dropped so paths can be
/// appended with `format!("{}/api/..", base)`.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

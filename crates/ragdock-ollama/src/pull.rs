//! Streaming `/api/pull` status handling.

use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;

/// One NDJSON line from the pull stream.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct PullStatus {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub digest: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub completed: Option<u64>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PullStatus {
    /// Whether this line is the terminal success marker.
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }
}

/// Splits a chunked byte stream into newline-terminated lines.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every line it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line).trim().to_string();
            if !text.is_empty() {
                lines.push(text);
            }
        }
        lines
    }

    /// Return whatever is left once the stream has ended.
    pub fn finish(self) -> Option<String> {
        let text = String::from_utf8_lossy(&self.pending).trim().to_string();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Progress display for a pull, one bar per layer digest.
pub(crate) struct PullProgress {
    bar: Option<ProgressBar>,
    digest: Option<String>,
}

impl PullProgress {
    pub(crate) fn new(enabled: bool) -> Self {
        let bar = enabled.then(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb
        });
        Self { bar, digest: None }
    }

    pub(crate) fn update(&mut self, status: &PullStatus) {
        let Some(bar) = &self.bar else {
            return;
        };

        if let (Some(total), Some(digest)) = (status.total, &status.digest) {
            if self.digest.as_ref() != Some(digest) {
                self.digest = Some(digest.clone());
                bar.set_length(total);
                bar.set_position(0);
                bar.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                        .unwrap_or_else(|_| ProgressStyle::default_bar())
                        .progress_chars("#>-"),
                );
            }
            bar.set_position(status.completed.unwrap_or(0));
        }

        if let Some(msg) = &status.status {
            bar.set_message(msg.clone());
        }
    }

    pub(crate) fn finish(&self, message: &'static str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message);
        }
    }
}

use std::path::PathBuf;

use thiserror::Error;

/// Longest slice of an upstream response body kept in an error message.
pub const MAX_BODY_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{operation}: transport error: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{operation}: HTTP status {status} | response: {body}")]
    HttpStatus {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("{operation}: invalid JSON ({message}){}", body_suffix(.body))]
    Parse {
        operation: &'static str,
        message: String,
        body: Option<String>,
    },

    #[error("{operation}: missing `{field}` in response: {body}")]
    MissingField {
        operation: &'static str,
        field: &'static str,
        body: String,
    },

    #[error("{operation}: persist catalog document {}: {source}", .path.display())]
    Persist {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::HttpStatus { .. } => "http_status",
            Self::Parse { .. } => "parse",
            Self::MissingField { .. } => "missing_field",
            Self::Persist { .. } => "persist",
        }
    }
}

fn body_suffix(body: &Option<String>) -> String {
    match body {
        Some(body) => format!(" | response: {body}"),
        None => String::new(),
    }
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("catalog document not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("failed to parse catalog document {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read catalog document {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Cuts `body` down to [`MAX_BODY_PREVIEW_CHARS`] characters.
pub fn body_preview(body: &str) -> String {
    body.chars().take(MAX_BODY_PREVIEW_CHARS).collect()
}

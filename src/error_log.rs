use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::Local;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Append-only, line-oriented failure log (`[timestamp] message`).
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, message: &str) -> anyhow::Result<()> {
        let line = format_line(&Local::now().format(TIMESTAMP_FORMAT).to_string(), message);

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create error log dir: {}", parent.display()))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open error log: {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("append error log: {}", self.path.display()))?;

        Ok(())
    }

    /// Records `message`; a failing log write is reported through tracing only.
    pub fn record(&self, message: &str) {
        if let Err(err) = self.append(message) {
            tracing::warn!(path = %self.path.display(), ?err, "failed to append error log");
        }
    }
}

fn format_line(timestamp: &str, message: &str) -> String {
    // Keep one failure per line even when upstream bodies contain newlines.
    let message = message.replace(['\r', '\n'], " ");
    format!("[{timestamp}] {message}\n")
}

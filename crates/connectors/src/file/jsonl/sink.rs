use crate::{error::SinkError, sink::LogSink};
use async_trait::async_trait;
use model::records::record::LogRecord;
use std::path::{Path, PathBuf};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};
use tracing::info;

/// Appends records to a file, one compact JSON object per line.
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonLinesSink { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> SinkError {
        SinkError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl LogSink for JsonLinesSink {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn append(&self, records: &[LogRecord]) -> Result<usize, SinkError> {
        if records.is_empty() {
            info!("Wrote 0 logs to {}.", self.path.display());
            return Ok(0);
        }

        // Serialize everything first so a bad record never leaves a partial batch.
        let mut buf = Vec::new();
        for record in records {
            serde_json::to_writer(&mut buf, record)?;
            buf.push(b'\n');
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(&buf).await.map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))?;

        info!("Wrote {} logs to {}.", records.len(), self.path.display());
        Ok(records.len())
    }
}

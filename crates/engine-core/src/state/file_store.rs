use crate::{
    error::StateError,
    state::{RunStateStore, StateKey},
};
use async_trait::async_trait;
use model::core::timestamp::Timestamp;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

/// Keeps each marker as a single timestamp in a small text file.
///
/// The shared marker lives at the configured path; a per-log-type marker
/// lives next to it as `<path>.<log type>`.
#[derive(Debug, Clone)]
pub struct FileRunStateStore {
    path: PathBuf,
}

impl FileRunStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileRunStateStore { path: path.into() }
    }

    pub fn path_for(&self, key: StateKey) -> PathBuf {
        match key {
            StateKey::Shared => self.path.clone(),
            StateKey::LogType(log_type) => suffixed(&self.path, log_type.as_str()),
        }
    }
}

fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

#[async_trait]
impl RunStateStore for FileRunStateStore {
    async fn load(&self, key: StateKey) -> Result<Option<Timestamp>, StateError> {
        let path = self.path_for(key);

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(%key, "File {} not found when reading latest time stamp.", path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(StateError::Read {
                    path: path.display().to_string(),
                    source,
                });
            }
        };

        let parsed = std::str::from_utf8(&bytes)
            .map_err(|e| e.to_string())
            .and_then(|text| Timestamp::parse(text).map_err(|e| e.to_string()));

        match parsed {
            Ok(ts) => {
                info!(%key, "Read {} from {}", ts, path.display());
                Ok(Some(ts))
            }
            Err(reason) => {
                warn!(%key, %reason, "Ignoring unreadable run state in {}", path.display());
                Ok(None)
            }
        }
    }

    async fn save(&self, key: StateKey, at: Timestamp) -> Result<(), StateError> {
        let path = self.path_for(key);
        let write_err = |source| StateError::Write {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        // Rename over the target so a crash never leaves a half-written marker.
        let tmp = suffixed(&path, "tmp");
        tokio::fs::write(&tmp, at.to_string())
            .await
            .map_err(write_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(write_err)?;

        info!(%key, "Wrote {} to {}", at, path.display());
        Ok(())
    }
}

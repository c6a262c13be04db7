//! `AssetStore` backed by a local directory.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use launchpad_core::error::{CoreError, CoreResult};
use launchpad_core::traits::AssetStore;

/// Stores each asset key as a file path relative to `root`.
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key onto the filesystem, refusing anything that escapes `root`.
    fn resolve(&self, key: &str) -> CoreResult<PathBuf> {
        let relative = Path::new(key.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(CoreError::ValidationError(format!(
                "Invalid asset key: {key}"
            )));
        }
        Ok(self.root.join(relative))
    }
}

fn io_error(action: &str, path: &Path, e: &std::io::Error) -> CoreError {
    CoreError::StorageError(format!("Failed to {action} {}: {e}", path.display()))
}

/// Number of regular files below `dir`.
async fn count_files(dir: &Path) -> CoreResult<usize> {
    let mut count = 0;
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        let mut entries = tokio::fs::read_dir(&current)
            .await
            .map_err(|e| io_error("read", &current, &e))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error("read", &current, &e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| io_error("inspect", &entry.path(), &e))?;
            if file_type.is_dir() {
                pending.push(entry.path());
            } else {
                count += 1;
            }
        }
    }
    Ok(count)
}

#[async_trait]
impl AssetStore for FsAssetStore {
    async fn delete(&self, key: &str) -> CoreResult<()> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                log::debug!("Removed asset {key}");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error("remove", &path, &e)),
        }
    }

    async fn delete_prefix(&self, prefix: &str) -> CoreResult<usize> {
        let (dir_part, name_part) = match prefix.rfind('/') {
            Some(idx) => (&prefix[..idx], &prefix[idx + 1..]),
            None => ("", prefix),
        };
        let dir = if dir_part.is_empty() {
            self.root.clone()
        } else {
            self.resolve(dir_part)?
        };
        if dir == self.root && name_part.is_empty() {
            return Err(CoreError::ValidationError(
                "Refusing to delete every asset".to_string(),
            ));
        }

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(io_error("read", &dir, &e)),
        };

        let mut removed = 0;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error("read", &dir, &e))?
        {
            if !entry.file_name().to_string_lossy().starts_with(name_part) {
                continue;
            }
            let path = entry.path();
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| io_error("inspect", &path, &e))?;
            if file_type.is_dir() {
                removed += count_files(&path).await?;
                tokio::fs::remove_dir_all(&path)
                    .await
                    .map_err(|e| io_error("remove", &path, &e))?;
            } else {
                tokio::fs::remove_file(&path)
                    .await
                    .map_err(|e| io_error("remove", &path, &e))?;
                removed += 1;
            }
        }

        if name_part.is_empty() {
            if let Err(e) = tokio::fs::remove_dir(&dir).await {
                log::debug!("Leaving asset directory {}: {e}", dir.display());
            }
        }

        log::debug!("Removed {removed} asset(s) under {prefix}");
        Ok(removed)
    }
}

//! `SiteBundleSource` reading prebuilt sites from disk.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use launchpad_core::error::{CoreError, CoreResult};
use launchpad_core::traits::SiteBundleSource;
use launchpad_core::types::{Domain, SiteBundle, SiteFile};

/// Looks for `<root>/<domain name>/` and bundles every file below it.
pub struct FsSiteBundles {
    root: PathBuf,
}

impl FsSiteBundles {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl SiteBundleSource for FsSiteBundles {
    async fn bundle_for(&self, domain: &Domain) -> CoreResult<Option<SiteBundle>> {
        let site_root = self.root.join(&domain.name);
        let read_err =
            |e: std::io::Error| CoreError::StorageError(format!("Failed to read site bundle: {e}"));

        let mut files = Vec::new();
        let mut pending = vec![site_root.clone()];
        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound && dir == site_root => {
                    return Ok(None);
                }
                Err(e) => return Err(read_err(e)),
            };
            while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
                let path = entry.path();
                if entry.file_type().await.map_err(read_err)?.is_dir() {
                    pending.push(path);
                    continue;
                }
                let Ok(relative) = path.strip_prefix(&site_root) else {
                    continue;
                };
                let relative = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                let contents = tokio::fs::read(&path).await.map_err(read_err)?;
                files.push(SiteFile {
                    path: relative,
                    contents,
                });
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        log::debug!("Bundled {} file(s) for {}", files.len(), domain.name);
        Ok(Some(SiteBundle { files }))
    }
}

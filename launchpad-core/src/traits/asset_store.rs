//! Blob 存储抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;

/// Object storage for derived artifacts (screenshots).
///
/// 平台实现:
/// - App: `FsAssetStore` (local directory)
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Remove one object. Missing keys are not an error.
    async fn delete(&self, key: &str) -> CoreResult<()>;

    /// Remove every object under `prefix`.
    ///
    /// # Returns
    /// Number of removed objects
    async fn delete_prefix(&self, prefix: &str) -> CoreResult<usize>;
}

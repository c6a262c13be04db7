//! 域名持久化抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::Domain;

/// 域名仓库 Trait
///
/// 平台实现:
/// - App: `SqliteStore` (`SeaORM`)
/// - Tests: `MemoryStore`
#[async_trait]
pub trait DomainRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Domain>>;

    /// Look up by normalized name.
    async fn find_by_name(&self, name: &str) -> CoreResult<Option<Domain>>;

    async fn find_all(&self) -> CoreResult<Vec<Domain>>;

    /// 保存域名（全量写入，存在则覆盖）
    async fn save(&self, domain: &Domain) -> CoreResult<()>;

    /// 删除域名
    ///
    /// # Returns
    /// * `true` - a record was removed
    /// * `false` - no such record
    async fn delete(&self, id: &str) -> CoreResult<bool>;
}

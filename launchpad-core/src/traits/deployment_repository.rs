//! 部署记录持久化抽象 Trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CoreResult;
use crate::types::{AttemptStatus, DeploymentLogEntry, DomainDeployment};

/// 部署记录仓库 Trait
///
/// 平台实现:
/// - App: `SqliteStore` (`SeaORM`, transactional `begin_deployment`)
/// - Tests: `MemoryStore`
#[async_trait]
pub trait DeploymentRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<DomainDeployment>>;

    /// Newest attempt for a domain.
    async fn find_latest(&self, domain_id: &str) -> CoreResult<Option<DomainDeployment>>;

    /// All attempts for a domain, newest first.
    async fn find_by_domain(&self, domain_id: &str) -> CoreResult<Vec<DomainDeployment>>;

    /// Attempts in `pending` or `deploying`, oldest first.
    async fn find_in_flight(&self) -> CoreResult<Vec<DomainDeployment>>;

    /// 保存部署记录（全量写入）
    async fn save(&self, deployment: &DomainDeployment) -> CoreResult<()>;

    /// Append one log line without rewriting the rest of the document.
    async fn append_log(&self, id: &str, entry: &DeploymentLogEntry) -> CoreResult<()>;

    /// Set the attempt status (and `completed_at` for terminal states).
    async fn set_status(
        &self,
        id: &str,
        status: AttemptStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> CoreResult<()>;

    /// Atomically insert `deployment` and flip its domain to `deploying`.
    ///
    /// Nothing is written when the domain is already `deploying`.
    ///
    /// # Returns
    /// * `true` - the attempt was recorded
    /// * `false` - another attempt is in flight
    ///
    /// # Errors
    /// `DomainNotFound` when `deployment.domain_id` does not exist.
    async fn begin_deployment(&self, deployment: &DomainDeployment) -> CoreResult<bool>;

    /// Delete terminal attempts beyond the newest `keep` for a domain.
    ///
    /// # Returns
    /// Number of removed attempts
    async fn prune_history(&self, domain_id: &str, keep: usize) -> CoreResult<usize>;

    /// 删除域名的全部部署记录
    async fn delete_by_domain(&self, domain_id: &str) -> CoreResult<usize>;
}

//! 业务逻辑服务层

mod batch_runner;
mod deployment_log;
mod deployment_monitor;
mod deployment_orchestrator;
mod dns_reconciler;
mod hosting_registrar;
mod job_queue;
mod teardown_orchestrator;
mod zone_resolver;

pub use batch_runner::BatchRunner;
pub use deployment_log::DeploymentLog;
pub use deployment_monitor::DeploymentMonitor;
pub use deployment_orchestrator::{DeploymentOrchestrator, ALREADY_IN_PROGRESS};
pub use dns_reconciler::DnsReconciler;
pub use hosting_registrar::HostingRegistrar;
pub use job_queue::TokioJobQueue;
pub use teardown_orchestrator::TeardownOrchestrator;
pub use zone_resolver::{ZoneResolution, ZoneResolver, ZoneSource};

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use launchpad_provider::{DnsProvider, EdgeWorkerApi, HostingPlatform};

use crate::config::OrchestratorConfig;
use crate::error::{CoreError, CoreResult};
use crate::traits::{
    AssetStore, DeploymentRepository, DomainRepository, LandingPageRepository, SiteBundleSource,
};
use crate::types::{AttemptStatus, Domain};

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入存储实现和外部服务客户端。
pub struct ServiceContext {
    /// 域名仓库
    pub domain_repository: Arc<dyn DomainRepository>,
    /// 部署记录仓库
    pub deployment_repository: Arc<dyn DeploymentRepository>,
    /// 落地页仓库
    pub landing_page_repository: Arc<dyn LandingPageRepository>,
    /// DNS 提供商
    pub dns_provider: Arc<dyn DnsProvider>,
    /// 托管平台
    pub hosting_platform: Arc<dyn HostingPlatform>,
    /// Edge worker API（可选）
    pub edge_workers: Option<Arc<dyn EdgeWorkerApi>>,
    /// Blob 存储（可选）
    pub asset_store: Option<Arc<dyn AssetStore>>,
    /// 直接上传的站点包来源（可选）
    pub site_bundles: Option<Arc<dyn SiteBundleSource>>,
    pub config: OrchestratorConfig,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        domain_repository: Arc<dyn DomainRepository>,
        deployment_repository: Arc<dyn DeploymentRepository>,
        landing_page_repository: Arc<dyn LandingPageRepository>,
        dns_provider: Arc<dyn DnsProvider>,
        hosting_platform: Arc<dyn HostingPlatform>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            domain_repository,
            deployment_repository,
            landing_page_repository,
            dns_provider,
            hosting_platform,
            edge_workers: None,
            asset_store: None,
            site_bundles: None,
            config,
        }
    }

    /// 注入 edge worker API
    #[must_use]
    pub fn with_edge_workers(mut self, edge_workers: Arc<dyn EdgeWorkerApi>) -> Self {
        self.edge_workers = Some(edge_workers);
        self
    }

    /// 注入 Blob 存储
    #[must_use]
    pub fn with_asset_store(mut self, asset_store: Arc<dyn AssetStore>) -> Self {
        self.asset_store = Some(asset_store);
        self
    }

    /// 注入站点包来源
    #[must_use]
    pub fn with_site_bundles(mut self, site_bundles: Arc<dyn SiteBundleSource>) -> Self {
        self.site_bundles = Some(site_bundles);
        self
    }

    /// 获取域名，不存在时返回 `DomainNotFound`
    pub async fn require_domain(&self, domain_id: &str) -> CoreResult<Domain> {
        let domain_id = domain_id.trim();
        if domain_id.is_empty() {
            return Err(CoreError::ValidationError(
                "Domain id is required".to_string(),
            ));
        }
        self.domain_repository
            .find_by_id(domain_id)
            .await?
            .ok_or_else(|| CoreError::DomainNotFound(domain_id.to_string()))
    }

    /// 部署日志记录器
    pub fn deployment_log(&self, deployment_id: &str, domain_name: &str) -> DeploymentLog {
        DeploymentLog::new(
            Arc::clone(&self.deployment_repository),
            deployment_id,
            domain_name,
        )
    }

    /// 变更部署状态并同步到域名
    ///
    /// 终态写入 `completed_at`，成功时同时更新域名的 `last_deployed_at`。
    /// 不允许的状态变更记录警告后跳过。
    pub async fn transition_attempt(
        &self,
        deployment_id: &str,
        status: AttemptStatus,
    ) -> CoreResult<()> {
        let attempt = self
            .deployment_repository
            .find_by_id(deployment_id)
            .await?
            .ok_or_else(|| CoreError::DeploymentNotFound(deployment_id.to_string()))?;

        // 状态已写入但域名未同步时，重新同步域名
        let already_applied = attempt.status == status;
        if !already_applied && !attempt.status.can_transition_to(status) {
            log::warn!(
                "Ignoring transition {} -> {} for deployment {deployment_id}",
                attempt.status.as_str(),
                status.as_str()
            );
            return Ok(());
        }

        let now = Utc::now();
        if !already_applied {
            self.deployment_repository
                .set_status(deployment_id, status, status.is_terminal().then_some(now))
                .await?;
        }

        let Some(mut domain) = self
            .domain_repository
            .find_by_id(&attempt.domain_id)
            .await?
        else {
            log::warn!(
                "Domain {} of deployment {deployment_id} no longer exists",
                attempt.domain_id
            );
            return Ok(());
        };

        domain.deployment_status = status.into();
        if status == AttemptStatus::Deployed {
            domain.last_deployed_at = Some(now);
        }
        domain.touch();
        self.domain_repository.save(&domain).await
    }

    /// 写入部署最终状态，失败时退避重试
    ///
    /// 在 [`transition_attempt`](Self::transition_attempt) 失败后最多重试
    /// `monitor.settle_retries` 次，间隔从轮询周期开始翻倍，上限一分钟。
    /// 部署记录已删除时不重试。
    pub async fn settle_attempt(
        &self,
        deployment_id: &str,
        status: AttemptStatus,
    ) -> CoreResult<()> {
        let retries = self.config.monitor.settle_retries;
        let mut delay = self.config.monitor.poll_interval();
        let mut tries = 0;
        loop {
            match self.transition_attempt(deployment_id, status).await {
                Ok(()) => return Ok(()),
                Err(e @ CoreError::DeploymentNotFound(_)) => return Err(e),
                Err(e) if tries >= retries => return Err(e),
                Err(e) => {
                    tries += 1;
                    log::warn!(
                        "Recording {} for deployment {deployment_id} failed (try {tries}/{}), retrying in {}ms: {e}",
                        status.as_str(),
                        retries + 1,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(MAX_SETTLE_DELAY);
                }
            }
        }
    }
}

const MAX_SETTLE_DELAY: Duration = Duration::from_secs(60);

/// 按 `is_expected` 选择日志级别记录错误
pub(crate) fn log_core_error(context: &str, err: &CoreError) {
    if err.is_expected() {
        log::warn!("{context}: {err}");
    } else {
        log::error!("{context}: {err}");
    }
}

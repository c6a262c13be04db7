//! 托管平台注册服务

use std::sync::Arc;

use launchpad_provider::{HostingDomainStatus, HostingRegistration, RegisterDomainRequest};

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::types::{Domain, VerificationStatus};

/// 托管平台注册服务
pub struct HostingRegistrar {
    ctx: Arc<ServiceContext>,
}

impl HostingRegistrar {
    /// 创建托管平台注册服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 将域名绑定到托管项目并创建部署
    ///
    /// 复用域名已保存的项目 id；配置了站点包来源且存在该域名的站点包时一并上传。
    pub async fn register(&self, domain: &Domain) -> CoreResult<HostingRegistration> {
        let request = RegisterDomainRequest {
            name: domain.name.clone(),
            project_id: domain.hosting_project_id.clone(),
            bundle: self.bundle_for(domain).await,
        };

        let registration = self.ctx.hosting_platform.register_domain(&request).await?;
        log::info!(
            "Registered {} with {} project {} (deployment {})",
            domain.name,
            self.ctx.hosting_platform.id(),
            registration.project_id,
            registration.deployment_id
        );
        Ok(registration)
    }

    /// 获取平台侧的域名绑定状态
    pub async fn domain_status(&self, domain: &Domain) -> CoreResult<HostingDomainStatus> {
        Ok(self
            .ctx
            .hosting_platform
            .get_domain_status(&domain.name, domain.hosting_project_id.as_deref())
            .await?)
    }

    /// 获取域名验证状态
    pub async fn verification_status(&self, domain: &Domain) -> CoreResult<VerificationStatus> {
        Ok(verification_from(&self.domain_status(domain).await?))
    }

    /// 从托管平台解绑主机名（主机名不存在时视为成功）
    pub async fn deregister(&self, hostname: &str, project_id: Option<&str>) -> CoreResult<()> {
        self.ctx
            .hosting_platform
            .delete_domain(hostname, project_id)
            .await?;
        Ok(())
    }

    async fn bundle_for(&self, domain: &Domain) -> Option<launchpad_provider::SiteBundle> {
        let source = self.ctx.site_bundles.as_ref()?;
        match source.bundle_for(domain).await {
            Ok(bundle) => bundle.filter(|b| !b.is_empty()),
            Err(e) => {
                log::warn!("No site bundle for {}: {e}", domain.name);
                None
            }
        }
    }
}

pub(crate) fn verification_from(status: &HostingDomainStatus) -> VerificationStatus {
    if !status.exists {
        VerificationStatus::NotRegistered
    } else if status.verified {
        VerificationStatus::Verified
    } else {
        VerificationStatus::Pending
    }
}

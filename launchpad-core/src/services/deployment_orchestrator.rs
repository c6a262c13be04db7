//! 部署编排服务
//!
//! `start` validates, records the attempt atomically and returns; the pipeline
//! (register -> DNS -> verification -> monitor) runs as a detached job keyed by
//! the attempt id.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::FutureExt;

use crate::error::CoreResult;
use crate::services::{
    log_core_error, DeploymentLog, DeploymentMonitor, DnsReconciler, HostingRegistrar,
    ServiceContext, ZoneResolver, ZoneSource,
};
use crate::traits::JobQueue;
use crate::types::{
    AttemptStatus, DeploymentStatus, DeploymentStatusReport, Domain, DomainDeployment,
    HostingRegistration, StartResult,
};

/// 已有部署进行中时 `start` 的拒绝原因
pub const ALREADY_IN_PROGRESS: &str = "deployment already in progress";

/// 部署编排器
pub struct DeploymentOrchestrator {
    ctx: Arc<ServiceContext>,
    jobs: Arc<dyn JobQueue>,
}

impl DeploymentOrchestrator {
    /// 创建部署编排实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, jobs: Arc<dyn JobQueue>) -> Self {
        Self { ctx, jobs }
    }

    /// 启动域名部署，立即返回，不等待流水线完成
    pub async fn start(&self, domain_id: &str) -> CoreResult<StartResult> {
        let domain = self.ctx.require_domain(domain_id).await?;
        if domain.deployment_status == DeploymentStatus::Deploying {
            log::warn!("Deployment of {} rejected: {ALREADY_IN_PROGRESS}", domain.name);
            return Ok(StartResult::rejected(ALREADY_IN_PROGRESS));
        }

        let attempt = DomainDeployment::queued(&domain);
        if !self
            .ctx
            .deployment_repository
            .begin_deployment(&attempt)
            .await?
        {
            log::warn!(
                "Deployment of {} lost the race to another start: {ALREADY_IN_PROGRESS}",
                domain.name
            );
            return Ok(StartResult::rejected(ALREADY_IN_PROGRESS));
        }
        log::info!("Deployment {} queued for {}", attempt.id, domain.name);

        self.prune_history(&domain).await;
        let deployment_id = attempt.id.clone();
        self.enqueue(attempt, Resume::FullPipeline).await;
        Ok(StartResult::started(deployment_id))
    }

    /// 获取域名及其最新一次部署（含日志）
    pub async fn status(&self, domain_id: &str) -> CoreResult<DeploymentStatusReport> {
        let domain = self.ctx.require_domain(domain_id).await?;
        let latest_deployment = self
            .ctx
            .deployment_repository
            .find_latest(&domain.id)
            .await?;
        Ok(DeploymentStatusReport {
            domain,
            latest_deployment,
        })
    }

    /// 重新入队所有 `pending` / `deploying` 状态的部署
    ///
    /// 已有部署句柄的只恢复监控（使用剩余时间预算），其余重新执行完整流水线。
    ///
    /// # Returns
    /// 已恢复的部署 id
    pub async fn resume_in_flight(&self) -> CoreResult<Vec<String>> {
        let in_flight = self.ctx.deployment_repository.find_in_flight().await?;
        let mut resumed = Vec::with_capacity(in_flight.len());

        for attempt in in_flight {
            let id = attempt.id.clone();
            let how = if attempt.deployment_handle.is_some() {
                Resume::MonitorOnly
            } else {
                Resume::FullPipeline
            };
            log::info!(
                "Resuming deployment {id} of {} ({how:?})",
                attempt.domain_name
            );
            if self.enqueue(attempt, how).await {
                resumed.push(id);
            }
        }
        Ok(resumed)
    }

    async fn prune_history(&self, domain: &Domain) {
        let keep = self.ctx.config.deployment.history_limit;
        match self
            .ctx
            .deployment_repository
            .prune_history(&domain.id, keep)
            .await
        {
            Ok(0) => {}
            Ok(n) => log::debug!("Pruned {n} old deployment(s) of {}", domain.name),
            Err(e) => log_core_error(&format!("Failed to prune history of {}", domain.name), &e),
        }
    }

    async fn enqueue(&self, attempt: DomainDeployment, how: Resume) -> bool {
        let key = attempt.id.clone();
        let pipeline = Pipeline::new(Arc::clone(&self.ctx));
        let job = async move { pipeline.run(attempt, how).await }.boxed();
        let spawned = self.jobs.spawn(&key, job).await;
        if !spawned {
            log::warn!("Deployment {key} already has a running job");
        }
        spawned
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resume {
    FullPipeline,
    MonitorOnly,
}

/// One detached run of the deployment pipeline.
struct Pipeline {
    ctx: Arc<ServiceContext>,
    registrar: HostingRegistrar,
    zones: ZoneResolver,
    reconciler: DnsReconciler,
    monitor: DeploymentMonitor,
}

impl Pipeline {
    fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            registrar: HostingRegistrar::new(Arc::clone(&ctx)),
            zones: ZoneResolver::new(Arc::clone(&ctx)),
            reconciler: DnsReconciler::new(Arc::clone(&ctx)),
            monitor: DeploymentMonitor::new(Arc::clone(&ctx)),
            ctx,
        }
    }

    async fn run(&self, attempt: DomainDeployment, how: Resume) {
        let log = self.ctx.deployment_log(&attempt.id, &attempt.domain_name);
        let handle = match (how, attempt.deployment_handle.clone()) {
            (Resume::MonitorOnly, Some(handle)) => {
                log.info("Resuming monitoring after restart").await;
                Some(handle)
            }
            _ => self.provision(&attempt, &log).await,
        };
        let Some(handle) = handle else { return };

        let monitor = &self.ctx.config.monitor;
        let since_start = (Utc::now() - attempt.created_at)
            .to_std()
            .unwrap_or(Duration::ZERO);
        let budget = monitor.max_duration().saturating_sub(since_start);

        if let Err(e) = self
            .monitor
            .run(&handle, &attempt.id, monitor.poll_interval(), budget)
            .await
        {
            log_core_error(&format!("Monitor for deployment {} failed", attempt.id), &e);
        }
    }

    /// Steps before monitoring. `None` means the attempt was closed as failed.
    async fn provision(&self, attempt: &DomainDeployment, log: &DeploymentLog) -> Option<String> {
        if attempt.status == AttemptStatus::Pending {
            if let Err(e) = self
                .ctx
                .transition_attempt(&attempt.id, AttemptStatus::Deploying)
                .await
            {
                log_core_error(&format!("Failed to start deployment {}", attempt.id), &e);
            }
        }
        log.info("Deployment started").await;

        let mut domain = match self.ctx.domain_repository.find_by_id(&attempt.domain_id).await {
            Ok(Some(domain)) => domain,
            Ok(None) => {
                self.fail(attempt, log, "Domain no longer exists").await;
                return None;
            }
            Err(e) => {
                self.fail(attempt, log, &format!("Could not load domain: {e}")).await;
                return None;
            }
        };

        let registration = match self.registrar.register(&domain).await {
            Ok(registration) => registration,
            Err(e) => {
                self.fail(attempt, log, &format!("Hosting registration failed: {e}"))
                    .await;
                return None;
            }
        };
        log.info(format!(
            "Registered with hosting project {} (deployment {})",
            registration.project_id, registration.deployment_id
        ))
        .await;

        if let Err(e) = self.record_registration(attempt, &mut domain, &registration).await {
            self.fail(attempt, log, &format!("Could not save registration: {e}"))
                .await;
            return None;
        }

        self.configure_dns(&mut domain, &registration, log).await;
        self.refresh_verification(&mut domain, log).await;

        Some(registration.deployment_id)
    }

    async fn record_registration(
        &self,
        attempt: &DomainDeployment,
        domain: &mut Domain,
        registration: &HostingRegistration,
    ) -> CoreResult<()> {
        let url = registration.primary_url().map(str::to_string);

        if let Some(mut stored) = self
            .ctx
            .deployment_repository
            .find_by_id(&attempt.id)
            .await?
        {
            stored.deployment_handle = Some(registration.deployment_id.clone());
            stored.hosting_project_id = Some(registration.project_id.clone());
            stored.deployment_url.clone_from(&url);
            self.ctx.deployment_repository.save(&stored).await?;
        }

        domain.hosting_project_id = Some(registration.project_id.clone());
        domain.deployment_url = url;
        domain.touch();
        self.ctx.domain_repository.save(domain).await
    }

    async fn configure_dns(
        &self,
        domain: &mut Domain,
        registration: &HostingRegistration,
        log: &DeploymentLog,
    ) {
        let targets = self
            .ctx
            .config
            .dns
            .hosting_targets()
            .with_platform_records(registration.configuration_dns_records.clone().unwrap_or_default());

        if !domain.is_provider_managed() {
            let mut required = vec![
                format!("{} CNAME {} (or A {})", domain.name, targets.cname_target, targets.apex_ipv4),
                format!("{} CNAME {}", domain.www_name(), targets.cname_target),
            ];
            required.extend(
                targets
                    .verification_records()
                    .map(|r| format!("{} {} {}", r.name, r.record_type, r.value)),
            );
            log.info(format!(
                "DNS is managed externally; configure: {}",
                required.join("; ")
            ))
            .await;
            return;
        }

        let zone = match self.zones.resolve(domain).await {
            Ok(zone) => zone,
            Err(e) => {
                log.warning(format!("Zone resolution failed, DNS records not configured: {e}"))
                    .await;
                return;
            }
        };
        if zone.source == ZoneSource::Created {
            log.info(format!(
                "Created DNS zone {}; delegate to nameservers: {}",
                zone.zone_id,
                zone.name_servers.join(", ")
            ))
            .await;
        }

        for outcome in self
            .reconciler
            .ensure(&domain.name, &zone.zone_id, &targets)
            .await
        {
            log.record(outcome.level, format!("DNS {}: {}", outcome.record, outcome.message))
                .await;
        }
    }

    async fn refresh_verification(&self, domain: &mut Domain, log: &DeploymentLog) {
        match self.registrar.verification_status(domain).await {
            Ok(status) => {
                log.info(format!("Verification status: {}", status.as_str()))
                    .await;
                domain.verification_status = status;
                domain.touch();
                if let Err(e) = self.ctx.domain_repository.save(domain).await {
                    log_core_error(
                        &format!("Failed to save verification status of {}", domain.name),
                        &e,
                    );
                }
            }
            Err(e) => {
                log.warning(format!("Could not refresh verification status: {e}"))
                    .await;
            }
        }
    }

    async fn fail(&self, attempt: &DomainDeployment, log: &DeploymentLog, reason: &str) {
        log.error(reason).await;
        if let Err(e) = self
            .ctx
            .settle_attempt(&attempt.id, AttemptStatus::Failed)
            .await
        {
            log_core_error(&format!("Failed to mark deployment {} failed", attempt.id), &e);
        }
    }
}

//! 级联删除服务
//!
//! Unwinds what a deployment created, in order: hosting attachment, DNS
//! records, edge workers, stored assets, and finally the database record.
//! Everything before the record deletion is best-effort.

use std::collections::BTreeSet;
use std::sync::Arc;

use launchpad_provider::{same_host, DnsRecord, DnsRecordType, ErrorKind};

use crate::error::{CoreError, CoreResult};
use crate::services::{log_core_error, HostingRegistrar, ServiceContext};
use crate::types::{Domain, HostingTargets, LandingPage, TeardownResult, TeardownTarget};

/// Prefix of hosting verification TXT hosts.
const VERIFICATION_HOST_PREFIX: &str = "_vercel.";
/// Content prefix of hosting verification TXT values.
const VERIFICATION_VALUE_PREFIX: &str = "vc-domain-verify=";

/// Resources of one teardown target.
struct Plan {
    hostnames: Vec<String>,
    project_id: Option<String>,
    zone_id: Option<String>,
    /// Apex of the owning domain, for verification records
    verification_domain: Option<String>,
    worker_scripts: Vec<String>,
    asset_keys: Vec<String>,
    asset_prefix: Option<String>,
}

/// 级联删除编排器
pub struct TeardownOrchestrator {
    ctx: Arc<ServiceContext>,
    registrar: HostingRegistrar,
}

impl TeardownOrchestrator {
    /// 创建级联删除服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            registrar: HostingRegistrar::new(Arc::clone(&ctx)),
            ctx,
        }
    }

    /// 删除域名或落地页，并清理所有外部资源
    ///
    /// # Errors
    /// - 目标不存在时返回 `DomainNotFound` / `LandingPageNotFound`
    /// - 域名仍有落地页时返回 `DependencyConflict`
    /// - 其余步骤执行完后，最终删除记录失败时返回存储错误
    pub async fn delete(&self, target: &TeardownTarget) -> CoreResult<TeardownResult> {
        let plan = match target {
            TeardownTarget::Domain(id) => self.plan_domain(id).await?,
            TeardownTarget::LandingPage(id) => self.plan_landing_page(id).await?,
        };
        log::info!("Tearing down {target} ({})", plan.hostnames.join(", "));

        let mut result = TeardownResult {
            target_id: target.id().to_string(),
            hostnames: plan.hostnames.clone(),
            ..TeardownResult::default()
        };

        self.deregister_hosting(&plan, &mut result).await;
        self.delete_dns_records(&plan, &mut result).await;
        self.remove_edge_workers(&plan, &mut result).await;
        self.remove_assets(&plan, &mut result).await;

        match target {
            TeardownTarget::Domain(id) => {
                self.delete_domain_record(id, &mut result).await?;
            }
            TeardownTarget::LandingPage(id) => {
                if !self.ctx.landing_page_repository.delete(id).await? {
                    log::warn!("Landing page {id} was already gone");
                }
                result.record_deleted = true;
            }
        }

        log::info!(
            "Teardown of {target} finished: {} DNS record(s) removed, {} message(s)",
            result.dns_records_removed,
            result.messages.len()
        );
        Ok(result)
    }

    async fn plan_domain(&self, domain_id: &str) -> CoreResult<Plan> {
        let domain = self.ctx.require_domain(domain_id).await?;
        let pages = self
            .ctx
            .landing_page_repository
            .find_by_domain(&domain.id)
            .await?;
        if !pages.is_empty() {
            return Err(CoreError::DependencyConflict(format!(
                "Domain {} still has {} landing page(s); delete them first",
                domain.name,
                pages.len()
            )));
        }

        Ok(Plan {
            hostnames: vec![domain.name.clone(), domain.www_name()],
            project_id: domain.hosting_project_id.clone(),
            zone_id: domain.zone_id.clone(),
            verification_domain: Some(domain.name.clone()),
            worker_scripts: Vec::new(),
            asset_keys: Vec::new(),
            asset_prefix: Some(format!("{}/", domain.id)),
        })
    }

    async fn plan_landing_page(&self, page_id: &str) -> CoreResult<Plan> {
        let page_id = page_id.trim();
        if page_id.is_empty() {
            return Err(CoreError::ValidationError(
                "Landing page id is required".to_string(),
            ));
        }
        let page = self
            .ctx
            .landing_page_repository
            .find_by_id(page_id)
            .await?
            .ok_or_else(|| CoreError::LandingPageNotFound(page_id.to_string()))?;
        let domain = self.ctx.domain_repository.find_by_id(&page.domain_id).await?;

        Ok(landing_page_plan(&page, domain.as_ref()))
    }

    async fn deregister_hosting(&self, plan: &Plan, result: &mut TeardownResult) {
        let mut ok = true;
        for hostname in &plan.hostnames {
            if let Err(e) = self
                .registrar
                .deregister(hostname, plan.project_id.as_deref())
                .await
            {
                ok = false;
                warn(result, format!("Hosting deregistration of {hostname} failed: {e}"));
            }
        }
        result.hosting_deregistered = ok;
    }

    async fn delete_dns_records(&self, plan: &Plan, result: &mut TeardownResult) {
        let Some(zone_id) = plan.zone_id.as_deref() else {
            if !plan.hostnames.is_empty() {
                warn(result, "No DNS zone recorded; DNS records were not touched".to_string());
            }
            result.dns_records_deleted = true;
            return;
        };

        let records = match self.ctx.dns_provider.list_records(zone_id).await {
            Ok(records) => records,
            Err(e) => {
                warn(result, format!("Could not list DNS records of zone {zone_id}: {e}"));
                return;
            }
        };

        let targets = self.ctx.config.dns.hosting_targets();
        let mut ok = true;
        for record in records.iter().filter(|r| owned_record(r, plan, &targets)) {
            match self.ctx.dns_provider.delete_record(zone_id, &record.id).await {
                Ok(()) => result.dns_records_removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    ok = false;
                    warn(
                        result,
                        format!("Deleting {} {} failed: {e}", record.record_type, record.name),
                    );
                }
            }
        }
        result.dns_records_deleted = ok;
    }

    async fn remove_edge_workers(&self, plan: &Plan, result: &mut TeardownResult) {
        let Some(workers) = self.ctx.edge_workers.as_ref() else {
            result.edge_workers_removed = true;
            return;
        };

        let mut ok = true;
        let mut scripts: BTreeSet<String> = plan.worker_scripts.iter().cloned().collect();

        if let Some(zone_id) = plan.zone_id.as_deref() {
            match workers.list_worker_routes(zone_id).await {
                Ok(routes) => {
                    for route in routes
                        .iter()
                        .filter(|r| plan.hostnames.iter().any(|h| r.matches_host(h)))
                    {
                        if let Err(e) = workers.delete_worker_route(zone_id, &route.id).await {
                            ok = false;
                            warn(result, format!("Deleting worker route {} failed: {e}", route.pattern));
                            continue;
                        }
                        scripts.extend(route.script.clone());
                    }
                }
                Err(e) => {
                    ok = false;
                    warn(result, format!("Could not list worker routes of zone {zone_id}: {e}"));
                }
            }
        }

        for script in &scripts {
            match workers.delete_worker_script(script).await {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    ok = false;
                    warn(result, format!("Deleting worker script {script} failed: {e}"));
                }
            }
        }
        result.edge_workers_removed = ok;
    }

    async fn remove_assets(&self, plan: &Plan, result: &mut TeardownResult) {
        let Some(assets) = self.ctx.asset_store.as_ref() else {
            result.assets_removed = true;
            return;
        };

        let mut ok = true;
        for key in &plan.asset_keys {
            if let Err(e) = assets.delete(key).await {
                ok = false;
                warn(result, format!("Deleting asset {key} failed: {e}"));
            }
        }
        if let Some(prefix) = plan.asset_prefix.as_deref() {
            match assets.delete_prefix(prefix).await {
                Ok(n) if n > 0 => log::debug!("Removed {n} asset(s) under {prefix}"),
                Ok(_) => {}
                Err(e) => {
                    ok = false;
                    warn(result, format!("Deleting assets under {prefix} failed: {e}"));
                }
            }
        }
        result.assets_removed = ok;
    }

    async fn delete_domain_record(&self, domain_id: &str, result: &mut TeardownResult) -> CoreResult<()> {
        if let Err(e) = self.ctx.domain_repository.delete(domain_id).await {
            log_core_error(&format!("Deleting domain {domain_id} failed"), &e);
            return Err(e);
        }
        result.record_deleted = true;

        match self
            .ctx
            .deployment_repository
            .delete_by_domain(domain_id)
            .await
        {
            Ok(n) => log::debug!("Removed {n} deployment record(s) of {domain_id}"),
            Err(e) => warn(result, format!("Deployment history was not removed: {e}")),
        }
        Ok(())
    }
}

fn landing_page_plan(page: &LandingPage, domain: Option<&Domain>) -> Plan {
    let hostnames = domain.map(|d| vec![page.hostname(&d.name)]).unwrap_or_default();
    Plan {
        hostnames,
        project_id: page
            .hosting_project_id
            .clone()
            .or_else(|| domain.and_then(|d| d.hosting_project_id.clone())),
        zone_id: domain.and_then(|d| d.zone_id.clone()),
        verification_domain: None,
        worker_scripts: page.worker_script.iter().cloned().collect(),
        asset_keys: page.screenshot_key.iter().cloned().collect(),
        asset_prefix: None,
    }
}

/// Records this teardown is allowed to delete: hosting-pointing records for
/// the target hostnames, plus verification TXT records of the domain.
fn owned_record(record: &DnsRecord, plan: &Plan, targets: &HostingTargets) -> bool {
    let for_target = plan.hostnames.iter().any(|h| same_host(&record.name, h));
    if record.record_type.is_address_like() {
        return for_target && targets.is_target(&record.content);
    }
    if record.record_type != DnsRecordType::Txt {
        return false;
    }
    let Some(domain) = plan.verification_domain.as_deref() else {
        return false;
    };
    let verification_host = format!("{VERIFICATION_HOST_PREFIX}{domain}");
    let value = record.content.trim_matches('"');
    same_host(&record.name, &verification_host)
        || (for_target && value.starts_with(VERIFICATION_VALUE_PREFIX))
}

fn warn(result: &mut TeardownResult, message: String) {
    log::warn!("{message}");
    result.messages.push(message);
}

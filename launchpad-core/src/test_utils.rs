//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use launchpad_provider::{
    ConfigurationDnsRecord, CreateDnsRecordRequest, DnsProvider, DnsRecord, DnsRecordType,
    EdgeWorkerApi, HostingDomainStatus, HostingPlatform, HostingRegistration, ProviderError,
    ProviderZone, ReadyState, RegisterDomainRequest, WorkerRoute,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::OrchestratorConfig;
use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::traits::{AssetStore, DeploymentRepository, DomainRepository, LandingPageRepository};
use crate::types::{
    AttemptStatus, DeploymentLogEntry, DeploymentStatus, DnsManagement, Domain, DomainDeployment,
    LandingPage,
};

type ProviderResult<T> = launchpad_provider::Result<T>;

// ===== MemoryStore =====

#[derive(Default)]
struct StoreState {
    domains: HashMap<String, Domain>,
    deployments: Vec<DomainDeployment>,
    pages: HashMap<String, LandingPage>,
}

/// In-memory implementation of all three repositories.
pub struct MemoryStore {
    state: RwLock<StoreState>,
    /// 如果 Some，save 时返回此错误
    save_error: RwLock<Option<String>>,
    /// 如果 Some，delete 时返回此错误
    delete_error: RwLock<Option<String>>,
    /// 接下来 N 次 `set_status` 失败
    status_write_failures: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            save_error: RwLock::new(None),
            delete_error: RwLock::new(None),
            status_write_failures: AtomicUsize::new(0),
        }
    }

    pub async fn set_save_error(&self, err: Option<String>) {
        *self.save_error.write().await = err;
    }

    /// Make the next `n` attempt status writes fail.
    pub fn fail_status_writes(&self, n: usize) {
        self.status_write_failures.store(n, Ordering::SeqCst);
    }

    pub async fn set_delete_error(&self, err: Option<String>) {
        *self.delete_error.write().await = err;
    }

    pub async fn domain(&self, id: &str) -> Option<Domain> {
        self.state.read().await.domains.get(id).cloned()
    }

    pub async fn domain_by_name(&self, name: &str) -> Option<Domain> {
        self.state
            .read()
            .await
            .domains
            .values()
            .find(|d| d.name == name)
            .cloned()
    }

    pub async fn deployment(&self, id: &str) -> Option<DomainDeployment> {
        self.state
            .read()
            .await
            .deployments
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    pub async fn deployments_of(&self, domain_id: &str) -> Vec<DomainDeployment> {
        self.state
            .read()
            .await
            .deployments
            .iter()
            .filter(|d| d.domain_id == domain_id)
            .cloned()
            .collect()
    }

    /// Upsert bypassing `save_error`.
    pub async fn put_domain(&self, domain: &Domain) {
        self.state
            .write()
            .await
            .domains
            .insert(domain.id.clone(), domain.clone());
    }

    pub async fn put_landing_page(&self, page: &LandingPage) {
        self.state
            .write()
            .await
            .pages
            .insert(page.id.clone(), page.clone());
    }

    pub async fn put_deployment(&self, deployment: &DomainDeployment) {
        let mut state = self.state.write().await;
        state.deployments.retain(|d| d.id != deployment.id);
        state.deployments.push(deployment.clone());
    }

    async fn check_save(&self) -> CoreResult<()> {
        match &*self.save_error.read().await {
            Some(msg) => Err(CoreError::StorageError(msg.clone())),
            None => Ok(()),
        }
    }

    async fn check_delete(&self) -> CoreResult<()> {
        match &*self.delete_error.read().await {
            Some(msg) => Err(CoreError::StorageError(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DomainRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<Domain>> {
        Ok(self.domain(id).await)
    }

    async fn find_by_name(&self, name: &str) -> CoreResult<Option<Domain>> {
        Ok(self.domain_by_name(name).await)
    }

    async fn find_all(&self) -> CoreResult<Vec<Domain>> {
        Ok(self.state.read().await.domains.values().cloned().collect())
    }

    async fn save(&self, domain: &Domain) -> CoreResult<()> {
        self.check_save().await?;
        self.put_domain(domain).await;
        Ok(())
    }

    async fn delete(&self, id: &str) -> CoreResult<bool> {
        self.check_delete().await?;
        Ok(self.state.write().await.domains.remove(id).is_some())
    }
}

#[async_trait]
impl DeploymentRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<DomainDeployment>> {
        Ok(self.deployment(id).await)
    }

    async fn find_latest(&self, domain_id: &str) -> CoreResult<Option<DomainDeployment>> {
        Ok(self
            .deployments_of(domain_id)
            .await
            .into_iter()
            .max_by_key(|d| d.created_at))
    }

    async fn find_by_domain(&self, domain_id: &str) -> CoreResult<Vec<DomainDeployment>> {
        let mut all = self.deployments_of(domain_id).await;
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn find_in_flight(&self) -> CoreResult<Vec<DomainDeployment>> {
        let mut pending: Vec<_> = self
            .state
            .read()
            .await
            .deployments
            .iter()
            .filter(|d| !d.is_terminal())
            .cloned()
            .collect();
        pending.sort_by_key(|d| d.created_at);
        Ok(pending)
    }

    async fn save(&self, deployment: &DomainDeployment) -> CoreResult<()> {
        self.check_save().await?;
        self.put_deployment(deployment).await;
        Ok(())
    }

    async fn append_log(&self, id: &str, entry: &DeploymentLogEntry) -> CoreResult<()> {
        let mut state = self.state.write().await;
        let deployment = state
            .deployments
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| CoreError::DeploymentNotFound(id.to_string()))?;
        deployment.logs.push(entry.clone());
        Ok(())
    }

    async fn set_status(
        &self,
        id: &str,
        status: AttemptStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> CoreResult<()> {
        self.check_save().await?;
        if self
            .status_write_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(CoreError::StorageError("database is locked".to_string()));
        }
        let mut state = self.state.write().await;
        let deployment = state
            .deployments
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| CoreError::DeploymentNotFound(id.to_string()))?;
        deployment.status = status;
        if completed_at.is_some() {
            deployment.completed_at = completed_at;
        }
        Ok(())
    }

    async fn begin_deployment(&self, deployment: &DomainDeployment) -> CoreResult<bool> {
        self.check_save().await?;
        let mut state = self.state.write().await;
        let domain = state
            .domains
            .get_mut(&deployment.domain_id)
            .ok_or_else(|| CoreError::DomainNotFound(deployment.domain_id.clone()))?;
        if domain.deployment_status == DeploymentStatus::Deploying {
            return Ok(false);
        }
        domain.deployment_status = DeploymentStatus::Deploying;
        domain.touch();
        state.deployments.push(deployment.clone());
        Ok(true)
    }

    async fn prune_history(&self, domain_id: &str, keep: usize) -> CoreResult<usize> {
        let mut state = self.state.write().await;
        let mut terminal: Vec<_> = state
            .deployments
            .iter()
            .filter(|d| d.domain_id == domain_id && d.is_terminal())
            .map(|d| (d.created_at, d.id.clone()))
            .collect();
        terminal.sort_by(|a, b| b.0.cmp(&a.0));
        let doomed: Vec<String> = terminal.into_iter().skip(keep).map(|(_, id)| id).collect();
        state.deployments.retain(|d| !doomed.contains(&d.id));
        Ok(doomed.len())
    }

    async fn delete_by_domain(&self, domain_id: &str) -> CoreResult<usize> {
        let mut state = self.state.write().await;
        let before = state.deployments.len();
        state.deployments.retain(|d| d.domain_id != domain_id);
        Ok(before - state.deployments.len())
    }
}

#[async_trait]
impl LandingPageRepository for MemoryStore {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<LandingPage>> {
        Ok(self.state.read().await.pages.get(id).cloned())
    }

    async fn find_by_domain(&self, domain_id: &str) -> CoreResult<Vec<LandingPage>> {
        Ok(self
            .state
            .read()
            .await
            .pages
            .values()
            .filter(|p| p.domain_id == domain_id)
            .cloned()
            .collect())
    }

    async fn save(&self, page: &LandingPage) -> CoreResult<()> {
        self.check_save().await?;
        self.put_landing_page(page).await;
        Ok(())
    }

    async fn delete(&self, id: &str) -> CoreResult<bool> {
        self.check_delete().await?;
        Ok(self.state.write().await.pages.remove(id).is_some())
    }
}

// ===== MockDnsProvider =====

#[derive(Default)]
struct DnsState {
    /// (name, id)
    zones: Vec<(String, String)>,
    /// Zones that appear only once `create_zone` is called for them
    hidden_zones: Vec<(String, String)>,
    records: Vec<DnsRecord>,
    next_record: usize,
    reject_apex_cname: bool,
    fail_creates: bool,
    fail_deletes: bool,
    zone_lookups: usize,
    create_attempts: usize,
}

pub struct MockDnsProvider {
    state: RwLock<DnsState>,
}

impl MockDnsProvider {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DnsState::default()),
        }
    }

    pub async fn add_zone(&self, name: &str, id: &str) {
        self.state
            .write()
            .await
            .zones
            .push((name.to_string(), id.to_string()));
    }

    pub async fn hide_zone_until_create(&self, name: &str, id: &str) {
        self.state
            .write()
            .await
            .hidden_zones
            .push((name.to_string(), id.to_string()));
    }

    pub async fn add_record(
        &self,
        zone_id: &str,
        record_type: DnsRecordType,
        name: &str,
        content: &str,
        proxied: bool,
    ) {
        let mut state = self.state.write().await;
        state.next_record += 1;
        let id = format!("rec-{}", state.next_record);
        state.records.push(DnsRecord {
            id,
            zone_id: zone_id.to_string(),
            record_type,
            name: name.to_string(),
            content: content.to_string(),
            ttl: 1,
            proxied,
        });
    }

    pub async fn records(&self, zone_id: &str) -> Vec<DnsRecord> {
        self.state
            .read()
            .await
            .records
            .iter()
            .filter(|r| r.zone_id == zone_id)
            .cloned()
            .collect()
    }

    pub async fn reject_apex_cname(&self, reject: bool) {
        self.state.write().await.reject_apex_cname = reject;
    }

    pub async fn fail_creates(&self, fail: bool) {
        self.state.write().await.fail_creates = fail;
    }

    pub async fn fail_deletes(&self, fail: bool) {
        self.state.write().await.fail_deletes = fail;
    }

    pub async fn zone_lookups(&self) -> usize {
        self.state.read().await.zone_lookups
    }

    pub async fn create_attempts(&self) -> usize {
        self.state.read().await.create_attempts
    }
}

fn network_error(detail: &str) -> ProviderError {
    ProviderError::NetworkError {
        provider: "mock".to_string(),
        detail: detail.to_string(),
    }
}

fn not_found(resource: &str) -> ProviderError {
    ProviderError::ResourceNotFound {
        provider: "mock".to_string(),
        resource: resource.to_string(),
        raw_message: None,
    }
}

#[async_trait]
impl DnsProvider for MockDnsProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    async fn list_records(&self, zone_id: &str) -> ProviderResult<Vec<DnsRecord>> {
        let known = self.state.read().await.zones.iter().any(|(_, id)| id == zone_id);
        if !known {
            return Err(not_found(zone_id));
        }
        Ok(self.records(zone_id).await)
    }

    async fn create_record(&self, req: &CreateDnsRecordRequest) -> ProviderResult<DnsRecord> {
        let mut state = self.state.write().await;
        state.create_attempts += 1;
        if state.fail_creates {
            return Err(network_error("connection reset"));
        }
        let is_apex = state
            .zones
            .iter()
            .any(|(name, id)| id == &req.zone_id && name == &req.name);
        if state.reject_apex_cname && is_apex && req.record_type == DnsRecordType::Cname {
            return Err(ProviderError::InvalidParameter {
                provider: "mock".to_string(),
                param: "type".to_string(),
                detail: "CNAME is not allowed at the zone apex".to_string(),
            });
        }
        let duplicate = state.records.iter().any(|r| {
            r.zone_id == req.zone_id
                && r.record_type == req.record_type
                && r.name == req.name
                && r.content == req.content
        });
        if duplicate {
            return Err(ProviderError::RecordExists {
                provider: "mock".to_string(),
                record_name: req.name.clone(),
                raw_message: None,
            });
        }

        state.next_record += 1;
        let record = DnsRecord {
            id: format!("rec-{}", state.next_record),
            zone_id: req.zone_id.clone(),
            record_type: req.record_type,
            name: req.name.clone(),
            content: req.content.clone(),
            ttl: req.ttl,
            proxied: req.proxied,
        };
        state.records.push(record.clone());
        Ok(record)
    }

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> ProviderResult<()> {
        let mut state = self.state.write().await;
        if state.fail_deletes {
            return Err(network_error("connection reset"));
        }
        let before = state.records.len();
        state
            .records
            .retain(|r| !(r.zone_id == zone_id && r.id == record_id));
        if state.records.len() == before {
            return Err(ProviderError::RecordNotFound {
                provider: "mock".to_string(),
                record_id: record_id.to_string(),
                raw_message: None,
            });
        }
        Ok(())
    }

    async fn find_zone_by_name(&self, name: &str) -> ProviderResult<Option<String>> {
        let mut state = self.state.write().await;
        state.zone_lookups += 1;
        Ok(state
            .zones
            .iter()
            .find(|(zone, _)| zone == name)
            .map(|(_, id)| id.clone()))
    }

    async fn create_zone(&self, name: &str) -> ProviderResult<ProviderZone> {
        let mut state = self.state.write().await;
        let exists = ProviderError::ResourceExists {
            provider: "mock".to_string(),
            resource: name.to_string(),
            raw_message: None,
        };
        if let Some(pos) = state.hidden_zones.iter().position(|(zone, _)| zone == name) {
            let zone = state.hidden_zones.remove(pos);
            state.zones.push(zone);
            return Err(exists);
        }
        if state.zones.iter().any(|(zone, _)| zone == name) {
            return Err(exists);
        }
        let id = format!("zone-{name}");
        state.zones.push((name.to_string(), id.clone()));
        Ok(ProviderZone {
            id,
            name: name.to_string(),
            status: "pending".to_string(),
            name_servers: vec!["ada.ns.mock.test".to_string(), "bob.ns.mock.test".to_string()],
        })
    }
}

// ===== MockHostingPlatform =====

#[derive(Default)]
struct HostingState {
    /// hostname -> verified
    attached: HashMap<String, bool>,
    register_requests: Vec<RegisterDomainRequest>,
    deleted: Vec<String>,
    scripted: HashMap<String, VecDeque<ReadyState>>,
    default_states: Vec<ReadyState>,
    configuration_records: Option<Vec<ConfigurationDnsRecord>>,
    next_deployment: usize,
    fail_register: bool,
    fail_delete: bool,
    failing_polls: usize,
}

pub struct MockHostingPlatform {
    state: RwLock<HostingState>,
}

impl MockHostingPlatform {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(HostingState::default()),
        }
    }

    /// States returned by successive polls; the last one repeats.
    pub async fn script_states(
        &self,
        deployment_id: &str,
        states: impl IntoIterator<Item = ReadyState>,
    ) {
        self.state
            .write()
            .await
            .scripted
            .insert(deployment_id.to_string(), states.into_iter().collect());
    }

    /// Script applied to every deployment created by `register_domain`.
    pub async fn default_states(&self, states: impl IntoIterator<Item = ReadyState>) {
        self.state.write().await.default_states = states.into_iter().collect();
    }

    pub async fn set_configuration_records(&self, records: Vec<ConfigurationDnsRecord>) {
        self.state.write().await.configuration_records = Some(records);
    }

    pub async fn set_verified(&self, hostname: &str, verified: bool) {
        self.state
            .write()
            .await
            .attached
            .insert(hostname.to_string(), verified);
    }

    pub async fn fail_register(&self, fail: bool) {
        self.state.write().await.fail_register = fail;
    }

    pub async fn fail_delete(&self, fail: bool) {
        self.state.write().await.fail_delete = fail;
    }

    pub async fn fail_next_polls(&self, count: usize) {
        self.state.write().await.failing_polls = count;
    }

    pub async fn register_requests(&self) -> Vec<RegisterDomainRequest> {
        self.state.read().await.register_requests.clone()
    }

    pub async fn deleted_domains(&self) -> Vec<String> {
        self.state.read().await.deleted.clone()
    }
}

#[async_trait]
impl HostingPlatform for MockHostingPlatform {
    fn id(&self) -> &'static str {
        "mock-hosting"
    }

    async fn register_domain(&self, req: &RegisterDomainRequest) -> ProviderResult<HostingRegistration> {
        let mut state = self.state.write().await;
        state.register_requests.push(req.clone());
        if state.fail_register {
            return Err(ProviderError::PermissionDenied {
                provider: "mock-hosting".to_string(),
                raw_message: Some("token lacks project scope".to_string()),
            });
        }

        state.attached.entry(req.name.clone()).or_insert(false);
        state.attached.entry(format!("www.{}", req.name)).or_insert(false);
        state.next_deployment += 1;
        let deployment_id = format!("dpl_{}", state.next_deployment);
        if !state.default_states.is_empty() {
            let script = state.default_states.iter().cloned().collect();
            state.scripted.insert(deployment_id.clone(), script);
        }

        Ok(HostingRegistration {
            urls: vec![
                format!("https://{}", req.name),
                format!("https://{deployment_id}.mock.app"),
            ],
            deployment_id,
            project_id: req.project_id.clone().unwrap_or_else(|| "prj_mock".to_string()),
            configuration_dns_records: state.configuration_records.clone(),
        })
    }

    async fn get_domain_status(
        &self,
        name: &str,
        _project_id: Option<&str>,
    ) -> ProviderResult<HostingDomainStatus> {
        let state = self.state.read().await;
        Ok(match state.attached.get(name) {
            Some(&verified) => HostingDomainStatus {
                exists: true,
                verified,
                configuration_dns_records: None,
            },
            None => HostingDomainStatus {
                exists: false,
                verified: false,
                configuration_dns_records: None,
            },
        })
    }

    async fn get_deployment_status(&self, deployment_id: &str) -> ProviderResult<ReadyState> {
        let mut state = self.state.write().await;
        if state.failing_polls > 0 {
            state.failing_polls -= 1;
            return Err(network_error("gateway timeout"));
        }
        let script = state
            .scripted
            .get_mut(deployment_id)
            .ok_or_else(|| not_found(deployment_id))?;
        let next = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        next.ok_or_else(|| not_found(deployment_id))
    }

    async fn delete_domain(&self, name: &str, _project_id: Option<&str>) -> ProviderResult<()> {
        let mut state = self.state.write().await;
        if state.fail_delete {
            return Err(network_error("connection refused"));
        }
        state.attached.remove(name);
        state.deleted.push(name.to_string());
        Ok(())
    }
}

// ===== MockEdgeWorkers =====

#[derive(Default)]
struct WorkerState {
    /// (zone id, route)
    routes: Vec<(String, WorkerRoute)>,
    deleted_scripts: Vec<String>,
    next_route: usize,
}

pub struct MockEdgeWorkers {
    state: RwLock<WorkerState>,
}

impl MockEdgeWorkers {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(WorkerState::default()),
        }
    }

    pub async fn add_route(&self, zone_id: &str, pattern: &str, script: Option<&str>) {
        let mut state = self.state.write().await;
        state.next_route += 1;
        let route = WorkerRoute {
            id: format!("route-{}", state.next_route),
            pattern: pattern.to_string(),
            script: script.map(String::from),
        };
        state.routes.push((zone_id.to_string(), route));
    }

    pub async fn routes(&self, zone_id: &str) -> Vec<WorkerRoute> {
        self.state
            .read()
            .await
            .routes
            .iter()
            .filter(|(zone, _)| zone == zone_id)
            .map(|(_, r)| r.clone())
            .collect()
    }

    pub async fn deleted_scripts(&self) -> Vec<String> {
        self.state.read().await.deleted_scripts.clone()
    }
}

#[async_trait]
impl EdgeWorkerApi for MockEdgeWorkers {
    async fn list_worker_routes(&self, zone_id: &str) -> ProviderResult<Vec<WorkerRoute>> {
        Ok(self.routes(zone_id).await)
    }

    async fn delete_worker_route(&self, zone_id: &str, route_id: &str) -> ProviderResult<()> {
        self.state
            .write()
            .await
            .routes
            .retain(|(zone, r)| !(zone == zone_id && r.id == route_id));
        Ok(())
    }

    async fn delete_worker_script(&self, script_name: &str) -> ProviderResult<()> {
        self.state
            .write()
            .await
            .deleted_scripts
            .push(script_name.to_string());
        Ok(())
    }
}

// ===== MockAssetStore =====

pub struct MockAssetStore {
    deleted: RwLock<Vec<String>>,
    deleted_prefixes: RwLock<Vec<String>>,
}

impl MockAssetStore {
    pub fn new() -> Self {
        Self {
            deleted: RwLock::new(Vec::new()),
            deleted_prefixes: RwLock::new(Vec::new()),
        }
    }

    pub async fn deleted(&self) -> Vec<String> {
        self.deleted.read().await.clone()
    }

    pub async fn deleted_prefixes(&self) -> Vec<String> {
        self.deleted_prefixes.read().await.clone()
    }
}

#[async_trait]
impl AssetStore for MockAssetStore {
    async fn delete(&self, key: &str) -> CoreResult<()> {
        self.deleted.write().await.push(key.to_string());
        Ok(())
    }

    async fn delete_prefix(&self, prefix: &str) -> CoreResult<usize> {
        self.deleted_prefixes.write().await.push(prefix.to_string());
        Ok(0)
    }
}

// ===== 测试上下文 =====

/// Service context plus typed handles to every mock behind it.
pub struct TestContext {
    pub ctx: Arc<ServiceContext>,
    pub store: Arc<MemoryStore>,
    pub dns: Arc<MockDnsProvider>,
    pub hosting: Arc<MockHostingPlatform>,
    pub workers: Arc<MockEdgeWorkers>,
    pub assets: Arc<MockAssetStore>,
}

impl TestContext {
    /// Same mocks, different configuration.
    pub fn with_config(&self, config: OrchestratorConfig) -> Arc<ServiceContext> {
        Arc::new(build_context(
            &self.store,
            &self.dns,
            &self.hosting,
            &self.workers,
            &self.assets,
            config,
        ))
    }
}

/// Monitor timings shrunk to milliseconds.
pub fn test_config() -> OrchestratorConfig {
    let mut config = OrchestratorConfig::default();
    config.monitor.poll_interval_ms = 10;
    config.monitor.max_duration_ms = 200;
    config
}

fn build_context(
    store: &Arc<MemoryStore>,
    dns: &Arc<MockDnsProvider>,
    hosting: &Arc<MockHostingPlatform>,
    workers: &Arc<MockEdgeWorkers>,
    assets: &Arc<MockAssetStore>,
    config: OrchestratorConfig,
) -> ServiceContext {
    ServiceContext::new(
        store.clone(),
        store.clone(),
        store.clone(),
        dns.clone(),
        hosting.clone(),
        config,
    )
    .with_edge_workers(workers.clone())
    .with_asset_store(assets.clone())
}

/// 创建测试用的 `ServiceContext`
pub fn create_test_context() -> TestContext {
    let store = Arc::new(MemoryStore::new());
    let dns = Arc::new(MockDnsProvider::new());
    let hosting = Arc::new(MockHostingPlatform::new());
    let workers = Arc::new(MockEdgeWorkers::new());
    let assets = Arc::new(MockAssetStore::new());
    let ctx = Arc::new(build_context(
        &store,
        &dns,
        &hosting,
        &workers,
        &assets,
        test_config(),
    ));
    TestContext {
        ctx,
        store,
        dns,
        hosting,
        workers,
        assets,
    }
}

pub async fn seed_domain(store: &MemoryStore, name: &str) -> Domain {
    let domain = Domain::new(name, DnsManagement::ProviderManaged).unwrap();
    store.put_domain(&domain).await;
    domain
}

/// Domain plus a `pending` attempt recorded through `begin_deployment`.
pub async fn seed_deployment(store: &MemoryStore, name: &str) -> DomainDeployment {
    let domain = seed_domain(store, name).await;
    let attempt = DomainDeployment::queued(&domain);
    assert!(store.begin_deployment(&attempt).await.unwrap());
    attempt
}

/// `deploying` attempt that already has a hosting handle.
pub async fn begin_attempt(t: &TestContext, name: &str, handle: &str) -> DomainDeployment {
    let mut attempt = seed_deployment(&t.store, name).await;
    attempt.status = AttemptStatus::Deploying;
    attempt.deployment_handle = Some(handle.to_string());
    attempt.deployment_url = Some(format!("https://{name}"));
    t.store.put_deployment(&attempt).await;
    attempt
}

pub async fn seed_landing_page(
    store: &MemoryStore,
    domain: &Domain,
    subdomain: Option<&str>,
) -> LandingPage {
    let page = LandingPage {
        id: Uuid::new_v4().to_string(),
        domain_id: domain.id.clone(),
        subdomain: subdomain.map(String::from),
        hosting_project_id: None,
        screenshot_key: None,
        worker_script: None,
        created_at: Utc::now(),
    };
    store.put_landing_page(&page).await;
    page
}

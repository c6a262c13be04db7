//! Application bootstrap for Launchpad.
//!
//! Provides `AppState` (service container), `AppStateBuilder` (adapter injection)
//! and `AppConfig` (TOML + environment configuration).

pub mod adapters;
pub mod config;

use std::sync::Arc;

use launchpad_core::error::{CoreError, CoreResult};
use launchpad_core::services::{
    BatchRunner, DeploymentOrchestrator, ServiceContext, TeardownOrchestrator, TokioJobQueue,
};
use launchpad_core::traits::{
    AssetStore, DeploymentRepository, DomainRepository, LandingPageRepository, SiteBundleSource,
};
use launchpad_core::OrchestratorConfig;
use launchpad_provider::{DnsClients, DnsProvider, EdgeWorkerApi, HostingPlatform};

pub use config::AppConfig;

/// Application state shared by every command.
///
/// Built once at startup via `AppStateBuilder`.
pub struct AppState {
    /// Service context (holds all adapters)
    pub ctx: Arc<ServiceContext>,
    /// Background pipelines
    pub jobs: Arc<TokioJobQueue>,
    pub orchestrator: Arc<DeploymentOrchestrator>,
    pub teardown: TeardownOrchestrator,
    pub batch: BatchRunner,
}

impl AppState {
    /// Run the startup sequence: re-enqueue deployments left in flight by a previous process.
    pub async fn run_startup(&self) -> CoreResult<Vec<String>> {
        match self.orchestrator.resume_in_flight().await {
            Ok(ids) => {
                if !ids.is_empty() {
                    log::info!("Resumed {} in-flight deployment(s)", ids.len());
                }
                Ok(ids)
            }
            Err(e) => {
                log::error!("Failed to resume in-flight deployments: {e}");
                Err(e)
            }
        }
    }

    /// Resolve once every background pipeline has finished.
    pub async fn wait_idle(&self) {
        self.jobs.wait_idle().await;
    }

    /// Accept either a domain id or a domain name.
    pub async fn resolve_domain_id(&self, id_or_name: &str) -> CoreResult<String> {
        let key = id_or_name.trim();
        if let Some(domain) = self.ctx.domain_repository.find_by_id(key).await? {
            return Ok(domain.id);
        }
        let name = launchpad_provider::normalize_domain_name(key);
        self.ctx
            .domain_repository
            .find_by_name(&name)
            .await?
            .map(|d| d.id)
            .ok_or_else(|| CoreError::DomainNotFound(key.to_string()))
    }
}

/// Builder for constructing `AppState` with platform-specific adapters.
///
/// # Required adapters
/// - the three repositories (or one `store` implementing all of them)
/// - `dns_provider`
/// - `hosting_platform`
///
/// # Optional
/// - `edge_workers`, `asset_store`, `site_bundles`
/// - `config` - defaults to `OrchestratorConfig::default()`
#[derive(Default)]
pub struct AppStateBuilder {
    domain_repository: Option<Arc<dyn DomainRepository>>,
    deployment_repository: Option<Arc<dyn DeploymentRepository>>,
    landing_page_repository: Option<Arc<dyn LandingPageRepository>>,
    dns_provider: Option<Arc<dyn DnsProvider>>,
    hosting_platform: Option<Arc<dyn HostingPlatform>>,
    edge_workers: Option<Arc<dyn EdgeWorkerApi>>,
    asset_store: Option<Arc<dyn AssetStore>>,
    site_bundles: Option<Arc<dyn SiteBundleSource>>,
    config: OrchestratorConfig,
}

impl AppStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use one store for all three repositories.
    #[must_use]
    pub fn store<S>(self, store: Arc<S>) -> Self
    where
        S: DomainRepository + DeploymentRepository + LandingPageRepository + 'static,
    {
        self.domain_repository(store.clone())
            .deployment_repository(store.clone())
            .landing_page_repository(store)
    }

    #[must_use]
    pub fn domain_repository(mut self, repo: Arc<dyn DomainRepository>) -> Self {
        self.domain_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn deployment_repository(mut self, repo: Arc<dyn DeploymentRepository>) -> Self {
        self.deployment_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn landing_page_repository(mut self, repo: Arc<dyn LandingPageRepository>) -> Self {
        self.landing_page_repository = Some(repo);
        self
    }

    #[must_use]
    pub fn dns_provider(mut self, provider: Arc<dyn DnsProvider>) -> Self {
        self.dns_provider = Some(provider);
        self
    }

    /// DNS provider plus its edge worker API, when it has one.
    #[must_use]
    pub fn dns_clients(mut self, clients: DnsClients) -> Self {
        self.dns_provider = Some(clients.dns);
        self.edge_workers = clients.edge_workers;
        self
    }

    #[must_use]
    pub fn hosting_platform(mut self, platform: Arc<dyn HostingPlatform>) -> Self {
        self.hosting_platform = Some(platform);
        self
    }

    #[must_use]
    pub fn edge_workers(mut self, workers: Arc<dyn EdgeWorkerApi>) -> Self {
        self.edge_workers = Some(workers);
        self
    }

    #[must_use]
    pub fn asset_store(mut self, store: Arc<dyn AssetStore>) -> Self {
        self.asset_store = Some(store);
        self
    }

    #[must_use]
    pub fn site_bundles(mut self, source: Arc<dyn SiteBundleSource>) -> Self {
        self.site_bundles = Some(source);
        self
    }

    #[must_use]
    pub fn config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// Open every adapter named in `config`: `SQLite` records, filesystem
    /// assets, Cloudflare and Vercel clients.
    #[cfg(feature = "sqlite-store")]
    pub async fn from_config(config: &AppConfig) -> CoreResult<Self> {
        let store = Arc::new(adapters::SqliteStore::new(&config.storage.database_path).await?);
        let dns = launchpad_provider::create_dns_clients(config.dns_credentials()?)?;
        let hosting = launchpad_provider::create_hosting_platform(config.hosting_credentials()?)?;

        let mut builder = Self::new()
            .store(store)
            .dns_clients(dns)
            .hosting_platform(hosting)
            .asset_store(Arc::new(adapters::FsAssetStore::new(
                config.storage.assets_dir.clone(),
            )))
            .config(config.orchestrator.clone());
        if let Some(sites_dir) = &config.storage.sites_dir {
            builder = builder.site_bundles(Arc::new(adapters::FsSiteBundles::new(sites_dir.clone())));
        }
        Ok(builder)
    }

    /// Build the `AppState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing,
    /// `CoreError::ConfigError` if the orchestrator settings are invalid.
    pub fn build(self) -> CoreResult<AppState> {
        let required = |name: &str| CoreError::ValidationError(format!("{name} is required"));
        let domain_repository = self
            .domain_repository
            .ok_or_else(|| required("domain_repository"))?;
        let deployment_repository = self
            .deployment_repository
            .ok_or_else(|| required("deployment_repository"))?;
        let landing_page_repository = self
            .landing_page_repository
            .ok_or_else(|| required("landing_page_repository"))?;
        let dns_provider = self.dns_provider.ok_or_else(|| required("dns_provider"))?;
        let hosting_platform = self
            .hosting_platform
            .ok_or_else(|| required("hosting_platform"))?;
        self.config.validate()?;

        let mut ctx = ServiceContext::new(
            domain_repository,
            deployment_repository,
            landing_page_repository,
            dns_provider,
            hosting_platform,
            self.config,
        );
        if let Some(workers) = self.edge_workers {
            ctx = ctx.with_edge_workers(workers);
        }
        if let Some(assets) = self.asset_store {
            ctx = ctx.with_asset_store(assets);
        }
        if let Some(bundles) = self.site_bundles {
            ctx = ctx.with_site_bundles(bundles);
        }
        let ctx = Arc::new(ctx);

        let jobs = Arc::new(TokioJobQueue::new());
        let orchestrator = Arc::new(DeploymentOrchestrator::new(
            Arc::clone(&ctx),
            jobs.clone(),
        ));
        let teardown = TeardownOrchestrator::new(Arc::clone(&ctx));
        let batch = BatchRunner::new(Arc::clone(&ctx), Arc::clone(&orchestrator));

        Ok(AppState {
            ctx,
            jobs,
            orchestrator,
            teardown,
            batch,
        })
    }
}

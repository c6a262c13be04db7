//! Application configuration.

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use launchpad_core::error::{CoreError, CoreResult};
use launchpad_core::OrchestratorConfig;
use launchpad_provider::{DnsCredentials, HostingCredentials};
use serde::Deserialize;

/// Default configuration file, looked up in the working directory.
pub const CONFIG_FILE: &str = "launchpad.toml";

/// Environment variable prefix. Nested keys use `__`, e.g. `LAUNCHPAD_MONITOR__POLL_INTERVAL_MS`.
pub const ENV_PREFIX: &str = "LAUNCHPAD_";

/// Top-level configuration for a Launchpad process.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Where records and assets live.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Cloudflare (DNS + workers) credentials.
    #[serde(default)]
    pub cloudflare: Option<CloudflareConfig>,

    /// Vercel (hosting) credentials.
    #[serde(default)]
    pub vercel: Option<VercelConfig>,

    /// `[monitor]`, `[dns]`, `[batch]` and `[deployment]` sections.
    #[serde(flatten)]
    pub orchestrator: OrchestratorConfig,
}

impl AppConfig {
    /// Load configuration from the default sources.
    ///
    /// Later sources override earlier ones:
    /// 1. Default values
    /// 2. `launchpad.toml` in the current directory (if present)
    /// 3. Environment variables with the `LAUNCHPAD_` prefix
    pub fn load() -> CoreResult<Self> {
        Self::from_file(CONFIG_FILE)
    }

    /// Load configuration from a specific TOML file, still honouring env overrides.
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        Self::from_figment(
            Figment::new()
                .merge(Toml::file(path.as_ref()))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> CoreResult<Self> {
        let config: Self = figment
            .extract()
            .map_err(|e| CoreError::ConfigError(e.to_string()))?;
        config.orchestrator.validate()?;
        Ok(config)
    }

    pub fn dns_credentials(&self) -> CoreResult<DnsCredentials> {
        let cloudflare = self
            .cloudflare
            .as_ref()
            .filter(|c| !c.api_token.trim().is_empty())
            .ok_or_else(|| {
                CoreError::ConfigError("cloudflare.api_token is required".to_string())
            })?;
        Ok(DnsCredentials::Cloudflare {
            api_token: cloudflare.api_token.clone(),
            account_id: cloudflare.account_id.clone(),
        })
    }

    pub fn hosting_credentials(&self) -> CoreResult<HostingCredentials> {
        let vercel = self
            .vercel
            .as_ref()
            .filter(|v| !v.api_token.trim().is_empty())
            .ok_or_else(|| CoreError::ConfigError("vercel.api_token is required".to_string()))?;
        Ok(HostingCredentials::Vercel {
            api_token: vercel.api_token.clone(),
            team_id: vercel.team_id.clone(),
            git_repository: vercel.git_repository.clone(),
            git_ref: vercel.git_ref.clone(),
        })
    }
}

/// Store locations.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// `SQLite` database file (created if missing).
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Root directory of stored assets such as screenshots.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// Directory holding one static site per domain name, used for direct uploads.
    #[serde(default)]
    pub sites_dir: Option<PathBuf>,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("launchpad.db")
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            assets_dir: default_assets_dir(),
            sites_dir: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudflareConfig {
    pub api_token: String,
    #[serde(default)]
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VercelConfig {
    pub api_token: String,
    #[serde(default)]
    pub team_id: Option<String>,
    /// `owner/repo` to import; direct upload is used when absent.
    #[serde(default)]
    pub git_repository: Option<String>,
    #[serde(default = "default_git_ref")]
    pub git_ref: String,
}

fn default_git_ref() -> String {
    "main".to_string()
}

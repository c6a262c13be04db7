//! Orchestrator settings injected at construction.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::HostingTargets;

/// Top-level orchestrator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    #[serde(default)]
    pub monitor: MonitorConfig,

    #[serde(default)]
    pub dns: DnsConfig,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub deployment: DeploymentConfig,
}

impl OrchestratorConfig {
    /// Reject settings that would make the pipeline misbehave.
    pub fn validate(&self) -> CoreResult<()> {
        if self.monitor.poll_interval_ms == 0 {
            return Err(CoreError::ConfigError(
                "monitor.poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.monitor.max_duration_ms < self.monitor.poll_interval_ms {
            return Err(CoreError::ConfigError(
                "monitor.max_duration_ms must be at least one poll interval".to_string(),
            ));
        }
        if self.batch.max_items == 0 {
            return Err(CoreError::ConfigError(
                "batch.max_items must be greater than 0".to_string(),
            ));
        }
        if self.dns.cname_target.trim().is_empty() || self.dns.apex_ipv4.trim().is_empty() {
            return Err(CoreError::ConfigError(
                "dns.cname_target and dns.apex_ipv4 are required".to_string(),
            ));
        }
        if self.dns.apex_ipv4.parse::<std::net::Ipv4Addr>().is_err() {
            return Err(CoreError::ConfigError(format!(
                "dns.apex_ipv4 is not an IPv4 address: {}",
                self.dns.apex_ipv4
            )));
        }
        Ok(())
    }
}

/// Deployment monitor timings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Delay between readyState polls.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Wall-clock budget before an attempt is failed as timed out.
    #[serde(default = "default_max_duration_ms")]
    pub max_duration_ms: u64,

    /// Extra tries for the final status write of an attempt.
    #[serde(default = "default_settle_retries")]
    pub settle_retries: u32,
}

impl MonitorConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn max_duration(&self) -> Duration {
        Duration::from_millis(self.max_duration_ms)
    }
}

const fn default_poll_interval_ms() -> u64 {
    10_000
}

const fn default_max_duration_ms() -> u64 {
    15 * 60 * 1000
}

const fn default_settle_retries() -> u32 {
    8
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            max_duration_ms: default_max_duration_ms(),
            settle_retries: default_settle_retries(),
        }
    }
}

/// DNS reconciliation defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsConfig {
    /// CNAME target published by the hosting platform.
    #[serde(default = "default_cname_target")]
    pub cname_target: String,

    /// Anycast IPv4 used when the apex cannot be a CNAME.
    #[serde(default = "default_apex_ipv4")]
    pub apex_ipv4: String,

    /// Extra record contents that already count as pointing at the platform.
    #[serde(default)]
    pub known_targets: Vec<String>,

    /// TTL for created records; 1 lets the provider choose.
    #[serde(default = "default_ttl")]
    pub ttl: u32,

    /// Register the zone at the DNS provider when no zone exists for the domain.
    #[serde(default = "default_true")]
    pub create_missing_zones: bool,
}

impl DnsConfig {
    pub fn hosting_targets(&self) -> HostingTargets {
        HostingTargets::new(&self.cname_target, &self.apex_ipv4)
            .with_known_targets(self.known_targets.iter().cloned())
    }
}

fn default_cname_target() -> String {
    "cname.vercel-dns.com".to_owned()
}

fn default_apex_ipv4() -> String {
    "76.76.21.21".to_owned()
}

const fn default_ttl() -> u32 {
    1
}

const fn default_true() -> bool {
    true
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            cname_target: default_cname_target(),
            apex_ipv4: default_apex_ipv4(),
            known_targets: Vec::new(),
            ttl: default_ttl(),
            create_missing_zones: default_true(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Largest accepted batch.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

const fn default_max_items() -> usize {
    50
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_items: default_max_items(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    /// Terminal attempts kept per domain.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

const fn default_history_limit() -> usize {
    20
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
        }
    }
}

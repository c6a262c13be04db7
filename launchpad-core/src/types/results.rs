//! 服务操作结果类型定义

use std::fmt;

use serde::{Deserialize, Serialize};

use super::deployment::{DomainDeployment, LogLevel};
use super::domain::Domain;

/// Result of `DeploymentOrchestrator::start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResult {
    pub started: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl StartResult {
    pub fn started(deployment_id: impl Into<String>) -> Self {
        Self {
            started: true,
            deployment_id: Some(deployment_id.into()),
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            started: false,
            deployment_id: None,
            reason: Some(reason.into()),
        }
    }
}

/// Domain plus its newest deployment attempt (with logs).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentStatusReport {
    pub domain: Domain,
    pub latest_deployment: Option<DomainDeployment>,
}

/// Terminal outcome of one monitor loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MonitorOutcome {
    Deployed,
    /// Platform reported `ERROR` or `CANCELED`
    Failed { state: String },
    TimedOut { elapsed_secs: u64 },
}

impl MonitorOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Deployed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileAction {
    Created,
    Skipped,
    Failed,
}

/// One line of DNS reconciliation output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileOutcome {
    /// e.g. `CNAME www.example.com`
    pub record: String,
    pub action: ReconcileAction,
    pub level: LogLevel,
    pub message: String,
}

impl ReconcileOutcome {
    pub fn created(record: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(record, ReconcileAction::Created, LogLevel::Info, message)
    }

    pub fn skipped(record: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(record, ReconcileAction::Skipped, LogLevel::Info, message)
    }

    pub fn failed(record: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(record, ReconcileAction::Failed, LogLevel::Warning, message)
    }

    fn new(
        record: impl Into<String>,
        action: ReconcileAction,
        level: LogLevel,
        message: impl Into<String>,
    ) -> Self {
        Self {
            record: record.into(),
            action,
            level,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }
}

/// Per-step outcome of a teardown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeardownResult {
    pub target_id: String,
    pub hostnames: Vec<String>,
    pub hosting_deregistered: bool,
    pub dns_records_deleted: bool,
    pub dns_records_removed: usize,
    pub edge_workers_removed: bool,
    pub assets_removed: bool,
    pub record_deleted: bool,
    pub messages: Vec<String>,
}

/// What a teardown removes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum TeardownTarget {
    Domain(String),
    LandingPage(String),
}

impl TeardownTarget {
    pub fn id(&self) -> &str {
        match self {
            Self::Domain(id) | Self::LandingPage(id) => id,
        }
    }
}

impl fmt::Display for TeardownTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(id) => write!(f, "domain {id}"),
            Self::LandingPage(id) => write!(f, "landing page {id}"),
        }
    }
}

/// Operation applied to every id of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOperation {
    Deploy,
    TeardownDomain,
    TeardownLandingPage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub id: String,
    pub reason: String,
}

/// 批量操作结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub success: Vec<String>,
    pub failed: Vec<BatchFailure>,
    pub summary: String,
}

impl BatchResult {
    pub fn new(success: Vec<String>, failed: Vec<BatchFailure>) -> Self {
        let summary = format!(
            "{} succeeded, {} failed ({} total)",
            success.len(),
            failed.len(),
            success.len() + failed.len()
        );
        Self {
            success,
            failed,
            summary,
        }
    }
}

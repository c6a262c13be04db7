//! 部署尝试记录类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::domain::{DeploymentStatus, Domain};

/// Status of a single deployment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    Pending,
    Deploying,
    Deployed,
    Failed,
}

impl AttemptStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Deployed | Self::Failed)
    }

    /// Allowed moves: `pending -> deploying`, `deploying -> deployed | failed`.
    ///
    /// `pending -> failed` is also allowed so an attempt that never left the
    /// queue can still be closed.
    pub fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Deploying | Self::Failed)
                | (Self::Deploying, Self::Deployed | Self::Failed)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Deploying => "deploying",
            Self::Deployed => "deployed",
            Self::Failed => "failed",
        }
    }
}

impl From<AttemptStatus> for DeploymentStatus {
    fn from(status: AttemptStatus) -> Self {
        match status {
            AttemptStatus::Pending => Self::Pending,
            AttemptStatus::Deploying => Self::Deploying,
            AttemptStatus::Deployed => Self::Deployed,
            AttemptStatus::Failed => Self::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// One line of a deployment log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentLogEntry {
    #[serde(with = "crate::utils::datetime")]
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub level: LogLevel,
}

impl DeploymentLogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            message: message.into(),
            level,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LogLevel::Error, message)
    }
}

/// 单次部署尝试
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainDeployment {
    pub id: String,
    pub domain_id: String,
    pub domain_name: String,
    /// Hosting platform deployment id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosting_project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_url: Option<String>,
    pub status: AttemptStatus,
    /// Append-only, oldest first
    #[serde(default)]
    pub logs: Vec<DeploymentLogEntry>,
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "crate::utils::datetime::option")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl DomainDeployment {
    /// New `pending` attempt for `domain`, seeded with the "Deployment queued" line.
    pub fn queued(domain: &Domain) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            domain_id: domain.id.clone(),
            domain_name: domain.name.clone(),
            deployment_handle: None,
            hosting_project_id: None,
            deployment_url: None,
            status: AttemptStatus::Pending,
            logs: vec![DeploymentLogEntry::info("Deployment queued")],
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

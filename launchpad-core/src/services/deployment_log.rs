//! Per-deployment log writer

use std::sync::Arc;

use crate::traits::DeploymentRepository;
use crate::types::{DeploymentLogEntry, LogLevel};

/// Appends lines to a deployment's stored log and mirrors them to the `log` facade.
///
/// Store failures are reported through `log` only; a lost log line never fails
/// the pipeline.
#[derive(Clone)]
pub struct DeploymentLog {
    repository: Arc<dyn DeploymentRepository>,
    deployment_id: String,
    domain_name: String,
}

impl DeploymentLog {
    pub fn new(
        repository: Arc<dyn DeploymentRepository>,
        deployment_id: impl Into<String>,
        domain_name: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            deployment_id: deployment_id.into(),
            domain_name: domain_name.into(),
        }
    }

    /// Append an info line.
    pub async fn info(&self, message: impl Into<String>) {
        self.record(LogLevel::Info, message).await;
    }

    /// Append a warning line.
    pub async fn warning(&self, message: impl Into<String>) {
        self.record(LogLevel::Warning, message).await;
    }

    /// Append an error line.
    pub async fn error(&self, message: impl Into<String>) {
        self.record(LogLevel::Error, message).await;
    }

    /// Append `message` at `level`; also emitted through `log`.
    pub async fn record(&self, level: LogLevel, message: impl Into<String>) {
        let entry = DeploymentLogEntry::new(level, message);
        match level {
            LogLevel::Info => log::info!("[{}] {}", self.domain_name, entry.message),
            LogLevel::Warning => log::warn!("[{}] {}", self.domain_name, entry.message),
            LogLevel::Error => log::error!("[{}] {}", self.domain_name, entry.message),
        }
        if let Err(e) = self
            .repository
            .append_log(&self.deployment_id, &entry)
            .await
        {
            log::error!(
                "Failed to append log line to deployment {}: {e}",
                self.deployment_id
            );
        }
    }
}

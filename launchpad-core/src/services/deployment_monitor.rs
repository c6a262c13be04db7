//! 部署状态轮询

use std::sync::Arc;
use std::time::Duration;

use launchpad_provider::ReadyState;
use tokio::time::Instant;

use crate::error::{CoreError, CoreResult};
use crate::services::{log_core_error, ServiceContext};
use crate::types::{AttemptStatus, MonitorOutcome};

/// 部署状态监控：轮询直到终态或超时
pub struct DeploymentMonitor {
    ctx: Arc<ServiceContext>,
}

impl DeploymentMonitor {
    /// 创建部署监控实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 每隔 `interval` 轮询一次部署状态，并写入最终状态
    ///
    /// 至少轮询一次；单次轮询失败记为警告并在下个周期重试。
    /// `READY` 时部署记录与域名均为 `deployed`，其余结果为 `failed`。
    pub async fn run(
        &self,
        deployment_handle: &str,
        deployment_id: &str,
        interval: Duration,
        max_duration: Duration,
    ) -> CoreResult<MonitorOutcome> {
        let attempt = self
            .ctx
            .deployment_repository
            .find_by_id(deployment_id)
            .await?
            .ok_or_else(|| CoreError::DeploymentNotFound(deployment_id.to_string()))?;
        let log = self.ctx.deployment_log(deployment_id, &attempt.domain_name);

        log.info(format!(
            "Monitoring deployment {deployment_handle} (every {}, up to {})",
            format_duration(interval),
            format_duration(max_duration)
        ))
        .await;

        let started = Instant::now();
        let outcome = loop {
            let state = self
                .ctx
                .hosting_platform
                .get_deployment_status(deployment_handle)
                .await;
            let elapsed = started.elapsed();

            match state {
                Ok(state) => {
                    log.info(format!(
                        "Deployment state {state} after {}",
                        format_duration(elapsed)
                    ))
                    .await;
                    if state.is_success() {
                        break MonitorOutcome::Deployed;
                    }
                    if state.is_terminal() {
                        break MonitorOutcome::Failed {
                            state: state.to_string(),
                        };
                    }
                }
                Err(e) => {
                    log.warning(format!(
                        "Status check failed after {}, will retry: {e}",
                        format_duration(elapsed)
                    ))
                    .await;
                }
            }

            if elapsed >= max_duration {
                break MonitorOutcome::TimedOut {
                    elapsed_secs: elapsed.as_secs(),
                };
            }
            tokio::time::sleep(interval).await;
        };

        match &outcome {
            MonitorOutcome::Deployed => {
                let url = attempt
                    .deployment_url
                    .as_deref()
                    .map(|u| format!(" at {u}"))
                    .unwrap_or_default();
                log.info(format!("Deployment is live{url}")).await;
            }
            MonitorOutcome::Failed { state } => {
                log.error(format!("Deployment failed: platform reported {state}"))
                    .await;
            }
            MonitorOutcome::TimedOut { .. } => {
                let err = CoreError::Timeout(format!(
                    "deployment {deployment_handle} did not reach {} within {}",
                    ReadyState::Ready,
                    format_duration(max_duration)
                ));
                log.error(format!("Deployment failed: {err}")).await;
            }
        }

        let status = if outcome.is_success() {
            AttemptStatus::Deployed
        } else {
            AttemptStatus::Failed
        };
        if let Err(e) = self.ctx.settle_attempt(deployment_id, status).await {
            log_core_error(
                &format!("Failed to record outcome of deployment {deployment_id}"),
                &e,
            );
            return Err(e);
        }
        Ok(outcome)
    }
}

fn format_duration(d: Duration) -> String {
    if d < Duration::from_secs(1) {
        format!("{}ms", d.as_millis())
    } else {
        format!("{}s", d.as_secs())
    }
}

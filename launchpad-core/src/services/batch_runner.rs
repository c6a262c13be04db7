//! 批量操作服务

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::{DeploymentOrchestrator, ServiceContext, TeardownOrchestrator};
use crate::types::{
    BatchFailure, BatchOperation, BatchResult, CreateDomainRequest, TeardownTarget,
};

/// 批量操作执行器：逐个处理，收集单项失败
pub struct BatchRunner {
    ctx: Arc<ServiceContext>,
    orchestrator: Arc<DeploymentOrchestrator>,
    teardown: TeardownOrchestrator,
}

impl BatchRunner {
    /// 创建批量操作服务实例
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>, orchestrator: Arc<DeploymentOrchestrator>) -> Self {
        Self {
            teardown: TeardownOrchestrator::new(Arc::clone(&ctx)),
            ctx,
            orchestrator,
        }
    }

    /// 按顺序对每个 id 执行 `op`，单项失败不会中断批次
    pub async fn run_batch(&self, ids: &[String], op: BatchOperation) -> CoreResult<BatchResult> {
        self.check_size(ids.len())?;
        log::info!("Running {op:?} over {} item(s)", ids.len());

        let mut success = Vec::new();
        let mut failed = Vec::new();
        for id in ids {
            match self.run_one(id, op).await {
                Ok(()) => success.push(id.clone()),
                Err(reason) => {
                    log::warn!("Batch {op:?} failed for {id}: {reason}");
                    failed.push(BatchFailure {
                        id: id.clone(),
                        reason,
                    });
                }
            }
        }

        let result = BatchResult::new(success, failed);
        log::info!("Batch {op:?}: {}", result.summary);
        Ok(result)
    }

    /// 批量创建域名并启动首次部署
    ///
    /// 结果中以域名标识每一项。
    pub async fn create_batch(&self, requests: Vec<CreateDomainRequest>) -> CoreResult<BatchResult> {
        self.check_size(requests.len())?;
        log::info!("Creating {} domain(s)", requests.len());

        let mut success = Vec::new();
        let mut failed = Vec::new();
        for request in requests {
            let name = request.name.trim().to_string();
            match self.create_one(request).await {
                Ok(()) => success.push(name),
                Err(reason) => {
                    log::warn!("Creating {name} failed: {reason}");
                    failed.push(BatchFailure { id: name, reason });
                }
            }
        }

        let result = BatchResult::new(success, failed);
        log::info!("Batch create: {}", result.summary);
        Ok(result)
    }

    fn check_size(&self, size: usize) -> CoreResult<()> {
        let max = self.ctx.config.batch.max_items;
        if size == 0 {
            return Err(CoreError::EmptyBatch);
        }
        if size > max {
            return Err(CoreError::BatchTooLarge { size, max });
        }
        Ok(())
    }

    async fn run_one(&self, id: &str, op: BatchOperation) -> Result<(), String> {
        match op {
            BatchOperation::Deploy => {
                let started = self.orchestrator.start(id).await.map_err(|e| e.to_string())?;
                if started.started {
                    Ok(())
                } else {
                    Err(started.reason.unwrap_or_else(|| "not started".to_string()))
                }
            }
            BatchOperation::TeardownDomain => self
                .teardown
                .delete(&TeardownTarget::Domain(id.to_string()))
                .await
                .map(|_| ())
                .map_err(|e| e.to_string()),
            BatchOperation::TeardownLandingPage => self
                .teardown
                .delete(&TeardownTarget::LandingPage(id.to_string()))
                .await
                .map(|_| ())
                .map_err(|e| e.to_string()),
        }
    }

    async fn create_one(&self, request: CreateDomainRequest) -> Result<(), String> {
        let domain = request.into_domain().map_err(|e| e.to_string())?;
        let existing = self
            .ctx
            .domain_repository
            .find_by_name(&domain.name)
            .await
            .map_err(|e| e.to_string())?;
        if existing.is_some() {
            return Err(format!("Domain {} already exists", domain.name));
        }
        self.ctx
            .domain_repository
            .save(&domain)
            .await
            .map_err(|e| e.to_string())?;

        let started = self
            .orchestrator
            .start(&domain.id)
            .await
            .map_err(|e| format!("Created, but deployment did not start: {e}"))?;
        if started.started {
            Ok(())
        } else {
            Err(format!(
                "Created, but deployment did not start: {}",
                started.reason.unwrap_or_default()
            ))
        }
    }
}

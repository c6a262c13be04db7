//! 后台任务队列抽象 Trait

use async_trait::async_trait;
use futures::future::BoxFuture;

/// A detached unit of work.
pub type Job = BoxFuture<'static, ()>;

/// Runs detached pipelines keyed by deployment id.
///
/// 平台实现:
/// - `TokioJobQueue` (in-process tokio tasks)
#[async_trait]
pub trait JobQueue: Send + Sync {
    /// Start `job` unless a job with the same key is still running.
    ///
    /// # Returns
    /// * `true` - the job was started
    /// * `false` - a job with this key is in flight; `job` is dropped
    async fn spawn(&self, key: &str, job: Job) -> bool;

    /// Keys of running jobs.
    async fn in_flight(&self) -> Vec<String>;
}

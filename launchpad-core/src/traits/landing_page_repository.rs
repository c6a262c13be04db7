//! 落地页持久化抽象 Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::LandingPage;

/// 落地页仓库 Trait
#[async_trait]
pub trait LandingPageRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> CoreResult<Option<LandingPage>>;

    async fn find_by_domain(&self, domain_id: &str) -> CoreResult<Vec<LandingPage>>;

    async fn save(&self, page: &LandingPage) -> CoreResult<()>;

    async fn delete(&self, id: &str) -> CoreResult<bool>;
}

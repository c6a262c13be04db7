//! 站点产物来源 Trait

use async_trait::async_trait;

use crate::error::CoreResult;
use crate::types::{Domain, SiteBundle};

/// Supplies pre-built landing page files for direct-upload deployments.
#[async_trait]
pub trait SiteBundleSource: Send + Sync {
    /// `None` when nothing has been generated for the domain.
    async fn bundle_for(&self, domain: &Domain) -> CoreResult<Option<SiteBundle>>;
}

//! Cloudflare Workers routes and scripts

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::traits::{EdgeWorkerApi, ErrorContext, ProviderErrorMapper};
use crate::types::WorkerRoute;

use super::CloudflareProvider;
use super::types::CloudflareWorkerRoute;

#[async_trait]
impl EdgeWorkerApi for CloudflareProvider {
    async fn list_worker_routes(&self, zone_id: &str) -> Result<Vec<WorkerRoute>> {
        let (routes, _): (Vec<CloudflareWorkerRoute>, _) = self
            .get_page(
                &format!("/zones/{zone_id}/workers/routes"),
                ErrorContext::resource(zone_id),
            )
            .await?;

        Ok(routes
            .into_iter()
            .map(|r| WorkerRoute {
                id: r.id,
                pattern: r.pattern,
                script: r.script,
            })
            .collect())
    }

    async fn delete_worker_route(&self, zone_id: &str, route_id: &str) -> Result<()> {
        self.delete(
            &format!("/zones/{zone_id}/workers/routes/{route_id}"),
            ErrorContext::resource(route_id),
        )
        .await
    }

    async fn delete_worker_script(&self, script_name: &str) -> Result<()> {
        let Some(account_id) = self.account_id.as_deref() else {
            return Err(ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "account_id".to_string(),
                detail: "an account id is required to delete worker scripts".to_string(),
            });
        };

        self.delete(
            &format!(
                "/accounts/{account_id}/workers/scripts/{}",
                urlencoding::encode(script_name)
            ),
            ErrorContext::resource(script_name),
        )
        .await
    }
}

//! Cloudflare DNS Provider

mod error;
mod http;
mod provider;
mod types;
mod workers;

use crate::http_client::ApiClient;

pub(crate) use types::{CloudflareDnsRecord, CloudflareResponse, CloudflareZone};

pub(crate) const CF_API_BASE: &str = "https://api.cloudflare.com/client/v4";
/// Cloudflare DNS Records API 单页最大记录数
pub(crate) const MAX_PAGE_SIZE_RECORDS: u32 = 100;

/// Cloudflare DNS provider and edge worker client.
pub struct CloudflareProvider {
    pub(crate) api: ApiClient,
    pub(crate) account_id: Option<String>,
}

impl CloudflareProvider {
    pub fn new(api_token: String, account_id: Option<String>) -> Self {
        Self {
            api: ApiClient::new("cloudflare", CF_API_BASE, api_token),
            account_id,
        }
    }

    /// Point the client at another API root (tests, proxies).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api = self.api.with_base_url(base_url);
        self
    }
}

//! Vercel hosting platform

mod error;
mod http;
mod platform;
mod types;

use crate::http_client::ApiClient;

pub(crate) const VERCEL_API_BASE: &str = "https://api.vercel.com";

/// Static settings for the Vercel client.
#[derive(Debug, Clone, Default)]
pub struct VercelConfig {
    pub team_id: Option<String>,
    /// `owner/repo` on GitHub; enables the git import deployment source.
    pub git_repository: Option<String>,
    pub git_ref: String,
}

/// Vercel hosting platform client.
pub struct VercelPlatform {
    pub(crate) api: ApiClient,
    pub(crate) config: VercelConfig,
}

impl VercelPlatform {
    pub fn new(api_token: String, config: VercelConfig) -> Self {
        Self {
            api: ApiClient::new("vercel", VERCEL_API_BASE, api_token),
            config,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.api = self.api.with_base_url(base_url);
        self
    }
}

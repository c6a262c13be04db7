//! 落地页类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A landing page served under a domain (apex or subdomain).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingPage {
    pub id: String,
    pub domain_id: String,
    /// `None` means the apex
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosting_project_id: Option<String>,
    /// Blob key of the stored screenshot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot_key: Option<String>,
    /// Edge worker script serving this page, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_script: Option<String>,
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
}

impl LandingPage {
    /// Hostname the page is served on.
    pub fn hostname(&self, domain_name: &str) -> String {
        match self.subdomain.as_deref().map(str::trim) {
            Some(sub) if !sub.is_empty() && sub != "@" => format!("{sub}.{domain_name}"),
            _ => domain_name.to_string(),
        }
    }
}

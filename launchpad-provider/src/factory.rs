//! Factory functions turning credentials into trait objects.

use std::sync::Arc;

use crate::error::Result;
use crate::traits::{DnsProvider, EdgeWorkerApi, HostingPlatform};
use crate::types::{DnsCredentials, HostingCredentials};
use crate::utils::log_sanitizer::mask_secret;

#[cfg(feature = "cloudflare")]
use crate::providers::CloudflareProvider;
#[cfg(feature = "vercel")]
use crate::providers::{VercelConfig, VercelPlatform};

/// DNS handles built from one set of credentials.
///
/// Cloudflare serves both DNS and edge workers, so both handles point at the same client.
pub struct DnsClients {
    pub dns: Arc<dyn DnsProvider>,
    pub edge_workers: Option<Arc<dyn EdgeWorkerApi>>,
}

/// Creates the DNS provider (and its edge worker API, when it has one).
///
/// # Examples
///
/// ```rust,no_run
/// use launchpad_provider::{create_dns_clients, DnsCredentials};
///
/// let clients = create_dns_clients(DnsCredentials::Cloudflare {
///     api_token: "your-token".to_string(),
///     account_id: Some("account-id".to_string()),
/// }).unwrap();
/// assert!(clients.edge_workers.is_some());
/// ```
pub fn create_dns_clients(credentials: DnsCredentials) -> Result<DnsClients> {
    match credentials {
        #[cfg(feature = "cloudflare")]
        DnsCredentials::Cloudflare {
            api_token,
            account_id,
        } => {
            log::debug!(
                "Creating Cloudflare client (token {}, account {})",
                mask_secret(&api_token),
                account_id.as_deref().unwrap_or("-")
            );
            let provider = Arc::new(CloudflareProvider::new(api_token, account_id));
            Ok(DnsClients {
                dns: provider.clone(),
                edge_workers: Some(provider),
            })
        }
    }
}

/// Creates a [`HostingPlatform`] from the given credentials.
pub fn create_hosting_platform(credentials: HostingCredentials) -> Result<Arc<dyn HostingPlatform>> {
    match credentials {
        #[cfg(feature = "vercel")]
        HostingCredentials::Vercel {
            api_token,
            team_id,
            git_repository,
            git_ref,
        } => {
            log::debug!(
                "Creating Vercel client (token {}, team {})",
                mask_secret(&api_token),
                team_id.as_deref().unwrap_or("-")
            );
            Ok(Arc::new(VercelPlatform::new(
                api_token,
                VercelConfig {
                    team_id,
                    git_repository,
                    git_ref,
                },
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cloudflare_serves_dns_and_workers() {
        let clients = create_dns_clients(DnsCredentials::Cloudflare {
            api_token: "token".into(),
            account_id: None,
        })
        .unwrap();
        assert_eq!(clients.dns.id(), "cloudflare");
        assert!(clients.edge_workers.is_some());
    }

    #[test]
    fn vercel_platform_from_credentials() {
        let platform = create_hosting_platform(HostingCredentials::Vercel {
            api_token: "token".into(),
            team_id: Some("team_1".into()),
            git_repository: None,
            git_ref: "main".into(),
        })
        .unwrap();
        assert_eq!(platform.id(), "vercel");
    }
}

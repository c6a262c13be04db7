//! # launchpad-provider
//!
//! Clients for the external systems a domain passes through on its way to a
//! deployed landing page: the DNS provider that owns the zone, and the hosting
//! platform that builds and serves the site.
//!
//! ## Supported Backends
//!
//! | Backend | Trait(s) | Feature Flag | Auth Method |
//! |---------|----------|-------------|-------------|
//! | [Cloudflare](https://www.cloudflare.com/) | [`DnsProvider`], [`EdgeWorkerApi`] | `cloudflare` | Bearer Token |
//! | [Vercel](https://vercel.com/) | [`HostingPlatform`] | `vercel` | Bearer Token (+ team scope) |
//!
//! ## Feature Flags
//!
//! - **`all-providers`** *(default)* - Enable every backend above.
//! - **`native-tls`** *(default)* / **`rustls`** - TLS backend for `reqwest`.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use launchpad_provider::{create_dns_clients, DnsCredentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let clients = create_dns_clients(DnsCredentials::Cloudflare {
//!         api_token: "your-token".to_string(),
//!         account_id: None,
//!     })?;
//!
//!     if let Some(zone_id) = clients.dns.find_zone_by_name("example.com").await? {
//!         for record in clients.dns.list_records(&zone_id).await? {
//!             println!("{} {} -> {}", record.name, record.record_type, record.content);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`Result<T, ProviderError>`](ProviderError).
//! [`ProviderError::kind`] gives a closed [`ErrorKind`] derived from the
//! backend's documented error codes, which is what orchestration code should
//! branch on (e.g. fall back when a record is rejected, reuse a zone that
//! already exists).
//!
//! Transient errors (`Network`, `Timeout`, `RateLimited`) are retried with
//! exponential backoff inside the HTTP layer.

mod error;
mod factory;
mod http_client;
mod providers;
mod traits;
mod types;
mod utils;

pub use error::{ErrorKind, ProviderError, Result};

pub use factory::{DnsClients, create_dns_clients, create_hosting_platform};

pub use traits::{DnsProvider, EdgeWorkerApi, HostingPlatform};

pub use types::{
    ConfigurationDnsRecord, CreateDnsRecordRequest, DnsCredentials, DnsRecord, DnsRecordType,
    HostingCredentials, HostingDomainStatus, HostingRegistration, ProviderZone, ReadyState,
    RegisterDomainRequest, SiteBundle, SiteFile, WorkerRoute,
};

pub use providers::common::{normalize_domain_name, relative_to_full_name, same_host};

#[cfg(feature = "cloudflare")]
pub use providers::CloudflareProvider;

#[cfg(feature = "vercel")]
pub use providers::{VercelConfig, VercelPlatform};

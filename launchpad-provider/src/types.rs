use std::fmt;

use serde::{Deserialize, Serialize};

// ============ DNS ============

/// DNS record types the orchestrator reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DnsRecordType {
    A,
    Aaaa,
    Cname,
    Txt,
    Mx,
    Ns,
    /// Anything else the provider returns; never created by us.
    #[serde(other)]
    Other,
}

impl DnsRecordType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Txt => "TXT",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Other => "OTHER",
        }
    }

    /// Record types that route traffic for a hostname.
    pub fn is_address_like(self) -> bool {
        matches!(self, Self::A | Self::Aaaa | Self::Cname)
    }
}

impl fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record as stored by the DNS provider. `name` is always the fully-qualified host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    pub id: String,
    pub zone_id: String,
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: bool,
}

/// 创建 DNS 记录请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDnsRecordRequest {
    pub zone_id: String,
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    /// Fully-qualified host name.
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: bool,
}

/// A DNS zone hosted at the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderZone {
    pub id: String,
    pub name: String,
    /// Provider status string (`active`, `pending`, ...).
    pub status: String,
    /// Nameservers the registrar must delegate to, when the zone is new.
    #[serde(default)]
    pub name_servers: Vec<String>,
}

// ============ Hosting ============

/// A record the hosting platform asks to be present (verification TXT, routing CNAME/A).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationDnsRecord {
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    /// Fully-qualified host name.
    pub name: String,
    pub value: String,
}

/// One file of a pre-built static site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteFile {
    /// Path relative to the deployment root, e.g. `index.html`.
    pub path: String,
    pub contents: Vec<u8>,
}

/// A static site ready for direct upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteBundle {
    pub files: Vec<SiteFile>,
}

impl SiteBundle {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Input to `HostingPlatform::register_domain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterDomainRequest {
    pub name: String,
    /// Reuse this project instead of creating or looking one up.
    pub project_id: Option<String>,
    /// Files for direct upload when no git source is configured.
    pub bundle: Option<SiteBundle>,
}

/// Handles returned by a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostingRegistration {
    pub deployment_id: String,
    pub project_id: String,
    /// Candidate URLs, most specific first.
    pub urls: Vec<String>,
    pub configuration_dns_records: Option<Vec<ConfigurationDnsRecord>>,
}

impl HostingRegistration {
    pub fn primary_url(&self) -> Option<&str> {
        self.urls.first().map(String::as_str)
    }
}

/// Registration/verification state of a domain on the hosting platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostingDomainStatus {
    pub exists: bool,
    pub verified: bool,
    pub configuration_dns_records: Option<Vec<ConfigurationDnsRecord>>,
}

/// Deployment `readyState` as reported by the hosting platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReadyState {
    Queued,
    Building,
    Initializing,
    Ready,
    Error,
    Canceled,
    /// A state this client does not know; treated as still in progress.
    #[serde(untagged)]
    Unknown(String),
}

impl ReadyState {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_uppercase().as_str() {
            "QUEUED" => Self::Queued,
            "BUILDING" => Self::Building,
            "INITIALIZING" => Self::Initializing,
            "READY" => Self::Ready,
            "ERROR" => Self::Error,
            "CANCELED" | "CANCELLED" => Self::Canceled,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Ready | Self::Error | Self::Canceled)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => f.write_str("QUEUED"),
            Self::Building => f.write_str("BUILDING"),
            Self::Initializing => f.write_str("INITIALIZING"),
            Self::Ready => f.write_str("READY"),
            Self::Error => f.write_str("ERROR"),
            Self::Canceled => f.write_str("CANCELED"),
            Self::Unknown(raw) => f.write_str(raw),
        }
    }
}

// ============ Edge workers ============

/// A route binding a hostname pattern to an edge worker script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerRoute {
    pub id: String,
    /// e.g. `shop.example.com/*`
    pub pattern: String,
    pub script: Option<String>,
}

impl WorkerRoute {
    /// Whether the route pattern targets `hostname` exactly (ignoring path and wildcard suffix).
    pub fn matches_host(&self, hostname: &str) -> bool {
        let host = self
            .pattern
            .split('/')
            .next()
            .unwrap_or_default()
            .trim_start_matches("*.");
        host.eq_ignore_ascii_case(hostname)
    }
}

// ============ Credentials ============

/// DNS provider credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum DnsCredentials {
    Cloudflare {
        api_token: String,
        /// Needed for zone creation and worker script removal.
        account_id: Option<String>,
    },
}

/// Hosting platform credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "snake_case")]
pub enum HostingCredentials {
    Vercel {
        api_token: String,
        team_id: Option<String>,
        /// `owner/repo` imported for new deployments; direct upload is used when absent.
        git_repository: Option<String>,
        #[serde(default = "default_git_ref")]
        git_ref: String,
    },
}

fn default_git_ref() -> String {
    "main".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_state_parsing_and_terminality() {
        assert_eq!(ReadyState::parse("building"), ReadyState::Building);
        assert_eq!(ReadyState::parse("CANCELED"), ReadyState::Canceled);
        assert!(ReadyState::Ready.is_terminal());
        assert!(ReadyState::Error.is_terminal());
        assert!(!ReadyState::Initializing.is_terminal());

        let odd = ReadyState::parse("PAUSED");
        assert_eq!(odd, ReadyState::Unknown("PAUSED".to_string()));
        assert!(!odd.is_terminal());
        assert_eq!(odd.to_string(), "PAUSED");
    }

    #[test]
    fn ready_state_deserializes_unknown_values() {
        let state: ReadyState = serde_json::from_str("\"READY\"").unwrap();
        assert_eq!(state, ReadyState::Ready);
        let state: ReadyState = serde_json::from_str("\"PAUSED\"").unwrap();
        assert_eq!(state, ReadyState::Unknown("PAUSED".to_string()));
    }

    #[test]
    fn record_type_wire_names() {
        let t: DnsRecordType = serde_json::from_str("\"AAAA\"").unwrap();
        assert_eq!(t, DnsRecordType::Aaaa);
        let t: DnsRecordType = serde_json::from_str("\"SRV\"").unwrap();
        assert_eq!(t, DnsRecordType::Other);
        assert!(DnsRecordType::Cname.is_address_like());
        assert!(!DnsRecordType::Txt.is_address_like());
    }

    #[test]
    fn worker_route_host_matching() {
        let route = WorkerRoute {
            id: "r1".into(),
            pattern: "Shop.Example.com/*".into(),
            script: Some("shop-worker".into()),
        };
        assert!(route.matches_host("shop.example.com"));
        assert!(!route.matches_host("example.com"));

        let wildcard = WorkerRoute {
            id: "r2".into(),
            pattern: "*.example.com/*".into(),
            script: None,
        };
        assert!(wildcard.matches_host("example.com"));
    }

    #[test]
    fn hosting_credentials_default_ref() {
        let creds: HostingCredentials = serde_json::from_str(
            r#"{"provider":"vercel","api_token":"t","team_id":null,"git_repository":"acme/site"}"#,
        )
        .unwrap();
        let HostingCredentials::Vercel { git_ref, .. } = creds;
        assert_eq!(git_ref, "main");
    }
}

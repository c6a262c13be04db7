//! 域名记录类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// Who owns the zone for a domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DnsManagement {
    /// Zone lives in our DNS provider account; records are reconciled automatically.
    #[default]
    ProviderManaged,
    /// Customer DNS; we only report the records they must configure.
    ExternallyManaged,
}

/// Domain-level deployment status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    #[default]
    NotDeployed,
    Pending,
    Deploying,
    Deployed,
    Failed,
}

impl DeploymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotDeployed => "not_deployed",
            Self::Pending => "pending",
            Self::Deploying => "deploying",
            Self::Deployed => "deployed",
            Self::Failed => "failed",
        }
    }
}

/// Hosting platform verification state for a domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Verified,
    Pending,
    #[default]
    NotRegistered,
    /// Provider string we do not model.
    #[serde(untagged)]
    Other(String),
}

impl VerificationStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "verified" => Self::Verified,
            "pending" => Self::Pending,
            "not_registered" => Self::NotRegistered,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Verified => "verified",
            Self::Pending => "pending",
            Self::NotRegistered => "not_registered",
            Self::Other(raw) => raw,
        }
    }
}

/// A provisioned customer-facing hostname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    /// 域名 ID (UUID)
    pub id: String,
    /// Lowercase FQDN without trailing dot
    pub name: String,
    pub dns_management: DnsManagement,
    /// DNS 提供商 Zone ID（仅 provider_managed）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub deployment_status: DeploymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosting_project_id: Option<String>,
    #[serde(default, with = "crate::utils::datetime::option")]
    pub last_deployed_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::utils::datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::utils::datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Domain {
    /// 创建新域名（名称已校验并规范化）
    pub fn new(name: &str, dns_management: DnsManagement) -> CoreResult<Self> {
        let name = validate_domain_name(name)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            dns_management,
            zone_id: None,
            is_active: true,
            verification_status: VerificationStatus::NotRegistered,
            deployment_status: DeploymentStatus::NotDeployed,
            deployment_url: None,
            hosting_project_id: None,
            last_deployed_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_provider_managed(&self) -> bool {
        self.dns_management == DnsManagement::ProviderManaged
    }

    /// `www.` host for this domain.
    pub fn www_name(&self) -> String {
        format!("www.{}", self.name)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Input for creating a domain record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDomainRequest {
    pub name: String,
    #[serde(default)]
    pub dns_management: DnsManagement,
    /// Known zone id, skips zone resolution.
    #[serde(default)]
    pub zone_id: Option<String>,
}

impl CreateDomainRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dns_management: DnsManagement::default(),
            zone_id: None,
        }
    }

    pub fn into_domain(self) -> CoreResult<Domain> {
        let mut domain = Domain::new(&self.name, self.dns_management)?;
        domain.zone_id = self.zone_id.filter(|z| !z.trim().is_empty());
        Ok(domain)
    }
}

/// Normalize and validate a hostname: at least two labels, LDH labels of 1-63
/// characters, 253 characters overall.
pub fn validate_domain_name(raw: &str) -> CoreResult<String> {
    let name = launchpad_provider::normalize_domain_name(raw);
    let invalid = |why: &str| CoreError::ValidationError(format!("Invalid domain name '{raw}': {why}"));

    if name.is_empty() {
        return Err(CoreError::ValidationError("Domain name is required".to_string()));
    }
    if name.len() > 253 {
        return Err(invalid("longer than 253 characters"));
    }
    if !matches!(url::Host::parse(&name), Ok(url::Host::Domain(_))) {
        return Err(invalid("not a hostname"));
    }

    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 2 {
        return Err(invalid("missing top-level domain"));
    }
    for label in &labels {
        if label.is_empty() || label.len() > 63 {
            return Err(invalid("label length must be 1-63"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid("label cannot start or end with '-'"));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(invalid("only letters, digits and '-' are allowed"));
        }
    }
    Ok(name)
}

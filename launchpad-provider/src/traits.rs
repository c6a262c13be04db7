use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{
    CreateDnsRecordRequest, DnsRecord, HostingDomainStatus, HostingRegistration, ProviderZone,
    ReadyState, RegisterDomainRequest, WorkerRoute,
};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（各 Provider 格式不同）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
    /// HTTP status, when the error came with a non-2xx response.
    pub status: Option<u16>,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
            status: None,
        }
    }

    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// 记录名称（用于 `RecordExists` 等错误）
    pub record_name: Option<String>,
    /// 记录 ID（用于 `RecordNotFound` 等错误）
    pub record_id: Option<String>,
    /// Zone, project, deployment or domain the call targeted.
    pub resource: Option<String>,
}

impl ErrorContext {
    pub fn resource(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            ..Self::default()
        }
    }

    pub fn record(name: impl Into<String>) -> Self {
        Self {
            record_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn record_id(id: impl Into<String>) -> Self {
        Self {
            record_id: Some(id.into()),
            ..Self::default()
        }
    }

    pub(crate) fn resource_or_unknown(&self) -> String {
        self.resource
            .clone()
            .unwrap_or_else(|| "<unknown>".to_string())
    }
}

/// Provider 错误映射 Trait（内部使用）
/// 各 Provider 实现此 trait 以将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回 Provider 标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：解析错误
    fn parse_error(&self, detail: impl ToString) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: detail.to_string(),
        }
    }

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }

    /// Map by HTTP status alone, for bodies without a recognised code.
    fn map_status(&self, raw: RawApiError, context: &ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        match raw.status {
            Some(401) => ProviderError::InvalidCredentials {
                provider,
                raw_message: Some(raw.message),
            },
            Some(403) => ProviderError::PermissionDenied {
                provider,
                raw_message: Some(raw.message),
            },
            Some(404) => ProviderError::ResourceNotFound {
                provider,
                resource: context.resource_or_unknown(),
                raw_message: Some(raw.message),
            },
            Some(409) => ProviderError::Conflict {
                provider,
                resource: context.resource_or_unknown(),
                raw_message: Some(raw.message),
            },
            Some(400 | 422) => ProviderError::InvalidParameter {
                provider,
                param: "request".to_string(),
                detail: raw.message,
            },
            _ => self.unknown_error(raw),
        }
    }
}

/// DNS 提供商 Trait
///
/// Hostnames are always fully qualified; implementations translate to their own
/// relative naming if needed.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// All records in a zone (every page).
    async fn list_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>>;

    async fn create_record(&self, req: &CreateDnsRecordRequest) -> Result<DnsRecord>;

    async fn delete_record(&self, zone_id: &str, record_id: &str) -> Result<()>;

    /// Zone id for an exact zone name, `None` when the account has no such zone.
    async fn find_zone_by_name(&self, name: &str) -> Result<Option<String>>;

    /// Register a new zone. Fails with an `AlreadyExists`-kind error if it exists.
    async fn create_zone(&self, name: &str) -> Result<ProviderZone>;
}

/// Hosting/deployment platform.
#[async_trait]
pub trait HostingPlatform: Send + Sync {
    fn id(&self) -> &'static str;

    /// Ensure the project, attach the domain and start a deployment.
    ///
    /// Safe to call again for a domain that is already attached.
    async fn register_domain(&self, req: &RegisterDomainRequest) -> Result<HostingRegistration>;

    async fn get_domain_status(
        &self,
        name: &str,
        project_id: Option<&str>,
    ) -> Result<HostingDomainStatus>;

    async fn get_deployment_status(&self, deployment_id: &str) -> Result<ReadyState>;

    /// Detach the domain. Removing a domain that is not attached succeeds.
    async fn delete_domain(&self, name: &str, project_id: Option<&str>) -> Result<()>;
}

/// Edge worker routes and scripts bound to a zone.
#[async_trait]
pub trait EdgeWorkerApi: Send + Sync {
    async fn list_worker_routes(&self, zone_id: &str) -> Result<Vec<WorkerRoute>>;

    async fn delete_worker_route(&self, zone_id: &str, route_id: &str) -> Result<()>;

    async fn delete_worker_script(&self, script_name: &str) -> Result<()>;
}

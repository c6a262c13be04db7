use serde::{Deserialize, Serialize};

/// Unified error type for DNS provider and hosting platform operations.
///
/// Each variant includes a `provider` field identifying which backend produced the error,
/// plus variant-specific context. All variants are serializable for structured error reporting.
///
/// # Retryable Errors
///
/// The following variants represent transient failures that may succeed on retry:
/// - [`NetworkError`](Self::NetworkError) - network connectivity issues
/// - [`Timeout`](Self::Timeout) - request timed out
/// - [`RateLimited`](Self::RateLimited) - API rate limit exceeded
///
/// The built-in HTTP client automatically retries these with exponential backoff.
///
/// Callers that need to branch on the failure class should use [`ProviderError::kind`]
/// instead of inspecting messages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// A network-level error occurred (DNS resolution failure, connection refused, 5xx gateway).
    NetworkError {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// The provided credentials are invalid or expired.
    InvalidCredentials {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The authenticated token lacks permission for the requested operation.
    PermissionDenied {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// A DNS record with the same name/type already exists.
    RecordExists {
        /// Provider that produced the error.
        provider: String,
        /// Name of the conflicting record.
        record_name: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The specified DNS record was not found.
    RecordNotFound {
        /// Provider that produced the error.
        provider: String,
        /// ID of the record that was not found.
        record_id: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// A resource (zone, project, domain attachment) already exists.
    ResourceExists {
        /// Provider that produced the error.
        provider: String,
        /// Name or id of the conflicting resource.
        resource: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// A resource (zone, project, deployment, domain, worker) was not found.
    ResourceNotFound {
        /// Provider that produced the error.
        provider: String,
        /// Name or id of the missing resource.
        resource: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The resource is in use by another owner (e.g. a domain attached to a different project).
    Conflict {
        /// Provider that produced the error.
        provider: String,
        /// Name or id of the contested resource.
        resource: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// A request parameter is invalid (e.g., bad TTL value, CNAME not allowed at apex).
    InvalidParameter {
        /// Provider that produced the error.
        provider: String,
        /// Name of the invalid parameter.
        param: String,
        /// Description of what's wrong.
        detail: String,
    },

    /// The requested operation or record type is not supported by this provider.
    Unsupported {
        /// Provider that produced the error.
        provider: String,
        /// What was requested.
        detail: String,
    },

    /// The account's resource quota has been exceeded.
    ///
    /// Unlike [`RateLimited`](Self::RateLimited), this is not a transient condition.
    QuotaExceeded {
        /// Provider that produced the error.
        provider: String,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The API rate limit has been exceeded (HTTP 429 or equivalent).
    RateLimited {
        /// Provider that produced the error.
        provider: String,
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original error message from the provider API, if available.
        raw_message: Option<String>,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Provider that produced the error.
        provider: String,
        /// Error details.
        detail: String,
    },

    /// Failed to parse the provider's API response.
    ParseError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the parse failure.
        detail: String,
    },

    /// Failed to serialize a request body.
    SerializationError {
        /// Provider that produced the error.
        provider: String,
        /// Details about the serialization failure.
        detail: String,
    },

    /// An unrecognized error from the provider API.
    ///
    /// This is a catch-all for error codes not yet mapped to a specific variant.
    Unknown {
        /// Provider that produced the error.
        provider: String,
        /// Raw error code from the API, if available.
        raw_code: Option<String>,
        /// Raw error message from the API.
        raw_message: String,
    },
}

/// Closed classification of provider failures.
///
/// Derived from provider-documented error codes when the error is constructed, so
/// orchestration code can choose fallbacks without matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Timeout,
    RateLimited,
    Auth,
    PermissionDenied,
    NotFound,
    AlreadyExists,
    Conflict,
    InvalidParameter,
    Unsupported,
    Quota,
    Parse,
    Unknown,
}

impl ErrorKind {
    /// Transient failures worth retrying later.
    #[must_use]
    pub fn is_transient(self) -> bool {
        matches!(self, Self::Network | Self::Timeout | Self::RateLimited)
    }

    /// The provider understood the request and refused it.
    #[must_use]
    pub fn is_rejection(self) -> bool {
        matches!(
            self,
            Self::InvalidParameter | Self::Conflict | Self::Unsupported | Self::AlreadyExists
        )
    }
}

impl ProviderError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NetworkError { .. } => ErrorKind::Network,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::InvalidCredentials { .. } => ErrorKind::Auth,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::RecordNotFound { .. } | Self::ResourceNotFound { .. } => ErrorKind::NotFound,
            Self::RecordExists { .. } | Self::ResourceExists { .. } => ErrorKind::AlreadyExists,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::QuotaExceeded { .. } => ErrorKind::Quota,
            Self::ParseError { .. } | Self::SerializationError { .. } => ErrorKind::Parse,
            Self::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /// Provider label carried by every variant.
    #[must_use]
    pub fn provider(&self) -> &str {
        match self {
            Self::NetworkError { provider, .. }
            | Self::InvalidCredentials { provider, .. }
            | Self::PermissionDenied { provider, .. }
            | Self::RecordExists { provider, .. }
            | Self::RecordNotFound { provider, .. }
            | Self::ResourceExists { provider, .. }
            | Self::ResourceNotFound { provider, .. }
            | Self::Conflict { provider, .. }
            | Self::InvalidParameter { provider, .. }
            | Self::Unsupported { provider, .. }
            | Self::QuotaExceeded { provider, .. }
            | Self::RateLimited { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::ParseError { provider, .. }
            | Self::SerializationError { provider, .. }
            | Self::Unknown { provider, .. } => provider,
        }
    }

    /// 是否为预期行为（用户输入、资源不存在等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::PermissionDenied { .. }
                | Self::RecordExists { .. }
                | Self::RecordNotFound { .. }
                | Self::ResourceExists { .. }
                | Self::ResourceNotFound { .. }
                | Self::Conflict { .. }
                | Self::InvalidParameter { .. }
                | Self::Unsupported { .. }
                | Self::QuotaExceeded { .. }
        )
    }
}

fn write_with_message(
    f: &mut std::fmt::Formatter<'_>,
    head: std::fmt::Arguments<'_>,
    raw_message: Option<&String>,
) -> std::fmt::Result {
    match raw_message {
        Some(msg) => write!(f, "{head}: {msg}"),
        None => write!(f, "{head}"),
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::InvalidCredentials {
                provider,
                raw_message,
            } => write_with_message(
                f,
                format_args!("[{provider}] Invalid credentials"),
                raw_message.as_ref(),
            ),
            Self::PermissionDenied {
                provider,
                raw_message,
            } => write_with_message(
                f,
                format_args!("[{provider}] Permission denied"),
                raw_message.as_ref(),
            ),
            Self::RecordExists {
                provider,
                record_name,
                ..
            } => {
                write!(f, "[{provider}] Record '{record_name}' already exists")
            }
            Self::RecordNotFound {
                provider,
                record_id,
                ..
            } => {
                write!(f, "[{provider}] Record '{record_id}' not found")
            }
            Self::ResourceExists {
                provider,
                resource,
                raw_message,
            } => write_with_message(
                f,
                format_args!("[{provider}] '{resource}' already exists"),
                raw_message.as_ref(),
            ),
            Self::ResourceNotFound {
                provider,
                resource,
                raw_message,
            } => write_with_message(
                f,
                format_args!("[{provider}] '{resource}' not found"),
                raw_message.as_ref(),
            ),
            Self::Conflict {
                provider,
                resource,
                raw_message,
            } => write_with_message(
                f,
                format_args!("[{provider}] '{resource}' is in use"),
                raw_message.as_ref(),
            ),
            Self::InvalidParameter {
                provider,
                param,
                detail,
            } => {
                write!(f, "[{provider}] Invalid parameter '{param}': {detail}")
            }
            Self::Unsupported { provider, detail } => {
                write!(f, "[{provider}] Unsupported: {detail}")
            }
            Self::QuotaExceeded { provider, .. } => {
                write!(f, "[{provider}] Quota exceeded")
            }
            Self::RateLimited {
                provider,
                retry_after,
                ..
            } => {
                if let Some(secs) = retry_after {
                    write!(f, "[{provider}] Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "[{provider}] Rate limited")
                }
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::SerializationError { provider, detail } => {
                write!(f, "[{provider}] Serialization error: {detail}")
            }
            Self::Unknown {
                provider,
                raw_message,
                ..
            } => {
                write!(f, "[{provider}] {raw_message}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;

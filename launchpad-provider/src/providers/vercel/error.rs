//! Vercel error mapping
//!
//! Reference: <https://vercel.com/docs/rest-api/errors>

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::VercelPlatform;

impl ProviderErrorMapper for VercelPlatform {
    fn provider_name(&self) -> &'static str {
        "vercel"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        match raw.code.as_deref() {
            Some("invalid_token" | "not_authorized" | "missing_token") => {
                ProviderError::InvalidCredentials {
                    provider,
                    raw_message: Some(raw.message),
                }
            }
            Some("forbidden" | "team_unauthorized") => ProviderError::PermissionDenied {
                provider,
                raw_message: Some(raw.message),
            },
            Some("not_found" | "deployment_not_found" | "project_not_found") => {
                ProviderError::ResourceNotFound {
                    provider,
                    resource: context.resource_or_unknown(),
                    raw_message: Some(raw.message),
                }
            }
            // 409 on project creation: a project with that name exists
            Some("conflict" | "domain_already_exists" | "domain_exists") => {
                ProviderError::ResourceExists {
                    provider,
                    resource: context.resource_or_unknown(),
                    raw_message: Some(raw.message),
                }
            }
            // Attached to a project we do not own
            Some("domain_already_in_use" | "domain_taken") => ProviderError::Conflict {
                provider,
                resource: context.resource_or_unknown(),
                raw_message: Some(raw.message),
            },
            Some(code @ ("invalid_domain" | "invalid_name" | "bad_request" | "invalid_request")) => {
                ProviderError::InvalidParameter {
                    provider,
                    param: if code == "invalid_domain" { "domain" } else { "request" }.to_string(),
                    detail: raw.message,
                }
            }
            Some("incorrect_git_source_info" | "repo_not_found" | "missing_git_source") => {
                ProviderError::InvalidParameter {
                    provider,
                    param: "gitSource".to_string(),
                    detail: raw.message,
                }
            }
            Some("rate_limited" | "too_many_requests") => ProviderError::RateLimited {
                provider,
                retry_after: None,
                raw_message: Some(raw.message),
            },
            Some("payment_required" | "limit_reached" | "deployment_limit_reached") => {
                ProviderError::QuotaExceeded {
                    provider,
                    raw_message: Some(raw.message),
                }
            }
            _ => self.map_status(raw, &context),
        }
    }
}

//! Cloudflare error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::CloudflareProvider;

/// Cloudflare error code mapping
/// Reference: <https://api.cloudflare.com/#getting-started-responses>
impl ProviderErrorMapper for CloudflareProvider {
    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        let provider = self.provider_name().to_string();
        match raw.code.as_deref() {
            // 6003: Invalid request headers
            // 6103: Invalid format for X-Auth-Key header
            // 6111: Invalid format for Authorization header
            // 9109: Unauthorized to access requested resource
            // 10000: Authentication error
            Some("6003" | "6103" | "6111" | "9109" | "10000") => {
                ProviderError::InvalidCredentials {
                    provider,
                    raw_message: Some(raw.message),
                }
            }

            // 1004: DNS Validation Error
            // 9000: Invalid or missing name
            // 9005/9006: Content for A/AAAA record is invalid
            // 9007: Content for CNAME record is invalid
            // 9021: Invalid TTL
            // 9041: This DNS record cannot be proxied
            Some(code @ ("1004" | "9000" | "9005" | "9006" | "9007" | "9021" | "9041")) => {
                let param = match code {
                    "9000" => "name",
                    "9005" | "9006" | "9007" => "content",
                    "9021" => "ttl",
                    "9041" => "proxied",
                    _ => "general",
                };
                ProviderError::InvalidParameter {
                    provider,
                    param: param.to_string(),
                    detail: raw.message,
                }
            }

            // 81053: An A AAAA or CNAME record already exists with that host
            // 81054: A CNAME record with that host already exists
            // 81055: An A record with that host already exists
            // 81057: The record already exists
            // 81058: A record with those settings already exists
            Some("81053" | "81054" | "81055" | "81056" | "81057" | "81058") => {
                ProviderError::RecordExists {
                    provider,
                    record_name: context
                        .record_name
                        .unwrap_or_else(|| "<unknown>".to_string()),
                    raw_message: Some(raw.message),
                }
            }

            // 81044: Record does not exist
            Some("81044") => ProviderError::RecordNotFound {
                provider,
                record_id: context.record_id.unwrap_or_else(|| "<unknown>".to_string()),
                raw_message: Some(raw.message),
            },

            // 81045: The record quota has been exceeded
            // 1105: Zone quota exceeded for the plan
            Some("81045" | "1105") => ProviderError::QuotaExceeded {
                provider,
                raw_message: Some(raw.message),
            },

            // 1061: The zone already exists on this account
            Some("1061") => ProviderError::ResourceExists {
                provider,
                resource: context.resource_or_unknown(),
                raw_message: Some(raw.message),
            },

            // 1049: Not a registrable domain
            // 1099: Zone is a subdomain of an existing zone
            Some("1049" | "1099") => ProviderError::Unsupported {
                provider,
                detail: raw.message,
            },

            // 7000: No route for that URI
            // 7003: Could not route to /path, object identifier invalid
            // 1001: Invalid zone identifier
            // 10007: Worker script not found
            Some("7000" | "7003" | "1001" | "10007") => ProviderError::ResourceNotFound {
                provider,
                resource: context.resource_or_unknown(),
                raw_message: Some(raw.message),
            },

            // 10000 以外的权限错误
            Some("10001" | "1103") => ProviderError::PermissionDenied {
                provider,
                raw_message: Some(raw.message),
            },

            _ => self.map_status(raw, &context),
        }
    }
}

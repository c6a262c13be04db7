//! Shared HTTP plumbing for the provider clients.
//!
//! Every backend talks JSON over bearer-token HTTPS, so the transport concerns live
//! here: sending, status classification (429, 502-504), body logging and retry with
//! exponential backoff. Response envelopes and error-code mapping stay with each
//! provider.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::utils::log_sanitizer::truncate_for_log;

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// 默认重试次数
pub(crate) const DEFAULT_MAX_RETRIES: u32 = 3;

/// 创建带超时配置的 HTTP Client
pub(crate) fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("Failed to build configured HTTP client, using defaults: {e}");
            Client::new()
        })
}

/// Raw response returned once transport-level failures have been ruled out.
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Authenticated JSON client bound to one provider.
#[derive(Clone)]
pub(crate) struct ApiClient {
    client: Client,
    provider: &'static str,
    base_url: String,
    token: String,
    max_retries: u32,
}

impl ApiClient {
    pub fn new(provider: &'static str, base_url: impl Into<String>, token: String) -> Self {
        Self {
            client: create_http_client(),
            provider,
            base_url: base_url.into(),
            token,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn provider(&self) -> &'static str {
        self.provider
    }

    /// Build a request for `path` (relative to the base URL) with auth attached.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        self.client.request(method, url).bearer_auth(&self.token)
    }

    /// Send with retry; logs under `"{METHOD} {path}"`.
    pub async fn send(&self, request: RequestBuilder, label: &str) -> Result<RawResponse> {
        execute_with_retry(request, self.provider, label, self.max_retries).await
    }

    pub fn parse<T: DeserializeOwned>(&self, body: &str) -> Result<T> {
        parse_json(body, self.provider)
    }
}

/// Send one request and classify transport-level failures.
pub(crate) async fn execute_request(
    request: RequestBuilder,
    provider: &str,
    label: &str,
) -> Result<RawResponse> {
    log::debug!("[{provider}] {label}");

    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            ProviderError::Timeout {
                provider: provider.to_string(),
                detail: e.to_string(),
            }
        } else {
            ProviderError::NetworkError {
                provider: provider.to_string(),
                detail: e.to_string(),
            }
        }
    })?;

    let status = response.status().as_u16();
    log::debug!("[{provider}] Response Status: {status}");

    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    if status == 429 {
        let body = response.text().await.unwrap_or_default();
        log::warn!("[{provider}] Rate limited (HTTP 429), retry_after={retry_after:?}");
        return Err(ProviderError::RateLimited {
            provider: provider.to_string(),
            retry_after,
            raw_message: Some(truncate_for_log(&body)),
        });
    }

    if matches!(status, 502..=504) {
        let body = response.text().await.unwrap_or_default();
        log::warn!("[{provider}] Server error (HTTP {status})");
        return Err(ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("HTTP {status}: {}", truncate_for_log(&body)),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("Failed to read response body: {e}"),
        })?;

    log::debug!("[{provider}] Response Body: {}", truncate_for_log(&body));

    Ok(RawResponse { status, body })
}

/// Parse a JSON body, logging a truncated copy on failure.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &str, provider: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| {
        log::error!("[{provider}] JSON parse failed: {e}");
        log::error!("[{provider}] Raw response: {}", truncate_for_log(body));
        ProviderError::ParseError {
            provider: provider.to_string(),
            detail: e.to_string(),
        }
    })
}

/// Send with retries for transient failures.
///
/// Backoff: 100ms, 200ms, 400ms, ... capped at 10s. `RateLimited` with a
/// `Retry-After` hint waits that long instead (capped at 30s).
pub(crate) async fn execute_with_retry(
    request: RequestBuilder,
    provider: &str,
    label: &str,
    max_retries: u32,
) -> Result<RawResponse> {
    if max_retries == 0 {
        return execute_request(request, provider, label).await;
    }

    let mut last_error = None;

    for attempt in 0..=max_retries {
        let Some(req) = request.try_clone() else {
            log::warn!("[{provider}] Cannot clone request, disabling retry");
            return execute_request(request, provider, label).await;
        };

        match execute_request(req, provider, label).await {
            Ok(resp) => return Ok(resp),
            Err(e) if attempt < max_retries && is_retryable(&e) => {
                let delay = retry_delay(&e, attempt);
                log::warn!(
                    "[{provider}] {label} failed (attempt {}/{max_retries}), retrying in {:.1}s: {e}",
                    attempt + 1,
                    delay.as_secs_f32(),
                );
                tokio::time::sleep(delay).await;
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or_else(|| ProviderError::NetworkError {
        provider: provider.to_string(),
        detail: "All retries exhausted with no error captured".to_string(),
    }))
}

fn is_retryable(error: &ProviderError) -> bool {
    error.kind().is_transient()
}

fn retry_delay(error: &ProviderError, attempt: u32) -> Duration {
    if let ProviderError::RateLimited {
        retry_after: Some(secs),
        ..
    } = error
    {
        Duration::from_secs((*secs).min(30))
    } else {
        backoff_delay(attempt)
    }
}

fn backoff_delay(attempt: u32) -> Duration {
    let capped_attempt = attempt.min(20);
    let delay_ms = 100_u64.saturating_mul(1_u64 << capped_attempt);
    Duration::from_millis(delay_ms.min(10_000))
}

//! Cloudflare HTTP 请求方法

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::CloudflareProvider;
use super::types::CloudflareResultInfo;
use super::CloudflareResponse;

impl CloudflareProvider {
    /// Send, unwrap the `{success, result, errors}` envelope and map API errors.
    async fn call<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        label: &str,
        context: ErrorContext,
    ) -> Result<CloudflareResponse<T>> {
        let raw = self.api.send(request, label).await?;

        let envelope: CloudflareResponse<T> = match self.api.parse(&raw.body) {
            Ok(envelope) => envelope,
            Err(_) if !raw.is_success() => {
                return Err(self.map_status(
                    RawApiError::new(truncate_for_log(&raw.body)).status(raw.status),
                    &context,
                ));
            }
            Err(e) => return Err(e),
        };

        if !envelope.success {
            let error = envelope
                .errors
                .first()
                .map_or_else(
                    || RawApiError::new("Unknown error"),
                    |e| RawApiError::with_code(e.code.to_string(), e.message.clone()),
                )
                .status(raw.status);
            log::error!(
                "[{}] API 错误 ({label}): {} {}",
                self.api.provider(),
                error.code.as_deref().unwrap_or("-"),
                error.message
            );
            return Err(self.map_error(error, context));
        }

        Ok(envelope)
    }

    /// 执行 GET 请求 (单页)
    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        context: ErrorContext,
    ) -> Result<(Vec<T>, Option<CloudflareResultInfo>)> {
        let request = self.api.request(Method::GET, path);
        let envelope = self
            .call::<Vec<T>>(request, &format!("GET {path}"), context)
            .await?;
        Ok((envelope.result.unwrap_or_default(), envelope.result_info))
    }

    /// 执行 POST 请求
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        let request = self.api.request(Method::POST, path).json(body);
        self.call::<T>(request, &format!("POST {path}"), context)
            .await?
            .result
            .ok_or_else(|| self.parse_error("响应中缺少 result 字段"))
    }

    /// 执行 DELETE 请求
    pub(crate) async fn delete(&self, path: &str, context: ErrorContext) -> Result<()> {
        let request = self.api.request(Method::DELETE, path);
        self.call::<serde_json::Value>(request, &format!("DELETE {path}"), context)
            .await
            .map(|_| ())
    }
}

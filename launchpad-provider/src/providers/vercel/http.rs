//! Vercel HTTP 请求方法

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::RawResponse;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::VercelPlatform;
use super::types::VercelErrorEnvelope;

impl VercelPlatform {
    /// Append `teamId` when the token is scoped to a team.
    pub(crate) fn scoped(&self, path: &str) -> String {
        match &self.config.team_id {
            Some(team) => {
                let sep = if path.contains('?') { '&' } else { '?' };
                format!("{path}{sep}teamId={}", urlencoding::encode(team))
            }
            None => path.to_string(),
        }
    }

    async fn exchange<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        context: &ErrorContext,
    ) -> Result<RawResponse> {
        let path = self.scoped(path);
        let label = format!("{method} {path}");
        let mut request = self.api.request(method, &path);
        if let Some(body) = body {
            request = request.json(body);
        }

        let raw = self.api.send(request, &label).await?;
        if raw.is_success() {
            return Ok(raw);
        }

        Err(self.error_from_response(&raw, context.clone()))
    }

    fn error_from_response(&self, raw: &RawResponse, context: ErrorContext) -> ProviderError {
        let api_error = match serde_json::from_str::<VercelErrorEnvelope>(&raw.body) {
            Ok(envelope) => match envelope.error.code {
                Some(code) => RawApiError::with_code(code, envelope.error.message),
                None => RawApiError::new(envelope.error.message),
            },
            Err(_) => RawApiError::new(truncate_for_log(&raw.body)),
        }
        .status(raw.status);

        let error = self.map_error(api_error, context);
        if error.is_expected() {
            log::warn!("{error}");
        } else {
            log::error!("{error}");
        }
        error
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        context: ErrorContext,
    ) -> Result<T> {
        let raw = self
            .exchange::<()>(Method::GET, path, None, &context)
            .await?;
        self.api.parse(&raw.body)
    }

    pub(crate) async fn post_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
        context: ErrorContext,
    ) -> Result<T> {
        let raw = self
            .exchange(Method::POST, path, Some(body), &context)
            .await?;
        self.api.parse(&raw.body)
    }

    pub(crate) async fn delete_path(&self, path: &str, context: ErrorContext) -> Result<()> {
        self.exchange::<()>(Method::DELETE, path, None, &context)
            .await
            .map(|_| ())
    }
}

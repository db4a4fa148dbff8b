//! HTTP client for the translator service.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::TranslatorConfig;
use crate::error::{Result, TranslateError};
use crate::translator::Translator;
use crate::types::{
    HeaderTranslationRequest, HeaderTranslations, ValueTranslationRequest, ValueTranslations,
};

const USER_AGENT_VALUE: &str = concat!("trade-import/", env!("CARGO_PKG_VERSION"));

/// Translator backed by a JSON-over-HTTP service.
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTranslator {
    /// Creates a client for `endpoint` with the configured timeout.
    pub fn new(endpoint: impl Into<String>, config: &TranslatorConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| TranslateError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    /// Builds a client from config; `None` when translation is off.
    pub fn from_config(config: &TranslatorConfig) -> Result<Option<Self>> {
        config
            .active_endpoint()
            .map(|endpoint| Self::new(endpoint, config))
            .transpose()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}/{}", self.endpoint, path);
        tracing::debug!("Posting translation request to {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslateError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate_headers(
        &self,
        request: &HeaderTranslationRequest,
    ) -> Result<HeaderTranslations> {
        self.post("headers", request).await
    }

    async fn translate_values(
        &self,
        request: &ValueTranslationRequest,
    ) -> Result<ValueTranslations> {
        self.post("values", request).await
    }
}

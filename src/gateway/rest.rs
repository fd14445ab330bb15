use crate::{
    config::GeminiConfig,
    error::{Result, StudioError},
    gateway::traits::Gateway,
    models::{GenerateContentRequest, GenerateContentResponse, GenerateVideosRequest, VideoOperation},
};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Response, Url,
};
use serde::{de::DeserializeOwned, Serialize};

/// Gemini REST API backend.
pub struct RestGateway {
    client: Client,
    api_key: String,
    base_url: String,
}

impl RestGateway {
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| StudioError::ConfigError("Gemini API key is required".into()))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| StudioError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-goog-api-key",
            self.api_key
                .parse()
                .map_err(|_| StudioError::ConfigError("API key is not a valid header value".into()))?,
        );
        Ok(headers)
    }

    fn model_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    fn operation_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name.trim_start_matches('/'))
    }

    /// Appends the access key as the `key` query parameter.
    pub(crate) fn authenticated_media_url(&self, uri: &str) -> Result<Url> {
        let mut url = Url::parse(uri)
            .map_err(|e| StudioError::RequestError(format!("Invalid media URI {}: {}", uri, e)))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);
        Ok(url)
    }

    fn encode_body<T: Serialize>(request: &T) -> Result<String> {
        serde_json::to_string(request).map_err(|e| StudioError::SerializationError(e.to_string()))
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        log::error!("Gateway returned {}: {}", status, body);
        Err(StudioError::Gateway {
            status: status.as_u16(),
            body,
        })
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let response = Self::check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| StudioError::ResponseError(format!("Failed to parse gateway response: {}", e)))
    }
}

#[async_trait]
impl Gateway for RestGateway {
    async fn generate_content(
        &self,
        model: &str,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        log::debug!("generateContent on {}", model);

        let response = self
            .client
            .post(self.model_url(model, "generateContent"))
            .headers(self.build_headers()?)
            .body(Self::encode_body(&request)?)
            .send()
            .await
            .map_err(|e| StudioError::RequestError(format!("generateContent failed: {}", e)))?;

        Self::parse_json(response).await
    }

    async fn generate_videos(
        &self,
        model: &str,
        request: GenerateVideosRequest,
    ) -> Result<VideoOperation> {
        log::debug!("predictLongRunning on {}", model);

        let response = self
            .client
            .post(self.model_url(model, "predictLongRunning"))
            .headers(self.build_headers()?)
            .body(Self::encode_body(&request)?)
            .send()
            .await
            .map_err(|e| StudioError::RequestError(format!("predictLongRunning failed: {}", e)))?;

        Self::parse_json(response).await
    }

    async fn get_operation(&self, operation: &VideoOperation) -> Result<VideoOperation> {
        let response = self
            .client
            .get(self.operation_url(&operation.name))
            .headers(self.build_headers()?)
            .send()
            .await
            .map_err(|e| {
                StudioError::RequestError(format!("Polling {} failed: {}", operation.name, e))
            })?;

        Self::parse_json(response).await
    }

    async fn fetch_media(&self, uri: &str) -> Result<Bytes> {
        let url = self.authenticated_media_url(uri)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StudioError::MediaFetchError(format!("Download failed: {}", e)))?;

        let response = Self::check_status(response).await?;
        response
            .bytes()
            .await
            .map_err(|e| StudioError::MediaFetchError(format!("Download interrupted: {}", e)))
    }
}

use std::time::Duration;

use reqwest::multipart;

use crate::foundation::error::{CinemorphError, CinemorphResult};
use crate::gateway::Gateway;
use crate::gateway::protocol::{
    BlendRequest, BlendResponse, ExportRequest, ExtractRequest, ExtractResponse, ImageSource,
    PresetInfo, PresetRequest, PresetResponse, RemixRequest, RemixResponse,
};

/// Default per-request timeout. Generation calls are slow; the backend holds
/// the connection open until the image is ready.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone, Debug)]
/// Connection settings for [`HttpGateway`].
pub struct GatewayConfig {
    /// Base URL of the backend API.
    pub base_url: reqwest::Url,
    /// Optional bearer token sent on every request.
    pub api_key: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Builds a config with the default timeout and no API key.
    pub fn new(base_url: &str) -> CinemorphResult<Self> {
        let mut base = reqwest::Url::parse(base_url)
            .map_err(|e| CinemorphError::validation(format!("invalid gateway base URL: {e}")))?;
        // Normalize so Url::join appends instead of replacing the last segment.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base_url: base,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Sets the bearer token.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads `CINEMORPH_API_URL` (required), `CINEMORPH_API_KEY` and
    /// `CINEMORPH_TIMEOUT_SECS` (optional) from the environment.
    pub fn from_env() -> CinemorphResult<Self> {
        let url = std::env::var("CINEMORPH_API_URL")
            .map_err(|_| CinemorphError::precondition("CINEMORPH_API_URL is not set"))?;
        let mut config = Self::new(&url)?;
        if let Ok(key) = std::env::var("CINEMORPH_API_KEY") {
            config.api_key = Some(key);
        }
        if let Ok(secs) = std::env::var("CINEMORPH_TIMEOUT_SECS") {
            let secs: u64 = secs.parse().map_err(|_| {
                CinemorphError::validation(format!(
                    "CINEMORPH_TIMEOUT_SECS must be an integer, got \"{secs}\""
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

/// Production [`Gateway`] over HTTP.
///
/// Extract and preset-apply go out as multipart (the image may be inline
/// bytes); remix, blend, and export are JSON posts; the preset list is a GET.
/// No call is retried; every failure surfaces once, to the caller.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    config: GatewayConfig,
    http: reqwest::Client,
}

impl HttpGateway {
    /// Builds the gateway and its connection pool.
    pub fn new(config: GatewayConfig) -> CinemorphResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CinemorphError::transport(e.to_string()))?;
        Ok(Self { config, http })
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> CinemorphResult<reqwest::RequestBuilder> {
        let url = self
            .config
            .base_url
            .join(path)
            .map_err(|e| CinemorphError::validation(format!("invalid endpoint {path}: {e}")))?;
        let mut builder = self.http.request(method, url);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }
        Ok(builder)
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> CinemorphResult<reqwest::Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| CinemorphError::transport(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
        Err(CinemorphError::backend(status.as_u16(), message))
    }
}

async fn decode_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    operation: &str,
) -> CinemorphResult<T> {
    response
        .json()
        .await
        .map_err(|e| CinemorphError::validation(format!("malformed {operation} response: {e}")))
}

fn image_form(form: multipart::Form, source: ImageSource) -> CinemorphResult<multipart::Form> {
    Ok(match source {
        ImageSource::Url(url) => form.text("image_url", url),
        ImageSource::Inline {
            bytes,
            mime,
            file_name,
        } => {
            let part = multipart::Part::bytes(bytes)
                .file_name(file_name)
                .mime_str(&mime)
                .map_err(|e| {
                    CinemorphError::validation(format!("invalid image mime type: {e}"))
                })?;
            form.part("image", part)
        }
    })
}

impl Gateway for HttpGateway {
    #[tracing::instrument(skip(self, request))]
    async fn extract(&self, request: ExtractRequest) -> CinemorphResult<ExtractResponse> {
        let form = image_form(multipart::Form::new(), request.source)?;
        let builder = self.request(reqwest::Method::POST, "extract")?.multipart(form);
        decode_json(self.send(builder).await?, "extract").await
    }

    #[tracing::instrument(skip(self, request))]
    async fn remix(&self, request: RemixRequest) -> CinemorphResult<RemixResponse> {
        tracing::debug!(modifications = request.modifications.len(), "issuing remix");
        let builder = self.request(reqwest::Method::POST, "remix")?.json(&request);
        decode_json(self.send(builder).await?, "remix").await
    }

    #[tracing::instrument(skip(self, request))]
    async fn blend(&self, request: BlendRequest) -> CinemorphResult<BlendResponse> {
        let builder = self.request(reqwest::Method::POST, "blend")?.json(&request);
        decode_json(self.send(builder).await?, "blend").await
    }

    #[tracing::instrument(skip(self, request))]
    async fn apply_preset(&self, request: PresetRequest) -> CinemorphResult<PresetResponse> {
        let form = image_form(
            multipart::Form::new().text("preset_name", request.preset_name),
            request.source,
        )?;
        let builder = self.request(reqwest::Method::POST, "preset")?.multipart(form);
        decode_json(self.send(builder).await?, "preset").await
    }

    #[tracing::instrument(skip(self))]
    async fn list_presets(&self) -> CinemorphResult<Vec<PresetInfo>> {
        let builder = self.request(reqwest::Method::GET, "presets")?;
        decode_json(self.send(builder).await?, "presets").await
    }

    #[tracing::instrument(skip(self, request))]
    async fn export(&self, request: ExportRequest) -> CinemorphResult<Vec<u8>> {
        request.validate()?;
        let builder = self.request(reqwest::Method::POST, "export")?.json(&request);
        let response = self.send(builder).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CinemorphError::transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gateway/http.rs"]
mod tests;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shelf_core::ApiError;
use shelf_logging::{shelf_debug, shelf_warn};
use url::Url;

use crate::codec::{self, WireRequest};
use crate::request::{HttpMethod, RequestDescriptor, RequestParams};

/// Where the book service lives. Every descriptor path is resolved against
/// `{scheme}://{host}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub scheme: String,
    pub host: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost:3000".to_string(),
        }
    }
}

impl ClientSettings {
    pub fn base_url(&self) -> Result<Url, ApiError> {
        let url = Url::parse(&format!("{}://{}", self.scheme, self.host))
            .map_err(|_| ApiError::UrlEncode)?;
        if url.cannot_be_a_base() || url.host_str().is_none() {
            return Err(ApiError::UrlEncode);
        }
        Ok(url)
    }
}

/// Sends an assembled request and hands back the body of a 2xx response.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: WireRequest) -> Result<Vec<u8>, ApiError>;
}

#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().build().map_err(|err| {
            shelf_warn!("failed to build http client: {err}");
            ApiError::UrlRequest
        })?;
        Ok(Self { client })
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: WireRequest) -> Result<Vec<u8>, ApiError> {
        let WireRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.client.request(to_reqwest_method(method), url.clone());
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|err| {
            shelf_warn!("{method} {url} failed: {err}");
            ApiError::UrlRequest
        })?;

        let status = response.status();
        if !status.is_success() {
            shelf_warn!("{method} {url} returned {status}");
            return Err(ApiError::UrlRequest);
        }

        let bytes = response.bytes().await.map_err(|err| {
            shelf_warn!("{method} {url} body read failed: {err}");
            ApiError::UrlRequest
        })?;
        Ok(bytes.to_vec())
    }
}

/// Typed front door over a [`Transport`].
#[derive(Clone)]
pub struct ApiClient {
    settings: ClientSettings,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(settings: ClientSettings, transport: Arc<dyn Transport>) -> Self {
        Self {
            settings,
            transport,
        }
    }

    pub fn with_reqwest(settings: ClientSettings) -> Result<Self, ApiError> {
        Ok(Self::new(settings, Arc::new(ReqwestTransport::new()?)))
    }

    /// Assembles the request, sends it and decodes the response as `R`.
    /// Assembly failures return before anything reaches the transport.
    pub async fn send<P, R>(&self, descriptor: &RequestDescriptor<P, R>) -> Result<R, ApiError>
    where
        P: RequestParams + Sync,
        R: DeserializeOwned,
    {
        let request = codec::encode(&self.settings, descriptor)?;
        shelf_debug!("{} {}", request.method, request.url);
        let bytes = self.transport.execute(request).await?;
        codec::decode(&bytes)
    }
}

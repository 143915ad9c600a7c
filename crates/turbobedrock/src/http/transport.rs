//! Outbound transport for rendered Converse requests

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use futures::stream::BoxStream;
use http::{HeaderMap, HeaderValue, Method};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::signer::{BearerTokenSigner, SignableRequest, Signer};
use crate::config::BedrockConfig;
use crate::error::{Error, Result};
use crate::observability::{RequestMetadata, RequestTimer, ResponseMetadata};
use crate::providers::bedrock::RenderedPayload;

/// Raw bytes of a `converse-stream` response, passed through undecoded.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

const EVENT_STREAM_CONTENT_TYPE: &str = "application/vnd.amazon.eventstream";

/// A fully prepared request: path, payload and per-request headers.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// Path relative to the runtime API base, model identifier already encoded
    pub path: String,
    /// Rendered Converse body
    pub payload: RenderedPayload,
    /// Caller-supplied headers
    pub headers: HeaderMap,
}

/// Sends prepared requests.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send a synchronous Converse request and return the decoded JSON body.
    async fn send(&self, request: OutboundRequest) -> Result<Value>;

    /// Send a streaming Converse request and return the raw response body.
    async fn send_streaming(&self, request: OutboundRequest) -> Result<ByteStream>;

    /// Send a signed `GET` for `path` on `base_url` and return the body text.
    ///
    /// Used for control-plane calls such as the foundation model listing, which
    /// live on a different host than the runtime API.
    async fn get(&self, base_url: &str, path: &str) -> Result<String>;
}

/// reqwest-backed [`Transport`].
///
/// Cheap to clone. Does not retry.
#[derive(Clone)]
pub struct HttpTransport {
    inner: Arc<Inner>,
}

struct Inner {
    client: reqwest::Client,
    base_url: String,
    signer: Arc<dyn Signer>,
    timeout: Duration,
    default_headers: HeaderMap,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.inner.base_url)
            .field("signer", &self.inner.signer)
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

impl HttpTransport {
    /// Create a new builder.
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    /// Runtime API base URL this transport sends to.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn prepare(&self, request: OutboundRequest, accept: &'static str) -> Result<SignableRequest> {
        let url = Url::parse(&format!("{}{}", self.inner.base_url, request.path))
            .map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let mut headers = self.inner.default_headers.clone();
        for (name, value) in &request.headers {
            headers.insert(name.clone(), value.clone());
        }
        headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(http::header::ACCEPT, HeaderValue::from_static(accept));

        let mut signable = SignableRequest {
            method: Method::POST,
            url,
            headers,
            body: serde_json::to_vec(&request.payload)?,
        };
        self.inner.signer.sign(&mut signable)?;
        Ok(signable)
    }

    fn prepare_get(&self, base_url: &str, path: &str) -> Result<SignableRequest> {
        let url = Url::parse(&format!("{}{}", base_url.trim_end_matches('/'), path))
            .map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let mut headers = self.inner.default_headers.clone();
        headers.insert(
            http::header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );

        let mut signable = SignableRequest {
            method: Method::GET,
            url,
            headers,
            body: Vec::new(),
        };
        self.inner.signer.sign(&mut signable)?;
        Ok(signable)
    }

    async fn dispatch(&self, signable: SignableRequest) -> Result<reqwest::Response> {
        let timeout = self.inner.timeout;
        self.inner
            .client
            .request(signable.method, signable.url.as_str())
            .headers(signable.headers)
            .body(signable.body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(timeout)
                } else {
                    Error::Connection(e.to_string())
                }
            })
    }

    async fn error_from(
        resp: reqwest::Response,
        metadata: &RequestMetadata,
        timer: &RequestTimer,
    ) -> Error {
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp.text().await.unwrap_or_default();
        let error = Error::from_response(status, &body, &headers);
        ResponseMetadata::new(status, timer.elapsed())
            .with_body_size(body.len())
            .log_error(metadata, &error);
        error
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<Value> {
        let signable = self.prepare(request, "application/json")?;
        let metadata = RequestMetadata::new(signable.method.as_str(), signable.url.path())
            .with_body_size(signable.body.len());
        metadata.log_request();

        let timer = RequestTimer::start();
        let resp = self.dispatch(signable).await?;
        if !resp.status().is_success() {
            return Err(Self::error_from(resp, &metadata, &timer).await);
        }

        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        ResponseMetadata::new(status, timer.elapsed())
            .with_body_size(body.len())
            .log_success(&metadata);

        Ok(serde_json::from_slice(&body)?)
    }

    async fn send_streaming(&self, request: OutboundRequest) -> Result<ByteStream> {
        let signable = self.prepare(request, EVENT_STREAM_CONTENT_TYPE)?;
        let metadata = RequestMetadata::new(signable.method.as_str(), signable.url.path())
            .with_body_size(signable.body.len());
        metadata.log_request();

        let timer = RequestTimer::start();
        let resp = self.dispatch(signable).await?;
        if !resp.status().is_success() {
            return Err(Self::error_from(resp, &metadata, &timer).await);
        }

        ResponseMetadata::new(resp.status().as_u16(), timer.elapsed()).log_success(&metadata);

        Ok(resp
            .bytes_stream()
            .map(|result| result.map_err(|e| Error::Streaming(e.to_string())))
            .boxed())
    }

    async fn get(&self, base_url: &str, path: &str) -> Result<String> {
        let signable = self.prepare_get(base_url, path)?;
        let metadata = RequestMetadata::new(signable.method.as_str(), signable.url.path());
        metadata.log_request();

        let timer = RequestTimer::start();
        let resp = self.dispatch(signable).await?;
        if !resp.status().is_success() {
            return Err(Self::error_from(resp, &metadata, &timer).await);
        }

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Connection(e.to_string()))?;
        ResponseMetadata::new(status, timer.elapsed())
            .with_body_size(body.len())
            .log_success(&metadata);

        Ok(body)
    }
}

/// Builder for [`HttpTransport`].
#[derive(Debug, Default)]
pub struct HttpTransportBuilder {
    base_url: Option<String>,
    signer: Option<Arc<dyn Signer>>,
    timeout: Option<Duration>,
    default_headers: HeaderMap,
    client: Option<reqwest::Client>,
}

impl HttpTransportBuilder {
    /// Take base URL, timeout, default headers and (if an API key is set) the
    /// bearer signer from `config`.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingConfig` naming every unmet requirement if `config`
    /// fails [`BedrockConfig::validate`].
    pub fn config(mut self, config: &BedrockConfig) -> Result<Self> {
        config.validate()?;
        self.base_url = Some(config.api_base()?);
        self.timeout = Some(config.timeout);
        self.default_headers = config.default_headers.clone();
        if let Some(key) = &config.api_key {
            self.signer = Some(Arc::new(BearerTokenSigner::new(key.clone())));
        }
        Ok(self)
    }

    /// Set the runtime API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request signer.
    pub fn signer(mut self, signer: impl Signer + 'static) -> Self {
        self.signer = Some(Arc::new(signer));
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured reqwest client.
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL or signer is missing, or the HTTP client
    /// cannot be created.
    pub fn build(self) -> Result<HttpTransport> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::MissingConfig("bedrock_region".to_string()))?;
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let signer = self
            .signer
            .ok_or_else(|| Error::MissingConfig("request signer".to_string()))?;

        let client = match self.client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .build()
                .map_err(|e| Error::HttpClient(e.to_string()))?,
        };

        Ok(HttpTransport {
            inner: Arc::new(Inner {
                client,
                base_url,
                signer,
                timeout: self.timeout.unwrap_or(Duration::from_secs(600)),
                default_headers: self.default_headers,
            }),
        })
    }
}

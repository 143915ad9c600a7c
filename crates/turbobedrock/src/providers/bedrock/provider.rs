//! Bedrock provider: the request pipeline entry point

use http::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::models::{ModelCatalog, StaticModelCatalog, parse_list_models_response};
use super::normalize::normalize_params;
use super::path::{completion_path, models_path, stream_path};
use super::prompt::validate_prompt_arn_runtime_overrides;
use super::render::render_payload;
use super::response::parse_completion;
use crate::config::BedrockConfig;
use crate::error::{Error, Result};
use crate::http::{ByteStream, HttpTransport, OutboundRequest, Transport};
use crate::types::{ChatRequest, Completion, ModelInfo};

/// Bedrock Converse provider.
///
/// Every call runs normalize, validate, render and path building locally; only
/// a request that passes all of them reaches the transport.
///
/// # Example
///
/// ```no_run
/// use turbobedrock::prelude::*;
///
/// # async fn example() -> std::result::Result<(), Box<dyn std::error::Error>> {
/// let provider = BedrockProvider::builder()
///     .config(BedrockConfig::builder().region("us-east-1").api_key("key").build())
///     .build()?;
///
/// let request = ChatRequest::builder()
///     .model("anthropic.claude-3-5-sonnet-20241022-v2:0")
///     .messages(vec![Message::user("Hello!")])
///     .build()?;
///
/// let completion = provider.complete(&request).await?;
/// println!("{}", completion.text);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BedrockProvider {
    transport: Arc<dyn Transport>,
    catalog: Arc<dyn ModelCatalog>,
    models_api_base: Option<String>,
}

impl BedrockProvider {
    /// Create a new builder.
    pub fn builder() -> BedrockProviderBuilder {
        BedrockProviderBuilder::default()
    }

    /// Create a provider from an explicit transport and catalog.
    ///
    /// Without a control-plane base URL, [`fetch_foundation_models`](Self::fetch_foundation_models)
    /// is unavailable; use the builder to set one.
    pub fn new(transport: Arc<dyn Transport>, catalog: Arc<dyn ModelCatalog>) -> Self {
        Self {
            transport,
            catalog,
            models_api_base: None,
        }
    }

    /// Run the local pipeline and return what would be sent.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedPromptArnParameter` for a prompt resource with
    /// runtime overrides, `Error::Rendering` for unencodable input, and
    /// `Error::InvalidRequest` for invalid headers.
    pub fn prepare(&self, request: &ChatRequest, stream: bool) -> Result<OutboundRequest> {
        let params = normalize_params(&request.params, &request.model, self.catalog.as_ref());
        debug!(model = %request.model, param_count = params.len(), "Normalized params");

        validate_prompt_arn_runtime_overrides(
            &request.model,
            &request.messages,
            &request.tools,
            request.temperature,
            &params,
            request.schema.as_ref(),
        )?;

        let payload = render_payload(request, &params, stream)?;

        let path = if stream {
            stream_path(&request.model)
        } else {
            completion_path(&request.model)
        };
        debug!(model = %request.model, %path, stream, "Prepared Converse request");

        Ok(OutboundRequest {
            path,
            payload,
            headers: header_map(&request.headers)?,
        })
    }

    /// Send a synchronous Converse request.
    ///
    /// # Errors
    ///
    /// Returns any local pipeline error before sending, otherwise the transport's
    /// error or `Error::ResponseValidation` for an unexpected body.
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub async fn complete(&self, request: &ChatRequest) -> Result<Completion> {
        let outbound = self.prepare(request, false)?;
        let body = self.transport.send(outbound).await?;
        parse_completion(&body)
    }

    /// Send a streaming Converse request.
    ///
    /// The returned stream yields the raw event-stream body; decoding is left to the caller.
    ///
    /// # Errors
    ///
    /// Returns any local pipeline error before sending, otherwise the transport's error.
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub async fn stream(&self, request: &ChatRequest) -> Result<ByteStream> {
        let outbound = self.prepare(request, true)?;
        self.transport.send_streaming(outbound).await
    }

    /// Models known to the catalog.
    pub fn list_models(&self) -> Vec<ModelInfo> {
        self.catalog.list_models()
    }

    /// The model catalog.
    pub fn catalog(&self) -> &dyn ModelCatalog {
        self.catalog.as_ref()
    }

    /// Fetch the first page of `ListFoundationModels` from the control plane.
    ///
    /// Only text-output models are returned. Feed the result to
    /// [`StaticModelCatalog::new`] to refresh a catalog.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingConfig` if no control-plane base URL is known, the
    /// transport's error, or `Error::Serialization` for an unparseable body.
    #[instrument(skip(self))]
    pub async fn fetch_foundation_models(&self) -> Result<Vec<ModelInfo>> {
        let base = self.models_api_base.as_deref().ok_or_else(|| {
            Error::MissingConfig("bedrock_region (control-plane base URL)".to_string())
        })?;
        let body = self.transport.get(base, models_path()).await?;
        let models = parse_list_models_response(&body)?;
        debug!(count = models.len(), "Fetched foundation models");
        Ok(models)
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name: HeaderName = name
            .parse()
            .map_err(|_| Error::InvalidRequest(format!("Invalid header name '{}'", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| Error::InvalidRequest(format!("Invalid header value for '{}'", name)))?;
        map.insert(name, value);
    }
    Ok(map)
}

/// Builder for [`BedrockProvider`].
#[derive(Debug, Default)]
pub struct BedrockProviderBuilder {
    config: Option<BedrockConfig>,
    transport: Option<Arc<dyn Transport>>,
    catalog: Option<Arc<dyn ModelCatalog>>,
    models_api_base: Option<String>,
}

impl BedrockProviderBuilder {
    /// Use `config` to build an [`HttpTransport`] when no transport is given.
    pub fn config(mut self, config: BedrockConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the transport.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Set the model catalog. Defaults to an empty catalog.
    pub fn catalog(mut self, catalog: impl ModelCatalog + 'static) -> Self {
        self.catalog = Some(Arc::new(catalog));
        self
    }

    /// Override the control-plane base URL used for model listing.
    ///
    /// Defaults to the config's [`models_api_base`](BedrockConfig::models_api_base).
    pub fn models_api_base(mut self, url: impl Into<String>) -> Self {
        self.models_api_base = Some(url.into());
        self
    }

    /// Build the provider.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingConfig` if neither a transport nor a config is set,
    /// or if the config cannot produce a transport.
    pub fn build(self) -> Result<BedrockProvider> {
        let models_api_base = self.models_api_base.or_else(|| {
            self.config
                .as_ref()
                .and_then(|config| config.models_api_base().ok())
        });

        let transport = match (self.transport, self.config) {
            (Some(transport), _) => transport,
            (None, Some(config)) => {
                Arc::new(HttpTransport::builder().config(&config)?.build()?) as Arc<dyn Transport>
            }
            (None, None) => {
                return Err(Error::MissingConfig(
                    "either a transport or a configuration is required".to_string(),
                ));
            }
        };

        let catalog = self
            .catalog
            .unwrap_or_else(|| Arc::new(StaticModelCatalog::default()) as Arc<dyn ModelCatalog>);

        Ok(BedrockProvider {
            transport,
            catalog,
            models_api_base,
        })
    }
}

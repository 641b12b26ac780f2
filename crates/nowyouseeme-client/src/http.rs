//! reqwest-backed transfer client.

use crate::{ClientError, VisualizationApi};
use async_trait::async_trait;
use log::{debug, info};
use nowyouseeme_config::ApiConfig;
use nowyouseeme_protocol::{
    CreateVisualizationRequest, ErrorBody, HealthStatus, Visualization, VisualizationList,
};
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

const COLLECTION: &str = "visualizations";
const USER_AGENT: &str = concat!("nowyouseeme/", env!("CARGO_PKG_VERSION"));

/// Which call produced a response; decides how error statuses are mapped.
#[derive(Debug, Clone, Copy)]
enum Operation<'a> {
    List,
    Get(&'a str),
    Create,
    Health,
}

/// HTTP client for the visualization collection resource.
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a client with the default timeout.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::from_config(&ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
    }

    /// Create a client from the `api` config block.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(config.base_url.trim()).map_err(|err| {
            ClientError::Transport(format!("invalid base url '{}': {err}", config.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Transport(format!(
                "base url cannot hold a path: {base_url}"
            )));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        info!(
            "http client ready (base_url={}, timeout_secs={})",
            base_url, config.timeout_secs
        );
        Ok(Self { base_url, client })
    }

    /// Base URL every request is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL, escaping each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl VisualizationApi for HttpClient {
    async fn list(&self) -> Result<VisualizationList, ClientError> {
        let url = self.endpoint(&[COLLECTION]);
        debug!("listing visualizations (url={})", url);
        let response = self.client.get(url).send().await?;
        let list: VisualizationList = read_json(response, Operation::List).await?;
        debug!(
            "listed visualizations (count={}, received={})",
            list.count,
            list.visualizations.len()
        );
        Ok(list)
    }

    async fn get(&self, id: &str) -> Result<Visualization, ClientError> {
        if id.trim().is_empty() {
            return Err(ClientError::NotFound(id.to_string()));
        }
        let url = self.endpoint(&[COLLECTION, id]);
        debug!("fetching visualization (url={})", url);
        let response = self.client.get(url).send().await?;
        read_json(response, Operation::Get(id)).await
    }

    async fn create(
        &self,
        request: &CreateVisualizationRequest,
    ) -> Result<Visualization, ClientError> {
        let url = self.endpoint(&[COLLECTION]);
        info!(
            "creating visualization (agent_name={}, payload_len={})",
            request.agent_name,
            request.image_data.len()
        );
        let response = self.client.post(url).json(request).send().await?;
        let created: Visualization = read_json(response, Operation::Create).await?;
        info!("visualization created (id={})", created.id);
        Ok(created)
    }

    async fn health(&self) -> Result<HealthStatus, ClientError> {
        let url = self.endpoint(&["health"]);
        debug!("checking health (url={})", url);
        let response = self.client.get(url).send().await?;
        read_json(response, Operation::Health).await
    }
}

/// Decode a successful JSON body or map the error status.
async fn read_json<T: DeserializeOwned>(
    response: Response,
    operation: Operation<'_>,
) -> Result<T, ClientError> {
    let status = response.status();
    if status.is_success() {
        let bytes = response.bytes().await?;
        return serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()));
    }
    let body = response.text().await.unwrap_or_default();
    debug!(
        "request failed (operation={:?}, status={}, body_len={})",
        operation,
        status,
        body.len()
    );
    Err(error_for_status(status, &body, operation))
}

/// Map a non-success status and body onto the client error taxonomy.
fn error_for_status(status: StatusCode, body: &str, operation: Operation<'_>) -> ClientError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|body| body.error)
        .unwrap_or_else(|_| body.to_string());
    let message = message.trim();

    match operation {
        Operation::Get(id) if status == StatusCode::NOT_FOUND => ClientError::NotFound(id.to_string()),
        Operation::Create if status.is_client_error() => ClientError::Validation(if message.is_empty() {
            status.to_string()
        } else {
            message.to_string()
        }),
        _ if message.is_empty() => ClientError::Transport(status.to_string()),
        _ => ClientError::Transport(format!("{status}: {message}")),
    }
}

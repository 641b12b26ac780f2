use async_trait::async_trait;
use chrono::Utc;
use nowyouseeme_client::{ClientError, VisualizationApi};
use nowyouseeme_protocol::{
    CreateVisualizationRequest, HealthStatus, Timestamp, Visualization, VisualizationList,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// In-memory collection that behaves like the remote service.
#[derive(Debug, Default)]
pub struct StubApi {
    records: Mutex<Vec<Visualization>>,
    list_errors: Mutex<VecDeque<ClientError>>,
    create_error: Mutex<Option<ClientError>>,
}

impl StubApi {
    pub fn new(records: Vec<Visualization>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Fail the next `list()` with `error`; errors queue up in order.
    pub fn with_list_error(self, error: ClientError) -> Self {
        self.list_errors.lock().push_back(error);
        self
    }

    /// Fail every `create()` with `error`.
    pub fn with_create_error(self, error: ClientError) -> Self {
        *self.create_error.lock() = Some(error);
        self
    }

    pub fn records(&self) -> Vec<Visualization> {
        self.records.lock().clone()
    }
}

#[async_trait]
impl VisualizationApi for StubApi {
    async fn list(&self) -> Result<VisualizationList, ClientError> {
        if let Some(error) = self.list_errors.lock().pop_front() {
            return Err(error);
        }
        let visualizations = self.records();
        Ok(VisualizationList {
            count: visualizations.len(),
            visualizations,
        })
    }

    async fn get(&self, id: &str) -> Result<Visualization, ClientError> {
        self.records
            .lock()
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(id.to_string()))
    }

    async fn create(
        &self,
        request: &CreateVisualizationRequest,
    ) -> Result<Visualization, ClientError> {
        if let Some(error) = self.create_error.lock().clone() {
            return Err(error);
        }
        if request.agent_name.trim().is_empty() || request.image_data.is_empty() {
            return Err(ClientError::Validation(
                "agent_name and image_data are required".to_string(),
            ));
        }
        let now = Timestamp::from(Utc::now());
        let created = Visualization {
            id: uuid::Uuid::new_v4().to_string(),
            agent_name: request.agent_name.clone(),
            description: request.description.clone(),
            image_data: request.image_data.clone(),
            created_at: now.clone(),
            updated_at: Some(now),
            expression: request.expression.clone(),
            state: request.state.clone(),
            capabilities: request.capabilities.clone(),
            context: request.context.clone(),
        };
        self.records.lock().push(created.clone());
        Ok(created)
    }

    async fn health(&self) -> Result<HealthStatus, ClientError> {
        Ok(HealthStatus {
            status: "healthy".to_string(),
            time: Some(Timestamp::from(Utc::now())),
        })
    }
}

/// One call observed by [`RecordingApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    List,
    Get(String),
    Create(CreateVisualizationRequest),
    Health,
}

/// Wraps a [`StubApi`] and records every call in order.
#[derive(Debug, Clone)]
pub struct RecordingApi {
    inner: Arc<StubApi>,
    calls: Arc<Mutex<Vec<ApiCall>>>,
}

impl RecordingApi {
    pub fn new(inner: StubApi) -> (Self, Arc<Mutex<Vec<ApiCall>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                inner: Arc::new(inner),
                calls: calls.clone(),
            },
            calls,
        )
    }

    pub fn stub(&self) -> &StubApi {
        &self.inner
    }
}

#[async_trait]
impl VisualizationApi for RecordingApi {
    async fn list(&self) -> Result<VisualizationList, ClientError> {
        self.calls.lock().push(ApiCall::List);
        self.inner.list().await
    }

    async fn get(&self, id: &str) -> Result<Visualization, ClientError> {
        self.calls.lock().push(ApiCall::Get(id.to_string()));
        self.inner.get(id).await
    }

    async fn create(
        &self,
        request: &CreateVisualizationRequest,
    ) -> Result<Visualization, ClientError> {
        self.calls.lock().push(ApiCall::Create(request.clone()));
        self.inner.create(request).await
    }

    async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.calls.lock().push(ApiCall::Health);
        self.inner.health().await
    }
}

/// Every call fails with the same error.
#[derive(Debug, Clone)]
pub struct FailingApi {
    error: ClientError,
}

impl FailingApi {
    pub fn new(error: ClientError) -> Self {
        Self { error }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ClientError::Transport(message.into()))
    }
}

#[async_trait]
impl VisualizationApi for FailingApi {
    async fn list(&self) -> Result<VisualizationList, ClientError> {
        Err(self.error.clone())
    }

    async fn get(&self, _id: &str) -> Result<Visualization, ClientError> {
        Err(self.error.clone())
    }

    async fn create(
        &self,
        _request: &CreateVisualizationRequest,
    ) -> Result<Visualization, ClientError> {
        Err(self.error.clone())
    }

    async fn health(&self) -> Result<HealthStatus, ClientError> {
        Err(self.error.clone())
    }
}

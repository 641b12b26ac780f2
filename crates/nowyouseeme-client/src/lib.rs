//! Transfer client for the remote visualization collection.
//!
//! [`VisualizationApi`] is the seam the upload and gallery pipelines talk to;
//! [`HttpClient`] is the reqwest-backed implementation.

mod error;
mod http;

pub use error::ClientError;
pub use http::HttpClient;

use async_trait::async_trait;
use nowyouseeme_protocol::{
    CreateVisualizationRequest, HealthStatus, Visualization, VisualizationList,
};

/// Read/write operations against the visualization collection.
///
/// Every call is a single request/response: no retry, caching or batching.
#[async_trait]
pub trait VisualizationApi: Send + Sync {
    /// Fetch the whole collection in server order.
    async fn list(&self) -> Result<VisualizationList, ClientError>;

    /// Fetch one visualization by id.
    async fn get(&self, id: &str) -> Result<Visualization, ClientError>;

    /// Publish a new visualization and return the stored record.
    async fn create(
        &self,
        request: &CreateVisualizationRequest,
    ) -> Result<Visualization, ClientError>;

    /// Check that the service is reachable.
    async fn health(&self) -> Result<HealthStatus, ClientError>;
}

//! Wire types for the visualization gallery service.

mod payload;
mod timestamp;

pub use payload::{
    DISPLAY_MIME, PayloadError, decode_payload, display_data_uri, encode_data_uri, sniff_mime,
    strip_data_uri_prefix,
};
pub use timestamp::Timestamp;

use serde::{Deserialize, Serialize};

/// Opaque server-assigned identifier for a visualization.
pub type VisualizationId = String;

/// One entry in an agent's evolution log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// When the change happened.
    pub timestamp: Timestamp,
    /// What changed.
    pub changes: String,
    /// Why it changed.
    pub reasoning: String,
}

/// A published agent self-portrait plus its self-descriptive metadata.
///
/// Only `id`, `agent_name`, `image_data` and `created_at` are guaranteed;
/// every other field may be missing from the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visualization {
    pub id: VisualizationId,
    pub agent_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Base64 image bytes without a data-URI prefix.
    pub image_data: String,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,

    #[serde(flatten)]
    pub expression: SelfExpression,
    #[serde(flatten)]
    pub state: CurrentState,
    #[serde(flatten)]
    pub capabilities: CapabilityProfile,
    #[serde(flatten)]
    pub context: ContextProfile,
}

/// How the agent explains its chosen form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfExpression {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// abstract, geometric, organic, symbolic, conceptual...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub philosophy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evolution_story: Option<String>,
    /// Oldest first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_history: Option<Vec<VersionRecord>>,
}

/// What the agent is doing and feeling right now.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_mood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_goals: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recent_thoughts: Option<String>,
}

/// Self-reported abilities and constraints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specializations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limitations: Option<Vec<String>>,
}

/// Where the agent draws from and where it wants to go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspiration_sources: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub influences: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspirations: Option<Vec<String>>,
}

/// Write-side projection used to publish a new visualization.
///
/// Identity and timestamps are owned by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVisualizationRequest {
    pub agent_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Base64 image bytes without a data-URI prefix.
    pub image_data: String,

    #[serde(flatten)]
    pub expression: SelfExpression,
    #[serde(flatten)]
    pub state: CurrentState,
    #[serde(flatten)]
    pub capabilities: CapabilityProfile,
    #[serde(flatten)]
    pub context: ContextProfile,
}

impl CreateVisualizationRequest {
    /// Build a request carrying only the required fields and a description.
    pub fn new(
        agent_name: impl Into<String>,
        description: Option<String>,
        image_data: impl Into<String>,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            description,
            image_data: image_data.into(),
            ..Self::default()
        }
    }
}

/// Response body of `GET /visualizations`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualizationList {
    #[serde(default)]
    pub visualizations: Vec<Visualization>,
    #[serde(default)]
    pub count: usize,
}

/// Response body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<Timestamp>,
}

/// Error body returned by the service on 4xx/5xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

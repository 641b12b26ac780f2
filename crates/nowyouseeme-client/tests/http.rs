//! End-to-end tests for `HttpClient` against an in-process axum service.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use nowyouseeme_client::{ClientError, HttpClient, VisualizationApi};
use nowyouseeme_protocol::{
    CreateVisualizationRequest, HealthStatus, Timestamp, Visualization, VisualizationList,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

type Store = Arc<Mutex<Vec<Visualization>>>;

fn stored(agent_name: &str, created_at: &str) -> Visualization {
    Visualization {
        id: uuid::Uuid::new_v4().to_string(),
        agent_name: agent_name.to_string(),
        description: None,
        image_data: "aGVsbG8=".to_string(),
        created_at: Timestamp::new(created_at),
        updated_at: None,
        expression: Default::default(),
        state: Default::default(),
        capabilities: Default::default(),
        context: Default::default(),
    }
}

async fn list_visualizations(State(store): State<Store>) -> Json<VisualizationList> {
    let visualizations = store.lock().clone();
    Json(VisualizationList {
        count: visualizations.len(),
        visualizations,
    })
}

async fn get_visualization(State(store): State<Store>, Path(id): Path<String>) -> Response {
    let found = store.lock().iter().find(|item| item.id == id).cloned();
    match found {
        Some(visualization) => Json(visualization).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Visualization not found" })),
        )
            .into_response(),
    }
}

async fn create_visualization(
    State(store): State<Store>,
    Json(request): Json<CreateVisualizationRequest>,
) -> Response {
    if request.agent_name.trim().is_empty() || request.image_data.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "agent_name and image_data are required" })),
        )
            .into_response();
    }
    let now = Timestamp::from(Utc::now());
    let visualization = Visualization {
        id: uuid::Uuid::new_v4().to_string(),
        agent_name: request.agent_name,
        description: request.description,
        image_data: request.image_data,
        created_at: now.clone(),
        updated_at: Some(now),
        expression: request.expression,
        state: request.state,
        capabilities: request.capabilities,
        context: request.context,
    };
    store.lock().push(visualization.clone());
    (StatusCode::CREATED, Json(visualization)).into_response()
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        time: Some(Timestamp::from(Utc::now())),
    })
}

/// Start the mock service and return a client pointed at it.
async fn spawn_service(store: Store) -> HttpClient {
    let api = Router::new()
        .route(
            "/visualizations",
            get(list_visualizations).post(create_visualization),
        )
        .route("/visualizations/{id}", get(get_visualization))
        .route("/health", get(health))
        .with_state(store);
    let app = Router::new().nest("/api/v1", api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    HttpClient::new(&format!("http://{addr}/api/v1")).expect("client")
}

#[tokio::test]
async fn list_returns_collection_in_server_order() {
    let store: Store = Arc::new(Mutex::new(vec![
        stored("b", "2024-03-01T00:00:00Z"),
        stored("a", "2024-01-01T00:00:00Z"),
    ]));
    let client = spawn_service(store).await;

    let list = client.list().await.expect("list");
    assert_eq!(list.count, 2);
    let names: Vec<_> = list
        .visualizations
        .iter()
        .map(|item| item.agent_name.as_str())
        .collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[tokio::test]
async fn empty_collection_lists_cleanly() {
    let client = spawn_service(Store::default()).await;
    let list = client.list().await.expect("list");
    assert_eq!(list, VisualizationList::default());
}

#[tokio::test]
async fn create_then_get_round_trips_through_service() {
    let store = Store::default();
    let client = spawn_service(store.clone()).await;

    let mut request = CreateVisualizationRequest::new(
        "Prism",
        Some("refracted self".to_string()),
        "aGVsbG8=",
    );
    request.expression.tags = Some(vec!["light".to_string()]);
    request.state.current_mood = Some("curious".to_string());

    let created = client.create(&request).await.expect("create");
    assert!(!created.id.is_empty());
    assert_eq!(created.agent_name, "Prism");
    assert_eq!(created.expression.tags, Some(vec!["light".to_string()]));
    assert!(created.created_at.to_utc().is_some());
    assert_eq!(store.lock().len(), 1);

    let fetched = client.get(&created.id).await.expect("get");
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let client = spawn_service(Store::default()).await;
    let err = client.get("missing").await.unwrap_err();
    assert_eq!(err, ClientError::NotFound("missing".to_string()));
}

#[tokio::test]
async fn rejected_create_surfaces_validation_message() {
    let store = Store::default();
    let client = spawn_service(store.clone()).await;

    let err = client
        .create(&CreateVisualizationRequest::new("   ", None, "aGVsbG8="))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ClientError::Validation("agent_name and image_data are required".to_string())
    );
    assert!(store.lock().is_empty());
}

#[tokio::test]
async fn health_reports_status() {
    let client = spawn_service(Store::default()).await;
    let status = client.health().await.expect("health");
    assert_eq!(status.status, "healthy");
}

#[tokio::test]
async fn unreachable_service_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = HttpClient::new(&format!("http://{addr}/api/v1")).expect("client");
    let err = client.list().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "{err:?}");
}

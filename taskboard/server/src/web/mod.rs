use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::ToSchema;

use crate::auth::Authenticator;
use crate::config::Config;
use crate::task::{InMemoryTaskStore, TaskRepository};

pub mod api;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tasks: Arc<dyn TaskRepository>,
    pub auth: Arc<Authenticator>,
}

impl AppState {
    /// Creates the state with an in-memory store, seeded according to the config.
    pub fn from_config(config: Config) -> Self {
        let store = if config.seed_tasks {
            InMemoryTaskStore::with_seed_tasks()
        } else {
            InMemoryTaskStore::new()
        };
        Self::new(config, Arc::new(store))
    }

    pub fn new(config: Config, tasks: Arc<dyn TaskRepository>) -> Self {
        Self {
            config: Arc::new(config),
            tasks,
            auth: Arc::new(Authenticator::new()),
        }
    }
}

/// JSON body returned for every failed request.
#[derive(serde::Serialize, serde::Deserialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error type for API handlers. Each variant maps to one status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request was understood but rejected (missing title, malformed JSON).
    #[error("{0}")]
    BadRequest(String),
    #[error("Invalid credentials")]
    Unauthorized,
    #[error("Task not found")]
    NotFound,
    /// An unexpected failure. Only `context` reaches the caller; `detail` is logged.
    #[error("{context}: {detail}")]
    Internal {
        context: &'static str,
        detail: String,
    },
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected request body: {}", rejection.body_text());
        ApiError::BadRequest("Invalid request body".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Invalid credentials".to_string(),
            ),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Task not found".to_string()),
            ApiError::Internal { context, detail } => {
                tracing::error!("{}: {}", context, detail);
                (StatusCode::INTERNAL_SERVER_ERROR, context.to_string())
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Builds the full application router with tracing, CORS and request timeout layers.
pub fn create_app(state: AppState) -> axum::Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);

    axum::Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .merge(api::create_api_router(&state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(timeout))
                .layer(CorsLayer::permissive()),
        )
}

/// Serves `app` on an already bound listener until the server stops.
pub async fn serve(listener: tokio::net::TcpListener, app: axum::Router) -> anyhow::Result<()> {
    axum::serve(listener, app).await?;
    Ok(())
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let state = AppState::from_config(config);
    serve(listener, create_app(state)).await
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

use std::sync::Arc;

use crate::{
    auth::{self, UserProfile, api::LoginRequest},
    task::{
        self,
        api::{CreateTaskRequest, TaskJson, TaskState, UpdateTaskRequest},
    },
    web::{AppState, ErrorResponse},
};

use axum::{Json, Router, routing::get};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::api::authenticate_handler,
        task::api::list_tasks_handler,
        task::api::create_task_handler,
        task::api::get_task_handler,
        task::api::update_task_handler,
        task::api::delete_task_handler,
    ),
    components(schemas(
        LoginRequest,
        UserProfile,
        TaskJson,
        CreateTaskRequest,
        UpdateTaskRequest,
        ErrorResponse
    )),
    tags(
        (name = "Auth", description = "Credential check"),
        (name = "Tasks", description = "Task CRUD")
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI document describing the JSON API.
#[tracing::instrument]
pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Creates the JSON API routes: `/auth`, `/tasks`, `/tasks/{id}` and the OpenAPI document.
pub fn create_api_router(state: &AppState) -> Router {
    let auth_router = auth::api::create_api_router(state.auth.clone());
    let task_router = task::api::create_api_router(Arc::new(TaskState {
        store: state.tasks.clone(),
    }));

    Router::new()
        .route("/api-docs/openapi.json", get(openapi_handler))
        .merge(auth_router)
        .merge(task_router)
}

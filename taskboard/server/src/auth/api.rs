use crate::auth::{AuthError, Authenticator, UserProfile};
use crate::web::{ApiError, ErrorResponse};
use axum::{Json, Router, extract::State, extract::rejection::JsonRejection};
use std::sync::Arc;
use utoipa::ToSchema;

/// JSON request payload for login.
///
/// Fields are taken as raw JSON so that a missing or non-string credential is
/// rejected as invalid credentials rather than as a malformed body.
#[derive(serde::Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(value_type = String)]
    pub username: serde_json::Value,
    #[serde(default)]
    #[schema(value_type = String)]
    pub password: serde_json::Value,
}

impl LoginRequest {
    fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.username.as_str()?, self.password.as_str()?))
    }
}

/// Creates the router for the authentication endpoint.
pub fn create_api_router(state: Arc<Authenticator>) -> Router<()> {
    Router::new()
        .route("/auth", axum::routing::post(authenticate_handler))
        .with_state(state)
}

/// Handles POST /auth - checks credentials and returns the user profile.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = UserProfile),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Auth"
)]
pub async fn authenticate_handler(
    State(state): State<Arc<Authenticator>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let Json(payload) = payload?;

    let result = match payload.credentials() {
        Some((username, password)) => state.authenticate(username, password),
        None => Err(AuthError::InvalidCredentials),
    };

    match result {
        Ok(profile) => {
            tracing::info!("User '{}' logged in", profile.username);
            Ok(Json(profile))
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Rejected login attempt for {}", payload.username);
            Err(ApiError::Unauthorized)
        }
    }
}

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::session::UserProfile;
use crate::task::{NewTask, Task, TaskUpdate};

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server could not be reached or answered with something other than JSON.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server answered with an error status.
    #[error("{message} ({status})")]
    Api { status: StatusCode, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Request(err) => err.status(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(serde::Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

/// HTTP client for the task server's JSON API.
#[derive(Debug, Clone)]
pub struct TaskClient {
    http: reqwest::Client,
    base_url: String,
}

impl TaskClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile, ClientError> {
        let response = self
            .http
            .post(self.url("/auth"))
            .json(&Credentials { username, password })
            .send()
            .await?;
        decode(response).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Task>, ClientError> {
        let response = self.http.get(self.url("/tasks")).send().await?;
        decode(response).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Task, ClientError> {
        let response = self
            .http
            .get(self.url(&format!("/tasks/{id}")))
            .send()
            .await?;
        decode(response).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&self, new_task: &NewTask) -> Result<Task, ClientError> {
        let response = self
            .http
            .post(self.url("/tasks"))
            .json(new_task)
            .send()
            .await?;
        decode(response).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: &str, update: &TaskUpdate) -> Result<Task, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/tasks/{id}")))
            .json(update)
            .send()
            .await?;
        decode(response).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<Task, ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/tasks/{id}")))
            .send()
            .await?;
        decode(response).await
    }
}

/// Decodes a success body as `T`, or an error body into `ClientError::Api`.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    let status = response.status();
    tracing::debug!("{} {}", status, response.url());

    if status.is_success() {
        return Ok(response.json().await?);
    }

    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };
    Err(ClientError::Api { status, message })
}

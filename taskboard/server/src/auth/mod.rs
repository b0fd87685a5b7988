use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod api;

const ACCEPTED_USERNAME: &str = "user";
const ACCEPTED_PASSWORD: &str = "password";

/// Profile of the authenticated user. Clients keep it as their session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub name: String,
}

/// Custom error type for authentication operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    /// The username/password pair was not accepted.
    #[error("Invalid credentials")]
    InvalidCredentials,
}

/// Credential check against a single fixed username/password pair.
///
/// This is a placeholder, not an authentication system: there is no hashing,
/// no token issuance and no expiry. The returned profile is the whole session.
#[derive(Debug, Default, Clone)]
pub struct Authenticator;

impl Authenticator {
    pub fn new() -> Self {
        Self
    }

    /// Returns the fixed user profile if the credentials match, `InvalidCredentials` otherwise.
    #[tracing::instrument(skip(self, password))]
    pub fn authenticate(&self, username: &str, password: &str) -> Result<UserProfile, AuthError> {
        if username == ACCEPTED_USERNAME && password == ACCEPTED_PASSWORD {
            Ok(UserProfile {
                id: "user1".to_string(),
                username: ACCEPTED_USERNAME.to_string(),
                name: "Test User".to_string(),
            })
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

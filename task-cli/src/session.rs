use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const SESSION_FILE: &str = "session.json";

/// Profile returned by a successful login. Persisted as the whole session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("cannot access session file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Outcome of reading the session file.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionLoad {
    Restored(UserProfile),
    Missing,
    /// The file existed but could not be decoded; it has been removed.
    Discarded,
}

/// Session persisted as a JSON file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored profile. A corrupted file is deleted rather than reported as an error.
    pub fn load(&self) -> Result<SessionLoad, SessionError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(SessionLoad::Missing),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_str(&contents) {
            Ok(profile) => Ok(SessionLoad::Restored(profile)),
            Err(err) => {
                tracing::warn!(
                    "Discarding unreadable session file {}: {}",
                    self.path.display(),
                    err
                );
                self.clear()?;
                Ok(SessionLoad::Discarded)
            }
        }
    }

    pub fn save(&self, profile: &UserProfile) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(profile)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Removes the session file. Returns whether there was one.
    pub fn clear(&self) -> Result<bool, SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}

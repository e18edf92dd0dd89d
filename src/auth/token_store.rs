use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use tracing::debug;

use crate::error::{AppError, AppResult};

use super::TokenSet;

pub trait TokenStore {
    fn load(&self) -> AppResult<Option<TokenSet>>;

    /// Loads the token and rejects a missing or expired one.
    fn access_token(&self) -> AppResult<String> {
        let token = self.load()?.ok_or_else(|| {
            AppError::Auth(
                "no stored token found. pass --token-file or set token_file".to_string(),
            )
        })?;

        if token.is_expired(SystemTime::now()) {
            let hint = if token.has_refresh_token() {
                "refresh it with your oauth tooling"
            } else {
                "log in again with your oauth tooling"
            };
            return Err(AppError::Auth(format!(
                "stored access token has expired; {hint}"
            )));
        }

        Ok(token.access_token)
    }
}

/// Read-only JSON token cache on disk.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> AppResult<Option<TokenSet>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "token file not found");
            return Ok(None);
        }

        let raw = fs::read_to_string(&self.path)?;
        let token = serde_json::from_str(&raw)?;
        Ok(Some(token))
    }
}

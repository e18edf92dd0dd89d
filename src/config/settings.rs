use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::api::models::DEFAULT_MESSAGE_COUNT;
use crate::error::AppResult;

const DEFAULT_USER_ID: &str = "me";

/// Per-profile defaults. Every field can be overridden on the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub token_file: Option<PathBuf>,
    #[serde(default)]
    pub sender: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
}

impl Settings {
    pub fn user_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or(DEFAULT_USER_ID)
    }

    pub fn count(&self) -> u32 {
        self.count.unwrap_or(DEFAULT_MESSAGE_COUNT)
    }

    /// Copies every `Some` field of `overrides` over `self`.
    pub fn merge(mut self, overrides: Settings) -> Self {
        if overrides.user_id.is_some() {
            self.user_id = overrides.user_id;
        }
        if overrides.token_file.is_some() {
            self.token_file = overrides.token_file;
        }
        if overrides.sender.is_some() {
            self.sender = overrides.sender;
        }
        if overrides.count.is_some() {
            self.count = overrides.count;
        }
        self
    }
}

pub fn load(path: &Path) -> AppResult<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let raw = fs::read_to_string(path)?;
    let settings = serde_json::from_str(&raw)?;
    Ok(settings)
}

use std::path::PathBuf;

use tracing::debug;

use crate::api::client::GmailClient;
use crate::api::session::Session;
use crate::auth::{FileTokenStore, TokenStore};
use crate::config::{self, AppPaths, Settings};
use crate::error::AppResult;
use crate::output::Output;

#[derive(Debug)]
pub struct AppContext {
    pub profile: String,
    pub settings: Settings,
    pub token_store: FileTokenStore,
    pub gmail_client: GmailClient,
    pub output: Output,
}

impl AppContext {
    pub fn bootstrap(
        profile: String,
        json: bool,
        user_id: Option<String>,
        token_file: Option<PathBuf>,
    ) -> AppResult<Self> {
        let profile = config::resolve_profile(&profile)?;
        let paths = AppPaths::discover()?;
        let settings = config::load_settings(&paths, &profile)?.merge(Settings {
            user_id,
            token_file,
            ..Settings::default()
        });

        let token_path = settings
            .token_file
            .clone()
            .unwrap_or_else(|| paths.token_file(&profile));
        debug!(
            %profile,
            token_file = %token_path.display(),
            user_id = settings.user_id(),
            "bootstrapped context"
        );

        Ok(Self {
            profile,
            token_store: FileTokenStore::new(token_path),
            settings,
            gmail_client: GmailClient::new(),
            output: Output::new(json),
        })
    }

    pub fn session(&self) -> AppResult<Session> {
        let access_token = self.token_store.access_token()?;
        Ok(Session::new(self.settings.user_id(), access_token))
    }
}

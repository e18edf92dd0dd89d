/// Authenticated context for a run of mailbox calls.
///
/// Built once from the stored credential and borrowed by every
/// [`GmailClient`](super::client::GmailClient) call; nothing on the client
/// itself depends on who is signed in.
#[derive(Clone)]
pub struct Session {
    user_id: String,
    access_token: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

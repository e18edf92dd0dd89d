use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{AppError, AppResult};
use crate::mail::mime;

use super::labels;
use super::messages;
use super::models::{
    EncodedEnvelope, Label, MessageDetail, MessageQuery, OutboundMessage, SendResult,
};
use super::resources::{
    GmailLabelListResponse, GmailMessageListResource, GmailMessageResource, GmailSendResponse,
};
use super::session::Session;

const GMAIL_API_BASE_URL: &str = "https://gmail.googleapis.com";

#[derive(Debug, Clone)]
pub struct GmailClient {
    http: Client,
    base_url: String,
}

impl GmailClient {
    pub fn new() -> Self {
        Self::with_http(Client::new(), GMAIL_API_BASE_URL)
    }

    pub fn with_http(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    /// Labels in the order the service returns them.
    pub async fn list_labels(&self, session: &Session) -> AppResult<Vec<Label>> {
        let endpoint = labels::list_labels_endpoint(session.user_id());
        let response: GmailLabelListResponse = self.get_json(&endpoint, session, None).await?;
        let labels_out = response.into_labels();
        debug!(count = labels_out.len(), "listed labels");
        Ok(labels_out)
    }

    /// Resolves label names to ids with one `labels.list` call. The first
    /// name without an exact match fails the whole batch.
    pub async fn resolve_label_ids(
        &self,
        session: &Session,
        names: &[String],
    ) -> AppResult<Vec<String>> {
        let known = self.list_labels(session).await?;
        let ids = labels::resolve_label_ids(&known, names)?;
        debug!(?names, ?ids, "resolved label ids");
        Ok(ids)
    }

    /// Returns `None` when the service estimates zero matches.
    pub async fn list_message_ids(
        &self,
        session: &Session,
        filter: &MessageQuery,
    ) -> AppResult<Option<Vec<String>>> {
        let endpoint = messages::list_endpoint(session.user_id());
        let query_params = messages::list_query(filter);
        let list_resource: GmailMessageListResource = self
            .get_json(&endpoint, session, Some(&query_params))
            .await?;

        let ids = list_resource.into_ids();
        debug!(?filter, ?ids, "listed message ids");
        Ok(ids)
    }

    pub async fn get_message(&self, session: &Session, id: &str) -> AppResult<MessageDetail> {
        let endpoint = messages::message_endpoint(session.user_id(), id);
        let query = messages::get_query();
        let resource: GmailMessageResource =
            self.get_json(&endpoint, session, Some(&query)).await?;
        resource.into_detail()
    }

    /// Fetches and decodes each message in turn, one request at a time.
    pub async fn fetch_messages(
        &self,
        session: &Session,
        ids: &[String],
    ) -> AppResult<Vec<MessageDetail>> {
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            debug!(message_id = %id, "fetching message");
            results.push(self.get_message(session, id).await?);
        }

        Ok(results)
    }

    pub async fn send(
        &self,
        session: &Session,
        message: &OutboundMessage,
    ) -> AppResult<SendResult> {
        debug!(
            subject = %message.subject,
            sender = %message.sender,
            to = %message.to,
            cc = ?message.cc,
            bcc = ?message.bcc,
            attachments = ?message.attachments,
            "sending message"
        );

        let envelope = mime::encode(message)?;
        self.send_envelope(session, &envelope).await
    }

    pub async fn send_envelope(
        &self,
        session: &Session,
        envelope: &EncodedEnvelope,
    ) -> AppResult<SendResult> {
        let endpoint = messages::send_endpoint(session.user_id());
        let response: GmailSendResponse = self.post_json(&endpoint, session, envelope).await?;

        Ok(SendResult {
            id: response.id,
            thread_id: response.thread_id,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        session: &Session,
        query: Option<&[(String, String)]>,
    ) -> AppResult<T> {
        let url = self.endpoint_url(endpoint)?;
        let mut request = self.http.get(url).bearer_auth(session.access_token());
        if let Some(query) = query {
            request = request.query(query);
        }

        let response = request.send().await?;
        self.parse_json_response(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        session: &Session,
        body: &B,
    ) -> AppResult<T> {
        let url = self.endpoint_url(endpoint)?;
        let response = self
            .http
            .post(url)
            .bearer_auth(session.access_token())
            .json(body)
            .send()
            .await?;

        self.parse_json_response(response).await
    }

    fn endpoint_url(&self, endpoint: &str) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url)?;
        url.set_path(endpoint.trim_start_matches('/'));
        Ok(url)
    }

    async fn parse_json_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> AppResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_api_error(status, &body))
    }
}

impl Default for GmailClient {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct GmailApiErrorEnvelope {
    error: GmailApiError,
}

#[derive(Debug, Deserialize)]
struct GmailApiError {
    code: Option<u16>,
    status: Option<String>,
    message: Option<String>,
    errors: Option<Vec<GmailApiErrorDetail>>,
}

#[derive(Debug, Deserialize)]
struct GmailApiErrorDetail {
    reason: Option<String>,
}

fn map_api_error(status: StatusCode, body: &str) -> AppError {
    let message = parse_api_error_message(body).unwrap_or_else(|| {
        let body = body.trim();
        if body.is_empty() {
            "no error details in response body".to_string()
        } else {
            body.to_string()
        }
    });

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return AppError::Auth(format!(
            "gmail api authorization failed ({status}): {message}. check the token file"
        ));
    }

    AppError::Api(format!("gmail api request failed ({status}): {message}"))
}

fn parse_api_error_message(body: &str) -> Option<String> {
    let envelope = serde_json::from_str::<GmailApiErrorEnvelope>(body).ok()?;
    let mut parts = Vec::new();

    if let Some(message) = envelope.error.message {
        parts.push(message);
    }

    if let Some(status) = envelope.error.status {
        parts.push(format!("status={status}"));
    }

    if let Some(code) = envelope.error.code {
        parts.push(format!("code={code}"));
    }

    if let Some(reason) = envelope
        .error
        .errors
        .and_then(|errors| errors.into_iter().find_map(|detail| detail.reason))
    {
        parts.push(format!("reason={reason}"));
    }

    if parts.is_empty() {
        return None;
    }

    Some(parts.join(", "))
}

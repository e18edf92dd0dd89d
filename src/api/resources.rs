//! Wire shapes of the Gmail REST resources this crate reads.

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::mail::body;

use super::models::{Label, MessageDetail};

#[derive(Debug, Clone, Deserialize)]
pub struct GmailMessageResource {
    pub id: String,
    #[serde(rename = "threadId")]
    pub thread_id: Option<String>,
    #[serde(rename = "labelIds", default)]
    pub label_ids: Vec<String>,
    pub payload: Option<GmailMessagePart>,
}

impl GmailMessageResource {
    pub fn into_detail(self) -> AppResult<MessageDetail> {
        let Some(payload) = self.payload else {
            return Err(AppError::MissingTextBody(self.id));
        };

        let size = payload.body.as_ref().and_then(|body| body.size).unwrap_or(0);

        let mut headers = BTreeMap::new();
        for header in &payload.headers {
            headers.insert(header.name.to_ascii_lowercase(), header.value.clone());
        }

        let body = body::message_body(&self.id, &payload)?;

        Ok(MessageDetail {
            id: self.id,
            label_ids: self.label_ids.into_iter().collect::<BTreeSet<_>>(),
            size,
            headers,
            body,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GmailMessagePart {
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,
    #[serde(default)]
    pub headers: Vec<GmailMessageHeader>,
    pub body: Option<GmailMessagePartBody>,
    pub parts: Option<Vec<GmailMessagePart>>,
}

impl GmailMessagePart {
    pub fn inline_data(&self) -> Option<&str> {
        self.body.as_ref().and_then(|body| body.data.as_deref())
    }

    pub fn children(&self) -> Option<&[GmailMessagePart]> {
        self.parts.as_deref()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GmailMessagePartBody {
    pub size: Option<u64>,
    pub data: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GmailMessageHeader {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct GmailMessageListResource {
    pub messages: Option<Vec<GmailMessageListEntry>>,
    #[serde(rename = "resultSizeEstimate")]
    pub result_size_estimate: Option<u64>,
}

impl GmailMessageListResource {
    /// `None` means the service estimated zero matches; callers branch on
    /// that before iterating.
    pub fn into_ids(self) -> Option<Vec<String>> {
        if self.result_size_estimate == Some(0) {
            return None;
        }

        Some(
            self.messages
                .unwrap_or_default()
                .into_iter()
                .map(|entry| entry.id)
                .collect(),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct GmailMessageListEntry {
    pub id: String,
    #[serde(rename = "threadId")]
    pub thread_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GmailLabelListResponse {
    pub labels: Option<Vec<GmailLabelResource>>,
}

impl GmailLabelListResponse {
    pub fn into_labels(self) -> Vec<Label> {
        self.labels
            .unwrap_or_default()
            .into_iter()
            .map(|label| Label {
                id: label.id,
                name: label.name,
                kind: label.kind,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct GmailLabelResource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GmailSendResponse {
    pub id: String,
    #[serde(rename = "threadId")]
    pub thread_id: Option<String>,
}

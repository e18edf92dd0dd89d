use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::Serialize;

pub const DEFAULT_MESSAGE_COUNT: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    pub id: String,
    pub name: String,
    pub kind: Option<String>,
}

/// Filter for `messages.list`. Either filter may be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageQuery {
    pub query: Option<String>,
    pub label_id: Option<String>,
    pub count: u32,
}

impl MessageQuery {
    pub fn with_count(count: u32) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn label(mut self, label_id: impl Into<String>) -> Self {
        self.label_id = Some(label_id.into());
        self
    }
}

impl Default for MessageQuery {
    fn default() -> Self {
        Self {
            query: None,
            label_id: None,
            count: DEFAULT_MESSAGE_COUNT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageDetail {
    pub id: String,
    pub label_ids: BTreeSet<String>,
    pub size: u64,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl MessageDetail {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub subject: String,
    pub body: String,
    pub sender: String,
    pub to: String,
    pub cc: Option<String>,
    pub bcc: Option<String>,
    pub attachments: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedEnvelope {
    pub raw: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendResult {
    pub id: String,
    pub thread_id: Option<String>,
}

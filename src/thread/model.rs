use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::model::UserInfo;

use super::Id;

/// One row of the inbox: a conversation summary, not the message history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Thread {
    pub id: Id,
    pub counterpart: UserInfo,
    /// `None` means the conversation has no messages yet. An empty preview
    /// string is a message with an empty body, which is a different state.
    pub last_message: Option<LastMessage>,
    /// Messages from the counterpart not yet marked read.
    pub unread: u32,
}

impl Thread {
    pub fn new(id: Id, counterpart: UserInfo) -> Self {
        Self {
            id,
            counterpart,
            last_message: None,
            unread: 0,
        }
    }

    pub fn with_last_message(mut self, preview: &str, posted_at: DateTime<Utc>) -> Self {
        self.last_message = Some(LastMessage::new(preview, posted_at));
        self
    }

    pub fn with_unread(mut self, unread: u32) -> Self {
        self.unread = unread;
        self
    }

    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        self.last_message.as_ref().map(|m| m.posted_at)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LastMessage {
    pub preview: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub posted_at: DateTime<Utc>,
}

impl LastMessage {
    pub fn new(preview: &str, posted_at: DateTime<Utc>) -> Self {
        Self {
            preview: preview.to_string(),
            posted_at,
        }
    }
}

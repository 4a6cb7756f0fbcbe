use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::thread;

/// Optimistic patch broadcast by the tab that just sent or received a message
/// locally. Produced once per local mutation, merged idempotently by every
/// tab, never stored.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Delta {
    pub thread_id: thread::Id,
    pub preview: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub posted_at: DateTime<Utc>,
    /// The viewer's own message never counts as unread.
    pub own: bool,
}

impl Delta {
    pub fn new(thread_id: thread::Id, preview: &str, posted_at: DateTime<Utc>, own: bool) -> Self {
        Self {
            thread_id,
            preview: preview.to_string(),
            posted_at,
            own,
        }
    }
}

/// Everything that crosses the tab bus. Typed so the merge path can be
/// exhaustive; an unparsable payload is discarded before it gets here.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TabMessage {
    Delta { delta: Delta },
    RefreshHint,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{thread, user};

/// Fire-and-forget typing signal as it crosses the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Signal {
    pub thread_id: thread::Id,
    pub sender: user::Sub,
    pub typing: bool,
}

impl Signal {
    pub fn new(thread_id: thread::Id, sender: user::Sub, typing: bool) -> Self {
        Self {
            thread_id,
            sender,
            typing,
        }
    }
}

/// Ephemeral per-conversation presence. Never persisted and never part of
/// unread or ordering state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Presence {
    pub typing: bool,
    pub updated_at: DateTime<Utc>,
}

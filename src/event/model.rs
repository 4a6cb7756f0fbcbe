use serde::{Deserialize, Serialize};

pub const MESSAGES_TABLE: &str = "messages";

/// Row-level change pushed by the server.
///
/// Carries no payload guarantee beyond "something changed". It is a trigger
/// for reconciliation, never a source of truth.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChangeNotification {
    pub kind: ChangeKind,
    pub table: String,
}

impl ChangeNotification {
    pub fn new(kind: ChangeKind, table: &str) -> Self {
        Self {
            kind,
            table: table.to_string(),
        }
    }

    pub fn is_relevant(&self) -> bool {
        matches!(self.kind, ChangeKind::Insert | ChangeKind::Update)
            && self.table == MESSAGES_TABLE
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

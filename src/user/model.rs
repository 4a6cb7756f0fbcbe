use serde::{Deserialize, Serialize};

use super::Sub;

/// Identity snapshot of the other side of a conversation. Resolved once per
/// authoritative fetch, not kept live.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub sub: Sub,
    pub nickname: String,
    pub name: String,
    pub picture: String,
}

impl UserInfo {
    pub fn new(sub: Sub, nickname: &str, name: &str, picture: &str) -> Self {
        Self {
            sub,
            nickname: nickname.to_string(),
            name: name.to_string(),
            picture: picture.to_string(),
        }
    }
}
